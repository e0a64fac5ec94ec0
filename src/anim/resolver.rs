/// Frame resolution
///
/// Turns a selection (body, action, facing, hue) into the decoded frames to
/// draw. Nothing is cached: every selection change resolves again and the
/// caller owns what it gets back.

use log::debug;

use super::archive::{ArchiveDecoder, Facing, Frame, FrameRequest};

/// Facing used for catalog thumbnails
const THUMBNAIL_FACING: u8 = 1;

/// What the presentation layer wants drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveRequest {
    /// Graphic as listed in the catalog (before alias translation)
    pub body: u32,
    pub action: usize,
    pub facing: Facing,
    /// 0 = the archive's default hue
    pub hue_override: u16,
    /// Remap with `hue_override` even when it is 0
    pub force_hue_remap: bool,
    /// Fast decode path used for thumbnails
    pub preview: bool,
}

impl ResolveRequest {
    pub fn new(body: u32, action: usize, facing: Facing) -> Self {
        Self {
            body,
            action,
            facing,
            hue_override: 0,
            force_hue_remap: false,
            preview: false,
        }
    }

    pub fn with_hue(mut self, hue_override: u16) -> Self {
        self.hue_override = hue_override;
        self
    }

    pub fn preview(mut self) -> Self {
        self.preview = true;
        self
    }
}

/// Frames resolved for one selection
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAnimation {
    /// Graphic as requested
    pub body: u32,
    /// Graphic after alias translation
    pub base_body: u32,
    pub action: usize,
    pub facing: Facing,
    /// Hue actually applied, as reported by the decoder
    pub hue: u16,
    /// Whether `hue` came from an override rather than the archive default
    pub custom_hue: bool,
    /// Never empty
    pub frames: Vec<Frame>,
}

impl ResolvedAnimation {
    pub fn first_frame(&self) -> &Frame {
        &self.frames[0]
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Hue as displayed to the user (1-based)
    pub fn display_hue(&self) -> u32 {
        u32::from(self.hue) + 1
    }

    /// Label lines the viewer shows next to the picture
    pub fn describe(&self) -> String {
        format!(
            "BaseGraphic: {}\nGraphic: {}(0x{:X})\nHue: {}",
            self.base_body,
            self.body,
            self.body,
            self.display_hue()
        )
    }
}

/// Resolve the frames for `request`.
///
/// Returns `None` when the archive has nothing for this action/facing; that
/// is a normal outcome meaning "nothing to draw".
pub fn resolve(decoder: &dyn ArchiveDecoder, request: &ResolveRequest) -> Option<ResolvedAnimation> {
    let base_body = decoder.translate_body(request.body);
    let custom_hue = request.hue_override != 0 || request.force_hue_remap;

    let frame_request = FrameRequest {
        body: request.body,
        action: request.action,
        facing: request.facing,
        hue: if custom_hue { request.hue_override } else { 0 },
        force_hue_remap: custom_hue,
        preview: request.preview,
    };

    let decoded = decoder.animation_frames(&frame_request)?;
    if decoded.frames.is_empty() {
        debug!(
            "no frames for body {} action {} facing {}",
            request.body,
            request.action,
            request.facing.value()
        );
        return None;
    }

    Some(ResolvedAnimation {
        body: request.body,
        base_body,
        action: request.action,
        facing: request.facing,
        hue: decoded.hue,
        custom_hue,
        frames: decoded.frames,
    })
}

/// First frame of action 0 at the thumbnail facing, decoded on the fast path
pub fn resolve_thumbnail(decoder: &dyn ArchiveDecoder, body: u32) -> Option<Frame> {
    let request = ResolveRequest::new(body, 0, Facing::new(THUMBNAIL_FACING)).preview();
    resolve(decoder, &request).and_then(|resolved| resolved.frames.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockArchive;

    #[test]
    fn test_default_hue_is_reported_back() {
        let archive = MockArchive::new()
            .with_action(17, 0, 5)
            .with_default_hue(17, 33);

        let resolved = resolve(&archive, &ResolveRequest::new(17, 0, Facing::default())).unwrap();
        assert_eq!(resolved.hue, 33);
        assert!(!resolved.custom_hue);
        assert_eq!(resolved.frame_count(), 5);

        let sent = archive.requests.borrow()[0];
        assert!(!sent.force_hue_remap);
        assert_eq!(sent.hue, 0);
    }

    #[test]
    fn test_hue_override_forces_remap() {
        let archive = MockArchive::new()
            .with_action(17, 0, 2)
            .with_default_hue(17, 33);

        let request = ResolveRequest::new(17, 0, Facing::default()).with_hue(1200);
        let resolved = resolve(&archive, &request).unwrap();
        assert_eq!(resolved.hue, 1200);
        assert!(resolved.custom_hue);

        let sent = archive.requests.borrow()[0];
        assert!(sent.force_hue_remap);
        assert_eq!(sent.hue, 1200);
    }

    #[test]
    fn test_alias_is_reported_as_base_graphic() {
        let archive = MockArchive::new().with_alias(400, 401).with_action(401, 2, 3);

        let resolved = resolve(&archive, &ResolveRequest::new(400, 2, Facing::new(3))).unwrap();
        assert_eq!(resolved.body, 400);
        assert_eq!(resolved.base_body, 401);
        assert!(resolved.describe().starts_with("BaseGraphic: 401\nGraphic: 400(0x190)"));
    }

    #[test]
    fn test_missing_action_is_none() {
        let archive = MockArchive::new().with_action(17, 0, 5);
        assert!(resolve(&archive, &ResolveRequest::new(17, 9, Facing::default())).is_none());
        assert!(resolve(&archive, &ResolveRequest::new(18, 0, Facing::default())).is_none());
    }

    #[test]
    fn test_thumbnail_uses_preview_path() {
        let archive = MockArchive::new().with_action(17, 0, 5);

        let frame = resolve_thumbnail(&archive, 17);
        assert!(frame.is_some());

        let sent = archive.requests.borrow()[0];
        assert!(sent.preview);
        assert_eq!(sent.action, 0);
        assert_eq!(sent.facing.value(), 1);
    }
}
