//! In-memory archive used by the unit tests

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use image::{Rgba, RgbaImage};

use crate::anim::archive::{ArchiveDecoder, DecodedFrames, Frame, FrameRequest};

#[derive(Default)]
pub struct MockArchive {
    /// (body, action) -> frame count
    actions: BTreeMap<(u32, usize), usize>,
    aliases: HashMap<u32, u32>,
    default_hues: HashMap<u32, u16>,
    pub requests: RefCell<Vec<FrameRequest>>,
}

impl MockArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, body: u32, action: usize, frames: usize) -> Self {
        self.actions.insert((body, action), frames);
        self
    }

    pub fn with_alias(mut self, body: u32, canonical: u32) -> Self {
        self.aliases.insert(body, canonical);
        self
    }

    pub fn with_default_hue(mut self, body: u32, hue: u16) -> Self {
        self.default_hues.insert(body, hue);
        self
    }
}

/// A 4x3 frame whose red channel encodes the frame index
pub fn solid_frame(index: usize) -> Frame {
    Frame::new(RgbaImage::from_pixel(4, 3, Rgba([index as u8, 0, 0, 255])))
}

impl ArchiveDecoder for MockArchive {
    fn translate_body(&self, body: u32) -> u32 {
        self.aliases.get(&body).copied().unwrap_or(body)
    }

    fn is_action_defined(&self, body: u32, action: usize, _facing: u8) -> bool {
        let body = self.translate_body(body);
        self.actions.get(&(body, action)).is_some_and(|&count| count > 0)
    }

    fn animation_frames(&self, request: &FrameRequest) -> Option<DecodedFrames> {
        self.requests.borrow_mut().push(*request);

        let body = self.translate_body(request.body);
        let count = *self.actions.get(&(body, request.action))?;
        if count == 0 {
            return None;
        }
        let count = if request.preview { 1 } else { count };
        let hue = if request.force_hue_remap {
            request.hue
        } else {
            self.default_hues.get(&body).copied().unwrap_or(0)
        };
        Some(DecodedFrames {
            frames: (0..count).map(solid_frame).collect(),
            hue,
        })
    }

    fn file_name_for(&self, body: u32) -> Option<String> {
        Some(format!("anim{}.mul", if body < 200 { 1 } else { 2 }))
    }

    fn bodies(&self) -> Vec<u32> {
        let mut bodies: Vec<u32> = self.actions.keys().map(|(body, _)| *body).collect();
        bodies.dedup();
        bodies
    }
}
