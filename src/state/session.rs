/// View session
///
/// Everything the animation panel used to keep in ambient fields lives
/// here: the selection, facing, hue, animate flag and the frames currently
/// on screen. The presentation layer drives it and redraws when it is
/// notified.

use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};

use super::catalog::{Catalog, CatalogNode};
use super::data::{Category, EntryHandle};
use super::sort::SortMode;
use crate::anim::archive::{ArchiveDecoder, Facing, Frame};
use crate::anim::player::{AnimationPlayer, PlaybackCursor};
use crate::anim::resolver::{resolve, resolve_thumbnail, ResolveRequest};
use crate::error::{CatalogError, ExportError};
use crate::export::{export, ExportFormat, ExportTarget, NamingContext};

/// Events published to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Entries were added, removed or re-sorted
    CatalogChanged,
    /// A selection was resolved; `frames` is 0 when there is nothing to draw
    SelectionResolved { body: Option<u32>, action: usize, frames: usize },
}

type Listener = Box<dyn FnMut(&Notification)>;

/// Explicit view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub selected: Option<EntryHandle>,
    pub action: usize,
    pub facing: Facing,
    /// 0 = archive default
    pub hue_override: u16,
    /// Hue the archive reported for the last default-hue resolution
    pub default_hue: u16,
    pub animate: bool,
    /// Category whose bodies the thumbnail list shows
    pub display_category: Category,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected: None,
            action: 0,
            facing: Facing::default(),
            hue_override: 0,
            default_hue: 0,
            animate: false,
            display_category: Category::Creature,
        }
    }
}

/// What was resolved for the current selection (the label texts)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionInfo {
    pub body: u32,
    pub base_body: u32,
    pub hue: u16,
    pub custom_hue: bool,
    pub frame_count: usize,
}

pub struct Session<D: ArchiveDecoder> {
    decoder: D,
    catalog: Catalog,
    view: ViewState,
    info: Option<SelectionInfo>,
    /// Still picture (animate off)
    picture: Option<Frame>,
    /// Animation buffer (animate on)
    player: AnimationPlayer,
    listeners: Vec<Listener>,
}

impl<D: ArchiveDecoder> Session<D> {
    /// Start a session on a loaded catalog and select its first creature
    pub fn new(catalog: Catalog, decoder: D) -> Self {
        let mut session = Self {
            decoder,
            catalog,
            view: ViewState::default(),
            info: None,
            picture: None,
            player: AnimationPlayer::new(),
            listeners: Vec::new(),
        };
        session.select(CatalogNode::Root(Category::Creature));
        session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn info(&self) -> Option<&SelectionInfo> {
        self.info.as_ref()
    }

    /// Register a callback for catalog and selection notifications
    pub fn subscribe(&mut self, listener: impl FnMut(&Notification) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, notification: Notification) {
        for listener in self.listeners.iter_mut() {
            listener(&notification);
        }
    }

    // ========== Selection ==========

    /// Select a tree node.
    ///
    /// A root selects its first entry, an entry selects action 0.
    pub fn select(&mut self, node: CatalogNode) {
        match node {
            CatalogNode::Root(category) => {
                self.view.display_category = category;
                self.view.selected = self.catalog.first(category);
                self.view.action = 0;
            }
            CatalogNode::Entry(handle) => self.select_entry(handle, 0),
            CatalogNode::Action(handle, action) => self.select_entry(handle, action),
        }
        self.refresh();
    }

    /// Select the entry for body `id`, if listed
    pub fn select_body(&mut self, id: u32, action: usize) -> bool {
        match self.catalog.find(id) {
            Some(handle) => {
                self.select(CatalogNode::Action(handle, action));
                true
            }
            None => false,
        }
    }

    fn select_entry(&mut self, handle: EntryHandle, action: usize) {
        match self.catalog.get(handle) {
            Some(entry) => {
                self.view.display_category = entry.category;
                self.view.selected = Some(handle);
                self.view.action = action;
            }
            None => {
                self.view.selected = None;
                self.view.action = 0;
            }
        }
    }

    pub fn set_facing(&mut self, facing: Facing) {
        self.view.facing = facing;
        self.refresh();
    }

    /// Facing from the direction slider position
    pub fn set_facing_slider(&mut self, position: u8) {
        self.set_facing(Facing::from_slider(position));
    }

    /// Apply hue `select` from the hue picker (stored 1-based)
    pub fn set_hue(&mut self, select: u16) {
        self.view.hue_override = select.saturating_add(1);
        self.refresh();
    }

    /// Back to the archive's default hue
    pub fn clear_hue(&mut self) {
        self.view.hue_override = 0;
        self.refresh();
    }

    /// Index the hue picker should open at
    pub fn hue_picker_start(&self) -> u16 {
        if self.view.hue_override == 0 {
            self.view.default_hue.saturating_add(1)
        } else {
            self.view.hue_override - 1
        }
    }

    pub fn set_animate(&mut self, animate: bool) {
        if self.view.animate == animate {
            return;
        }
        self.view.animate = animate;
        self.refresh();
    }

    pub fn toggle_animate(&mut self) -> bool {
        self.set_animate(!self.view.animate);
        self.view.animate
    }

    /// Resolve the current selection again and swap in the new frames
    pub fn refresh(&mut self) {
        self.player.stop();
        self.picture = None;
        self.info = None;

        let body = self
            .view
            .selected
            .and_then(|handle| self.catalog.get(handle))
            .map(|entry| entry.id);

        if let Some(body) = body {
            let request = ResolveRequest::new(body, self.view.action, self.view.facing)
                .with_hue(self.view.hue_override);

            if let Some(resolved) = resolve(&self.decoder, &request) {
                if !resolved.custom_hue {
                    self.view.default_hue = resolved.hue;
                }
                self.info = Some(SelectionInfo {
                    body: resolved.body,
                    base_body: resolved.base_body,
                    hue: resolved.hue,
                    custom_hue: resolved.custom_hue,
                    frame_count: resolved.frame_count(),
                });
                debug!("{}", resolved.describe());

                if self.view.animate {
                    self.player.start(resolved.frames);
                } else {
                    self.picture = resolved.frames.into_iter().next();
                }
            }
        }

        let frames = self.info.map_or(0, |info| info.frame_count);
        self.notify(Notification::SelectionResolved {
            body,
            action: self.view.action,
            frames,
        });
    }

    // ========== Playback ==========

    /// Timer callback: advance the animation
    pub fn tick(&mut self) -> Option<usize> {
        self.player.tick()
    }

    pub fn cursor(&self) -> Option<&PlaybackCursor> {
        self.player.cursor()
    }

    /// Frame to draw right now
    pub fn current_frame(&self) -> Option<&Frame> {
        if self.view.animate {
            self.player.cursor().and_then(PlaybackCursor::current_frame)
        } else {
            self.picture.as_ref()
        }
    }

    // ========== Catalog editing ==========

    /// Add a body and select it
    pub fn add_entry(&mut self, id: u32, type_tag: i64, name: &str) -> Result<EntryHandle, CatalogError> {
        let handle = self.catalog.add_entry(id, type_tag, name, &self.decoder)?;
        self.notify(Notification::CatalogChanged);
        self.select(CatalogNode::Entry(handle));
        Ok(handle)
    }

    /// Remove the entry `node` belongs to
    pub fn remove(&mut self, node: CatalogNode) -> Option<u32> {
        let removed = self.catalog.remove(node)?;
        self.notify(Notification::CatalogChanged);
        if node.entry() == self.view.selected {
            self.select(CatalogNode::Root(self.view.display_category));
        }
        Some(removed.id)
    }

    pub fn toggle_sort(&mut self) -> SortMode {
        let mode = self.catalog.toggle_sort();
        self.notify(Notification::CatalogChanged);
        mode
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.catalog.set_sort_mode(mode);
        self.notify(Notification::CatalogChanged);
    }

    pub fn save_catalog(&self, path: &Path) -> Result<(), CatalogError> {
        self.catalog.save(path)
    }

    /// Bodies shown in the thumbnail list, in catalog order
    pub fn list_view(&self) -> Vec<u32> {
        self.catalog.list_ids(self.view.display_category)
    }

    /// Thumbnail for a body in the list view
    pub fn thumbnail(&self, id: u32) -> Option<Frame> {
        resolve_thumbnail(&self.decoder, id)
    }

    /// Bodies in the archive not listed in the catalog yet
    pub fn undefined_bodies(&self) -> Vec<u32> {
        self.catalog.undefined_bodies(&self.decoder)
    }

    // ========== Export ==========

    fn naming(&self) -> Option<NamingContext> {
        let entry = self.catalog.get(self.view.selected?)?;
        Some(NamingContext { category: entry.category, id: entry.id })
    }

    /// Export the picture on screen (the first frame while animating)
    pub fn export_picture(&self, format: ExportFormat, out_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        let naming = self.naming().ok_or(ExportError::NothingToExport)?;
        let frame = if self.view.animate {
            self.player.cursor().and_then(|c| c.frames().first())
        } else {
            self.picture.as_ref()
        };
        let frame = frame.ok_or(ExportError::NothingToExport)?;
        export(ExportTarget::Picture(frame), &naming, format, out_dir)
    }

    /// Export every frame of the running animation
    pub fn export_animation(&self, format: ExportFormat, out_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        let naming = self.naming().ok_or(ExportError::NothingToExport)?;
        let cursor = self.player.cursor().ok_or(ExportError::NothingToExport)?;
        let written = export(ExportTarget::Sequence(cursor.frames()), &naming, format, out_dir)?;
        info!("Exported {} frames of {}", written.len(), naming.base_name());
        Ok(written)
    }

    /// Export one frame of the running animation
    pub fn export_frame(&self, index: usize, format: ExportFormat, out_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        let naming = self.naming().ok_or(ExportError::NothingToExport)?;
        let cursor = self.player.cursor().ok_or(ExportError::NothingToExport)?;
        let frame = cursor.frames().get(index).ok_or(ExportError::FrameOutOfRange {
            index,
            count: cursor.frame_count(),
        })?;
        export(ExportTarget::Frame { index, frame }, &naming, format, out_dir)
    }
}

// Implement Debug for better error messages
impl<D: ArchiveDecoder> fmt::Debug for Session<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("view", &self.view)
            .field("entries", &self.catalog.len())
            .field("info", &self.info)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockArchive;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    const DOC: &str = r#"<Graphics>
  <Mob name="Orc" body="17" type="0"/>
  <Mob name="Bear" body="212" type="2"/>
  <Equip name="Plate Helm" body="5001" type="4"/>
</Graphics>"#;

    fn session() -> Session<MockArchive> {
        let archive = MockArchive::new()
            .with_action(17, 0, 10)
            .with_action(17, 4, 8)
            .with_action(212, 0, 6)
            .with_action(5001, 0, 3)
            .with_action(77, 0, 2)
            .with_default_hue(17, 40);
        let catalog = Catalog::from_xml(DOC, &archive).unwrap();
        Session::new(catalog, archive)
    }

    #[test]
    fn test_new_selects_first_creature() {
        let session = session();
        let info = session.info().unwrap();
        assert_eq!(info.body, 17);
        assert_eq!(info.frame_count, 10);
        assert!(session.current_frame().is_some());
        assert_eq!(session.view().default_hue, 40);
        assert_eq!(session.hue_picker_start(), 41);
    }

    #[test]
    fn test_root_selects_first_entry_and_switches_list() {
        let mut session = session();
        session.select(CatalogNode::Root(Category::Equipment));
        assert_eq!(session.view().display_category, Category::Equipment);
        assert_eq!(session.info().unwrap().body, 5001);
        assert_eq!(session.list_view(), vec![5001]);
    }

    #[test]
    fn test_action_without_frames_draws_nothing() {
        let mut session = session();
        assert!(session.select_body(17, 2));
        assert!(session.info().is_none());
        assert!(session.current_frame().is_none());
        assert!(matches!(
            session.export_picture(ExportFormat::Bmp, Path::new("/unused")),
            Err(ExportError::NothingToExport)
        ));
    }

    #[test]
    fn test_hue_override() {
        let mut session = session();
        session.set_hue(1199);
        let info = session.info().unwrap();
        assert_eq!(info.hue, 1200);
        assert!(info.custom_hue);
        assert_eq!(session.hue_picker_start(), 1199);

        session.clear_hue();
        assert_eq!(session.info().unwrap().hue, 40);
    }

    #[test]
    fn test_animate_and_tick() {
        let mut session = session();
        assert!(session.select_body(17, 4));
        assert!(session.tick().is_none());

        assert!(session.toggle_animate());
        assert_eq!(session.cursor().unwrap().frame_count(), 8);
        for _ in 0..8 {
            session.tick();
        }
        assert_eq!(session.cursor().unwrap().frame_index(), 0);

        // changing selection restarts from frame 0
        session.tick();
        session.set_facing_slider(0);
        assert_eq!(session.view().facing.value(), 5);
        assert_eq!(session.cursor().unwrap().frame_index(), 0);

        assert!(!session.toggle_animate());
        assert!(session.cursor().is_none());
        assert!(session.current_frame().is_some());
    }

    #[test]
    fn test_notifications() {
        let mut session = session();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.subscribe(move |n| sink.borrow_mut().push(n.clone()));

        session.add_entry(77, 0, "Imp").unwrap();
        session.toggle_sort();

        let seen = seen.borrow();
        assert_eq!(seen[0], Notification::CatalogChanged);
        assert_eq!(
            seen[1],
            Notification::SelectionResolved { body: Some(77), action: 0, frames: 2 }
        );
        assert_eq!(seen[2], Notification::CatalogChanged);
    }

    #[test]
    fn test_duplicate_add_leaves_selection() {
        let mut session = session();
        let before = session.view().clone();
        assert!(matches!(
            session.add_entry(5001, 0, "Helm"),
            Err(CatalogError::Duplicate { id: 5001, .. })
        ));
        assert_eq!(session.view(), &before);
    }

    #[test]
    fn test_remove_selected_moves_selection() {
        let mut session = session();
        let orc = session.catalog().find(17).unwrap();
        assert_eq!(session.remove(CatalogNode::Action(orc, 4)), Some(17));
        assert_eq!(session.info().unwrap().body, 212);
        assert!(session.remove(CatalogNode::Root(Category::Creature)).is_none());
    }

    #[test]
    fn test_export_animation_and_frame() {
        let tmp = TempDir::new().unwrap();
        let mut session = session();
        session.select(CatalogNode::Root(Category::Equipment));

        // still mode has no animation buffer
        assert!(matches!(
            session.export_animation(ExportFormat::Bmp, tmp.path()),
            Err(ExportError::NothingToExport)
        ));

        session.set_animate(true);
        let written = session.export_animation(ExportFormat::Bmp, tmp.path()).unwrap();
        assert_eq!(written.len(), 3);
        assert!(written[2].ends_with("Equipment 5001-2.bmp"));

        let one = session.export_frame(1, ExportFormat::Tiff, tmp.path()).unwrap();
        assert!(one[0].ends_with("Equipment 5001-1.tiff"));
        assert!(matches!(
            session.export_frame(3, ExportFormat::Tiff, tmp.path()),
            Err(ExportError::FrameOutOfRange { index: 3, count: 3 })
        ));

        let picture = session.export_picture(ExportFormat::Jpeg, tmp.path()).unwrap();
        assert!(picture[0].ends_with("Equipment 5001.jpg"));
    }
}
