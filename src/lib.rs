//! Animation catalog core
//!
//! Browses, previews, animates and exports creature and equipment
//! animations from a client archive, and maintains the XML animation list
//! that maps body ids to names and action tables.

pub mod anim;
pub mod error;
pub mod export;
pub mod settings;
pub mod state;

#[cfg(test)]
mod test_support;

pub use anim::archive::{ArchiveDecoder, DecodedFrames, Facing, Frame, FrameRequest};
pub use anim::folder::FolderArchive;
pub use anim::player::{AnimationPlayer, PlaybackCursor};
pub use anim::resolver::{resolve, resolve_thumbnail, ResolveRequest, ResolvedAnimation};
pub use error::{ArchiveError, CatalogError, ExportError, SettingsError};
pub use export::{export, ExportFormat, ExportTarget, NamingContext};
pub use settings::Settings;
pub use state::catalog::{Catalog, CatalogNode};
pub use state::data::{CatalogEntry, Category, DefinedAction, EntryHandle, TypeClass};
pub use state::session::{Notification, Session, ViewState};
pub use state::sort::SortMode;
