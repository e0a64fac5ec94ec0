/// Catalog state module
///
/// This module handles the animation catalog and the view state, including:
/// - Shared data structures and action-name tables (data.rs)
/// - The entry arena, add/remove and persistence (catalog.rs)
/// - The animation list XML format (xml.rs)
/// - Catalog ordering by id or by name (sort.rs)
/// - Selection, playback and export for the viewer (session.rs)

pub mod catalog;
pub mod data;
pub mod session;
pub mod sort;
pub mod xml;
