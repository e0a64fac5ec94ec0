/// Animation frames module
///
/// This module handles:
/// - The archive decoder interface (archive.rs)
/// - A directory-backed archive of PNG frames (folder.rs)
/// - Resolving a selection into frames (resolver.rs)
/// - Looping playback of resolved frames (player.rs)

pub mod archive;
pub mod folder;
pub mod player;
pub mod resolver;
