/// Folder-backed animation archive
///
/// Reads frames exported to a plain directory tree:
///
/// ```text
/// <root>/archive.json                    optional manifest
/// <root>/<body>/<action>/<facing>/<n>.png
/// ```
///
/// The manifest maps alias bodies to their canonical body and stores the
/// default hue of each body:
///
/// ```json
/// { "aliases": { "400": 401 }, "hues": { "17": 33 } }
/// ```

use image::imageops::FilterType;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::archive::{ArchiveDecoder, DecodedFrames, Frame, FrameRequest};
use crate::error::ArchiveError;

/// Manifest file name inside the archive root
pub const MANIFEST_FILE: &str = "archive.json";

/// Preview frames are scaled to fit this square
const PREVIEW_SIZE: u32 = 64;

/// Contents of `archive.json`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Manifest {
    /// Alias body -> canonical body
    pub aliases: HashMap<u32, u32>,
    /// Default hue per canonical body
    pub hues: HashMap<u32, u16>,
}

impl Manifest {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Archive stored as a directory of PNG frames
#[derive(Debug, Clone)]
pub struct FolderArchive {
    root: PathBuf,
    manifest: Manifest,
}

impl FolderArchive {
    /// Open the archive rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ArchiveError::NotFound(root));
        }

        let manifest_path = root.join(MANIFEST_FILE);
        let manifest = if manifest_path.is_file() {
            Manifest::from_json(&fs::read_to_string(&manifest_path)?)?
        } else {
            Manifest::default()
        };

        info!(
            "📁 Archive opened at {} ({} aliases)",
            root.display(),
            manifest.aliases.len()
        );
        Ok(Self { root, manifest })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn facing_dir(&self, body: u32, action: usize, facing: u8) -> PathBuf {
        self.root
            .join(body.to_string())
            .join(action.to_string())
            .join(facing.to_string())
    }

    /// PNG files of one facing, ordered by their numeric stem
    fn frame_paths(&self, body: u32, action: usize, facing: u8) -> Vec<PathBuf> {
        let dir = self.facing_dir(body, action, facing);
        if !dir.is_dir() {
            return Vec::new();
        }

        let mut numbered: Vec<(u32, PathBuf)> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let path = e.into_path();
                let is_png = path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("png"));
                let index = path.file_stem()?.to_str()?.parse::<u32>().ok()?;
                is_png.then_some((index, path))
            })
            .collect();

        numbered.sort_by_key(|(index, _)| *index);
        numbered.into_iter().map(|(_, path)| path).collect()
    }

    fn load_frame(path: &Path, preview: bool) -> Option<Frame> {
        let img = match image::open(path) {
            Ok(img) => img,
            Err(e) => {
                warn!("⚠️  Unreadable frame {}: {}", path.display(), e);
                return None;
            }
        };

        let img = if preview && (img.width() > PREVIEW_SIZE || img.height() > PREVIEW_SIZE) {
            img.resize(PREVIEW_SIZE, PREVIEW_SIZE, FilterType::Triangle)
        } else {
            img
        };
        Some(Frame::new(img.to_rgba8()))
    }
}

impl ArchiveDecoder for FolderArchive {
    fn translate_body(&self, body: u32) -> u32 {
        self.manifest.aliases.get(&body).copied().unwrap_or(body)
    }

    fn is_action_defined(&self, body: u32, action: usize, facing: u8) -> bool {
        let body = self.translate_body(body);
        !self.frame_paths(body, action, facing).is_empty()
    }

    fn animation_frames(&self, request: &FrameRequest) -> Option<DecodedFrames> {
        let body = self.translate_body(request.body);
        let mut paths = self.frame_paths(body, request.action, request.facing.value());
        if request.preview {
            paths.truncate(1);
        }

        // a single unreadable frame means the action has no usable data
        let frames: Option<Vec<Frame>> = paths
            .iter()
            .map(|path| Self::load_frame(path, request.preview))
            .collect();
        let frames = frames.filter(|f| !f.is_empty())?;

        // no palette table here: hue only travels back to the caller
        let hue = if request.force_hue_remap {
            request.hue
        } else {
            self.manifest.hues.get(&body).copied().unwrap_or(0)
        };

        Some(DecodedFrames { frames, hue })
    }

    fn file_name_for(&self, body: u32) -> Option<String> {
        let dir = self.root.join(self.translate_body(body).to_string());
        dir.is_dir().then(|| dir.to_string_lossy().to_string())
    }

    fn bodies(&self) -> Vec<u32> {
        let mut bodies: Vec<u32> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| e.file_name().to_str()?.parse::<u32>().ok())
            .collect();
        bodies.sort_unstable();
        bodies
    }
}
