/// Frame export
///
/// Flattens frames onto an opaque white canvas of the frame's own size and
/// saves them as BMP, TIFF or JPEG with deterministic names:
///
/// - `Mob 17.bmp` for a single picture
/// - `Mob 17-3.bmp` for one frame of an animation
/// - `Equipment 5001-0.jpg`, `Equipment 5001-1.jpg`, ... for a whole animation

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::anim::archive::Frame;
use crate::error::ExportError;
use crate::state::data::Category;

/// Output encoding
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Bmp,
    Tiff,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Bmp => "bmp",
            ExportFormat::Tiff => "tiff",
            ExportFormat::Jpeg => "jpg",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            ExportFormat::Bmp => ImageFormat::Bmp,
            ExportFormat::Tiff => ImageFormat::Tiff,
            ExportFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Which body the exported files are named after
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingContext {
    pub category: Category,
    pub id: u32,
}

impl NamingContext {
    /// "Mob 17", "Equipment 5001"
    pub fn base_name(&self) -> String {
        format!("{} {}", self.category.export_label(), self.id)
    }

    fn file_name(&self, index: Option<usize>, format: ExportFormat) -> String {
        match index {
            Some(index) => format!("{}-{}.{}", self.base_name(), index, format.extension()),
            None => format!("{}.{}", self.base_name(), format.extension()),
        }
    }
}

/// What to export
#[derive(Debug, Clone, Copy)]
pub enum ExportTarget<'a> {
    /// The picture currently shown, named without an index
    Picture(&'a Frame),
    /// One frame of an animation, named with its index
    Frame { index: usize, frame: &'a Frame },
    /// Every frame of an animation, one file each
    Sequence(&'a [Frame]),
}

/// Composite `image` over opaque white
pub fn flatten_on_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

fn save_frame(frame: &Frame, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
    DynamicImage::ImageRgb8(flatten_on_white(&frame.image))
        .save_with_format(path, format.image_format())
        .map_err(|source| ExportError::Image {
            path: path.to_path_buf(),
            source,
        })
}

/// Write `target` into `out_dir`, returning the paths written in order
pub fn export(
    target: ExportTarget<'_>,
    naming: &NamingContext,
    format: ExportFormat,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    let jobs: Vec<(Option<usize>, &Frame)> = match target {
        ExportTarget::Picture(frame) => vec![(None, frame)],
        ExportTarget::Frame { index, frame } => vec![(Some(index), frame)],
        ExportTarget::Sequence(frames) => {
            if frames.is_empty() {
                return Err(ExportError::NothingToExport);
            }
            frames.iter().enumerate().map(|(i, f)| (Some(i), f)).collect()
        }
    };

    fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(jobs.len());
    for (index, frame) in jobs {
        let path = out_dir.join(naming.file_name(index, format));
        save_frame(frame, &path, format)?;
        written.push(path);
    }

    info!(
        "📸 {} saved to {} ({} file{})",
        naming.base_name(),
        out_dir.display(),
        written.len(),
        if written.len() == 1 { "" } else { "s" }
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::solid_frame;
    use image::Rgba;
    use tempfile::TempDir;

    #[test]
    fn test_flatten_on_white() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        img.put_pixel(1, 0, Rgba([10, 20, 30, 0]));

        let flat = flatten_on_white(&img);
        assert_eq!(flat.dimensions(), (2, 1));
        assert_eq!(flat.get_pixel(0, 0).0, [10, 20, 30]);
        assert_eq!(flat.get_pixel(1, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_sequence_names() {
        let tmp = TempDir::new().unwrap();
        let frames: Vec<Frame> = (0..3).map(solid_frame).collect();
        let naming = NamingContext { category: Category::Equipment, id: 5001 };

        let written = export(ExportTarget::Sequence(&frames), &naming, ExportFormat::Jpeg, tmp.path()).unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Equipment 5001-0.jpg", "Equipment 5001-1.jpg", "Equipment 5001-2.jpg"]);
        assert!(written.iter().all(|p| p.is_file()));
    }

    #[test]
    fn test_single_and_indexed_names() {
        let tmp = TempDir::new().unwrap();
        let frame = solid_frame(1);
        let naming = NamingContext { category: Category::Creature, id: 17 };

        let single = export(ExportTarget::Picture(&frame), &naming, ExportFormat::Bmp, tmp.path()).unwrap();
        assert_eq!(single, vec![tmp.path().join("Mob 17.bmp")]);

        let indexed = export(
            ExportTarget::Frame { index: 3, frame: &frame },
            &naming,
            ExportFormat::Tiff,
            tmp.path(),
        )
        .unwrap();
        assert_eq!(indexed, vec![tmp.path().join("Mob 17-3.tiff")]);

        let decoded = image::open(&single[0]).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
    }

    #[test]
    fn test_empty_sequence_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let naming = NamingContext { category: Category::Creature, id: 17 };

        let result = export(ExportTarget::Sequence(&[]), &naming, ExportFormat::Bmp, &out);
        assert!(matches!(result, Err(ExportError::NothingToExport)));
        assert!(!out.exists());
    }
}
