//! PDF generation module

pub mod image;
pub mod writer;
pub mod grid;
pub mod dated;
pub mod metadata;

use std::path::{Path, PathBuf};

use crate::error::Result;
use self::image::{scale_down, PreparedImage};

// Re-export commonly used items
pub use grid::{build_grid_pdf, GridOptions};
pub use dated::{build_dated_pdf, DatedOptions};
pub use metadata::count_pages;
pub use writer::{Page, PdfWriter};

/// Outcome of a conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Pages written to the output file
    pub pages: usize,
    /// Images placed on pages
    pub placed: usize,
    /// Images that could not be read, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

/// Decode and scale every image, in order
///
/// With `strict` the first unreadable image aborts the conversion; otherwise
/// it is logged, recorded in `report.skipped` and left out of the layout.
pub(crate) fn prepare_images(
    images: &[PathBuf],
    max_px: (u32, u32),
    quality: u8,
    strict: bool,
    report: &mut BuildReport,
) -> Result<Vec<PreparedImage>> {
    let mut prepared = Vec::with_capacity(images.len());
    for path in images {
        match scale_down(path, max_px.0, max_px.1, quality) {
            Ok(image) => prepared.push(image),
            Err(e) if !strict => {
                log::warn!("Skipping {}: {}", path.display(), e);
                report.skipped.push((path.clone(), e.to_string()));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(prepared)
}

fn title_for(output: &Path) -> Option<String> {
    output.file_stem().map(|s| s.to_string_lossy().into_owned())
}
