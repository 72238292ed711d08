//! Two-column grid layout: four images per page

use std::path::{Path, PathBuf};

use super::image::DEFAULT_JPEG_QUALITY;
use super::writer::{Page, PdfWriter};
use super::{prepare_images, title_for, BuildReport};
use crate::error::Result;
use crate::layout::{chunk_pages, GridLayout, PageSetup};

/// Options for building a grid PDF
#[derive(Debug, Clone)]
pub struct GridOptions {
    /// Page size and margins
    pub setup: PageSetup,
    /// Pixel bound each image is downscaled to before embedding
    pub max_image_px: (u32, u32),
    /// JPEG quality of the embedded images
    pub jpeg_quality: u8,
    /// Abort on the first unreadable image instead of skipping it
    pub strict: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            setup: PageSetup::default(),
            max_image_px: (300, 400),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            strict: false,
        }
    }
}

/// Build a PDF with the images in a 2x2 grid on each page
///
/// Images fill cells row by row; the last page is left partly empty when the
/// image count is not a multiple of four. An empty list produces one blank
/// page.
///
/// # Example
///
/// ```no_run
/// use img2pdf::pdf::{build_grid_pdf, GridOptions};
/// use std::path::{Path, PathBuf};
///
/// let images = vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")];
/// build_grid_pdf(&images, Path::new("grid.pdf"), &GridOptions::default())
///     .expect("Failed to build grid PDF");
/// ```
pub fn build_grid_pdf(images: &[PathBuf], output: &Path, options: &GridOptions) -> Result<BuildReport> {
    let layout = GridLayout::new(options.setup);
    layout.validate()?;
    let mut report = BuildReport::default();

    let prepared = prepare_images(
        images,
        options.max_image_px,
        options.jpeg_quality,
        options.strict,
        &mut report,
    )?;

    let title = title_for(output);
    let mut writer = PdfWriter::new(options.setup, title.as_deref());

    for chunk in chunk_pages(&prepared, layout.slots_per_page()) {
        let mut page = Page::new();
        for (slot, image) in chunk.iter().enumerate() {
            let Some(rect) = layout.image_rect(slot, image.width_px, image.height_px) else {
                break;
            };
            let image_id = writer.add_image(image);
            page.draw_image(image_id, rect);
            report.placed += 1;
        }
        writer.push_page(page)?;
    }

    if writer.page_count() == 0 {
        writer.push_page(Page::new())?;
    }

    debug_assert_eq!(writer.page_count(), layout.pages_needed(prepared.len()));
    report.pages = writer.save(output)?;

    log::info!(
        "Placed {} images on {} pages ({} skipped)",
        report.placed,
        report.pages,
        report.skipped.len()
    );
    Ok(report)
}
