//! Dated layout: up to two images per page under a date stamp

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::image::DEFAULT_JPEG_QUALITY;
use super::writer::{Page, PdfWriter};
use super::{prepare_images, title_for, BuildReport};
use crate::date::format_stamp;
use crate::error::Result;
use crate::layout::{chunk_pages, DatedLayout, PageSetup};

/// Options for building a dated PDF
#[derive(Debug, Clone)]
pub struct DatedOptions {
    /// Page size and margins
    pub setup: PageSetup,
    /// Date stamped at the top right of every page; no stamp when `None`
    pub date: Option<NaiveDate>,
    /// Pixel bound each image is downscaled to before embedding
    pub max_image_px: (u32, u32),
    /// JPEG quality of the embedded images
    pub jpeg_quality: u8,
    /// Abort on the first unreadable image instead of skipping it
    pub strict: bool,
}

impl Default for DatedOptions {
    fn default() -> Self {
        Self {
            setup: PageSetup::default(),
            date: None,
            // A letter-size slot at roughly 150 dpi
            max_image_px: (1600, 1600),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            strict: false,
        }
    }
}

/// Build a PDF with two images per page and a date stamp on each page
pub fn build_dated_pdf(images: &[PathBuf], output: &Path, options: &DatedOptions) -> Result<BuildReport> {
    let layout = DatedLayout::new(options.setup);
    layout.validate()?;
    let mut report = BuildReport::default();

    let prepared = prepare_images(
        images,
        options.max_image_px,
        options.jpeg_quality,
        options.strict,
        &mut report,
    )?;

    let stamp = options.date.as_ref().map(format_stamp);
    let title = title_for(output);
    let mut writer = PdfWriter::new(options.setup, title.as_deref());

    let new_page = || {
        let mut page = Page::new();
        if let Some(ref text) = stamp {
            let (right, baseline) = layout.stamp_anchor();
            page.draw_text_right(text, layout.stamp_font_size, right, baseline);
        }
        page
    };

    for chunk in chunk_pages(&prepared, DatedLayout::IMAGES_PER_PAGE) {
        let mut page = new_page();
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
        writer.push_page(new_page())?;
    }

    report.pages = writer.save(output)?;

    log::info!(
        "Placed {} images on {} dated pages{}",
        report.placed,
        report.pages,
        stamp.map(|s| format!(" ({})", s)).unwrap_or_default()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use lopdf::Document;
    use tempfile::TempDir;

    fn write_images(dir: &Path, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = dir.join(format!("img{}.png", i));
                RgbImage::from_pixel(64, 48, Rgb([i as u8 * 20, 80, 160])).save(&path).unwrap();
                path
            })
            .collect()
    }

    fn page_text(doc: &Document, page_number: u32) -> String {
        let page_id = doc.get_pages()[&page_number];
        String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
    }

    #[test]
    fn test_stamp_on_every_page() {
        let dir = TempDir::new().unwrap();
        let images = write_images(dir.path(), 3);
        let output = dir.path().join("dated.pdf");

        let options = DatedOptions {
            date: NaiveDate::from_ymd_opt(2024, 3, 9),
            ..Default::default()
        };
        let report = build_dated_pdf(&images, &output, &options).unwrap();
        assert_eq!(report.pages, 2);
        assert_eq!(report.placed, 3);

        let doc = Document::load(&output).unwrap();
        for page in 1..=2 {
            assert!(page_text(&doc, page).contains("(03/09/2024) Tj"));
        }
    }

    #[test]
    fn test_no_date_means_no_stamp() {
        let dir = TempDir::new().unwrap();
        let images = write_images(dir.path(), 2);
        let output = dir.path().join("plain.pdf");

        let report = build_dated_pdf(&images, &output, &DatedOptions::default()).unwrap();
        assert_eq!(report.pages, 1);

        let doc = Document::load(&output).unwrap();
        let content = page_text(&doc, 1);
        assert!(!content.contains("Tj"));
        assert_eq!(content.matches(" Do").count(), 2);
    }

    #[test]
    fn test_empty_input_still_stamps_one_page() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("empty.pdf");
        let options = DatedOptions {
            date: NaiveDate::from_ymd_opt(2025, 12, 1),
            ..Default::default()
        };

        let report = build_dated_pdf(&[], &output, &options).unwrap();
        assert_eq!(report.pages, 1);
        assert_eq!(report.placed, 0);

        let doc = Document::load(&output).unwrap();
        assert!(page_text(&doc, 1).contains("12/01/2025"));
    }

    #[test]
    fn test_page_too_short_for_images_is_rejected() {
        use crate::error::Error;
        use crate::layout::{Length, Margins};

        let dir = TempDir::new().unwrap();
        let images = write_images(dir.path(), 1);
        let output = dir.path().join("squashed.pdf");
        let options = DatedOptions {
            setup: PageSetup::new("600x400".parse().unwrap(), Margins::uniform(Length(160.0))),
            ..Default::default()
        };

        let result = build_dated_pdf(&images, &output, &options);
        assert!(matches!(result, Err(Error::InvalidPageSize(_))));
        assert!(!output.exists());
    }
}
