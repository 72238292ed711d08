//! Document assembly with lopdf
//!
//! Builds the page tree by hand: every page owns its content stream and a
//! resources dictionary with the Helvetica font and the image XObjects it
//! draws.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::image::{embed, PreparedImage};
use crate::error::Result;
use crate::layout::{PageSetup, Rect};

const FONT_RESOURCE: &str = "F1";

/// A page under construction
#[derive(Debug, Default)]
pub struct Page {
    operations: Vec<Operation>,
    xobjects: Dictionary,
    image_count: usize,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw an embedded image XObject stretched to `rect`
    pub fn draw_image(&mut self, image_id: ObjectId, rect: Rect) {
        let name = format!("Im{}", self.image_count);
        self.image_count += 1;
        self.xobjects.set(name.as_bytes().to_vec(), Object::Reference(image_id));

        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new("cm", vec![
            Object::Real(rect.width),
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(rect.height),
            Object::Real(rect.x),
            Object::Real(rect.y),
        ]));
        self.operations.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        self.operations.push(Operation::new("Q", vec![]));
    }

    /// Draw a single line of black Helvetica text ending at `right_x`
    pub fn draw_text_right(&mut self, text: &str, font_size: f32, right_x: f32, baseline: f32) {
        let x = right_x - helvetica_width(text, font_size);
        self.operations.push(Operation::new("BT", vec![]));
        self.operations.push(Operation::new("rg", vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(0),
        ]));
        self.operations.push(Operation::new("Tf", vec![
            Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
            Object::Real(font_size),
        ]));
        self.operations.push(Operation::new("Td", vec![Object::Real(x), Object::Real(baseline)]));
        self.operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
        self.operations.push(Operation::new("ET", vec![]));
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }
}

/// Approximate advance width of `text` in Helvetica
///
/// Exact for digits and the stamp punctuation; other glyphs use typical
/// Helvetica widths.
pub fn helvetica_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| match c {
        '0'..='9' => 556,
        ' ' | '/' | '.' | ',' | ':' => 278,
        '-' => 333,
        'i' | 'j' | 'l' => 222,
        'A'..='Z' => 667,
        'a'..='z' => 500,
        _ => 556,
    }).sum();
    units as f32 * font_size / 1000.0
}

/// Accumulates pages and writes the finished document
pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    page_ids: Vec<ObjectId>,
    setup: PageSetup,
}

impl PdfWriter {
    pub fn new(setup: PageSetup, title: Option<&str>) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        // Helvetica is one of the standard 14 fonts, so nothing is embedded
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut info = dictionary! {
            "Producer" => Object::string_literal(concat!("img2pdf ", env!("CARGO_PKG_VERSION"))),
        };
        if let Some(title) = title {
            info.set("Title", Object::string_literal(title));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);

        Self {
            doc,
            pages_id,
            font_id,
            page_ids: Vec::new(),
            setup,
        }
    }

    /// Embed a prepared image once; it can then be drawn on any page
    pub fn add_image(&mut self, image: &PreparedImage) -> ObjectId {
        embed(&mut self.doc, image)
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append a finished page
    pub fn push_page(&mut self, page: Page) -> Result<()> {
        let content = Content { operations: page.operations };
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        let resources = dictionary! {
            "Font" => dictionary! { FONT_RESOURCE => self.font_id },
            "XObject" => page.xobjects,
        };

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.setup.size.width.pt()),
                Object::Real(self.setup.size.height.pt()),
            ],
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Write the page tree and catalog, then save to `path`
    ///
    /// Returns the number of pages written.
    pub fn save(mut self, path: &Path) -> Result<usize> {
        let count = self.page_ids.len();
        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();

        self.doc.objects.insert(self.pages_id, Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count as i64,
        }));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        self.doc.compress();
        self.doc.save(path)?;
        log::debug!("Saved {} pages to {}", count, path.display());
        Ok(count)
    }
}
