//! Reading back generated PDFs

use std::path::Path;

use lopdf::{Document, Object};

use crate::error::{Error, Result};

/// Summary of a PDF on disk
#[derive(Debug, Clone)]
pub struct PdfSummary {
    /// Number of pages in the PDF
    pub page_count: usize,
    /// Image XObjects referenced from page resources
    pub image_count: usize,
    /// Document title (if present)
    pub title: Option<String>,
}

/// Count the pages of a PDF
pub fn count_pages(path: &Path) -> Result<usize> {
    Ok(summarize(path)?.page_count)
}

/// Load a PDF and report its page count, embedded images, and title
pub fn summarize(path: &Path) -> Result<PdfSummary> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let pages = doc.get_pages();

    let mut image_count = 0;
    for page_id in pages.values() {
        let page = doc.get_dictionary(*page_id)?;
        // Pages without resources carry no images
        let Ok(resources) = page.get(b"Resources").and_then(|r| resolve_dict(&doc, r)) else {
            continue;
        };
        if let Ok(xobjects) = resources.get(b"XObject").and_then(|x| resolve_dict(&doc, x)) {
            // Every XObject we write is an image
            image_count += xobjects.len();
        }
    }

    // Info is usually an indirect reference from the trailer
    let title = doc.trailer.get(b"Info")
        .and_then(|info| resolve_dict(&doc, info))
        .and_then(|info| info.get(b"Title"))
        .and_then(Object::as_str)
        .map(|t| String::from_utf8_lossy(t).into_owned())
        .ok();

    Ok(PdfSummary {
        page_count: pages.len(),
        image_count,
        title,
    })
}

fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> lopdf::Result<&'a lopdf::Dictionary> {
    match object {
        Object::Reference(id) => doc.get_dictionary(*id),
        other => other.as_dict(),
    }
}
