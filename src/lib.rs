//! img2pdf Library
//!
//! Combines a folder of images into a single paginated PDF.
//! This library provides functionality to:
//! - Discover the PNG/JPEG images in a folder (or matching a glob)
//! - Lay them out two-by-two in a grid, or two per page with a date stamp
//! - Parse flexible date expressions for the stamp
//! - Open the result in a viewer or hand it to the print spooler
//!
//! # Example
//!
//! ```no_run
//! use img2pdf::discover::discover_images;
//! use img2pdf::pdf::{build_grid_pdf, GridOptions};
//! use std::path::Path;
//!
//! let images = discover_images(Path::new("photos")).expect("Failed to scan folder");
//! let report = build_grid_pdf(images.paths(), Path::new("photos.pdf"), &GridOptions::default())
//!     .expect("Failed to build PDF");
//! println!("{} pages", report.pages);
//! ```

pub mod error;
pub mod discover;
pub mod layout;
pub mod date;
pub mod pdf;
pub mod output;
pub mod logging;

// Re-export commonly used items
pub use error::{Error, Result};
