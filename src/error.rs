//! Error types for the img2pdf library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the img2pdf library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF assembly error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image could not be decoded or re-encoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Date parsing error
    #[error("Invalid date expression: {0}")]
    InvalidDateExpression(String),

    /// Page size could not be parsed or is degenerate
    #[error("Invalid page size: {0}")]
    InvalidPageSize(String),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Image folder does not exist or is not a directory
    #[error("Folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// Nothing to convert
    #[error("No images found in {0}")]
    NoImages(String),

    /// Hand-off to the system print spooler failed
    #[error("Printing failed: {0}")]
    Print(String),

    /// General error
    #[error("{0}")]
    General(String),
}
