//! img2pdf CLI tool
//!
//! Combines a folder of images into a PDF laid out as a grid or as dated pages.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};

use img2pdf::date::{format_stamp, parse_date_expression};
use img2pdf::discover::{resolve_source, ImageSet};
use img2pdf::layout::{Length, Margins, Orientation, PageSetup, PageSize};
use img2pdf::logging::{init_logging, level_from_flags};
use img2pdf::output::{open_file, print_file};
use img2pdf::pdf::metadata::summarize;
use img2pdf::pdf::{build_dated_pdf, build_grid_pdf, BuildReport, DatedOptions, GridOptions};
use img2pdf::Error;

/// img2pdf - Combine a folder of images into one PDF
#[derive(Parser)]
#[command(name = "img2pdf")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Four images per page, US Letter
    img2pdf grid ~/Pictures/receipts -o receipts.pdf

    # Two images per page stamped with today's date, then preview it
    img2pdf dated ./site-photos -o site.pdf --date today --open

    # A4 landscape from a glob, sent straight to a printer
    img2pdf grid \"shots/*.png\" -o shots.pdf --page-size a4 --orientation landscape --print --printer office")]
struct Cli {
    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the images that would be converted
    Scan {
        /// Image folder, or a glob pattern like "shots/*.png"
        source: String,
    },

    /// Lay images out two per row, two rows per page
    Grid {
        /// Image folder, or a glob pattern like "shots/*.png"
        source: String,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        page: PageSetupArgs,
    },

    /// Place two images per page under a date stamp
    Dated {
        /// Image folder, or a glob pattern like "shots/*.png"
        source: String,

        /// Date stamp (e.g., "today", "yesterday", "friday", "2026-01-14", "01/14/2026", "none")
        #[arg(long, default_value = "today")]
        date: String,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        page: PageSetupArgs,
    },

    /// Show information about a generated PDF
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

/// Page setup, the equivalent of the printer's page dialog
#[derive(Args)]
struct PageSetupArgs {
    /// Page size: letter, a4, or WxH with an optional unit (pt, mm, in), e.g. "4x6in"
    #[arg(long, env = "IMG2PDF_PAGE_SIZE", default_value = "letter", value_parser = parse_page_size)]
    page_size: PageSize,

    /// Page orientation: portrait or landscape
    #[arg(long, env = "IMG2PDF_ORIENTATION", default_value = "portrait", value_parser = parse_orientation)]
    orientation: Orientation,

    /// Margin on every side, in points
    #[arg(long, env = "IMG2PDF_MARGIN", default_value_t = 0.0)]
    margin: f32,
}

impl PageSetupArgs {
    fn to_setup(&self) -> Result<PageSetup> {
        if !(self.margin >= 0.0) {
            anyhow::bail!("Margin must be zero or positive, got {}", self.margin);
        }
        let size = self.page_size.oriented(self.orientation);
        let setup = PageSetup::new(size, Margins::uniform(Length::from_pt(self.margin)));
        let content = setup.content_rect();
        if content.width <= 0.0 || content.height <= 0.0 {
            anyhow::bail!("Margin of {}pt leaves no room on the page", self.margin);
        }
        Ok(setup)
    }
}

/// Where the PDF goes and what happens to it afterwards
#[derive(Args)]
struct OutputArgs {
    /// Output PDF file path
    #[arg(short, long)]
    output: PathBuf,

    /// Open the output file after creation (print preview)
    #[arg(long)]
    open: bool,

    /// Send the output file to the system print spooler
    #[arg(long)]
    print: bool,

    /// Printer name for --print (system default when omitted)
    #[arg(long, requires = "print")]
    printer: Option<String>,

    /// Fail on the first unreadable image instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Write a PDF even when no images were found
    #[arg(long)]
    allow_empty: bool,

    /// JPEG quality of embedded images (1-100)
    #[arg(long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,
}

fn parse_page_size(s: &str) -> std::result::Result<PageSize, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

fn parse_orientation(s: &str) -> std::result::Result<Orientation, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

fn main() {
    let cli = Cli::parse();
    init_logging(level_from_flags(cli.verbose, cli.quiet));

    let result = match cli.command {
        Commands::Scan { source } => cmd_scan(&source),
        Commands::Grid { source, output, page } => cmd_grid(&source, &output, &page),
        Commands::Dated { source, date, output, page } => cmd_dated(&source, &date, &output, &page),
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        process::exit(1);
    }
}

/// Discover images and refuse to continue on an empty set unless allowed
fn load_images(source: &str, allow_empty: bool) -> Result<ImageSet> {
    let images = resolve_source(source)
        .with_context(|| format!("Could not read images from {}", source))?;
    log::info!("{}", images.status_line());

    if images.is_empty() && !allow_empty {
        return Err(Error::NoImages(source.to_string()).into());
    }
    Ok(images)
}

/// Open and/or print the finished file, then report skipped images
fn finish(output: &OutputArgs, report: &BuildReport) -> Result<()> {
    log::info!("Output: {}", output.output.display());
    for (path, reason) in &report.skipped {
        log::warn!("Skipped {}: {}", path.display(), reason);
    }

    if output.open {
        open_file(&output.output).context("Could not open the PDF viewer")?;
    }
    if output.print {
        print_file(&output.output, output.printer.as_deref())?;
        log::info!("Sent to {}", output.printer.as_deref().unwrap_or("default printer"));
    }
    Ok(())
}

fn cmd_scan(source: &str) -> Result<()> {
    let images = resolve_source(source)
        .with_context(|| format!("Could not read images from {}", source))?;

    println!("{}", images.status_line());
    for path in images.paths() {
        log::debug!("{}", path.display());
    }
    Ok(())
}

fn cmd_grid(source: &str, output: &OutputArgs, page: &PageSetupArgs) -> Result<()> {
    let images = load_images(source, output.allow_empty)?;

    let options = GridOptions {
        setup: page.to_setup()?,
        jpeg_quality: output.quality,
        strict: output.strict,
        ..Default::default()
    };

    log::info!("Building grid PDF from {} images...", images.len());
    let report = build_grid_pdf(images.paths(), &output.output, &options)
        .with_context(|| format!("Failed to build {}", output.output.display()))?;

    finish(output, &report)
}

fn cmd_dated(source: &str, date: &str, output: &OutputArgs, page: &PageSetupArgs) -> Result<()> {
    let images = load_images(source, output.allow_empty)?;

    let date = parse_date_expression(date)?.resolve();
    if let Some(ref d) = date {
        log::info!("Stamping pages with {}", format_stamp(d));
    }

    let options = DatedOptions {
        setup: page.to_setup()?,
        date,
        jpeg_quality: output.quality,
        strict: output.strict,
        ..Default::default()
    };

    log::info!("Building dated PDF from {} images...", images.len());
    let report = build_dated_pdf(images.paths(), &output.output, &options)
        .with_context(|| format!("Failed to build {}", output.output.display()))?;

    finish(output, &report)
}

fn cmd_info(input: &Path) -> Result<()> {
    let summary = summarize(input)?;

    println!("File: {}", input.display());
    println!("Pages: {}", summary.page_count);
    println!("Images: {}", summary.image_count);
    if let Some(title) = summary.title {
        println!("Title: {}", title);
    }
    Ok(())
}
