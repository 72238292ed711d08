//! Page layout calculations
//!
//! All values are PDF points (1/72 inch) with the origin at the bottom-left
//! corner of the page.

use std::str::FromStr;

use crate::error::{Error, Result};

/// Simple length type in points
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Length(pub f32);

impl Length {
    pub fn from_pt(pt: f32) -> Self {
        Length(pt)
    }

    pub fn from_mm(mm: f32) -> Self {
        Length(mm * 72.0 / 25.4)
    }

    pub fn from_inches(inches: f32) -> Self {
        Length(inches * 72.0)
    }

    pub fn pt(&self) -> f32 {
        self.0
    }

    pub fn mm(&self) -> f32 {
        self.0 * 25.4 / 72.0
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" | "p" => Ok(Orientation::Portrait),
            "landscape" | "l" => Ok(Orientation::Landscape),
            other => Err(Error::InvalidPageSize(format!("Unknown orientation: {}", other))),
        }
    }
}

/// Page dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: Length,
    pub height: Length,
}

impl PageSize {
    /// US Letter size (8.5" × 11")
    pub fn letter() -> Self {
        Self {
            width: Length::from_inches(8.5),
            height: Length::from_inches(11.0),
        }
    }

    /// A4 size (8.27" × 11.67", as the printer dialogs round it)
    pub fn a4() -> Self {
        Self {
            width: Length::from_inches(8.27),
            height: Length::from_inches(11.67),
        }
    }

    pub fn custom(width: Length, height: Length) -> Result<Self> {
        if !(width.pt() > 0.0 && height.pt() > 0.0) {
            return Err(Error::InvalidPageSize(format!(
                "{}x{}pt must be positive",
                width.pt(),
                height.pt()
            )));
        }
        Ok(Self { width, height })
    }

    /// Apply an orientation, swapping sides so the long edge matches it
    pub fn oriented(self, orientation: Orientation) -> Self {
        let long_is_height = self.height.pt() >= self.width.pt();
        match (orientation, long_is_height) {
            (Orientation::Portrait, true) | (Orientation::Landscape, false) => self,
            _ => Self {
                width: self.height,
                height: self.width,
            },
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::letter()
    }
}

impl FromStr for PageSize {
    type Err = Error;

    /// Parse `letter`, `a4`, or `WxH` with an optional unit suffix (`pt`, `mm`, `in`)
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "letter" | "us-letter" => return Ok(Self::letter()),
            "a4" => return Ok(Self::a4()),
            _ => {}
        }

        let (dims, unit): (&str, fn(f32) -> Length) = if let Some(d) = s.strip_suffix("mm") {
            (d, Length::from_mm)
        } else if let Some(d) = s.strip_suffix("in") {
            (d, Length::from_inches)
        } else if let Some(d) = s.strip_suffix("pt") {
            (d, Length::from_pt)
        } else {
            (s.as_str(), Length::from_pt)
        };

        let (w, h) = dims.split_once('x')
            .ok_or_else(|| Error::InvalidPageSize(format!("Expected letter, a4 or WxH: {}", s)))?;
        let parse = |v: &str| -> Result<f32> {
            v.trim().parse::<f32>()
                .map_err(|_| Error::InvalidPageSize(format!("Invalid dimension: {}", v)))
        };

        Self::custom(unit(parse(w)?), unit(parse(h)?))
    }
}

/// Margins for page content
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: Length,
    pub bottom: Length,
    pub left: Length,
    pub right: Length,
}

impl Margins {
    /// Create margins with same value on all sides
    pub fn uniform(margin: Length) -> Self {
        Self {
            top: margin,
            bottom: margin,
            left: margin,
            right: margin,
        }
    }

    pub fn none() -> Self {
        Self::uniform(Length(0.0))
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::none()
    }
}

/// An axis-aligned rectangle; `y` is the bottom edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Shrink on every side, never below zero size
    pub fn inset(&self, amount: f32) -> Rect {
        let dx = amount.min(self.width / 2.0);
        let dy = amount.min(self.height / 2.0);
        Rect::new(self.x + dx, self.y + dy, self.width - 2.0 * dx, self.height - 2.0 * dy)
    }

    /// A `width` × `height` rect centered inside this one
    pub fn center(&self, width: f32, height: f32) -> Rect {
        Rect::new(
            self.x + (self.width - width) / 2.0,
            self.y + (self.height - height) / 2.0,
            width,
            height,
        )
    }

    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f32 = 0.01;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.top() <= self.top() + EPS
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right() && other.x < self.right()
            && self.y < other.top() && other.y < self.top()
    }
}

/// Page size plus margins, as chosen in page setup
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageSetup {
    pub size: PageSize,
    pub margins: Margins,
}

impl PageSetup {
    pub fn new(size: PageSize, margins: Margins) -> Self {
        Self { size, margins }
    }

    /// The printable area inside the margins
    pub fn content_rect(&self) -> Rect {
        let m = &self.margins;
        Rect::new(
            m.left.pt(),
            m.bottom.pt(),
            (self.size.width.pt() - m.left.pt() - m.right.pt()).max(0.0),
            (self.size.height.pt() - m.top.pt() - m.bottom.pt()).max(0.0),
        )
    }
}

/// Scale `(src_w, src_h)` to the largest size fitting in the box, keeping aspect ratio
pub fn fit_within(src_w: f32, src_h: f32, box_w: f32, box_h: f32) -> (f32, f32) {
    if src_w <= 0.0 || src_h <= 0.0 || box_w <= 0.0 || box_h <= 0.0 {
        return (0.0, 0.0);
    }
    let scale = (box_w / src_w).min(box_h / src_h);
    (src_w * scale, src_h * scale)
}

/// Split items into pages of `stride`; the last page may be short
pub fn chunk_pages<T>(items: &[T], stride: usize) -> Vec<&[T]> {
    if stride == 0 {
        return Vec::new();
    }
    items.chunks(stride).collect()
}

/// Smallest image box (either side, in points) a layout will accept
pub const MIN_SLOT_SIZE: f32 = 36.0;

/// Two-column table grid, two rows per page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub setup: PageSetup,
    pub columns: usize,
    pub rows_per_page: usize,
    /// Space between the content area and the table
    pub table_margin: f32,
    /// Space between adjacent cells and the table edge
    pub cell_spacing: f32,
    /// Space inside each cell around the image
    pub cell_padding: f32,
}

impl GridLayout {
    pub fn new(setup: PageSetup) -> Self {
        Self {
            setup,
            columns: 2,
            rows_per_page: 2,
            table_margin: 4.0,
            cell_spacing: 2.0,
            cell_padding: 5.0,
        }
    }

    pub fn slots_per_page(&self) -> usize {
        self.columns * self.rows_per_page
    }

    /// At least one page, so an empty export is still a valid document
    pub fn pages_needed(&self, images: usize) -> usize {
        images.div_ceil(self.slots_per_page()).max(1)
    }

    fn table_rect(&self) -> Rect {
        self.setup.content_rect().inset(self.table_margin)
    }

    /// Outer rect of the cell for `slot`, filled row by row from the top-left
    pub fn cell_rect(&self, slot: usize) -> Option<Rect> {
        if slot >= self.slots_per_page() {
            return None;
        }
        let table = self.table_rect();
        let cols = self.columns as f32;
        let rows = self.rows_per_page as f32;
        let s = self.cell_spacing;

        let cell_w = ((table.width - s * (cols + 1.0)) / cols).max(0.0);
        let cell_h = ((table.height - s * (rows + 1.0)) / rows).max(0.0);

        let col = (slot % self.columns) as f32;
        let row = (slot / self.columns) as f32;
        let x = table.x + s + col * (cell_w + s);
        let top = table.top() - s - row * (cell_h + s);

        Some(Rect::new(x, top - cell_h, cell_w, cell_h))
    }

    /// Reject page setups whose cells would be too small to see
    pub fn validate(&self) -> Result<()> {
        let area = self.cell_rect(0)
            .map(|cell| cell.inset(self.cell_padding))
            .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
        if area.width < MIN_SLOT_SIZE || area.height < MIN_SLOT_SIZE {
            return Err(Error::InvalidPageSize(format!(
                "grid cells of {}x{}pt are too small; need at least {}pt",
                area.width, area.height, MIN_SLOT_SIZE
            )));
        }
        Ok(())
    }

    /// Where an image of the given pixel size is drawn in `slot`
    pub fn image_rect(&self, slot: usize, img_w: u32, img_h: u32) -> Option<Rect> {
        let area = self.cell_rect(slot)?.inset(self.cell_padding);
        let (w, h) = fit_within(img_w as f32, img_h as f32, area.width, area.height);
        Some(area.center(w, h))
    }
}

/// Up to two images per page under a right-aligned date stamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedLayout {
    pub setup: PageSetup,
    /// Distance from the right content edge to the end of the stamp
    pub stamp_right_margin: f32,
    /// Distance from the top content edge to the stamp baseline
    pub stamp_baseline_offset: f32,
    pub stamp_font_size: f32,
    /// Height of the band reserved for the stamp above the first image
    pub stamp_band: f32,
    /// Gap between the first and second image on a page
    pub image_gap: f32,
}

impl DatedLayout {
    pub const IMAGES_PER_PAGE: usize = 2;

    pub fn new(setup: PageSetup) -> Self {
        Self {
            setup,
            stamp_right_margin: 25.0,
            stamp_baseline_offset: 24.0,
            stamp_font_size: 12.0,
            stamp_band: 36.0,
            image_gap: 50.0,
        }
    }

    pub fn pages_needed(&self, images: usize) -> usize {
        images.div_ceil(Self::IMAGES_PER_PAGE).max(1)
    }

    /// Right edge and baseline of the date stamp
    pub fn stamp_anchor(&self) -> (f32, f32) {
        let content = self.setup.content_rect();
        (
            content.right() - self.stamp_right_margin,
            content.top() - self.stamp_baseline_offset,
        )
    }

    /// Target image height: 1/2.5 of the page, shrunk if two would not fit
    pub fn slot_height(&self) -> f32 {
        let content = self.setup.content_rect();
        let available = (content.height - self.stamp_band - self.image_gap) / 2.0;
        (self.setup.size.height.pt() / 2.5).min(available).max(0.0)
    }

    /// Reject page setups whose image slots would be too small to see
    pub fn validate(&self) -> Result<()> {
        let content = self.setup.content_rect();
        let slot_h = self.slot_height();
        if slot_h < MIN_SLOT_SIZE || content.width < MIN_SLOT_SIZE {
            return Err(Error::InvalidPageSize(format!(
                "content area {}x{}pt leaves {}pt per image; dated pages need at least {}pt",
                content.width, content.height, slot_h, MIN_SLOT_SIZE
            )));
        }
        Ok(())
    }

    /// Where an image of the given pixel size is drawn in `slot` (0 or 1)
    pub fn image_rect(&self, slot: usize, img_w: u32, img_h: u32) -> Option<Rect> {
        if slot >= Self::IMAGES_PER_PAGE {
            return None;
        }
        let content = self.setup.content_rect();
        let slot_h = self.slot_height();
        let top = content.top() - self.stamp_band - slot as f32 * (slot_h + self.image_gap);
        let band = Rect::new(content.x, top - slot_h, content.width, slot_h);

        let (w, h) = fit_within(img_w as f32, img_h as f32, band.width, band.height);
        // Images hang from the top of their band and are centered horizontally
        Some(Rect::new(band.x + (band.width - w) / 2.0, band.top() - h, w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        let len = Length::from_inches(1.0);
        assert!((len.mm() - 25.4).abs() < 0.01);
        assert!((len.pt() - 72.0).abs() < 0.01);
        assert!((Length::from_mm(25.4).pt() - 72.0).abs() < 0.01);
    }

    #[test]
    fn test_letter_size() {
        let letter = PageSize::letter();
        assert!((letter.width.pt() - 612.0).abs() < 0.01);
        assert!((letter.height.pt() - 792.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!("Letter".parse::<PageSize>().unwrap(), PageSize::letter());
        assert_eq!("a4".parse::<PageSize>().unwrap(), PageSize::a4());

        let custom: PageSize = "400x600".parse().unwrap();
        assert_eq!(custom.width.pt(), 400.0);
        assert_eq!(custom.height.pt(), 600.0);

        let inches: PageSize = "4x6in".parse().unwrap();
        assert!((inches.width.pt() - 288.0).abs() < 0.01);
        assert!((inches.height.pt() - 432.0).abs() < 0.01);

        let mm: PageSize = "210x297mm".parse().unwrap();
        assert!((mm.width.mm() - 210.0).abs() < 0.01);

        assert!("tabloid".parse::<PageSize>().is_err());
        assert!("0x100".parse::<PageSize>().is_err());
        assert!("axb".parse::<PageSize>().is_err());
    }

    #[test]
    fn test_orientation() {
        let landscape = PageSize::letter().oriented(Orientation::Landscape);
        assert_eq!(landscape.width.pt(), 792.0);
        assert_eq!(landscape.height.pt(), 612.0);
        assert_eq!(landscape.oriented(Orientation::Portrait), PageSize::letter());
        assert_eq!(PageSize::letter().oriented(Orientation::Portrait), PageSize::letter());
        assert_eq!("Landscape".parse::<Orientation>().unwrap(), Orientation::Landscape);
        assert!("sideways".parse::<Orientation>().is_err());
    }

    #[test]
    fn test_content_rect_with_margins() {
        let setup = PageSetup::new(PageSize::letter(), Margins::uniform(Length(36.0)));
        let content = setup.content_rect();
        assert_eq!(content, Rect::new(36.0, 36.0, 540.0, 720.0));
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        let (w, h) = fit_within(4000.0, 3000.0, 300.0, 400.0);
        assert!((w - 300.0).abs() < 0.01);
        assert!((h - 225.0).abs() < 0.01);

        let (w, h) = fit_within(100.0, 200.0, 300.0, 300.0);
        assert!((w - 150.0).abs() < 0.01);
        assert!((h - 300.0).abs() < 0.01);
        assert!((w / h - 0.5).abs() < 1e-4);

        assert_eq!(fit_within(0.0, 10.0, 100.0, 100.0), (0.0, 0.0));
        assert_eq!(fit_within(10.0, 10.0, 0.0, 100.0), (0.0, 0.0));
    }

    #[test]
    fn test_chunk_pages_short_tail() {
        let items = [1, 2, 3, 4, 5];
        let pages = chunk_pages(&items, 4);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1], &[5]);
        assert!(chunk_pages(&items, 0).is_empty());
        assert!(chunk_pages::<i32>(&[], 2).is_empty());
    }

    #[test]
    fn test_grid_pages_needed() {
        let grid = GridLayout::new(PageSetup::default());
        assert_eq!(grid.pages_needed(0), 1);
        assert_eq!(grid.pages_needed(4), 1);
        assert_eq!(grid.pages_needed(5), 2);
        assert_eq!(grid.pages_needed(9), 3);
    }

    #[test]
    fn test_grid_cells_inside_page_and_disjoint() {
        let grid = GridLayout::new(PageSetup::default());
        let content = grid.setup.content_rect();
        let cells: Vec<Rect> = (0..4).map(|s| grid.cell_rect(s).unwrap()).collect();

        for (i, a) in cells.iter().enumerate() {
            assert!(content.contains(a), "cell {} escapes the page", i);
            for b in &cells[i + 1..] {
                assert!(!a.overlaps(b));
            }
        }
        // Row-major from the top-left
        assert!(cells[0].x < cells[1].x);
        assert!(cells[0].y > cells[2].y);
        assert_eq!(cells[0].x, cells[2].x);
        assert!(grid.cell_rect(4).is_none());
    }

    #[test]
    fn test_grid_image_centered_in_cell() {
        let grid = GridLayout::new(PageSetup::default());
        let cell = grid.cell_rect(3).unwrap();
        let img = grid.image_rect(3, 300, 200).unwrap();
        assert!(cell.contains(&img));
        assert!((img.width / img.height - 1.5).abs() < 1e-3);
        let cx = img.x + img.width / 2.0;
        assert!((cx - (cell.x + cell.width / 2.0)).abs() < 0.01);
    }

    #[test]
    fn test_dated_layout_letter() {
        let dated = DatedLayout::new(PageSetup::default());
        assert_eq!(dated.pages_needed(3), 2);
        assert_eq!(dated.pages_needed(0), 1);
        assert!((dated.slot_height() - 792.0 / 2.5).abs() < 0.01);

        let first = dated.image_rect(0, 400, 300).unwrap();
        let second = dated.image_rect(1, 400, 300).unwrap();
        let content = dated.setup.content_rect();
        assert!(content.contains(&first));
        assert!(content.contains(&second));
        assert!(first.y - second.top() >= dated.image_gap - 0.01);
        assert!(dated.image_rect(2, 400, 300).is_none());

        let (right, baseline) = dated.stamp_anchor();
        assert_eq!(right, 612.0 - 25.0);
        assert!(baseline > first.top());
    }

    #[test]
    fn test_dated_rejects_pages_without_room_for_images() {
        // 280x80pt of content: less than the stamp band plus the image gap
        let setup = PageSetup::new("600x400".parse().unwrap(), Margins::uniform(Length(160.0)));
        let dated = DatedLayout::new(setup);
        assert_eq!(dated.slot_height(), 0.0);
        assert!(matches!(dated.validate(), Err(Error::InvalidPageSize(_))));

        assert!(DatedLayout::new(PageSetup::default()).validate().is_ok());
    }

    #[test]
    fn test_grid_rejects_tiny_cells() {
        let setup = PageSetup::new("100x100".parse().unwrap(), Margins::none());
        assert!(matches!(GridLayout::new(setup).validate(), Err(Error::InvalidPageSize(_))));
        assert!(GridLayout::new(PageSetup::default()).validate().is_ok());
    }

    #[test]
    fn test_dated_slot_shrinks_on_small_pages() {
        let setup = PageSetup::new("300x300".parse().unwrap(), Margins::none());
        let dated = DatedLayout::new(setup);
        assert!(dated.validate().is_ok());
        let second = dated.image_rect(1, 100, 100).unwrap();
        assert!(setup.content_rect().contains(&second));
    }
}
