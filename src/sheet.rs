//! Sheet layout: tile the finished photo onto a printable sheet with cutting
//! guides and registration marks.
//!
//! Preview and export use the identical algorithm parameterized only by dpi,
//! so a 150 dpi preview and a 300 dpi export always show the same geometry.

use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};
use tracing::debug;

use crate::codec;
use crate::error::PhotoSheetError;
use crate::spec::{mm_to_pixels, PhysicalSpec, SheetSpec};

/// Default outer margin around the tile grid.
pub const DEFAULT_MARGIN_MM: f64 = 5.0;
/// Default gap between adjacent tiles.
pub const DEFAULT_GAP_MM: f64 = 2.0;
/// Arm length of the L-shaped registration marks.
pub const MARK_LENGTH_MM: f64 = 3.0;

/// Thin separator stroke around each tile.
const SEPARATOR_COLOR: [u8; 3] = [224, 224, 224];
/// Registration mark stroke.
const MARK_COLOR: [u8; 3] = [204, 204, 204];

/// How many copies of a photo fit on a sheet, and under which margins.
///
/// Carries the margin and gap it was computed with so a caller holding only
/// the layout can reconstruct the grid geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileGridLayout {
    /// Number of columns.
    pub cols: u32,
    /// Number of rows.
    pub rows: u32,
    /// Total tile count, `cols * rows`.
    pub total: u32,
    /// Outer margin the layout was computed with, millimeters.
    pub margin_mm: f64,
    /// Inter-tile gap the layout was computed with, millimeters.
    pub gap_mm: f64,
}

/// Compute the largest grid of photo tiles that fits the sheet.
///
/// N tiles across need N photo widths plus N-1 gaps inside the margins, so
/// `cols = floor((sheetW - 2*margin + gap) / (photoW + gap))`, analogously
/// for rows. A zero count is a valid result, not an error: the photo simply
/// does not fit and the caller reports "0 photos fit".
pub fn compute_layout(
    photo: &PhysicalSpec,
    sheet: &SheetSpec,
    margin_mm: f64,
    gap_mm: f64,
) -> Result<TileGridLayout, PhotoSheetError> {
    photo.validate()?;
    sheet.validate()?;
    if margin_mm < 0.0 || gap_mm < 0.0 {
        return Err(PhotoSheetError::InvalidSpec(format!(
            "negative margin ({margin_mm}mm) or gap ({gap_mm}mm)"
        )));
    }

    let cols = ((sheet.width_mm - 2.0 * margin_mm + gap_mm) / (photo.width_mm + gap_mm))
        .floor()
        .max(0.0) as u32;
    let rows = ((sheet.height_mm - 2.0 * margin_mm + gap_mm) / (photo.height_mm + gap_mm))
        .floor()
        .max(0.0) as u32;

    Ok(TileGridLayout {
        cols,
        rows,
        total: cols * rows,
        margin_mm,
        gap_mm,
    })
}

/// Builder that composites N copies of one photo tile onto a sheet canvas.
pub struct SheetComposer {
    tile: DynamicImage,
    photo: PhysicalSpec,
    sheet: SheetSpec,
    margin_mm: f64,
    gap_mm: f64,
}

impl SheetComposer {
    /// Create a composer for one tile image and a photo/sheet spec pairing.
    pub fn new(tile: DynamicImage, photo: PhysicalSpec, sheet: SheetSpec) -> Self {
        Self {
            tile,
            photo,
            sheet,
            margin_mm: DEFAULT_MARGIN_MM,
            gap_mm: DEFAULT_GAP_MM,
        }
    }

    /// Set the outer margin in millimeters (default: 5).
    pub fn margin_mm(mut self, margin_mm: f64) -> Self {
        self.margin_mm = margin_mm;
        self
    }

    /// Set the inter-tile gap in millimeters (default: 2).
    pub fn gap_mm(mut self, gap_mm: f64) -> Self {
        self.gap_mm = gap_mm;
        self
    }

    /// The tile grid for the current margins.
    pub fn layout(&self) -> Result<TileGridLayout, PhotoSheetError> {
        compute_layout(&self.photo, &self.sheet, self.margin_mm, self.gap_mm)
    }

    /// Render the sheet at the given resolution.
    ///
    /// The canvas is exactly `mm_to_pixels(sheetW, dpi)` by
    /// `mm_to_pixels(sheetH, dpi)`, white, with each tile drawn at the
    /// photo's pixel size, a separator stroke around it, and four L-shaped
    /// registration marks at its outer corners offset half a gap outward.
    pub fn render(&self, dpi: u32) -> Result<RgbImage, PhotoSheetError> {
        if dpi == 0 {
            return Err(PhotoSheetError::InvalidSpec("dpi is zero".into()));
        }
        if self.tile.width() == 0 || self.tile.height() == 0 {
            return Err(PhotoSheetError::ZeroDimensions);
        }
        let layout = self.layout()?;

        let canvas_w = mm_to_pixels(self.sheet.width_mm, dpi);
        let canvas_h = mm_to_pixels(self.sheet.height_mm, dpi);
        let mut canvas = RgbImage::from_pixel(canvas_w, canvas_h, Rgb([255, 255, 255]));

        if layout.total == 0 {
            debug!(sheet = self.sheet.id, "photo does not fit, rendering empty sheet");
            return Ok(canvas);
        }

        let tile_w = mm_to_pixels(self.photo.width_mm, dpi);
        let tile_h = mm_to_pixels(self.photo.height_mm, dpi);
        let margin = mm_to_pixels(layout.margin_mm, dpi) as i64;
        let gap = mm_to_pixels(layout.gap_mm, dpi) as i64;
        let mark_len = mm_to_pixels(MARK_LENGTH_MM, dpi) as i64;

        // One resize, reused for every copy.
        let scaled = self
            .tile
            .resize_exact(tile_w, tile_h, FilterType::Lanczos3)
            .to_rgb8();

        for row in 0..layout.rows as i64 {
            for col in 0..layout.cols as i64 {
                let x = margin + col * (tile_w as i64 + gap);
                let y = margin + row * (tile_h as i64 + gap);

                image::imageops::replace(&mut canvas, &scaled, x, y);
                stroke_rect(&mut canvas, x, y, tile_w as i64, tile_h as i64, SEPARATOR_COLOR);
                draw_corner_marks(&mut canvas, x, y, tile_w as i64, tile_h as i64, gap, mark_len);
            }
        }

        debug!(
            dpi,
            cols = layout.cols,
            rows = layout.rows,
            canvas_w,
            canvas_h,
            "rendered sheet"
        );
        Ok(canvas)
    }

    /// Render the sheet and encode it as JPEG.
    pub fn render_jpeg(&self, dpi: u32, quality: f32) -> Result<Vec<u8>, PhotoSheetError> {
        let sheet = self.render(dpi)?;
        codec::encode_jpeg(&sheet, quality)
    }
}

/// Four L-shaped registration marks at a tile's outer corners, offset half a
/// gap outward, arms `mark_len` long.
fn draw_corner_marks(
    canvas: &mut RgbImage,
    x: i64,
    y: i64,
    w: i64,
    h: i64,
    gap: i64,
    mark_len: i64,
) {
    let half = gap / 2;

    // Top-left
    vline(canvas, x - half, y - mark_len, y, MARK_COLOR);
    hline(canvas, y - half, x - mark_len, x, MARK_COLOR);
    // Top-right
    vline(canvas, x + w + half, y - mark_len, y, MARK_COLOR);
    hline(canvas, y - half, x + w, x + w + mark_len, MARK_COLOR);
    // Bottom-left
    vline(canvas, x - half, y + h, y + h + mark_len, MARK_COLOR);
    hline(canvas, y + h + half, x - mark_len, x, MARK_COLOR);
    // Bottom-right
    vline(canvas, x + w + half, y + h, y + h + mark_len, MARK_COLOR);
    hline(canvas, y + h + half, x + w, x + w + mark_len, MARK_COLOR);
}

/// One-pixel rectangle outline, clipped to the canvas.
fn stroke_rect(canvas: &mut RgbImage, x: i64, y: i64, w: i64, h: i64, color: [u8; 3]) {
    hline(canvas, y, x, x + w, color);
    hline(canvas, y + h - 1, x, x + w, color);
    vline(canvas, x, y, y + h, color);
    vline(canvas, x + w - 1, y, y + h, color);
}

fn hline(canvas: &mut RgbImage, y: i64, x0: i64, x1: i64, color: [u8; 3]) {
    if y < 0 || y >= canvas.height() as i64 {
        return;
    }
    let (lo, hi) = (x0.min(x1).max(0), x0.max(x1).min(canvas.width() as i64 - 1));
    for x in lo..=hi {
        canvas.put_pixel(x as u32, y as u32, Rgb(color));
    }
}

fn vline(canvas: &mut RgbImage, x: i64, y0: i64, y1: i64, color: [u8; 3]) {
    if x < 0 || x >= canvas.width() as i64 {
        return;
    }
    let (lo, hi) = (y0.min(y1).max(0), y0.max(y1).min(canvas.height() as i64 - 1));
    for y in lo..=hi {
        canvas.put_pixel(x as u32, y as u32, Rgb(color));
    }
}
