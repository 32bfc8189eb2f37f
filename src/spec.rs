//! Official photo specifications by country and printable sheet sizes.
//!
//! All dimensions are millimeters unless noted otherwise. The tables are
//! static, read-only data; custom specs can be constructed directly and
//! checked with [`PhysicalSpec::validate`].

use crate::error::PhotoSheetError;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// A country's official photo dimension and placement requirements.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalSpec {
    /// Short identifier, e.g. `"us"`.
    pub id: &'static str,
    /// Country or standard name.
    pub country: &'static str,
    /// Photo width in millimeters.
    pub width_mm: f64,
    /// Photo height in millimeters.
    pub height_mm: f64,
    /// Photo width in inches.
    pub width_in: f64,
    /// Photo height in inches.
    pub height_in: f64,
    /// Minimum acceptable head height in millimeters.
    pub head_height_min_mm: f64,
    /// Maximum acceptable head height in millimeters.
    pub head_height_max_mm: f64,
    /// Eye line position as a percentage of photo height, measured from the bottom edge.
    pub eye_line_from_bottom_pct: f64,
    /// Required background color as RGB.
    pub background: [u8; 3],
    /// Target print resolution in pixels per inch.
    pub dpi: u32,
    /// Free-text compliance notes.
    pub notes: &'static [&'static str],
}

impl PhysicalSpec {
    /// Check the spec invariants: positive dimensions and dpi, ordered head
    /// height bounds, eye line within 0..=100.
    pub fn validate(&self) -> Result<(), PhotoSheetError> {
        if self.width_mm <= 0.0 || self.height_mm <= 0.0 {
            return Err(PhotoSheetError::InvalidSpec(format!(
                "non-positive photo size {}x{}mm",
                self.width_mm, self.height_mm
            )));
        }
        if self.dpi == 0 {
            return Err(PhotoSheetError::InvalidSpec("dpi is zero".into()));
        }
        if self.head_height_min_mm > self.head_height_max_mm {
            return Err(PhotoSheetError::InvalidSpec(format!(
                "head height min {} exceeds max {}",
                self.head_height_min_mm, self.head_height_max_mm
            )));
        }
        if !(0.0..=100.0).contains(&self.eye_line_from_bottom_pct) {
            return Err(PhotoSheetError::InvalidSpec(format!(
                "eye line {}% outside 0..=100",
                self.eye_line_from_bottom_pct
            )));
        }
        Ok(())
    }

    /// Width / height aspect ratio.
    pub fn aspect_ratio(&self) -> f64 {
        self.width_mm / self.height_mm
    }

    /// Exact output raster size in pixels at the spec's dpi.
    pub fn output_pixels(&self) -> (u32, u32) {
        (
            mm_to_pixels(self.width_mm, self.dpi),
            mm_to_pixels(self.height_mm, self.dpi),
        )
    }

    /// Midpoint of the acceptable head height range, as a fraction of photo height.
    pub fn target_head_ratio(&self) -> f64 {
        (self.head_height_min_mm + self.head_height_max_mm) / 2.0 / self.height_mm
    }

    /// Eye line position as a fraction of photo height measured from the top edge.
    pub fn eye_line_from_top_fraction(&self) -> f64 {
        (100.0 - self.eye_line_from_bottom_pct) / 100.0
    }
}

/// A printable sheet's physical size.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSpec {
    /// Short identifier, e.g. `"4x6"`.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Sheet width in inches.
    pub width_in: f64,
    /// Sheet height in inches.
    pub height_in: f64,
    /// Sheet width in millimeters.
    pub width_mm: f64,
    /// Sheet height in millimeters.
    pub height_mm: f64,
}

impl SheetSpec {
    /// Construct a custom sheet size from millimeter dimensions.
    pub fn from_mm(width_mm: f64, height_mm: f64) -> Self {
        Self {
            id: "custom",
            name: "Custom",
            width_in: width_mm / MM_PER_INCH,
            height_in: height_mm / MM_PER_INCH,
            width_mm,
            height_mm,
        }
    }

    /// Check that both dimensions are positive.
    pub fn validate(&self) -> Result<(), PhotoSheetError> {
        if self.width_mm <= 0.0 || self.height_mm <= 0.0 {
            return Err(PhotoSheetError::InvalidSpec(format!(
                "non-positive sheet size {}x{}mm",
                self.width_mm, self.height_mm
            )));
        }
        Ok(())
    }
}

/// Convert millimeters to pixels at the given resolution.
pub fn mm_to_pixels(mm: f64, dpi: u32) -> u32 {
    (mm / MM_PER_INCH * dpi as f64).round() as u32
}

/// Convert inches to pixels at the given resolution.
pub fn inches_to_pixels(inches: f64, dpi: u32) -> u32 {
    (inches * dpi as f64).round() as u32
}

/// Look up a photo spec by identifier.
pub fn photo_spec(id: &str) -> Option<&'static PhysicalSpec> {
    PHOTO_SPECS.iter().find(|s| s.id == id)
}

/// Look up a sheet size by identifier.
pub fn sheet_spec(id: &str) -> Option<&'static SheetSpec> {
    SHEET_SIZES.iter().find(|s| s.id == id)
}

const WHITE: [u8; 3] = [255, 255, 255];

/// Built-in photo specifications.
pub static PHOTO_SPECS: [PhysicalSpec; 8] = [
    PhysicalSpec {
        id: "us",
        country: "United States",
        width_mm: 51.0,
        height_mm: 51.0,
        width_in: 2.0,
        height_in: 2.0,
        head_height_min_mm: 25.0,
        head_height_max_mm: 35.0,
        eye_line_from_bottom_pct: 56.0,
        background: WHITE,
        dpi: 300,
        notes: &[
            "Head must be between 1\" and 1 3/8\" (25-35mm)",
            "Eyes between 1 1/8\" and 1 3/8\" from bottom",
            "White or off-white background",
            "Taken within last 6 months",
        ],
    },
    PhysicalSpec {
        id: "uk",
        country: "United Kingdom",
        width_mm: 35.0,
        height_mm: 45.0,
        width_in: 1.38,
        height_in: 1.77,
        head_height_min_mm: 29.0,
        head_height_max_mm: 34.0,
        eye_line_from_bottom_pct: 60.0,
        background: WHITE,
        dpi: 300,
        notes: &[
            "Head height 29-34mm",
            "Plain cream or light grey background",
            "No shadows on face or background",
            "Neutral expression, mouth closed",
        ],
    },
    PhysicalSpec {
        id: "eu",
        country: "European Union (Schengen)",
        width_mm: 35.0,
        height_mm: 45.0,
        width_in: 1.38,
        height_in: 1.77,
        head_height_min_mm: 32.0,
        head_height_max_mm: 36.0,
        eye_line_from_bottom_pct: 60.0,
        background: WHITE,
        dpi: 300,
        notes: &[
            "Face must cover 70-80% of photo",
            "Light grey or light blue background",
            "Neutral expression required",
            "ICAO compliant",
        ],
    },
    PhysicalSpec {
        id: "india",
        country: "India",
        width_mm: 35.0,
        height_mm: 45.0,
        width_in: 1.38,
        height_in: 1.77,
        head_height_min_mm: 25.0,
        head_height_max_mm: 35.0,
        eye_line_from_bottom_pct: 55.0,
        background: WHITE,
        dpi: 300,
        notes: &[
            "White background only",
            "Face should cover 50-60% of photo",
            "Both ears must be visible",
            "Taken within last 3 months",
        ],
    },
    PhysicalSpec {
        id: "china",
        country: "China",
        width_mm: 33.0,
        height_mm: 48.0,
        width_in: 1.3,
        height_in: 1.89,
        head_height_min_mm: 28.0,
        head_height_max_mm: 33.0,
        eye_line_from_bottom_pct: 55.0,
        background: WHITE,
        dpi: 300,
        notes: &[
            "White background required",
            "Head height 28-33mm",
            "Face centered in frame",
            "No glasses allowed",
        ],
    },
    PhysicalSpec {
        id: "canada",
        country: "Canada",
        width_mm: 50.0,
        height_mm: 70.0,
        width_in: 1.97,
        height_in: 2.76,
        head_height_min_mm: 31.0,
        head_height_max_mm: 36.0,
        eye_line_from_bottom_pct: 50.0,
        background: WHITE,
        dpi: 300,
        notes: &[
            "Face height 31-36mm",
            "White or light-colored background",
            "Neutral expression",
            "Taken within last 12 months",
        ],
    },
    PhysicalSpec {
        id: "australia",
        country: "Australia",
        width_mm: 35.0,
        height_mm: 45.0,
        width_in: 1.38,
        height_in: 1.77,
        head_height_min_mm: 32.0,
        head_height_max_mm: 36.0,
        eye_line_from_bottom_pct: 58.0,
        background: WHITE,
        dpi: 300,
        notes: &[
            "Head and shoulders only",
            "Plain light background",
            "Mouth closed, neutral expression",
            "No head coverings (except religious)",
        ],
    },
    PhysicalSpec {
        id: "japan",
        country: "Japan",
        width_mm: 35.0,
        height_mm: 45.0,
        width_in: 1.38,
        height_in: 1.77,
        head_height_min_mm: 27.0,
        head_height_max_mm: 40.0,
        eye_line_from_bottom_pct: 55.0,
        background: WHITE,
        dpi: 300,
        notes: &[
            "Plain white or light background",
            "Face clearly visible",
            "No hats or sunglasses",
            "Taken within last 6 months",
        ],
    },
];

/// Built-in printable sheet sizes.
pub static SHEET_SIZES: [SheetSpec; 4] = [
    SheetSpec {
        id: "4x6",
        name: "4x6\" (Standard Photo)",
        width_in: 4.0,
        height_in: 6.0,
        width_mm: 102.0,
        height_mm: 152.0,
    },
    SheetSpec {
        id: "5x7",
        name: "5x7\"",
        width_in: 5.0,
        height_in: 7.0,
        width_mm: 127.0,
        height_mm: 178.0,
    },
    SheetSpec {
        id: "a4",
        name: "A4 (210x297mm)",
        width_in: 8.27,
        height_in: 11.69,
        width_mm: 210.0,
        height_mm: 297.0,
    },
    SheetSpec {
        id: "letter",
        name: "US Letter (8.5x11\")",
        width_in: 8.5,
        height_in: 11.0,
        width_mm: 216.0,
        height_mm: 279.0,
    },
];
