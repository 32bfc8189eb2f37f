//! Mapping between the on-screen pan/zoom view of a source image and exact
//! pixel rectangles in the source image, plus final output rendering.
//!
//! Rendering convention shared with the auto-alignment solver: the image is
//! displayed at a fixed base height of [`BASE_DISPLAY_FACTOR`] times the crop
//! window height (width follows the native aspect ratio), anchored at the
//! container center. The pan offset is expressed in the untransformed frame
//! and scaled together with the image, so the on-screen displacement of the
//! image center is `scale * offset`. The crop window itself is a fixed-size
//! rectangle centered in the container and never moves.

use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage, RgbaImage};
use tracing::debug;

use crate::error::PhotoSheetError;
use crate::spec::PhysicalSpec;

/// Displayed base height as a multiple of the crop window height.
///
/// The auto-alignment solver depends on this exact value; the two must never
/// diverge or solved offsets stop landing the face inside the guide.
pub const BASE_DISPLAY_FACTOR: f64 = 1.5;

/// Fixed on-screen height of the crop window in display pixels.
pub const CROP_WINDOW_HEIGHT: f64 = 320.0;

/// Pan/zoom state of the editor view, owned by the caller.
///
/// Reset to the default whenever the source image changes. The library never
/// mutates a caller's state; transform functions take it by value and the
/// solver returns a fresh one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayState {
    /// Zoom factor, positive. The interactive range is 0.5 to 3.0.
    pub scale: f64,
    /// Horizontal pan in display pixels, measured from the image center.
    pub offset_x: f64,
    /// Vertical pan in display pixels, measured from the image center.
    pub offset_y: f64,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// The fixed-size visible frame showing what will be captured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropWindow {
    /// Window width in display pixels.
    pub width: f64,
    /// Window height in display pixels.
    pub height: f64,
}

impl CropWindow {
    /// The editor's crop window for a photo spec: fixed height, width from
    /// the spec's physical aspect ratio.
    pub fn for_spec(spec: &PhysicalSpec) -> Self {
        Self {
            width: CROP_WINDOW_HEIGHT * spec.aspect_ratio(),
            height: CROP_WINDOW_HEIGHT,
        }
    }
}

/// A crop rectangle in source-image pixel space, clamped to the image bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    /// Left edge in source pixels, >= 0.
    pub x: f64,
    /// Top edge in source pixels, >= 0.
    pub y: f64,
    /// Width in source pixels; `x + width` never exceeds the image width.
    pub width: f64,
    /// Height in source pixels; `y + height` never exceeds the image height.
    pub height: f64,
}

/// Map the crop window through the current pan/zoom view into a source-space
/// crop rectangle.
///
/// The returned rectangle is clamped into `[0, natural_width] x
/// [0, natural_height]`; consumers never read pixels outside the source
/// bitmap. Deterministic: identical inputs yield identical rectangles.
pub fn display_to_source(
    state: DisplayState,
    window: CropWindow,
    natural_width: u32,
    natural_height: u32,
) -> Result<CropRect, PhotoSheetError> {
    if natural_width == 0 || natural_height == 0 {
        return Err(PhotoSheetError::ZeroDimensions);
    }
    if !(state.scale > 0.0) {
        return Err(PhotoSheetError::InvalidScale(state.scale));
    }
    if !(window.width > 0.0) || !(window.height > 0.0) {
        return Err(PhotoSheetError::InvalidCropWindow);
    }

    let (w, h) = (natural_width as f64, natural_height as f64);

    // Base display size at scale 1, then the displayed size at the current scale.
    let base_height = window.height * BASE_DISPLAY_FACTOR;
    let base_width = base_height * (w / h);
    let displayed_width = base_width * state.scale;
    let displayed_height = base_height * state.scale;

    // Working in container coordinates with the origin at the container
    // center: the image center sits at scale * offset, the crop window is
    // centered at the origin.
    let image_left = state.scale * state.offset_x - displayed_width / 2.0;
    let image_top = state.scale * state.offset_y - displayed_height / 2.0;
    let window_left = -window.width / 2.0;
    let window_top = -window.height / 2.0;

    let scale_x = w / displayed_width;
    let scale_y = h / displayed_height;

    let crop_left = (window_left - image_left) * scale_x;
    let crop_top = (window_top - image_top) * scale_y;
    let crop_right = (window_left + window.width - image_left) * scale_x;
    let crop_bottom = (window_top + window.height - image_top) * scale_y;

    // Clamp both edges into the source bitmap.
    let x0 = crop_left.clamp(0.0, w);
    let y0 = crop_top.clamp(0.0, h);
    let x1 = crop_right.clamp(0.0, w);
    let y1 = crop_bottom.clamp(0.0, h);

    Ok(CropRect {
        x: x0,
        y: y0,
        width: (x1 - x0).max(0.0),
        height: (y1 - y0).max(0.0),
    })
}

/// Render the final output raster: a canvas of exactly `output_width` x
/// `output_height` filled with `background`, with the source pixels inside
/// `crop` stretched to fill it.
///
/// The crop's aspect ratio is enforced upstream by the crop window, so the
/// stretch is ordinarily exact. An empty crop (view panned fully off the
/// image) yields a background-only canvas. Any alpha in the source is
/// composited over the background color.
pub fn render_output(
    source: &DynamicImage,
    crop: CropRect,
    output_width: u32,
    output_height: u32,
    background: [u8; 3],
) -> Result<RgbImage, PhotoSheetError> {
    if source.width() == 0 || source.height() == 0 {
        return Err(PhotoSheetError::ZeroDimensions);
    }
    if output_width == 0 || output_height == 0 {
        return Err(PhotoSheetError::ZeroDimensions);
    }

    let mut canvas = RgbImage::from_pixel(output_width, output_height, Rgb(background));

    let x = crop.x.round() as u32;
    let y = crop.y.round() as u32;
    let cw = (crop.width.round() as u32).min(source.width().saturating_sub(x));
    let ch = (crop.height.round() as u32).min(source.height().saturating_sub(y));
    if cw == 0 || ch == 0 {
        debug!(?crop, "crop rectangle empty after clamping, returning background");
        return Ok(canvas);
    }

    let region = source.crop_imm(x, y, cw, ch);
    let stretched: RgbaImage = region
        .resize_exact(output_width, output_height, FilterType::Lanczos3)
        .to_rgba8();

    // Composite over the background color so transparent sources come out flat.
    for (px, bg) in stretched.pixels().zip(canvas.pixels_mut()) {
        let [r, g, b, a] = px.0;
        let alpha = a as f32 / 255.0;
        let inv = 1.0 - alpha;
        bg.0 = [
            (r as f32 * alpha + bg.0[0] as f32 * inv).round() as u8,
            (g as f32 * alpha + bg.0[1] as f32 * inv).round() as u8,
            (b as f32 * alpha + bg.0[2] as f32 * inv).round() as u8,
        ];
    }

    debug!(
        output_width,
        output_height,
        crop_w = cw,
        crop_h = ch,
        "rendered output photo"
    );
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::photo_spec;

    fn window_35x45() -> CropWindow {
        CropWindow::for_spec(photo_spec("uk").unwrap())
    }

    #[test]
    fn crop_window_follows_spec_aspect() {
        let win = window_35x45();
        assert_eq!(win.height, 320.0);
        assert!((win.width - 320.0 * 35.0 / 45.0).abs() < 1e-9);
    }

    #[test]
    fn centered_view_crops_the_image_center() {
        // Image aspect equal to display aspect makes the math exact:
        // base display = 1.5x window, so the window sees the middle 2/3.
        let win = CropWindow {
            width: 300.0,
            height: 300.0,
        };
        let crop = display_to_source(DisplayState::default(), win, 900, 900).unwrap();
        assert!((crop.x - 150.0).abs() < 1e-6);
        assert!((crop.y - 150.0).abs() < 1e-6);
        assert!((crop.width - 600.0).abs() < 1e-6);
        assert!((crop.height - 600.0).abs() < 1e-6);
    }

    #[test]
    fn zooming_in_shrinks_the_source_rect() {
        let win = CropWindow {
            width: 300.0,
            height: 300.0,
        };
        let state = DisplayState {
            scale: 2.0,
            ..Default::default()
        };
        let crop = display_to_source(state, win, 900, 900).unwrap();
        // Twice the zoom covers half the source span.
        assert!((crop.width - 300.0).abs() < 1e-6);
        assert!((crop.height - 300.0).abs() < 1e-6);
        assert!((crop.x - 300.0).abs() < 1e-6);
    }

    #[test]
    fn pan_offset_is_scaled_with_the_image() {
        let win = CropWindow {
            width: 300.0,
            height: 300.0,
        };
        // Base display is 450px for 900 source px, so 2 source px per display px.
        // Moving the image right by 10 display px shifts the crop left by 20 source px.
        let state = DisplayState {
            scale: 1.0,
            offset_x: 10.0,
            offset_y: 0.0,
        };
        let crop = display_to_source(state, win, 900, 900).unwrap();
        assert!((crop.x - 130.0).abs() < 1e-6);

        // The same stored offset at scale 2 moves the screen by 20px but the
        // source-space shift stays 20px because source-per-display halves.
        let state = DisplayState {
            scale: 2.0,
            offset_x: 10.0,
            offset_y: 0.0,
        };
        let crop = display_to_source(state, win, 900, 900).unwrap();
        assert!((crop.x - 280.0).abs() < 1e-6);
    }

    #[test]
    fn crop_rect_always_stays_inside_the_source() {
        let win = window_35x45();
        let states = [
            (0.5, 0.0, 0.0),
            (1.0, 500.0, -500.0),
            (3.0, -1000.0, 1000.0),
            (0.5, 10000.0, 10000.0),
            (2.7, -3.5, 812.25),
        ];
        for (scale, ox, oy) in states {
            let state = DisplayState {
                scale,
                offset_x: ox,
                offset_y: oy,
            };
            let crop = display_to_source(state, win, 640, 480).unwrap();
            assert!(crop.x >= 0.0 && crop.y >= 0.0, "{state:?} gave {crop:?}");
            assert!(crop.x + crop.width <= 640.0 + 1e-9, "{state:?} gave {crop:?}");
            assert!(crop.y + crop.height <= 480.0 + 1e-9, "{state:?} gave {crop:?}");
        }
    }

    #[test]
    fn display_to_source_is_idempotent() {
        let win = window_35x45();
        let state = DisplayState {
            scale: 1.7,
            offset_x: -42.5,
            offset_y: 13.0,
        };
        let a = display_to_source(state, win, 1280, 960).unwrap();
        let b = display_to_source(state, win, 1280, 960).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_natural_size_is_rejected() {
        let win = window_35x45();
        let err = display_to_source(DisplayState::default(), win, 0, 480);
        assert!(matches!(err, Err(PhotoSheetError::ZeroDimensions)));
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        let win = window_35x45();
        let state = DisplayState {
            scale: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            display_to_source(state, win, 640, 480),
            Err(PhotoSheetError::InvalidScale(_))
        ));
        let state = DisplayState {
            scale: -1.0,
            ..Default::default()
        };
        assert!(display_to_source(state, win, 640, 480).is_err());
    }

    #[test]
    fn render_output_has_exact_dimensions() {
        let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 480, Rgb([90, 90, 90])));
        let crop = CropRect {
            x: 100.0,
            y: 50.0,
            width: 400.0,
            height: 400.0,
        };
        let out = render_output(&source, crop, 602, 602, [255, 255, 255]).unwrap();
        assert_eq!(out.width(), 602);
        assert_eq!(out.height(), 602);
        assert_eq!(out.get_pixel(301, 301), &Rgb([90, 90, 90]));
    }

    #[test]
    fn empty_crop_renders_background_only() {
        let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 100, Rgb([0, 0, 0])));
        let crop = CropRect {
            x: 100.0,
            y: 100.0,
            width: 0.0,
            height: 0.0,
        };
        let out = render_output(&source, crop, 50, 50, [250, 250, 250]).unwrap();
        assert!(out.pixels().all(|p| p.0 == [250, 250, 250]));
    }

    #[test]
    fn transparent_source_composites_over_background() {
        let source =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 40, image::Rgba([255, 0, 0, 0])));
        let crop = CropRect {
            x: 0.0,
            y: 0.0,
            width: 40.0,
            height: 40.0,
        };
        let out = render_output(&source, crop, 20, 20, [255, 255, 255]).unwrap();
        assert_eq!(out.get_pixel(10, 10), &Rgb([255, 255, 255]));
    }

    #[test]
    fn zero_sized_output_is_rejected() {
        let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([0, 0, 0])));
        let crop = CropRect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        assert!(render_output(&source, crop, 0, 10, [255, 255, 255]).is_err());
    }
}
