//! Auto-alignment: compute the pan/zoom state that places a detected face
//! inside the guide oval according to the spec's physical head-height and
//! placement constraints.

use tracing::debug;

use crate::error::PhotoSheetError;
use crate::face_detector::FaceBox;
use crate::spec::PhysicalSpec;
use crate::viewport::{CropWindow, DisplayState, BASE_DISPLAY_FACTOR};

/// Lower bound of the solver's usable zoom range.
pub const MIN_AUTO_SCALE: f64 = 0.8;
/// Upper bound of the solver's usable zoom range.
pub const MAX_AUTO_SCALE: f64 = 3.0;

/// The face-placement target rendered inside the crop window: an oval,
/// horizontally centered, positioned and sized as percentages of the crop
/// window height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideOval {
    /// Offset of the oval's top edge from the window top, percent of window height.
    pub top_percent: f64,
    /// Oval height, percent of window height.
    pub height_percent: f64,
}

impl GuideOval {
    /// Vertical center of the oval as a fraction of crop window height.
    pub fn center_fraction(&self) -> f64 {
        (self.top_percent + self.height_percent / 2.0) / 100.0
    }
}

impl Default for GuideOval {
    /// The editor's default overlay: top at 8% of the window, 65% tall.
    fn default() -> Self {
        Self {
            top_percent: 8.0,
            height_percent: 65.0,
        }
    }
}

/// Compute the display state that centers the face in the guide oval at the
/// spec's target head height.
///
/// `face` is the detector's best result in source-image pixel space; `None`
/// means detection found nothing and yields [`PhotoSheetError::NoFaceDetected`],
/// which is recoverable: the caller keeps whatever state it had and asks the
/// user to position manually. The solver never mutates anything; it returns a
/// fresh state the caller may apply if still relevant.
///
/// The required zoom is clamped to `[MIN_AUTO_SCALE, MAX_AUTO_SCALE]`; a face
/// far too large or small for the frame gets a best-effort placement at the
/// clamped zoom rather than an error.
pub fn auto_align(
    face: Option<&FaceBox>,
    natural_width: u32,
    natural_height: u32,
    window: CropWindow,
    guide: GuideOval,
    spec: &PhysicalSpec,
) -> Result<DisplayState, PhotoSheetError> {
    let face = face.ok_or(PhotoSheetError::NoFaceDetected)?;
    if natural_width == 0 || natural_height == 0 {
        return Err(PhotoSheetError::ZeroDimensions);
    }
    if !(face.width > 0.0) || !(face.height > 0.0) {
        return Err(PhotoSheetError::InvalidFaceBox);
    }
    spec.validate()?;

    let (w, h) = (natural_width as f64, natural_height as f64);

    // Face position as ratios of the native image. The vertical anchor is the
    // bounding-box midpoint, a chin-to-hairline approximation carried over
    // from the box-only detector contract.
    let face_height_ratio = face.height / h;
    let face_center_x_ratio = face.center_x() / w;
    let face_center_y_ratio = face.center_y() / h;

    // Zoom that renders the head at the midpoint of the acceptable physical
    // head-height range. base display height is the fixed 1.5x convention.
    let base_height = window.height * BASE_DISPLAY_FACTOR;
    let base_width = base_height * (w / h);
    let target_head_ratio = spec.target_head_ratio();
    let required = (target_head_ratio * window.height) / (face_height_ratio * base_height);
    let scale = required.clamp(MIN_AUTO_SCALE, MAX_AUTO_SCALE);

    let displayed_width = base_width * scale;
    let displayed_height = base_height * scale;

    // Face center on screen at this scale with zero offset, relative to the
    // container center (where both the image and the crop window are anchored).
    let face_screen_x = (face_center_x_ratio - 0.5) * displayed_width;
    let face_screen_y = (face_center_y_ratio - 0.5) * displayed_height;

    // Target: the oval's center, horizontally centered in the window.
    let target_x = 0.0;
    let target_y = (guide.center_fraction() - 0.5) * window.height;

    // Pan is stored in the untransformed frame and scaled with the image, so
    // the stored offset is the desired screen displacement divided by scale.
    let offset_x = (target_x - face_screen_x) / scale;
    let offset_y = (target_y - face_screen_y) / scale;

    debug!(
        scale,
        offset_x,
        offset_y,
        clamped = (required != scale),
        "auto-alignment solved"
    );

    Ok(DisplayState {
        scale,
        offset_x,
        offset_y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::photo_spec;

    fn window_for(spec: &PhysicalSpec) -> CropWindow {
        CropWindow::for_spec(spec)
    }

    /// Build a face box that already satisfies the guide target at scale 1
    /// with zero offset, for a given image size.
    fn perfectly_placed_face(spec: &PhysicalSpec, guide: GuideOval, w: u32, h: u32) -> FaceBox {
        let window = window_for(spec);
        let base_height = window.height * BASE_DISPLAY_FACTOR;

        // Head height ratio that needs exactly scale 1.
        let face_height_ratio = spec.target_head_ratio() * window.height / base_height;
        // Vertical center that already sits on the oval center.
        let target_y = (guide.center_fraction() - 0.5) * window.height;
        let face_center_y_ratio = 0.5 + target_y / base_height;

        let height = face_height_ratio * h as f64;
        FaceBox {
            x: w as f64 / 2.0 - height / 2.0,
            y: face_center_y_ratio * h as f64 - height / 2.0,
            width: height,
            height,
            confidence: 9.0,
        }
    }

    #[test]
    fn no_face_reports_recoverable_error() {
        let spec = photo_spec("eu").unwrap();
        let result = auto_align(
            None,
            800,
            600,
            window_for(spec),
            GuideOval::default(),
            spec,
        );
        assert!(matches!(result, Err(PhotoSheetError::NoFaceDetected)));
    }

    #[test]
    fn perfectly_placed_face_solves_to_identity() {
        let spec = photo_spec("eu").unwrap();
        let guide = GuideOval::default();
        let face = perfectly_placed_face(spec, guide, 1200, 900);

        let state = auto_align(Some(&face), 1200, 900, window_for(spec), guide, spec).unwrap();
        assert!(
            (0.95..=1.05).contains(&state.scale),
            "scale {} outside sanity band",
            state.scale
        );
        assert!(state.offset_x.abs() < 1.0, "offset_x {}", state.offset_x);
        assert!(state.offset_y.abs() < 1.0, "offset_y {}", state.offset_y);
    }

    #[test]
    fn off_center_face_gets_pulled_to_the_oval() {
        let spec = photo_spec("uk").unwrap();
        let guide = GuideOval::default();
        let mut face = perfectly_placed_face(spec, guide, 1000, 1000);
        // Push the face right and down by 100 source px each way.
        face.x += 100.0;
        face.y += 100.0;

        let state = auto_align(Some(&face), 1000, 1000, window_for(spec), guide, spec).unwrap();
        // Scale is unchanged; the pan compensates in the opposite direction.
        assert!((0.95..=1.05).contains(&state.scale));
        assert!(state.offset_x < -1.0);
        assert!(state.offset_y < -1.0);

        // Applying the solved state must land the face center on the oval
        // center: verify through the forward transform.
        let window = window_for(spec);
        let crop =
            crate::viewport::display_to_source(state, window, 1000, 1000).unwrap();
        let face_cy_in_window = (face.center_y() - crop.y) / crop.height * window.height;
        let target = guide.center_fraction() * window.height;
        assert!(
            (face_cy_in_window - target).abs() < 1.0,
            "face at {face_cy_in_window}, oval at {target}"
        );
    }

    #[test]
    fn tiny_face_clamps_to_max_zoom() {
        let spec = photo_spec("us").unwrap();
        let face = FaceBox {
            x: 500.0,
            y: 500.0,
            width: 10.0,
            height: 10.0,
            confidence: 5.0,
        };
        let state = auto_align(
            Some(&face),
            4000,
            3000,
            window_for(spec),
            GuideOval::default(),
            spec,
        )
        .unwrap();
        assert_eq!(state.scale, MAX_AUTO_SCALE);
    }

    #[test]
    fn huge_face_clamps_to_min_zoom() {
        let spec = photo_spec("us").unwrap();
        let face = FaceBox {
            x: 0.0,
            y: 0.0,
            width: 580.0,
            height: 580.0,
            confidence: 5.0,
        };
        let state = auto_align(
            Some(&face),
            600,
            600,
            window_for(spec),
            GuideOval::default(),
            spec,
        )
        .unwrap();
        assert_eq!(state.scale, MIN_AUTO_SCALE);
    }

    #[test]
    fn zero_height_face_is_rejected_before_division() {
        let spec = photo_spec("us").unwrap();
        let face = FaceBox {
            x: 10.0,
            y: 10.0,
            width: 50.0,
            height: 0.0,
            confidence: 5.0,
        };
        let result = auto_align(
            Some(&face),
            800,
            600,
            window_for(spec),
            GuideOval::default(),
            spec,
        );
        assert!(matches!(result, Err(PhotoSheetError::InvalidFaceBox)));
    }

    #[test]
    fn full_window_oval_centers_vertically() {
        let oval = GuideOval {
            top_percent: 0.0,
            height_percent: 100.0,
        };
        assert_eq!(oval.center_fraction(), 0.5);
    }

    #[test]
    fn default_oval_sits_above_center() {
        // top 8% + 65%/2 = 40.5% of the window height.
        let oval = GuideOval::default();
        assert!((oval.center_fraction() - 0.405).abs() < 1e-9);
    }
}
