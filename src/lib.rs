//! Passport photo processing: crop a portrait to a country's official photo
//! size, auto-align the face against the guide, and tile copies onto a
//! print-ready sheet.
//!
//! # Example
//!
//! ```no_run
//! use photosheet::{photo_spec, sheet_spec, PhotoCropper, SheetComposer};
//!
//! let bytes = std::fs::read("portrait.jpg").unwrap();
//! let spec = photo_spec("us").unwrap().clone();
//!
//! let cropper = PhotoCropper::new(&bytes, spec.clone()).unwrap();
//! let photo = cropper.render().unwrap();
//!
//! let sheet = sheet_spec("4x6").unwrap().clone();
//! let jpeg = SheetComposer::new(photo.into(), spec, sheet)
//!     .render_jpeg(300, 0.95)
//!     .unwrap();
//! std::fs::write("sheet.jpg", jpeg).unwrap();
//! ```
#![warn(missing_docs)]

/// Auto-alignment solver.
pub mod align;
/// Image decode/encode boundary.
pub mod codec;
mod error;
/// Face detection trait and bounding-box type.
pub mod face_detector;
#[cfg(feature = "rustface")]
/// SeetaFace-based face detector backend.
pub mod rustface_backend;
/// Sheet layout and rendering.
pub mod sheet;
/// Photo and sheet specification tables.
pub mod spec;
/// Display-to-source coordinate transforms and output rendering.
pub mod viewport;

pub use align::{auto_align, GuideOval, MAX_AUTO_SCALE, MIN_AUTO_SCALE};
pub use codec::DEFAULT_JPEG_QUALITY;
/// Error type returned by photosheet operations.
pub use error::PhotoSheetError;
pub use face_detector::{best_face, FaceBox, FaceDetector};
#[cfg(feature = "rustface")]
pub use rustface_backend::RustfaceDetector;
pub use sheet::{compute_layout, SheetComposer, TileGridLayout};
pub use spec::{
    mm_to_pixels, photo_spec, sheet_spec, PhysicalSpec, SheetSpec, PHOTO_SPECS, SHEET_SIZES,
};
pub use viewport::{
    display_to_source, render_output, CropRect, CropWindow, DisplayState, BASE_DISPLAY_FACTOR,
};

use image::{DynamicImage, RgbImage};
use tracing::debug;

/// Editor-side crop pipeline for one source image and one photo spec.
///
/// Decodes the input on construction, holds the pan/zoom state, and renders
/// the final photo at the spec's exact output pixel size. The state starts at
/// the default and can be replaced wholesale (a drag/zoom from the UI) or
/// solved from a detected face.
pub struct PhotoCropper {
    image: DynamicImage,
    spec: PhysicalSpec,
    window: CropWindow,
    guide: GuideOval,
    state: DisplayState,
}

impl PhotoCropper {
    /// Create a cropper from raw image bytes (JPEG, PNG, or WebP).
    pub fn new(input: &[u8], spec: PhysicalSpec) -> Result<Self, PhotoSheetError> {
        let image = codec::decode_image(input)?;
        Self::from_image(image, spec)
    }

    /// Create a cropper from an already-decoded image.
    pub fn from_image(image: DynamicImage, spec: PhysicalSpec) -> Result<Self, PhotoSheetError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(PhotoSheetError::ZeroDimensions);
        }
        spec.validate()?;
        let window = CropWindow::for_spec(&spec);
        Ok(Self {
            image,
            spec,
            window,
            guide: GuideOval::default(),
            state: DisplayState::default(),
        })
    }

    /// Replace the pan/zoom state, e.g. after a drag or zoom in the UI.
    pub fn display_state(mut self, state: DisplayState) -> Self {
        self.state = state;
        self
    }

    /// Replace the guide oval geometry.
    pub fn guide(mut self, guide: GuideOval) -> Self {
        self.guide = guide;
        self
    }

    /// Replace the crop window (default: [`CropWindow::for_spec`]).
    pub fn crop_window(mut self, window: CropWindow) -> Self {
        self.window = window;
        self
    }

    /// The current pan/zoom state.
    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Reset pan and zoom, as when a new image is loaded.
    pub fn reset(&mut self) {
        self.state = DisplayState::default();
    }

    /// Solve alignment from a detected face and apply the result.
    ///
    /// On [`PhotoSheetError::NoFaceDetected`] (or any other failure) the held
    /// state is left untouched; the condition is recoverable and the user
    /// positions the photo manually. The detection result is advisory: a
    /// caller that has since replaced the image or spec simply drops it
    /// instead of calling this.
    pub fn try_auto_align(&mut self, face: Option<&FaceBox>) -> Result<(), PhotoSheetError> {
        let solved = auto_align(
            face,
            self.image.width(),
            self.image.height(),
            self.window,
            self.guide,
            &self.spec,
        )?;
        debug!(scale = solved.scale, "applying auto-alignment");
        self.state = solved;
        Ok(())
    }

    /// The source-space crop rectangle for the current state.
    pub fn crop_rect(&self) -> Result<CropRect, PhotoSheetError> {
        display_to_source(
            self.state,
            self.window,
            self.image.width(),
            self.image.height(),
        )
    }

    /// Render the final photo at the spec's exact output pixel size.
    pub fn render(&self) -> Result<RgbImage, PhotoSheetError> {
        let crop = self.crop_rect()?;
        let (out_w, out_h) = self.spec.output_pixels();
        render_output(&self.image, crop, out_w, out_h, self.spec.background)
    }

    /// Render the final photo and encode it as JPEG.
    pub fn render_jpeg(&self, quality: f32) -> Result<Vec<u8>, PhotoSheetError> {
        let photo = self.render()?;
        codec::encode_jpeg(&photo, quality)
    }
}
