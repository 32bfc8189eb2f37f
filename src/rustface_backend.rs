use std::path::Path;

use crate::error::PhotoSheetError;
use crate::face_detector::{FaceBox, FaceDetector};

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The SeetaFace frontal model is loaded from a caller-supplied path on
/// construction; this crate does not bundle a model file.
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Load a SeetaFace model from disk.
    pub fn from_model_path<P: AsRef<Path>>(path: P) -> Result<Self, PhotoSheetError> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| PhotoSheetError::Decode(format!("failed to read model: {e}")))?;
        let model = rustface::read_model(std::io::Cursor::new(bytes))
            .map_err(|e| PhotoSheetError::Decode(format!("failed to load model: {e}")))?;
        Ok(Self { model })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBox> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBox {
                    x: bbox.x() as f64,
                    y: bbox.y() as f64,
                    width: bbox.width() as f64,
                    height: bbox.height() as f64,
                    confidence: face.score(),
                }
            })
            .collect()
    }
}
