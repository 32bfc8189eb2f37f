/// Bounding box of a detected face, in source-image pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceBox {
    /// X coordinate of the top-left corner (source pixels).
    pub x: f64,
    /// Y coordinate of the top-left corner (source pixels).
    pub y: f64,
    /// Width of the bounding box (source pixels).
    pub width: f64,
    /// Height of the bounding box (source pixels).
    pub height: f64,
    /// Detection confidence score.
    pub confidence: f64,
}

impl FaceBox {
    /// Horizontal center of the box.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical center of the box.
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// Pluggable face detection backend.
///
/// Implement this trait to plug in any detection engine (ONNX, dlib, a remote
/// service) and hand its best result to the auto-alignment solver. The
/// surrounding system is expected to run detection off-thread and treat a
/// missed deadline the same as no face found.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` x `height` bytes.
    /// Coordinates of the returned boxes are in the buffer's pixel space.
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBox>;
}

/// Pick the highest-confidence detection, if any.
pub fn best_face(faces: Vec<FaceBox>) -> Option<FaceBox> {
    faces.into_iter().max_by(|a, b| {
        a.confidence
            .partial_cmp(&b.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}
