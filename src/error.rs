use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhotoSheetError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error("invalid photo specification: {0}")]
    InvalidSpec(String),

    #[error("display scale must be positive, got {0}")]
    InvalidScale(f64),

    #[error("crop window dimensions must be positive")]
    InvalidCropWindow,

    #[error("quality must be between 0.0 and 1.0, got {0}")]
    InvalidQuality(f32),

    #[error("face box has non-positive dimensions")]
    InvalidFaceBox,

    #[error("no face detected; position the photo manually")]
    NoFaceDetected,
}
