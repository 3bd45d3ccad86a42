//! Error taxonomy shared by every generation stage.

use thiserror::Error;

pub type IconResult<T> = Result<T, IconError>;

#[derive(Debug, Error)]
pub enum IconError {
    #[error("Invalid size: {0} (must be in 1..={max})", max = crate::pipeline::MAX_IMAGE_SIZE)]
    InvalidSize(i64),

    #[error("Random source failure: {0}")]
    RandomSource(String),

    #[error("Color generation error: {0}")]
    ColorGeneration(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Crop {size}x{size} at ({x}, {y}) exceeds rotated image {width}x{height}")]
    CropOutOfBounds {
        x: u32,
        y: u32,
        size: u32,
        width: u32,
        height: u32,
    },

    #[error("Style config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<image::ImageError> for IconError {
    fn from(err: image::ImageError) -> Self {
        IconError::Encoding(err.to_string())
    }
}

impl IconError {
    pub fn color(msg: impl Into<String>) -> Self {
        Self::ColorGeneration(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
