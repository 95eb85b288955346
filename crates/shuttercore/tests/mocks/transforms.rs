//! Deterministic image transforms

#![allow(dead_code)]

use shuttercore::core::error::WatermarkError;
use shuttercore::ImageTransform;

/// Marker appended by `TaggingTransform`
pub const TAG: &[u8] = b"|watermarked";

/// "Watermarks" by appending [`TAG`], so posts show which path they took
pub struct TaggingTransform;

impl ImageTransform for TaggingTransform {
    fn apply(&self, image: &[u8]) -> Result<Vec<u8>, WatermarkError> {
        let mut out = image.to_vec();
        out.extend_from_slice(TAG);
        Ok(out)
    }
}

/// Always fails, like a missing font
pub struct FailingTransform;

impl ImageTransform for FailingTransform {
    fn apply(&self, _image: &[u8]) -> Result<Vec<u8>, WatermarkError> {
        Err(WatermarkError::Font("no font in test environment".to_string()))
    }
}

/// Panics inside the blocking task
pub struct PanickingTransform;

impl ImageTransform for PanickingTransform {
    fn apply(&self, _image: &[u8]) -> Result<Vec<u8>, WatermarkError> {
        panic!("transform exploded")
    }
}
