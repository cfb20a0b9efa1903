//! ImageData
//!
//! The snapshot/patch pixel array the host reads and writes. Always a
//! value copy: `getImageData` copies out of the buffer, `putImageData`
//! copies back in, and mutating one side never touches the other.

use thiserror::Error;

/// ImageData construction error, the one fail-fast validation in the engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageDataError {
    #[error("image data dimensions must be positive")]
    InvalidDimensions,
    #[error("data length {actual} does not match {expected} (4 * width * height)")]
    InvalidLength { expected: usize, actual: usize },
}

/// Raw RGBA pixel array with clamped element writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageData {
    /// Create a zero-filled array
    pub fn new(width: u32, height: u32) -> Result<Self, ImageDataError> {
        if width == 0 || height == 0 {
            return Err(ImageDataError::InvalidDimensions);
        }
        Ok(Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * 4],
        })
    }

    /// Wrap existing bytes, validating the length invariant
    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ImageDataError> {
        if width == 0 || height == 0 {
            return Err(ImageDataError::InvalidDimensions);
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ImageDataError::InvalidLength { expected, actual: data.len() });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Indexed write with the clamped-byte-array contract: values clamp to
    /// [0, 255], non-finite values store 0, out-of-range indices are
    /// silently ignored.
    pub fn set(&mut self, index: usize, value: f64) {
        if index >= self.data.len() {
            return;
        }
        self.data[index] = if value.is_finite() {
            value.clamp(0.0, 255.0) as u8
        } else {
            0
        };
    }

    /// Indexed read; `None` past the end
    pub fn get(&self, index: usize) -> Option<u8> {
        self.data.get(index).copied()
    }
}
