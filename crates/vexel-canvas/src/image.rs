//! Image Sources
//!
//! Decoded pixels for `drawImage` and `createPattern`. An image either
//! carries pixels or is broken (undecodable, not ready); drawing a broken
//! image is a silent no-op, matching how a canvas treats a source that
//! never loaded.

use tracing::debug;

use vexel_codec::png;
use vexel_raster::PixelBuffer;

use crate::image_data::ImageData;

/// A drawImage / pattern source
#[derive(Debug, Clone)]
pub struct Image {
    pixels: Option<PixelBuffer>,
}

impl Image {
    /// An image that never became ready
    pub fn broken() -> Self {
        Self { pixels: None }
    }

    /// Wrap raw RGBA pixels; a length mismatch yields a broken image
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            pixels: PixelBuffer::from_rgba(width, height, data),
        }
    }

    /// Decode a PNG byte stream; any decode failure yields a broken image
    pub fn from_png_bytes(bytes: &[u8]) -> Self {
        match png::decode(bytes) {
            Ok(img) => Self {
                pixels: PixelBuffer::from_rgba(img.width, img.height, img.pixels),
            },
            Err(e) => {
                debug!(error = %e, "image source failed to decode");
                Self::broken()
            }
        }
    }

    /// Decode from a `data:image/png;base64,` URI
    pub fn from_data_url(url: &str) -> Self {
        match vexel_codec::decode_png_data_url(url) {
            Ok(bytes) => Self::from_png_bytes(&bytes),
            Err(e) => {
                debug!(error = %e, "image source data URL rejected");
                Self::broken()
            }
        }
    }

    /// Copy pixels out of an `ImageData`
    pub fn from_image_data(data: &ImageData) -> Self {
        Self {
            pixels: PixelBuffer::from_rgba(data.width(), data.height(), data.data().to_vec()),
        }
    }

    /// Check if pixels are available
    pub fn is_ready(&self) -> bool {
        self.pixels.is_some()
    }

    /// Natural width (0 for a broken image)
    pub fn width(&self) -> u32 {
        self.pixels.as_ref().map_or(0, PixelBuffer::width)
    }

    /// Natural height (0 for a broken image)
    pub fn height(&self) -> u32 {
        self.pixels.as_ref().map_or(0, PixelBuffer::height)
    }

    pub(crate) fn buffer(&self) -> Option<&PixelBuffer> {
        self.pixels.as_ref()
    }
}
