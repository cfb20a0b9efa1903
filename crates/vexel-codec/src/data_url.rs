//! Data URL Framing
//!
//! The `data:image/png;base64,` container the canvas hands back to the
//! host, and the mirror parser used when a source image arrives the same
//! way.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

const PNG_PREFIX: &str = "data:image/png;base64,";

/// Data URL parse error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUrlError {
    #[error("missing data:image/png;base64 prefix")]
    MissingPrefix,
    #[error("invalid base64 payload")]
    InvalidBase64,
}

/// Frame PNG bytes as a `data:` URI string
pub fn encode_png_data_url(png: &[u8]) -> String {
    let mut out = String::with_capacity(PNG_PREFIX.len() + png.len() * 4 / 3 + 4);
    out.push_str(PNG_PREFIX);
    STANDARD.encode_string(png, &mut out);
    out
}

/// Extract PNG bytes from a `data:` URI string
pub fn decode_png_data_url(url: &str) -> Result<Vec<u8>, DataUrlError> {
    let payload = url
        .strip_prefix(PNG_PREFIX)
        .ok_or(DataUrlError::MissingPrefix)?;
    STANDARD
        .decode(payload)
        .map_err(|_| DataUrlError::InvalidBase64)
}
