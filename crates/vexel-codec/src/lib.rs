//! Vexel Codec
//!
//! Binary serialization for the raster engine: the PNG container
//! (RFC 2083) over a from-scratch DEFLATE layer (RFC 1951), and the
//! `data:` URI framing the canvas hands back to the host.
//!
//! Decoding tolerates truncated and malformed input by returning errors;
//! the compositor treats any decode failure as an image that never became
//! ready.

pub mod checksum;
pub mod data_url;
pub mod deflate;
pub mod png;

pub use data_url::{decode_png_data_url, encode_png_data_url, DataUrlError};
pub use deflate::{deflate_zlib_stored, inflate_zlib, InflateError};
pub use png::{DecodedImage, PngError};
