//! PNG Codec
//!
//! RFC 2083 encoder and decoder. The encoder always writes 8-bit RGBA with
//! unfiltered scanlines; the decoder accepts the five color types at bit
//! depths 1 through 16 and converts everything to RGBA8.

use thiserror::Error;

use crate::checksum::Crc32;
use crate::deflate::{deflate_zlib_stored, inflate_zlib, InflateError};

const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// PNG decoding error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PngError {
    #[error("not a PNG stream")]
    BadSignature,
    #[error("truncated or malformed chunk")]
    BadChunk,
    #[error("missing IHDR chunk")]
    MissingHeader,
    #[error("unsupported color type or bit depth")]
    BadHeader,
    #[error("Adam7 interlacing is not supported")]
    UnsupportedInterlace,
    #[error("invalid scanline filter")]
    BadFilter,
    #[error("scanline data ends early")]
    TruncatedImage,
    #[error("palette index out of range")]
    BadPalette,
    #[error(transparent)]
    Inflate(#[from] InflateError),
}

/// Decoded image, always RGBA8
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Encode an RGBA8 buffer as a PNG byte stream.
///
/// `rgba` must hold `width * height * 4` bytes; both dimensions must be
/// non-zero (the IHDR grammar has no zero-size images).
pub fn encode(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
    debug_assert!(width > 0 && height > 0);
    debug_assert_eq!(rgba.len(), width as usize * height as usize * 4);

    let stride = width as usize * 4;
    let mut raw = Vec::with_capacity((stride + 1) * height as usize);
    for row in rgba.chunks(stride.max(1)) {
        raw.push(0); // filter: None
        raw.extend_from_slice(row);
    }

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    // 8-bit, truecolor with alpha, deflate, adaptive filtering, no interlace
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);

    let mut out = Vec::new();
    out.extend_from_slice(&SIGNATURE);
    push_chunk(&mut out, b"IHDR", &ihdr);
    push_chunk(&mut out, b"IDAT", &deflate_zlib_stored(&raw));
    push_chunk(&mut out, b"IEND", &[]);
    out
}

fn push_chunk(out: &mut Vec<u8>, tag: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(data);

    let mut crc = Crc32::new();
    crc.update(tag);
    crc.update(data);
    out.extend_from_slice(&crc.finish().to_be_bytes());
}

/// Decode a PNG byte stream to RGBA8
pub fn decode(data: &[u8]) -> Result<DecodedImage, PngError> {
    if data.len() < SIGNATURE.len() || data[..SIGNATURE.len()] != SIGNATURE {
        return Err(PngError::BadSignature);
    }

    let mut header: Option<Header> = None;
    let mut palette: Vec<[u8; 3]> = Vec::new();
    let mut transparency: Vec<u8> = Vec::new();
    let mut idat: Vec<u8> = Vec::new();

    let mut pos = SIGNATURE.len();
    while pos + 12 <= data.len() {
        let length =
            u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]) as usize;
        if pos + 12 + length > data.len() {
            return Err(PngError::BadChunk);
        }
        let tag = &data[pos + 4..pos + 8];
        let body = &data[pos + 8..pos + 8 + length];

        match tag {
            b"IHDR" => header = Some(Header::parse(body)?),
            b"PLTE" => {
                if length % 3 != 0 {
                    return Err(PngError::BadChunk);
                }
                palette = body.chunks(3).map(|c| [c[0], c[1], c[2]]).collect();
            }
            b"tRNS" => transparency = body.to_vec(),
            b"IDAT" => idat.extend_from_slice(body),
            b"IEND" => break,
            _ => {} // ancillary chunks are skipped
        }
        pos += 12 + length;
    }

    let header = header.ok_or(PngError::MissingHeader)?;
    let raw = inflate_zlib(&idat)?;
    let unfiltered = unfilter(&raw, &header)?;
    let pixels = expand_to_rgba(&unfiltered, &header, &palette, &transparency)?;

    Ok(DecodedImage {
        width: header.width,
        height: header.height,
        pixels,
    })
}

/// PNG color layout (IHDR color type codes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Gray,
    Rgb,
    Indexed,
    GrayAlpha,
    Rgba,
}

impl Layout {
    fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Gray),
            2 => Some(Self::Rgb),
            3 => Some(Self::Indexed),
            4 => Some(Self::GrayAlpha),
            6 => Some(Self::Rgba),
            _ => None,
        }
    }

    fn channels(self) -> usize {
        match self {
            Self::Gray | Self::Indexed => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    fn depth_valid(self, depth: u8) -> bool {
        match self {
            Self::Gray => matches!(depth, 1 | 2 | 4 | 8 | 16),
            Self::Indexed => matches!(depth, 1 | 2 | 4 | 8),
            Self::Rgb | Self::GrayAlpha | Self::Rgba => matches!(depth, 8 | 16),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Header {
    width: u32,
    height: u32,
    depth: u8,
    layout: Layout,
}

impl Header {
    fn parse(body: &[u8]) -> Result<Self, PngError> {
        if body.len() < 13 {
            return Err(PngError::BadChunk);
        }
        let width = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
        let height = u32::from_be_bytes([body[4], body[5], body[6], body[7]]);
        let depth = body[8];
        let layout = Layout::from_code(body[9]).ok_or(PngError::BadHeader)?;
        if width == 0 || height == 0 || !layout.depth_valid(depth) {
            return Err(PngError::BadHeader);
        }
        if body[12] != 0 {
            return Err(PngError::UnsupportedInterlace);
        }
        Ok(Self { width, height, depth, layout })
    }

    fn bytes_per_pixel(&self) -> usize {
        ((self.layout.channels() * self.depth as usize) + 7) / 8
    }

    fn stride(&self) -> usize {
        (self.width as usize * self.layout.channels() * self.depth as usize + 7) / 8
    }
}

/// Undo per-scanline filtering; returns `height * stride` reconstructed bytes
fn unfilter(raw: &[u8], header: &Header) -> Result<Vec<u8>, PngError> {
    let stride = header.stride();
    let bpp = header.bytes_per_pixel();
    let height = header.height as usize;

    let mut out = vec![0u8; height * stride];
    let mut pos = 0;

    for y in 0..height {
        if pos + 1 + stride > raw.len() {
            return Err(PngError::TruncatedImage);
        }
        let filter = raw[pos];
        pos += 1;

        let (done, rest) = out.split_at_mut(y * stride);
        let prev = done.get(done.len().wrapping_sub(stride)..).unwrap_or(&[]);
        let row = &mut rest[..stride];
        row.copy_from_slice(&raw[pos..pos + stride]);
        pos += stride;

        match filter {
            0 => {}
            1 => {
                for i in bpp..stride {
                    row[i] = row[i].wrapping_add(row[i - bpp]);
                }
            }
            2 => {
                for i in 0..stride {
                    row[i] = row[i].wrapping_add(up(prev, i));
                }
            }
            3 => {
                for i in 0..stride {
                    let left = if i >= bpp { row[i - bpp] } else { 0 };
                    let avg = ((left as u16 + up(prev, i) as u16) / 2) as u8;
                    row[i] = row[i].wrapping_add(avg);
                }
            }
            4 => {
                for i in 0..stride {
                    let left = if i >= bpp { row[i - bpp] } else { 0 };
                    let above = up(prev, i);
                    let upper_left = if i >= bpp { up(prev, i - bpp) } else { 0 };
                    row[i] = row[i].wrapping_add(paeth(left, above, upper_left));
                }
            }
            _ => return Err(PngError::BadFilter),
        }
    }

    Ok(out)
}

fn up(prev: &[u8], i: usize) -> u8 {
    prev.get(i).copied().unwrap_or(0)
}

fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Raw (unscaled) sample for pixel `x`, channel `c` of one row
fn raw_sample(row: &[u8], x: usize, c: usize, channels: usize, depth: u8) -> u16 {
    match depth {
        8 => row[x * channels + c] as u16,
        16 => {
            let idx = (x * channels + c) * 2;
            u16::from_be_bytes([row[idx], row[idx + 1]])
        }
        _ => {
            let bit = (x * channels + c) * depth as usize;
            let byte = row[bit / 8];
            let shift = 8 - depth as usize - (bit % 8);
            ((byte >> shift) & ((1 << depth) - 1)) as u16
        }
    }
}

/// Sample scaled to 8 bits
fn scaled_sample(row: &[u8], x: usize, c: usize, channels: usize, depth: u8) -> u8 {
    let raw = raw_sample(row, x, c, channels, depth);
    match depth {
        1 => (raw * 255) as u8,
        2 => (raw * 85) as u8,
        4 => (raw * 17) as u8,
        8 => raw as u8,
        _ => (raw >> 8) as u8,
    }
}

fn expand_to_rgba(
    data: &[u8],
    header: &Header,
    palette: &[[u8; 3]],
    transparency: &[u8],
) -> Result<Vec<u8>, PngError> {
    let width = header.width as usize;
    let height = header.height as usize;
    let stride = header.stride();
    let channels = header.layout.channels();
    let depth = header.depth;

    // Gray tRNS carries one 16-bit sample value to knock out
    let gray_key = match header.layout {
        Layout::Gray if transparency.len() >= 2 => {
            Some(u16::from_be_bytes([transparency[0], transparency[1]]))
        }
        _ => None,
    };

    let mut rgba = vec![255u8; width * height * 4];
    for y in 0..height {
        let row = &data[y * stride..(y + 1) * stride];
        for x in 0..width {
            let out = &mut rgba[(y * width + x) * 4..(y * width + x) * 4 + 4];
            match header.layout {
                Layout::Gray => {
                    let v = scaled_sample(row, x, 0, channels, depth);
                    out[0] = v;
                    out[1] = v;
                    out[2] = v;
                    if gray_key == Some(raw_sample(row, x, 0, channels, depth)) {
                        out[3] = 0;
                    }
                }
                Layout::GrayAlpha => {
                    let v = scaled_sample(row, x, 0, channels, depth);
                    out[0] = v;
                    out[1] = v;
                    out[2] = v;
                    out[3] = scaled_sample(row, x, 1, channels, depth);
                }
                Layout::Rgb => {
                    for c in 0..3 {
                        out[c] = scaled_sample(row, x, c, channels, depth);
                    }
                }
                Layout::Rgba => {
                    for c in 0..4 {
                        out[c] = scaled_sample(row, x, c, channels, depth);
                    }
                }
                Layout::Indexed => {
                    let idx = raw_sample(row, x, 0, channels, depth) as usize;
                    let entry = palette.get(idx).ok_or(PngError::BadPalette)?;
                    out[0] = entry[0];
                    out[1] = entry[1];
                    out[2] = entry[2];
                    out[3] = transparency.get(idx).copied().unwrap_or(255);
                }
            }
        }
    }

    Ok(rgba)
}
