//! Thumbnail retrieval and decoding
//!
//! Fetches an image by URL, decodes it, and resizes it to the requested
//! size. There is no cache and no retry; every render issues its own fetch.

use crate::error::ThumbnailError;
use crate::transport::HttpTransport;
use image::imageops::FilterType;
use image::ImageReader;
use std::fmt;
use std::io::Cursor;

/// Decoded RGBA8 thumbnail
#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thumbnail")
            .field("url", &self.url)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Requested thumbnail dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl ThumbnailSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn square(edge: u32) -> Self {
        Self::new(edge, edge)
    }
}

/// Thumbnail loader over any HTTP transport
pub struct ThumbnailLoader<T> {
    transport: T,
}

impl<T: HttpTransport> ThumbnailLoader<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch, decode and resize
    pub fn load(&self, url: &str, size: ThumbnailSize) -> Result<Thumbnail, ThumbnailError> {
        if size.width == 0 || size.height == 0 {
            return Err(ThumbnailError::InvalidSize(size.width, size.height));
        }

        tracing::debug!("Loading thumbnail: {} ({}x{})", url, size.width, size.height);

        let bytes = self.transport.get(url)?;
        decode_thumbnail(url, &bytes, size)
    }

    /// Like [`load`](Self::load), but a failure is logged and becomes `None`
    pub fn load_or_none(&self, url: &str, size: ThumbnailSize) -> Option<Thumbnail> {
        if url.trim().is_empty() {
            return None;
        }

        match self.load(url, size) {
            Ok(thumbnail) => Some(thumbnail),
            Err(e) => {
                tracing::warn!("Thumbnail unavailable for {}: {}", url, e);
                None
            }
        }
    }
}

/// Decode image bytes and resize to exactly `size`
pub fn decode_thumbnail(
    url: &str,
    bytes: &[u8],
    size: ThumbnailSize,
) -> Result<Thumbnail, ThumbnailError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ThumbnailError::Decode(e.to_string()))?;

    let img = reader.decode()?;
    let resized = img.resize_exact(size.width, size.height, FilterType::Triangle);

    let rgba = resized.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(Thumbnail {
        url: url.to_string(),
        width,
        height,
        data: rgba.into_raw(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// Encode a solid-color PNG
    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 80, 40, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }
}
