//! Upload sources and image decoding.
//!
//! Supports PNG, JPEG, GIF and WebP via the `image` crate.

use std::io::Cursor;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, ImageReader, RgbaImage};
use tracing::debug;

use super::DesignError;

/// Formats an upload may use.
const ACCEPTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Raw upload handed to the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignSource {
    /// File contents.
    Bytes(Vec<u8>),
    /// A `data:image/...;base64,...` URI.
    DataUri(String),
}

impl DesignSource {
    /// Resolve to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::NotAnImage` for a data URI whose media type is
    /// not `image/*`, and `DesignError::DataUri` for a malformed URI.
    pub fn into_bytes(self) -> Result<Vec<u8>, DesignError> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::DataUri(uri) => parse_data_uri(&uri),
        }
    }
}

impl From<Vec<u8>> for DesignSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

fn parse_data_uri(uri: &str) -> Result<Vec<u8>, DesignError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| DesignError::DataUri("missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| DesignError::DataUri("missing ',' separator".to_string()))?;
    let mut params = header.split(';');
    let media_type = params.next().unwrap_or_default();
    if !media_type.to_ascii_lowercase().starts_with("image/") {
        return Err(DesignError::NotAnImage(media_type.to_string()));
    }
    if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(DesignError::DataUri("only base64 data URIs are supported".to_string()));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| DesignError::DataUri(e.to_string()))
}

/// Check that `bytes` look like a supported raster image.
///
/// Hosts call this before [`DesignComposer::load_image`](super::DesignComposer::load_image)
/// to reject non-image uploads early.
///
/// # Errors
///
/// Returns `DesignError::NotAnImage` if the format is unknown or unsupported.
pub fn sniff_image(bytes: &[u8]) -> Result<ImageFormat, DesignError> {
    let format = image::guess_format(bytes)
        .map_err(|_| DesignError::NotAnImage("unrecognized content".to_string()))?;
    if ACCEPTED_FORMATS.contains(&format) {
        Ok(format)
    } else {
        Err(DesignError::NotAnImage(format!("{format:?}")))
    }
}

/// A decoded upload, ready to become an image layer.
#[derive(Debug, Clone)]
pub struct DecodedDesign {
    pixels: Arc<RgbaImage>,
    format: Option<ImageFormat>,
}

impl DecodedDesign {
    /// Wrap already-decoded pixels.
    #[must_use]
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
            format: None,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Format the upload was decoded from, if it came from bytes.
    #[must_use]
    pub const fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    pub(crate) fn into_pixels(self) -> Arc<RgbaImage> {
        self.pixels
    }
}

/// Decode an upload on the current thread.
///
/// # Errors
///
/// Returns `DesignError` if the source is not a supported image or fails to decode.
pub fn decode(source: DesignSource) -> Result<DecodedDesign, DesignError> {
    let bytes = source.into_bytes()?;
    let format = sniff_image(&bytes)?;

    let image = ImageReader::with_format(Cursor::new(bytes), format)
        .decode()
        .map_err(|e| DesignError::Decode(e.to_string()))?;
    let pixels = image.into_rgba8();
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(DesignError::Decode("image has no pixels".to_string()));
    }

    debug!(
        width = pixels.width(),
        height = pixels.height(),
        ?format,
        "Decoded design upload"
    );
    Ok(DecodedDesign {
        pixels: Arc::new(pixels),
        format: Some(format),
    })
}

/// Decode an upload on the blocking thread pool.
///
/// # Errors
///
/// Same as [`decode`]; a panicked or cancelled decode task is reported as
/// `DesignError::Decode`.
pub async fn decode_async(source: DesignSource) -> Result<DecodedDesign, DesignError> {
    tokio::task::spawn_blocking(move || decode(source))
        .await
        .map_err(|e| DesignError::Decode(format!("decode task failed: {e}")))?
}
