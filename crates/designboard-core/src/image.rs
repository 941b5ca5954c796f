//! Image references carried as data URLs.

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

/// Why a data URL was rejected as an image reference.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageDataError {
    #[error("not a data URL")]
    NotDataUrl,
    #[error("unsupported media type: {0}")]
    NotAnImage(String),
    #[error("data URL is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Decode(String),
    #[error("empty image payload")]
    Empty,
}

/// Image format recognised from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// Summary of a validated image data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Declared media type, e.g. `image/png`.
    pub mime: String,
    /// Format sniffed from the payload, when recognised.
    pub format: Option<ImageFormat>,
    /// Decoded payload length in bytes.
    pub byte_len: usize,
}

/// Validate a `data:image/<subtype>;base64,<payload>` URL.
pub fn parse_data_url(url: &str) -> Result<ImageData, ImageDataError> {
    let rest = url.strip_prefix("data:").ok_or(ImageDataError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(ImageDataError::NotDataUrl)?;

    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !mime.starts_with("image/") {
        return Err(ImageDataError::NotAnImage(mime));
    }
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(ImageDataError::NotBase64);
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ImageDataError::Decode(e.to_string()))?;
    if bytes.is_empty() {
        return Err(ImageDataError::Empty);
    }

    Ok(ImageData {
        mime,
        format: ImageFormat::from_magic_bytes(&bytes),
        byte_len: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_url() -> String {
        let bytes = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        format!("data:image/png;base64,{}", STANDARD.encode(bytes))
    }

    #[test]
    fn test_valid_png() {
        let data = parse_data_url(&png_url()).unwrap();
        assert_eq!(data.mime, "image/png");
        assert_eq!(data.format, Some(ImageFormat::Png));
        assert_eq!(data.byte_len, 8);
    }

    #[test]
    fn test_rejects_non_image() {
        let url = format!("data:text/plain;base64,{}", STANDARD.encode("hello"));
        assert!(matches!(parse_data_url(&url), Err(ImageDataError::NotAnImage(_))));
    }

    #[test]
    fn test_rejects_plain_url() {
        assert_eq!(parse_data_url("https://example.com/a.png"), Err(ImageDataError::NotDataUrl));
    }

    #[test]
    fn test_rejects_percent_encoded() {
        assert_eq!(parse_data_url("data:image/svg+xml,<svg/>"), Err(ImageDataError::NotBase64));
    }

    #[test]
    fn test_rejects_bad_payload() {
        assert!(matches!(
            parse_data_url("data:image/png;base64,@@@"),
            Err(ImageDataError::Decode(_))
        ));
        assert_eq!(parse_data_url("data:image/png;base64,"), Err(ImageDataError::Empty));
    }

    #[test]
    fn test_unknown_format_still_accepted() {
        let url = format!("data:image/bmp;base64,{}", STANDARD.encode([1u8, 2, 3, 4, 5]));
        let data = parse_data_url(&url).unwrap();
        assert_eq!(data.format, None);
    }
}
