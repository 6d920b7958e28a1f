use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GenerationError, Result};
use crate::models::Dimensions;

/// JSON body sent for one image: `{"inputs": ..., "parameters": {"width", "height"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferencePayload {
    pub inputs: String,
    pub parameters: InferenceParameters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceParameters {
    pub width: u32,
    pub height: u32,
}

impl InferencePayload {
    pub fn new(prompt: &str, dimensions: Dimensions) -> Self {
        Self {
            inputs: prompt.to_string(),
            parameters: InferenceParameters {
                width: dimensions.width,
                height: dimensions.height,
            },
        }
    }
}

/// Binary image held locally under a `blob:` handle. Dropping it releases the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalImage {
    url: String,
    mime: String,
    bytes: Vec<u8>,
}

impl LocalImage {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            url: format!("blob:{}", Uuid::new_v4()),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for LocalImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalImage")
            .field("url", &self.url)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A displayable image: either an embedded `data:` URI or a local binary handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Embedded(String),
    Local(LocalImage),
}

impl ImageRef {
    /// The string a renderer would use as the image source.
    pub fn as_src(&self) -> &str {
        match self {
            ImageRef::Embedded(uri) => uri,
            ImageRef::Local(image) => image.url(),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ImageRef::Local(_))
    }

    /// Decodes the image into its MIME type and raw bytes.
    pub fn decode(&self) -> Result<(String, Vec<u8>)> {
        match self {
            ImageRef::Local(image) => Ok((image.mime().to_string(), image.bytes().to_vec())),
            ImageRef::Embedded(uri) => decode_data_uri(uri),
        }
    }
}

fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| GenerationError::Decode("not a data URI".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| GenerationError::Decode("data URI has no payload".into()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| GenerationError::Decode("only base64 data URIs are supported".into()))?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| GenerationError::Decode(e.to_string()))?;

    let mime = if mime.is_empty() { "image/png" } else { mime };
    Ok((mime.to_string(), bytes))
}

/// File extension for an image MIME type, `png` when unknown.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime.split(';').next().unwrap_or("").trim() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_matches_router_body() {
        let payload = InferencePayload::new(
            "a lighthouse",
            Dimensions {
                width: 672,
                height: 384,
            },
        );
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "inputs": "a lighthouse",
                "parameters": { "width": 672, "height": 384 }
            })
        );
    }

    #[test]
    fn local_image_gets_blob_handle() {
        let image = ImageRef::Local(LocalImage::new("image/jpeg", vec![0xff, 0xd8, 0xff]));
        assert!(image.as_src().starts_with("blob:"));
        assert!(image.is_local());
        let (mime, bytes) = image.decode().unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, vec![0xff, 0xd8, 0xff]);
    }

    #[test]
    fn decodes_embedded_png() {
        let image = ImageRef::Embedded("data:image/png;base64,iVBORw0K".to_string());
        let (mime, bytes) = image.decode().unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn rejects_non_base64_data_uri() {
        let image = ImageRef::Embedded("data:image/svg+xml,%3Csvg%3E".to_string());
        assert!(matches!(image.decode(), Err(GenerationError::Decode(_))));
    }

    #[test]
    fn extensions() {
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/webp; q=1"), "webp");
        assert_eq!(extension_for_mime("application/octet-stream"), "png");
    }
}
