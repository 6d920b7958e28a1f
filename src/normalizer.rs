//! Turns whatever the provider sent back into one displayable image.
//!
//! The router answers either with raw image bytes or with JSON whose shape
//! depends on the model backend. JSON fields are tried in a fixed order:
//! `generated_image`, then `images[0]`, then `[0].generated_image` when the
//! document is an array. The first non-null value wins.

use serde_json::Value;

use crate::error::NormalizationError;
use crate::models::{ImageRef, LocalImage};

const EMBEDDED_PREFIX: &str = "data:";
const PNG_DATA_PREFIX: &str = "data:image/png;base64,";

/// A provider response with its body already read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawApiResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Lowercased media type without parameters, e.g. `image/png`.
    fn media_type(&self) -> String {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase()
    }
}

pub fn normalize(response: RawApiResponse) -> Result<ImageRef, NormalizationError> {
    if !response.is_success() {
        return Err(NormalizationError::RequestFailed {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).trim().to_string(),
        });
    }

    let media_type = response.media_type();
    if media_type.starts_with("image/") {
        log::debug!(
            "Binary image response ({}, {} bytes)",
            media_type,
            response.body.len()
        );
        return Ok(ImageRef::Local(LocalImage::new(media_type, response.body)));
    }

    let document: Value = serde_json::from_slice(&response.body)
        .map_err(|e| NormalizationError::MalformedBody(e.to_string()))?;

    let image = extract_image(&document)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(NormalizationError::UnexpectedShape)?;

    Ok(ImageRef::Embedded(to_embedded(image)))
}

fn extract_image(document: &Value) -> Option<&Value> {
    let non_null = |v: &&Value| !v.is_null();

    document
        .get("generated_image")
        .filter(non_null)
        .or_else(|| document.get("images").and_then(|a| a.get(0)).filter(non_null))
        .or_else(|| {
            document
                .as_array()
                .and_then(|items| items.first())
                .and_then(|first| first.get("generated_image"))
                .filter(non_null)
        })
}

fn to_embedded(image: &str) -> String {
    if image.starts_with(EMBEDDED_PREFIX) {
        image.to_string()
    } else {
        format!("{}{}", PNG_DATA_PREFIX, image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn json_response(body: Value) -> RawApiResponse {
        RawApiResponse::new(200, Some("application/json"), body.to_string())
    }

    #[test]
    fn wraps_images_array_as_png_data_uri() {
        let image = normalize(json_response(json!({ "images": ["aGVsbG8="] }))).unwrap();
        assert_eq!(
            image,
            ImageRef::Embedded("data:image/png;base64,aGVsbG8=".to_string())
        );
    }

    #[test]
    fn data_uri_passes_through_unchanged() {
        let uri = "data:image/jpeg;base64,/9j/4AAQ";
        let image = normalize(json_response(json!({ "generated_image": uri }))).unwrap();
        assert_eq!(image.as_src(), uri);
    }

    #[test]
    fn binary_image_skips_json() {
        // Not valid JSON, so reaching the parser would fail the test.
        let body = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        let image = normalize(RawApiResponse::new(200, Some("image/png"), body.clone())).unwrap();

        match image {
            ImageRef::Local(local) => {
                assert_eq!(local.mime(), "image/png");
                assert_eq!(local.bytes(), body.as_slice());
                assert!(local.url().starts_with("blob:"));
            }
            other => panic!("expected local image, got {:?}", other),
        }
    }

    #[test]
    fn content_type_parameters_and_case_are_ignored() {
        let image = normalize(RawApiResponse::new(
            200,
            Some("Image/JPEG; charset=binary"),
            vec![1, 2, 3],
        ))
        .unwrap();
        assert!(image.is_local());
    }

    #[test]
    fn generated_image_beats_images_array() {
        let image = normalize(json_response(json!({
            "generated_image": "Zmlyc3Q=",
            "images": ["c2Vjb25k"]
        })))
        .unwrap();
        assert_eq!(image.as_src(), "data:image/png;base64,Zmlyc3Q=");
    }

    #[test]
    fn null_field_falls_through_to_next() {
        let image = normalize(json_response(json!({
            "generated_image": null,
            "images": ["c2Vjb25k"]
        })))
        .unwrap();
        assert_eq!(image.as_src(), "data:image/png;base64,c2Vjb25k");
    }

    #[test]
    fn array_document_uses_first_element() {
        let image = normalize(json_response(json!([
            { "generated_image": "dGhpcmQ=" },
            { "generated_image": "bm90IG1l" }
        ])))
        .unwrap();
        assert_eq!(image.as_src(), "data:image/png;base64,dGhpcmQ=");
    }

    #[test]
    fn unknown_shapes_are_rejected() {
        for body in [
            json!({ "error": "nope" }),
            json!({ "images": [] }),
            json!({ "generated_image": "" }),
            json!({ "generated_image": 42 }),
            json!([]),
            json!([{ "url": "x" }]),
        ] {
            assert_eq!(
                normalize(json_response(body.clone())),
                Err(NormalizationError::UnexpectedShape),
                "{}",
                body
            );
        }
    }

    #[test]
    fn failed_status_reports_body_text() {
        let err = normalize(RawApiResponse::new(
            503,
            Some("application/json"),
            r#"{"error":"Model is currently loading"}"#,
        ))
        .unwrap_err();
        assert_eq!(
            err,
            NormalizationError::RequestFailed {
                status: 503,
                body: r#"{"error":"Model is currently loading"}"#.to_string(),
            }
        );
    }

    #[test]
    fn failed_status_with_image_content_type_is_still_a_failure() {
        let err = normalize(RawApiResponse::new(500, Some("image/png"), "boom")).unwrap_err();
        assert!(matches!(err, NormalizationError::RequestFailed { status: 500, .. }));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = normalize(RawApiResponse::new(200, None, "{not json")).unwrap_err();
        assert!(matches!(err, NormalizationError::MalformedBody(_)));
    }
}
