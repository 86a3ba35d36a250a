//! Request and response shapes of the Vision `images:annotate` REST call.
//!
//! Only the fields this service reads or writes are modelled; unknown
//! fields in provider responses are ignored.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchAnnotateImagesRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnnotateImageRequest {
    pub image: Image,
    pub features: Vec<Feature>,
}

impl AnnotateImageRequest {
    /// Single-feature text detection request over raw image bytes.
    pub fn text_detection(bytes: &[u8]) -> Self {
        Self {
            image: Image {
                content: STANDARD.encode(bytes),
            },
            features: vec![Feature {
                kind: FeatureType::TextDetection,
            }],
        }
    }
}

/// Inline image payload, base64 encoded.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Image {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    TextDetection,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BatchAnnotateImagesResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    /// The first entry holds the whole detected text; the rest are
    /// word-level fragments.
    #[serde(default)]
    pub text_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    pub error: Option<Status>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EntityAnnotation {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub locale: Option<String>,
}

/// RPC status, used both per image and for whole-call failures.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Status {
    #[serde(default)]
    #[allow(dead_code)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Body the REST endpoint returns alongside a non-2xx status.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_detection_request_shape() {
        let batch = BatchAnnotateImagesRequest {
            requests: vec![AnnotateImageRequest::text_detection(b"hello")],
        };

        assert_eq!(
            serde_json::to_value(&batch).unwrap(),
            json!({
                "requests": [{
                    "image": { "content": "aGVsbG8=" },
                    "features": [{ "type": "TEXT_DETECTION" }]
                }]
            })
        );
    }

    #[test]
    fn test_response_with_annotations() {
        let body = json!({
            "responses": [{
                "textAnnotations": [
                    {
                        "locale": "en",
                        "description": "INVOICE #123\nTOTAL 40\n",
                        "boundingPoly": { "vertices": [{ "x": 1, "y": 2 }] }
                    },
                    { "description": "INVOICE" }
                ],
                "fullTextAnnotation": { "text": "INVOICE #123\nTOTAL 40\n" }
            }]
        });

        let parsed: BatchAnnotateImagesResponse = serde_json::from_value(body).unwrap();
        let first = &parsed.responses[0];
        assert_eq!(first.text_annotations.len(), 2);
        assert_eq!(first.text_annotations[0].description, "INVOICE #123\nTOTAL 40\n");
        assert_eq!(first.text_annotations[0].locale.as_deref(), Some("en"));
        assert!(first.error.is_none());
    }

    #[test]
    fn test_response_defaults_for_omitted_fields() {
        let parsed: BatchAnnotateImagesResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.responses.is_empty());

        let parsed: BatchAnnotateImagesResponse =
            serde_json::from_str(r#"{"responses":[{}]}"#).unwrap();
        assert_eq!(parsed.responses, vec![AnnotateImageResponse::default()]);
    }

    #[test]
    fn test_per_image_error() {
        let parsed: BatchAnnotateImagesResponse = serde_json::from_value(json!({
            "responses": [{ "error": { "code": 3, "message": "Bad image data." } }]
        }))
        .unwrap();

        let status = parsed.responses[0].error.as_ref().unwrap();
        assert_eq!(status.code, 3);
        assert_eq!(status.message, "Bad image data.");
    }

    #[test]
    fn test_error_envelope() {
        let parsed: ErrorEnvelope = serde_json::from_value(json!({
            "error": {
                "code": 403,
                "message": "The request is missing a valid API key.",
                "status": "PERMISSION_DENIED"
            }
        }))
        .unwrap();

        assert_eq!(parsed.error.code, 403);
        assert_eq!(parsed.error.message, "The request is missing a valid API key.");
    }
}
