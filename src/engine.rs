use crate::error::VisionError;
use crate::vision::{AnnotateImageRequest, BatchAnnotateImagesRequest, BatchAnnotateImagesResponse};
use async_trait::async_trait;

pub const NO_TEXT_FOUND: &str = "No text found.";
pub const NO_RESPONSE: &str = "No response from Vision API";

/// Remote service able to annotate a batch of images
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Returns the provider identifier (e.g., "google-vision")
    fn name(&self) -> &str;

    /// Submit one batch and wait for the provider's answer
    async fn batch_annotate(
        &self,
        batch: BatchAnnotateImagesRequest,
    ) -> Result<BatchAnnotateImagesResponse, VisionError>;
}

/// Run text detection over one uploaded image and return the detected text.
pub async fn extract_text(
    provider: &dyn VisionProvider,
    bytes: &[u8],
) -> Result<String, VisionError> {
    let batch = BatchAnnotateImagesRequest {
        requests: vec![AnnotateImageRequest::text_detection(bytes)],
    };

    let response = provider.batch_annotate(batch).await?;
    interpret_batch(response)
}

/// Turn a batch answer into the text returned to the caller.
///
/// Only the first response is read. Within it, the first annotation is the
/// provider's aggregate of the whole text block and is returned verbatim.
pub fn interpret_batch(batch: BatchAnnotateImagesResponse) -> Result<String, VisionError> {
    let Some(first) = batch.responses.into_iter().next() else {
        return Ok(NO_RESPONSE.to_string());
    };

    if let Some(status) = first.error {
        return Err(VisionError::Provider(status.message));
    }

    Ok(first
        .text_annotations
        .into_iter()
        .next()
        .map(|annotation| annotation.description)
        .unwrap_or_else(|| NO_TEXT_FOUND.to_string()))
}
