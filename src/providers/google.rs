//! Google Cloud Vision provider
//!
//! Calls the `images:annotate` REST endpoint with JSON bodies. Credentials
//! are either an API key (query parameter) or an OAuth2 access token
//! (bearer header); both are optional so a local proxy or emulator can be
//! used without credentials.

use crate::config::Config;
use crate::engine::VisionProvider;
use crate::error::VisionError;
use crate::vision::{BatchAnnotateImagesRequest, BatchAnnotateImagesResponse, ErrorEnvelope};
use async_trait::async_trait;
use reqwest::{Client, Url};

pub struct GoogleVisionProvider {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    access_token: Option<String>,
}

impl GoogleVisionProvider {
    pub fn new(config: &Config) -> Result<Self, VisionError> {
        let endpoint = Url::parse(&config.vision_endpoint).map_err(|e| {
            VisionError::Transport(format!(
                "Invalid Vision API endpoint '{}': {}",
                config.vision_endpoint, e
            ))
        })?;

        let client = Client::builder()
            .user_agent(concat!("invoice-ocr-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VisionError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            access_token: config.access_token.clone(),
        })
    }
}

#[async_trait]
impl VisionProvider for GoogleVisionProvider {
    fn name(&self) -> &str {
        "google-vision"
    }

    async fn batch_annotate(
        &self,
        batch: BatchAnnotateImagesRequest,
    ) -> Result<BatchAnnotateImagesResponse, VisionError> {
        let mut request = self.client.post(self.endpoint.clone()).json(&batch);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(images = batch.requests.len(), "Sending batch to Vision API");

        let response = request
            .send()
            .await
            .map_err(|e| VisionError::Transport(error_chain(&e)))?;

        // Reading the whole body hands the connection back to the pool.
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| VisionError::Transport(error_chain(&e)))?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(&body) {
                if !envelope.error.message.is_empty() {
                    return Err(VisionError::Provider(envelope.error.message));
                }
            }
            return Err(VisionError::Transport(format!(
                "Vision API returned {}: {}",
                status,
                String::from_utf8_lossy(&body)
            )));
        }

        serde_json::from_slice(&body).map_err(|e| {
            VisionError::Transport(format!("Failed to parse Vision API response: {}", e))
        })
    }
}

/// Render an error with all of its sources, e.g.
/// `error sending request ...: tcp connect error: Connection refused`.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
