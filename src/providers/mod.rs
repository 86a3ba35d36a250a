//! Vision provider implementations
//!
//! The service talks to exactly one provider, constructed once at startup
//! from the configuration and handed to the router state.

pub mod google;

use crate::config::Config;
use crate::engine::VisionProvider;
use crate::error::VisionError;
use std::sync::Arc;

/// Build the configured provider
pub fn build(config: &Config) -> Result<Arc<dyn VisionProvider>, VisionError> {
    tracing::info!("Initializing Google Vision provider...");
    let provider = google::GoogleVisionProvider::new(config)?;
    tracing::info!(
        provider = provider.name(),
        endpoint = %config.vision_endpoint,
        "Vision provider ready"
    );
    Ok(Arc::new(provider))
}
