use crate::Args;
use std::fmt;

pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Server configuration
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub vision_endpoint: String,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_file_size: 50 * 1024 * 1024,
            vision_endpoint: DEFAULT_VISION_ENDPOINT.to_string(),
            api_key: None,
            access_token: None,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_file_size: args.max_file_size,
            vision_endpoint: args.vision_endpoint,
            api_key: args.api_key,
            access_token: args.access_token,
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(secret: &Option<String>) -> &'static str {
            if secret.is_some() {
                "<redacted>"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_file_size", &self.max_file_size)
            .field("vision_endpoint", &self.vision_endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("access_token", &redact(&self.access_token))
            .finish()
    }
}
