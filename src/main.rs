use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod engine;
mod error;
mod providers;
mod server;
mod vision;

#[derive(Parser, Debug)]
#[command(name = "invoice-ocr-server")]
#[command(about = "Invoice text extraction backed by the Google Cloud Vision API")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "INVOICE_OCR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "INVOICE_OCR_PORT", default_value = "8080")]
    pub port: u16,

    /// Maximum request body size in bytes (default: 50MB)
    #[arg(long, env = "INVOICE_OCR_MAX_FILE_SIZE", default_value = "52428800")]
    pub max_file_size: usize,

    /// Vision API `images:annotate` endpoint
    #[arg(
        long,
        env = "VISION_ENDPOINT",
        default_value = config::DEFAULT_VISION_ENDPOINT
    )]
    pub vision_endpoint: String,

    /// Google Cloud API key, sent as the `key` query parameter
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OAuth2 access token, sent as a bearer token
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from(args);

    tracing::info!("Starting invoice-ocr-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Binding to {}:{}", config.host, config.port);

    if config.api_key.is_none() && config.access_token.is_none() {
        tracing::warn!("No Vision API credentials configured; requests will be sent unauthenticated");
    }

    server::run(config).await
}
