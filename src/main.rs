use clap::Parser;
use crop_recommender_rs::app_state::AppState;
use crop_recommender_rs::artifacts::load_artifacts;
use crop_recommender_rs::config::{ArtifactPaths, CorsConfig, ServerConfig};
use crop_recommender_rs::logging::init_logging;
use crop_recommender_rs::server;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crop-recommender")]
#[command(about = "Serve a pretrained crop recommendation classifier over HTTP")]
struct CliArgs {
    /// Host address to bind the server
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Classifier artifact. Defaults to crop_recommendation_model.json next to
    /// the executable; debug builds fall back to the crate root when it is missing
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Label encoder artifact. Defaults to label_encoder.json in the same
    /// directory as the default classifier artifact
    #[arg(long)]
    encoder_path: Option<PathBuf>,

    /// Origins allowed by CORS; repeat for several. Any origin when omitted
    #[arg(long = "cors-allowed-origins", num_args = 1..)]
    cors_allowed_origins: Vec<String>,

    /// Whether CORS responses allow credentials
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    cors_allow_credentials: bool,

    /// Maximum request body size in bytes
    #[arg(long, default_value_t = 64 * 1024)]
    max_payload_size: usize,

    /// Number of HTTP worker threads (default: number of CPUs)
    #[arg(long)]
    workers: Option<usize>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,
}

impl CliArgs {
    fn to_server_config(&self) -> ServerConfig {
        let defaults = ArtifactPaths::default();
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            artifacts: ArtifactPaths {
                model: self.model_path.clone().unwrap_or(defaults.model),
                encoder: self.encoder_path.clone().unwrap_or(defaults.encoder),
            },
            cors: CorsConfig {
                allowed_origins: self.cors_allowed_origins.clone(),
                allow_credentials: self.cors_allow_credentials,
            },
            max_payload_size: self.max_payload_size,
            workers: self.workers,
            log_level: self.log_level,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = args.to_server_config();
    config.validate()?;

    init_logging(config.log_level);

    // Serving without both artifacts is never allowed.
    let artifacts = load_artifacts(&config.artifacts).map_err(|e| {
        log::error!("Error loading model or encoder: {}", e);
        e
    })?;
    log::info!("Model and encoder loaded successfully");

    actix_web::rt::System::new().block_on(server::startup(config, AppState::ready(artifacts)))?;
    Ok(())
}
