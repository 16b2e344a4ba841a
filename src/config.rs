use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL_FILE: &str = "crop_recommendation_model.json";
pub const DEFAULT_ENCODER_FILE: &str = "label_encoder.json";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Locations of the two artifacts produced by the training pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub encoder: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(DEFAULT_MODEL_FILE),
            encoder: dir.join(DEFAULT_ENCODER_FILE),
        }
    }
}

impl Default for ArtifactPaths {
    /// Next to the running executable. Debug builds fall back to the crate
    /// root when no model sits there, so `cargo run` picks up artifacts
    /// placed beside Cargo.toml instead of looking in target/debug.
    fn default() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self::in_dir(default_artifact_dir(exe_dir, cfg!(debug_assertions)))
    }
}

fn default_artifact_dir(exe_dir: Option<PathBuf>, debug_build: bool) -> PathBuf {
    match exe_dir {
        Some(dir) if !debug_build || dir.join(DEFAULT_MODEL_FILE).exists() => dir,
        _ if debug_build => PathBuf::from(env!("CARGO_MANIFEST_DIR")),
        _ => PathBuf::from("."),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorsConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub artifacts: ArtifactPaths,
    pub cors: CorsConfig,
    pub max_payload_size: usize,
    /// `None` leaves the worker count to actix.
    pub workers: Option<usize>,
    pub log_level: log::LevelFilter,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            artifacts: ArtifactPaths::default(),
            cors: CorsConfig::default(),
            max_payload_size: 64 * 1024,
            workers: None,
            log_level: log::LevelFilter::Info,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(invalid("port", &self.port, "must be greater than 0"));
        }
        if self.max_payload_size == 0 {
            return Err(invalid(
                "max_payload_size",
                &self.max_payload_size,
                "must be greater than 0",
            ));
        }
        if self.workers == Some(0) {
            return Err(invalid("workers", &0, "must be greater than 0"));
        }
        for origin in &self.cors.allowed_origins {
            if origin != "*" && !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(invalid(
                    "cors_allowed_origins",
                    origin,
                    "must start with http:// or https://",
                ));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, value: &dyn std::fmt::Display, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
