use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub embedding: EmbeddingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `"local"` (ONNX Runtime) or `"hash"` (deterministic, no model files).
    pub provider: String,
    pub model: String,
    pub cache_dir: String,
    /// `"auto"` or `"cpu"`.
    pub device: String,
    pub max_batch_size: usize,
    pub max_text_length: usize,
    /// Vector width for the `hash` provider.
    pub hash_dimensions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            log_level: "info".into(),
            cors_origins: vec![
                "http://localhost:3000".into(),
                "http://localhost:8000".into(),
            ],
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        let cache_dir = default_service_dir()
            .join("models")
            .to_string_lossy()
            .into_owned();
        Self {
            provider: "local".into(),
            model: "all-MiniLM-L6-v2".into(),
            cache_dir,
            device: "auto".into(),
            max_batch_size: 32,
            max_text_length: 8192,
            hash_dimensions: 384,
        }
    }
}

impl EmbeddingConfig {
    /// Directory holding `model.onnx` and `tokenizer.json` for the configured model.
    pub fn model_dir(&self) -> PathBuf {
        expand_tilde(&self.cache_dir).join(&self.model)
    }

    /// Resolve the configured device to the one inference runs on.
    pub fn resolved_device(&self) -> Result<&'static str> {
        match self.device.as_str() {
            "auto" | "cpu" => Ok("cpu"),
            other => anyhow::bail!("unsupported device: {other}. Supported: auto, cpu"),
        }
    }
}

/// Returns `~/.paper-embed/`
pub fn default_service_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".paper-embed")
}

/// Returns the default config file path: `~/.paper-embed/config.toml`
pub fn default_config_path() -> PathBuf {
    default_service_dir().join("config.toml")
}

impl ServiceConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, apply env var overrides, then validate.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            ServiceConfig::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Recognized: `AI_SERVICE_HOST`, `AI_SERVICE_PORT`, `EMBEDDING_MODEL`,
    /// `MAX_BATCH_SIZE`, `MAX_TEXT_LENGTH`, `PAPER_EMBED_PROVIDER`,
    /// `PAPER_EMBED_DEVICE`, `PAPER_EMBED_LOG_LEVEL`.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("AI_SERVICE_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("AI_SERVICE_PORT") {
            self.server.port = val
                .parse()
                .with_context(|| format!("AI_SERVICE_PORT is not a port: {val}"))?;
        }
        if let Ok(val) = std::env::var("EMBEDDING_MODEL") {
            self.embedding.model = val;
        }
        if let Ok(val) = std::env::var("MAX_BATCH_SIZE") {
            self.embedding.max_batch_size = val
                .parse()
                .with_context(|| format!("MAX_BATCH_SIZE is not an integer: {val}"))?;
        }
        if let Ok(val) = std::env::var("MAX_TEXT_LENGTH") {
            self.embedding.max_text_length = val
                .parse()
                .with_context(|| format!("MAX_TEXT_LENGTH is not an integer: {val}"))?;
        }
        if let Ok(val) = std::env::var("PAPER_EMBED_PROVIDER") {
            self.embedding.provider = val;
        }
        if let Ok(val) = std::env::var("PAPER_EMBED_DEVICE") {
            self.embedding.device = val;
        }
        if let Ok(val) = std::env::var("PAPER_EMBED_LOG_LEVEL") {
            self.server.log_level = val;
        }
        Ok(())
    }

    /// Reject limits the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.embedding.max_batch_size >= 1,
            "embedding.max_batch_size must be at least 1"
        );
        // Truncation keeps `max_text_length - 3` characters plus "...".
        anyhow::ensure!(
            self.embedding.max_text_length >= 4,
            "embedding.max_text_length must be at least 4, got {}",
            self.embedding.max_text_length
        );
        anyhow::ensure!(
            self.embedding.hash_dimensions >= 1,
            "embedding.hash_dimensions must be at least 1"
        );
        self.embedding.resolved_device()?;
        Ok(())
    }

    /// `host:port` the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
