use nova_build_index::{CodeIndexOptions, ReportOptions};
use serde::{Deserialize, Serialize};
use std::{
    io,
    path::{Path, PathBuf},
    sync::Once,
};
use tracing_subscriber::{prelude::*, EnvFilter};

static TRACING_INIT: Once = Once::new();

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file `{}`", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings read from the optional `--config` TOML file.
///
/// ```toml
/// [logging]
/// level = "debug"
///
/// [index]
/// compute_artifact_ages = true
///
/// [report]
/// suppress_deprecated = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Index options used when the snapshot does not carry its own.
    #[serde(default)]
    pub index: CodeIndexOptions,

    #[serde(default)]
    pub report: ReportOptions,
}

impl ToolConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level, or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Reports go to stdout; keep stderr quiet unless asked.
    const DEFAULT_LEVEL: &'static str = "warn";

    fn default_level() -> String {
        Self::DEFAULT_LEVEL.to_owned()
    }

    /// Accept bare level names in any case (plus `warning`); pass anything else through as
    /// `EnvFilter` directives such as `warn,nova.build_index=debug`.
    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        let lower = trimmed.to_ascii_lowercase();
        match lower.as_str() {
            "" => Self::default_level(),
            "warning" => "warn".to_owned(),
            "trace" | "debug" | "info" | "warn" | "error" => lower.clone(),
            _ => trimmed.to_owned(),
        }
    }

    /// The effective filter: the configured level, with `RUST_LOG` directives layered on top.
    pub fn env_filter(&self) -> EnvFilter {
        self.filter_with(std::env::var("RUST_LOG").ok().as_deref())
    }

    fn filter_with(&self, overrides: Option<&str>) -> EnvFilter {
        let mut directives = Self::normalize_level_directives(&self.level);
        if let Some(overrides) = overrides.map(str::trim).filter(|value| !value.is_empty()) {
            directives.push(',');
            directives.push_str(overrides);
        }
        EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(Self::DEFAULT_LEVEL))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

/// Install the global `tracing` subscriber, logging to stderr.
///
/// Only the first call has an effect.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();
        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        // Embedders may already have installed a subscriber.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
