//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The exposed variable set comes from
//! an optional JSON definitions file.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::domain::{Variable, VariableDef};
use crate::error::RegistryError;
use crate::sampler::SamplerConfig;

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// JSON file with variable definitions. `None` uses the demo set.
    pub variables_file: Option<PathBuf>,

    /// Capacity of the core task's event queue.
    pub core_channel_capacity: usize,

    /// Capacity of each client's outbound frame queue.
    pub client_queue_capacity: usize,

    /// Whether to bind the sampling producer to the stream controller.
    pub streaming_enabled: bool,

    /// Milliseconds between sample blocks while streaming.
    pub sample_interval_ms: u64,

    /// Samples per binary frame.
    pub sample_block_size: usize,

    /// ADC level above which the signal counts as high.
    pub edge_threshold: u16,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("LISTEN_ADDR is not a socket address")?;

        let variables_file = std::env::var("VARIABLES_FILE").ok().map(PathBuf::from);

        Ok(Self {
            listen_addr,
            variables_file,
            core_channel_capacity: parse_env("CORE_CHANNEL_CAPACITY", 1024).max(1),
            client_queue_capacity: parse_env("CLIENT_QUEUE_CAPACITY", 256).max(1),
            streaming_enabled: parse_env_bool("STREAMING_ENABLED", true),
            sample_interval_ms: parse_env("SAMPLE_INTERVAL_MS", 50).max(1),
            sample_block_size: parse_env("SAMPLE_BLOCK_SIZE", 64).max(1),
            edge_threshold: parse_env("EDGE_THRESHOLD", 3500),
        })
    }

    /// Loads the variable set: the definitions file if configured,
    /// otherwise [`default_variables`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds an invalid
    /// definition.
    pub fn load_variables(&self) -> anyhow::Result<Vec<Variable>> {
        let Some(path) = &self.variables_file else {
            return Ok(default_variables(self.edge_threshold)?);
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        parse_variables(&json).with_context(|| format!("parsing {}", path.display()))
    }

    /// Returns the sampler settings.
    #[must_use]
    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            interval: Duration::from_millis(self.sample_interval_ms),
            block_size: self.sample_block_size,
            threshold: self.edge_threshold,
        }
    }
}

/// Parses a JSON array of variable definitions.
///
/// # Errors
///
/// Returns an error on malformed JSON or an invalid definition.
pub fn parse_variables(json: &str) -> anyhow::Result<Vec<Variable>> {
    let defs: Vec<VariableDef> = serde_json::from_str(json)?;
    let vars = defs
        .into_iter()
        .map(Variable::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(vars)
}

/// Built-in variable set used when no definitions file is configured.
///
/// # Errors
///
/// Returns a [`RegistryError`] if `threshold` exceeds the 12-bit ADC range.
pub fn default_variables(threshold: u16) -> Result<Vec<Variable>, RegistryError> {
    Ok(vec![
        Variable::float("gain", 1.0).with_limits(0.0, 10.0)?,
        Variable::int("threshold", i64::from(threshold)).with_limits(0.0, 4095.0)?,
        Variable::int("edge_count", 0),
        Variable::text("label", "photogate"),
    ])
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

/// Parses `"true"`, `"1"`, `"false"` or `"0"`, ignoring ASCII case.
fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
