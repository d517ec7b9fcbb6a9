//! Application configuration.
//!
//! Loaded from TOML with serde defaults for every field, then overridden by
//! environment variables and finally by CLI flags.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Contract address of the deployed tic-tac-toe module.
pub const DEFAULT_MODULE_ADDRESS: &str =
    "0x71386741d663722a36e72a763da6b1655759447c2569b15e52970df1fe375d0b";

/// Environment variable overriding [`AppConfig::wallet_url`].
pub const ENV_WALLET_URL: &str = "TICTACTOE_WALLET_URL";
/// Environment variable overriding [`AppConfig::module_address`].
pub const ENV_MODULE_ADDRESS: &str = "TICTACTOE_MODULE_ADDRESS";
/// Environment variable overriding [`AppConfig::storage_path`].
pub const ENV_STORAGE: &str = "TICTACTOE_STORAGE";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address of the module exposing `tic_tac_toe::*`.
    #[serde(default = "default_module_address")]
    module_address: String,

    /// Base URL of the wallet bridge. Without one, no wallet is available.
    #[serde(default)]
    wallet_url: Option<String>,

    /// Key-value file holding the persisted score.
    #[serde(default = "default_storage_path")]
    storage_path: PathBuf,

    /// Log file used while the terminal UI owns the screen.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,

    /// Delays for deferred UI effects.
    #[serde(default)]
    timing: TimingConfig,
}

fn default_module_address() -> String {
    DEFAULT_MODULE_ADDRESS.to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("tictactoe_scores.json")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("tictactoe_dapp.log")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            module_address: default_module_address(),
            wallet_url: None,
            storage_path: default_storage_path(),
            log_file: default_log_file(),
            timing: TimingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(module = %config.module_address, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise starts from defaults, then
    /// applies environment overrides.
    #[instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) if p.exists() => Self::from_file(p)?,
            Some(p) => {
                info!(path = %p.display(), "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies overrides looked up through `lookup` (normally the process
    /// environment). Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_WALLET_URL) {
            debug!(%url, "Wallet URL overridden from environment");
            self.wallet_url = Some(url);
        }
        if let Some(module) = get(ENV_MODULE_ADDRESS) {
            debug!(%module, "Module address overridden from environment");
            self.module_address = module;
        }
        if let Some(storage) = get(ENV_STORAGE) {
            debug!(%storage, "Storage path overridden from environment");
            self.storage_path = PathBuf::from(storage);
        }
    }

    /// Replaces the wallet URL (CLI flag).
    pub fn with_wallet_url(mut self, url: Option<String>) -> Self {
        if url.is_some() {
            self.wallet_url = url;
        }
        self
    }
}

/// Delays, in milliseconds, for deferred effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Wait before demo mode when no wallet is present.
    pub demo_fallback_ms: u64,
    /// Wait before demo mode when the account query fails.
    pub demo_after_error_ms: u64,
    /// Computer "thinking" time.
    pub computer_move_ms: u64,
    /// Refresh after a submitted move.
    pub refresh_after_move_ms: u64,
    /// Refresh after a submitted game creation.
    pub refresh_after_create_ms: u64,
    /// Lifetime of dApp notices.
    pub notice_ms: u64,
    /// Lifetime of notices in the plain game.
    pub local_notice_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            demo_fallback_ms: 3_000,
            demo_after_error_ms: 5_000,
            computer_move_ms: 1_000,
            refresh_after_move_ms: 2_000,
            refresh_after_create_ms: 3_000,
            notice_ms: 5_000,
            local_notice_ms: 3_000,
        }
    }
}

impl TimingConfig {
    /// Every delay zero; handy for driving controllers in tests.
    pub fn immediate() -> Self {
        Self {
            demo_fallback_ms: 0,
            demo_after_error_ms: 0,
            computer_move_ms: 0,
            refresh_after_move_ms: 0,
            refresh_after_create_ms: 0,
            notice_ms: 5_000,
            local_notice_ms: 3_000,
        }
    }

    /// `demo_fallback_ms` as a duration.
    pub fn demo_fallback(&self) -> Duration {
        Duration::from_millis(self.demo_fallback_ms)
    }

    /// `demo_after_error_ms` as a duration.
    pub fn demo_after_error(&self) -> Duration {
        Duration::from_millis(self.demo_after_error_ms)
    }

    /// `computer_move_ms` as a duration.
    pub fn computer_move(&self) -> Duration {
        Duration::from_millis(self.computer_move_ms)
    }

    /// `refresh_after_move_ms` as a duration.
    pub fn refresh_after_move(&self) -> Duration {
        Duration::from_millis(self.refresh_after_move_ms)
    }

    /// `refresh_after_create_ms` as a duration.
    pub fn refresh_after_create(&self) -> Duration {
        Duration::from_millis(self.refresh_after_create_ms)
    }

    /// `notice_ms` as a duration.
    pub fn notice(&self) -> Duration {
        Duration::from_millis(self.notice_ms)
    }

    /// `local_notice_ms` as a duration.
    pub fn local_notice(&self) -> Duration {
        Duration::from_millis(self.local_notice_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
