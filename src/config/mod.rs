//! Configuration loading for the ticker device.
//!
//! Settings are layered: factory defaults, then an optional TOML settings
//! file, then environment overrides named after the header constants
//! (`WIFI_SSID_1`, `NUM_STOCKS`, ...). The result is validated once into an
//! immutable [`Configuration`].

mod device_settings;
mod env_overrides;

pub use device_settings::{
    ApiSettings, CredentialSettings, DeviceSettings, DisplaySection, PinSettings, StockSettings,
    WifiSettings,
};
pub use env_overrides::override_keys;

pub use crate::domain::config::Configuration;
use anyhow::Result;
use std::env;
use std::path::Path;
use tracing::{info, warn};

/// Environment variable naming an optional TOML settings file
pub const CONFIG_PATH_VAR: &str = "TICKER_CONFIG";

const PLACEHOLDER_PREFIX: &str = "YOUR_";

/// Builder for the layered configuration sources.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    settings: DeviceSettings,
}

impl ConfigLoader {
    /// Start from the factory defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: DeviceSettings) -> Self {
        Self { settings }
    }

    /// Replace the current settings with the contents of a TOML file.
    ///
    /// Sections the file leaves out take the factory defaults. Apply
    /// overrides after this call, not before.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.settings = DeviceSettings::from_file(path)?;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is not an error
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            self.with_file(path)
        } else {
            info!("No settings file at {:?}, using defaults", path);
            Ok(self)
        }
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.settings.apply_overrides(lookup);
        self
    }

    /// Apply overrides from the process environment
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    pub fn settings(&self) -> &DeviceSettings {
        &self.settings
    }

    /// Validate the accumulated settings.
    ///
    /// A rejected configuration comes back as an `anyhow::Error` wrapping
    /// [`ValidationError`](crate::domain::errors::ValidationError); use
    /// `downcast_ref` to get at the individual violations.
    pub fn load(self) -> Result<Configuration> {
        let config = self.settings.validate()?;
        report(&config);
        Ok(config)
    }
}

/// Load the configuration the way the device does at boot.
///
/// Reads `.env` if present, then the file named by `TICKER_CONFIG` (if set),
/// then the process environment.
pub fn load() -> Result<Configuration> {
    dotenvy::dotenv().ok();

    let mut loader = ConfigLoader::new();
    if let Ok(path) = env::var(CONFIG_PATH_VAR) {
        loader = loader.with_file(path)?;
    }
    loader.with_env().load()
}

fn report(config: &Configuration) {
    let settings = config.display_settings();
    let symbols: Vec<&str> = config.tickers().map(|t| t.symbol()).collect();
    info!(
        "Configuration loaded: tickers={:?}, refresh={}s, flipped={}, secondary_wifi={}",
        symbols,
        settings.refresh_interval_seconds(),
        settings.flipped(),
        config.secondary_credential().is_some()
    );

    if config
        .primary_credential()
        .ssid()
        .starts_with(PLACEHOLDER_PREFIX)
    {
        warn!("WIFI_SSID_1 still holds the placeholder value; the device will not join a network");
    }
    if config.api_key().expose().starts_with(PLACEHOLDER_PREFIX) {
        warn!("FINNHUB_API_KEY still holds the placeholder value; quote requests will be rejected");
    }
    if settings.exceeds_free_tier(config.num_stocks()) {
        warn!(
            "{} tickers every {}s is {:.0} quote calls/minute, above the free tier limit of {}",
            config.num_stocks(),
            settings.refresh_interval_seconds(),
            settings.quote_calls_per_minute(config.num_stocks()),
            crate::domain::config::FREE_TIER_CALLS_PER_MINUTE
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ValidationError;

    #[test]
    fn test_loader_defaults() {
        let config = ConfigLoader::new().load().expect("Factory defaults should load");
        assert_eq!(config.num_stocks(), 5);
        assert_eq!(config.api_key().expose(), "YOUR_FINNHUB_API_KEY");
    }

    #[test]
    fn test_validation_error_is_downcastable() {
        let err = ConfigLoader::new()
            .with_overrides(|key| (key == "NUM_STOCKS").then(|| "0".to_string()))
            .load()
            .unwrap_err();

        let validation = err
            .downcast_ref::<ValidationError>()
            .expect("should be a ValidationError");
        assert!(validation.mentions("NUM_STOCKS"));
    }

    #[test]
    fn test_missing_optional_file_is_fine() {
        let loader = ConfigLoader::new()
            .with_optional_file("/nonexistent/ticker.toml")
            .unwrap();
        assert_eq!(loader.settings(), &DeviceSettings::default());
    }

    #[test]
    fn test_missing_required_file_is_error() {
        let err = ConfigLoader::new()
            .with_file("/nonexistent/ticker.toml")
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read settings file"));
    }
}
