//! Raw, unvalidated device settings.
//!
//! This is the shape of the settings file. Values arrive here from the
//! factory defaults, a TOML file and environment overrides, and only become
//! a [`Configuration`] after [`DeviceSettings::validate`].

use crate::domain::config::{
    Configuration, DisplaySettings, HardwarePinMap, NetworkCredential, Secret, TickerList,
};
use crate::domain::errors::{ValidationError, Violation, Violations};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialSettings {
    #[serde(default)]
    pub ssid: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WifiSettings {
    pub primary: CredentialSettings,
    pub secondary: CredentialSettings,
}

impl Default for WifiSettings {
    fn default() -> Self {
        Self {
            primary: CredentialSettings {
                ssid: "YOUR_WIFI_SSID".to_string(),
                password: "YOUR_WIFI_PASSWORD".to_string(),
            },
            secondary: CredentialSettings {
                ssid: String::new(),
                password: String::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiSettings {
    pub finnhub_api_key: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            finnhub_api_key: "YOUR_FINNHUB_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StockSettings {
    pub symbol: String,
    #[serde(default)]
    pub shares: f64,
}

impl StockSettings {
    pub fn new(symbol: &str, shares: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            shares,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySection {
    pub refresh_seconds: i64,
    pub flip: bool,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            refresh_seconds: 15,
            flip: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PinSettings {
    pub oled_sda: i64,
    pub oled_scl: i64,
    pub oled_rst: i64,
    pub oled_i2c_addr: i64,
    pub button: i64,
}

impl Default for PinSettings {
    fn default() -> Self {
        let wiring = HardwarePinMap::default();
        Self {
            oled_sda: wiring.data_pin.into(),
            oled_scl: wiring.clock_pin.into(),
            oled_rst: wiring.reset_pin.into(),
            oled_i2c_addr: wiring.display_address.into(),
            button: wiring.button_pin.into(),
        }
    }
}

fn factory_stocks() -> Vec<StockSettings> {
    vec![
        StockSettings::new("TSLA", 80.0),
        StockSettings::new("AAPL", 10.0),
        StockSettings::new("NVDA", 5.0),
        StockSettings::new("MSFT", 0.0),
        StockSettings::new("GOOGL", 0.0),
    ]
}

/// Every configurable device setting, before validation.
///
/// Sections missing from a settings file fall back to the factory defaults.
/// `num_stocks` left unset means "every declared stock".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_stocks: Option<i64>,
    #[serde(default)]
    pub wifi: WifiSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub display: DisplaySection,
    #[serde(default)]
    pub pins: PinSettings,
    #[serde(default = "factory_stocks")]
    pub stocks: Vec<StockSettings>,

    /// Problems found while applying overrides, reported during validation
    #[serde(skip)]
    pub(crate) override_errors: Vec<Violation>,
}

impl Default for DeviceSettings {
    /// The factory header values
    fn default() -> Self {
        Self {
            num_stocks: Some(5),
            wifi: WifiSettings::default(),
            api: ApiSettings::default(),
            display: DisplaySection::default(),
            pins: PinSettings::default(),
            stocks: factory_stocks(),
            override_errors: Vec::new(),
        }
    }
}

impl DeviceSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse device settings TOML")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
        debug!("Loaded device settings from {:?}", path);
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize device settings")
    }

    /// Active ticker count: explicit `num_stocks`, or every declared stock
    pub fn effective_num_stocks(&self) -> i64 {
        self.num_stocks.unwrap_or(self.stocks.len() as i64)
    }

    /// Violations recorded while applying overrides
    pub fn override_errors(&self) -> &[Violation] {
        &self.override_errors
    }

    /// Check every invariant and build the immutable configuration.
    ///
    /// Never partially succeeds: either every check passes or the returned
    /// error lists all of the problems found.
    pub fn validate(&self) -> Result<Configuration, ValidationError> {
        let mut violations = Violations::new();
        violations.extend(self.override_errors.iter().cloned());

        let primary = NetworkCredential::checked(
            self.wifi.primary.ssid.clone(),
            Secret::new(self.wifi.primary.password.as_str()),
            "WIFI_SSID_1",
            "WIFI_PASSWORD_1",
            true,
            &mut violations,
        );
        let secondary = NetworkCredential::checked(
            self.wifi.secondary.ssid.clone(),
            Secret::new(self.wifi.secondary.password.as_str()),
            "WIFI_SSID_2",
            "WIFI_PASSWORD_2",
            false,
            &mut violations,
        );
        if !secondary.is_configured() && !secondary.is_open() {
            warn!("WIFI_PASSWORD_2 is set but WIFI_SSID_2 is empty; secondary network unused");
        }

        let num_stocks = self.effective_num_stocks();
        let declared: Vec<(&str, f64)> = self
            .stocks
            .iter()
            .map(|s| (s.symbol.as_str(), s.shares))
            .collect();
        let tickers = TickerList::checked(num_stocks, &declared, &mut violations);
        if let Some(ref list) = tickers
            && declared.len() > list.len()
        {
            debug!(
                "Ignoring {} declared stock(s) beyond NUM_STOCKS={}",
                declared.len() - list.len(),
                num_stocks
            );
        }

        let display = DisplaySettings::checked(
            self.display.refresh_seconds,
            self.display.flip,
            &mut violations,
        );

        let pins = HardwarePinMap::checked(
            self.pins.oled_sda,
            self.pins.oled_scl,
            self.pins.oled_rst,
            self.pins.button,
            self.pins.oled_i2c_addr,
            &mut violations,
        );

        let config = Configuration::checked(
            primary,
            secondary,
            Secret::new(self.api.finnhub_api_key.as_str()),
            tickers,
            display,
            pins,
            &mut violations,
        );

        violations.finish_with("configuration", config)
    }
}

impl TryFrom<&DeviceSettings> for Configuration {
    type Error = ValidationError;

    fn try_from(settings: &DeviceSettings) -> Result<Self, Self::Error> {
        settings.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_defaults_validate() {
        let config = DeviceSettings::default().validate().unwrap();
        assert_eq!(config.num_stocks(), 5);
        assert_eq!(config.primary_credential().ssid(), "YOUR_WIFI_SSID");
        assert!(config.secondary_credential().is_none());
        assert_eq!(config.display_settings().refresh_interval_seconds(), 15);
        assert!(config.display_settings().flipped());
        assert_eq!(config.pin_map().display_address, 0x3c);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let settings = DeviceSettings::from_toml_str(
            r#"
            [wifi.primary]
            ssid = "HomeNet"
            password = "hunter22"

            [display]
            refresh_seconds = 30
            "#,
        )
        .unwrap();

        assert_eq!(settings.wifi.primary.ssid, "HomeNet");
        assert!(settings.wifi.secondary.ssid.is_empty());
        assert_eq!(settings.display.refresh_seconds, 30);
        assert!(settings.display.flip);
        assert_eq!(settings.stocks.len(), 5);
        assert_eq!(settings.pins, PinSettings::default());
    }

    #[test]
    fn test_num_stocks_defaults_to_declared_count() {
        let settings = DeviceSettings::from_toml_str(
            r#"
            [[stocks]]
            symbol = "AMD"
            shares = 3.5

            [[stocks]]
            symbol = "INTC"
            "#,
        )
        .unwrap();

        assert_eq!(settings.num_stocks, None);
        assert_eq!(settings.effective_num_stocks(), 2);
        let config = settings.validate().unwrap();
        let symbols: Vec<&str> = config.tickers().map(|t| t.symbol()).collect();
        assert_eq!(symbols, vec!["AMD", "INTC"]);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result = DeviceSettings::from_toml_str("refresh = 10\n");
        assert!(result.is_err());

        let result = DeviceSettings::from_toml_str("[pins]\noled_sdaa = 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_template_parses_back() {
        let template = DeviceSettings::default().to_toml_string().unwrap();
        assert!(template.contains("TSLA"));
        let parsed = DeviceSettings::from_toml_str(&template).unwrap();
        assert_eq!(parsed, DeviceSettings::default());
    }

    #[test]
    fn test_all_violations_reported_together() {
        let mut settings = DeviceSettings::default();
        settings.api.finnhub_api_key.clear();
        settings.wifi.primary.ssid.clear();
        settings.display.refresh_seconds = 5;
        settings.stocks[1].shares = -2.0;
        settings.pins.button = 4;

        let err = settings.validate().unwrap_err();
        assert!(err.mentions("FINNHUB_API_KEY"));
        assert!(err.mentions("WIFI_SSID_1"));
        assert!(err.mentions("REFRESH_SECONDS"));
        assert!(err.mentions("SHARES_STOCK_2"));
        assert!(err.mentions("pins"));
        assert_eq!(err.violations().len(), 5);
    }
}
