//! Environment overrides named after the device header constants.
//!
//! `WIFI_SSID_1`, `NUM_STOCKS`, `STOCK_3`, `OLED_I2C_ADDR`, ... replace the
//! matching value from the defaults or the settings file. A value that does
//! not parse is recorded as a violation instead of being dropped.

use super::device_settings::{DeviceSettings, StockSettings};
use crate::domain::config::MAX_STOCKS;
use crate::domain::errors::Violation;
use tracing::debug;

/// Every variable name that [`DeviceSettings::apply_overrides`] consults.
pub fn override_keys() -> Vec<String> {
    let mut keys: Vec<String> = [
        "WIFI_SSID_1",
        "WIFI_PASSWORD_1",
        "WIFI_SSID_2",
        "WIFI_PASSWORD_2",
        "FINNHUB_API_KEY",
        "NUM_STOCKS",
        "REFRESH_SECONDS",
        "FLIP_DISPLAY",
        "OLED_SDA_PIN",
        "OLED_SCL_PIN",
        "OLED_RST_PIN",
        "OLED_I2C_ADDR",
        "BUTTON_PIN",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect();

    for slot in 1..=MAX_STOCKS {
        keys.push(format!("STOCK_{slot}"));
        keys.push(format!("SHARES_STOCK_{slot}"));
    }
    keys
}

/// Decimal, or hex with a `0x` prefix
fn parse_int(raw: &str) -> Result<i64, String> {
    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => trimmed.parse::<i64>(),
    };
    parsed.map_err(|_| format!("expected an integer, got {raw:?}"))
}

fn parse_float(raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("expected a number, got {raw:?}"))
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(format!("expected true or false, got {raw:?}")),
    }
}

impl DeviceSettings {
    /// Apply overrides from `lookup` (typically the process environment).
    ///
    /// `STOCK_n` / `SHARES_STOCK_n` past the end of the declared list extend
    /// it; skipped slots are left with an empty symbol.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors: Vec<Violation> = Vec::new();
        let mut applied = 0usize;

        let mut text = |key: &str, target: &mut String| {
            if let Some(value) = lookup(key) {
                *target = value;
                applied += 1;
            }
        };
        text("WIFI_SSID_1", &mut self.wifi.primary.ssid);
        text("WIFI_PASSWORD_1", &mut self.wifi.primary.password);
        text("WIFI_SSID_2", &mut self.wifi.secondary.ssid);
        text("WIFI_PASSWORD_2", &mut self.wifi.secondary.password);
        text("FINNHUB_API_KEY", &mut self.api.finnhub_api_key);

        let mut int = |key: &str, target: &mut i64| {
            if let Some(value) = lookup(key) {
                match parse_int(&value) {
                    Ok(parsed) => {
                        *target = parsed;
                        applied += 1;
                    }
                    Err(reason) => errors.push(Violation::new(key, reason)),
                }
            }
        };
        int("REFRESH_SECONDS", &mut self.display.refresh_seconds);
        int("OLED_SDA_PIN", &mut self.pins.oled_sda);
        int("OLED_SCL_PIN", &mut self.pins.oled_scl);
        int("OLED_RST_PIN", &mut self.pins.oled_rst);
        int("OLED_I2C_ADDR", &mut self.pins.oled_i2c_addr);
        int("BUTTON_PIN", &mut self.pins.button);

        if let Some(value) = lookup("NUM_STOCKS") {
            match parse_int(&value) {
                Ok(parsed) => {
                    self.num_stocks = Some(parsed);
                    applied += 1;
                }
                Err(reason) => errors.push(Violation::new("NUM_STOCKS", reason)),
            }
        }

        if let Some(value) = lookup("FLIP_DISPLAY") {
            match parse_bool(&value) {
                Ok(parsed) => {
                    self.display.flip = parsed;
                    applied += 1;
                }
                Err(reason) => errors.push(Violation::new("FLIP_DISPLAY", reason)),
            }
        }

        for slot in 1..=MAX_STOCKS {
            let index = slot - 1;

            if let Some(symbol) = lookup(&format!("STOCK_{slot}")) {
                self.stock_slot(index).symbol = symbol;
                applied += 1;
            }

            let key = format!("SHARES_STOCK_{slot}");
            if let Some(value) = lookup(&key) {
                match parse_float(&value) {
                    Ok(shares) => {
                        self.stock_slot(index).shares = shares;
                        applied += 1;
                    }
                    Err(reason) => errors.push(Violation::new(key, reason)),
                }
            }
        }

        if applied > 0 || !errors.is_empty() {
            debug!(
                "Applied {} override(s), {} rejected",
                applied,
                errors.len()
            );
        }
        self.override_errors.extend(errors);
    }

    fn stock_slot(&mut self, index: usize) -> &mut StockSettings {
        if self.stocks.len() <= index {
            self.stocks.resize_with(index + 1, StockSettings::default);
        }
        &mut self.stocks[index]
    }
}
