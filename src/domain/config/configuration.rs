//! The validated, immutable device configuration.

use super::display_settings::DisplaySettings;
use super::network_credential::NetworkCredential;
use super::pin_map::HardwarePinMap;
use super::secret::Secret;
use super::ticker::{TickerEntry, TickerList};
use crate::domain::errors::{ValidationError, Violations};
use serde::Serialize;

/// Aggregate root for everything the device needs at runtime.
///
/// Built once at startup and never mutated afterwards; share it by
/// reference or behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    primary: NetworkCredential,
    secondary: Option<NetworkCredential>,
    api_key: Secret,
    tickers: TickerList,
    display: DisplaySettings,
    pins: HardwarePinMap,
}

impl Configuration {
    /// Assemble a configuration from already-validated parts.
    ///
    /// A `secondary` credential with an empty SSID is stored as absent.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` citing `WIFI_SSID_1` if the primary names no
    /// network and `FINNHUB_API_KEY` if the key is blank
    pub fn new(
        primary: NetworkCredential,
        secondary: NetworkCredential,
        api_key: impl Into<Secret>,
        tickers: TickerList,
        display: DisplaySettings,
        pins: HardwarePinMap,
    ) -> Result<Self, ValidationError> {
        let mut violations = Violations::new();
        if !primary.is_configured() {
            violations.push("WIFI_SSID_1", "primary network SSID must not be empty");
        }
        let config = Self::checked(
            primary,
            secondary,
            api_key.into(),
            Some(tickers),
            Some(display),
            Some(pins),
            &mut violations,
        );
        violations.finish_with("configuration", config)
    }

    /// Check the cross-cutting invariants and combine the parts.
    ///
    /// Returns `None` when any part failed or anything was recorded in
    /// `violations`, including entries recorded before this call.
    pub(crate) fn checked(
        primary: NetworkCredential,
        secondary: NetworkCredential,
        api_key: Secret,
        tickers: Option<TickerList>,
        display: Option<DisplaySettings>,
        pins: Option<HardwarePinMap>,
        violations: &mut Violations,
    ) -> Option<Self> {
        if api_key.expose().trim().is_empty() {
            violations.push("FINNHUB_API_KEY", "API key must not be empty");
        }

        if !violations.is_empty() {
            return None;
        }

        Some(Self {
            primary,
            secondary: secondary.is_configured().then_some(secondary),
            api_key,
            tickers: tickers?,
            display: display?,
            pins: pins?,
        })
    }

    pub fn primary_credential(&self) -> &NetworkCredential {
        &self.primary
    }

    /// `None` when no secondary network is configured
    pub fn secondary_credential(&self) -> Option<&NetworkCredential> {
        self.secondary.as_ref()
    }

    /// Primary first, then the secondary if present
    pub fn credentials(&self) -> impl Iterator<Item = &NetworkCredential> {
        std::iter::once(&self.primary).chain(self.secondary.as_ref())
    }

    /// The active tickers in display order. Each call starts from the first entry.
    pub fn tickers(&self) -> std::slice::Iter<'_, TickerEntry> {
        self.tickers.iter()
    }

    pub fn ticker_list(&self) -> &TickerList {
        &self.tickers
    }

    pub fn num_stocks(&self) -> usize {
        self.tickers.len()
    }

    pub fn display_settings(&self) -> &DisplaySettings {
        &self.display
    }

    pub fn pin_map(&self) -> &HardwarePinMap {
        &self.pins
    }

    pub fn api_key(&self) -> &Secret {
        &self.api_key
    }
}
