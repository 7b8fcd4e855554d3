//! Display refresh and orientation settings.

use crate::domain::errors::{ValidationError, Violations};
use serde::Serialize;
use std::time::Duration;

/// Lower bound on the refresh period imposed by the quote API rate limit.
pub const MIN_REFRESH_SECONDS: u32 = 10;

/// Finnhub free tier request budget.
pub const FREE_TIER_CALLS_PER_MINUTE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplaySettings {
    refresh_interval_seconds: u32,
    flipped: bool,
}

impl DisplaySettings {
    /// Create new DisplaySettings with validation
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` citing `REFRESH_SECONDS` if the interval is
    /// below `MIN_REFRESH_SECONDS` or does not fit in 32 bits
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use tickerconf::domain::config::DisplaySettings;
    ///
    /// let settings = DisplaySettings::new(15, true).expect("Valid settings");
    /// assert_eq!(settings.refresh_interval(), Duration::from_secs(15));
    /// assert!(DisplaySettings::new(5, true).is_err());
    /// ```
    pub fn new(refresh_interval_seconds: i64, flipped: bool) -> Result<Self, ValidationError> {
        let mut violations = Violations::new();
        let settings = Self::checked(refresh_interval_seconds, flipped, &mut violations);
        violations.finish_with("REFRESH_SECONDS", settings)
    }

    pub(crate) fn checked(
        refresh_interval_seconds: i64,
        flipped: bool,
        violations: &mut Violations,
    ) -> Option<Self> {
        if refresh_interval_seconds < i64::from(MIN_REFRESH_SECONDS) {
            violations.push(
                "REFRESH_SECONDS",
                format!(
                    "must be at least {MIN_REFRESH_SECONDS} seconds, got {refresh_interval_seconds}"
                ),
            );
            return None;
        }

        match u32::try_from(refresh_interval_seconds) {
            Ok(secs) => Some(Self {
                refresh_interval_seconds: secs,
                flipped,
            }),
            Err(_) => {
                violations.push(
                    "REFRESH_SECONDS",
                    format!(
                        "must be at most {} seconds, got {refresh_interval_seconds}",
                        u32::MAX
                    ),
                );
                None
            }
        }
    }

    pub fn refresh_interval_seconds(&self) -> u32 {
        self.refresh_interval_seconds
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.refresh_interval_seconds))
    }

    pub fn flipped(&self) -> bool {
        self.flipped
    }

    /// Quote requests per minute when every ticker is fetched once per refresh
    pub fn quote_calls_per_minute(&self, num_stocks: usize) -> f64 {
        num_stocks as f64 * 60.0 / f64::from(self.refresh_interval_seconds)
    }

    pub fn exceeds_free_tier(&self, num_stocks: usize) -> bool {
        self.quote_calls_per_minute(num_stocks) > FREE_TIER_CALLS_PER_MINUTE
    }
}
