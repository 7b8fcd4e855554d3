//! Tracked stock tickers and the holdings attached to them.

use crate::domain::errors::{ValidationError, Violations};
use serde::Serialize;

/// The display has room for five tickers.
pub const MAX_STOCKS: usize = 5;

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | ':' | '^')
}

/// Share counts must be finite and non-negative on every declared slot.
fn check_shares(
    symbol: &str,
    shares_owned: f64,
    field: &str,
    violations: &mut Violations,
) -> bool {
    if shares_owned.is_finite() && shares_owned >= 0.0 {
        return true;
    }
    let label = if symbol.is_empty() { "<empty>" } else { symbol };
    violations.push(
        field,
        format!("{label}: shares owned must be a finite number >= 0, got {shares_owned}"),
    );
    false
}

/// One tracked symbol.
///
/// # Invariants
///
/// - `symbol` is non-empty, upper-case and free of whitespace
/// - `shares_owned` is finite and `>= 0.0` (`0.0` = track price only)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerEntry {
    symbol: String,
    shares_owned: f64,
}

impl TickerEntry {
    /// Create a new TickerEntry with validation
    ///
    /// The symbol is trimmed and upper-cased.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` citing `symbol` and/or `shares` if either
    /// violates the invariants
    ///
    /// # Example
    ///
    /// ```rust
    /// use tickerconf::domain::config::TickerEntry;
    ///
    /// let entry = TickerEntry::new("tsla", 80.0).expect("Valid ticker");
    /// assert_eq!(entry.symbol(), "TSLA");
    /// assert!(TickerEntry::new("AAPL", -1.0).is_err());
    /// ```
    pub fn new(symbol: &str, shares_owned: f64) -> Result<Self, ValidationError> {
        let mut violations = Violations::new();
        let entry = Self::checked(symbol, shares_owned, "symbol", "shares", &mut violations);
        violations.finish_with("symbol", entry)
    }

    /// Normalize and check one entry. Returns `None` if anything was recorded.
    pub(crate) fn checked(
        symbol: &str,
        shares_owned: f64,
        symbol_field: &str,
        shares_field: &str,
        violations: &mut Violations,
    ) -> Option<Self> {
        let mut ok = true;
        let symbol = symbol.trim().to_ascii_uppercase();

        if symbol.is_empty() {
            violations.push(symbol_field, "ticker symbol must not be empty");
            ok = false;
        } else if let Some(bad) = symbol.chars().find(|c| !is_symbol_char(*c)) {
            violations.push(
                symbol_field,
                format!("{symbol}: invalid character {bad:?} in ticker symbol"),
            );
            ok = false;
        }

        ok &= check_shares(&symbol, shares_owned, shares_field, violations);

        ok.then_some(Self {
            symbol,
            shares_owned,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn shares_owned(&self) -> f64 {
        self.shares_owned
    }

    /// False for price-only tickers
    pub fn tracks_holdings(&self) -> bool {
        self.shares_owned > 0.0
    }

    /// Value of the position at `price`
    pub fn holding_value(&self, price: f64) -> f64 {
        self.shares_owned * price
    }
}

/// The active, ordered ticker sequence.
///
/// Order is display order. Holds exactly `num_stocks` entries,
/// `1 <= num_stocks <= MAX_STOCKS`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TickerList {
    entries: Vec<TickerEntry>,
}

impl TickerList {
    /// Validate a ticker list where every declared entry is active
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every bad slot (`STOCK_n`,
    /// `SHARES_STOCK_n`) and `NUM_STOCKS` if the list is empty or longer
    /// than `MAX_STOCKS`
    ///
    /// # Example
    ///
    /// ```rust
    /// use tickerconf::domain::config::TickerList;
    ///
    /// let list = TickerList::new(&[("TSLA", 80.0), ("AAPL", 10.0)]).expect("Valid list");
    /// assert_eq!(list.len(), 2);
    /// ```
    pub fn new(declared: &[(&str, f64)]) -> Result<Self, ValidationError> {
        let mut violations = Violations::new();
        let list = Self::checked(declared.len() as i64, declared, &mut violations);
        violations.finish_with("NUM_STOCKS", list)
    }

    /// Check the declared entries and keep the first `num_stocks`.
    ///
    /// Slots are numbered from 1 in violation field names (`STOCK_1`,
    /// `SHARES_STOCK_1`, ...). Active slots must be complete tickers.
    /// Inactive slots may have an empty symbol but their share count must
    /// still be valid. When `num_stocks` itself is invalid every declared
    /// slot is checked as if active, so all problems are reported at once.
    pub(crate) fn checked(
        num_stocks: i64,
        declared: &[(&str, f64)],
        violations: &mut Violations,
    ) -> Option<Self> {
        let mut ok = true;

        if declared.len() > MAX_STOCKS {
            violations.push(
                "STOCKS",
                format!(
                    "at most {MAX_STOCKS} tickers may be declared, got {}",
                    declared.len()
                ),
            );
            ok = false;
        }

        let checkable = declared.len().min(MAX_STOCKS);
        let active = if !(1..=MAX_STOCKS as i64).contains(&num_stocks) {
            violations.push(
                "NUM_STOCKS",
                format!("must be between 1 and {MAX_STOCKS}, got {num_stocks}"),
            );
            ok = false;
            checkable
        } else if num_stocks as usize > declared.len() {
            violations.push(
                "NUM_STOCKS",
                format!(
                    "{num_stocks} tickers requested but only {} declared",
                    declared.len()
                ),
            );
            ok = false;
            checkable
        } else {
            num_stocks as usize
        };

        let mut entries = Vec::with_capacity(active);
        for (i, (symbol, shares)) in declared.iter().take(checkable).enumerate() {
            let slot = i + 1;
            let shares_field = format!("SHARES_STOCK_{slot}");
            if i < active {
                match TickerEntry::checked(
                    symbol,
                    *shares,
                    &format!("STOCK_{slot}"),
                    &shares_field,
                    violations,
                ) {
                    Some(entry) => entries.push(entry),
                    None => ok = false,
                }
            } else {
                let label = symbol.trim().to_ascii_uppercase();
                ok &= check_shares(&label, *shares, &shares_field, violations);
            }
        }

        ok.then_some(Self { entries })
    }

    /// Lazy, restartable iteration in display order
    pub fn iter(&self) -> std::slice::Iter<'_, TickerEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TickerEntry> {
        self.entries.get(index)
    }

    /// Tickers with a non-zero position
    pub fn holdings(&self) -> impl Iterator<Item = &TickerEntry> {
        self.entries.iter().filter(|e| e.tracks_holdings())
    }
}

impl<'a> IntoIterator for &'a TickerList {
    type Item = &'a TickerEntry;
    type IntoIter = std::slice::Iter<'a, TickerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory_stocks() -> Vec<(&'static str, f64)> {
        vec![
            ("TSLA", 80.0),
            ("AAPL", 10.0),
            ("NVDA", 5.0),
            ("MSFT", 0.0),
            ("GOOGL", 0.0),
        ]
    }

    #[test]
    fn test_symbol_is_normalized() {
        let entry = TickerEntry::new("  aapl ", 10.0).unwrap();
        assert_eq!(entry.symbol(), "AAPL");
        assert_eq!(entry.shares_owned(), 10.0);
    }

    #[test]
    fn test_negative_shares_rejected() {
        let err = TickerEntry::new("TSLA", -1.0).unwrap_err();
        assert!(err.mentions("shares"));
        assert!(err.violations()[0].reason.contains("TSLA"));
    }

    #[test]
    fn test_nan_shares_rejected() {
        assert!(TickerEntry::new("TSLA", f64::NAN).is_err());
        assert!(TickerEntry::new("TSLA", f64::INFINITY).is_err());
    }

    #[test]
    fn test_symbol_with_space_rejected() {
        let err = TickerEntry::new("BRK B", 1.0).unwrap_err();
        assert!(err.mentions("symbol"));
    }

    #[test]
    fn test_class_share_symbols_allowed() {
        assert!(TickerEntry::new("BRK.B", 1.0).is_ok());
        assert!(TickerEntry::new("^GSPC", 0.0).is_ok());
    }

    #[test]
    fn test_holdings() {
        let tracked = TickerEntry::new("NVDA", 5.0).unwrap();
        let watched = TickerEntry::new("MSFT", 0.0).unwrap();
        assert!(tracked.tracks_holdings());
        assert!(!watched.tracks_holdings());
        assert!((tracked.holding_value(120.5) - 602.5).abs() < 1e-9);
        assert_eq!(watched.holding_value(400.0), 0.0);
    }

    #[test]
    fn test_list_preserves_order() {
        let list = TickerList::new(&factory_stocks()).unwrap();
        let symbols: Vec<&str> = list.iter().map(|e| e.symbol()).collect();
        assert_eq!(symbols, vec!["TSLA", "AAPL", "NVDA", "MSFT", "GOOGL"]);
        assert_eq!(list.holdings().count(), 3);
    }

    #[test]
    fn test_list_iteration_restarts() {
        let list = TickerList::new(&factory_stocks()).unwrap();
        let first: Vec<_> = list.iter().collect();
        let second: Vec<_> = list.iter().collect();
        assert_eq!(first, second);
        assert_eq!(list.iter().len(), 5);
    }

    #[test]
    fn test_only_active_prefix_is_kept() {
        let mut violations = Violations::new();
        let mut stocks = factory_stocks();
        stocks[4] = ("", 0.0); // inactive, empty symbol allowed
        let list = TickerList::checked(3, &stocks, &mut violations).unwrap();
        assert!(violations.is_empty());
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(2).unwrap().symbol(), "NVDA");
    }

    #[test]
    fn test_num_stocks_bounds() {
        for bad in [0, 6, -1] {
            let mut violations = Violations::new();
            assert!(TickerList::checked(bad, &factory_stocks(), &mut violations).is_none());
            assert!(violations.finish().unwrap_err().mentions("NUM_STOCKS"));
        }
    }

    #[test]
    fn test_inactive_slot_shares_still_checked() {
        let mut violations = Violations::new();
        let mut stocks = factory_stocks();
        stocks[4] = ("GOOGL", -3.0);
        assert!(TickerList::checked(3, &stocks, &mut violations).is_none());
        let err = violations.finish().unwrap_err();
        assert!(err.mentions("SHARES_STOCK_5"));
        assert!(err.violations()[0].reason.contains("GOOGL"));
        assert_eq!(err.violations().len(), 1);
    }

    #[test]
    fn test_bad_num_stocks_does_not_hide_entry_problems() {
        let mut violations = Violations::new();
        let stocks = vec![("TSLA", -5.0), ("", 0.0), ("NVDA", 5.0)];
        assert!(TickerList::checked(0, &stocks, &mut violations).is_none());
        let err = violations.finish().unwrap_err();
        assert!(err.mentions("NUM_STOCKS"));
        assert!(err.mentions("SHARES_STOCK_1"));
        assert!(err.mentions("STOCK_2"));
        assert_eq!(err.violations().len(), 3);
    }

    #[test]
    fn test_too_many_declared_reported() {
        let mut violations = Violations::new();
        let mut stocks = factory_stocks();
        stocks.push(("AMD", 1.0));
        assert!(TickerList::checked(5, &stocks, &mut violations).is_none());
        assert!(violations.finish().unwrap_err().mentions("STOCKS"));
    }

    #[test]
    fn test_num_stocks_exceeds_declared() {
        let mut violations = Violations::new();
        let stocks = vec![("TSLA", 1.0), ("", -1.0)];
        assert!(TickerList::checked(3, &stocks, &mut violations).is_none());
        let err = violations.finish().unwrap_err();
        assert!(err.violations()[0].reason.contains("only 2 declared"));
        assert!(err.mentions("STOCK_2"));
        assert!(err.mentions("SHARES_STOCK_2"));
    }

    #[test]
    fn test_every_bad_entry_reported() {
        let mut violations = Violations::new();
        let stocks = vec![("TSLA", -1.0), ("", 0.0), ("NVDA", -2.0)];
        assert!(TickerList::checked(3, &stocks, &mut violations).is_none());
        let err = violations.finish().unwrap_err();
        assert!(err.mentions("SHARES_STOCK_1"));
        assert!(err.mentions("STOCK_2"));
        assert!(err.mentions("SHARES_STOCK_3"));
        assert_eq!(err.violations().len(), 3);
    }
}
