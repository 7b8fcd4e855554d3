//! Configuration domain module
//!
//! Value objects for the device configuration. Each one validates itself on
//! construction; `Configuration` is the aggregate handed to the rest of the
//! firmware.

pub mod configuration;
pub mod display_settings;
pub mod network_credential;
pub mod pin_map;
pub mod secret;
pub mod ticker;

pub use configuration::Configuration;
pub use display_settings::{DisplaySettings, FREE_TIER_CALLS_PER_MINUTE, MIN_REFRESH_SECONDS};
pub use network_credential::NetworkCredential;
pub use pin_map::{HardwarePinMap, MAX_GPIO, MAX_I2C_ADDRESS};
pub use secret::Secret;
pub use ticker::{MAX_STOCKS, TickerEntry, TickerList};
