//! Hardware pin assignments for the OLED and the user button.

use crate::domain::errors::{ValidationError, Violations};
use serde::Serialize;

/// Highest GPIO number on the ESP32 (GPIO 34-39 are input only).
pub const MAX_GPIO: u8 = 39;

/// 7-bit I2C addressing.
pub const MAX_I2C_ADDRESS: u8 = 0x7F;

/// Board pin map.
///
/// # Invariants
///
/// - every pin is in `0..=MAX_GPIO`
/// - no two signals share a pin
/// - `display_address` fits in 7 bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HardwarePinMap {
    pub data_pin: u8,
    pub clock_pin: u8,
    pub reset_pin: u8,
    pub button_pin: u8,
    pub display_address: u8,
}

impl HardwarePinMap {
    /// Create a new HardwarePinMap with validation
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every pin outside `0..=MAX_GPIO`,
    /// every pair of signals sharing a pin (reported under `pins`) and an
    /// `OLED_I2C_ADDR` that is not a 7-bit address
    ///
    /// # Example
    ///
    /// ```rust
    /// use tickerconf::domain::config::HardwarePinMap;
    ///
    /// let map = HardwarePinMap::new(4, 15, 16, 0, 0x3c).expect("Valid wiring");
    /// assert_eq!(map, HardwarePinMap::default());
    ///
    /// let err = HardwarePinMap::new(4, 15, 16, 4, 0x3c).unwrap_err();
    /// assert!(err.mentions("pins"));
    /// ```
    pub fn new(
        data_pin: i64,
        clock_pin: i64,
        reset_pin: i64,
        button_pin: i64,
        display_address: i64,
    ) -> Result<Self, ValidationError> {
        let mut violations = Violations::new();
        let map = Self::checked(
            data_pin,
            clock_pin,
            reset_pin,
            button_pin,
            display_address,
            &mut violations,
        );
        violations.finish_with("pins", map)
    }

    pub(crate) fn checked(
        data_pin: i64,
        clock_pin: i64,
        reset_pin: i64,
        button_pin: i64,
        display_address: i64,
        violations: &mut Violations,
    ) -> Option<Self> {
        let pins = [
            ("OLED_SDA_PIN", data_pin),
            ("OLED_SCL_PIN", clock_pin),
            ("OLED_RST_PIN", reset_pin),
            ("BUTTON_PIN", button_pin),
        ];

        let mut ok = true;
        for (field, pin) in pins {
            if !(0..=i64::from(MAX_GPIO)).contains(&pin) {
                violations.push(field, format!("must be a GPIO in 0..={MAX_GPIO}, got {pin}"));
                ok = false;
            }
        }

        for (i, (first, a)) in pins.iter().enumerate() {
            for (second, b) in &pins[i + 1..] {
                if a == b {
                    violations.push(
                        "pins",
                        format!("pin-assignment conflict: {first} and {second} both use GPIO {a}"),
                    );
                    ok = false;
                }
            }
        }

        if !(0..=i64::from(MAX_I2C_ADDRESS)).contains(&display_address) {
            violations.push(
                "OLED_I2C_ADDR",
                format!("must be a 7-bit I2C address, got {display_address:#x}"),
            );
            ok = false;
        }

        // Ranges checked above, so the narrowing casts are lossless.
        ok.then_some(Self {
            data_pin: data_pin as u8,
            clock_pin: clock_pin as u8,
            reset_pin: reset_pin as u8,
            button_pin: button_pin as u8,
            display_address: display_address as u8,
        })
    }
}

impl Default for HardwarePinMap {
    /// HTIT-WB32 V2 wiring
    fn default() -> Self {
        Self {
            data_pin: 4,
            clock_pin: 15,
            reset_pin: 16,
            button_pin: 0,
            display_address: 0x3c,
        }
    }
}
