//! WiFi network credentials.

use super::secret::Secret;
use crate::domain::errors::{ValidationError, Violations};
use serde::Serialize;

/// 802.11 limits the SSID to 32 octets.
pub const MAX_SSID_LEN: usize = 32;

/// WPA2 passphrases top out at 63 characters (64 for a raw hex PSK).
pub const MAX_PASSWORD_LEN: usize = 64;

/// One WiFi network the device may join.
///
/// An empty `ssid` means the slot is unconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkCredential {
    ssid: String,
    password: Secret,
}

impl NetworkCredential {
    /// Create a credential that must name a network
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` citing `ssid` if it is blank or longer
    /// than `MAX_SSID_LEN` bytes, and `password` if it is longer than
    /// `MAX_PASSWORD_LEN` characters
    pub fn new(
        ssid: impl Into<String>,
        password: impl Into<Secret>,
    ) -> Result<Self, ValidationError> {
        let mut violations = Violations::new();
        let credential = Self::checked(
            ssid.into(),
            password.into(),
            "ssid",
            "password",
            true,
            &mut violations,
        );
        violations.finish()?;
        Ok(credential)
    }

    /// Build a credential, recording length / presence problems under the given field names.
    ///
    /// A whitespace-only SSID counts as empty. The password of an absent
    /// optional credential is not checked.
    pub(crate) fn checked(
        ssid: String,
        password: Secret,
        ssid_field: &str,
        password_field: &str,
        required: bool,
        violations: &mut Violations,
    ) -> Self {
        let ssid = if ssid.trim().is_empty() {
            String::new()
        } else {
            ssid
        };

        if ssid.is_empty() {
            if required {
                violations.push(ssid_field, "primary network SSID must not be empty");
            } else {
                return Self { ssid, password };
            }
        } else if ssid.len() > MAX_SSID_LEN {
            violations.push(
                ssid_field,
                format!("must be at most {} bytes, got {}", MAX_SSID_LEN, ssid.len()),
            );
        }

        let password_chars = password.expose().chars().count();
        if password_chars > MAX_PASSWORD_LEN {
            violations.push(
                password_field,
                format!(
                    "must be at most {} characters, got {}",
                    MAX_PASSWORD_LEN, password_chars
                ),
            );
        }

        Self { ssid, password }
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &Secret {
        &self.password
    }

    /// Open networks have no password
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }

    pub fn is_configured(&self) -> bool {
        !self.ssid.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_credential() {
        let credential = NetworkCredential::new("HomeNet", "password123").unwrap();
        assert_eq!(credential.ssid(), "HomeNet");
        assert_eq!(credential.password().expose(), "password123");
        assert!(credential.is_configured());
        assert!(!credential.is_open());
    }

    #[test]
    fn test_empty_ssid_rejected() {
        let err = NetworkCredential::new("", "password123").unwrap_err();
        assert!(err.mentions("ssid"));
    }

    #[test]
    fn test_oversized_ssid_and_password_both_reported() {
        let err = NetworkCredential::new("x".repeat(33), "p".repeat(65)).unwrap_err();
        assert!(err.mentions("ssid"));
        assert!(err.mentions("password"));
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn test_whitespace_ssid_is_empty() {
        let err = NetworkCredential::new("   ", "password123").unwrap_err();
        assert!(err.mentions("ssid"));

        let mut violations = Violations::new();
        let optional = NetworkCredential::checked(
            "  ".to_string(),
            Secret::default(),
            "WIFI_SSID_2",
            "WIFI_PASSWORD_2",
            false,
            &mut violations,
        );
        assert!(violations.is_empty());
        assert!(!optional.is_configured());
    }

    #[test]
    fn test_absent_optional_password_not_checked() {
        let mut violations = Violations::new();
        NetworkCredential::checked(
            String::new(),
            Secret::new("p".repeat(74)),
            "WIFI_SSID_2",
            "WIFI_PASSWORD_2",
            false,
            &mut violations,
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_password_limit_counts_characters() {
        // 64 two-byte characters: 128 bytes, still within the limit
        assert!(NetworkCredential::new("HomeNet", "é".repeat(64)).is_ok());
        assert!(NetworkCredential::new("HomeNet", "é".repeat(65)).is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let credential = NetworkCredential::new("HomeNet", "topsecret").unwrap();
        assert!(!format!("{:?}", credential).contains("topsecret"));
    }
}
