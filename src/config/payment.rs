//! Payment gateway configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Credential fragments that mark a copy-pasted sample value rather than
/// a real gateway key. Placeholder keys must never silently enable mock
/// behavior; they mean "gateway not configured".
const PLACEHOLDER_MARKERS: [&str; 4] = ["replace_with", "your_", "xxx", "dummy"];

/// Payment mode selection. Mock mode must be opted into explicitly.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    #[default]
    Live,
    Mock,
}

/// Payment configuration (Razorpay-style key pair + webhook secret)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Gateway mode (live or mock)
    #[serde(default)]
    pub mode: PaymentMode,

    /// Public gateway key id (sent to the checkout widget)
    #[serde(default)]
    pub key_id: String,

    /// Private gateway key secret (signs checkout verification)
    #[serde(default = "empty_secret")]
    pub key_secret: SecretString,

    /// Webhook signing secret (separate from the key secret)
    #[serde(default = "empty_secret")]
    pub webhook_secret: SecretString,

    /// Subscription price in whole currency units
    #[serde(default = "default_amount")]
    pub subscription_amount: i64,

    /// Credits granted per verified subscription payment
    #[serde(default = "default_credits")]
    pub subscription_credits: i32,

    /// Plan identifier recorded on orders
    #[serde(default = "default_plan_id")]
    pub plan_id: String,

    /// Currency code for orders
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl PaymentConfig {
    pub fn is_mock(&self) -> bool {
        self.mode == PaymentMode::Mock
    }

    /// Whether live credentials are present and do not look like
    /// placeholders. Mock mode is always considered configured.
    pub fn is_configured(&self) -> bool {
        if self.is_mock() {
            return true;
        }
        let secret = self.key_secret.expose_secret();
        if self.key_id.is_empty() || secret.is_empty() {
            return false;
        }
        !is_placeholder(&self.key_id) && !is_placeholder(secret)
    }

    /// Subscription price in the smallest currency unit.
    pub fn subscription_amount_minor(&self) -> i64 {
        self.subscription_amount * 100
    }

    /// Validate payment configuration.
    ///
    /// Live mode with placeholder-looking credentials is rejected outright
    /// rather than downgraded to mock.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.subscription_amount <= 0 {
            return Err(ValidationError::InvalidSubscriptionAmount);
        }
        if self.subscription_credits <= 0 {
            return Err(ValidationError::InvalidSubscriptionCredits);
        }
        if !self.is_mock() {
            let secret = self.key_secret.expose_secret();
            if !self.key_id.is_empty()
                && !secret.is_empty()
                && (is_placeholder(&self.key_id) || is_placeholder(secret))
            {
                return Err(ValidationError::PlaceholderGatewayCredentials);
            }
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            mode: PaymentMode::Live,
            key_id: String::new(),
            key_secret: empty_secret(),
            webhook_secret: empty_secret(),
            subscription_amount: default_amount(),
            subscription_credits: default_credits(),
            plan_id: default_plan_id(),
            currency: default_currency(),
        }
    }
}

fn is_placeholder(value: &str) -> bool {
    let lower = value.to_lowercase();
    PLACEHOLDER_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_amount() -> i64 {
    499
}

fn default_credits() -> i32 {
    25
}

fn default_plan_id() -> String {
    "starter-monthly".to_string()
}

fn default_currency() -> String {
    "INR".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_config(key_id: &str, secret: &str) -> PaymentConfig {
        PaymentConfig {
            key_id: key_id.to_string(),
            key_secret: SecretString::new(secret.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn mock_mode_is_always_configured() {
        let config = PaymentConfig {
            mode: PaymentMode::Mock,
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn live_mode_with_real_keys_is_configured() {
        assert!(live_config("rzp_test_abc123", "s3cr3tvalue").is_configured());
    }

    #[test]
    fn empty_credentials_are_not_configured() {
        assert!(!live_config("", "").is_configured());
    }

    #[test]
    fn placeholder_credentials_are_not_configured() {
        assert!(!live_config("rzp_test_xxx", "s3cr3tvalue").is_configured());
        assert!(!live_config("rzp_test_abc123", "replace_with_secret").is_configured());
        assert!(!live_config("your_key_id", "s3cr3tvalue").is_configured());
        assert!(!live_config("rzp_live_abc", "dummy_secret").is_configured());
    }

    #[test]
    fn placeholder_detection_is_case_insensitive() {
        assert!(!live_config("rzp_test_XXX", "s3cr3tvalue").is_configured());
    }

    #[test]
    fn validation_rejects_placeholder_credentials_in_live_mode() {
        assert_eq!(
            live_config("your_key_id", "s3cr3tvalue").validate(),
            Err(ValidationError::PlaceholderGatewayCredentials)
        );
    }

    #[test]
    fn validation_allows_missing_credentials() {
        // Missing keys surface as "not configured" at order time, not at boot.
        assert!(live_config("", "").validate().is_ok());
    }

    #[test]
    fn validation_rejects_non_positive_amount() {
        let config = PaymentConfig {
            subscription_amount: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidSubscriptionAmount)
        );
    }

    #[test]
    fn amount_minor_is_in_smallest_unit() {
        let config = PaymentConfig::default();
        assert_eq!(config.subscription_amount_minor(), 49_900);
    }
}
