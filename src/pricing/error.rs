//! Error types for pricing, Greeks and implied volatility calculation.
//!
//! Only conditions the caller must fix are errors. Quotes the solver cannot
//! match and contracts at expiry are reported through
//! [`EstimateStatus`](super::types::EstimateStatus) on the returned estimate.

use thiserror::Error;

/// Errors raised by the pricing engine.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A model input is outside its domain (non-positive spot, strike,
    /// volatility or time, non-finite rate, negative market price).
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Engine or solver configuration is inconsistent.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the offending setting.
        message: String,
    },

    /// Configuration could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type PricingResult<T> = Result<T, PricingError>;

impl PricingError {
    /// Shorthand for [`PricingError::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Shorthand for [`PricingError::InvalidConfig`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Rejects values that are not finite and strictly positive.
pub(crate) fn ensure_positive(name: &str, value: f64) -> PricingResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PricingError::invalid_input(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

/// Rejects NaN and infinities.
pub(crate) fn ensure_finite(name: &str, value: f64) -> PricingResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PricingError::invalid_input(format!(
            "{name} must be finite, got {value}"
        )))
    }
}
