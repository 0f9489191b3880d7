//! Black-Scholes-Merton pricing model.
//!
//! Closed-form European option values with an optional constant dividend
//! yield. Every public entry point validates its inputs and returns
//! [`PricingError::InvalidInput`](super::PricingError::InvalidInput) instead of a degenerate number.

use super::error::PricingResult;
use super::types::{OptionType, PricingInputs};
use statrs::function::erf::erfc;
use std::f64::consts::{PI, SQRT_2};

/// Black-Scholes-Merton pricing model implementation.
pub struct BlackScholes;

/// Intermediate quantities shared by the price and every Greek.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ModelTerms {
    pub d1: f64,
    pub d2: f64,
    pub sqrt_time: f64,
    /// e^(−rT)
    pub discount: f64,
    /// e^(−qT)
    pub carry: f64,
}

impl BlackScholes {
    /// Standard normal cumulative distribution function (CDF).
    ///
    /// Evaluated through the complementary error function so that both
    /// tails keep full relative precision, which matters for deep
    /// out-of-the-money contracts on high-priced underlyings.
    #[must_use]
    pub fn norm_cdf(x: f64) -> f64 {
        0.5 * erfc(-x / SQRT_2)
    }

    /// Standard normal probability density function (PDF).
    #[must_use]
    pub fn norm_pdf(x: f64) -> f64 {
        (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
    }

    /// Calculates the d1 parameter of the Black-Scholes formula.
    ///
    /// d1 = [ln(S/K) + (r − q + σ²/2)T] / (σ√T)
    #[must_use]
    pub fn d1(spot: f64, strike: f64, rate: f64, dividend_yield: f64, time: f64, vol: f64) -> f64 {
        let sqrt_time = time.sqrt();
        ((spot / strike).ln() + (rate - dividend_yield + 0.5 * vol * vol) * time)
            / (vol * sqrt_time)
    }

    /// Calculates the d2 parameter of the Black-Scholes formula.
    ///
    /// d2 = d1 - σ√T
    #[must_use]
    pub fn d2(d1: f64, vol: f64, time: f64) -> f64 {
        d1 - vol * time.sqrt()
    }

    /// Validates `inputs` and computes d1, d2 and the discount factors.
    pub(crate) fn terms(inputs: &PricingInputs) -> PricingResult<ModelTerms> {
        inputs.validate()?;

        let time = inputs.years_to_expiry;
        let d1 = Self::d1(
            inputs.spot,
            inputs.strike,
            inputs.risk_free_rate,
            inputs.dividend_yield,
            time,
            inputs.volatility,
        );
        Ok(ModelTerms {
            d1,
            d2: Self::d2(d1, inputs.volatility, time),
            sqrt_time: time.sqrt(),
            discount: (-inputs.risk_free_rate * time).exp(),
            carry: (-inputs.dividend_yield * time).exp(),
        })
    }

    /// Calculates the theoretical option price.
    ///
    /// For calls: C = S·e^(−qT)·N(d1) − K·e^(−rT)·N(d2)
    /// For puts:  P = K·e^(−rT)·N(−d2) − S·e^(−qT)·N(−d1)
    ///
    /// # Errors
    /// [`PricingError::InvalidInput`](super::PricingError::InvalidInput) if
    /// spot, strike, time or volatility is not strictly positive, or a rate
    /// is not finite.
    pub fn price(inputs: &PricingInputs) -> PricingResult<f64> {
        let t = Self::terms(inputs)?;
        let forward_spot = inputs.spot * t.carry;
        let discounted_strike = inputs.strike * t.discount;

        let value = match inputs.option_type {
            OptionType::Call => {
                forward_spot * Self::norm_cdf(t.d1) - discounted_strike * Self::norm_cdf(t.d2)
            }
            OptionType::Put => {
                discounted_strike * Self::norm_cdf(-t.d2) - forward_spot * Self::norm_cdf(-t.d1)
            }
        };

        // Cancellation can leave a deep OTM value a few ulps below zero.
        Ok(value.max(0.0))
    }
}
