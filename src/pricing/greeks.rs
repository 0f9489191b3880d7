//! Black-Scholes-Merton Greeks.
//!
//! Delta, gamma, vega and theta share d1/d2 with the pricer, so all four are
//! computed from one set of [`ModelTerms`]. Theta is quoted per calendar
//! day; vega per unit (100%) change in volatility.

use super::black_scholes::{BlackScholes, ModelTerms};
use super::error::PricingResult;
use super::time_basis::DAYS_PER_YEAR;
use super::types::{GreeksResult, OptionType, PricingInputs};

/// Greeks calculator for European options.
pub struct GreeksEngine;

impl GreeksEngine {
    /// Calculates all four Greeks in one pass.
    ///
    /// # Errors
    /// Same preconditions as [`BlackScholes::price`].
    pub fn greeks(inputs: &PricingInputs) -> PricingResult<GreeksResult> {
        let t = BlackScholes::terms(inputs)?;
        Ok(GreeksResult {
            delta: Self::delta_from(inputs, &t),
            gamma: Self::gamma_from(inputs, &t),
            vega: Self::vega_from(inputs, &t),
            theta: Self::theta_from(inputs, &t),
        })
    }

    /// Delta (∂price/∂S).
    ///
    /// For calls: Δ = e^(−qT)·N(d1), in [0, 1]
    /// For puts:  Δ = e^(−qT)·(N(d1) − 1), in [−1, 0]
    pub fn delta(inputs: &PricingInputs) -> PricingResult<f64> {
        let t = BlackScholes::terms(inputs)?;
        Ok(Self::delta_from(inputs, &t))
    }

    /// Gamma (∂²price/∂S²), identical for calls and puts.
    ///
    /// Γ = e^(−qT)·N'(d1) / (S·σ·√T)
    pub fn gamma(inputs: &PricingInputs) -> PricingResult<f64> {
        let t = BlackScholes::terms(inputs)?;
        Ok(Self::gamma_from(inputs, &t))
    }

    /// Vega (∂price/∂σ), identical for calls and puts.
    ///
    /// Vega = S·e^(−qT)·N'(d1)·√T
    pub fn vega(inputs: &PricingInputs) -> PricingResult<f64> {
        let t = BlackScholes::terms(inputs)?;
        Ok(Self::vega_from(inputs, &t))
    }

    /// Theta (∂price/∂t) per calendar day.
    pub fn theta(inputs: &PricingInputs) -> PricingResult<f64> {
        let t = BlackScholes::terms(inputs)?;
        Ok(Self::theta_from(inputs, &t))
    }

    fn delta_from(inputs: &PricingInputs, t: &ModelTerms) -> f64 {
        let nd1 = BlackScholes::norm_cdf(t.d1);
        match inputs.option_type {
            OptionType::Call => t.carry * nd1,
            OptionType::Put => t.carry * (nd1 - 1.0),
        }
    }

    fn gamma_from(inputs: &PricingInputs, t: &ModelTerms) -> f64 {
        t.carry * BlackScholes::norm_pdf(t.d1) / (inputs.spot * inputs.volatility * t.sqrt_time)
    }

    fn vega_from(inputs: &PricingInputs, t: &ModelTerms) -> f64 {
        inputs.spot * t.carry * BlackScholes::norm_pdf(t.d1) * t.sqrt_time
    }

    fn theta_from(inputs: &PricingInputs, t: &ModelTerms) -> f64 {
        let spot = inputs.spot * t.carry;
        let discounted_strike = inputs.strike * t.discount;
        let r = inputs.risk_free_rate;
        let q = inputs.dividend_yield;

        let decay = -spot * BlackScholes::norm_pdf(t.d1) * inputs.volatility / (2.0 * t.sqrt_time);

        let theta_annual = match inputs.option_type {
            OptionType::Call => {
                decay - r * discounted_strike * BlackScholes::norm_cdf(t.d2)
                    + q * spot * BlackScholes::norm_cdf(t.d1)
            }
            OptionType::Put => {
                decay + r * discounted_strike * BlackScholes::norm_cdf(-t.d2)
                    - q * spot * BlackScholes::norm_cdf(-t.d1)
            }
        };

        theta_annual / DAYS_PER_YEAR
    }
}
