//! Newton-Raphson solver for implied volatility with a bisection fallback.
//!
//! The solver finds the volatility that makes the Black-Scholes price equal
//! to the observed market price. Newton-Raphson is used while vega carries
//! information; once vega collapses (deep ITM/OTM contracts) or an iterate
//! is pinned against a volatility bound, the solver switches to bisection
//! over the configured bracket. Every path is bounded by an iteration
//! budget and ends in a classified [`VolatilityEstimate`].

use super::black_scholes::BlackScholes;
use super::error::{PricingError, PricingResult, ensure_finite};
use super::greeks::GreeksEngine;
use super::time_basis::MINUTE_FLOOR;
use super::types::{ContractParams, EstimateStatus, MarketObservation, VolatilityEstimate};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Configuration for the implied volatility solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum Newton-Raphson iterations before giving up.
    pub max_iterations: u32,
    /// Maximum bisection iterations once the fallback is entered.
    pub max_bisection_iterations: u32,
    /// Convergence tolerance on |model price − market price|, in price units.
    pub tolerance: f64,
    /// Bracket width at which bisection stops, in volatility units.
    pub vol_tolerance: f64,
    /// Initial IV guess (default: 0.20 = 20%).
    pub initial_guess: f64,
    /// Minimum IV bound (default: 0.001 = 0.1%).
    pub min_iv: f64,
    /// Maximum IV bound (default: 5.0 = 500%).
    pub max_iv: f64,
    /// Vega below which Newton-Raphson is abandoned for bisection.
    pub min_vega: f64,
    /// Year fraction at or below which a contract is treated as expired.
    pub time_floor: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            max_bisection_iterations: 200,
            tolerance: 1e-5,
            vol_tolerance: 1e-10,
            initial_guess: 0.20,
            min_iv: 0.001,
            max_iv: 5.0,
            min_vega: 1e-8,
            time_floor: MINUTE_FLOOR,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of Newton-Raphson iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the maximum number of bisection iterations.
    #[must_use]
    pub fn with_max_bisection_iterations(mut self, max_bisection_iterations: u32) -> Self {
        self.max_bisection_iterations = max_bisection_iterations;
        self
    }

    /// Sets the price convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the initial IV guess.
    #[must_use]
    pub fn with_initial_guess(mut self, initial_guess: f64) -> Self {
        self.initial_guess = initial_guess;
        self
    }

    /// Sets the IV bounds.
    #[must_use]
    pub fn with_bounds(mut self, min_iv: f64, max_iv: f64) -> Self {
        self.min_iv = min_iv;
        self.max_iv = max_iv;
        self
    }

    /// Sets the vega threshold that triggers the bisection fallback.
    #[must_use]
    pub fn with_min_vega(mut self, min_vega: f64) -> Self {
        self.min_vega = min_vega;
        self
    }

    /// Sets the time-to-expiry floor.
    #[must_use]
    pub fn with_time_floor(mut self, time_floor: f64) -> Self {
        self.time_floor = time_floor;
        self
    }

    /// Checks that bounds, tolerances and budgets are usable.
    pub fn validate(&self) -> PricingResult<()> {
        if !(self.min_iv.is_finite() && self.min_iv > 0.0) {
            return Err(PricingError::invalid_config(format!(
                "min_iv must be positive, got {}",
                self.min_iv
            )));
        }
        if !(self.max_iv.is_finite() && self.max_iv > self.min_iv) {
            return Err(PricingError::invalid_config(format!(
                "max_iv ({}) must exceed min_iv ({})",
                self.max_iv, self.min_iv
            )));
        }
        for (name, value) in [
            ("tolerance", self.tolerance),
            ("vol_tolerance", self.vol_tolerance),
            ("initial_guess", self.initial_guess),
            ("time_floor", self.time_floor),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PricingError::invalid_config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.min_vega.is_finite() && self.min_vega >= 0.0) {
            return Err(PricingError::invalid_config(format!(
                "min_vega must be non-negative, got {}",
                self.min_vega
            )));
        }
        if self.max_iterations == 0 {
            return Err(PricingError::invalid_config(
                "max_iterations must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Phases of a solve, reported through `tracing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverState {
    /// Inputs validated, seed chosen.
    Initializing,
    /// Newton-Raphson steps.
    Iterating,
    /// Bisection over the volatility bracket.
    FallbackBisection,
    /// Terminal: price matched within tolerance.
    Converged,
    /// Terminal: budget exhausted or the bracket misses the quote.
    Diverged,
}

/// Implied volatility solver bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct ImpliedVolatilitySolver {
    config: SolverConfig,
}

impl ImpliedVolatilitySolver {
    /// Creates a solver after validating `config`.
    pub fn new(config: SolverConfig) -> PricingResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves for the volatility matching `observation`.
    ///
    /// See [`solve_iv`].
    pub fn solve(
        &self,
        observation: &MarketObservation,
        params: &ContractParams,
    ) -> PricingResult<VolatilityEstimate> {
        solve_iv(observation, params, &self.config)
    }
}

/// Validates the solver inputs and resolves domain edge cases.
///
/// Returns `Ok(Some(estimate))` when the contract cannot have a meaningful
/// IV, `Ok(None)` when solving should proceed.
fn precheck(
    observation: &MarketObservation,
    params: &ContractParams,
    config: &SolverConfig,
) -> PricingResult<Option<VolatilityEstimate>> {
    params.validate()?;

    let market_price = observation.last_traded_price;
    ensure_finite("market price", market_price)?;
    if market_price < 0.0 {
        return Err(PricingError::invalid_input(format!(
            "market price must be non-negative, got {market_price}"
        )));
    }

    if !observation.has_trade() {
        debug!(strike = params.strike, "no trade, skipping IV solve");
        return Ok(Some(VolatilityEstimate::edge_case(
            EstimateStatus::NoMarketPrice,
        )));
    }

    if params.years_to_expiry <= config.time_floor {
        debug!(
            strike = params.strike,
            years_to_expiry = params.years_to_expiry,
            "contract at expiry, skipping IV solve"
        );
        return Ok(Some(VolatilityEstimate::edge_case(EstimateStatus::AtExpiry)));
    }

    Ok(None)
}

/// Solves for implied volatility using Newton-Raphson with a bisection
/// fallback.
///
/// The Newton-Raphson update is σ_{n+1} = clamp(σ_n − (BS(σ_n) − price) / vega(σ_n)).
///
/// # Returns
/// - `Ok(estimate)` for every valid contract, including quotes the model
///   cannot match; inspect [`VolatilityEstimate::status`].
/// - `Err(PricingError::InvalidInput)` for invalid spot, strike, time, rate
///   or a negative market price.
///
/// # Example
/// ```
/// use ivgreeks_rs::prelude::*;
///
/// let params = ContractParams::call(100.0, 100.0, 0.25, 0.05);
/// let market_price = BlackScholes::price(&params.with_volatility(0.3)).unwrap();
///
/// let estimate = solve_iv(
///     &MarketObservation::new(market_price),
///     &params,
///     &SolverConfig::default(),
/// )
/// .unwrap();
/// assert!(estimate.converged);
/// assert!((estimate.value - 0.3).abs() < 1e-4);
/// ```
pub fn solve_iv(
    observation: &MarketObservation,
    params: &ContractParams,
    config: &SolverConfig,
) -> PricingResult<VolatilityEstimate> {
    trace!(state = ?SolverState::Initializing, strike = params.strike);
    if let Some(edge) = precheck(observation, params, config)? {
        return Ok(edge);
    }

    let market_price = observation.last_traded_price;
    let mut iv = config.initial_guess.clamp(config.min_iv, config.max_iv);
    let mut best_iv = iv;
    let mut best_residual = f64::INFINITY;

    for iteration in 0..config.max_iterations {
        let inputs = params.with_volatility(iv);
        let residual = BlackScholes::price(&inputs)? - market_price;
        trace!(state = ?SolverState::Iterating, iteration, iv, residual);

        if residual.abs() < best_residual {
            best_residual = residual.abs();
            best_iv = iv;
        }

        if residual.abs() < config.tolerance {
            debug!(state = ?SolverState::Converged, iv, iterations = iteration + 1);
            return Ok(VolatilityEstimate::new(
                iv,
                iteration + 1,
                EstimateStatus::Converged,
            ));
        }

        let vega = GreeksEngine::vega(&inputs)?;
        if vega.abs() < config.min_vega {
            debug!(
                state = ?SolverState::FallbackBisection,
                iv,
                vega,
                "vega below threshold"
            );
            return bisect(params, market_price, config, iteration + 1);
        }

        let next = iv - residual / vega;
        let pinned_low = iv <= config.min_iv && next < config.min_iv;
        let pinned_high = iv >= config.max_iv && next > config.max_iv;
        if pinned_low || pinned_high {
            debug!(
                state = ?SolverState::FallbackBisection,
                iv,
                "iterate pinned at volatility bound"
            );
            return bisect(params, market_price, config, iteration + 1);
        }

        iv = next.clamp(config.min_iv, config.max_iv);
    }

    debug!(
        state = ?SolverState::Diverged,
        best_iv,
        best_residual,
        iterations = config.max_iterations
    );
    Ok(VolatilityEstimate::new(
        best_iv,
        config.max_iterations,
        EstimateStatus::Diverged,
    ))
}

/// Bisection over `[min_iv, max_iv]`, continuing the iteration count `spent`.
fn bisect(
    params: &ContractParams,
    market_price: f64,
    config: &SolverConfig,
    spent: u32,
) -> PricingResult<VolatilityEstimate> {
    let price_at = |vol: f64| BlackScholes::price(&params.with_volatility(vol));

    let mut low = config.min_iv;
    let mut high = config.max_iv;
    let price_low = price_at(low)?;
    let price_high = price_at(high)?;

    if (price_low - market_price).abs() < config.tolerance {
        return Ok(VolatilityEstimate::new(low, spent, EstimateStatus::Converged));
    }
    if (price_high - market_price).abs() < config.tolerance {
        return Ok(VolatilityEstimate::new(high, spent, EstimateStatus::Converged));
    }

    // Price is increasing in volatility, so a quote outside the bracket
    // prices cannot be matched anywhere in the bracket.
    if market_price < price_low || market_price > price_high {
        let bound = if market_price < price_low { low } else { high };
        debug!(
            state = ?SolverState::Diverged,
            market_price,
            price_low,
            price_high,
            "market price outside volatility bracket"
        );
        return Ok(VolatilityEstimate::new(
            bound,
            spent,
            EstimateStatus::NumericalNonConvergence,
        ));
    }

    for iteration in 0..config.max_bisection_iterations {
        let mid = 0.5 * (low + high);
        let diff = price_at(mid)? - market_price;
        trace!(state = ?SolverState::FallbackBisection, iteration, mid, diff);

        if diff.abs() < config.tolerance || (high - low) < config.vol_tolerance {
            let iterations = spent + iteration + 1;
            debug!(state = ?SolverState::Converged, iv = mid, iterations);
            return Ok(VolatilityEstimate::new(
                mid,
                iterations,
                EstimateStatus::Converged,
            ));
        }

        if diff > 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    let iterations = spent + config.max_bisection_iterations;
    debug!(state = ?SolverState::Diverged, iterations, low, high);
    Ok(VolatilityEstimate::new(
        0.5 * (low + high),
        iterations,
        EstimateStatus::Diverged,
    ))
}

/// Solves for IV using bisection alone.
///
/// Slower than Newton-Raphson but insensitive to vega; shares the edge-case
/// handling and result classification of [`solve_iv`].
pub fn solve_iv_bisection(
    observation: &MarketObservation,
    params: &ContractParams,
    config: &SolverConfig,
) -> PricingResult<VolatilityEstimate> {
    if let Some(edge) = precheck(observation, params, config)? {
        return Ok(edge);
    }
    bisect(params, observation.last_traded_price, config, 0)
}
