//! Pricing core: time basis, Black-Scholes-Merton pricer, Greeks and the
//! implied volatility solver.
//!
//! # Overview
//!
//! For each option contract the components compose linearly:
//!
//! 1. [`TimeBasis`] turns the expiry instant and a reference instant into an
//!    Actual/365 year fraction, floored at one minute.
//! 2. [`solve_iv`] inverts [`BlackScholes::price`] against the last traded
//!    price. Newton-Raphson converges in a handful of iterations because
//!    vega (∂price/∂σ) is positive; when vega vanishes the solver falls
//!    back to bisection over `[0.1%, 500%]`.
//! 3. [`GreeksEngine`] derives delta, gamma, vega and theta at the solved
//!    (or fallback) volatility.
//!
//! All functions are pure and safe to call concurrently.
//!
//! # Example
//!
//! ```
//! use ivgreeks_rs::prelude::*;
//!
//! let params = ContractParams::call(19500.0, 19500.0, 7.0 / 365.0, 0.065);
//! let estimate = solve_iv(
//!     &MarketObservation::new(141.7),
//!     &params,
//!     &SolverConfig::default(),
//! )
//! .unwrap();
//! assert!(estimate.converged);
//!
//! let greeks = GreeksEngine::greeks(&params.with_volatility(estimate.value)).unwrap();
//! assert!(greeks.delta > 0.5 && greeks.theta < 0.0);
//! ```

mod black_scholes;
mod error;
mod greeks;
mod solver;
mod time_basis;
mod types;

pub use black_scholes::BlackScholes;
pub use error::{PricingError, PricingResult};
pub use greeks::GreeksEngine;
pub use solver::{ImpliedVolatilitySolver, SolverConfig, SolverState, solve_iv, solve_iv_bisection};
pub use time_basis::{DAYS_PER_YEAR, ExpirySession, MINUTE_FLOOR, TimeBasis};
pub use types::{
    ContractParams, EstimateStatus, GreeksResult, MarketObservation, OptionType, PricingInputs,
    VolatilityEstimate,
};
