//! # ivgreeks-rs
//!
//! Implied volatility and Black-Scholes-Merton Greeks for European options.
//!
//! The crate turns a quoted option price into a consistent implied
//! volatility and a set of sensitivities (delta, gamma, vega, theta):
//!
//! - [`pricing`]: Actual/365 time basis, closed-form pricer, Greeks and a
//!   Newton-Raphson IV solver with a bounded bisection fallback.
//! - [`chain`]: strike grids and parallel evaluation of whole option
//!   chains, one flagged row per quote even when a contract cannot be
//!   solved.
//! - [`config`]: JSON-loadable engine configuration. The risk-free rate and
//!   the fallback volatility are explicit settings, never constants.
//!
//! The library logs through [`tracing`] and installs no subscriber.
//!
//! ## Example
//!
//! ```
//! use ivgreeks_rs::prelude::*;
//!
//! let evaluator = ChainEvaluator::new(EngineConfig::default()).unwrap();
//! let row = evaluator.evaluate_contract(
//!     19500.0,
//!     7.0 / 365.0,
//!     &ContractQuote::new(19500.0, OptionType::Call, 150.0),
//! );
//! assert_eq!(row.status, RowStatus::Solved);
//! assert!(row.iv_percent.is_some());
//! ```

pub mod chain;
pub mod config;
pub mod pricing;

/// Commonly used types and functions.
pub mod prelude {
    pub use crate::chain::{
        ChainEvaluator, ChainRequest, ChainSummary, ContractEvaluation, ContractQuote,
        RateComparisonRow, RateScenario, RowStatus, atm_strike, compare_rates,
        quotes_for_strikes, strike_range,
    };
    pub use crate::config::{EngineConfig, RatePreset};
    pub use crate::pricing::{
        BlackScholes, ContractParams, EstimateStatus, ExpirySession, GreeksEngine, GreeksResult,
        ImpliedVolatilitySolver, MarketObservation, OptionType, PricingError, PricingInputs,
        PricingResult, SolverConfig, TimeBasis, VolatilityEstimate, solve_iv,
    };
}
