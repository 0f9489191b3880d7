//! Option chain evaluation on top of the pricing core.
//!
//! Builds the strike grid around the ATM strike, evaluates every
//! (strike, option type) quote independently and compares Greeks across
//! risk-free rate assumptions. Fetching quotes and writing files is left to
//! the caller.

mod evaluator;
mod rate_comparison;
mod strikes;

pub use evaluator::{
    ChainEvaluator, ChainRequest, ChainSummary, ContractEvaluation, ContractQuote, RowStatus,
    quotes_for_strikes,
};
pub use rate_comparison::{RateComparisonRow, RateScenario, compare_rates};
pub use strikes::{DEFAULT_STRIKE_GAP, DEFAULT_STRIKES_EACH_SIDE, atm_strike, strike_range};
