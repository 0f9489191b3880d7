//! Per-contract and per-chain evaluation.
//!
//! Each quote is priced independently: year fraction, implied volatility,
//! then Greeks at the implied (or fallback) volatility. A contract that
//! cannot be solved never aborts the chain; it produces a flagged row so the
//! output has exactly one row per input quote, in input order.

use crate::config::EngineConfig;
use crate::pricing::{
    ContractParams, GreeksEngine, GreeksResult, ImpliedVolatilitySolver, MarketObservation,
    OptionType, PricingResult, TimeBasis, VolatilityEstimate,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One quoted contract of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractQuote {
    /// Strike price.
    pub strike: f64,
    /// Call or Put.
    pub option_type: OptionType,
    /// Last traded price, zero if the contract has not traded.
    pub last_traded_price: f64,
}

impl ContractQuote {
    /// Creates a new quote.
    #[must_use]
    pub fn new(strike: f64, option_type: OptionType, last_traded_price: f64) -> Self {
        Self {
            strike,
            option_type,
            last_traded_price,
        }
    }
}

/// A set of quotes sharing one underlying and one expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainRequest {
    /// Underlying spot price.
    pub spot: f64,
    /// Instant the contracts stop trading.
    pub expiry: DateTime<Utc>,
    /// Valuation instant.
    pub reference: DateTime<Utc>,
    /// Quotes to evaluate; output rows follow this order.
    pub quotes: Vec<ContractQuote>,
}

/// How a row's Greeks were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowStatus {
    /// IV solved; Greeks at the implied volatility.
    Solved,
    /// IV undefined or not converged; Greeks at the fallback volatility.
    Fallback,
    /// IV undefined or not converged and no fallback configured.
    Zeroed,
    /// Contract inputs were invalid; Greeks zeroed.
    Rejected,
}

/// Result row for one quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractEvaluation {
    /// Strike price.
    pub strike: f64,
    /// Call or Put.
    pub option_type: OptionType,
    /// Last traded price used for the solve.
    pub last_traded_price: f64,
    /// Year fraction used for pricing.
    pub years_to_expiry: f64,
    /// Implied volatility in percent, rounded to 2 decimals; `None` when
    /// undefined (no trade, at expiry) or not converged.
    pub iv_percent: Option<f64>,
    /// Volatility the Greeks were computed at.
    pub volatility_used: Option<f64>,
    /// Raw solver output, absent for rejected contracts.
    pub estimate: Option<VolatilityEstimate>,
    /// Delta, gamma, vega, theta.
    pub greeks: GreeksResult,
    /// Row classification.
    pub status: RowStatus,
    /// Reason a contract was rejected.
    pub rejection: Option<String>,
}

/// Counts of row statuses in an evaluated chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSummary {
    /// Rows with a solved IV.
    pub solved: usize,
    /// Rows priced at the fallback volatility.
    pub fallback: usize,
    /// Rows with zeroed Greeks and no IV.
    pub zeroed: usize,
    /// Rows with invalid inputs.
    pub rejected: usize,
}

impl ChainSummary {
    /// Tallies the statuses of `rows`.
    #[must_use]
    pub fn from_rows(rows: &[ContractEvaluation]) -> Self {
        rows.iter().fold(Self::default(), |mut summary, row| {
            match row.status {
                RowStatus::Solved => summary.solved += 1,
                RowStatus::Fallback => summary.fallback += 1,
                RowStatus::Zeroed => summary.zeroed += 1,
                RowStatus::Rejected => summary.rejected += 1,
            }
            summary
        })
    }

    /// Total number of rows.
    #[must_use]
    pub fn total(&self) -> usize {
        self.solved + self.fallback + self.zeroed + self.rejected
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Evaluates quotes with one engine configuration.
#[derive(Debug, Clone)]
pub struct ChainEvaluator {
    config: EngineConfig,
    time_basis: TimeBasis,
    solver: ImpliedVolatilitySolver,
}

impl ChainEvaluator {
    /// Creates an evaluator after validating `config`.
    pub fn new(config: EngineConfig) -> PricingResult<Self> {
        config.validate()?;
        let time_basis = config.time_basis()?;
        let solver = ImpliedVolatilitySolver::new(config.solver.clone())?;
        Ok(Self {
            config,
            time_basis,
            solver,
        })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Year fraction between `reference` and `expiry`, floored.
    #[must_use]
    pub fn years_to_expiry(&self, expiry: &DateTime<Utc>, reference: &DateTime<Utc>) -> f64 {
        self.time_basis.year_fraction(expiry, reference)
    }

    /// Contract parameters for `quote` under this configuration.
    #[must_use]
    pub fn contract_params(
        &self,
        spot: f64,
        years_to_expiry: f64,
        quote: &ContractQuote,
    ) -> ContractParams {
        ContractParams::new(
            spot,
            quote.strike,
            years_to_expiry,
            self.config.risk_free_rate,
            quote.option_type,
        )
        .with_dividend_yield(self.config.dividend_yield)
    }

    /// Evaluates a single quote. Never fails: invalid contracts yield a
    /// [`RowStatus::Rejected`] row.
    #[must_use]
    pub fn evaluate_contract(
        &self,
        spot: f64,
        years_to_expiry: f64,
        quote: &ContractQuote,
    ) -> ContractEvaluation {
        let params = self.contract_params(spot, years_to_expiry, quote);
        let mut row = ContractEvaluation {
            strike: quote.strike,
            option_type: quote.option_type,
            last_traded_price: quote.last_traded_price,
            years_to_expiry,
            iv_percent: None,
            volatility_used: None,
            estimate: None,
            greeks: GreeksResult::zeroed(),
            status: RowStatus::Rejected,
            rejection: None,
        };

        let observation = MarketObservation::new(quote.last_traded_price);
        let estimate = match self.solver.solve(&observation, &params) {
            Ok(estimate) => estimate,
            Err(err) => {
                warn!(strike = quote.strike, option_type = %quote.option_type, "rejected: {err}");
                row.rejection = Some(err.to_string());
                return row;
            }
        };
        row.estimate = Some(estimate);

        let (volatility, status) = match estimate.volatility() {
            Some(iv) => {
                row.iv_percent = Some(round_to_cents(estimate.iv_percent()));
                (Some(iv), RowStatus::Solved)
            }
            None => {
                if !estimate.status.is_edge_case() {
                    warn!(
                        strike = quote.strike,
                        option_type = %quote.option_type,
                        status = ?estimate.status,
                        best_effort = estimate.value,
                        "IV solve did not converge"
                    );
                }
                match self.config.fallback_volatility {
                    Some(fallback) => (Some(fallback), RowStatus::Fallback),
                    None => (None, RowStatus::Zeroed),
                }
            }
        };

        row.status = status;
        if let Some(vol) = volatility {
            match GreeksEngine::greeks(&params.with_volatility(vol)) {
                Ok(greeks) => {
                    row.greeks = greeks;
                    row.volatility_used = Some(vol);
                }
                Err(err) => {
                    warn!(strike = quote.strike, "greeks rejected: {err}");
                    row.status = RowStatus::Rejected;
                    row.rejection = Some(err.to_string());
                }
            }
        }

        debug!(
            strike = row.strike,
            option_type = %row.option_type,
            iv_percent = ?row.iv_percent,
            status = ?row.status,
            "contract evaluated"
        );
        row
    }

    /// Evaluates every quote of `request`, in parallel when the `parallel`
    /// feature is enabled. Rows are returned in quote order.
    #[must_use]
    pub fn evaluate_chain(&self, request: &ChainRequest) -> Vec<ContractEvaluation> {
        let years = self.years_to_expiry(&request.expiry, &request.reference);
        if self.time_basis.is_at_floor(years) {
            warn!(expiry = %request.expiry, reference = %request.reference, "chain evaluated at expiry");
        }

        #[cfg(feature = "parallel")]
        let rows: Vec<ContractEvaluation> = request
            .quotes
            .par_iter()
            .map(|quote| self.evaluate_contract(request.spot, years, quote))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<ContractEvaluation> = request
            .quotes
            .iter()
            .map(|quote| self.evaluate_contract(request.spot, years, quote))
            .collect();

        let summary = ChainSummary::from_rows(&rows);
        info!(
            spot = request.spot,
            years_to_expiry = years,
            solved = summary.solved,
            fallback = summary.fallback,
            zeroed = summary.zeroed,
            rejected = summary.rejected,
            "chain evaluated"
        );
        rows
    }

    /// Evaluates a chain whose expiry is given as a calendar date; the
    /// expiry instant is the configured session close on that date.
    pub fn evaluate_expiry_date(
        &self,
        spot: f64,
        expiry_date: NaiveDate,
        reference: DateTime<Utc>,
        quotes: Vec<ContractQuote>,
    ) -> PricingResult<Vec<ContractEvaluation>> {
        let expiry = self.config.session.expiry_instant(expiry_date)?;
        Ok(self.evaluate_chain(&ChainRequest {
            spot,
            expiry,
            reference,
            quotes,
        }))
    }
}

/// Quotes for both option types at every strike, calls first per strike.
#[must_use]
pub fn quotes_for_strikes<F>(strikes: &[f64], mut last_traded_price: F) -> Vec<ContractQuote>
where
    F: FnMut(f64, OptionType) -> f64,
{
    strikes
        .iter()
        .flat_map(|&strike| [OptionType::Call, OptionType::Put].map(|kind| (strike, kind)))
        .map(|(strike, kind)| ContractQuote::new(strike, kind, last_traded_price(strike, kind)))
        .collect()
}
