//! Value types shared by the pricer, the Greeks engine and the IV solver.

use super::error::{PricingError, PricingResult, ensure_finite, ensure_positive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Option type for pricing and IV calculation.
///
/// Exchange codes `CE` and `PE` are accepted as aliases when parsing or
/// deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option (right to buy the underlying at strike price).
    #[serde(alias = "CE")]
    Call,
    /// Put option (right to sell the underlying at strike price).
    #[serde(alias = "PE")]
    Put,
}

impl OptionType {
    /// Exchange code used on option chains (`CE` / `PE`).
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            OptionType::Call => "CE",
            OptionType::Put => "PE",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CE" | "CALL" | "C" => Ok(OptionType::Call),
            "PE" | "PUT" | "P" => Ok(OptionType::Put),
            other => Err(PricingError::invalid_input(format!(
                "unknown option type {other:?}"
            ))),
        }
    }
}

/// Contract and market parameters without a volatility.
///
/// This is what the IV solver receives: everything the pricer needs except
/// the volatility it is asked to find.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractParams {
    /// Underlying spot price in price units.
    pub spot: f64,
    /// Option strike price in price units.
    pub strike: f64,
    /// Time to expiration in years, already floored by the time basis.
    pub years_to_expiry: f64,
    /// Risk-free interest rate (annualized, continuously compounded).
    pub risk_free_rate: f64,
    /// Continuous dividend yield, zero unless configured.
    #[serde(default)]
    pub dividend_yield: f64,
    /// Option type (Call or Put).
    pub option_type: OptionType,
}

impl ContractParams {
    /// Creates new contract parameters with zero dividend yield.
    #[must_use]
    pub fn new(
        spot: f64,
        strike: f64,
        years_to_expiry: f64,
        risk_free_rate: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            years_to_expiry,
            risk_free_rate,
            dividend_yield: 0.0,
            option_type,
        }
    }

    /// Creates parameters for a call option.
    #[must_use]
    pub fn call(spot: f64, strike: f64, years_to_expiry: f64, risk_free_rate: f64) -> Self {
        Self::new(
            spot,
            strike,
            years_to_expiry,
            risk_free_rate,
            OptionType::Call,
        )
    }

    /// Creates parameters for a put option.
    #[must_use]
    pub fn put(spot: f64, strike: f64, years_to_expiry: f64, risk_free_rate: f64) -> Self {
        Self::new(
            spot,
            strike,
            years_to_expiry,
            risk_free_rate,
            OptionType::Put,
        )
    }

    /// Sets a constant continuous dividend yield.
    #[must_use]
    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    /// Combines these parameters with a volatility into pricing inputs.
    #[must_use]
    pub fn with_volatility(&self, volatility: f64) -> PricingInputs {
        PricingInputs {
            spot: self.spot,
            strike: self.strike,
            years_to_expiry: self.years_to_expiry,
            volatility,
            risk_free_rate: self.risk_free_rate,
            dividend_yield: self.dividend_yield,
            option_type: self.option_type,
        }
    }

    /// Checks spot, strike, time and rates.
    pub fn validate(&self) -> PricingResult<()> {
        ensure_positive("spot", self.spot)?;
        ensure_positive("strike", self.strike)?;
        ensure_positive("years to expiry", self.years_to_expiry)?;
        ensure_finite("risk-free rate", self.risk_free_rate)?;
        ensure_finite("dividend yield", self.dividend_yield)
    }
}

/// Full set of inputs for one Black-Scholes-Merton evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingInputs {
    /// Underlying spot price (S).
    pub spot: f64,
    /// Strike price (K).
    pub strike: f64,
    /// Time to expiration in years (T).
    pub years_to_expiry: f64,
    /// Annualized volatility (σ), e.g. 0.20 for 20%.
    pub volatility: f64,
    /// Risk-free rate (r).
    pub risk_free_rate: f64,
    /// Continuous dividend yield (q).
    #[serde(default)]
    pub dividend_yield: f64,
    /// Call or Put.
    pub option_type: OptionType,
}

impl PricingInputs {
    /// Creates pricing inputs with zero dividend yield.
    #[must_use]
    pub fn new(
        spot: f64,
        strike: f64,
        years_to_expiry: f64,
        volatility: f64,
        risk_free_rate: f64,
        option_type: OptionType,
    ) -> Self {
        ContractParams::new(spot, strike, years_to_expiry, risk_free_rate, option_type)
            .with_volatility(volatility)
    }

    /// The same contract without its volatility.
    #[must_use]
    pub fn contract(&self) -> ContractParams {
        ContractParams {
            spot: self.spot,
            strike: self.strike,
            years_to_expiry: self.years_to_expiry,
            risk_free_rate: self.risk_free_rate,
            dividend_yield: self.dividend_yield,
            option_type: self.option_type,
        }
    }

    /// Copy of these inputs with another volatility.
    #[must_use]
    pub fn with_volatility(&self, volatility: f64) -> Self {
        Self { volatility, ..*self }
    }

    /// Checks every precondition of the closed-form model.
    pub fn validate(&self) -> PricingResult<()> {
        self.contract().validate()?;
        ensure_positive("volatility", self.volatility)
    }
}

/// Observed market datum the solver inverts the model against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketObservation {
    /// Last traded price; zero means the contract has not traded.
    pub last_traded_price: f64,
}

impl MarketObservation {
    /// Creates a new observation.
    #[must_use]
    pub fn new(last_traded_price: f64) -> Self {
        Self { last_traded_price }
    }

    /// Returns true if the contract has a usable trade price.
    #[must_use]
    pub fn has_trade(&self) -> bool {
        self.last_traded_price > 0.0
    }
}

/// First and second order sensitivities of one option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GreeksResult {
    /// ∂V/∂S.
    pub delta: f64,
    /// ∂²V/∂S².
    pub gamma: f64,
    /// ∂V/∂σ per unit (100%) volatility.
    pub vega: f64,
    /// ∂V/∂t per calendar day.
    pub theta: f64,
}

impl GreeksResult {
    /// Greeks of a contract that could not be evaluated.
    #[must_use]
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Returns true if every Greek is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.delta.is_finite()
            && self.gamma.is_finite()
            && self.vega.is_finite()
            && self.theta.is_finite()
    }
}

/// Terminal classification of an implied volatility solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimateStatus {
    /// Model price matched the market price within tolerance.
    Converged,
    /// Iteration budget exhausted; value is the best iterate found.
    Diverged,
    /// The volatility bracket does not contain the market price; value is
    /// the violated bound.
    NumericalNonConvergence,
    /// The contract has no trade (market price is zero).
    NoMarketPrice,
    /// Time to expiry is at its floor; no meaningful IV exists.
    AtExpiry,
}

impl EstimateStatus {
    /// Returns true for the domain edge cases resolved before solving.
    #[must_use]
    pub fn is_edge_case(&self) -> bool {
        matches!(self, EstimateStatus::NoMarketPrice | EstimateStatus::AtExpiry)
    }
}

/// Result of an implied volatility solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityEstimate {
    /// Implied volatility (e.g. 0.25 = 25%), or best effort when not converged.
    pub value: f64,
    /// True only when the status is [`EstimateStatus::Converged`].
    pub converged: bool,
    /// Solver iterations spent across Newton-Raphson and bisection.
    pub iterations: u32,
    /// How the solve ended.
    pub status: EstimateStatus,
}

impl VolatilityEstimate {
    /// Creates a new estimate; `converged` follows from `status`.
    #[must_use]
    pub fn new(value: f64, iterations: u32, status: EstimateStatus) -> Self {
        Self {
            value,
            converged: status == EstimateStatus::Converged,
            iterations,
            status,
        }
    }

    /// Estimate for a contract that never reached the solver loop.
    #[must_use]
    pub fn edge_case(status: EstimateStatus) -> Self {
        Self::new(0.0, 0, status)
    }

    /// Returns the IV as a percentage (e.g., 25.0 for 25%).
    #[must_use]
    pub fn iv_percent(&self) -> f64 {
        self.value * 100.0
    }

    /// Converged volatility, or `None` when the solve did not converge.
    #[must_use]
    pub fn volatility(&self) -> Option<f64> {
        self.converged.then_some(self.value)
    }
}
