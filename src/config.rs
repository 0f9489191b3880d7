//! Engine configuration.
//!
//! Every market assumption the engine depends on lives here and is passed
//! explicitly into each evaluation; nothing is read from globals. The
//! configuration deserializes from JSON with defaults for omitted fields.

use crate::pricing::{ExpirySession, PricingError, PricingResult, SolverConfig, TimeBasis};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default annualized risk-free rate (NSE convention, 10%).
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.10;

/// Default volatility used for Greeks when no IV can be solved (15%).
pub const DEFAULT_FALLBACK_VOLATILITY: f64 = 0.15;

/// Reference risk-free rates used when comparing Greeks across assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatePreset {
    /// Rate used by the exchange for its published Greeks (10%).
    Nse,
    /// Custom 6.5% assumption.
    Custom,
    /// 91-day treasury bill yield (5.43%).
    RbiTBill,
    /// Conservative 5% assumption.
    Conservative,
}

impl RatePreset {
    /// All presets, baseline first.
    pub const ALL: [RatePreset; 4] = [
        RatePreset::Nse,
        RatePreset::Custom,
        RatePreset::RbiTBill,
        RatePreset::Conservative,
    ];

    /// Annualized rate of this preset.
    #[must_use]
    pub fn rate(&self) -> f64 {
        match self {
            RatePreset::Nse => 0.10,
            RatePreset::Custom => 0.065,
            RatePreset::RbiTBill => 0.0543,
            RatePreset::Conservative => 0.05,
        }
    }

    /// Human readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RatePreset::Nse => "NSE (10%)",
            RatePreset::Custom => "Custom (6.5%)",
            RatePreset::RbiTBill => "RBI T-Bill (5.43%)",
            RatePreset::Conservative => "Conservative (5%)",
        }
    }
}

/// Configuration for chain evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Annualized, continuously compounded risk-free rate.
    pub risk_free_rate: f64,
    /// Constant continuous dividend yield.
    pub dividend_yield: f64,
    /// Volatility used for Greeks when the IV is undefined or the solver
    /// did not converge. `None` reports zeroed Greeks instead.
    pub fallback_volatility: Option<f64>,
    /// Session close used to turn expiry dates into instants.
    pub session: ExpirySession,
    /// Implied volatility solver settings.
    pub solver: SolverConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            dividend_yield: 0.0,
            fallback_volatility: Some(DEFAULT_FALLBACK_VOLATILITY),
            session: ExpirySession::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> PricingResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> PricingResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serializes the configuration to pretty JSON.
    pub fn to_json(&self) -> PricingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the risk-free rate.
    #[must_use]
    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    /// Sets the risk-free rate from a preset.
    #[must_use]
    pub fn with_rate_preset(self, preset: RatePreset) -> Self {
        self.with_risk_free_rate(preset.rate())
    }

    /// Sets the dividend yield.
    #[must_use]
    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    /// Sets or disables the fallback volatility.
    #[must_use]
    pub fn with_fallback_volatility(mut self, fallback_volatility: Option<f64>) -> Self {
        self.fallback_volatility = fallback_volatility;
        self
    }

    /// Replaces the solver settings.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// The time basis implied by the solver's time floor.
    pub fn time_basis(&self) -> PricingResult<TimeBasis> {
        TimeBasis::with_floor(self.solver.time_floor)
    }

    /// Checks rates, fallback volatility and solver settings.
    pub fn validate(&self) -> PricingResult<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(PricingError::invalid_config(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        if !self.dividend_yield.is_finite() {
            return Err(PricingError::invalid_config(format!(
                "dividend_yield must be finite, got {}",
                self.dividend_yield
            )));
        }
        if let Some(vol) = self.fallback_volatility {
            if !(vol.is_finite() && vol > 0.0) {
                return Err(PricingError::invalid_config(format!(
                    "fallback_volatility must be positive, got {vol}"
                )));
            }
        }
        self.solver.validate()
    }
}
