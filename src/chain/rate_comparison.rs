//! Greeks sensitivity to the risk-free rate assumption.
//!
//! Brokers publish Greeks under different rate conventions. Comparing one
//! contract across several rates shows which convention a published figure
//! was computed with.

use crate::config::RatePreset;
use crate::pricing::{ContractParams, GreeksEngine, GreeksResult, PricingResult};
use serde::{Deserialize, Serialize};

/// A named rate assumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateScenario {
    /// Display label.
    pub label: String,
    /// Annualized rate.
    pub rate: f64,
}

impl RateScenario {
    /// Creates a scenario.
    pub fn new(label: impl Into<String>, rate: f64) -> Self {
        Self {
            label: label.into(),
            rate,
        }
    }

    /// One scenario per [`RatePreset`], baseline (exchange rate) first.
    #[must_use]
    pub fn presets() -> Vec<Self> {
        RatePreset::ALL
            .iter()
            .map(|preset| Self::new(preset.label(), preset.rate()))
            .collect()
    }
}

impl From<RatePreset> for RateScenario {
    fn from(preset: RatePreset) -> Self {
        Self::new(preset.label(), preset.rate())
    }
}

/// Greeks under one rate and their deviation from the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateComparisonRow {
    /// Scenario evaluated.
    pub scenario: RateScenario,
    /// Greeks at the scenario rate.
    pub greeks: GreeksResult,
    /// Percentage difference of each Greek from the baseline, relative to
    /// the baseline's magnitude. Zero where the baseline Greek is zero.
    pub difference_pct: GreeksResult,
}

fn percent_difference(value: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        0.0
    } else {
        (value - baseline) / baseline.abs() * 100.0
    }
}

/// Evaluates `contract` at `volatility` under each scenario.
///
/// The first scenario is the baseline; its row has zero differences. The
/// contract's own risk-free rate is ignored.
pub fn compare_rates(
    contract: &ContractParams,
    volatility: f64,
    scenarios: &[RateScenario],
) -> PricingResult<Vec<RateComparisonRow>> {
    let greeks: Vec<GreeksResult> = scenarios
        .iter()
        .map(|scenario| {
            let params = ContractParams {
                risk_free_rate: scenario.rate,
                ..*contract
            };
            GreeksEngine::greeks(&params.with_volatility(volatility))
        })
        .collect::<PricingResult<_>>()?;

    let Some(baseline) = greeks.first().copied() else {
        return Ok(Vec::new());
    };

    Ok(scenarios
        .iter()
        .zip(greeks)
        .map(|(scenario, g)| RateComparisonRow {
            scenario: scenario.clone(),
            greeks: g,
            difference_pct: GreeksResult {
                delta: percent_difference(g.delta, baseline.delta),
                gamma: percent_difference(g.gamma, baseline.gamma),
                vega: percent_difference(g.vega, baseline.vega),
                theta: percent_difference(g.theta, baseline.theta),
            },
        })
        .collect())
}
