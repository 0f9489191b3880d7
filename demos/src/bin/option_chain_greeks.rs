//! Evaluates a weekly index option chain and prints IV and Greeks per strike.
//!
//! Usage: `option_chain_greeks [config.json] [output.json]`
//!
//! Quotes are synthesized from a volatility smile so the example runs
//! offline. A real caller would fill `last_traded_price` from a market feed.

use chrono::{Duration, Utc};
use ivgreeks_rs::chain::{DEFAULT_STRIKE_GAP, DEFAULT_STRIKES_EACH_SIDE};
use ivgreeks_rs::prelude::*;
use std::env;
use std::fs;
use tracing::{info, warn};

const SPOT: f64 = 19512.35;

/// Synthetic last traded price: a smile around 12.5% with a few untraded
/// far strikes.
fn synthetic_ltp(rate: f64, years: f64) -> impl Fn(f64, OptionType) -> f64 {
    move |strike, kind| {
        let moneyness = (strike - SPOT) / SPOT;
        let far_otm = match kind {
            OptionType::Call => moneyness > 0.02,
            OptionType::Put => moneyness < -0.02,
        };
        if far_otm && (strike / DEFAULT_STRIKE_GAP) as i64 % 4 == 0 {
            return 0.0;
        }
        let vol = 0.125 + 0.8 * moneyness * moneyness - 0.05 * moneyness;
        let params = ContractParams::new(SPOT, strike, years, rate, kind);
        BlackScholes::price(&params.with_volatility(vol))
            .map(|price| (price * 20.0).round() / 20.0)
            .unwrap_or(0.0)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            info!("Loading engine configuration from {}", path);
            EngineConfig::from_path(path)?
        }
        None => EngineConfig::default(),
    };
    let output = args.next();

    info!(
        "Risk-free rate {:.2}%, fallback volatility {:?}",
        config.risk_free_rate * 100.0,
        config.fallback_volatility
    );

    let evaluator = ChainEvaluator::new(config)?;
    let reference = Utc::now();
    let expiry = reference + Duration::days(7);
    let years = evaluator.years_to_expiry(&expiry, &reference);

    let atm = atm_strike(SPOT, DEFAULT_STRIKE_GAP)?;
    let strikes = strike_range(atm, DEFAULT_STRIKES_EACH_SIDE, DEFAULT_STRIKE_GAP)?;
    let quotes = quotes_for_strikes(
        &strikes,
        synthetic_ltp(evaluator.config().risk_free_rate, years),
    );
    info!("Spot {} ATM {} with {} quotes", SPOT, atm, quotes.len());

    let rows = evaluator.evaluate_chain(&ChainRequest {
        spot: SPOT,
        expiry,
        reference,
        quotes,
    });

    for row in &rows {
        let iv = row
            .iv_percent
            .map_or_else(|| "-".to_string(), |iv| format!("{iv:.2}%"));
        match row.status {
            RowStatus::Rejected => warn!(
                "{:>8} {} rejected: {}",
                row.strike,
                row.option_type,
                row.rejection.as_deref().unwrap_or("unknown")
            ),
            _ => info!(
                "{:>8} {} ltp {:>9.2} iv {:>7} delta {:>7.4} gamma {:.6} vega {:>8.2} theta {:>8.2} {:?}",
                row.strike,
                row.option_type,
                row.last_traded_price,
                iv,
                row.greeks.delta,
                row.greeks.gamma,
                row.greeks.vega,
                row.greeks.theta,
                row.status
            ),
        }
    }

    let summary = ChainSummary::from_rows(&rows);
    info!(
        "Solved {} fallback {} zeroed {} rejected {}",
        summary.solved, summary.fallback, summary.zeroed, summary.rejected
    );

    if let Some(path) = output {
        fs::write(&path, serde_json::to_string_pretty(&rows)?)?;
        info!("Wrote {} rows to {}", rows.len(), path);
    }

    Ok(())
}
