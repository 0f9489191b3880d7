//! Compares ATM Greeks under the reference risk-free rate presets.
//!
//! Usage: `rate_comparison [spot] [days_to_expiry] [volatility]`

use ivgreeks_rs::chain::DEFAULT_STRIKE_GAP;
use ivgreeks_rs::pricing::DAYS_PER_YEAR;
use ivgreeks_rs::prelude::*;
use std::env;
use tracing::info;

fn arg_or(args: &[String], index: usize, default: f64) -> Result<f64, std::num::ParseFloatError> {
    args.get(index).map_or(Ok(default), |s| s.parse())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let spot = arg_or(&args, 0, 19500.0)?;
    let days = arg_or(&args, 1, 7.0)?;
    let volatility = arg_or(&args, 2, 0.12)?;

    let strike = atm_strike(spot, DEFAULT_STRIKE_GAP)?;
    let years = days / DAYS_PER_YEAR;
    info!(
        "Spot {} strike {} expiry {} days volatility {:.1}%",
        spot,
        strike,
        days,
        volatility * 100.0
    );

    for option_type in [OptionType::Call, OptionType::Put] {
        let contract = ContractParams::new(spot, strike, years, 0.0, option_type);
        let rows = compare_rates(&contract, volatility, &RateScenario::presets())?;

        info!("{} {}", strike, option_type);
        for row in &rows {
            info!(
                "{:<20} delta {:>8.4} ({:+.2}%) gamma {:.6} ({:+.2}%) vega {:>8.2} ({:+.2}%) theta {:>8.2} ({:+.2}%)",
                row.scenario.label,
                row.greeks.delta,
                row.difference_pct.delta,
                row.greeks.gamma,
                row.difference_pct.gamma,
                row.greeks.vega,
                row.difference_pct.vega,
                row.greeks.theta,
                row.difference_pct.theta
            );
        }
    }

    Ok(())
}
