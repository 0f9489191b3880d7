//! Whole-chain evaluation.

use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use ivgreeks_rs::chain::{DEFAULT_STRIKE_GAP, DEFAULT_STRIKES_EACH_SIDE};
use ivgreeks_rs::prelude::*;

const SPOT: f64 = 19512.35;
const SMILE_VOL: f64 = 0.13;

fn synthetic_ltp(rate: f64, years: f64) -> impl Fn(f64, OptionType) -> f64 {
    move |strike, kind| {
        let vol = SMILE_VOL + 0.5 * ((strike - SPOT) / SPOT).powi(2);
        let params = ContractParams::new(SPOT, strike, years, rate, kind);
        BlackScholes::price(&params.with_volatility(vol)).unwrap_or(0.0)
    }
}

fn weekly_request(config: &EngineConfig) -> ChainRequest {
    let reference = Utc.with_ymd_and_hms(2026, 10, 15, 4, 0, 0).unwrap();
    let expiry = reference + Duration::days(7);
    let years = 7.0 / 365.0;
    let atm = atm_strike(SPOT, DEFAULT_STRIKE_GAP).unwrap();
    let strikes = strike_range(atm, DEFAULT_STRIKES_EACH_SIDE, DEFAULT_STRIKE_GAP).unwrap();
    let mut quotes = quotes_for_strikes(&strikes, synthetic_ltp(config.risk_free_rate, years));
    // A strike that has not traded today on either side.
    for quote in quotes.iter_mut().filter(|q| q.strike == 20000.0) {
        quote.last_traded_price = 0.0;
    }
    ChainRequest {
        spot: SPOT,
        expiry,
        reference,
        quotes,
    }
}

#[test]
fn full_chain_recovers_the_smile() {
    let config = EngineConfig::default();
    let evaluator = ChainEvaluator::new(config.clone()).unwrap();
    let request = weekly_request(&config);
    let rows = evaluator.evaluate_chain(&request);

    assert_eq!(rows.len(), 42);
    for (row, quote) in rows.iter().zip(&request.quotes) {
        assert_eq!(row.strike, quote.strike);
        assert_eq!(row.option_type, quote.option_type);
        assert!(row.greeks.is_finite());
        assert_relative_eq!(row.years_to_expiry, 7.0 / 365.0, epsilon = 1e-12);
    }

    let summary = ChainSummary::from_rows(&rows);
    assert_eq!(summary.total(), 42);
    assert_eq!(summary.fallback, 2);
    assert_eq!(summary.rejected, 0);
    assert_eq!(summary.zeroed, 0);

    let atm_call = rows
        .iter()
        .find(|r| r.strike == 19500.0 && r.option_type == OptionType::Call)
        .unwrap();
    assert_eq!(atm_call.status, RowStatus::Solved);
    let expected = SMILE_VOL + 0.5 * ((19500.0 - SPOT) / SPOT).powi(2);
    assert_relative_eq!(atm_call.iv_percent.unwrap(), expected * 100.0, epsilon = 0.01);
}

#[test]
fn call_deltas_decrease_with_strike() {
    let config = EngineConfig::default();
    let evaluator = ChainEvaluator::new(config.clone()).unwrap();
    let rows = evaluator.evaluate_chain(&weekly_request(&config));

    let call_deltas: Vec<f64> = rows
        .iter()
        .filter(|r| r.option_type == OptionType::Call && r.status == RowStatus::Solved)
        .map(|r| r.greeks.delta)
        .collect();
    assert!(call_deltas.len() >= 19);
    assert!(call_deltas.windows(2).all(|w| w[0] > w[1]));

    for row in rows.iter().filter(|r| r.option_type == OptionType::Put) {
        assert!(row.greeks.delta <= 0.0);
    }
}

#[test]
fn chain_is_repeatable() {
    let config = EngineConfig::default();
    let evaluator = ChainEvaluator::new(config.clone()).unwrap();
    let request = weekly_request(&config);
    assert_eq!(evaluator.evaluate_chain(&request), evaluator.evaluate_chain(&request));
}

#[test]
fn chain_without_fallback_zeroes_untraded_rows() {
    let config = EngineConfig::default().with_fallback_volatility(None);
    let evaluator = ChainEvaluator::new(config.clone()).unwrap();
    let rows = evaluator.evaluate_chain(&weekly_request(&config));

    let summary = ChainSummary::from_rows(&rows);
    assert_eq!(summary.zeroed, 2);
    assert_eq!(summary.fallback, 0);
    for row in rows.iter().filter(|r| r.status == RowStatus::Zeroed) {
        assert_eq!(row.greeks, GreeksResult::zeroed());
        assert_eq!(row.volatility_used, None);
    }
}

#[test]
fn expired_chain_keeps_every_row() {
    let config = EngineConfig::default();
    let evaluator = ChainEvaluator::new(config.clone()).unwrap();
    let mut request = weekly_request(&config);
    request.reference = request.expiry + Duration::hours(1);

    let rows = evaluator.evaluate_chain(&request);
    assert_eq!(rows.len(), 42);
    for row in &rows {
        assert!(row.iv_percent.is_none());
        let expected = if row.last_traded_price > 0.0 {
            EstimateStatus::AtExpiry
        } else {
            EstimateStatus::NoMarketPrice
        };
        assert_eq!(row.estimate.map(|e| e.status), Some(expected));
        assert_eq!(row.status, RowStatus::Fallback);
        assert!(row.greeks.is_finite());
    }
}

#[test]
fn expiry_date_uses_session_close() {
    let evaluator = ChainEvaluator::new(EngineConfig::default()).unwrap();
    // 04:00 UTC is 09:30 IST; the session closes at 15:30 IST.
    let reference = Utc.with_ymd_and_hms(2026, 10, 15, 4, 0, 0).unwrap();
    let expiry = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
    let rows = evaluator
        .evaluate_expiry_date(
            SPOT,
            expiry,
            reference,
            vec![ContractQuote::new(19500.0, OptionType::Put, 95.0)],
        )
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_relative_eq!(rows[0].years_to_expiry, 5.25 / 365.0, epsilon = 1e-12);
    assert_eq!(rows[0].status, RowStatus::Solved);
}

#[test]
fn rate_comparison_for_atm_call() {
    let params = ContractParams::call(19500.0, 19500.0, 7.0 / 365.0, 0.10);
    let rows = compare_rates(&params, 0.13, &RateScenario::presets()).unwrap();

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].difference_pct, GreeksResult::zeroed());
    let labels: Vec<&str> = rows.iter().map(|r| r.scenario.label.as_str()).collect();
    assert_eq!(
        labels,
        ["NSE (10%)", "Custom (6.5%)", "RBI T-Bill (5.43%)", "Conservative (5%)"]
    );

    // Higher rates make a call costlier to hold to expiry.
    let conservative = &rows[3];
    assert!(conservative.greeks.delta < rows[0].greeks.delta);
    assert!(conservative.greeks.theta > rows[0].greeks.theta);
    assert!(conservative.difference_pct.theta > 0.0);
}
