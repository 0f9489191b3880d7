//! End-to-end pricing scenarios on index options.

use approx::assert_relative_eq;
use ivgreeks_rs::pricing::MINUTE_FLOOR;
use ivgreeks_rs::prelude::*;

const SPOT: f64 = 19500.0;

fn weekly_call() -> ContractParams {
    ContractParams::call(SPOT, SPOT, 7.0 / 365.0, 0.065)
}

#[test]
fn weekly_atm_call_round_trip() {
    let params = weekly_call();
    let price = BlackScholes::price(&params.with_volatility(0.12)).unwrap();
    assert_relative_eq!(price, 141.707, epsilon = 0.01);

    let estimate = ImpliedVolatilitySolver::new(SolverConfig::default())
        .unwrap()
        .solve(&MarketObservation::new(price), &params)
        .unwrap();
    assert!(estimate.converged);
    assert_eq!(estimate.status, EstimateStatus::Converged);
    assert!(estimate.iterations <= 10);
    assert_relative_eq!(estimate.value, 0.12, epsilon = 1e-4);

    let greeks = GreeksEngine::greeks(&params.with_volatility(estimate.value)).unwrap();
    assert_relative_eq!(greeks.delta, 0.5332, epsilon = 1e-3);
    assert!(greeks.gamma > 0.0);
    assert!(greeks.vega > 0.0);
    assert!(greeks.theta < 0.0);
}

#[test]
fn theta_is_per_calendar_day() {
    let inputs = weekly_call().with_volatility(0.12);
    let today = BlackScholes::price(&inputs).unwrap();
    let tomorrow = BlackScholes::price(&PricingInputs {
        years_to_expiry: 6.0 / 365.0,
        ..inputs
    })
    .unwrap();
    let theta = GreeksEngine::theta(&inputs).unwrap();
    // One day of decay against the instantaneous daily rate.
    assert_relative_eq!(theta, tomorrow - today, max_relative = 0.15);
}

#[test]
fn untraded_contract_uses_fallback_volatility() {
    let evaluator = ChainEvaluator::new(EngineConfig::default()).unwrap();
    let row = evaluator.evaluate_contract(
        SPOT,
        7.0 / 365.0,
        &ContractQuote::new(20000.0, OptionType::Call, 0.0),
    );
    assert_eq!(row.status, RowStatus::Fallback);
    assert_eq!(row.iv_percent, None);
    assert_eq!(row.volatility_used, Some(0.15));
    assert_eq!(
        row.estimate.map(|e| e.status),
        Some(EstimateStatus::NoMarketPrice)
    );

    let expected = GreeksEngine::greeks(
        &ContractParams::call(SPOT, 20000.0, 7.0 / 365.0, 0.10).with_volatility(0.15),
    )
    .unwrap();
    assert_eq!(row.greeks, expected);
}

#[test]
fn expiry_day_greeks_stay_finite() {
    let basis = TimeBasis::new();
    let now = chrono::Utc::now();
    let years = basis.year_fraction(&now, &now);
    assert_eq!(years, MINUTE_FLOOR);
    assert!(basis.is_at_floor(years));

    let params = ContractParams::put(SPOT, 19550.0, years, 0.10);
    let estimate = solve_iv(&MarketObservation::new(50.0), &params, &SolverConfig::default()).unwrap();
    assert_eq!(estimate.status, EstimateStatus::AtExpiry);
    assert!(!estimate.converged);

    let greeks = GreeksEngine::greeks(&params.with_volatility(0.15)).unwrap();
    assert!(greeks.is_finite());
}

#[test]
fn price_below_intrinsic_is_not_converged() {
    let params = ContractParams::call(SPOT, 19000.0, 7.0 / 365.0, 0.10);
    let estimate = solve_iv(&MarketObservation::new(100.0), &params, &SolverConfig::default()).unwrap();
    assert!(!estimate.converged);
    assert_eq!(estimate.status, EstimateStatus::NumericalNonConvergence);
    assert_eq!(estimate.value, 0.001);
}

#[test]
fn price_above_spot_is_not_converged() {
    let params = weekly_call();
    let estimate = solve_iv(
        &MarketObservation::new(SPOT * 1.5),
        &params,
        &SolverConfig::default(),
    )
    .unwrap();
    assert!(!estimate.converged);
    assert_eq!(estimate.status, EstimateStatus::NumericalNonConvergence);
    assert_eq!(estimate.value, 5.0);
}

#[test]
fn invalid_contracts_are_rejected() {
    let config = SolverConfig::default();
    let cases = [
        ContractParams::call(0.0, SPOT, 0.1, 0.05),
        ContractParams::call(SPOT, -1.0, 0.1, 0.05),
        ContractParams::call(SPOT, SPOT, 0.0, 0.05),
        ContractParams::call(SPOT, SPOT, 0.1, f64::NAN),
    ];
    for params in cases {
        let err = solve_iv(&MarketObservation::new(100.0), &params, &config).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput { .. }), "{err}");
    }
    assert!(solve_iv(&MarketObservation::new(-1.0), &weekly_call(), &config).is_err());
    assert!(solve_iv(&MarketObservation::new(f64::NAN), &weekly_call(), &config).is_err());
}

#[test]
fn put_call_parity_on_index() {
    let call = weekly_call().with_volatility(0.14);
    let put = PricingInputs {
        option_type: OptionType::Put,
        ..call
    };
    let lhs = BlackScholes::price(&call).unwrap() - BlackScholes::price(&put).unwrap();
    let rhs = SPOT - SPOT * (-0.065f64 * 7.0 / 365.0).exp();
    assert_relative_eq!(lhs, rhs, epsilon = 1e-6);
}
