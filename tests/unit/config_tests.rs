use ivgreeks_rs::config::{DEFAULT_FALLBACK_VOLATILITY, DEFAULT_RISK_FREE_RATE};
use ivgreeks_rs::prelude::*;
use std::fs;

#[test]
fn config_file_round_trip() {
    let config = EngineConfig::default()
        .with_rate_preset(RatePreset::RbiTBill)
        .with_solver(SolverConfig::default().with_tolerance(1e-7));

    let path = std::env::temp_dir().join(format!("ivgreeks-config-{}.json", std::process::id()));
    fs::write(&path, config.to_json().unwrap()).unwrap();
    let loaded = EngineConfig::from_path(&path);
    fs::remove_file(&path).unwrap();

    let loaded = loaded.unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.risk_free_rate, 0.0543);
    assert_eq!(loaded.solver.tolerance, 1e-7);
}

#[test]
fn partial_config_uses_defaults() {
    let config = EngineConfig::from_json_str(r#"{ "risk_free_rate": 0.065 }"#).unwrap();
    assert_eq!(config.risk_free_rate, 0.065);
    assert_eq!(config.fallback_volatility, Some(DEFAULT_FALLBACK_VOLATILITY));
    assert_eq!(config.solver, SolverConfig::default());
    assert_eq!(EngineConfig::default().risk_free_rate, DEFAULT_RISK_FREE_RATE);
}

#[test]
fn rate_setting_flows_into_greeks() {
    let quote = ContractQuote::new(19500.0, OptionType::Call, 150.0);
    let years = 7.0 / 365.0;

    let nse = ChainEvaluator::new(EngineConfig::default()).unwrap();
    let custom =
        ChainEvaluator::new(EngineConfig::default().with_rate_preset(RatePreset::Custom)).unwrap();

    let a = nse.evaluate_contract(19500.0, years, &quote);
    let b = custom.evaluate_contract(19500.0, years, &quote);
    assert_eq!(a.status, RowStatus::Solved);
    assert_eq!(b.status, RowStatus::Solved);
    // A lower rate needs more volatility to reach the same premium.
    assert!(b.iv_percent.unwrap() > a.iv_percent.unwrap());
}

#[test]
fn invalid_engine_settings_are_rejected_up_front() {
    assert!(ChainEvaluator::new(EngineConfig::default().with_risk_free_rate(f64::NAN)).is_err());
    assert!(
        ChainEvaluator::new(
            EngineConfig::default().with_solver(SolverConfig::default().with_time_floor(0.0))
        )
        .is_err()
    );
}
