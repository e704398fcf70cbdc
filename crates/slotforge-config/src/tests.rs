//! Tests for scheduler configuration.

use super::*;

#[test]
fn test_defaults() {
    let config = SchedulerConfig::default();
    assert_eq!(config.max_cycles, 160);
    assert_eq!(config.verbosity, 1);
    assert_eq!(config.adjacency_gap(), TimeDelta::minutes(30));
    assert_eq!(config.random_seed, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_toml_parsing() {
    let toml = r#"
        max_cycles = 40
        verbosity = 3
        adjacency_gap_minutes = 10
        random_seed = 42
    "#;

    let config = SchedulerConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.max_cycles, 40);
    assert_eq!(config.verbosity, 3);
    assert_eq!(config.adjacency_gap(), TimeDelta::minutes(10));
    assert_eq!(config.random_seed, Some(42));
}

#[test]
fn test_toml_partial_uses_defaults() {
    let config = SchedulerConfig::from_toml_str("verbosity = 0").unwrap();
    assert_eq!(config.verbosity, 0);
    assert_eq!(config.max_cycles, DEFAULT_MAX_CYCLES);
    assert_eq!(config.adjacency_gap_minutes, DEFAULT_ADJACENCY_GAP_MINUTES);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        max_cycles: 12
        random_seed: 7
    "#;

    let config = SchedulerConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.max_cycles, 12);
    assert_eq!(config.random_seed, Some(7));
    assert_eq!(config.verbosity, 1);
}

#[test]
fn test_zero_max_cycles_rejected() {
    let err = SchedulerConfig::from_toml_str("max_cycles = 0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_negative_gap_rejected() {
    let err = SchedulerConfig::from_yaml_str("adjacency_gap_minutes: -5").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_missing_file() {
    let err = SchedulerConfig::load("does/not/exist.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_builder() {
    let config = SchedulerConfig::new()
        .with_max_cycles(5)
        .with_verbosity(2)
        .with_adjacency_gap_minutes(45)
        .with_random_seed(123);

    assert_eq!(config.max_cycles, 5);
    assert_eq!(config.verbosity, 2);
    assert_eq!(config.adjacency_gap(), TimeDelta::minutes(45));
    assert_eq!(config.random_seed, Some(123));
}

#[test]
fn test_oversized_gap_rejected() {
    let err = SchedulerConfig::from_toml_str("adjacency_gap_minutes = 9223372036854775807")
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    // built in code without validation
    let config = SchedulerConfig::new().with_adjacency_gap_minutes(i64::MAX);
    assert!(config.validate().is_err());
    assert_eq!(config.adjacency_gap(), TimeDelta::MAX);
}
