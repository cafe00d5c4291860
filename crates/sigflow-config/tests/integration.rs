//! Integration tests for sigflow-config.
//!
//! These tests load graph files from disk and run the systems they describe.

use std::fs;

use sigflow_config::{ConfigError, GraphConfig, ValidationError};
use sigflow_core::EvalPolicy;
use tempfile::TempDir;

const SMOOTHER: &str = r#"
name = "smoother"
description = "moving average into a leaky integrator"
policy = "per-path"

[[blocks]]
type = "fir"
name = "avg"
coefficients = [0.2, 0.2, 0.2, 0.2, 0.2]

[[blocks]]
type = "iir"
name = "leak"
b = [0.5]
a = [0.5]

[[connections]]
target = "leak"
sources = ["avg"]
"#;

fn write_graph(dir: &TempDir, file: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(file);
    fs::write(&path, content).expect("write graph file");
    path
}

/// Load a file, build it and stream a constant through the chain.
#[test]
fn test_load_build_and_stream() {
    let dir = TempDir::new().unwrap();
    let path = write_graph(&dir, "smoother.toml", SMOOTHER);

    let config = GraphConfig::load(&path).expect("should load graph");
    assert_eq!(config.name, "smoother");
    assert_eq!(
        config.description.as_deref(),
        Some("moving average into a leaky integrator")
    );

    let mut system = config.build().expect("should build graph");
    assert_eq!(system.block_names().collect::<Vec<_>>(), vec!["avg", "leak"]);
    assert_eq!(system.sources("leak"), Some(vec!["avg"]));

    let output = system.process_signal("leak", &[1.0; 200]).unwrap();
    // Both stages have unity DC gain.
    let last = *output.last().unwrap();
    assert!((last - 1.0).abs() < 1e-9, "settled at {last}");
    assert!(output.iter().all(|y| y.is_finite()));
}

/// The same file builds independent systems.
#[test]
fn test_build_twice_is_independent() {
    let config = GraphConfig::from_toml_str(SMOOTHER).unwrap();
    let mut a = config.build().unwrap();
    let mut b = config.build().unwrap();

    a.process_signal("leak", &[1.0; 10]).unwrap();
    let fresh = b.compute_block("leak", 1.0).unwrap();
    // 0.5 * (0.2 * 1.0)
    assert!((fresh - 0.1).abs() < 1e-12);
}

#[test]
fn test_once_per_sample_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_graph(
        &dir,
        "shared.toml",
        r#"
policy = "once-per-sample"

[[blocks]]
type = "fir"
name = "delay"
coefficients = [0.0, 1.0]

[[blocks]]
type = "summator"
name = "mix"
u = 1.0
v = 1.0

[[connections]]
target = "mix"
sources = ["delay", "delay"]
"#,
    );

    let mut system = GraphConfig::load(&path).unwrap().build().unwrap();
    assert_eq!(system.policy(), EvalPolicy::OncePerSample);
    assert_eq!(system.compute_block("mix", 3.0).unwrap(), 0.0);
    assert_eq!(system.compute_block("mix", 0.0).unwrap(), 6.0);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let err = GraphConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_malformed_toml() {
    let dir = TempDir::new().unwrap();
    let path = write_graph(&dir, "bad.toml", "[[blocks]\ntype = ");
    assert!(matches!(
        GraphConfig::load(&path),
        Err(ConfigError::TomlParse(_))
    ));
}

/// Validation problems stop the build before any block is registered.
#[test]
fn test_invalid_graph_does_not_build() {
    let config = GraphConfig::from_toml_str(
        r#"
[[blocks]]
type = "summator"
name = "S"
u = 1.0
v = 1.0
"#,
    )
    .unwrap();

    let err = config.build().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Validation(ValidationError::FanIn { expected: 2, got: 0, .. })
    ));
}
