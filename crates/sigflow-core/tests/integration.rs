//! Integration tests for sigflow-core.
//!
//! Exercises the processing system end-to-end: the reference FIR/IIR/summator
//! scenarios, streaming a noisy signal through a smoothing chain, failure
//! atomicity of graph mutations, and the evaluation policies on shared
//! ancestors.

use sigflow_core::{
    Block, BlockError, EvalPolicy, FirFilter, GraphError, IirFilter, ProcessingSystem, Signal,
    Summator,
};

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn system_with(blocks: Vec<Box<dyn Block + Send>>) -> ProcessingSystem {
    let mut system = ProcessingSystem::new();
    for block in blocks {
        system.add_block(block).unwrap();
    }
    system
}

// ============================================================================
// 1. Reference scenarios
// ============================================================================

#[test]
fn fir_moving_average_then_reset() {
    let mut system = system_with(vec![Box::new(FirFilter::new("F", vec![0.5, 0.5]).unwrap())]);

    assert_eq!(system.compute_block("F", 10.0).unwrap(), 5.0);
    assert_eq!(system.compute_block("F", 10.0).unwrap(), 10.0);
    system.reset_all();
    assert_eq!(system.compute_block("F", 10.0).unwrap(), 5.0);
}

#[test]
fn iir_first_two_outputs() {
    let mut system = system_with(vec![Box::new(
        IirFilter::new("I", vec![0.2], vec![0.8]).unwrap(),
    )]);

    assert!(approx_eq(system.compute_block("I", 1.0).unwrap(), 0.2));
    assert!(approx_eq(system.compute_block("I", 0.0).unwrap(), 0.16));
}

#[test]
fn summator_direct() {
    let mut sum = Summator::new("S", 2.0, 3.0);
    assert_eq!(sum.process(&[1.0, 2.0]).unwrap(), 8.0);
}

// ============================================================================
// 2. Streaming
// ============================================================================

#[test]
fn smoothing_reduces_noise_energy() {
    // Alternating +-1 riding on a slow ramp; a 4-tap average cancels the
    // alternation once the history is full.
    let input: Vec<f64> = (0..64)
        .map(|i| i as f64 * 0.01 + if i % 2 == 0 { 1.0 } else { -1.0 })
        .collect();

    let mut system = system_with(vec![Box::new(
        FirFilter::new("avg", vec![0.25; 4]).unwrap(),
    )]);
    let output = system.process_signal("avg", &input).unwrap();

    for (i, &y) in output.iter().enumerate().skip(3) {
        // Mean of the last four ramp values.
        let expected = (i as f64 - 1.5) * 0.01;
        assert!(approx_eq(y, expected), "sample {i}: {y} != {expected}");
    }
}

#[test]
fn stream_then_reset_repeats_exactly() {
    let mut system = system_with(vec![
        Box::new(FirFilter::new("pre", vec![0.5, 0.3, 0.2]).unwrap()),
        Box::new(IirFilter::new("post", vec![1.0], vec![0.5]).unwrap()),
    ]);
    system.connect("post", &["pre"]).unwrap();

    let input = [1.0, -2.0, 0.5, 3.0, 0.0, 0.0];
    let first = system.process_signal("post", &input).unwrap();
    system.reset_all();
    let second = system.process_signal("post", &input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn signal_combines_before_streaming() {
    let tone = Signal::from(vec![1.0, 0.0, -1.0, 0.0]);
    let offset = Signal::from(vec![0.5; 2]);
    let combined = (&tone * 2.0 + offset).concat(&Signal::zeros(2));
    assert_eq!(combined.as_slice(), &[2.5, 0.5, -2.0, 0.0, 0.0, 0.0]);

    let mut system = system_with(vec![Box::new(FirFilter::new("g", vec![1.0]).unwrap())]);
    let out = system.process_signal("g", combined.as_slice()).unwrap();
    assert_eq!(out, combined.as_slice());
}

// ============================================================================
// 3. Failure atomicity
// ============================================================================

#[test]
fn failed_connect_keeps_previous_wiring() {
    let mut system = system_with(vec![
        Box::new(FirFilter::new("A", vec![1.0]).unwrap()),
        Box::new(FirFilter::new("B", vec![2.0]).unwrap()),
        Box::new(Summator::new("S", 1.0, 1.0)),
    ]);
    system.connect("S", &["A", "B"]).unwrap();

    assert!(matches!(
        system.connect("S", &["A", "GhostBlock"]),
        Err(GraphError::SourceNotFound { .. })
    ));
    assert!(matches!(
        system.connect("S", &["S", "A"]),
        Err(GraphError::CycleDetected { .. })
    ));
    assert_eq!(system.sources("S"), Some(vec!["A", "B"]));
    assert_eq!(system.compute_block("S", 1.0).unwrap(), 3.0);
}

#[test]
fn arity_error_propagates_through_graph() {
    let mut system = system_with(vec![
        Box::new(FirFilter::new("A", vec![1.0]).unwrap()),
        Box::new(FirFilter::new("B", vec![1.0]).unwrap()),
        Box::new(FirFilter::new("F", vec![1.0]).unwrap()),
    ]);
    // A single-input filter wired to two sources.
    system.connect("F", &["A", "B"]).unwrap();

    let err = system.compute_block("F", 1.0).unwrap_err();
    assert_eq!(
        err,
        GraphError::Block(BlockError::Arity {
            block: "F".to_string(),
            expected: 1,
            got: 2,
        })
    );
    assert_eq!(err.to_string(), "block 'F' expects 1 input(s), got 2");
}

#[test]
fn process_signal_stops_at_first_error() {
    let mut system = system_with(vec![Box::new(Summator::new("S", 1.0, 1.0))]);
    let mut out = [7.0; 3];
    assert!(
        system
            .process_signal_into("S", &[1.0, 2.0, 3.0], &mut out)
            .is_err()
    );
    assert_eq!(out, [7.0; 3]);
}

// ============================================================================
// 4. Evaluation policies
// ============================================================================

fn shared_ancestor(policy: EvalPolicy) -> ProcessingSystem {
    // "src" (stateful) feeds both inputs of "mix".
    let mut system = ProcessingSystem::with_policy(policy);
    system
        .add_block(Box::new(FirFilter::new("src", vec![0.0, 1.0]).unwrap()))
        .unwrap();
    system
        .add_block(Box::new(Summator::new("mix", 1.0, 1.0)))
        .unwrap();
    system.connect("mix", &["src", "src"]).unwrap();
    system
}

#[test]
fn per_path_policy_advances_each_reference() {
    let mut system = shared_ancestor(EvalPolicy::PerPath);
    // src is a one-sample delay; the second reference sees the first.
    assert_eq!(system.compute_block("mix", 4.0).unwrap(), 4.0);
}

#[test]
fn once_per_sample_policy_reuses_output() {
    let mut system = shared_ancestor(EvalPolicy::OncePerSample);
    assert_eq!(system.compute_block("mix", 4.0).unwrap(), 0.0);
    assert_eq!(system.compute_block("mix", 1.0).unwrap(), 8.0);
}

#[test]
fn compute_all_reports_every_block() {
    let mut system = shared_ancestor(EvalPolicy::OncePerSample);
    let results = system.compute_all(4.0).unwrap();
    assert_eq!(results.keys().collect::<Vec<_>>(), vec!["mix", "src"]);
    assert_eq!(results["src"], 0.0);
    assert_eq!(results["mix"], 0.0);
}
