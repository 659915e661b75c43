use crate::evaluation::domain::Decision;
use crate::evaluation::ratio::{ratio_decision, EFFECT_EPS};

#[test]
fn computes_ratio_and_accepts_below_threshold() {
    let outcome = ratio_decision(2000.0, 0.1, 37446.0);
    assert!((outcome.icer - 20000.0).abs() < 1e-9);
    assert_eq!(outcome.decision, Decision::Accept);
}

#[test]
fn rejects_above_threshold() {
    let outcome = ratio_decision(10000.0, 0.05, 37446.0);
    assert!((outcome.icer - 200000.0).abs() < 1e-6);
    assert_eq!(outcome.decision, Decision::Reject);
}

#[test]
fn threshold_boundary_is_inclusive() {
    let outcome = ratio_decision(37446.0, 1.0, 37446.0);
    assert_eq!(outcome.icer, 37446.0);
    assert_eq!(outcome.decision, Decision::Accept);
}

#[test]
fn near_zero_effect_delta_with_extra_cost_is_infinite_reject() {
    let outcome = ratio_decision(500.0, EFFECT_EPS / 2.0, 37446.0);
    assert_eq!(outcome.icer, f64::INFINITY);
    assert_eq!(outcome.decision, Decision::Reject);
}

#[test]
fn near_zero_effect_delta_with_savings_is_negative_infinite_accept() {
    let outcome = ratio_decision(-500.0, -EFFECT_EPS / 2.0, 37446.0);
    assert_eq!(outcome.icer, f64::NEG_INFINITY);
    assert_eq!(outcome.decision, Decision::Accept);
}

#[test]
fn near_zero_deltas_on_both_axes_are_inconclusive() {
    let outcome = ratio_decision(0.0, 0.0, 37446.0);
    assert_eq!(outcome.icer, 0.0);
    assert_eq!(outcome.decision, Decision::Inconclusive);
}

#[test]
fn effect_loss_with_extra_cost_is_rejected() {
    let outcome = ratio_decision(2000.0, -0.05, 37446.0);
    assert!(outcome.icer < 0.0);
    assert_eq!(outcome.decision, Decision::Reject);
}

#[test]
fn effect_loss_with_savings_is_inconclusive() {
    // A cost-saving but effect-losing arm cannot be resolved by comparing
    // the (negative) ratio against a positive threshold.
    let outcome = ratio_decision(-8000.0, -0.2, 37446.0);
    assert!((outcome.icer - 40000.0).abs() < 1e-9);
    assert_eq!(outcome.decision, Decision::Inconclusive);
}
