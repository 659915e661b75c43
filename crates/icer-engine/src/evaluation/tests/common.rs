use std::collections::BTreeMap;

use crate::evaluation::domain::{
    Arm, EvaluateRequest, Threshold, ThresholdSource, ThresholdUnit, UncertaintyParams,
};
use crate::evaluation::service::EvaluationService;
use crate::evaluation::uncertainty::UncertaintyEngine;
use crate::policy::{CohortPolicy, InMemoryPolicySource, Policy};

pub(super) fn policy() -> Policy {
    let mut cohorts = BTreeMap::new();
    cohorts.insert("default".to_string(), CohortPolicy { threshold: 37446.0 });
    cohorts.insert("elderly".to_string(), CohortPolicy { threshold: 36000.0 });
    cohorts.insert(
        "low_income".to_string(),
        CohortPolicy { threshold: 40000.0 },
    );

    Policy {
        version: "2025-08".to_string(),
        threshold: 37446.0,
        cohorts,
        updated_at: "2025-08-16T11:38:00Z".to_string(),
        notes: "test thresholds".to_string(),
    }
}

pub(super) fn arm(cost: f64, effect: f64) -> Arm {
    Arm {
        cost,
        effect,
        effect_unit: Default::default(),
    }
}

pub(super) fn request(comparator: Arm, intervention: Arm) -> EvaluateRequest {
    EvaluateRequest {
        comparator,
        intervention,
        perspective: Default::default(),
        cohort: None,
        threshold: None,
        discount: None,
        uncertainty: None,
        equity_weights: None,
    }
}

pub(super) fn explicit_threshold(value: f64) -> Threshold {
    Threshold {
        value,
        unit: ThresholdUnit::CnyPerQaly,
        source: ThresholdSource::Config,
    }
}

pub(super) fn uncertainty(samples: u32, se: f64) -> UncertaintyParams {
    UncertaintyParams {
        se_cost_0: Some(se),
        se_cost_1: Some(se),
        se_eff_0: Some(se / 100000.0),
        se_eff_1: Some(se / 100000.0),
        corr: None,
        samples,
    }
}

pub(super) fn seeded_service() -> EvaluationService<InMemoryPolicySource> {
    EvaluationService::with_sampler(
        InMemoryPolicySource::new(policy()),
        UncertaintyEngine::with_seed(42),
    )
}
