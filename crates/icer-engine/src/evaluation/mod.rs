//! Cost-effectiveness evaluation: dominance classification, ICER and net
//! benefit computation, probabilistic sensitivity analysis, and the HTTP
//! surface exposing them.

pub(crate) mod benefit;
pub mod domain;
pub(crate) mod dominance;
pub(crate) mod ratio;
pub mod router;
pub mod service;
pub mod uncertainty;

#[cfg(test)]
mod tests;

pub use domain::{
    Arm, Decision, DiscountInputs, Dominance, EffectUnit, EvaluateRequest, EvaluationResult,
    Perspective, Threshold, ThresholdSource, ThresholdUnit, UncertaintyParams, ValidationError,
};
pub use router::evaluation_router;
pub use service::{EvaluationService, EvaluationServiceError};
pub use uncertainty::UncertaintyEngine;

use std::collections::BTreeMap;

use chrono::Utc;

use crate::policy::Policy;
use dominance::DominanceCall;

/// Caveat stamped on every result: discount-rate inputs are recorded but no
/// multi-period discounting is applied to the cost/effect figures.
const DISCOUNTING_NOTE: &str =
    "time discounting recorded but not applied; discount annual cost/effect streams upstream";

/// Stateless orchestrator applying a policy and request to produce one
/// immutable result. Pure apart from the injected Monte Carlo sampler.
pub struct EvaluationEngine;

impl EvaluationEngine {
    /// Assumes the request has already passed [`EvaluateRequest::validate`].
    /// The sampler is consulted only when the request asks for a sampling run
    /// (`uncertainty.samples > 0`); callers may pass `None` otherwise.
    pub fn evaluate(
        policy: &Policy,
        request: &EvaluateRequest,
        sampler: Option<&mut UncertaintyEngine>,
    ) -> EvaluationResult {
        // Explicit request threshold wins over the policy default/cohort value.
        let (threshold_value, threshold_unit) = match &request.threshold {
            Some(threshold) => (threshold.value, threshold.unit),
            None => (
                policy.threshold_for(request.cohort.as_deref()),
                ThresholdUnit::default(),
            ),
        };

        let delta_cost = request.intervention.cost - request.comparator.cost;
        let delta_effect = request.intervention.effect - request.comparator.effect;

        let (dominance_kind, decision, icer_value) =
            match dominance::classify(delta_cost, delta_effect) {
                DominanceCall::SimpleAccept => (Dominance::Simple, Decision::Accept, None),
                DominanceCall::SimpleReject => (Dominance::Simple, Decision::Reject, None),
                DominanceCall::None => {
                    let outcome = ratio::ratio_decision(delta_cost, delta_effect, threshold_value);
                    (Dominance::None, outcome.decision, Some(outcome.icer))
                }
            };

        let net_benefit = benefit::net_monetary_benefit(threshold_value, delta_effect, delta_cost);

        let ceac_prob_accept = request
            .uncertainty
            .as_ref()
            .filter(|params| params.samples > 0)
            .zip(sampler)
            .map(|(params, sampler)| {
                sampler.ceac_probability(
                    &request.comparator,
                    &request.intervention,
                    params,
                    threshold_value,
                )
            });

        let mut assumptions = BTreeMap::new();
        assumptions.insert(
            "perspective".to_string(),
            request.perspective.label().to_string(),
        );
        assumptions.insert(
            "threshold_unit".to_string(),
            threshold_unit.label().to_string(),
        );
        assumptions.insert(
            "effect_unit".to_string(),
            request.intervention.effect_unit.label().to_string(),
        );
        assumptions.insert("note".to_string(), DISCOUNTING_NOTE.to_string());

        if let Some(discount) = &request.discount {
            assumptions.insert(
                "cost_discount_rate".to_string(),
                discount.cost_rate.to_string(),
            );
            assumptions.insert(
                "effect_discount_rate".to_string(),
                discount.effect_rate.to_string(),
            );
        }

        if request.equity_weights.is_some() {
            assumptions.insert(
                "equity_weights".to_string(),
                "recorded, not applied".to_string(),
            );
        }

        EvaluationResult {
            icer_value,
            icer_unit: icer_value.map(|_| threshold_unit),
            dominance: dominance_kind,
            decision,
            net_benefit,
            ceac_prob_accept,
            policy_version: policy.version.clone(),
            threshold_used: threshold_value,
            assumptions,
            evaluated_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }
    }
}
