use std::sync::{Arc, Mutex};

use tracing::info;

use super::domain::{EvaluateRequest, EvaluationResult, ValidationError};
use super::uncertainty::UncertaintyEngine;
use super::EvaluationEngine;
use crate::policy::{Policy, PolicyError, PolicySource, PolicyStore};

/// Service composing the policy cache, the orchestrator, and the Monte Carlo
/// sampler behind the two logical operations of the engine.
pub struct EvaluationService<S> {
    store: PolicyStore<S>,
    sampler: Mutex<UncertaintyEngine>,
}

impl<S> EvaluationService<S>
where
    S: PolicySource + 'static,
{
    pub fn new(source: S) -> Self {
        Self::with_sampler(source, UncertaintyEngine::new())
    }

    /// Inject a seeded sampler for reproducible CEAC estimates.
    pub fn with_sampler(source: S, sampler: UncertaintyEngine) -> Self {
        Self {
            store: PolicyStore::new(source),
            sampler: Mutex::new(sampler),
        }
    }

    /// Active policy document, served from the read-through cache.
    pub fn policy(&self) -> Result<Arc<Policy>, EvaluationServiceError> {
        Ok(self.store.current()?)
    }

    /// Explicitly re-read the policy source and swap the cached document.
    pub fn reload_policy(&self) -> Result<Arc<Policy>, EvaluationServiceError> {
        let policy = self.store.reload()?;
        info!(version = %policy.version, "icer policy reloaded");
        Ok(policy)
    }

    /// Validate and evaluate one request. Either a complete result is
    /// produced or the request fails before any computation starts.
    pub fn evaluate(
        &self,
        request: &EvaluateRequest,
    ) -> Result<EvaluationResult, EvaluationServiceError> {
        request.validate()?;
        let policy = self.store.current()?;

        // Fork a per-request sampler so the shared lock is held only for the
        // seed draw, never across the trial loop. Requests without a sampling
        // run skip the lock entirely.
        let mut sampler = request
            .uncertainty
            .as_ref()
            .filter(|params| params.samples > 0)
            .map(|_| self.sampler.lock().expect("sampler mutex poisoned").fork());
        let result = EvaluationEngine::evaluate(&policy, request, sampler.as_mut());

        info!(
            dominance = ?result.dominance,
            decision = ?result.decision,
            threshold = result.threshold_used,
            "icer evaluation completed"
        );

        Ok(result)
    }
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::domain::{Arm, UncertaintyParams};
    use crate::policy::InMemoryPolicySource;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn service() -> EvaluationService<InMemoryPolicySource> {
        let policy = Policy {
            version: "2025-08".to_string(),
            threshold: 37446.0,
            cohorts: Default::default(),
            updated_at: "2025-08-16T11:38:00Z".to_string(),
            notes: String::new(),
        };
        EvaluationService::with_sampler(
            InMemoryPolicySource::new(policy),
            UncertaintyEngine::with_seed(42),
        )
    }

    fn request(uncertainty: Option<UncertaintyParams>) -> EvaluateRequest {
        EvaluateRequest {
            comparator: Arm {
                cost: 10000.0,
                effect: 1.0,
                effect_unit: Default::default(),
            },
            intervention: Arm {
                cost: 12000.0,
                effect: 1.1,
                effect_unit: Default::default(),
            },
            perspective: Default::default(),
            cohort: None,
            threshold: None,
            discount: None,
            uncertainty,
            equity_weights: None,
        }
    }

    fn poison_sampler(service: &EvaluationService<InMemoryPolicySource>) {
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = service.sampler.lock().expect("sampler lock");
            panic!("poison the sampler lock");
        }));
        assert!(result.is_err());
        assert!(service.sampler.is_poisoned());
    }

    #[test]
    fn unsampled_evaluation_never_takes_the_sampler_lock() {
        let service = service();
        poison_sampler(&service);

        let result = service
            .evaluate(&request(None))
            .expect("evaluation without a sampling run needs no sampler");
        assert!(result.ceac_prob_accept.is_none());

        let zero_samples = UncertaintyParams {
            se_cost_0: Some(500.0),
            samples: 0,
            ..Default::default()
        };
        let result = service
            .evaluate(&request(Some(zero_samples)))
            .expect("zero samples means no sampling run");
        assert!(result.ceac_prob_accept.is_none());
    }

    #[test]
    fn sampled_evaluation_acquires_the_sampler_lock() {
        let service = service();
        poison_sampler(&service);

        let sampled = UncertaintyParams {
            se_cost_0: Some(500.0),
            samples: 100,
            ..Default::default()
        };
        let outcome = catch_unwind(AssertUnwindSafe(|| service.evaluate(&request(Some(sampled)))));
        assert!(outcome.is_err(), "sampling run must go through the sampler");
    }

    #[test]
    fn trial_loop_runs_outside_the_shared_lock() {
        let service = service();

        let sampled = UncertaintyParams {
            se_cost_0: Some(500.0),
            se_cost_1: Some(500.0),
            samples: 1000,
            ..Default::default()
        };
        let result = service
            .evaluate(&request(Some(sampled)))
            .expect("sampled evaluation succeeds");
        assert!(result.ceac_prob_accept.is_some());

        // The shared sampler is only borrowed for the fork, so it is free
        // again by the time the result is produced.
        assert!(service.sampler.try_lock().is_ok());
    }
}
