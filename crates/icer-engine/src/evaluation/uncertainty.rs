//! Probabilistic sensitivity analysis: a bounded Monte Carlo estimate of the
//! probability that the intervention is cost-effective (CEAC point estimate).
//!
//! Cost and effect noise is drawn independently per term; the `corr` field on
//! the request is accepted but no correlated sampling is performed.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_distr::{Distribution, Normal};

use super::benefit::net_monetary_benefit;
use super::domain::{Arm, UncertaintyParams};

/// Hard cap on trials per evaluation, bounding latency.
pub const MAX_SAMPLES: u32 = 5_000;

/// Seedable Monte Carlo sampler.
///
/// Production construction draws OS entropy; `with_seed` yields reproducible
/// estimates for tests and one-shot CLI runs.
pub struct UncertaintyEngine {
    rng: StdRng,
}

impl UncertaintyEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Derive an independent sampler for a single evaluation. Only this seed
    /// draw happens under the caller's lock; the trial loop runs on the fork,
    /// so concurrent evaluations never serialize behind one long loop.
    pub fn fork(&mut self) -> Self {
        Self::with_seed(self.rng.next_u64())
    }

    /// Fraction of perturbed trials with positive net benefit at `threshold`.
    /// Callers must only invoke this when `params.samples > 0`.
    pub(crate) fn ceac_probability(
        &mut self,
        comparator: &Arm,
        intervention: &Arm,
        params: &UncertaintyParams,
        threshold: f64,
    ) -> f64 {
        let samples = params.samples.min(MAX_SAMPLES);
        let mut accepts = 0u32;

        for _ in 0..samples {
            let noise_c0 = self.draw(params.se_cost_0);
            let noise_c1 = self.draw(params.se_cost_1);
            let noise_e0 = self.draw(params.se_eff_0);
            let noise_e1 = self.draw(params.se_eff_1);

            let delta_cost = (intervention.cost + noise_c1) - (comparator.cost + noise_c0);
            let delta_effect = (intervention.effect + noise_e1) - (comparator.effect + noise_e0);

            if net_monetary_benefit(threshold, delta_effect, delta_cost) > 0.0 {
                accepts += 1;
            }
        }

        f64::from(accepts) / f64::from(samples)
    }

    /// Gaussian perturbation with mean zero; a missing or zero standard error
    /// leaves the term unperturbed.
    fn draw(&mut self, se: Option<f64>) -> f64 {
        match se {
            Some(se) if se > 0.0 => Normal::new(0.0, se)
                .map(|noise| noise.sample(&mut self.rng))
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

impl Default for UncertaintyEngine {
    fn default() -> Self {
        Self::new()
    }
}
