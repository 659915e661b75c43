use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Upper bound accepted on the wire; execution is capped separately.
pub const REQUESTED_SAMPLES_LIMIT: u32 = 10_000;

/// Cost/effect observation for one treatment arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arm {
    pub cost: f64,
    pub effect: f64,
    #[serde(default)]
    pub effect_unit: EffectUnit,
}

/// Unit of the declared effect values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EffectUnit {
    #[default]
    Qaly,
    Daly,
    Other,
}

impl EffectUnit {
    pub fn label(&self) -> &'static str {
        match self {
            EffectUnit::Qaly => "QALY",
            EffectUnit::Daly => "DALY",
            EffectUnit::Other => "OTHER",
        }
    }
}

/// Explicit willingness-to-pay threshold supplied on a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub value: f64,
    pub unit: ThresholdUnit,
    #[serde(default)]
    pub source: ThresholdSource,
}

/// Currency-per-effect unit of a threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdUnit {
    #[default]
    #[serde(rename = "CNY_per_QALY")]
    CnyPerQaly,
    #[serde(rename = "CNY_per_DALY")]
    CnyPerDaly,
}

impl ThresholdUnit {
    pub fn label(&self) -> &'static str {
        match self {
            ThresholdUnit::CnyPerQaly => "CNY_per_QALY",
            ThresholdUnit::CnyPerDaly => "CNY_per_DALY",
        }
    }
}

/// Provenance of a threshold value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdSource {
    #[serde(rename = "policy")]
    Policy,
    #[serde(rename = "literature")]
    Literature,
    #[serde(rename = "WTP_survey")]
    WtpSurvey,
    #[default]
    #[serde(rename = "config")]
    Config,
}

/// Analytic perspective, recorded in the assumptions map only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    Societal,
    #[default]
    Payer,
    Provider,
}

impl Perspective {
    pub fn label(&self) -> &'static str {
        match self {
            Perspective::Societal => "societal",
            Perspective::Payer => "payer",
            Perspective::Provider => "provider",
        }
    }
}

fn default_discount_rate() -> f64 {
    0.03
}

/// Annual discount rates. Carried into the assumptions record verbatim and
/// never applied to cost/effect values in this version.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountInputs {
    #[serde(default = "default_discount_rate")]
    pub cost_rate: f64,
    #[serde(default = "default_discount_rate")]
    pub effect_rate: f64,
}

/// Probabilistic sensitivity analysis inputs.
///
/// `corr` is accepted for forward compatibility but no correlated sampling is
/// performed; see the uncertainty module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyParams {
    #[serde(default)]
    pub se_cost_0: Option<f64>,
    #[serde(default)]
    pub se_cost_1: Option<f64>,
    #[serde(default)]
    pub se_eff_0: Option<f64>,
    #[serde(default)]
    pub se_eff_1: Option<f64>,
    #[serde(default)]
    pub corr: Option<f64>,
    #[serde(default)]
    pub samples: u32,
}

/// Evaluation request carrying the two arms plus optional overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub comparator: Arm,
    pub intervention: Arm,
    #[serde(default)]
    pub perspective: Perspective,
    #[serde(default)]
    pub cohort: Option<String>,
    #[serde(default)]
    pub threshold: Option<Threshold>,
    #[serde(default)]
    pub discount: Option<DiscountInputs>,
    #[serde(default)]
    pub uncertainty: Option<UncertaintyParams>,
    #[serde(default)]
    pub equity_weights: Option<BTreeMap<String, f64>>,
}

impl EvaluateRequest {
    /// Rejects malformed inputs before any computation runs, naming the
    /// offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (arm, observation) in [
            ("comparator", &self.comparator),
            ("intervention", &self.intervention),
        ] {
            if observation.cost < 0.0 {
                return Err(ValidationError::NegativeCost {
                    arm,
                    value: observation.cost,
                });
            }
        }

        if let Some(threshold) = &self.threshold {
            if threshold.value <= 0.0 {
                return Err(ValidationError::NonPositiveThreshold {
                    value: threshold.value,
                });
            }
        }

        if let Some(discount) = &self.discount {
            for (field, rate) in [
                ("discount.cost_rate", discount.cost_rate),
                ("discount.effect_rate", discount.effect_rate),
            ] {
                if !(0.0..=1.0).contains(&rate) {
                    return Err(ValidationError::DiscountRateOutOfRange { field, value: rate });
                }
            }
        }

        if let Some(uncertainty) = &self.uncertainty {
            for (field, se) in [
                ("uncertainty.se_cost_0", uncertainty.se_cost_0),
                ("uncertainty.se_cost_1", uncertainty.se_cost_1),
                ("uncertainty.se_eff_0", uncertainty.se_eff_0),
                ("uncertainty.se_eff_1", uncertainty.se_eff_1),
            ] {
                if let Some(value) = se {
                    if value < 0.0 {
                        return Err(ValidationError::NegativeStandardError { field, value });
                    }
                }
            }

            if let Some(corr) = uncertainty.corr {
                if !(-1.0..=1.0).contains(&corr) {
                    return Err(ValidationError::CorrelationOutOfRange { value: corr });
                }
            }

            if uncertainty.samples > REQUESTED_SAMPLES_LIMIT {
                return Err(ValidationError::SampleCountOutOfRange {
                    value: uncertainty.samples,
                });
            }
        }

        Ok(())
    }
}

/// Field-level rejection raised before evaluation starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{arm}.cost must be non-negative (got {value})")]
    NegativeCost { arm: &'static str, value: f64 },
    #[error("threshold.value must be positive (got {value})")]
    NonPositiveThreshold { value: f64 },
    #[error("{field} must lie in [0, 1] (got {value})")]
    DiscountRateOutOfRange { field: &'static str, value: f64 },
    #[error("{field} must be non-negative (got {value})")]
    NegativeStandardError { field: &'static str, value: f64 },
    #[error("uncertainty.corr must lie in [-1, 1] (got {value})")]
    CorrelationOutOfRange { value: f64 },
    #[error("uncertainty.samples must lie in [0, 10000] (got {value})")]
    SampleCountOutOfRange { value: u32 },
}

/// Dominance relation between the two arms. `Extended` is reserved and never
/// produced by the current classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dominance {
    Simple,
    Extended,
    None,
}

/// Cost-effectiveness verdict at the resolved threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Reject,
    Inconclusive,
}

/// Complete, immutable outcome of one evaluation.
///
/// `icer_value` is populated only when `dominance == none` and may carry a
/// signed infinity for degenerate effect deltas; serde_json renders
/// non-finite floats as `null` at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub icer_value: Option<f64>,
    pub icer_unit: Option<ThresholdUnit>,
    pub dominance: Dominance,
    pub decision: Decision,
    pub net_benefit: f64,
    pub ceac_prob_accept: Option<f64>,
    pub policy_version: String,
    pub threshold_used: f64,
    pub assumptions: BTreeMap<String, String>,
    pub evaluated_at: String,
}
