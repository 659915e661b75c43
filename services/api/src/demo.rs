use std::fs;
use std::path::PathBuf;

use clap::Args;
use icer_engine::config::AppConfig;
use icer_engine::error::AppError;
use icer_engine::evaluation::{
    Arm, EvaluateRequest, EvaluationService, UncertaintyEngine, UncertaintyParams,
};
use icer_engine::policy::{FilePolicySource, PolicySource};

#[derive(Args, Debug, Default)]
pub(crate) struct EvaluateArgs {
    /// Path to an evaluation request JSON document; a built-in sample is used when omitted
    #[arg(long)]
    pub(crate) request: Option<PathBuf>,
    /// Fixed RNG seed for a reproducible CEAC estimate
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Policy document path override
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PolicyArgs {
    /// Policy document path override
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        request,
        seed,
        policy,
    } = args;

    let request = match request {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => sample_request(),
    };

    let source = FilePolicySource::new(policy_path(policy)?);
    let service = match seed {
        Some(seed) => EvaluationService::with_sampler(source, UncertaintyEngine::with_seed(seed)),
        None => EvaluationService::new(source),
    };

    let result = service.evaluate(&request)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub(crate) fn run_policy(args: PolicyArgs) -> Result<(), AppError> {
    let source = FilePolicySource::new(policy_path(args.policy)?);
    let policy = source.load().map_err(AppError::Policy)?;
    println!("{}", serde_json::to_string_pretty(&policy)?);
    Ok(())
}

fn policy_path(override_path: Option<PathBuf>) -> Result<PathBuf, AppError> {
    match override_path {
        Some(path) => Ok(path),
        None => Ok(AppConfig::load()?.policy.path),
    }
}

/// Baseline scenario mirroring the request documented on the HTTP API:
/// a costlier but more effective intervention with a modest sampling run.
fn sample_request() -> EvaluateRequest {
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
        uncertainty: Some(UncertaintyParams {
            se_cost_0: Some(500.0),
            se_cost_1: Some(500.0),
            se_eff_0: Some(0.01),
            se_eff_1: Some(0.01),
            corr: None,
            samples: 1000,
        }),
        equity_weights: None,
    }
}
