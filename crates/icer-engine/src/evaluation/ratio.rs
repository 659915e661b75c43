use super::domain::Decision;

/// Narrower epsilon than the dominance tolerance; catches effect deltas that
/// slipped past the classifier but would blow up the ratio.
pub(crate) const EFFECT_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RatioOutcome {
    pub(crate) icer: f64,
    pub(crate) decision: Decision,
}

/// Computes the ICER and the threshold decision. Only called when no simple
/// dominance holds. Degenerate near-zero effect deltas are valid outcomes,
/// not errors, and yield a signed infinity.
pub(crate) fn ratio_decision(delta_cost: f64, delta_effect: f64, threshold: f64) -> RatioOutcome {
    if delta_effect.abs() < EFFECT_EPS {
        return if delta_cost > 0.0 {
            RatioOutcome {
                icer: f64::INFINITY,
                decision: Decision::Reject,
            }
        } else if delta_cost < 0.0 {
            RatioOutcome {
                icer: f64::NEG_INFINITY,
                decision: Decision::Accept,
            }
        } else {
            RatioOutcome {
                icer: 0.0,
                decision: Decision::Inconclusive,
            }
        };
    }

    let icer = delta_cost / delta_effect;
    let decision = if delta_effect > 0.0 {
        // Boundary inclusive: an ICER exactly at the threshold is accepted.
        if icer <= threshold {
            Decision::Accept
        } else {
            Decision::Reject
        }
    } else if delta_cost >= 0.0 {
        Decision::Reject
    } else {
        // Effect-losing but cost-saving is not resolvable by comparing a
        // negative ratio against a positive threshold.
        Decision::Inconclusive
    };

    RatioOutcome { icer, decision }
}
