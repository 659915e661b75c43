/// Tolerance for cost/effect delta comparisons.
pub(crate) const EPS: f64 = 1e-10;

/// Outcome of the simple-dominance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DominanceCall {
    SimpleAccept,
    SimpleReject,
    None,
}

/// Classifies simple dominance between the arms.
///
/// The accept clause is checked before the reject clause; swapping the order
/// changes how ties resolve. A cost increase with an effect delta of exactly
/// zero lands in the reject clause, not in `None`.
pub(crate) fn classify(delta_cost: f64, delta_effect: f64) -> DominanceCall {
    if delta_cost <= EPS && delta_effect >= -EPS && (delta_cost < -EPS || delta_effect > EPS) {
        DominanceCall::SimpleAccept
    } else if delta_cost >= -EPS && delta_effect <= EPS && (delta_cost > EPS || delta_effect < -EPS)
    {
        DominanceCall::SimpleReject
    } else {
        DominanceCall::None
    }
}
