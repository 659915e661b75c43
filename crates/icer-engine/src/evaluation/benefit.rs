/// Net monetary benefit at the resolved willingness-to-pay threshold.
/// Computed for every request, independent of the dominance/ratio path.
pub(crate) fn net_monetary_benefit(threshold: f64, delta_effect: f64, delta_cost: f64) -> f64 {
    threshold * delta_effect - delta_cost
}
