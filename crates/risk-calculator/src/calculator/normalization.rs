use super::domain::Criterion;

/// Target total for the weights of one platform type.
pub const WEIGHT_TOTAL: f64 = 100.0;

/// Rescales sibling criterion weights so they sum to roughly [`WEIGHT_TOTAL`].
///
/// A zero total is spread evenly (fractional shares are kept). Any other total is
/// scaled proportionally and each weight is rounded on its own, so the result may
/// miss 100 by up to half a point per criterion.
pub fn normalize_weights(criteria: &mut [Criterion]) {
    if criteria.is_empty() {
        return;
    }

    let total: f64 = criteria.iter().map(|criterion| criterion.weight).sum();

    if total == 0.0 {
        let share = WEIGHT_TOTAL / criteria.len() as f64;
        for criterion in criteria.iter_mut() {
            criterion.weight = share;
        }
        return;
    }

    // Divide before scaling: `WEIGHT_TOTAL / total` overflows for subnormal totals.
    for criterion in criteria.iter_mut() {
        criterion.weight = (criterion.weight / total * WEIGHT_TOTAL).round();
    }
}
