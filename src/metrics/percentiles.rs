/// Linearly interpolated percentile at rank `(n - 1) * q`.
///
/// Unsorted input is copied and sorted. An empty slice yields `0.0`.
#[must_use]
pub fn percentile(values: &[f64], q: f64) -> f64 {
    let mut ordered = values.to_vec();
    ordered.sort_unstable_by(f64::total_cmp);
    percentile_sorted(&ordered, q)
}

/// Same as [`percentile`] for input already sorted ascending.
#[must_use]
pub fn percentile_sorted(ordered: &[f64], q: f64) -> f64 {
    let last = ordered.len().saturating_sub(1);
    match ordered.len() {
        0 => 0.0,
        1 => ordered.first().copied().unwrap_or(0.0),
        len => {
            let rank = (len.saturating_sub(1) as f64) * q.clamp(0.0, 1.0);
            let lo_rank = rank.floor();
            let frac = rank - lo_rank;
            let lo = (lo_rank as usize).min(last);
            let hi = lo.saturating_add(1).min(last);
            let lo_value = ordered.get(lo).copied().unwrap_or(0.0);
            let hi_value = ordered.get(hi).copied().unwrap_or(lo_value);
            lo_value * (1.0 - frac) + hi_value * frac
        }
    }
}
