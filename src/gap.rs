/// Signed gap of `value` against `reference` in percent, rounded to two
/// decimals. Absent when the reference is zero or the result is not finite.
pub fn relative_gap(value: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 {
        return None;
    }
    let pct = (value - reference) / reference * 100.0;
    pct.is_finite().then(|| round2(pct))
}

pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // avoid printing "-0.00"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
