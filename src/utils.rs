/// Arithmetic mean of a slice; `None` for an empty slice so callers are
/// forced to handle the undefined case instead of receiving NaN.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Round to two decimal places for reported statistics. Classification and
/// threshold checks operate on unrounded values.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
