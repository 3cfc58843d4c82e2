//! Summary statistics over finite values.

/// Minimum, maximum and mean of the finite values of an array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueStats {
    /// Smallest finite value.
    pub min: f64,
    /// Largest finite value.
    pub max: f64,
    /// Mean of the finite values.
    pub mean: f64,
    /// Count of valid (finite) values.
    pub valid_count: usize,
}

impl ValueStats {
    /// Compute statistics, ignoring NaN and infinite values.
    ///
    /// Returns `None` when there is no finite value.
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut count = 0usize;
        for &v in values {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
                sum += v;
                count += 1;
            }
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            min,
            max,
            mean: sum / count as f64,
            valid_count: count,
        })
    }
}
