pub struct StatsHelper;

impl StatsHelper {
    pub fn rms(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = samples.iter().map(|&v| v * v).sum();
        (sum_sq / samples.len() as f64).sqrt()
    }

    /// Minimum and maximum of `values`; `(inf, -inf)` when empty.
    pub fn extent<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
        values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }
}
