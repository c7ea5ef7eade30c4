use statrs::statistics::Statistics;

pub struct StatisticalAnalyzer;

impl StatisticalAnalyzer {
    /// Arithmetic mean, or `None` for an empty slice
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.mean())
    }

    /// Sample standard deviation (n - 1 denominator). Zero when fewer than two values.
    pub fn sample_std_dev(values: &[f64]) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        values.std_dev()
    }

    /// `count / total`, zero when `total` is zero
    pub fn fraction(count: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        }
    }
}
