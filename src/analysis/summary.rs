use serde::Serialize;

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Non-missing observations.
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation (ddof = 1); 0.0 for a single observation.
    pub std_dev: f64,
}

/// Compute summary statistics over a numeric column, skipping missing
/// cells.  Returns `None` when the column has no non-missing values,
/// which the UI renders as "not available".
pub fn summarize(values: &[Option<f64>]) -> Option<SummaryStats> {
    let mut data: Vec<f64> = values.iter().flatten().copied().collect();
    if data.is_empty() {
        return None;
    }

    let count = data.len();
    let mean = data.iter().sum::<f64>() / count as f64;
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    data.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = if count % 2 == 0 {
        (data[count / 2 - 1] + data[count / 2]) / 2.0
    } else {
        data[count / 2]
    };

    let std_dev = super::sample_std_dev(&data);

    Some(SummaryStats {
        count,
        mean,
        median,
        min,
        max,
        std_dev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        let stats = summarize(&[Some(2.0), Some(4.0), Some(4.0), Some(4.0), Some(6.0)]).unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.mean, 4.0);
        assert_eq!(stats.median, 4.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 6.0);
        // ss = 4 + 0 + 0 + 0 + 4 = 8, sample variance = 2
        assert!((stats.std_dev - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn missing_cells_are_skipped() {
        let stats = summarize(&[None, Some(1.0), None, Some(3.0)]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.median, 2.0);
    }

    #[test]
    fn no_observations_is_none() {
        assert!(summarize(&[]).is_none());
        assert!(summarize(&[None, None]).is_none());
    }

    #[test]
    fn single_observation() {
        let stats = summarize(&[Some(7.5)]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.median, 7.5);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn ordering_invariants_hold() {
        // min <= mean <= max, std >= 0 for any non-empty input
        let inputs: &[&[Option<f64>]] = &[
            &[Some(-3.0), Some(0.0), Some(12.5)],
            &[Some(5.0)],
            &[Some(1.0), None, Some(1.0)],
        ];
        for values in inputs {
            let s = summarize(values).unwrap();
            assert!(s.min <= s.mean && s.mean <= s.max);
            assert!(s.std_dev >= 0.0);
        }
    }
}
