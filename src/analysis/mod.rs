/// Analysis layer: pure functions over `Table` columns.
///
/// Every function here is a pure function of its inputs; the UI recomputes
/// them on each interaction instead of caching results.
pub mod correlation;
pub mod segment;
pub mod summary;
pub mod timeseries;

/// Aggregation function shared by the time-series and segment views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Mean,
}

impl Aggregate {
    pub const ALL: [Aggregate; 2] = [Aggregate::Sum, Aggregate::Mean];

    pub fn label(&self) -> &'static str {
        match self {
            Aggregate::Sum => "Sum",
            Aggregate::Mean => "Mean",
        }
    }

    /// Apply to a non-empty bucket of values.
    pub fn apply(&self, values: &[f64]) -> f64 {
        match self {
            Aggregate::Sum => values.iter().sum(),
            Aggregate::Mean => values.iter().sum::<f64>() / values.len() as f64,
        }
    }
}

/// Sample standard deviation (ddof = 1); 0.0 for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let ss: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}
