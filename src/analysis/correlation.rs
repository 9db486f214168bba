use serde::Serialize;

use crate::data::model::{ColumnData, Table};

/// Pairwise Pearson correlations over the table's numeric columns.
///
/// `values[i][j]` is the correlation between `columns[i]` and
/// `columns[j]`.  The matrix is symmetric with 1.0 on the diagonal;
/// undefined entries (fewer than two complete pairs, or zero variance)
/// are `NaN`.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// Compute the correlation matrix for every numeric column of the table.
/// Returns `None` when fewer than two numeric columns exist, which the UI
/// renders as "not applicable".
pub fn correlation_matrix(table: &Table) -> Option<CorrelationMatrix> {
    // Names and value slices come from one pass over the columns, so the
    // matrix stays square with `columns` even when column names collide.
    let series: Vec<(&str, &[Option<f64>])> = table
        .columns
        .iter()
        .filter_map(|c| match &c.data {
            ColumnData::Numeric(v) => Some((c.name.as_str(), v.as_slice())),
            _ => None,
        })
        .collect();
    if series.len() < 2 {
        return None;
    }

    let columns: Vec<String> = series.iter().map(|(name, _)| name.to_string()).collect();
    let series: Vec<&[Option<f64>]> = series.into_iter().map(|(_, v)| v).collect();

    let n = series.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(series[i], series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Some(CorrelationMatrix { columns, values })
}

/// Pearson correlation over pairwise-complete observations.
/// `NaN` when fewer than two complete pairs exist or either side has
/// zero variance.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    cov / denom
}
