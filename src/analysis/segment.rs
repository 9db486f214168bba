use std::collections::BTreeMap;

use serde::Serialize;

use super::Aggregate;

/// One ranked segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRow {
    pub label: String,
    pub value: f64,
    /// Rows contributing to the segment.
    pub count: usize,
    /// Sample standard deviation of the segment's values.
    pub std_dev: f64,
}

/// Group rows by segment label, aggregate the value column, rank
/// descending by aggregate value, and keep the top `top_n` segments.
///
/// Ties keep label order: groups are accumulated in label order and the
/// sort is stable.  Rows missing either the label or the value are skipped.
pub fn top_segments(
    labels: &[Option<String>],
    values: &[Option<f64>],
    aggregate: Aggregate,
    top_n: usize,
) -> Vec<SegmentRow> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

    for (label, value) in labels.iter().zip(values.iter()) {
        let (Some(label), Some(value)) = (label, value) else {
            continue;
        };
        groups.entry(label.as_str()).or_default().push(*value);
    }

    let mut rows: Vec<SegmentRow> = groups
        .into_iter()
        .map(|(label, bucket)| SegmentRow {
            label: label.to_string(),
            value: aggregate.apply(&bucket),
            count: bucket.len(),
            std_dev: super::sample_std_dev(&bucket),
        })
        .collect();

    rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    rows.truncate(top_n);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<Option<String>> {
        names.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn groups_and_ranks_descending() {
        let segs = top_segments(
            &labels(&["North", "South", "North", "East"]),
            &[Some(10.0), Some(50.0), Some(30.0), Some(20.0)],
            Aggregate::Sum,
            10,
        );
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].label, "South");
        assert_eq!(segs[0].value, 50.0);
        assert_eq!(segs[1].label, "North");
        assert_eq!(segs[1].value, 40.0);
        assert_eq!(segs[1].count, 2);
        // North bucket [10, 30]: sample variance 200
        assert!((segs[1].std_dev - 200.0_f64.sqrt()).abs() < 1e-12);
        // Single-row segments have no spread
        assert_eq!(segs[0].std_dev, 0.0);
        assert_eq!(segs[2].label, "East");
        assert!(segs.windows(2).all(|w| w[0].value >= w[1].value));
    }

    #[test]
    fn top_n_truncates() {
        let segs = top_segments(
            &labels(&["a", "b", "c", "d"]),
            &[Some(4.0), Some(3.0), Some(2.0), Some(1.0)],
            Aggregate::Sum,
            2,
        );
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].label, "a");
        assert_eq!(segs[1].label, "b");
    }

    #[test]
    fn ties_keep_label_order() {
        let segs = top_segments(
            &labels(&["zeta", "alpha", "mid"]),
            &[Some(5.0), Some(5.0), Some(5.0)],
            Aggregate::Sum,
            10,
        );
        let names: Vec<&str> = segs.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn mean_aggregation() {
        let segs = top_segments(
            &labels(&["x", "x", "y"]),
            &[Some(2.0), Some(4.0), Some(5.0)],
            Aggregate::Mean,
            10,
        );
        assert_eq!(segs[0].label, "y");
        assert_eq!(segs[0].value, 5.0);
        assert_eq!(segs[1].label, "x");
        assert_eq!(segs[1].value, 3.0);
    }

    #[test]
    fn missing_cells_are_skipped_and_empty_input_is_empty() {
        let segs = top_segments(
            &[Some("a".to_string()), None, Some("b".to_string())],
            &[None, Some(2.0), Some(3.0)],
            Aggregate::Sum,
            10,
        );
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].label, "b");

        assert!(top_segments(&[], &[], Aggregate::Sum, 5).is_empty());
    }
}
