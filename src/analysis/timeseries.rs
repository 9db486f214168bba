use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use super::Aggregate;

/// Period unit used to bucket time-series rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    pub const ALL: [Granularity; 5] = [
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Quarter,
        Granularity::Year,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Day => "Daily",
            Granularity::Week => "Weekly",
            Granularity::Month => "Monthly",
            Granularity::Quarter => "Quarterly",
            Granularity::Year => "Yearly",
        }
    }
}

/// Truncate a date to the start of its period.
///
/// Weeks start on the ISO Monday; quarters on Jan/Apr/Jul/Oct 1st.
pub fn period_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Day => date,
        Granularity::Week => {
            let back = date.weekday().num_days_from_monday() as u64;
            date.checked_sub_days(Days::new(back)).unwrap_or(date)
        }
        Granularity::Month => date.with_day(1).unwrap_or(date),
        Granularity::Quarter => {
            let month = (date.month0() / 3) * 3 + 1;
            date.with_day(1)
                .and_then(|d| d.with_month(month))
                .unwrap_or(date)
        }
        Granularity::Year => date
            .with_day(1)
            .and_then(|d| d.with_month(1))
            .unwrap_or(date),
    }
}

/// One aggregated bucket of the time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodPoint {
    /// Start of the period.
    pub period: NaiveDate,
    pub value: f64,
    /// Rows contributing to the bucket.
    pub count: usize,
}

/// Group rows into period buckets and aggregate the value column.
///
/// Rows are filtered to the inclusive `[start, end]` range when one is
/// given; rows missing either the date or the value are skipped.  Output
/// is ascending by period start, one point per non-empty bucket.
pub fn aggregate_by_period(
    dates: &[Option<NaiveDate>],
    values: &[Option<f64>],
    granularity: Granularity,
    aggregate: Aggregate,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Vec<PeriodPoint> {
    let mut buckets: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();

    for (date, value) in dates.iter().zip(values.iter()) {
        let (Some(date), Some(value)) = (date, value) else {
            continue;
        };
        if let Some((start, end)) = range {
            if *date < start || *date > end {
                continue;
            }
        }
        buckets
            .entry(period_start(*date, granularity))
            .or_default()
            .push(*value);
    }

    buckets
        .into_iter()
        .map(|(period, bucket)| PeriodPoint {
            period,
            value: aggregate.apply(&bucket),
            count: bucket.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn truncation_per_granularity() {
        let d = date(2023, 8, 17); // a Thursday
        assert_eq!(period_start(d, Granularity::Day), d);
        assert_eq!(period_start(d, Granularity::Week), date(2023, 8, 14));
        assert_eq!(period_start(d, Granularity::Month), date(2023, 8, 1));
        assert_eq!(period_start(d, Granularity::Quarter), date(2023, 7, 1));
        assert_eq!(period_start(d, Granularity::Year), date(2023, 1, 1));

        // A Monday truncates to itself under Week
        let monday = date(2023, 8, 14);
        assert_eq!(period_start(monday, Granularity::Week), monday);
    }

    #[test]
    fn quarter_boundaries() {
        assert_eq!(
            period_start(date(2023, 1, 31), Granularity::Quarter),
            date(2023, 1, 1)
        );
        assert_eq!(
            period_start(date(2023, 6, 1), Granularity::Quarter),
            date(2023, 4, 1)
        );
        assert_eq!(
            period_start(date(2023, 12, 31), Granularity::Quarter),
            date(2023, 10, 1)
        );
    }

    #[test]
    fn twelve_monthly_rows_sum_to_their_own_buckets() {
        // 12 rows, one per month, values summing to 1200
        let dates: Vec<Option<NaiveDate>> =
            (1..=12).map(|m| Some(date(2023, m, 15))).collect();
        let values: Vec<Option<f64>> = (1..=12).map(|m| Some(m as f64 * 100.0 / 6.5)).collect();
        let total: f64 = values.iter().flatten().sum();
        assert!((total - 1200.0).abs() < 1e-9);

        let points =
            aggregate_by_period(&dates, &values, Granularity::Month, Aggregate::Sum, None);
        assert_eq!(points.len(), 12);
        for (point, (d, v)) in points.iter().zip(dates.iter().zip(values.iter())) {
            assert_eq!(point.period, period_start(d.unwrap(), Granularity::Month));
            assert_eq!(point.value, v.unwrap());
            assert_eq!(point.count, 1);
        }
    }

    #[test]
    fn output_periods_strictly_ascending() {
        let dates = vec![
            Some(date(2023, 3, 2)),
            Some(date(2023, 1, 9)),
            Some(date(2023, 3, 28)),
            Some(date(2022, 11, 1)),
            Some(date(2023, 1, 2)),
        ];
        let values = vec![Some(1.0); 5];
        let points =
            aggregate_by_period(&dates, &values, Granularity::Month, Aggregate::Sum, None);
        assert!(points.windows(2).all(|w| w[0].period < w[1].period));
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].value, 2.0); // both January rows in one bucket
    }

    #[test]
    fn mean_aggregation() {
        let dates = vec![Some(date(2023, 5, 1)), Some(date(2023, 5, 20))];
        let values = vec![Some(10.0), Some(30.0)];
        let points =
            aggregate_by_period(&dates, &values, Granularity::Month, Aggregate::Mean, None);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 20.0);
        assert_eq!(points[0].count, 2);
    }

    #[test]
    fn date_range_filter_is_inclusive() {
        let dates = vec![
            Some(date(2023, 1, 1)),
            Some(date(2023, 1, 2)),
            Some(date(2023, 1, 3)),
        ];
        let values = vec![Some(1.0), Some(2.0), Some(4.0)];
        let points = aggregate_by_period(
            &dates,
            &values,
            Granularity::Day,
            Aggregate::Sum,
            Some((date(2023, 1, 1), date(2023, 1, 2))),
        );
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, 1.0);
        assert_eq!(points[1].value, 2.0);
    }

    #[test]
    fn empty_after_filtering_yields_empty() {
        let dates = vec![Some(date(2023, 6, 1))];
        let values = vec![Some(5.0)];
        let points = aggregate_by_period(
            &dates,
            &values,
            Granularity::Month,
            Aggregate::Sum,
            Some((date(2024, 1, 1), date(2024, 12, 31))),
        );
        assert!(points.is_empty());

        assert!(aggregate_by_period(&[], &[], Granularity::Day, Aggregate::Sum, None).is_empty());
    }

    #[test]
    fn rows_missing_date_or_value_are_skipped() {
        let dates = vec![Some(date(2023, 2, 1)), None, Some(date(2023, 2, 3))];
        let values = vec![Some(1.0), Some(2.0), None];
        let points =
            aggregate_by_period(&dates, &values, Granularity::Month, Aggregate::Sum, None);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 1.0);
        assert_eq!(points[0].count, 1);
    }
}
