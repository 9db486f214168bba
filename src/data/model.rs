use std::fmt;

use chrono::NaiveDate;

/// Date formats accepted during column type inference.
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

// ---------------------------------------------------------------------------
// CellValue – a single raw cell before column typing
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, produced by the loaders before the
/// column-level type is decided.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Parse a raw string cell the way the CSV loader sees it.
    pub fn guess(s: &str) -> CellValue {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(v) = s.parse::<f64>() {
            return CellValue::Number(v);
        }
        if let Some(d) = parse_date(s) {
            return CellValue::Date(d);
        }
        CellValue::Text(s.to_string())
    }

    /// Interpret the cell as a date, parsing text cells if needed.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::Text(s) => parse_date(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// Try the accepted date formats in order.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

// ---------------------------------------------------------------------------
// ColumnData – typed column storage
// ---------------------------------------------------------------------------

/// The inferred kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Categorical,
    Date,
}

/// Typed storage for one column. Missing cells stay `None` so the
/// aggregators can skip them instead of inventing zeros.
#[derive(Debug, Clone)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
    Date(Vec<Option<NaiveDate>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
            ColumnData::Date(v) => v.len(),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Numeric(_) => ColumnType::Numeric,
            ColumnData::Categorical(_) => ColumnType::Categorical,
            ColumnData::Date(_) => ColumnType::Date,
        }
    }

    /// Decide a column's type from its raw cells and build typed storage.
    ///
    /// Numeric wins if every non-null cell is (or parses as) a number,
    /// then Date, otherwise Categorical. An all-null column is Categorical.
    pub fn infer(cells: &[CellValue]) -> ColumnData {
        let non_null = || cells.iter().filter(|c| !c.is_null());
        let has_values = non_null().next().is_some();

        let all_numeric = non_null().all(|c| match c {
            CellValue::Number(_) => true,
            CellValue::Text(s) => s.trim().parse::<f64>().is_ok(),
            _ => false,
        });
        if all_numeric && has_values {
            return ColumnData::Numeric(
                cells
                    .iter()
                    .map(|c| match c {
                        CellValue::Number(v) => Some(*v),
                        CellValue::Text(s) => s.trim().parse::<f64>().ok(),
                        _ => None,
                    })
                    .collect(),
            );
        }

        let all_dates = non_null().all(|c| c.as_date().is_some());
        if all_dates && has_values {
            return ColumnData::Date(cells.iter().map(|c| c.as_date()).collect());
        }

        ColumnData::Categorical(
            cells
                .iter()
                .map(|c| match c {
                    CellValue::Null => None,
                    other => Some(other.to_string()),
                })
                .collect(),
        )
    }

    /// Display labels for any column kind, used for segmentation.
    pub fn labels(&self) -> Vec<Option<String>> {
        match self {
            ColumnData::Numeric(v) => v.iter().map(|c| c.map(|x| x.to_string())).collect(),
            ColumnData::Categorical(v) => v.clone(),
            ColumnData::Date(v) => v.iter().map(|c| c.map(|d| d.to_string())).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// The full parsed dataset: named, typed columns of uniform length.
#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Panics if the columns do not all have the same number of rows;
    /// the loaders reject ragged input before constructing a table.
    pub fn new(columns: Vec<Column>) -> Self {
        let n_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        assert!(
            columns.iter().all(|c| c.data.len() == n_rows),
            "all columns must have the same number of rows"
        );
        Table { columns, n_rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the table has zero rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    fn names_of(&self, ty: ColumnType) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.data.column_type() == ty)
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn numeric_column_names(&self) -> Vec<String> {
        self.names_of(ColumnType::Numeric)
    }

    pub fn categorical_column_names(&self) -> Vec<String> {
        self.names_of(ColumnType::Categorical)
    }

    pub fn date_column_names(&self) -> Vec<String> {
        self.names_of(ColumnType::Date)
    }

    /// Numeric values of a column, or `None` if absent / not numeric.
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        match &self.column(name)?.data {
            ColumnData::Numeric(v) => Some(v),
            _ => None,
        }
    }

    /// Dates of a column, or `None` if absent / not a date column.
    pub fn dates(&self, name: &str) -> Option<&[Option<NaiveDate>]> {
        match &self.column(name)?.data {
            ColumnData::Date(v) => Some(v),
            _ => None,
        }
    }

    /// Display labels for any column, used by the segment aggregator.
    pub fn labels(&self, name: &str) -> Option<Vec<Option<String>>> {
        Some(self.column(name)?.data.labels())
    }

    /// Min and max of a date column, ignoring missing cells.
    pub fn date_span(&self, name: &str) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self.dates(name)?;
        let mut span: Option<(NaiveDate, NaiveDate)> = None;
        for d in dates.iter().flatten() {
            span = Some(match span {
                None => (*d, *d),
                Some((lo, hi)) => (lo.min(*d), hi.max(*d)),
            });
        }
        span
    }
}

/// Normalize a header the way the original data feeds expect:
/// trimmed, lowercase, spaces replaced by underscores.
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn guess_classifies_cells() {
        assert_eq!(CellValue::guess("12.5"), CellValue::Number(12.5));
        assert_eq!(CellValue::guess(""), CellValue::Null);
        assert_eq!(
            CellValue::guess("2023-04-01"),
            CellValue::Date(date(2023, 4, 1))
        );
        assert_eq!(
            CellValue::guess("North"),
            CellValue::Text("North".to_string())
        );
    }

    #[test]
    fn infer_prefers_numeric_then_date() {
        let numeric = ColumnData::infer(&[
            CellValue::Number(1.0),
            CellValue::Null,
            CellValue::Text("3".into()),
        ]);
        assert_eq!(numeric.column_type(), ColumnType::Numeric);

        let dates = ColumnData::infer(&[
            CellValue::Text("2022-01-01".into()),
            CellValue::Date(date(2022, 2, 1)),
        ]);
        assert_eq!(dates.column_type(), ColumnType::Date);

        let mixed = ColumnData::infer(&[
            CellValue::Text("2022-01-01".into()),
            CellValue::Text("North".into()),
        ]);
        assert_eq!(mixed.column_type(), ColumnType::Categorical);
    }

    #[test]
    fn all_null_column_is_categorical() {
        let col = ColumnData::infer(&[CellValue::Null, CellValue::Null]);
        assert_eq!(col.column_type(), ColumnType::Categorical);
        assert_eq!(col.labels(), vec![None, None]);
    }

    #[test]
    fn table_accessors_by_type() {
        let table = Table::new(vec![
            Column {
                name: "date".into(),
                data: ColumnData::Date(vec![Some(date(2022, 1, 3)), Some(date(2022, 1, 1))]),
            },
            Column {
                name: "sales".into(),
                data: ColumnData::Numeric(vec![Some(10.0), None]),
            },
            Column {
                name: "region".into(),
                data: ColumnData::Categorical(vec![Some("North".into()), Some("South".into())]),
            },
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.numeric_column_names(), vec!["sales".to_string()]);
        assert_eq!(table.date_column_names(), vec!["date".to_string()]);
        assert_eq!(
            table.categorical_column_names(),
            vec!["region".to_string()]
        );
        assert_eq!(
            table.date_span("date"),
            Some((date(2022, 1, 1), date(2022, 1, 3)))
        );
        assert!(table.numeric("region").is_none());
    }

    #[test]
    #[should_panic(expected = "same number of rows")]
    fn ragged_columns_are_rejected() {
        Table::new(vec![
            Column {
                name: "a".into(),
                data: ColumnData::Numeric(vec![Some(1.0), Some(2.0)]),
            },
            Column {
                name: "b".into(),
                data: ColumnData::Numeric(vec![Some(1.0)]),
            },
        ]);
    }

    #[test]
    fn normalize_header_rules() {
        assert_eq!(normalize_header("  Sales Amount "), "sales_amount");
        assert_eq!(normalize_header("Region"), "region");
    }
}
