use std::path::Path;

use chrono::NaiveDate;

use crate::analysis::Aggregate;
use crate::analysis::timeseries::Granularity;
use crate::data::loader;
use crate::data::model::Table;
use crate::data::sample;

/// Default number of segments shown in the breakdown.
pub const DEFAULT_TOP_N: usize = 10;

/// Seed for the fallback sample dataset.
const SAMPLE_SEED: u64 = 42;

// ---------------------------------------------------------------------------
// Selection – everything the user has picked in the side panel
// ---------------------------------------------------------------------------

/// Current UI selections.  Transient: re-derived defaults whenever a new
/// table is loaded, never persisted.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Numeric column the dashboard analyzes.
    pub value_column: Option<String>,
    /// Column used to group the segment breakdown.
    pub segment_column: Option<String>,
    /// Date column driving the time series.
    pub date_column: Option<String>,
    pub granularity: Granularity,
    pub aggregate: Aggregate,
    pub top_n: usize,
    /// Inclusive date range filter for the time series.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            value_column: None,
            segment_column: None,
            date_column: None,
            granularity: Granularity::Month,
            aggregate: Aggregate::Sum,
            top_n: DEFAULT_TOP_N,
            date_range: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.  Analysis outputs are
/// never stored here; the panels recompute them from `(table, selection)`
/// every frame.
pub struct AppState {
    /// Loaded table (None only before the first load).
    pub table: Option<Table>,
    /// Where the table came from, for the top bar.
    pub source_name: Option<String>,
    pub selection: Selection,
    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            source_name: None,
            selection: Selection::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded table and re-derive default selections.
    pub fn set_table(&mut self, table: Table, source: impl Into<String>) {
        let value_column = table.numeric_column_names().into_iter().next();
        let segment_column = table
            .categorical_column_names()
            .into_iter()
            .chain(table.column_names().map(str::to_string))
            .find(|c| Some(c) != value_column.as_ref());
        let date_column = table.date_column_names().into_iter().next();
        let date_range = date_column.as_deref().and_then(|c| table.date_span(c));

        self.selection = Selection {
            value_column,
            segment_column,
            date_column,
            date_range,
            ..self.selection.clone()
        };
        self.table = Some(table);
        self.source_name = Some(source.into());
        self.status_message = None;
    }

    /// Fall back to the generated sample dataset.
    pub fn load_sample(&mut self) {
        let table = sample::generate_sample_table(SAMPLE_SEED);
        log::info!("Loaded sample dataset with {} rows", table.len());
        self.set_table(table, "sample data");
    }

    /// Load a file, keeping the previous table if the load fails.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows, columns {:?}",
                    table.len(),
                    table.column_names().collect::<Vec<_>>()
                );
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("file")
                    .to_string();
                self.set_table(table, name);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Reset the date range to the full span of the selected date column.
    pub fn reset_date_range(&mut self) {
        self.selection.date_range = match (&self.table, &self.selection.date_column) {
            (Some(table), Some(col)) => table.date_span(col),
            _ => None,
        };
    }

    /// Change the date column and re-derive its range.
    pub fn set_date_column(&mut self, column: String) {
        self.selection.date_column = Some(column);
        self.reset_date_range();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, ColumnData};

    #[test]
    fn set_table_derives_defaults() {
        let mut state = AppState::default();
        state.load_sample();

        let sel = &state.selection;
        assert_eq!(sel.value_column.as_deref(), Some("sales_amount"));
        assert_eq!(sel.segment_column.as_deref(), Some("product"));
        assert_eq!(sel.date_column.as_deref(), Some("date"));
        assert!(sel.date_range.is_some());
        assert_eq!(sel.granularity, Granularity::Month);
        assert_eq!(sel.aggregate, Aggregate::Sum);
        assert_eq!(sel.top_n, DEFAULT_TOP_N);
    }

    #[test]
    fn table_without_dates_leaves_range_unset() {
        let mut state = AppState::default();
        state.set_table(
            Table::new(vec![
                Column {
                    name: "value".into(),
                    data: ColumnData::Numeric(vec![Some(1.0)]),
                },
                Column {
                    name: "kind".into(),
                    data: ColumnData::Categorical(vec![Some("a".into())]),
                },
            ]),
            "test",
        );
        assert!(state.selection.date_column.is_none());
        assert!(state.selection.date_range.is_none());
        assert_eq!(state.selection.segment_column.as_deref(), Some("kind"));
    }

    #[test]
    fn failed_load_keeps_previous_table() {
        let mut state = AppState::default();
        state.load_sample();
        state.load_path(Path::new("does-not-exist.csv"));
        assert!(state.table.is_some());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }

    #[test]
    fn segment_default_falls_back_to_any_other_column() {
        // No categorical columns: pick the first column that isn't the value.
        let mut state = AppState::default();
        state.set_table(
            Table::new(vec![
                Column {
                    name: "a".into(),
                    data: ColumnData::Numeric(vec![Some(1.0)]),
                },
                Column {
                    name: "b".into(),
                    data: ColumnData::Numeric(vec![Some(2.0)]),
                },
            ]),
            "test",
        );
        assert_eq!(state.selection.value_column.as_deref(), Some("a"));
        assert_eq!(state.selection.segment_column.as_deref(), Some("b"));
    }
}
