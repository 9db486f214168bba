use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::correlation::{CorrelationMatrix, correlation_matrix};
use crate::analysis::segment::{SegmentRow, top_segments};
use crate::analysis::summary::{SummaryStats, summarize};
use crate::analysis::timeseries::{PeriodPoint, aggregate_by_period};
use crate::data::model::Table;
use crate::state::{AppState, Selection};

/// Snapshot of every dashboard output for the current selection.
#[derive(Debug, Serialize)]
pub struct AnalysisExport {
    pub source: Option<String>,
    pub value_column: Option<String>,
    pub segment_column: Option<String>,
    pub date_column: Option<String>,
    pub summary: Option<SummaryStats>,
    pub time_series: Vec<PeriodPoint>,
    pub segments: Vec<SegmentRow>,
    pub correlation: Option<CorrelationMatrix>,
}

/// Recompute all four outputs from `(table, selection)`, exactly as the
/// panels render them.
pub fn snapshot(table: &Table, selection: &Selection, source: Option<String>) -> AnalysisExport {
    let summary = selection
        .value_column
        .as_deref()
        .and_then(|col| summarize(table.numeric(col)?));

    let time_series = match (
        selection.date_column.as_deref().and_then(|c| table.dates(c)),
        selection
            .value_column
            .as_deref()
            .and_then(|c| table.numeric(c)),
    ) {
        (Some(dates), Some(values)) => aggregate_by_period(
            dates,
            values,
            selection.granularity,
            selection.aggregate,
            selection.date_range,
        ),
        _ => Vec::new(),
    };

    let segments = match (
        selection
            .segment_column
            .as_deref()
            .and_then(|c| table.labels(c)),
        selection
            .value_column
            .as_deref()
            .and_then(|c| table.numeric(c)),
    ) {
        (Some(labels), Some(values)) => {
            top_segments(&labels, values, selection.aggregate, selection.top_n)
        }
        _ => Vec::new(),
    };

    AnalysisExport {
        source,
        value_column: selection.value_column.clone(),
        segment_column: selection.segment_column.clone(),
        date_column: selection.date_column.clone(),
        summary,
        time_series,
        segments,
        correlation: correlation_matrix(table),
    }
}

fn write_json(export: &AnalysisExport, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).context("creating export file")?;
    serde_json::to_writer_pretty(file, export).context("writing export JSON")?;
    Ok(())
}

/// Ask for a destination and write the current analysis as JSON.
/// Failures land in the status line, like load errors.
pub fn export_analysis(state: &mut AppState) {
    let Some(table) = &state.table else {
        state.status_message = Some("Nothing to export: no data loaded.".to_string());
        return;
    };

    let Some(path) = rfd::FileDialog::new()
        .set_title("Export analysis")
        .set_file_name("analysis.json")
        .add_filter("JSON", &["json"])
        .save_file()
    else {
        return;
    };

    let export = snapshot(table, &state.selection, state.source_name.clone());
    match write_json(&export, &path) {
        Ok(()) => {
            log::info!("Exported analysis to {}", path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
