use chrono::NaiveDate;
use eframe::egui::{self, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::analysis::correlation::correlation_matrix;
use crate::analysis::segment::top_segments;
use crate::analysis::summary::summarize;
use crate::analysis::timeseries::aggregate_by_period;
use crate::color;
use crate::state::AppState;

/// Days since the Unix epoch, used as the plot x coordinate.
fn date_to_x(date: NaiveDate) -> f64 {
    (date - NaiveDate::default()).num_days() as f64
}

fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::default().checked_add_signed(chrono::Duration::days(x.round() as i64))
}

fn placeholder(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).italics());
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Render summary statistics for every numeric column, with key metrics
/// for the selected value column on top.
pub fn summary_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Summary Statistics");

    let Some(table) = &state.table else {
        placeholder(ui, "No data loaded.");
        return;
    };
    let numeric_cols = table.numeric_column_names();
    if numeric_cols.is_empty() {
        placeholder(ui, "Not available: no numeric columns.");
        return;
    }

    // ---- Key metrics for the selected value column ----
    let selected = state.selection.value_column.as_deref();
    if let Some((col, stats)) =
        selected.and_then(|col| Some((col, summarize(table.numeric(col)?)?)))
    {
        ui.horizontal(|ui: &mut Ui| {
            ui.strong(format!("Records: {}", stats.count));
            ui.separator();
            ui.strong(format!("Average {col}: {:.2}", stats.mean));
            ui.separator();
            ui.strong(format!("Std Dev: {:.2}", stats.std_dev));
        });
        ui.add_space(4.0);
    }

    egui::Grid::new("summary_grid")
        .striped(true)
        .min_col_width(80.0)
        .show(ui, |ui: &mut Ui| {
            ui.strong("Column");
            ui.strong("Count");
            ui.strong("Mean");
            ui.strong("Median");
            ui.strong("Min");
            ui.strong("Max");
            ui.strong("Std Dev");
            ui.end_row();

            for col in &numeric_cols {
                if selected == Some(col.as_str()) {
                    ui.strong(col);
                } else {
                    ui.label(col);
                }
                match table.numeric(col).and_then(summarize) {
                    Some(stats) => {
                        ui.label(format!("{}", stats.count));
                        ui.label(format!("{:.2}", stats.mean));
                        ui.label(format!("{:.2}", stats.median));
                        ui.label(format!("{:.2}", stats.min));
                        ui.label(format!("{:.2}", stats.max));
                        ui.label(format!("{:.2}", stats.std_dev));
                    }
                    None => {
                        for _ in 0..6 {
                            ui.label("–");
                        }
                    }
                }
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// Render the time-series chart of the value column bucketed by period.
pub fn timeseries_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Time Series");

    let sel = &state.selection;
    let Some(table) = &state.table else {
        placeholder(ui, "No data loaded.");
        return;
    };
    let (Some(date_col), Some(value_col)) = (sel.date_column.as_deref(), sel.value_column.as_deref())
    else {
        placeholder(ui, "Not available: needs a date column and a value column.");
        return;
    };
    let (Some(dates), Some(values)) = (table.dates(date_col), table.numeric(value_col)) else {
        placeholder(ui, "Not available: needs a date column and a value column.");
        return;
    };

    let points = aggregate_by_period(dates, values, sel.granularity, sel.aggregate, sel.date_range);
    if points.is_empty() {
        placeholder(ui, "No data in the selected range.");
        return;
    }

    let series: PlotPoints = points
        .iter()
        .map(|p| [date_to_x(p.period), p.value])
        .collect();
    let name = format!(
        "{} of {} ({})",
        sel.aggregate.label(),
        value_col,
        sel.granularity.label()
    );

    Plot::new("timeseries_plot")
        .legend(Legend::default())
        .height(260.0)
        .x_axis_formatter(|mark, _range| {
            x_to_date(mark.value)
                .map(|d| d.to_string())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(series).name(&name).width(1.5));
        });

    egui::CollapsingHeader::new("Period table")
        .id_salt("timeseries_table")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("timeseries_grid")
                .striped(true)
                .min_col_width(90.0)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("Period");
                    ui.strong("Value");
                    ui.strong("Rows");
                    ui.end_row();
                    for p in &points {
                        ui.label(p.period.to_string());
                        ui.label(format!("{:.2}", p.value));
                        ui.label(format!("{}", p.count));
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Segment breakdown
// ---------------------------------------------------------------------------

/// Render the top-N segment bar chart and table.
pub fn segment_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Segment Breakdown");

    let sel = &state.selection;
    let Some(table) = &state.table else {
        placeholder(ui, "No data loaded.");
        return;
    };
    let (Some(segment_col), Some(value_col)) =
        (sel.segment_column.as_deref(), sel.value_column.as_deref())
    else {
        placeholder(ui, "Not available: needs a segment column and a value column.");
        return;
    };
    let (Some(labels), Some(values)) = (table.labels(segment_col), table.numeric(value_col))
    else {
        placeholder(ui, "Not available: needs a segment column and a value column.");
        return;
    };

    let segments = top_segments(&labels, values, sel.aggregate, sel.top_n);
    if segments.is_empty() {
        placeholder(ui, "No data.");
        return;
    }

    let palette = color::generate_palette(segments.len());
    let bars: Vec<Bar> = segments
        .iter()
        .zip(palette.iter())
        .enumerate()
        .map(|(i, (seg, color))| {
            Bar::new(i as f64, seg.value)
                .name(&seg.label)
                .fill(*color)
                .width(0.7)
        })
        .collect();

    let labels_for_axis: Vec<String> = segments.iter().map(|s| s.label.clone()).collect();

    Plot::new("segment_plot")
        .height(260.0)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if i >= 0.0 && (mark.value - i).abs() < 1e-6 {
                labels_for_axis.get(i as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(segment_col));
        });

    egui::Grid::new("segment_grid")
        .striped(true)
        .min_col_width(90.0)
        .show(ui, |ui: &mut Ui| {
            ui.strong(segment_col);
            ui.strong(sel.aggregate.label());
            ui.strong("Rows");
            ui.strong("Std Dev");
            ui.end_row();
            for seg in &segments {
                ui.label(&seg.label);
                ui.label(format!("{:.2}", seg.value));
                ui.label(format!("{}", seg.count));
                ui.label(format!("{:.2}", seg.std_dev));
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

/// Render the Pearson correlation heatmap over numeric columns.
pub fn correlation_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Correlation Matrix");

    let matrix = state.table.as_ref().and_then(correlation_matrix);
    let Some(matrix) = matrix else {
        placeholder(ui, "Not applicable: needs at least two numeric columns.");
        return;
    };

    egui::Grid::new("correlation_grid")
        .min_col_width(90.0)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for col in &matrix.columns {
                ui.strong(col);
            }
            ui.end_row();

            for (i, row_name) in matrix.columns.iter().enumerate() {
                ui.strong(row_name);
                for j in 0..matrix.columns.len() {
                    let r = matrix.values[i][j];
                    let text = if r.is_nan() {
                        "–".to_string()
                    } else {
                        format!("{r:.2}")
                    };
                    ui.label(
                        RichText::new(text)
                            .background_color(color::diverging(r))
                            .color(egui::Color32::BLACK),
                    );
                }
                ui.end_row();
            }
        });
}
