use eframe::egui::{self, Color32, RichText, Slider, Ui};
use egui_extras::DatePickerButton;

use crate::analysis::Aggregate;
use crate::analysis::timeseries::Granularity;
use crate::state::AppState;
use crate::ui::export;

// ---------------------------------------------------------------------------
// Left side panel – dashboard controls
// ---------------------------------------------------------------------------

/// Render the control panel: column pickers, granularity, aggregate,
/// top-N, and the date range filter.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No data loaded.");
        return;
    };

    let numeric_cols = table.numeric_column_names();
    let date_cols = table.date_column_names();
    let all_cols: Vec<String> = table.column_names().map(str::to_string).collect();

    // ---- Value column ----
    ui.strong("Value column");
    if numeric_cols.is_empty() {
        ui.label("No numeric columns detected.");
    } else {
        let current = state.selection.value_column.clone().unwrap_or_default();
        egui::ComboBox::from_id_salt("value_column")
            .selected_text(&current)
            .show_ui(ui, |ui: &mut Ui| {
                for col in &numeric_cols {
                    if ui.selectable_label(current == *col, col).clicked() {
                        state.selection.value_column = Some(col.clone());
                    }
                }
            });
    }
    ui.add_space(6.0);

    // ---- Segment column (anything but the value column) ----
    ui.strong("Segment by");
    let current_segment = state.selection.segment_column.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("segment_column")
        .selected_text(&current_segment)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &all_cols {
                if Some(col) == state.selection.value_column.as_ref() {
                    continue;
                }
                if ui.selectable_label(current_segment == *col, col).clicked() {
                    state.selection.segment_column = Some(col.clone());
                }
            }
        });
    ui.add_space(6.0);

    // ---- Date column ----
    ui.strong("Date column");
    if date_cols.is_empty() {
        ui.label("No date column detected.");
    } else {
        let current = state.selection.date_column.clone().unwrap_or_default();
        egui::ComboBox::from_id_salt("date_column")
            .selected_text(&current)
            .show_ui(ui, |ui: &mut Ui| {
                for col in &date_cols {
                    if ui.selectable_label(current == *col, col).clicked() {
                        state.set_date_column(col.clone());
                    }
                }
            });
    }
    ui.add_space(6.0);

    // ---- Period granularity ----
    ui.strong("Time period");
    egui::ComboBox::from_id_salt("granularity")
        .selected_text(state.selection.granularity.label())
        .show_ui(ui, |ui: &mut Ui| {
            for g in Granularity::ALL {
                if ui
                    .selectable_label(state.selection.granularity == g, g.label())
                    .clicked()
                {
                    state.selection.granularity = g;
                }
            }
        });
    ui.add_space(6.0);

    // ---- Aggregation function ----
    ui.strong("Aggregation");
    egui::ComboBox::from_id_salt("aggregate")
        .selected_text(state.selection.aggregate.label())
        .show_ui(ui, |ui: &mut Ui| {
            for agg in Aggregate::ALL {
                if ui
                    .selectable_label(state.selection.aggregate == agg, agg.label())
                    .clicked()
                {
                    state.selection.aggregate = agg;
                }
            }
        });
    ui.add_space(6.0);

    // ---- Top-N ----
    ui.strong("Top segments");
    ui.add(Slider::new(&mut state.selection.top_n, 1..=25));
    ui.add_space(6.0);

    // ---- Date range ----
    if let Some((mut start, mut end)) = state.selection.date_range {
        ui.strong("Date range");
        ui.horizontal(|ui: &mut Ui| {
            ui.label("From");
            ui.add(DatePickerButton::new(&mut start).id_salt("range_start"));
        });
        ui.horizontal(|ui: &mut Ui| {
            ui.label("To");
            ui.add(DatePickerButton::new(&mut end).id_salt("range_end"));
        });
        if end < start {
            end = start;
        }
        state.selection.date_range = Some((start, end));

        if ui.small_button("Reset range").clicked() {
            state.reset_date_range();
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Load sample data").clicked() {
                state.load_sample();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Export analysis…").clicked() {
                export::export_analysis(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            let source = state.source_name.as_deref().unwrap_or("unknown");
            ui.label(format!(
                "{source}: {} rows × {} columns",
                table.len(),
                table.column_names().count()
            ));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open business data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
