use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DataLensApp {
    pub state: AppState,
}

impl DataLensApp {
    /// Start with the generated sample dataset, optionally replaced by a
    /// file given on the command line.
    pub fn new(initial_file: Option<std::path::PathBuf>) -> Self {
        let mut state = AppState::default();
        state.load_sample();
        if let Some(path) = initial_file {
            state.load_path(&path);
        }
        Self { state }
    }
}

impl eframe::App for DataLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard sections, recomputed every frame ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    charts::summary_section(ui, &self.state);
                    ui.separator();
                    charts::timeseries_section(ui, &self.state);
                    ui.separator();
                    charts::segment_section(ui, &self.state);
                    ui.separator();
                    charts::correlation_section(ui, &self.state);
                });
        });
    }
}
