mod analysis;
mod app;
mod color;
mod data;
mod state;
mod ui;

use app::DataLensApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional file to analyze instead of the sample dataset.
    let initial_file = std::env::args().nth(1).map(std::path::PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "DataLens – Business Data Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DataLensApp::new(initial_file)))),
    )
}
