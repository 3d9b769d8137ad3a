#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use std::path::PathBuf;

use gantt_timeline::{io, telemetry};

/// Usage: `gantt-timeline [config.json] [tasks.json]`
fn main() -> eframe::Result<()> {
    let _ = telemetry::init_default_tracing();

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let config = io::load_config_or_default(args.next().as_deref());
    let tasks_path = args.next();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Gantt Timeline"),
        ..Default::default()
    };

    eframe::run_native(
        "Gantt Timeline",
        options,
        Box::new(move |cc| Ok(Box::new(app::GanttApp::new(cc, config, tasks_path)))),
    )
}
