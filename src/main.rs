mod app;
mod color;
mod data;
mod figure;
mod ui;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use eframe::egui;

use app::IonViewApp;
use data::loader;
use data::reduce::ForceSeries;

fn main() -> ExitCode {
    env_logger::init();

    let path = Path::new(loader::DEFAULT_FILE);
    if !path.exists() {
        // The one recoverable condition: no finished run in this directory.
        eprintln!(
            "{} not found: run ionview inside a finished VASP output directory",
            path.display()
        );
        return ExitCode::FAILURE;
    }

    match run(path) {
        Ok(()) => {
            println!("Done.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Load → reduce → compose → display. Any error here is fatal; there is no
/// partial or degraded output.
fn run(path: &Path) -> Result<()> {
    let trajectory = loader::load_file(path)?;
    let forces = ForceSeries::reduce(&trajectory.forces);
    let figure = figure::compose(trajectory.mode, &trajectory.energies, &forces)?;
    let app = IonViewApp::new(trajectory.mode, figure);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ionview – VASP convergence viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
