use eframe::egui::{RichText, Ui};

use crate::data::model::RunMode;
use crate::figure::Figure;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the status bar: run mode and trajectory size.
pub fn top_bar(ui: &mut Ui, mode: RunMode, figure: &Figure) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("ionview").strong());
        ui.separator();
        ui.label(mode.to_string());
        ui.separator();
        ui.label(format!("{} ionic steps", figure.num_steps));
    });
}
