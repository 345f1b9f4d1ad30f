use eframe::egui;

use crate::color::ColorMap;
use crate::data::model::RunMode;
use crate::figure::Figure;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

/// The viewer window around one composed, immutable figure.
pub struct IonViewApp {
    mode: RunMode,
    figure: Figure,
    colors: ColorMap,
}

impl IonViewApp {
    pub fn new(mode: RunMode, figure: Figure) -> Self {
        let colors = ColorMap::for_figure(&figure);
        Self {
            mode,
            figure,
            colors,
        }
    }
}

impl eframe::App for IonViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: status bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, self.mode, &self.figure);
        });

        // ---- Central panel: the convergence figure ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::figure_grid(ui, &self.figure, &self.colors);
        });
    }
}
