use eframe::egui::{vec2, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::figure::{Figure, PanelSpec};

// ---------------------------------------------------------------------------
// Figure grid (central panel)
// ---------------------------------------------------------------------------

/// Lay the figure's panels out as a rows × cols grid filling the available
/// space, one plot widget per panel.
pub fn figure_grid(ui: &mut Ui, figure: &Figure, colors: &ColorMap) {
    let spacing = ui.spacing().item_spacing;
    let cell_h =
        (ui.available_height() - spacing.y * (figure.rows as f32 - 1.0)) / figure.rows as f32;

    for row in figure.panels.chunks(figure.cols) {
        ui.horizontal(|ui: &mut Ui| {
            let cell_w = (ui.available_width() - spacing.x * (row.len() as f32 - 1.0))
                / row.len() as f32;
            for spec in row {
                ui.allocate_ui(vec2(cell_w, cell_h), |ui: &mut Ui| {
                    panel_plot(ui, spec, colors, cell_w, cell_h);
                });
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Single panel
// ---------------------------------------------------------------------------

/// Render one panel: legend, axis labels, the spec's view bounds, and each
/// series as a line with point markers.
fn panel_plot(ui: &mut Ui, spec: &PanelSpec, colors: &ColorMap, width: f32, height: f32) {
    let mut plot = Plot::new(spec.id)
        .legend(Legend::default())
        .x_axis_label(spec.x_label)
        .y_axis_label(spec.y_label)
        .include_x(spec.x_range.0)
        .include_x(spec.x_range.1)
        .width(width)
        .height(height)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if let Some((y_min, y_max)) = spec.y_range {
        plot = plot.include_y(y_min).include_y(y_max);
    }

    plot.show(ui, |plot_ui| {
        for series in &spec.series {
            let color = colors.color_for(&series.label);

            let line_points: PlotPoints = series.points.clone().into();
            plot_ui.line(
                Line::new(line_points)
                    .name(&series.label)
                    .color(color)
                    .width(1.5),
            );

            // Same name so the markers share the line's legend entry.
            let marker_points: PlotPoints = series.points.clone().into();
            plot_ui.points(
                Points::new(marker_points)
                    .name(&series.label)
                    .color(color)
                    .radius(2.0),
            );
        }
    });
}
