use crate::data::model::{DataError, EnergyTable, RunMode};
use crate::data::reduce::ForceSeries;

// ---------------------------------------------------------------------------
// Canonical channel labels (as VASP writes them)
// ---------------------------------------------------------------------------

pub const TOTEN: &str = "ion-electron   TOTEN";
pub const TEMPERATURE: &str = "temperature    TEIN";
pub const NOSE_POTENTIAL: &str = "nose potential ES";
pub const NOSE_KINETIC: &str = "nose kinetic   EPS";
pub const ETOTAL: &str = "total energy   ETOTAL";

const X_LABEL: &str = "# Step";
const ENERGY_Y_LABEL: &str = "Energy (eV)";
const TEMPERATURE_Y_LABEL: &str = "Temperature (K)";
const FORCE_Y_LABEL: &str = "Force (eV/Å)";

// ---------------------------------------------------------------------------
// Figure model: what gets drawn, independent of how it gets drawn
// ---------------------------------------------------------------------------

/// One labeled per-step series, ready for plotting.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

impl SeriesSpec {
    fn from_values(label: impl Into<String>, values: &[f64]) -> Self {
        SeriesSpec {
            label: label.into(),
            points: values
                .iter()
                .enumerate()
                .map(|(step, &v)| [step as f64, v])
                .collect(),
        }
    }
}

/// One subplot: series bound to axis titles and view bounds.
#[derive(Debug, Clone)]
pub struct PanelSpec {
    /// Stable widget id for the renderer.
    pub id: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_range: (f64, f64),
    /// `None` lets the renderer fit the y axis to the data.
    pub y_range: Option<(f64, f64)>,
    pub series: Vec<SeriesSpec>,
}

/// The composed multi-panel figure: panels in row-major grid order.
#[derive(Debug, Clone)]
pub struct Figure {
    pub rows: usize,
    pub cols: usize,
    pub panels: Vec<PanelSpec>,
    pub num_steps: usize,
}

// ---------------------------------------------------------------------------
// Composition: RunMode → panel layout
// ---------------------------------------------------------------------------

/// Bind the extracted energy channels and the reduced force series to one of
/// the two fixed layouts.
///
/// Dynamics runs get a 2×2 grid (energies, temperature, thermostat, forces);
/// relaxation runs get two stacked panels (all energy channels, forces). A
/// channel referenced by the active layout but absent from the table is a
/// fatal [`DataError::MissingChannel`].
pub fn compose(
    mode: RunMode,
    energies: &EnergyTable,
    forces: &ForceSeries,
) -> Result<Figure, DataError> {
    let num_steps = energies.num_steps();
    let force_panel_y = Some((0.0, forces.peak()));
    let force_series = vec![
        SeriesSpec::from_values("Mean", &forces.mean),
        SeriesSpec::from_values("Max", &forces.max),
    ];

    match mode {
        RunMode::Dynamics => {
            // The single-step axis fallback applies to relaxation runs only.
            let x_range = (0.0, num_steps as f64);
            let panels = vec![
                PanelSpec {
                    id: "energy",
                    x_label: X_LABEL,
                    y_label: ENERGY_Y_LABEL,
                    x_range,
                    y_range: None,
                    series: channels(energies, &[TOTEN, ETOTAL])?,
                },
                PanelSpec {
                    id: "temperature",
                    x_label: X_LABEL,
                    y_label: TEMPERATURE_Y_LABEL,
                    x_range,
                    y_range: None,
                    series: channels(energies, &[TEMPERATURE])?,
                },
                PanelSpec {
                    id: "nose",
                    x_label: X_LABEL,
                    y_label: ENERGY_Y_LABEL,
                    x_range,
                    y_range: None,
                    series: channels(energies, &[NOSE_POTENTIAL, NOSE_KINETIC])?,
                },
                PanelSpec {
                    id: "forces",
                    x_label: X_LABEL,
                    y_label: FORCE_Y_LABEL,
                    x_range,
                    y_range: force_panel_y,
                    series: force_series,
                },
            ];
            Ok(Figure {
                rows: 2,
                cols: 2,
                panels,
                num_steps,
            })
        }
        RunMode::Relaxation => {
            let x_range = step_axis_range(num_steps);
            let all_labels: Vec<&str> =
                energies.labels().iter().map(String::as_str).collect();
            let panels = vec![
                PanelSpec {
                    id: "energy",
                    x_label: X_LABEL,
                    y_label: ENERGY_Y_LABEL,
                    x_range,
                    y_range: None,
                    series: channels(energies, &all_labels)?,
                },
                PanelSpec {
                    id: "forces",
                    x_label: X_LABEL,
                    y_label: FORCE_Y_LABEL,
                    x_range,
                    y_range: force_panel_y,
                    series: force_series,
                },
            ];
            Ok(Figure {
                rows: 2,
                cols: 1,
                panels,
                num_steps,
            })
        }
    }
}

/// X-axis range for a run of `num_steps` steps. A single-step run cannot
/// define a positive span, so it falls back to the symmetric `[-1, 1]`.
fn step_axis_range(num_steps: usize) -> (f64, f64) {
    if num_steps > 1 {
        (0.0, num_steps as f64)
    } else {
        (-1.0, 1.0)
    }
}

fn channels(energies: &EnergyTable, labels: &[&str]) -> Result<Vec<SeriesSpec>, DataError> {
    labels
        .iter()
        .map(|&label| {
            energies
                .column(label)
                .map(|values| SeriesSpec::from_values(label, &values))
                .ok_or_else(|| DataError::MissingChannel(label.to_string()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ForceTensor;

    /// Full MD channel set, `num_steps` rows, each channel filled with its
    /// own column index so series are easy to tell apart.
    fn md_table(num_steps: usize) -> EnergyTable {
        let labels: Vec<String> = vec![
            TOTEN.into(),
            "kinetic energy EKIN".into(),
            "kin. lattice  EKIN_LAT".into(),
            TEMPERATURE.into(),
            NOSE_POTENTIAL.into(),
            NOSE_KINETIC.into(),
            ETOTAL.into(),
        ];
        let cols = labels.len();
        let data: Vec<f64> = (0..num_steps)
            .flat_map(|_| (0..cols).map(|c| c as f64))
            .collect();
        EnergyTable::new(labels, data, num_steps, cols).unwrap()
    }

    fn relax_table(num_steps: usize) -> EnergyTable {
        let labels: Vec<String> = vec![TOTEN.into(), "energy(sigma->0)".into()];
        let data: Vec<f64> = (0..num_steps * 2).map(|i| i as f64).collect();
        EnergyTable::new(labels, data, num_steps, 2).unwrap()
    }

    fn series(num_steps: usize) -> ForceSeries {
        let data = vec![0.5; num_steps * 2 * 3];
        ForceSeries::reduce(&ForceTensor::new(&[num_steps, 2, 3], data).unwrap())
    }

    #[test]
    fn dynamics_layout_is_a_two_by_two_grid() {
        let fig = compose(RunMode::Dynamics, &md_table(10), &series(10)).unwrap();
        assert_eq!((fig.rows, fig.cols), (2, 2));
        assert_eq!(fig.panels.len(), 4);
        let ids: Vec<&str> = fig.panels.iter().map(|p| p.id).collect();
        assert_eq!(ids, ["energy", "temperature", "nose", "forces"]);
        for panel in &fig.panels {
            assert_eq!(panel.x_range, (0.0, 10.0));
            assert_eq!(panel.x_label, "# Step");
        }
    }

    #[test]
    fn dynamics_panels_bind_the_expected_channels() {
        let fig = compose(RunMode::Dynamics, &md_table(4), &series(4)).unwrap();
        let labels: Vec<Vec<&str>> = fig
            .panels
            .iter()
            .map(|p| p.series.iter().map(|s| s.label.as_str()).collect())
            .collect();
        assert_eq!(labels[0], [TOTEN, ETOTAL]);
        assert_eq!(labels[1], [TEMPERATURE]);
        assert_eq!(labels[2], [NOSE_POTENTIAL, NOSE_KINETIC]);
        assert_eq!(labels[3], ["Mean", "Max"]);
    }

    #[test]
    fn relaxation_layout_stacks_two_panels() {
        let fig = compose(RunMode::Relaxation, &relax_table(5), &series(5)).unwrap();
        assert_eq!((fig.rows, fig.cols), (2, 1));
        assert_eq!(fig.panels.len(), 2);
        // Every available channel lands in the energy panel.
        assert_eq!(fig.panels[0].series.len(), 2);
        assert_eq!(fig.panels[0].x_range, (0.0, 5.0));
    }

    #[test]
    fn single_step_relaxation_falls_back_to_symmetric_axis() {
        let fig = compose(RunMode::Relaxation, &relax_table(1), &series(1)).unwrap();
        for panel in &fig.panels {
            assert_eq!(panel.x_range, (-1.0, 1.0));
        }
    }

    #[test]
    fn force_panel_is_clamped_at_zero_with_observed_peak() {
        let forces = ForceSeries::reduce(
            &ForceTensor::new(&[2, 1, 3], vec![3.0, 0.0, 0.0, 0.0, 4.0, 0.0]).unwrap(),
        );
        let fig = compose(RunMode::Relaxation, &relax_table(2), &forces).unwrap();
        let force_panel = fig.panels.last().unwrap();
        assert_eq!(force_panel.y_range, Some((0.0, 4.0)));
        // Energy panels stay auto-fitted.
        assert_eq!(fig.panels[0].y_range, None);
    }

    #[test]
    fn dynamics_without_temperature_channel_fails() {
        let labels: Vec<String> = vec![TOTEN.into(), ETOTAL.into()];
        let table = EnergyTable::new(labels, vec![0.0; 6], 3, 2).unwrap();
        let err = compose(RunMode::Dynamics, &table, &series(3)).unwrap_err();
        assert_eq!(err, DataError::MissingChannel(TEMPERATURE.to_string()));
    }

    #[test]
    fn relaxation_never_references_thermostat_channels() {
        // A relaxation table has no temperature or Nosé channels; composing
        // must succeed without asking for them.
        let fig = compose(RunMode::Relaxation, &relax_table(3), &series(3)).unwrap();
        for panel in &fig.panels {
            for s in &panel.series {
                assert_ne!(s.label, TEMPERATURE);
                assert_ne!(s.label, NOSE_POTENTIAL);
                assert_ne!(s.label, NOSE_KINETIC);
            }
        }
    }

    #[test]
    fn series_points_are_indexed_by_step() {
        let fig = compose(RunMode::Relaxation, &relax_table(3), &series(3)).unwrap();
        let toten = &fig.panels[0].series[0];
        assert_eq!(toten.points, vec![[0.0, 0.0], [1.0, 2.0], [2.0, 4.0]]);
    }
}
