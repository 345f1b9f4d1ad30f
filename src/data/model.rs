use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// DataError – fatal inconsistencies in the loaded run
// ---------------------------------------------------------------------------

/// Data-integrity errors. None of these are recoverable: the container is
/// assumed self-consistent, so any of them means a corrupted or truncated run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("energy label count ({labels}) does not match table columns ({columns})")]
    SchemaMismatch { labels: usize, columns: usize },

    #[error("invalid force tensor shape: {0}")]
    InvalidTensorShape(String),

    #[error("energy channel '{0}' is not present in this run")]
    MissingChannel(String),
}

// ---------------------------------------------------------------------------
// RunMode – MD vs ionic relaxation
// ---------------------------------------------------------------------------

/// What the simulation did: time-integrated dynamics or geometry optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Dynamics,
    Relaxation,
}

impl RunMode {
    /// Classify a run from the INCAR `IBRION` flag: `0` is molecular dynamics,
    /// everything else is one of the relaxation algorithms, which are not
    /// distinguished further here.
    pub fn classify(ibrion: i32) -> Self {
        if ibrion == 0 {
            log::info!("MD simulation detected (IBRION = 0)");
            RunMode::Dynamics
        } else {
            log::info!("ion relaxation detected (IBRION = {ibrion})");
            RunMode::Relaxation
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Dynamics => write!(f, "Molecular dynamics"),
            RunMode::Relaxation => write!(f, "Ion relaxation"),
        }
    }
}

// ---------------------------------------------------------------------------
// Label normalization
// ---------------------------------------------------------------------------

/// Canonicalize one energy-channel label.
///
/// The container stores the tags as fixed-width byte strings; depending on
/// how they were written and decoded they can arrive padded with NUL/space
/// bytes or wrapped in a stringified byte literal (`b'...'`). Normalization
/// happens exactly once, here, so the rest of the pipeline only ever sees
/// canonical labels like `"ion-electron   TOTEN"`.
pub fn normalize_label(raw: &str) -> String {
    let s = raw.trim_end_matches(['\0', ' ']);
    let s = s
        .strip_prefix("b'")
        .or_else(|| s.strip_prefix("b\""))
        .unwrap_or(s);
    let s = s
        .strip_suffix('\'')
        .or_else(|| s.strip_suffix('"'))
        .unwrap_or(s);
    s.trim_end_matches(['\0', ' ']).to_string()
}

// ---------------------------------------------------------------------------
// EnergyTable – per-step energy channels, addressed by label
// ---------------------------------------------------------------------------

/// The (steps × channels) energies table with its channel labels.
///
/// Columns are looked up by canonical label, never by hardcoded index, so the
/// panel layouts survive schema reordering.
#[derive(Debug, Clone)]
pub struct EnergyTable {
    labels: Vec<String>,
    index: BTreeMap<String, usize>,
    /// Row-major: `data[step * num_channels + channel]`.
    data: Vec<f64>,
    num_steps: usize,
    num_channels: usize,
}

impl EnergyTable {
    /// Build the table from raw labels and a flat row-major value buffer.
    /// Labels are normalized here; a count disagreement between labels and
    /// columns is a fatal schema error.
    pub fn new(
        raw_labels: Vec<String>,
        data: Vec<f64>,
        num_steps: usize,
        num_channels: usize,
    ) -> Result<Self, DataError> {
        if raw_labels.len() != num_channels {
            return Err(DataError::SchemaMismatch {
                labels: raw_labels.len(),
                columns: num_channels,
            });
        }
        if data.len() != num_steps * num_channels {
            return Err(DataError::SchemaMismatch {
                labels: num_channels,
                columns: data.len() / num_steps.max(1),
            });
        }

        let labels: Vec<String> = raw_labels.iter().map(|l| normalize_label(l)).collect();
        let index: BTreeMap<String, usize> = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();

        Ok(EnergyTable {
            labels,
            index,
            data,
            num_steps,
            num_channels,
        })
    }

    /// Canonical channel labels, in column order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Column index of a channel, if present.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Copy out one channel as a per-step series.
    pub fn column(&self, label: &str) -> Option<Vec<f64>> {
        let col = self.index_of(label)?;
        Some(
            (0..self.num_steps)
                .map(|step| self.data[step * self.num_channels + col])
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// ForceTensor – per-step, per-atom force vectors
// ---------------------------------------------------------------------------

/// The (steps × atoms × 3) force tensor, stored flat in row-major order.
#[derive(Debug, Clone)]
pub struct ForceTensor {
    num_steps: usize,
    num_atoms: usize,
    data: Vec<f64>,
}

impl ForceTensor {
    /// Validate the dataset shape and take ownership of the flat buffer.
    ///
    /// Rejected shapes: rank ≠ 3, axis dimension ≠ 3, zero atoms or zero
    /// steps (mean/max over an empty set has no meaningful value), and a
    /// buffer that does not match the declared extents.
    pub fn new(shape: &[usize], data: Vec<f64>) -> Result<Self, DataError> {
        let [num_steps, num_atoms, axes] = match *shape {
            [s, a, x] => [s, a, x],
            _ => {
                return Err(DataError::InvalidTensorShape(format!(
                    "expected rank 3, got rank {}",
                    shape.len()
                )))
            }
        };
        if axes != 3 {
            return Err(DataError::InvalidTensorShape(format!(
                "axis dimension is {axes}, expected 3"
            )));
        }
        if num_atoms == 0 {
            return Err(DataError::InvalidTensorShape("zero atoms".into()));
        }
        if num_steps == 0 {
            return Err(DataError::InvalidTensorShape("zero steps".into()));
        }
        if data.len() != num_steps * num_atoms * 3 {
            return Err(DataError::InvalidTensorShape(format!(
                "{} values for {num_steps}×{num_atoms}×3 extents",
                data.len()
            )));
        }

        Ok(ForceTensor {
            num_steps,
            num_atoms,
            data,
        })
    }

    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    pub fn num_atoms(&self) -> usize {
        self.num_atoms
    }

    /// One atom's force vector at one step.
    pub fn vector(&self, step: usize, atom: usize) -> [f64; 3] {
        let base = (step * self.num_atoms + atom) * 3;
        [self.data[base], self.data[base + 1], self.data[base + 2]]
    }
}

// ---------------------------------------------------------------------------
// Trajectory – one fully loaded run
// ---------------------------------------------------------------------------

/// Everything the pipeline needs from one finished run, loaded in a single
/// pass and immutable from here on.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub mode: RunMode,
    pub energies: EnergyTable,
    pub forces: ForceTensor,
}

impl Trajectory {
    /// Combine the loaded pieces, checking that energies and forces describe
    /// the same number of ionic steps.
    pub fn new(
        mode: RunMode,
        energies: EnergyTable,
        forces: ForceTensor,
    ) -> Result<Self, DataError> {
        if energies.num_steps() != forces.num_steps() {
            return Err(DataError::InvalidTensorShape(format!(
                "energies cover {} steps but forces cover {}",
                energies.num_steps(),
                forces.num_steps()
            )));
        }
        Ok(Trajectory {
            mode,
            energies,
            forces,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ibrion_zero_is_dynamics() {
        assert_eq!(RunMode::classify(0), RunMode::Dynamics);
    }

    #[test]
    fn any_nonzero_ibrion_is_relaxation() {
        assert_eq!(RunMode::classify(2), RunMode::Relaxation);
        assert_eq!(RunMode::classify(-1), RunMode::Relaxation);
    }

    #[test]
    fn byte_literal_wrapper_is_stripped() {
        assert_eq!(
            normalize_label("b'ion-electron   TOTEN'"),
            "ion-electron   TOTEN"
        );
    }

    #[test]
    fn padding_is_trimmed_but_inner_spacing_kept() {
        assert_eq!(
            normalize_label("temperature    TEIN\0\0  "),
            "temperature    TEIN"
        );
        // Already-canonical labels pass through untouched.
        assert_eq!(normalize_label("nose potential ES"), "nose potential ES");
    }

    #[test]
    fn label_count_mismatch_is_rejected() {
        let err = EnergyTable::new(vec!["a".into(), "b".into()], vec![0.0; 6], 2, 3)
            .unwrap_err();
        assert_eq!(err, DataError::SchemaMismatch { labels: 2, columns: 3 });
    }

    #[test]
    fn columns_are_found_by_normalized_label() {
        let table = EnergyTable::new(
            vec![
                "b'ion-electron   TOTEN'".into(),
                "b'total energy   ETOTAL'".into(),
            ],
            vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0],
            3,
            2,
        )
        .unwrap();
        assert_eq!(
            table.column("ion-electron   TOTEN").unwrap(),
            vec![1.0, 2.0, 3.0]
        );
        assert_eq!(
            table.column("total energy   ETOTAL").unwrap(),
            vec![10.0, 20.0, 30.0]
        );
        assert!(table.column("temperature    TEIN").is_none());
    }

    #[test]
    fn zero_atom_tensor_is_rejected() {
        assert!(matches!(
            ForceTensor::new(&[4, 0, 3], vec![]),
            Err(DataError::InvalidTensorShape(_))
        ));
    }

    #[test]
    fn axis_dimension_must_be_three() {
        assert!(matches!(
            ForceTensor::new(&[2, 2, 2], vec![0.0; 8]),
            Err(DataError::InvalidTensorShape(_))
        ));
    }

    #[test]
    fn tensor_rank_must_be_three() {
        assert!(matches!(
            ForceTensor::new(&[4, 6], vec![0.0; 24]),
            Err(DataError::InvalidTensorShape(_))
        ));
    }

    #[test]
    fn step_count_mismatch_is_rejected() {
        let energies = EnergyTable::new(vec!["e".into()], vec![0.0, 1.0], 2, 1).unwrap();
        let forces = ForceTensor::new(&[3, 1, 3], vec![0.0; 9]).unwrap();
        assert!(matches!(
            Trajectory::new(RunMode::Relaxation, energies, forces),
            Err(DataError::InvalidTensorShape(_))
        ));
    }
}
