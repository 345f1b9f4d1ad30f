use std::path::Path;

use anyhow::{bail, Context, Result};
use hdf5::types::FixedAscii;

use super::model::{EnergyTable, ForceTensor, RunMode, Trajectory};

/// Fixed input filename, looked up in the working directory.
pub const DEFAULT_FILE: &str = "vaspout.h5";

// Container paths, as VASP lays the file out.
const IBRION_PATH: &str = "input/incar/IBRION";
const TAGS_PATH: &str = "intermediate/ion_dynamics/energies_tags";
const ENERGIES_PATH: &str = "intermediate/ion_dynamics/energies";
const FORCES_PATH: &str = "intermediate/ion_dynamics/forces";

/// Longest tag VASP writes is ~22 bytes; 64 leaves headroom.
const MAX_TAG_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one finished run from a `vaspout.h5` container.
///
/// Everything is read in a single pass and the file handle is released
/// before this function returns, on success and on every failure path.
pub fn load_file(path: &Path) -> Result<Trajectory> {
    let file = hdf5::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let ibrion: i32 = file
        .dataset(IBRION_PATH)
        .context("locating the IBRION flag")?
        .read_scalar()
        .context("reading the IBRION flag")?;
    let mode = RunMode::classify(ibrion);

    let energies = load_energies(&file)?;
    let forces = load_forces(&file)?;

    log::info!(
        "loaded {} energy channels: {:?}",
        energies.num_channels(),
        energies.labels()
    );
    log::info!(
        "number of steps: {} ({} atoms)",
        forces.num_steps(),
        forces.num_atoms()
    );

    Ok(Trajectory::new(mode, energies, forces)?)
}

// ---------------------------------------------------------------------------
// Dataset readers
// ---------------------------------------------------------------------------

fn load_energies(file: &hdf5::File) -> Result<EnergyTable> {
    let tags = file
        .dataset(TAGS_PATH)
        .context("locating the energy channel tags")?;
    let raw_labels: Vec<String> = tags
        .read_raw::<FixedAscii<MAX_TAG_LEN>>()
        .context("reading the energy channel tags")?
        .iter()
        .map(|t| t.as_str().to_string())
        .collect();

    let dataset = file
        .dataset(ENERGIES_PATH)
        .context("locating the energies table")?;
    let shape = dataset.shape();
    let [num_steps, num_channels] = match shape[..] {
        [s, c] => [s, c],
        _ => bail!("energies dataset has rank {}, expected 2", shape.len()),
    };
    let data = dataset
        .read_raw::<f64>()
        .context("reading the energies table")?;

    Ok(EnergyTable::new(raw_labels, data, num_steps, num_channels)?)
}

fn load_forces(file: &hdf5::File) -> Result<ForceTensor> {
    let dataset = file
        .dataset(FORCES_PATH)
        .context("locating the forces tensor")?;
    let shape = dataset.shape();
    let data = dataset
        .read_raw::<f64>()
        .context("reading the forces tensor")?;

    Ok(ForceTensor::new(&shape, data)?)
}
