use anyhow::{Context, Result};
use hdf5::types::FixedAscii;

/// Boltzmann constant in eV/K.
const K_B: f64 = 8.617333e-5;

const OUTPUT: &str = "vaspout.h5";

type Tag = FixedAscii<24>;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One synthetic trajectory: energies table plus forces tensor.
struct SampleRun {
    ibrion: i32,
    tags: Vec<&'static str>,
    energies: Vec<f64>,
    num_steps: usize,
    forces: Vec<f64>,
    num_atoms: usize,
}

/// An equilibrating NVT trajectory: temperature settles around 300 K while
/// the forces relax from the disordered starting structure.
fn md_run(rng: &mut SimpleRng) -> SampleRun {
    let num_steps = 60;
    let num_atoms = 8;
    let tags = vec![
        "ion-electron   TOTEN",
        "kinetic energy EKIN",
        "kin. lattice  EKIN_LAT",
        "temperature    TEIN",
        "nose potential ES",
        "nose kinetic   EPS",
        "total energy   ETOTAL",
    ];

    let mut energies = Vec::with_capacity(num_steps * tags.len());
    let mut forces = Vec::with_capacity(num_steps * num_atoms * 3);

    for step in 0..num_steps {
        let decay = (-(step as f64) / 15.0).exp();

        let temperature = rng.gauss(300.0 + 80.0 * decay, 12.0).max(0.0);
        let e_kin = 1.5 * num_atoms as f64 * K_B * temperature;
        let toten = -42.5 - 0.8 * decay + rng.gauss(0.0, 0.02);
        let nose_pot = 0.05 + rng.gauss(0.0, 0.01).abs();
        let nose_kin = 0.02 + rng.gauss(0.0, 0.005).abs();
        let etotal = toten + e_kin + nose_pot + nose_kin;

        energies.extend_from_slice(&[
            toten,
            e_kin,
            0.0,
            temperature,
            nose_pot,
            nose_kin,
            etotal,
        ]);

        let sigma = 0.1 + 1.4 * decay;
        for _ in 0..num_atoms * 3 {
            forces.push(rng.gauss(0.0, sigma));
        }
    }

    SampleRun {
        ibrion: 0,
        tags,
        energies,
        num_steps,
        forces,
        num_atoms,
    }
}

/// A conjugate-gradient style relaxation: energy and forces fall off
/// monotonically towards convergence.
fn relaxation_run(rng: &mut SimpleRng) -> SampleRun {
    let num_steps = 30;
    let num_atoms = 8;
    let tags = vec!["ion-electron   TOTEN", "energy(sigma->0)"];

    let mut energies = Vec::with_capacity(num_steps * tags.len());
    let mut forces = Vec::with_capacity(num_steps * num_atoms * 3);

    for step in 0..num_steps {
        let decay = (-(step as f64) / 6.0).exp();

        let toten = -45.0 - 2.5 * (1.0 - decay) + rng.gauss(0.0, 0.002);
        energies.extend_from_slice(&[toten, toten + 0.01 * decay]);

        let sigma = 0.02 + 1.8 * decay;
        for _ in 0..num_atoms * 3 {
            forces.push(rng.gauss(0.0, sigma));
        }
    }

    SampleRun {
        ibrion: 2,
        tags,
        energies,
        num_steps,
        forces,
        num_atoms,
    }
}

fn write_run(run: &SampleRun) -> Result<()> {
    let file = hdf5::File::create(OUTPUT).context("creating output file")?;

    let input = file.create_group("input")?;
    let incar = input.create_group("incar")?;
    incar
        .new_dataset::<i32>()
        .create("IBRION")?
        .write_scalar(&run.ibrion)?;

    let intermediate = file.create_group("intermediate")?;
    let ion_dynamics = intermediate.create_group("ion_dynamics")?;

    let tags: Vec<Tag> = run
        .tags
        .iter()
        .map(|t| Tag::from_ascii(t).expect("tag fits in fixed-width ASCII"))
        .collect();
    ion_dynamics
        .new_dataset::<Tag>()
        .shape(tags.len())
        .create("energies_tags")?
        .write_raw(&tags)?;

    ion_dynamics
        .new_dataset::<f64>()
        .shape((run.num_steps, run.tags.len()))
        .create("energies")?
        .write_raw(&run.energies)?;

    ion_dynamics
        .new_dataset::<f64>()
        .shape((run.num_steps, run.num_atoms, 3))
        .create("forces")?
        .write_raw(&run.forces)?;

    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let run = match std::env::args().nth(1).as_deref() {
        Some("relax") => relaxation_run(&mut rng),
        _ => md_run(&mut rng),
    };

    write_run(&run)?;

    println!(
        "Wrote {} steps × {} atoms (IBRION = {}) to {OUTPUT}",
        run.num_steps, run.num_atoms, run.ibrion
    );
    Ok(())
}
