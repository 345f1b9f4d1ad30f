use super::model::ForceTensor;

// ---------------------------------------------------------------------------
// Force reduction: (steps × atoms × 3) → two per-step series
// ---------------------------------------------------------------------------

/// Per-step force-magnitude statistics derived from a [`ForceTensor`].
///
/// For every step the Euclidean magnitude of each atom's force vector is
/// taken, then averaged and maximized over the atoms. Magnitudes are
/// non-negative by construction and `mean[i] <= max[i]` holds at every step.
#[derive(Debug, Clone)]
pub struct ForceSeries {
    pub mean: Vec<f64>,
    pub max: Vec<f64>,
}

impl ForceSeries {
    /// Reduce the full tensor. One pass, running sum and running max per
    /// step; only the two per-step output series are retained.
    pub fn reduce(forces: &ForceTensor) -> Self {
        let num_steps = forces.num_steps();
        let num_atoms = forces.num_atoms();

        let mut mean = Vec::with_capacity(num_steps);
        let mut max = Vec::with_capacity(num_steps);

        for step in 0..num_steps {
            let mut sum = 0.0_f64;
            let mut peak = 0.0_f64;
            for atom in 0..num_atoms {
                let [fx, fy, fz] = forces.vector(step, atom);
                let magnitude = (fx * fx + fy * fy + fz * fz).sqrt();
                sum += magnitude;
                peak = peak.max(magnitude);
            }
            mean.push(sum / num_atoms as f64);
            max.push(peak);
        }

        ForceSeries { mean, max }
    }

    /// Largest per-step maximum, used as the force panel's upper y bound.
    pub fn peak(&self) -> f64 {
        self.max.iter().copied().fold(0.0_f64, f64::max)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
