/// Data layer: core types, loading, and reduction.
///
/// Architecture:
/// ```text
///    vaspout.h5
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read IBRION, tags, energies, forces → Trajectory
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ Trajectory  │  RunMode + EnergyTable + ForceTensor
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  reduce   │  per-step mean/max force magnitude → ForceSeries
///   └──────────┘
/// ```
pub mod loader;
pub mod model;
pub mod reduce;
