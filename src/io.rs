// Gzipped JSON snapshots of the full solver state, restorable into a running
// solver between steps.

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::cell_list::CellList;
use crate::config::SimConfig;
use crate::interaction::InteractionMatrix;
use crate::particle::Particle;
use crate::simulation::Solver;
use crate::species::TypeRegistry;

#[derive(Clone, Serialize, Deserialize)]
pub struct SolverState {
    pub width: f64,
    pub height: f64,
    pub frame: usize,
    pub particles: Vec<Particle>,
    pub matrix: InteractionMatrix,
    pub registry: TypeRegistry,
    pub active_types: Vec<usize>,
    pub particle_count: usize,
}

pub fn capture(solver: &Solver) -> SolverState {
    SolverState {
        width: solver.width,
        height: solver.height,
        frame: solver.frame,
        particles: solver.particles.clone(),
        matrix: solver.matrix.clone(),
        registry: solver.registry.clone(),
        active_types: solver.active_types.clone(),
        particle_count: solver.particle_count,
    }
}

/// Rebuild a solver from a snapshot. The spatial grid is derived state and is
/// reconstructed from scratch; the caller supplies the RNG since snapshots
/// carry none.
pub fn restore(state: SolverState, rng: fastrand::Rng) -> Solver {
    let max_roe = state
        .particles
        .iter()
        .map(|p| p.influence_radius)
        .fold(0.0, f64::max);
    let cell_list = CellList::new(state.width, state.height, max_roe);
    Solver {
        width: state.width,
        height: state.height,
        frame: state.frame,
        particles: state.particles,
        matrix: state.matrix,
        registry: state.registry,
        active_types: state.active_types,
        cell_list,
        config: SimConfig::default(),
        rng,
        particle_count: state.particle_count,
    }
}

pub fn save_state<P: AsRef<Path>>(
    state: &SolverState,
    path: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, state)?;
    encoder.finish()?;
    Ok(())
}

pub fn load_state<P: AsRef<Path>>(path: P) -> Result<SolverState, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let state = serde_json::from_reader(decoder)?;
    Ok(state)
}
