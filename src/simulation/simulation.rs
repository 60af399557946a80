// simulation/simulation.rs
// Contains the Solver struct and main methods (new, reset, step)

use rayon::prelude::*;

use super::resolve;
use crate::cell_list::CellList;
use crate::config::{self, SimConfig};
use crate::interaction::InteractionMatrix;
use crate::particle::Particle;
use crate::profile_scope;
use crate::species::TypeRegistry;
use crate::utils;

/// The solver: per-step boundary containment, grid rebuild, pairwise
/// collision/coupling resolution and Verlet integration over one particle
/// population in a bounded arena.
pub struct Solver {
    pub width: f64,
    pub height: f64,
    pub frame: usize,
    pub particles: Vec<Particle>,
    pub matrix: InteractionMatrix,
    pub registry: TypeRegistry,
    /// Type ids eligible for spawning; edited between resets.
    pub active_types: Vec<usize>,
    pub cell_list: CellList,
    /// Snapshot of the shared tuning, refreshed at the top of every `step`.
    pub config: SimConfig,
    pub rng: fastrand::Rng,
    /// Population size used by the next `reset`.
    pub particle_count: usize,
}

impl Solver {
    /// Build a solver and spawn its population. Misconfiguration fails here,
    /// not mid-simulation: once stepping has begun, out-of-range matrix
    /// lookups silently mean "no interaction".
    pub fn new(
        width: f64,
        height: f64,
        particle_count: usize,
        active_types: Vec<usize>,
        matrix: InteractionMatrix,
        registry: TypeRegistry,
        rng: fastrand::Rng,
    ) -> Result<Self, String> {
        if !(width > 0.0) || !(height > 0.0) {
            return Err(format!("arena must be positive, got {width}x{height}"));
        }
        if registry.is_empty() {
            return Err("type registry is empty".to_owned());
        }
        if matrix.type_count() < registry.len() {
            return Err(format!(
                "interaction matrix covers {} types but {} are registered",
                matrix.type_count(),
                registry.len()
            ));
        }
        if let Some(&id) = active_types.iter().find(|&&id| id >= registry.len()) {
            return Err(format!(
                "active type id {id} out of range for {} registered types",
                registry.len()
            ));
        }

        let mut rng = rng;
        let particles = utils::spawn_population(
            width,
            height,
            particle_count,
            &active_types,
            &registry,
            &mut rng,
        )?;
        let cell_list = CellList::new(width, height, max_influence_radius(&particles));
        log::info!(
            "spatial grid: {}x{} cells of {:.1}x{:.1}",
            cell_list.n_cols(),
            cell_list.n_rows(),
            cell_list.cell_width,
            cell_list.cell_height,
        );

        Ok(Self {
            width,
            height,
            frame: 0,
            particles,
            matrix,
            registry,
            active_types,
            cell_list,
            config: SimConfig::default(),
            rng,
            particle_count,
        })
    }

    /// Discard and respawn the whole population from the current particle
    /// count, active types and matrix. The grid geometry is recomputed since
    /// the largest influence radius may have changed.
    pub fn reset(&mut self) -> Result<(), String> {
        self.particles = utils::spawn_population(
            self.width,
            self.height,
            self.particle_count,
            &self.active_types,
            &self.registry,
            &mut self.rng,
        )?;
        self.cell_list = CellList::new(
            self.width,
            self.height,
            max_influence_radius(&self.particles),
        );
        self.frame = 0;
        log::debug!("reset: {} particles respawned", self.particles.len());
        Ok(())
    }

    /// Advance the simulation by `dt` seconds, reading the shared tuning once
    /// so concurrent edits are never observed partially.
    pub fn step(&mut self, dt: f64) {
        let tuning = config::SIM_CONFIG.lock().clone();
        self.step_with(dt, tuning);
    }

    /// Advance by `dt` under an explicit tuning snapshot. Each sub-step runs
    /// containment, grid rebuild, pairwise resolution and integration; a final
    /// containment pass leaves every disk inside the arena when the step
    /// returns.
    pub fn step_with(&mut self, dt: f64, tuning: SimConfig) {
        profile_scope!("step");
        self.config = tuning;
        let substeps = self.config.substeps.max(1);
        let sub_dt = dt / f64::from(substeps);

        for _ in 0..substeps {
            self.apply_bounds();
            {
                profile_scope!("grid_rebuild");
                self.cell_list.rebuild(&self.particles);
            }
            resolve::resolve(self);
            self.integrate(sub_dt);
        }
        self.apply_bounds();

        self.frame += 1;
    }

    /// Clamp every disk into `[0, width] x [0, height]`. A clamped particle
    /// whose motion along the orthogonal axis is exactly zero gets a small
    /// seeded nudge on that axis, so nothing sits motionless in a corner.
    fn apply_bounds(&mut self) {
        profile_scope!("bounds");
        let width = self.width;
        let height = self.height;
        let jitter = self.config.wall_jitter;

        for p in &mut self.particles {
            let vel = p.pos - p.pos_old;
            let mut clamped_x = false;
            let mut clamped_y = false;

            if p.pos.x + p.radius > width {
                p.pos.x = width - p.radius;
                clamped_x = true;
            }
            if p.pos.x - p.radius < 0.0 {
                p.pos.x = p.radius;
                clamped_x = true;
            }
            if p.pos.y + p.radius > height {
                p.pos.y = height - p.radius;
                clamped_y = true;
            }
            if p.pos.y - p.radius < 0.0 {
                p.pos.y = p.radius;
                clamped_y = true;
            }

            if jitter > 0.0 {
                if clamped_x && vel.y == 0.0 {
                    let nudge = (self.rng.f64() - 0.5) * jitter;
                    p.pos.y = (p.pos.y + nudge).clamp(p.radius, height - p.radius);
                }
                if clamped_y && vel.x == 0.0 {
                    let nudge = (self.rng.f64() - 0.5) * jitter;
                    p.pos.x = (p.pos.x + nudge).clamp(p.radius, width - p.radius);
                }
            }
        }
    }

    fn integrate(&mut self, dt: f64) {
        profile_scope!("integrate");
        self.particles.par_iter_mut().for_each(|p| p.integrate(dt));
    }
}

fn max_influence_radius(particles: &[Particle]) -> f64 {
    particles
        .iter()
        .map(|p| p.influence_radius)
        .fold(0.0, f64::max)
}
