// Headless run loop: builds the thread pool, loads or improvises a scene,
// steps the solver at a fixed delta and logs interval stats.

use std::time::{Duration, Instant};

use crate::config;
use crate::init_config::InitConfig;
use crate::interaction::InteractionMatrix;
use crate::simulation::Solver;
use crate::species::TypeRegistry;

pub fn run(frames: u64) -> Result<(), Box<dyn std::error::Error>> {
    // Global rayon pool with threads = max(cores, MIN_THREADS) - THREADS_LEAVE_FREE
    let threads = std::thread::available_parallelism()?
        .get()
        .max(config::MIN_THREADS)
        - config::THREADS_LEAVE_FREE;
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;

    let registry = TypeRegistry::default_palette();
    let mut solver = match InitConfig::load_default() {
        Ok(init) => scene_from_init(&init, registry)?,
        Err(err) => {
            log::warn!("init_config.toml not loaded ({err}); using a random scene");
            random_scene(registry)?
        }
    };
    log::info!(
        "{} particles, {} active types, arena {}x{}",
        solver.particles.len(),
        solver.active_types.len(),
        solver.width,
        solver.height
    );

    let dt = config::SIM_CONFIG.lock().dt;
    let mut interval_start = Instant::now();
    for frame in 1..=frames {
        while config::SIM_CONFIG.lock().paused {
            std::thread::sleep(Duration::from_millis(50));
        }
        solver.step(dt);

        if frame % config::STATS_INTERVAL == 0 {
            let elapsed = interval_start.elapsed();
            let mean_ms = elapsed.as_secs_f64() * 1e3 / config::STATS_INTERVAL as f64;
            log::info!(
                "frame {frame:>6}  step {mean_ms:.3} ms  mean speed {:.4}",
                mean_speed(&solver)
            );
            #[cfg(feature = "profiling")]
            crate::PROFILER.lock().log_and_clear();
            interval_start = Instant::now();
        }
    }
    Ok(())
}

fn scene_from_init(init: &InitConfig, registry: TypeRegistry) -> Result<Solver, String> {
    let (width, height) = init.arena_size();
    let matrix = init.build_matrix(&registry)?;
    let active_types = init.active_type_ids(&registry)?;
    let rng = match init.seed() {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    Solver::new(
        width,
        height,
        init.population_count(),
        active_types,
        matrix,
        registry,
        rng,
    )
}

/// The configuration panel's startup behavior: each type enabled with 70%
/// probability, random weights in the panel range for every enabled row.
fn random_scene(registry: TypeRegistry) -> Result<Solver, String> {
    let mut rng = fastrand::Rng::new();
    let type_count = registry.len();
    let mut active_types = Vec::new();
    let mut rows = vec![vec![0_i32; type_count]; type_count];
    for a in 0..type_count {
        if rng.f64() >= 0.3 {
            active_types.push(a);
            for weight in rows[a].iter_mut() {
                *weight = rng.i32(config::MIN_WEIGHT..=config::MAX_WEIGHT);
            }
        }
    }
    if active_types.is_empty() {
        active_types.push(0);
    }
    Solver::new(
        config::DEFAULT_ARENA_WIDTH,
        config::DEFAULT_ARENA_HEIGHT,
        config::DEFAULT_PARTICLE_COUNT,
        active_types,
        InteractionMatrix::from_weights(&rows),
        registry,
        rng,
    )
}

/// Mean implicit-velocity magnitude across the population, for the stats line.
fn mean_speed(solver: &Solver) -> f64 {
    if solver.particles.is_empty() {
        return 0.0;
    }
    solver
        .particles
        .iter()
        .map(|p| p.velocity().mag())
        .sum::<f64>()
        / solver.particles.len() as f64
}
