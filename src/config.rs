// Centralized configuration for solver parameters

// ====================
// Arena
// ====================
pub const DEFAULT_ARENA_WIDTH: f64 = 1280.0;
pub const DEFAULT_ARENA_HEIGHT: f64 = 720.0;

// ====================
// Population
// ====================
pub const DEFAULT_PARTICLE_COUNT: usize = 400;
/// Contact radius used when a type does not override it.
pub const DEFAULT_RADIUS: f64 = 2.0;
/// Influence radius ("roe") used when a type does not override it.
pub const DEFAULT_INFLUENCE_RADIUS: f64 = 75.0;

// ====================
// Interaction
// ====================
/// Panel weights land in [-5, 5]; the solver works on `weight * WEIGHT_SCALE`.
pub const WEIGHT_SCALE: f64 = 1e-5;
pub const MIN_WEIGHT: i32 = -5;
pub const MAX_WEIGHT: i32 = 5;

// ====================
// Stepping
// ====================
/// Default frame delta in seconds (60 Hz).
pub const DEFAULT_DT: f64 = 1.0 / 60.0;
pub const DEFAULT_SUBSTEPS: u32 = 1;
/// Ceiling on the magnitude of pending acceleration accumulated in one step.
pub const MAX_PENDING_ACCEL: f64 = 1.0e3;
/// Orthogonal nudge applied when a wall-clamped particle has no lateral motion.
pub const WALL_JITTER: f64 = 0.1;

// ====================
// Spatial Grid
// ====================
// Cells must never be finer than the largest influence radius; the divisors
// bound the cell count for large arenas.
pub const GRID_COLS_DIVISOR: f64 = 100.0;
pub const GRID_ROWS_DIVISOR: f64 = 50.0;

// ====================
// Threading/Parallelism
// ====================
pub const MIN_THREADS: usize = 3; // Minimum number of threads to use
pub const THREADS_LEAVE_FREE: usize = 2; // Number of logical cores to leave free

// ====================
// Headless run
// ====================
pub const DEFAULT_RUN_FRAMES: u64 = 600;
/// Frames between stats lines in the headless loop.
pub const STATS_INTERVAL: u64 = 60;

use serde::{Deserialize, Serialize};

/// Runtime tuning shared with the configuration collaborator. The solver
/// clones this at the top of every `step`, so edits from another thread are
/// only ever observed between steps, never mid-step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Sub-steps per frame; each runs the full constrain/collide/integrate pass.
    pub substeps: u32,
    /// Frame delta handed to `step` by the headless loop.
    pub dt: f64,
    /// Magnitude of the anti-stall wall nudge; zero disables it.
    pub wall_jitter: f64,
    pub paused: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            substeps: DEFAULT_SUBSTEPS,
            dt: DEFAULT_DT,
            wall_jitter: WALL_JITTER,
            paused: false,
        }
    }
}

use once_cell::sync::Lazy;
use parking_lot::Mutex;

pub static SIM_CONFIG: Lazy<Mutex<SimConfig>> = Lazy::new(|| Mutex::new(SimConfig::default()));
