pub mod app;
pub mod cell_list;
pub mod commands;
pub mod config;
pub mod init_config;
pub mod interaction;
pub mod io;
pub mod particle;
pub mod profiler;
pub mod simulation;
pub mod species;
pub mod utils;
pub mod vector;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
