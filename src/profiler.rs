use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Scoped profiler accumulating wall time and call counts per section.
pub struct Profiler {
    sections: HashMap<&'static str, Section>,
}

#[derive(Clone, Copy, Default)]
pub struct Section {
    pub total: Duration,
    pub calls: u64,
}

impl Profiler {
    pub fn new() -> Self {
        Self {
            sections: HashMap::new(),
        }
    }

    pub fn finish(&mut self, guard: &ScopeGuard) {
        let section = self.sections.entry(guard.name).or_default();
        section.total += guard.start.elapsed();
        section.calls += 1;
    }

    /// Sections ordered by cumulative time, heaviest first.
    pub fn report_sorted(&self) -> Vec<(&'static str, Section)> {
        let mut entries: Vec<_> = self.sections.iter().map(|(n, s)| (*n, *s)).collect();
        entries.sort_by(|a, b| b.1.total.cmp(&a.1.total));
        entries
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }

    pub fn log_and_clear(&mut self) {
        for (name, section) in self.report_sorted() {
            let mean = section.total / section.calls.max(1) as u32;
            log::info!(
                "{:<14} {:>10.3?} over {} calls ({:.3?} mean)",
                name,
                section.total,
                section.calls,
                mean
            );
        }
        self.clear();
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ScopeGuard {
    name: &'static str,
    start: Instant,
}

/// Start a profiling section. The guard reports into the global profiler when
/// dropped (only when the `profiling` feature is enabled).
pub fn start(name: &'static str) -> ScopeGuard {
    ScopeGuard {
        name,
        start: Instant::now(),
    }
}

#[cfg(feature = "profiling")]
impl Drop for ScopeGuard {
    fn drop(&mut self) {
        crate::PROFILER.lock().finish(self);
    }
}

/// Profile a scope only when the `profiling` feature is enabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _guard = $crate::profiler::start($name);
    };
}
