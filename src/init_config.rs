// init_config.rs
// Handles loading and parsing the initial scene description from init_config.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config;
use crate::interaction::InteractionMatrix;
use crate::species::TypeRegistry;

#[derive(Debug, Deserialize, Serialize)]
pub struct InitConfig {
    pub arena: Option<ArenaConfig>,
    pub population: Option<PopulationConfig>,
    #[serde(default)]
    pub interactions: Vec<WeightEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ArenaConfig {
    /// Optional arena width. Falls back to the default when omitted.
    pub width: Option<f64>,
    /// Optional arena height. Falls back to the default when omitted.
    pub height: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PopulationConfig {
    pub count: Option<usize>,
    /// Seed for the spawn/jitter RNG; omitted means a nondeterministic run.
    pub seed: Option<u64>,
    /// Active type names; empty means every registered type.
    #[serde(default)]
    pub types: Vec<String>,
}

/// One cell of the interaction table, in panel weights.
#[derive(Debug, Deserialize, Serialize)]
pub struct WeightEntry {
    pub source: String,
    pub target: String,
    pub weight: i32,
}

impl InitConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let init: InitConfig = toml::from_str(&content)?;
        Ok(init)
    }

    pub fn load_default() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from_file("init_config.toml")
    }

    pub fn arena_size(&self) -> (f64, f64) {
        let arena = self.arena.as_ref();
        (
            arena
                .and_then(|a| a.width)
                .unwrap_or(config::DEFAULT_ARENA_WIDTH),
            arena
                .and_then(|a| a.height)
                .unwrap_or(config::DEFAULT_ARENA_HEIGHT),
        )
    }

    pub fn population_count(&self) -> usize {
        self.population
            .as_ref()
            .and_then(|p| p.count)
            .unwrap_or(config::DEFAULT_PARTICLE_COUNT)
    }

    pub fn seed(&self) -> Option<u64> {
        self.population.as_ref().and_then(|p| p.seed)
    }

    /// Resolve the configured type names against the registry.
    pub fn active_type_ids(&self, registry: &TypeRegistry) -> Result<Vec<usize>, String> {
        let names = self
            .population
            .as_ref()
            .map(|p| p.types.as_slice())
            .unwrap_or(&[]);
        if names.is_empty() {
            return Ok(registry.all_ids());
        }
        names
            .iter()
            .map(|name| {
                registry
                    .index_of(name)
                    .ok_or_else(|| format!("unknown type: {name}"))
            })
            .collect()
    }

    /// Build the interaction matrix from the configured weight entries;
    /// unlisted cells stay zero.
    pub fn build_matrix(&self, registry: &TypeRegistry) -> Result<InteractionMatrix, String> {
        let mut matrix = InteractionMatrix::new(registry.len());
        for entry in &self.interactions {
            let a = registry
                .index_of(&entry.source)
                .ok_or_else(|| format!("unknown source type: {}", entry.source))?;
            let b = registry
                .index_of(&entry.target)
                .ok_or_else(|| format!("unknown target type: {}", entry.target))?;
            matrix.set(a, b, f64::from(entry.weight) * config::WEIGHT_SCALE);
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [arena]
        width = 1600.0
        height = 900.0

        [population]
        count = 250
        seed = 7
        types = ["red", "green", "blue"]

        [[interactions]]
        source = "red"
        target = "green"
        weight = -4

        [[interactions]]
        source = "green"
        target = "red"
        weight = 2
    "#;

    #[test]
    fn parses_a_full_scene() {
        let init: InitConfig = toml::from_str(SAMPLE).unwrap();
        let registry = TypeRegistry::default_palette();

        assert_eq!(init.arena_size(), (1600.0, 900.0));
        assert_eq!(init.population_count(), 250);
        assert_eq!(init.seed(), Some(7));
        assert_eq!(init.active_type_ids(&registry).unwrap(), vec![0, 1, 2]);

        let matrix = init.build_matrix(&registry).unwrap();
        assert_eq!(
            matrix.coefficient(0, 1),
            Some(-4.0 * config::WEIGHT_SCALE)
        );
        assert_eq!(matrix.coefficient(1, 0), Some(2.0 * config::WEIGHT_SCALE));
        assert_eq!(matrix.coefficient(0, 2), Some(0.0));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let init: InitConfig = toml::from_str("").unwrap();
        let registry = TypeRegistry::default_palette();
        assert_eq!(
            init.arena_size(),
            (config::DEFAULT_ARENA_WIDTH, config::DEFAULT_ARENA_HEIGHT)
        );
        assert_eq!(init.population_count(), config::DEFAULT_PARTICLE_COUNT);
        assert_eq!(init.active_type_ids(&registry).unwrap().len(), registry.len());
    }

    #[test]
    fn unknown_type_name_is_an_error() {
        let doc = r#"
            [[interactions]]
            source = "magenta"
            target = "red"
            weight = 1
        "#;
        let init: InitConfig = toml::from_str(doc).unwrap();
        let registry = TypeRegistry::default_palette();
        assert!(init.build_matrix(&registry).is_err());
    }
}
