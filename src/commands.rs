// Commands issued by the configuration collaborator. Applied strictly
// between steps, so the solver never observes a half-edited matrix or a
// population swap mid-step.

use std::path::PathBuf;

use crate::config;
use crate::io;
use crate::simulation::Solver;

#[derive(Clone, Debug)]
pub enum SimCommand {
    /// Set a raw coefficient on the ordered (source, target) cell.
    SetCoefficient {
        source: usize,
        target: usize,
        value: f64,
    },
    /// Set a panel weight, scaled the way the panel scales them.
    SetWeight {
        source: usize,
        target: usize,
        weight: i32,
    },
    /// Resize the matrix after types were added or removed; takes effect
    /// immediately, population changes wait for the next `Reset`.
    ResizeMatrix { type_count: usize },
    SetActiveTypes { type_ids: Vec<usize> },
    SetParticleCount { count: usize },
    /// Respawn the population from the current count, types and matrix.
    Reset,
    SaveState { path: PathBuf },
    LoadState { path: PathBuf },
}

pub fn dispatch(solver: &mut Solver, command: SimCommand) -> Result<(), String> {
    match command {
        SimCommand::SetCoefficient {
            source,
            target,
            value,
        } => {
            solver.matrix.set(source, target, value);
            Ok(())
        }
        SimCommand::SetWeight {
            source,
            target,
            weight,
        } => {
            solver
                .matrix
                .set(source, target, f64::from(weight) * config::WEIGHT_SCALE);
            Ok(())
        }
        SimCommand::ResizeMatrix { type_count } => {
            solver.matrix.resize(type_count);
            Ok(())
        }
        SimCommand::SetActiveTypes { type_ids } => {
            if let Some(&id) = type_ids.iter().find(|&&id| id >= solver.registry.len()) {
                return Err(format!(
                    "active type id {id} out of range for {} registered types",
                    solver.registry.len()
                ));
            }
            solver.active_types = type_ids;
            Ok(())
        }
        SimCommand::SetParticleCount { count } => {
            solver.particle_count = count;
            Ok(())
        }
        SimCommand::Reset => solver.reset(),
        SimCommand::SaveState { path } => {
            io::save_state(&io::capture(solver), &path)
                .map_err(|err| format!("save {}: {err}", path.display()))
        }
        SimCommand::LoadState { path } => {
            let state =
                io::load_state(&path).map_err(|err| format!("load {}: {err}", path.display()))?;
            let rng = solver.rng.clone();
            *solver = io::restore(state, rng);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::interaction::InteractionMatrix;
    use crate::species::TypeRegistry;

    fn solver() -> Solver {
        let registry = TypeRegistry::default_palette();
        Solver::new(
            1000.0,
            500.0,
            25,
            registry.all_ids(),
            InteractionMatrix::new(registry.len()),
            registry,
            fastrand::Rng::with_seed(3),
        )
        .unwrap()
    }

    #[test]
    fn weight_commands_scale_like_the_panel() {
        let mut solver = solver();
        dispatch(
            &mut solver,
            SimCommand::SetWeight {
                source: 0,
                target: 1,
                weight: -5,
            },
        )
        .unwrap();
        assert_eq!(
            solver.matrix.coefficient(0, 1),
            Some(-5.0 * config::WEIGHT_SCALE)
        );
        assert_eq!(solver.matrix.coefficient(1, 0), Some(0.0));
    }

    #[test]
    fn active_type_validation() {
        let mut solver = solver();
        let err = dispatch(
            &mut solver,
            SimCommand::SetActiveTypes {
                type_ids: vec![0, 42],
            },
        );
        assert!(err.is_err());

        dispatch(
            &mut solver,
            SimCommand::SetActiveTypes {
                type_ids: vec![1, 2],
            },
        )
        .unwrap();
        dispatch(&mut solver, SimCommand::SetParticleCount { count: 12 }).unwrap();
        dispatch(&mut solver, SimCommand::Reset).unwrap();

        assert_eq!(solver.particles.len(), 12);
        assert!(solver
            .particles
            .iter()
            .all(|p| p.type_id == 1 || p.type_id == 2));
    }

    #[test]
    fn save_and_load_round_trip() {
        let mut solver = solver();
        solver.step_with(1.0 / 60.0, SimConfig::default());
        let expected: Vec<u64> = solver.particles.iter().map(|p| p.pos.x.to_bits()).collect();

        let path = std::env::temp_dir().join("verlet_life_command_roundtrip.json.gz");
        dispatch(&mut solver, SimCommand::SaveState { path: path.clone() }).unwrap();

        // drift the state, then restore it
        solver.step_with(1.0 / 60.0, SimConfig::default());
        dispatch(&mut solver, SimCommand::LoadState { path: path.clone() }).unwrap();
        std::fs::remove_file(&path).ok();

        let actual: Vec<u64> = solver.particles.iter().map(|p| p.pos.x.to_bits()).collect();
        assert_eq!(actual, expected);
    }
}
