use ultraviolet::DVec2;

use crate::particle::Particle;
use crate::species::TypeRegistry;

/// Placement retries per particle before accepting an overlap.
pub const RANDOM_ATTEMPTS: usize = 100;

/// Spawn `count` particles with uniformly random positions inset from the
/// walls and a type drawn uniformly from the active set. Placement retries a
/// bounded number of times to avoid starting inside another disk; a crowded
/// arena falls back to overlapping spawns and lets the first collision passes
/// sort it out.
pub fn spawn_population(
    width: f64,
    height: f64,
    count: usize,
    active_types: &[usize],
    registry: &TypeRegistry,
    rng: &mut fastrand::Rng,
) -> Result<Vec<Particle>, String> {
    if count > 0 && active_types.is_empty() {
        return Err("cannot spawn particles with no active types".to_owned());
    }

    let mut particles = Vec::with_capacity(count);
    for _ in 0..count {
        let type_id = active_types[rng.usize(0..active_types.len())];
        let props = registry
            .props(type_id)
            .ok_or_else(|| format!("active type id {type_id} is not registered"))?;
        let radius = props.radius;
        if width <= 4.0 * radius || height <= 4.0 * radius {
            return Err(format!(
                "arena {width}x{height} cannot fit particles of radius {radius}"
            ));
        }

        let mut pos = random_inset_pos(width, height, radius, rng);
        for _ in 0..RANDOM_ATTEMPTS {
            if overlaps_any(&particles, pos, radius).is_none() {
                break;
            }
            pos = random_inset_pos(width, height, radius, rng);
        }
        particles.push(Particle::new(pos, radius, props.influence_radius, type_id));
    }
    Ok(particles)
}

// Inset by a full diameter so fresh spawns never start wall-clamped.
fn random_inset_pos(width: f64, height: f64, radius: f64, rng: &mut fastrand::Rng) -> DVec2 {
    DVec2::new(
        2.0 * radius + rng.f64() * (width - 4.0 * radius),
        2.0 * radius + rng.f64() * (height - 4.0 * radius),
    )
}

pub fn overlaps_any(existing: &[Particle], pos: DVec2, radius: f64) -> Option<usize> {
    existing
        .iter()
        .position(|p| (p.pos - pos).mag() < p.radius + radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::TypeRegistry;

    #[test]
    fn spawns_inside_the_inset_bounds() {
        let registry = TypeRegistry::default_palette();
        let mut rng = fastrand::Rng::with_seed(1);
        let particles =
            spawn_population(1280.0, 720.0, 200, &[0, 1, 2], &registry, &mut rng).unwrap();
        assert_eq!(particles.len(), 200);
        for p in &particles {
            assert!(p.pos.x >= 2.0 * p.radius && p.pos.x <= 1280.0 - 2.0 * p.radius);
            assert!(p.pos.y >= 2.0 * p.radius && p.pos.y <= 720.0 - 2.0 * p.radius);
            assert!([0, 1, 2].contains(&p.type_id));
            assert_eq!(p.pos, p.pos_old, "particles start at rest");
        }
    }

    #[test]
    fn rejects_unregistered_active_type() {
        let registry = TypeRegistry::default_palette();
        let mut rng = fastrand::Rng::with_seed(1);
        let err = spawn_population(1280.0, 720.0, 10, &[99], &registry, &mut rng);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_arena_smaller_than_a_particle() {
        let registry = TypeRegistry::default_palette();
        let mut rng = fastrand::Rng::with_seed(1);
        let err = spawn_population(4.0, 4.0, 1, &[0], &registry, &mut rng);
        assert!(err.is_err());
    }

    #[test]
    fn zero_count_needs_no_active_types() {
        let registry = TypeRegistry::default_palette();
        let mut rng = fastrand::Rng::with_seed(1);
        let particles = spawn_population(100.0, 100.0, 0, &[], &registry, &mut rng).unwrap();
        assert!(particles.is_empty());
    }
}
