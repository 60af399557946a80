// simulation/resolve.rs
// Pairwise collision and type-coupling resolution over the spatial grid.

use crate::profile_scope;
use crate::simulation::Solver;
use crate::vector;

/// Sweep every interior grid cell, gather its 3x3 neighborhood and resolve
/// all ordered particle pairs in it. Border-ring cells are skipped as centers
/// (their particles still appear as neighbors of interior cells); each
/// unordered pair is visited in both orders on purpose, since the directed
/// couplings are keyed by ordered type pair.
pub fn resolve(solver: &mut Solver) {
    profile_scope!("resolve");
    let n_cols = solver.cell_list.n_cols();
    let n_rows = solver.cell_list.n_rows();
    if n_cols < 3 || n_rows < 3 {
        return; // no interior cells to sweep
    }

    for col in 1..n_cols - 1 {
        for row in 1..n_rows - 1 {
            let indices = solver.cell_list.neighborhood(col, row);
            if indices.len() <= 1 {
                continue;
            }
            for k in 0..indices.len() {
                for l in 0..indices.len() {
                    if k == l {
                        continue;
                    }
                    resolve_pair(solver, indices[k], indices[l]);
                }
            }
        }
    }
}

/// Resolve one ordered pair: separate overlapping disks by pure positional
/// correction, then apply the two independent directed couplings. The
/// separation axis is computed once from the pre-correction positions and
/// reused by the coupling checks.
fn resolve_pair(solver: &mut Solver, i: usize, j: usize) {
    let (axis, p_radius, p_roe, p_type, q_radius, q_roe, q_type) = {
        let p = &solver.particles[i];
        let q = &solver.particles[j];
        (
            p.pos - q.pos,
            p.radius,
            p.influence_radius,
            p.type_id,
            q.radius,
            q.influence_radius,
            q.type_id,
        )
    };
    let mag = axis.mag();
    let n = vector::normalize_or_zero(axis); // points from q toward p

    // -- Collision: split the penetration evenly, no impulse exchange
    let contact = p_radius + q_radius;
    if mag < contact {
        let push = n * (0.5 * (contact - mag));
        solver.particles[i].pos += push;
        solver.particles[j].pos -= push;
    }

    // -- Directed coupling p -> q: only p moves. Positive repels, negative
    // attracts; the reverse pair is a fully independent lookup.
    if let Some(factor) = solver.matrix.coefficient(p_type, q_type) {
        if factor != 0.0 && factor.is_finite() && mag < p_roe + q_radius {
            let delta = p_roe + q_radius - mag;
            solver.particles[i].pos += n * (delta * factor);
        }
    }

    // -- Directed coupling q -> p: only q moves.
    if let Some(factor) = solver.matrix.coefficient(q_type, p_type) {
        if factor != 0.0 && factor.is_finite() && mag < q_roe + p_radius {
            let delta = q_roe + p_radius - mag;
            solver.particles[j].pos -= n * (delta * factor);
        }
    }
}
