// Defines the particle struct (position pair, radii, type) and its methods
// for Verlet integration. Velocity is implicit: the difference between the
// current and previous position.

use serde::{Deserialize, Serialize};
use ultraviolet::DVec2;

use crate::config;
use crate::vector;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Particle {
    pub pos: DVec2,
    pub pos_old: DVec2,
    pub radius: f64,
    /// Influence radius ("roe"): range beyond the contact radius within which
    /// type couplings apply. Expected >= radius, not enforced.
    pub influence_radius: f64,
    pub type_id: usize,
    pub accel: DVec2,
}

impl Particle {
    pub fn new(pos: DVec2, radius: f64, influence_radius: f64, type_id: usize) -> Self {
        Self {
            pos,
            pos_old: pos,
            radius,
            influence_radius,
            type_id,
            accel: DVec2::zero(),
        }
    }

    /// Implicit velocity of the last step, derived on demand.
    pub fn velocity(&self) -> DVec2 {
        self.pos - self.pos_old
    }

    /// Verlet update without stored velocity. Wall clamps and collision pushes
    /// mutate `pos` directly between integrations; since `pos_old` is left
    /// alone they show up here as a velocity change.
    pub fn integrate(&mut self, dt: f64) {
        let velocity = self.pos - self.pos_old;
        self.pos_old = self.pos;
        self.pos += velocity + self.accel * (dt * dt);
        self.accel = DVec2::zero();
    }

    /// Accumulate acceleration for the next integration. The pending total is
    /// capped so a single step can never inject an unbounded kick.
    pub fn accelerate(&mut self, a: DVec2) {
        let total = self.accel + a;
        if total.mag() > config::MAX_PENDING_ACCEL {
            self.accel = vector::normalize_or_zero(total) * config::MAX_PENDING_ACCEL;
        } else {
            self.accel = total;
        }
    }
}
