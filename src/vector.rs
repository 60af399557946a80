use ultraviolet::DVec2;

/// Normalize `v`, yielding the zero vector when the magnitude is exactly zero.
/// Coincident particles produce a zero separation axis; this keeps that case
/// NaN-free instead of signalling an error.
pub fn normalize_or_zero(v: DVec2) -> DVec2 {
    let mag = v.mag();
    if mag == 0.0 {
        DVec2::zero()
    } else {
        v / mag
    }
}

pub fn dist(a: DVec2, b: DVec2) -> f64 {
    (a - b).mag()
}
