// Centralized tolerances and numeric helpers for the geometry kernel

pub const EPS: f64 = 1e-9;                 // per-axis slack for intersection extents
pub const EPS_TRANSFORM: f64 = 1e-6;       // screen <-> graph round-trip tolerance

// View fitting
pub const VIEW_MARGIN: f64 = 80.0;         // margin kept free around the fitted drawing (px)
pub const MIN_CENTER_SPAN: f64 = 10.0;     // smallest node extent fitted by center()
pub const MIN_SCALE_FLOOR: f64 = 1e-9;     // zoom never reaches zero or flips sign

// Rendered grid
pub const MIN_GRID_PX: f64 = 10.0;         // grid lines never closer than this on screen
pub const MAX_GRID_LINES: f64 = 10_000.0;  // grid lines per axis across the whole box

#[inline] pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 { x.max(lo).min(hi) }
#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }

/// Rounds halves towards positive infinity, so `-2.5` becomes `-2`.
#[inline] pub fn round_half_up(x: f64) -> f64 { (x + 0.5).floor() }

/// Quantizes a coordinate onto a grid of the given granularity.
#[inline]
pub fn snap(x: f64, granularity: f64) -> f64 {
    if granularity > 0.0 { round_half_up(x / granularity) * granularity } else { x }
}

/// `v` lies between `a` and `b` (either order), allowing `EPS` slack.
#[inline]
pub fn within(v: f64, a: f64, b: f64) -> bool {
    v >= a.min(b) - EPS && v <= a.max(b) + EPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_rounds_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.49), 2.0);
    }

    #[test]
    fn snap_to_granularity() {
        assert_eq!(snap(13.0, 1.0), 13.0);
        assert_eq!(snap(13.0, 5.0), 15.0);
        assert_eq!(snap(12.4, 5.0), 10.0);
        assert_eq!(snap(7.3, 0.0), 7.3);
    }
}
