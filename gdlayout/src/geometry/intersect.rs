// Segment predicates used by the feasibility and quality passes.
// All inputs are graph coordinates; results are exact functions of them.

use super::tolerance::within;
use crate::model::Point;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Crossing {
    /// Acute crossing angle in degrees, within `[0, 90]`.
    pub angle: f64,
    pub point: Point,
}

/// Intersection point of segments `p1p2` and `p3p4`.
///
/// Solves the line-line system by determinants. Parallel or coincident lines
/// (non-finite solution) and points outside either segment's extent give `None`.
/// Swapping the two segments negates numerator and denominator exactly, so the
/// result does not depend on argument order.
pub fn segment_intersection(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    let c12 = p1.x * p2.y - p1.y * p2.x;
    let c34 = p3.x * p4.y - p3.y * p4.x;
    let denom = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    let x = (c12 * (p3.x - p4.x) - (p1.x - p2.x) * c34) / denom;
    let y = (c12 * (p3.y - p4.y) - (p1.y - p2.y) * c34) / denom;
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    let on_first = within(x, p1.x, p2.x) && within(y, p1.y, p2.y);
    let on_second = within(x, p3.x, p4.x) && within(y, p3.y, p4.y);
    if on_first && on_second { Some(Point::new(x, y)) } else { None }
}

/// `p` lies on the closed segment `ab`: inside its bounding box and exactly collinear.
pub fn point_on_segment(p: Point, a: Point, b: Point) -> bool {
    if p.x < a.x.min(b.x) || p.x > a.x.max(b.x) || p.y < a.y.min(b.y) || p.y > a.y.max(b.y) {
        return false;
    }
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x) == 0.0
}

/// Crossing of two segments, with the angle between their directions folded into `[0, 90]`.
pub fn crossing_angle(s1: (Point, Point), s2: (Point, Point)) -> Option<Crossing> {
    let point = segment_intersection(s1.0, s1.1, s2.0, s2.1)?;
    let (dx1, dy1) = (s1.1.x - s1.0.x, s1.1.y - s1.0.y);
    let (dx2, dy2) = (s2.1.x - s2.0.x, s2.1.y - s2.0.y);
    let mut angle = (dx1 * dy2 - dy1 * dx2).atan2(dx1 * dx2 + dy1 * dy2).abs();
    if angle > std::f64::consts::FRAC_PI_2 {
        angle = std::f64::consts::PI - angle;
    }
    Some(Crossing { angle: angle.to_degrees(), point })
}

/// Two segments share an endpoint coordinate.
#[inline]
pub fn share_endpoint(s1: (Point, Point), s2: (Point, Point)) -> bool {
    s1.0 == s2.0 || s1.0 == s2.1 || s1.1 == s2.0 || s1.1 == s2.1
}
