use crate::model::Point;

#[inline]
pub fn dist(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x; let dy = a.y - b.y;
    (dx*dx + dy*dy).sqrt()
}

#[inline]
pub fn midpoint(a: Point, b: Point) -> Point { Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0) }

/// Squared distance from `p` to segment `ab` and the clamped projection parameter.
pub fn seg_distance_sq(p: Point, a: Point, b: Point) -> (f64, f64) {
    let vx = b.x - a.x; let vy = b.y - a.y;
    let wx = p.x - a.x; let wy = p.y - a.y;
    let vv = vx*vx + vy*vy;
    let mut t = if vv > 0.0 { (wx*vx + wy*vy) / vv } else { 0.0 };
    if t < 0.0 { t = 0.0; } else if t > 1.0 { t = 1.0; }
    let dx = p.x - (a.x + t * vx); let dy = p.y - (a.y + t * vy);
    (dx*dx + dy*dy, t)
}

pub fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    seg_distance_sq(p, a, b).0.sqrt()
}

pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| dist(w[0], w[1])).sum()
}

/// Nearest segment of a polyline to `p`: `(segment index, distance)`. Ties keep the earlier segment.
pub fn nearest_segment(p: Point, points: &[Point]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, w) in points.windows(2).enumerate() {
        let d = segment_distance(p, w[0], w[1]);
        if best.map_or(true, |(_, bd)| d < bd) { best = Some((i, d)); }
    }
    best
}
