use super::evaluator::{Feasibility, Quality, QualityEvaluator, Variant};
use super::overlap::node_overlaps;
use crate::geometry::intersect::{point_on_segment, segment_intersection, share_endpoint};
use crate::geometry::math::{dist, polyline_length};
use crate::model::Graph;

/// Longest drawn edge over the shortest endpoint distance. Planar drawings only.
pub struct EdgeLengthRatio;

impl QualityEvaluator for EdgeLengthRatio {
    fn variant(&self) -> Variant { Variant::EdgeLengthRatio }

    fn check_feasibility(&self, g: &Graph) -> Feasibility {
        let mut f = node_overlaps(g);
        bend_overlaps(g, &mut f);
        for e in &g.edges {
            if e.bends.len() > g.bends || self_crossing(g, e.index) {
                f.edges.push(e.index);
            }
        }
        for i in 0..g.edges.len() {
            let si = g.segments(i);
            for j in i + 1..g.edges.len() {
                let sj = g.segments(j);
                let crossed = si.iter().any(|a| {
                    sj.iter().any(|b| {
                        !share_endpoint(*a, *b) && segment_intersection(a.0, a.1, b.0, b.1).is_some()
                    })
                });
                if crossed {
                    f.edges.push(i);
                    f.edges.push(j);
                }
            }
        }
        f.normalize()
    }

    fn compute_quality(&self, g: &Graph) -> Quality {
        let mut shortest = g.width * g.height;
        let mut longest = 0.0;
        let (mut short_edge, mut long_edge) = (None, None);
        for e in &g.edges {
            let straight = dist(g.nodes[e.source].pos(), g.nodes[e.target].pos());
            if straight < shortest {
                shortest = straight;
                short_edge = Some(e.index);
            }
            let drawn = polyline_length(&g.polyline(e.index));
            if drawn > longest {
                longest = drawn;
                long_edge = Some(e.index);
            }
        }
        let edges: Vec<usize> = short_edge.into_iter().chain(long_edge).collect();
        Quality::with_edges(g, longest / shortest, edges)
    }

    fn format_quality(&self, q: &Quality) -> String { to_precision(q.value, 6) }

    fn bends_editable(&self) -> bool { true }
}

/// Bends coinciding with nodes or other bends, or resting on a segment other
/// than the two they span.
fn bend_overlaps(g: &Graph, f: &mut Feasibility) {
    let bends: Vec<_> = g.bend_refs().collect();
    for (k, b) in bends.iter().enumerate() {
        let p = crate::model::Point::new(b.x, b.y);
        for other in &bends[k + 1..] {
            if other.x == b.x && other.y == b.y {
                f.bends.push(b.id);
                f.bends.push(other.id);
            }
        }
        for n in &g.nodes {
            if n.pos() == p {
                f.bends.push(b.id);
                f.nodes.push(n.index);
            }
        }
        for e in &g.edges {
            for (s, seg) in g.segments(e.index).into_iter().enumerate() {
                // segments `slot` and `slot + 1` of the owning edge end at this bend
                if e.index == b.edge && (s == b.slot || s == b.slot + 1) { continue; }
                if point_on_segment(p, seg.0, seg.1) {
                    f.bends.push(b.id);
                    f.edges.push(e.index);
                    break;
                }
            }
        }
    }
}

/// Two non-consecutive segments of the same polyline touch.
fn self_crossing(g: &Graph, e: usize) -> bool {
    let segs = g.segments(e);
    for i in 0..segs.len() {
        for j in i + 2..segs.len() {
            if segment_intersection(segs[i].0, segs[i].1, segs[j].0, segs[j].1).is_some() {
                return true;
            }
        }
    }
    false
}

/// Formats with `digits` significant digits.
pub(crate) fn to_precision(v: f64, digits: i32) -> String {
    if !v.is_finite() {
        return "-".to_string();
    }
    if v == 0.0 {
        return format!("{:.*}", (digits - 1) as usize, 0.0);
    }
    let magnitude = v.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    format!("{:.*}", decimals, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_formatting() {
        assert_eq!(to_precision(1.0, 6), "1.00000");
        assert_eq!(to_precision(1.41421356, 6), "1.41421");
        assert_eq!(to_precision(123.456789, 6), "123.457");
        assert_eq!(to_precision(0.0, 6), "0.00000");
        assert_eq!(to_precision(f64::INFINITY, 6), "-");
    }
}
