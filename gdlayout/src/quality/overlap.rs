// Overlap checks shared by every contest variant

use super::evaluator::Feasibility;
use crate::geometry::intersect::point_on_segment;
use crate::model::Graph;
use std::collections::HashMap;

#[inline]
fn key(x: f64, y: f64) -> (u64, u64) { ((x + 0.0).to_bits(), (y + 0.0).to_bits()) }

/// Coincident nodes, and nodes lying on an edge they are not incident to.
pub fn node_overlaps(g: &Graph) -> Feasibility {
    let mut f = Feasibility::default();
    let mut seen: HashMap<(u64, u64), usize> = HashMap::new();
    for n in &g.nodes {
        if let Some(&other) = seen.get(&key(n.x, n.y)) {
            f.nodes.push(other);
            f.nodes.push(n.index);
        } else {
            seen.insert(key(n.x, n.y), n.index);
        }
    }
    for e in &g.edges {
        let segs = g.segments(e.index);
        for n in &g.nodes {
            if e.incident(n.index) { continue; }
            if segs.iter().any(|s| point_on_segment(n.pos(), s.0, s.1)) {
                f.nodes.push(n.index);
                f.edges.push(e.index);
            }
        }
    }
    f
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::parse_descriptor;

    #[test]
    fn three_coincident_nodes_all_flagged() {
        let g = parse_descriptor(r#"{"nodes":[{"id":0,"x":5,"y":5},{"id":1,"x":5,"y":5},{"id":2,"x":5,"y":5}],"edges":[]}"#).unwrap();
        let f = node_overlaps(&g).normalize();
        assert_eq!(f.nodes, vec![0, 1, 2]);
    }

    #[test]
    fn node_on_foreign_edge() {
        let g = parse_descriptor(r#"{"nodes":[{"id":0,"x":0,"y":0},{"id":1,"x":10,"y":0},{"id":2,"x":4,"y":0}],"edges":[{"source":0,"target":1}]}"#).unwrap();
        let f = node_overlaps(&g).normalize();
        assert_eq!(f.nodes, vec![2]);
        assert_eq!(f.edges, vec![0]);
    }
}
