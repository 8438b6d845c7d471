use super::evaluator::{edges_cross, non_adjacent_pairs, square_grid_scales, Feasibility, Quality, QualityEvaluator, Variant};
use super::overlap::node_overlaps;
use crate::model::Graph;

/// Crossing count of an upward drawing: every edge must rise from source to target.
pub struct MinCrossingsUpward;

impl QualityEvaluator for MinCrossingsUpward {
    fn variant(&self) -> Variant { Variant::MinCrossingsUpward }

    fn check_feasibility(&self, g: &Graph) -> Feasibility {
        let mut f = node_overlaps(g);
        for e in &g.edges {
            // bends may dip; only the endpoints decide
            if g.nodes[e.source].y >= g.nodes[e.target].y {
                f.edges.push(e.index);
            }
        }
        f.normalize()
    }

    fn compute_quality(&self, g: &Graph) -> Quality {
        let crossings = non_adjacent_pairs(g).filter(|&(i, j)| edges_cross(g, i, j)).count();
        Quality { value: crossings as f64, ..Quality::default() }
    }

    fn format_quality(&self, q: &Quality) -> String { format!("{}", q.value) }

    fn directed(&self) -> bool { true }

    fn axis_scales(&self, g: &Graph) -> (f64, f64) { square_grid_scales(g) }
}
