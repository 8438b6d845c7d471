use super::evaluator::{edges_cross, square_grid_scales, Feasibility, Quality, QualityEvaluator, Variant};
use super::overlap::node_overlaps;
use crate::model::Graph;

/// Local crossing number: the most crossings on any single edge.
pub struct MinCrossings;

impl QualityEvaluator for MinCrossings {
    fn variant(&self) -> Variant { Variant::MinCrossings }

    fn check_feasibility(&self, g: &Graph) -> Feasibility { node_overlaps(g).normalize() }

    fn compute_quality(&self, g: &Graph) -> Quality {
        let m = g.edges.len();
        let mut counts = vec![0usize; m];
        for i in 0..m {
            for j in i + 1..m {
                if !g.edges[i].adjacent(&g.edges[j]) && edges_cross(g, i, j) {
                    counts[i] += 1;
                    counts[j] += 1;
                }
            }
        }
        let mut best = 0;
        let mut worst_edge = None;
        for (e, &c) in counts.iter().enumerate() {
            if c > best {
                best = c;
                worst_edge = Some(e);
            }
        }
        Quality::with_edges(g, best as f64, worst_edge.into_iter().collect())
    }

    fn format_quality(&self, q: &Quality) -> String { format!("{}", q.value) }

    fn axis_scales(&self, g: &Graph) -> (f64, f64) { square_grid_scales(g) }
}
