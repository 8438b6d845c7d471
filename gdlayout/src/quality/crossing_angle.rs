use super::evaluator::{non_adjacent_pairs, square_grid_scales, Feasibility, Quality, QualityEvaluator, Variant};
use super::overlap::node_overlaps;
use crate::geometry::intersect::crossing_angle;
use crate::model::Graph;

// Angle assumed when nothing crosses; larger than any real crossing angle.
const NO_CROSSING: f64 = 100.0;

/// `1000 / smallest crossing angle` over non-adjacent edge pairs.
pub struct MinCrossingAngle;

impl QualityEvaluator for MinCrossingAngle {
    fn variant(&self) -> Variant { Variant::MinCrossingAngle }

    fn check_feasibility(&self, g: &Graph) -> Feasibility { node_overlaps(g).normalize() }

    fn compute_quality(&self, g: &Graph) -> Quality {
        let mut min_angle = NO_CROSSING;
        let mut worst = None;
        for (i, j) in non_adjacent_pairs(g) {
            let (si, sj) = (g.segments(i), g.segments(j));
            for a in &si {
                for b in &sj {
                    if let Some(c) = crossing_angle(*a, *b) {
                        if c.angle < min_angle {
                            min_angle = c.angle;
                            worst = Some((i, j, c.point));
                        }
                    }
                }
            }
        }
        match worst {
            Some((i, j, point)) => {
                let mut q = Quality::with_edges(g, 1000.0 / min_angle, vec![i, j]);
                q.point = Some(point);
                q
            }
            None => Quality { value: 1000.0 / NO_CROSSING, ..Quality::default() },
        }
    }

    fn format_quality(&self, q: &Quality) -> String {
        if q.value > 1000.0 / NO_CROSSING {
            let angle = (1_000_000.0 / q.value).round() / 1000.0;
            format!("\u{2221}{}\u{b0}", angle)
        } else {
            "-".to_string()
        }
    }

    fn axis_scales(&self, g: &Graph) -> (f64, f64) { square_grid_scales(g) }
}
