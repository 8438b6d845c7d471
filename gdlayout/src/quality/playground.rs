use super::evaluator::{Feasibility, Quality, QualityEvaluator, Variant};
use crate::model::Graph;

/// Free bend editing without constraints or score.
pub struct BendPlayground;

impl QualityEvaluator for BendPlayground {
    fn variant(&self) -> Variant { Variant::BendPlayground }

    fn check_feasibility(&self, _g: &Graph) -> Feasibility { Feasibility::default() }

    fn compute_quality(&self, _g: &Graph) -> Quality { Quality::default() }

    fn format_quality(&self, _q: &Quality) -> String { "-".to_string() }

    fn bends_editable(&self) -> bool { true }
}
