use crate::geometry::intersect::segment_intersection;
use crate::model::{BendId, Graph, Point};
use serde::{Deserialize, Serialize};

/// Contest variant, selected once per session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    EdgeLengthRatio,
    MinCrossingAngle,
    MinCrossings,
    MinCrossingsUpward,
    BendPlayground,
}

/// Entities violating a hard constraint. Sorted and free of duplicates.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Feasibility {
    pub nodes: Vec<usize>,
    pub edges: Vec<usize>,
    pub bends: Vec<BendId>,
}

impl Feasibility {
    pub fn is_feasible(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.bends.is_empty()
    }

    pub(crate) fn normalize(mut self) -> Self {
        self.nodes.sort_unstable(); self.nodes.dedup();
        self.edges.sort_unstable(); self.edges.dedup();
        self.bends.sort_unstable(); self.bends.dedup();
        self
    }
}

/// Score of the current drawing. Lower is better for every variant.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Quality {
    pub value: f64,
    /// Sorted and free of duplicates.
    pub highlight_edges: Vec<usize>,
    /// Endpoints of the highlighted edges.
    pub highlight_nodes: Vec<usize>,
    /// Location of the worst crossing, when the variant has one.
    pub point: Option<Point>,
}

impl Quality {
    pub(crate) fn with_edges(g: &Graph, value: f64, mut edges: Vec<usize>) -> Quality {
        edges.sort_unstable();
        edges.dedup();
        let mut nodes: Vec<usize> = edges
            .iter()
            .flat_map(|&e| [g.edges[e].source, g.edges[e].target])
            .collect();
        nodes.sort_unstable();
        nodes.dedup();
        Quality { value, highlight_edges: edges, highlight_nodes: nodes, point: None }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Better,
    Equal,
    Worse,
}

impl Trend {
    pub fn between(start: f64, now: f64) -> Trend {
        if now < start { Trend::Better } else if now == start { Trend::Equal } else { Trend::Worse }
    }
}

pub trait QualityEvaluator {
    fn variant(&self) -> Variant;

    fn check_feasibility(&self, g: &Graph) -> Feasibility;

    fn compute_quality(&self, g: &Graph) -> Quality;

    /// Text shown in the quality box.
    fn format_quality(&self, q: &Quality) -> String;

    fn directed(&self) -> bool { false }

    fn bends_editable(&self) -> bool { false }

    /// Per-axis aspect correction applied by the view.
    fn axis_scales(&self, _g: &Graph) -> (f64, f64) { (1.0, 1.0) }
}

pub fn evaluator_for(variant: Variant) -> Box<dyn QualityEvaluator> {
    use super::*;
    match variant {
        Variant::EdgeLengthRatio => Box::new(edge_length_ratio::EdgeLengthRatio),
        Variant::MinCrossingAngle => Box::new(crossing_angle::MinCrossingAngle),
        Variant::MinCrossings => Box::new(crossings::MinCrossings),
        Variant::MinCrossingsUpward => Box::new(upward::MinCrossingsUpward),
        Variant::BendPlayground => Box::new(playground::BendPlayground),
    }
}

/// Stretches the shorter axis so grid cells are square on screen.
pub(crate) fn square_grid_scales(g: &Graph) -> (f64, f64) {
    if g.width <= 0.0 || g.height <= 0.0 {
        (1.0, 1.0)
    } else if g.width < g.height {
        (g.height / g.width, 1.0)
    } else if g.width > g.height {
        (1.0, g.width / g.height)
    } else {
        (1.0, 1.0)
    }
}

/// Any segment of edge `a` intersects any segment of edge `b`.
pub(crate) fn edges_cross(g: &Graph, a: usize, b: usize) -> bool {
    let sa = g.segments(a);
    let sb = g.segments(b);
    sa.iter()
        .any(|s| sb.iter().any(|t| segment_intersection(s.0, s.1, t.0, t.1).is_some()))
}

/// Pairs `(i, j)`, `i < j`, of edges that share no endpoint.
pub(crate) fn non_adjacent_pairs(g: &Graph) -> impl Iterator<Item = (usize, usize)> + '_ {
    let m = g.edges.len();
    (0..m).flat_map(move |i| (i + 1..m).map(move |j| (i, j)))
        .filter(move |&(i, j)| !g.edges[i].adjacent(&g.edges[j]))
}
