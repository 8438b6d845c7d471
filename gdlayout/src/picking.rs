use crate::geometry::math::nearest_segment;
use crate::model::{BendId, Graph, Point};
use crate::view::View;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Pick {
    Node { index: usize, dist: f64 },
    Bend { id: BendId, dist: f64 },
}

/// Hit test in screen space. Nodes win over bends; the closest hit wins within a kind.
pub fn pick(g: &Graph, view: &View, screen: Point, node_radius: f64, bend_radius: f64) -> Option<Pick> {
    let mut best_node: Option<(usize, f64)> = None;
    for n in &g.nodes {
        let s = view.to_screen(n.pos());
        let d = (s.x - screen.x).hypot(s.y - screen.y);
        if d <= node_radius && best_node.map_or(true, |(_, bd)| d < bd) {
            best_node = Some((n.index, d));
        }
    }
    if let Some((index, dist)) = best_node {
        return Some(Pick::Node { index, dist });
    }
    let mut best_bend: Option<(BendId, f64)> = None;
    for b in g.bend_refs() {
        let s = view.to_screen(Point::new(b.x, b.y));
        let d = (s.x - screen.x).hypot(s.y - screen.y);
        if d <= bend_radius && best_bend.map_or(true, |(_, bd)| d < bd) {
            best_bend = Some((b.id, d));
        }
    }
    best_bend.map(|(id, dist)| Pick::Bend { id, dist })
}

/// Edge and segment closest to a screen point, measured on screen.
pub fn nearest_edge(g: &Graph, view: &View, screen: Point) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for e in &g.edges {
        let pts: Vec<Point> = g.polyline(e.index).into_iter().map(|p| view.to_screen(p)).collect();
        if let Some((seg, d)) = nearest_segment(screen, &pts) {
            if best.map_or(true, |(_, _, bd)| d < bd) {
                best = Some((e.index, seg, d));
            }
        }
    }
    best
}
