use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Point { Point { x, y } }
}

/// Identity of a node or edge as written in the imported file.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalId::Int(v) => write!(f, "{}", v),
            ExternalId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: ExternalId,
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub degree: usize,
    pub edges: Vec<usize>,
    pub selected: bool,
    pub active: bool,
}

impl Node {
    pub fn pos(&self) -> Point { Point::new(self.x, self.y) }
}

/// Bend identity: owning edge plus a serial from the graph-wide counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BendId {
    pub edge: usize,
    pub serial: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bend {
    pub id: BendId,
    pub x: f64,
    pub y: f64,
    pub selected: bool,
    pub active: bool,
}

impl Bend {
    pub fn pos(&self) -> Point { Point::new(self.x, self.y) }
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub id: Option<ExternalId>,
    pub index: usize,
    pub source: usize,
    pub target: usize,
    pub bends: Vec<Bend>,
}

impl Edge {
    #[inline]
    pub fn incident(&self, node: usize) -> bool { self.source == node || self.target == node }

    /// Edges sharing an endpoint node.
    #[inline]
    pub fn adjacent(&self, other: &Edge) -> bool {
        self.incident(other.source) || self.incident(other.target)
    }
}

/// Read-only view of one bend in the flattened bend list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BendRef {
    pub id: BendId,
    pub edge: usize,
    pub slot: usize,
    pub x: f64,
    pub y: f64,
    pub selected: bool,
    pub active: bool,
}

#[derive(Clone, Debug)]
pub struct Graph {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Maximum bends allowed per edge.
    pub bends: usize,
    pub(crate) next_bend: u64,
}

impl Default for Graph {
    fn default() -> Self {
        let extent = crate::geometry::limits::DEFAULT_EXTENT;
        Graph { width: extent, height: extent, nodes: Vec::new(), edges: Vec::new(), bends: 0, next_bend: 0 }
    }
}

impl Graph {
    pub fn numnodes(&self) -> usize { self.nodes.len() }

    pub fn node_pos(&self, i: usize) -> Option<Point> { self.nodes.get(i).map(Node::pos) }

    pub(crate) fn alloc_bend_id(&mut self, edge: usize) -> BendId {
        let id = BendId { edge, serial: self.next_bend };
        self.next_bend += 1;
        id
    }

    /// All bends in edge order, derived from the edges' own lists.
    pub fn bend_refs(&self) -> impl Iterator<Item = BendRef> + '_ {
        self.edges.iter().flat_map(|e| {
            e.bends.iter().enumerate().map(move |(slot, b)| BendRef {
                id: b.id,
                edge: e.index,
                slot,
                x: b.x,
                y: b.y,
                selected: b.selected,
                active: b.active,
            })
        })
    }

    pub fn bend_count(&self) -> usize { self.edges.iter().map(|e| e.bends.len()).sum() }

    /// Position of a bend inside its edge's list.
    pub fn find_bend(&self, id: BendId) -> Option<usize> {
        self.edges.get(id.edge)?.bends.iter().position(|b| b.id == id)
    }

    pub fn bend(&self, id: BendId) -> Option<&Bend> {
        let slot = self.find_bend(id)?;
        self.edges[id.edge].bends.get(slot)
    }

    pub fn bend_mut(&mut self, id: BendId) -> Option<&mut Bend> {
        let slot = self.find_bend(id)?;
        self.edges[id.edge].bends.get_mut(slot)
    }

    /// Source, bends in order, target.
    pub fn polyline(&self, e: usize) -> Vec<Point> {
        let edge = &self.edges[e];
        let mut pts = Vec::with_capacity(edge.bends.len() + 2);
        pts.push(self.nodes[edge.source].pos());
        pts.extend(edge.bends.iter().map(Bend::pos));
        pts.push(self.nodes[edge.target].pos());
        pts
    }

    pub fn segments(&self, e: usize) -> Vec<(Point, Point)> {
        self.polyline(e).windows(2).map(|w| (w[0], w[1])).collect()
    }

    pub fn clear_selection(&mut self) {
        for n in &mut self.nodes { n.selected = false; }
        for e in &mut self.edges {
            for b in &mut e.bends { b.selected = false; }
        }
    }

    pub fn selected_nodes(&self) -> Vec<usize> {
        self.nodes.iter().filter(|n| n.selected).map(|n| n.index).collect()
    }

    pub fn selected_bends(&self) -> Vec<BendId> {
        self.bend_refs().filter(|b| b.selected).map(|b| b.id).collect()
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> Graph {
        let mut g = Graph::default();
        for (i, (x, y)) in [(0.0, 0.0), (10.0, 0.0)].into_iter().enumerate() {
            g.nodes.push(Node {
                id: ExternalId::Int(i as i64), index: i, x, y,
                degree: 1, edges: vec![0], selected: false, active: false,
            });
        }
        g.edges.push(Edge { id: None, index: 0, source: 0, target: 1, bends: Vec::new() });
        g
    }

    #[test]
    fn polyline_runs_through_bends() {
        let mut g = tiny();
        let id = g.alloc_bend_id(0);
        g.edges[0].bends.push(Bend { id, x: 5.0, y: 5.0, selected: false, active: false });
        let pts = g.polyline(0);
        assert_eq!(pts, vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(10.0, 0.0)]);
        assert_eq!(g.segments(0).len(), 2);
        assert_eq!(g.bend_refs().count(), 1);
        assert_eq!(g.find_bend(id), Some(0));
    }

    #[test]
    fn bend_ids_are_monotonic() {
        let mut g = tiny();
        let a = g.alloc_bend_id(0);
        let b = g.alloc_bend_id(0);
        assert!(a < b);
        assert_ne!(a, b);
    }

    #[test]
    fn external_ids_display_raw() {
        assert_eq!(ExternalId::Int(7).to_string(), "7");
        assert_eq!(ExternalId::Text("v1".into()).to_string(), "v1");
    }
}
