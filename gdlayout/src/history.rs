use crate::model::{Bend, BendId, Graph};
use log::debug;

/// Bend list of one edge before and after an edit.
#[derive(Clone, Debug, PartialEq)]
pub struct BendListChange {
    pub edge: usize,
    pub before: Vec<Bend>,
    pub after: Vec<Bend>,
}

/// A reversible edit.
#[derive(Clone, Debug, PartialEq)]
pub enum Edit {
    Move { nodes: Vec<usize>, bends: Vec<BendId>, dx: f64, dy: f64 },
    AddBend(BendListChange),
    DeleteBends { bends: Vec<BendId>, edges: Vec<BendListChange> },
}

impl Edit {
    fn apply(&self, g: &mut Graph, forward: bool) {
        match self {
            Edit::Move { nodes, bends, dx, dy } => {
                let (dx, dy) = if forward { (*dx, *dy) } else { (-*dx, -*dy) };
                for &n in nodes {
                    if let Some(node) = g.nodes.get_mut(n) {
                        node.x += dx;
                        node.y += dy;
                    }
                }
                for &b in bends {
                    if let Some(bend) = g.bend_mut(b) {
                        bend.x += dx;
                        bend.y += dy;
                    }
                }
            }
            Edit::AddBend(change) => restore(g, change, forward),
            Edit::DeleteBends { edges, .. } => {
                for change in edges {
                    restore(g, change, forward);
                }
            }
        }
    }
}

fn restore(g: &mut Graph, change: &BendListChange, forward: bool) {
    if let Some(edge) = g.edges.get_mut(change.edge) {
        let src = if forward { &change.after } else { &change.before };
        edge.bends = src.iter().map(|b| Bend { selected: false, active: false, ..b.clone() }).collect();
    }
}

/// Undo and redo stacks. Any new edit clears the redo stack.
#[derive(Clone, Debug, Default)]
pub struct History {
    undo: Vec<Edit>,
    redo: Vec<Edit>,
}

impl History {
    pub fn push(&mut self, edit: Edit) {
        self.redo.clear();
        self.undo.push(edit);
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool { !self.undo.is_empty() }
    pub fn can_redo(&self) -> bool { !self.redo.is_empty() }
    pub fn undo_len(&self) -> usize { self.undo.len() }
    pub fn redo_len(&self) -> usize { self.redo.len() }

    pub fn undo(&mut self, g: &mut Graph) -> bool {
        let Some(edit) = self.undo.pop() else { return false };
        debug!("undo {:?}", kind(&edit));
        edit.apply(g, false);
        self.redo.push(edit);
        true
    }

    pub fn redo(&mut self, g: &mut Graph) -> bool {
        let Some(edit) = self.redo.pop() else { return false };
        debug!("redo {:?}", kind(&edit));
        edit.apply(g, true);
        self.undo.push(edit);
        true
    }
}

fn kind(e: &Edit) -> &'static str {
    match e {
        Edit::Move { .. } => "move",
        Edit::AddBend(_) => "add bend",
        Edit::DeleteBends { .. } => "delete bends",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::parse_descriptor;

    #[test]
    fn move_round_trip() {
        let mut g = parse_descriptor(r#"{"nodes":[{"id":0,"x":3,"y":4}]}"#).unwrap();
        let mut h = History::default();
        g.nodes[0].x += 2.0;
        h.push(Edit::Move { nodes: vec![0], bends: vec![], dx: 2.0, dy: 0.0 });
        assert!(h.undo(&mut g));
        assert_eq!((g.nodes[0].x, g.nodes[0].y), (3.0, 4.0));
        assert!(!h.undo(&mut g));
        assert!(h.redo(&mut g));
        assert_eq!(g.nodes[0].x, 5.0);
        assert!(!h.redo(&mut g));
    }

    #[test]
    fn push_clears_redo() {
        let mut g = parse_descriptor(r#"{"nodes":[{"id":0,"x":3,"y":4}]}"#).unwrap();
        let mut h = History::default();
        h.push(Edit::Move { nodes: vec![0], bends: vec![], dx: 1.0, dy: 1.0 });
        h.undo(&mut g);
        assert!(h.can_redo());
        h.push(Edit::Move { nodes: vec![0], bends: vec![], dx: 1.0, dy: 1.0 });
        assert!(!h.can_redo());
        assert_eq!((h.undo_len(), h.redo_len()), (1, 0));
    }
}
