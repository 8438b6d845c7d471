use crate::interaction::Modifiers;
use crate::model::{BendId, Graph, Point};
use crate::view::View;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
    Additive,
    Subtractive,
    Replace,
}

impl SelectMode {
    pub fn from_modifiers(m: Modifiers) -> SelectMode {
        if m.shift {
            SelectMode::Additive
        } else if m.ctrl {
            SelectMode::Subtractive
        } else {
            SelectMode::Replace
        }
    }
}

/// Rubber band in screen coordinates plus the items currently inside it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectionBox {
    pub mode: SelectMode,
    pub start: Point,
    pub current: Point,
    pub inside_nodes: Vec<usize>,
    pub inside_bends: Vec<BendId>,
}

impl SelectionBox {
    /// Starts a band. Replace mode drops the current selection first.
    pub fn begin(g: &mut Graph, start: Point, mode: SelectMode) -> SelectionBox {
        if mode == SelectMode::Replace {
            g.clear_selection();
        }
        SelectionBox { mode, start, current: start, inside_nodes: Vec::new(), inside_bends: Vec::new() }
    }

    /// `(x, y, width, height)` with non-negative extents.
    pub fn rect(&self) -> (f64, f64, f64, f64) {
        let x = self.start.x.min(self.current.x);
        let y = self.start.y.min(self.current.y);
        (x, y, (self.current.x - self.start.x).abs(), (self.current.y - self.start.y).abs())
    }

    /// Strict containment; points on the border are outside.
    pub fn contains(&self, s: Point) -> bool {
        let (x, y, w, h) = self.rect();
        s.x > x && s.x < x + w && s.y > y && s.y < y + h
    }

    /// Moves the free corner and refreshes `active` on everything it crosses.
    pub fn update(&mut self, g: &mut Graph, view: &View, current: Point) {
        self.current = current;
        for n in &mut g.nodes {
            let inside = self.contains(view.to_screen(n.pos()));
            if inside && !n.active {
                n.active = true;
                self.inside_nodes.push(n.index);
            } else if !inside && n.active {
                n.active = false;
                self.inside_nodes.retain(|&i| i != n.index);
            }
        }
        for e in &mut g.edges {
            for b in &mut e.bends {
                let inside = self.contains(view.to_screen(b.pos()));
                if inside && !b.active {
                    b.active = true;
                    self.inside_bends.push(b.id);
                } else if !inside && b.active {
                    b.active = false;
                    self.inside_bends.retain(|&i| i != b.id);
                }
            }
        }
    }

    /// Applies the band to the persistent selection and clears `active`.
    pub fn commit(self, g: &mut Graph) {
        let select = self.mode != SelectMode::Subtractive;
        for &i in &self.inside_nodes {
            if let Some(n) = g.nodes.get_mut(i) {
                n.selected = select;
            }
        }
        for &b in &self.inside_bends {
            if let Some(bend) = g.bend_mut(b) {
                bend.selected = select;
            }
        }
        for n in &mut g.nodes {
            n.active = false;
        }
        for e in &mut g.edges {
            for b in &mut e.bends {
                b.active = false;
            }
        }
    }
}

/// Item under the pointer when a drag starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Target {
    Node(usize),
    Bend(BendId),
}

impl Target {
    fn selected(self, g: &Graph) -> bool {
        match self {
            Target::Node(i) => g.nodes.get(i).map_or(false, |n| n.selected),
            Target::Bend(b) => g.bend(b).map_or(false, |b| b.selected),
        }
    }

    fn set_selected(self, g: &mut Graph, on: bool) {
        match self {
            Target::Node(i) => {
                if let Some(n) = g.nodes.get_mut(i) {
                    n.selected = on;
                }
            }
            Target::Bend(b) => {
                if let Some(b) = g.bend_mut(b) {
                    b.selected = on;
                }
            }
        }
    }
}

/// Selection change of a click that did not move anything.
///
/// `group_len` is the size of the drag set the click would have moved.
pub fn click(g: &mut Graph, target: Target, mods: Modifiers, group_len: usize) {
    if mods.shift {
        target.set_selected(g, true);
    } else if mods.ctrl {
        target.set_selected(g, false);
    } else if group_len > 1 || !target.selected(g) {
        g.clear_selection();
        target.set_selected(g, true);
    } else {
        target.set_selected(g, false);
    }
}
