// Pointer-driven state machine: panning, rubber-band selection, dragging and
// bend placement. Every transition runs to completion on `&mut Session`.

use crate::geometry::math::{dist, midpoint, segment_distance};
use crate::geometry::tolerance::{clamp, round_half_up, snap};
use crate::history::{BendListChange, Edit};
use crate::model::{Bend, Point};
use crate::picking::{nearest_edge, pick, Pick};
use crate::selection::{self, SelectMode, SelectionBox, Target};
use crate::Session;
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DragItem {
    pub target: Target,
    pub start: Point,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DragState {
    pub target: Target,
    /// The target first, then every other selected node and bend.
    pub items: Vec<DragItem>,
    pub pointer_start: Point,
    pub offset: (f64, f64),
    /// Set once any tick changed the applied offset.
    pub dragging: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PendingBend {
    pub edge: usize,
    /// Insert position in the edge's bend list.
    pub slot: usize,
    #[serde(skip)]
    pub bend: Bend,
    pub placed: bool,
    /// Endpoints of the split segment, in graph coordinates.
    pub seg: (Point, Point),
    #[serde(skip)]
    pub before: Vec<Bend>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InteractionState {
    #[default]
    Idle,
    Panning { base_x: f64, base_y: f64 },
    BoxSelecting(SelectionBox),
    Dragging(DragState),
    AddingBend(PendingBend),
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Panning { .. } => "panning",
            InteractionState::BoxSelecting(_) => "box_selecting",
            InteractionState::Dragging(_) => "dragging",
            InteractionState::AddingBend(_) => "adding_bend",
        }
    }
}

fn target_pos(s: &Session, t: Target) -> Option<Point> {
    match t {
        Target::Node(i) => s.graph.node_pos(i),
        Target::Bend(b) => s.graph.bend(b).map(Bend::pos),
    }
}

fn set_target_pos(s: &mut Session, t: Target, p: Point) {
    match t {
        Target::Node(i) => {
            if let Some(n) = s.graph.nodes.get_mut(i) {
                n.x = p.x;
                n.y = p.y;
            }
        }
        Target::Bend(b) => {
            if let Some(b) = s.graph.bend_mut(b) {
                b.x = p.x;
                b.y = p.y;
            }
        }
    }
}

fn set_target_active(s: &mut Session, t: Target, on: bool) {
    match t {
        Target::Node(i) => {
            if let Some(n) = s.graph.nodes.get_mut(i) { n.active = on; }
        }
        Target::Bend(b) => {
            if let Some(b) = s.graph.bend_mut(b) { b.active = on; }
        }
    }
}

pub(crate) fn pointer_down(s: &mut Session, p: Point, mods: Modifiers) -> bool {
    if !matches!(s.state, InteractionState::Idle) {
        return false;
    }
    s.flash_edge = None;
    let hit = pick(&s.graph, &s.view, p, s.config.node_radius, s.config.bend_radius);
    if let Some(hit) = hit {
        let target = match hit {
            Pick::Node { index, .. } => Target::Node(index),
            Pick::Bend { id, .. } => Target::Bend(id),
        };
        start_drag(s, target, p, mods);
        return true;
    }
    if s.force_pan || mods.alt {
        s.state = InteractionState::Panning {
            base_x: s.view.x_trans - p.x / s.view.x_scale,
            base_y: s.view.y_trans - p.y / s.view.y_scale,
        };
        return true;
    }
    if s.add_bend {
        return start_add_bend(s, p);
    }
    let sel = SelectionBox::begin(&mut s.graph, p, SelectMode::from_modifiers(mods));
    s.state = InteractionState::BoxSelecting(sel);
    true
}

fn start_drag(s: &mut Session, target: Target, p: Point, mods: Modifiers) {
    let target_selected = match target {
        Target::Node(i) => s.graph.nodes[i].selected,
        Target::Bend(b) => s.graph.bend(b).map_or(false, |b| b.selected),
    };
    if !mods.ctrl && !mods.shift && !target_selected {
        s.graph.clear_selection();
    }
    let mut items = Vec::new();
    if let Some(start) = target_pos(s, target) {
        items.push(DragItem { target, start });
    }
    for n in &s.graph.nodes {
        if n.selected && Target::Node(n.index) != target {
            items.push(DragItem { target: Target::Node(n.index), start: n.pos() });
        }
    }
    for b in s.graph.bend_refs() {
        if b.selected && Target::Bend(b.id) != target {
            items.push(DragItem { target: Target::Bend(b.id), start: Point::new(b.x, b.y) });
        }
    }
    set_target_active(s, target, true);
    s.gesture_quality = Some(s.report.quality.value);
    s.state = InteractionState::Dragging(DragState {
        target,
        items,
        pointer_start: p,
        offset: (0.0, 0.0),
        dragging: false,
    });
}

fn start_add_bend(s: &mut Session, p: Point) -> bool {
    let Some((edge, seg, _)) = nearest_edge(&s.graph, &s.view, p) else { return false };
    let g = &mut s.graph;
    if g.bends == 0 || g.edges[edge].bends.len() >= g.bends {
        warn!("edge {} cannot take another bend (limit {})", edge, g.bends);
        s.flash_edge = Some(edge);
        return false;
    }
    let pts = g.polyline(edge);
    let (a, b) = (pts[seg], pts[seg + 1]);
    let mid = midpoint(a, b);
    let id = g.alloc_bend_id(edge);
    let before = g.edges[edge].bends.clone();
    s.gesture_quality = Some(s.report.quality.value);
    s.state = InteractionState::AddingBend(PendingBend {
        edge,
        slot: seg,
        bend: Bend { id, x: mid.x, y: mid.y, selected: false, active: false },
        placed: false,
        seg: (a, b),
        before,
    });
    true
}

/// Returns whether anything visible changed.
pub(crate) fn pointer_move(s: &mut Session, p: Point) -> bool {
    match std::mem::take(&mut s.state) {
        InteractionState::Idle => false,
        InteractionState::Panning { base_x, base_y } => {
            s.view.x_trans = base_x + p.x / s.view.x_scale;
            s.view.y_trans = base_y + p.y / s.view.y_scale;
            s.state = InteractionState::Panning { base_x, base_y };
            s.bump_view();
            true
        }
        InteractionState::BoxSelecting(mut sel) => {
            sel.update(&mut s.graph, &s.view, p);
            s.state = InteractionState::BoxSelecting(sel);
            true
        }
        InteractionState::Dragging(mut drag) => {
            let changed = drag_tick(s, &mut drag, p);
            s.state = InteractionState::Dragging(drag);
            changed
        }
        InteractionState::AddingBend(mut pending) => {
            let changed = add_bend_tick(s, &mut pending, p);
            s.state = InteractionState::AddingBend(pending);
            changed
        }
    }
}

/// Moves the whole drag set rigidly by the smallest snapped offset of any member.
fn drag_tick(s: &mut Session, drag: &mut DragState, p: Point) -> bool {
    let v = &s.view;
    let (w, h, gran) = (s.graph.width, s.graph.height, s.config.granularity);
    let dxs = (p.x - drag.pointer_start.x) / (v.scale * v.x_scale);
    let dys = (p.y - drag.pointer_start.y) / (v.scale * v.y_scale);
    let mut move_x = f64::MAX;
    let mut move_y = f64::MAX;
    for it in &drag.items {
        let cx = clamp(snap(it.start.x + dxs, gran), 0.0, w);
        if (cx - it.start.x).abs() < move_x.abs() {
            move_x = cx - it.start.x;
        }
        let cy = clamp(snap(it.start.y - dys, gran), 0.0, h);
        if (cy - it.start.y).abs() < move_y.abs() {
            move_y = cy - it.start.y;
        }
    }
    if drag.items.is_empty() || (move_x, move_y) == drag.offset {
        return false;
    }
    drag.offset = (move_x, move_y);
    drag.dragging = true;
    for it in &drag.items {
        set_target_pos(s, it.target, Point::new(it.start.x + move_x, it.start.y + move_y));
    }
    s.geometry_changed();
    true
}

fn add_bend_tick(s: &mut Session, pending: &mut PendingBend, p: Point) -> bool {
    let gp = s.view.to_graph(p);
    let (a, b) = pending.seg;
    let dist_seg = segment_distance(gp, a, b);
    let grid = Point::new(
        clamp(round_half_up(gp.x), 0.0, s.graph.width),
        clamp(round_half_up(gp.y), 0.0, s.graph.height),
    );
    let dist_grid = dist(gp, grid);
    let bends = &mut s.graph.edges[pending.edge].bends;
    if dist_seg < dist_grid {
        if !pending.placed {
            return false;
        }
        bends.remove(pending.slot);
        pending.placed = false;
        let mid = midpoint(a, b);
        pending.bend.x = mid.x;
        pending.bend.y = mid.y;
    } else {
        if pending.placed && pending.bend.pos() == grid {
            return false;
        }
        pending.bend.x = grid.x;
        pending.bend.y = grid.y;
        if pending.placed {
            bends[pending.slot] = pending.bend.clone();
        } else {
            bends.insert(pending.slot, pending.bend.clone());
            pending.placed = true;
        }
    }
    s.geometry_changed();
    true
}

pub(crate) fn pointer_up(s: &mut Session, mods: Modifiers) -> bool {
    let state = std::mem::take(&mut s.state);
    s.gesture_quality = None;
    match state {
        InteractionState::Idle => false,
        InteractionState::Panning { .. } => true,
        InteractionState::BoxSelecting(sel) => {
            sel.commit(&mut s.graph);
            true
        }
        InteractionState::Dragging(drag) => {
            set_target_active(s, drag.target, false);
            if !drag.dragging {
                selection::click(&mut s.graph, drag.target, mods, drag.items.len());
            } else if drag.offset != (0.0, 0.0) {
                let mut nodes = Vec::new();
                let mut bends = Vec::new();
                for it in &drag.items {
                    match it.target {
                        Target::Node(i) => nodes.push(i),
                        Target::Bend(b) => bends.push(b),
                    }
                }
                s.history.push(Edit::Move { nodes, bends, dx: drag.offset.0, dy: drag.offset.1 });
            }
            s.refresh_report();
            true
        }
        InteractionState::AddingBend(pending) => {
            if pending.placed {
                let after = s.graph.edges[pending.edge].bends.clone();
                s.history.push(Edit::AddBend(BendListChange { edge: pending.edge, before: pending.before, after }));
            }
            s.refresh_report();
            true
        }
    }
}

/// Removes every selected bend as one undoable edit.
pub(crate) fn delete_selected_bends(s: &mut Session) -> bool {
    if !matches!(s.state, InteractionState::Idle) {
        return false;
    }
    let mut removed = Vec::new();
    let mut changes = Vec::new();
    for e in &mut s.graph.edges {
        if !e.bends.iter().any(|b| b.selected) {
            continue;
        }
        let before = e.bends.clone();
        removed.extend(e.bends.iter().filter(|b| b.selected).map(|b| b.id));
        e.bends.retain(|b| !b.selected);
        changes.push(BendListChange { edge: e.index, before, after: e.bends.clone() });
    }
    if changes.is_empty() {
        return false;
    }
    s.history.push(Edit::DeleteBends { bends: removed, edges: changes });
    s.geometry_changed();
    true
}
