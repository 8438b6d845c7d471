use gdlayout::{Config, Modifiers, Session, Variant};

const NONE: Modifiers = Modifiers { shift: false, ctrl: false, alt: false };

fn loaded(variant: Variant, doc: &str) -> Session {
    let mut s = Session::with_variant(variant);
    s.load_json(doc).expect("valid descriptor");
    s
}

fn drag(s: &mut Session, from: (f64, f64), to: (f64, f64)) {
    let a = s.to_screen(from.0, from.1);
    let b = s.to_screen(to.0, to.1);
    assert!(s.pointer_down(a.x, a.y, NONE));
    s.pointer_move(b.x, b.y);
    s.pointer_up(NONE);
}

#[test]
fn single_edge_ratio_is_one() {
    let s = loaded(
        Variant::EdgeLengthRatio,
        r#"{"nodes":[{"id":0,"x":0,"y":0},{"id":1,"x":10,"y":10}],"edges":[{"source":0,"target":1}],"width":100,"height":100}"#,
    );
    let r = s.report();
    assert!(r.feasible);
    assert_eq!(r.quality.value, 1.0);
    assert_eq!(r.display, "1.00000");
    assert_eq!(r.quality.highlight_edges, vec![0]);
}

#[test]
fn coincident_nodes_are_infeasible() {
    let s = loaded(
        Variant::EdgeLengthRatio,
        r#"{"nodes":[{"id":0,"x":5,"y":5},{"id":1,"x":5,"y":5}],"edges":[]}"#,
    );
    assert!(!s.feasible());
    assert_eq!(s.report().infeasible.nodes, vec![0, 1]);
}

#[test]
fn coincident_nodes_flagged_by_every_variant() {
    for v in [Variant::MinCrossingAngle, Variant::MinCrossings, Variant::MinCrossingsUpward] {
        let s = loaded(v, r#"{"nodes":[{"id":"a","x":5,"y":5},{"id":"b","x":5,"y":5},{"id":"c","x":9,"y":1}],"edges":[{"source":"a","target":"c"}]}"#);
        assert!(!s.feasible(), "{:?}", v);
        assert!(s.report().infeasible.nodes.contains(&0));
        assert!(s.report().infeasible.nodes.contains(&1));
    }
}

const DRAG_DOC: &str = r#"{"nodes":[{"id":0,"x":10,"y":10},{"id":1,"x":50,"y":50}],"edges":[],"width":100,"height":100}"#;

#[test]
fn drag_lands_on_grid_point() {
    let mut s = loaded(Variant::EdgeLengthRatio, DRAG_DOC);
    drag(&mut s, (10.0, 10.0), (13.0, 13.0));
    let n = &s.graph().nodes[0];
    assert_eq!((n.x, n.y), (13.0, 13.0));
    assert!(s.can_undo());
}

#[test]
fn drag_snaps_to_coarse_granularity() {
    let mut s = Session::new(Config { granularity: 5.0, ..Config::default() });
    s.load_json(DRAG_DOC).unwrap();
    drag(&mut s, (10.0, 10.0), (13.0, 13.0));
    let n = &s.graph().nodes[0];
    assert_eq!((n.x, n.y), (15.0, 15.0));
}

#[test]
fn downward_edge_is_infeasible_for_upward_variant() {
    let s = loaded(
        Variant::MinCrossingsUpward,
        r#"{"nodes":[{"id":0,"x":0,"y":10},{"id":1,"x":10,"y":0}],"edges":[{"source":0,"target":1}],"width":20,"height":20}"#,
    );
    assert_eq!(s.report().quality.value, 0.0);
    assert_eq!(s.report().infeasible.edges, vec![0]);
    assert!(!s.feasible());

    let flat = loaded(
        Variant::MinCrossingsUpward,
        r#"{"nodes":[{"id":0,"x":0,"y":10},{"id":1,"x":10,"y":10}],"edges":[{"source":0,"target":1}],"width":20,"height":20}"#,
    );
    assert_eq!(flat.report().infeasible.edges, vec![0]);
}

#[test]
fn add_bend_rejected_without_allowance() {
    let mut s = loaded(
        Variant::EdgeLengthRatio,
        r#"{"nodes":[{"id":0,"x":0,"y":0},{"id":1,"x":20,"y":0}],"edges":[{"source":0,"target":1}],"width":100,"height":100}"#,
    );
    assert!(s.toggle_add_bend());
    let p = s.to_screen(10.0, 0.0);
    assert!(!s.pointer_down(p.x, p.y, NONE));
    assert!(s.graph().edges[0].bends.is_empty());
    assert!(!s.can_undo());
    assert_eq!(s.report().flash_edge, Some(0));
    assert_eq!(s.state().name(), "idle");
}

#[test]
fn undo_on_empty_history_is_noop() {
    let mut s = loaded(Variant::EdgeLengthRatio, DRAG_DOC);
    let ver = s.geom_version();
    assert!(!s.undo());
    assert!(!s.redo());
    assert_eq!(s.geom_version(), ver);
}

#[test]
fn failed_load_keeps_current_graph() {
    let mut s = loaded(Variant::EdgeLengthRatio, DRAG_DOC);
    drag(&mut s, (10.0, 10.0), (13.0, 13.0));
    let err = s.load_json(r#"{"nodes":[{"id":0,"x":-1,"y":0}],"edges":[{"source":0,"target":9}]}"#).unwrap_err();
    assert_eq!(err.code(), "invalid_graph");
    assert_eq!(err.messages().len(), 2);
    assert_eq!(s.graph().nodes[0].x, 13.0);
    assert!(s.can_undo());
}

#[test]
fn load_resets_history() {
    let mut s = loaded(Variant::EdgeLengthRatio, DRAG_DOC);
    drag(&mut s, (10.0, 10.0), (13.0, 13.0));
    s.undo();
    assert!(s.can_redo());
    s.load_json(DRAG_DOC).unwrap();
    assert!(!s.can_undo());
    assert!(!s.can_redo());
}
