#![cfg(target_arch = "wasm32")]

use gdlayout_wasm::Session;
use js_sys::{Array, Reflect, Uint8Array};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const DOC: &str = r#"{"nodes":[{"id":"a","x":0,"y":0},{"id":"b","x":20,"y":0}],
    "edges":[{"source":"a","target":"b"}],"width":100,"height":100,"bends":1}"#;

fn get(v: &JsValue, k: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(k)).unwrap_or(JsValue::UNDEFINED)
}

fn is_err(v: &JsValue, code: &str) -> bool {
    if get(v, "ok").as_bool() != Some(false) {
        return false;
    }
    get(&get(v, "error"), "code").as_string().map_or(false, |c| c == code)
}

fn is_ok(v: &JsValue) -> bool { get(v, "ok").as_bool() == Some(true) }

fn loaded() -> Session {
    let mut s = Session::new(JsValue::UNDEFINED);
    assert!(s.load(DOC));
    s
}

#[wasm_bindgen_test]
fn load_errors_are_typed() {
    let mut s = Session::new(JsValue::UNDEFINED);
    let ver = s.geom_version();
    let r = s.load_res("{not json");
    assert!(is_err(&r, "json_parse"));
    let r = s.load_res(r#"{"nodes":[{"id":0,"x":1.5,"y":0}],"edges":[{"source":0,"target":7}]}"#);
    assert!(is_err(&r, "invalid_graph"));
    let messages = Array::from(&get(&get(&get(&r, "error"), "data"), "messages"));
    assert_eq!(messages.length(), 2);
    assert_eq!(s.geom_version(), ver, "state mutated on error");
    assert!(!s.is_loaded());
    assert!(is_err(&s.save_res(), "not_loaded"));
}

#[wasm_bindgen_test]
fn non_finite_pointer_input_is_rejected() {
    let mut s = loaded();
    let ver = s.geom_version();
    assert!(is_err(&s.pointer_down_res(f64::NAN, 0.0, false, false, false), "non_finite"));
    assert!(is_err(&s.wheel_res(0.0, 0.0, f64::INFINITY), "non_finite"));
    assert!(is_err(&s.set_viewport_res(-5.0, 100.0), "out_of_range"));
    assert_eq!(s.geom_version(), ver);
    assert_eq!(s.state_name(), "idle");
}

#[wasm_bindgen_test]
fn undo_refused_mid_gesture() {
    let mut s = loaded();
    let p = s.to_screen(20.0, 0.0).to_vec();
    assert!(is_ok(&s.pointer_down_res(p[0], p[1], false, false, false)));
    assert!(is_err(&s.pointer_down_res(p[0], p[1], false, false, false), "busy"));
    assert!(is_err(&s.undo_res(), "busy"));
    s.pointer_up(false, false, false);
    assert!(is_ok(&s.undo_res()));
}

#[wasm_bindgen_test]
fn drag_then_save_round_trips() {
    let mut s = loaded();
    let a = s.to_screen(20.0, 0.0).to_vec();
    let b = s.to_screen(25.0, 3.0).to_vec();
    s.pointer_down(a[0], a[1], false, false, false);
    s.pointer_move(b[0], b[1]);
    s.pointer_up(false, false, false);
    let text = s.save().unwrap();
    let mut t = Session::new(JsValue::UNDEFINED);
    assert!(is_ok(&t.load_res(&text)));
    let pos = js_sys::Float64Array::from(get(&t.get_node_data(), "positions")).to_vec();
    assert_eq!(pos, vec![0.0, 0.0, 25.0, 3.0]);
}

#[wasm_bindgen_test]
fn edge_flags_follow_report() {
    let mut s = Session::new(JsValue::UNDEFINED);
    assert!(s.load(
        r#"{"nodes":[{"id":0,"x":0,"y":0},{"id":1,"x":10,"y":10},{"id":2,"x":0,"y":10},{"id":3,"x":10,"y":0}],
            "edges":[{"source":0,"target":1},{"source":2,"target":3}],"width":20,"height":20}"#
    ));
    assert!(!s.feasible());
    let flags = Uint8Array::from(get(&s.get_edge_data(), "flags")).to_vec();
    assert!(flags.iter().all(|f| f & 4 != 0));
    assert_eq!(get(&s.report(), "feasible").as_bool(), Some(false));
}

#[wasm_bindgen_test]
fn keys_resolve_to_action_names() {
    let mut s = loaded();
    assert_eq!(s.key("a", "KeyA", true).as_string().as_deref(), Some("add_bend"));
    assert!(s.add_bend_active());
    assert!(s.key("q", "KeyQ", true).is_null());
    s.open_modal();
    assert!(s.key("a", "KeyA", true).is_null());
    assert_eq!(s.key("Escape", "Escape", false).as_string().as_deref(), Some("close_modal"));
    assert!(!s.in_modal());
}

#[wasm_bindgen_test]
fn config_is_read_from_js() {
    let cfg = js_sys::JSON::parse(r#"{"variant":"min_crossings","granularity":5}"#).unwrap();
    let s = Session::with_config_res(cfg);
    assert!(is_ok(&s));
    let bad = js_sys::JSON::parse(r#"{"variant":"nope"}"#).unwrap();
    assert!(is_err(&Session::with_config_res(bad), "invalid_config"));
}
