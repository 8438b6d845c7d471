use crate::interop::{new_obj, set_kv};
use gdlayout::LoadError;
use js_sys::Array;
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f64, got: f64) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "min", &JsValue::from_f64(min));
    set_kv(&d, "got", &JsValue::from_f64(got));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn not_loaded() -> JsValue { err("not_loaded", "no graph is loaded", None) }

#[inline]
pub fn busy(state: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "state", &JsValue::from_str(state));
    err("busy", "a pointer gesture is in progress", Some(d.into()))
}

/// `data.messages` lists every problem so the shell can show them all at once.
pub fn load_error(e: &LoadError) -> JsValue {
    let messages: Array = e.messages().iter().map(|m| JsValue::from_str(m)).collect();
    let d = new_obj();
    set_kv(&d, "messages", &messages.into());
    err(e.code(), e.to_string(), Some(d.into()))
}
