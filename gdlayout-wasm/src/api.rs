use crate::Session;
use gdlayout::picking::pick;
use gdlayout::{Config, InteractionState, KeyPhase, Modifiers, Point};
use js_sys::Float64Array;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;
use crate::error;
use crate::interop::{arr_f64, arr_u32, arr_u8, new_obj, set_kv, to_js};

const FLAG_SELECTED: u8 = 1;
const FLAG_ACTIVE: u8 = 2;
const FLAG_INFEASIBLE: u8 = 4;
const FLAG_HIGHLIGHT: u8 = 8;
const FLAG_FLASH: u8 = 16;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn config_from(v: JsValue) -> Result<Config, serde_wasm_bindgen::Error> {
    if v.is_undefined() || v.is_null() {
        return Ok(Config::default());
    }
    serde_wasm_bindgen::from_value(v)
}

fn mods(shift: bool, ctrl: bool, alt: bool) -> Modifiers { Modifiers { shift, ctrl, alt } }

fn finite2(a: (&str, f64), b: (&str, f64)) -> Option<JsValue> {
    if !a.1.is_finite() {
        return Some(error::non_finite(a.0));
    }
    if !b.1.is_finite() {
        return Some(error::non_finite(b.0));
    }
    None
}

fn pair(p: Point) -> Float64Array { arr_f64(&[p.x, p.y]) }

#[wasm_bindgen]
impl Session {
    /// `config` may be omitted; unknown or malformed configs fall back to defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Session {
        let config = config_from(config).unwrap_or_else(|e| {
            log::warn!("ignoring config: {}", e);
            Config::default()
        });
        Session::rs_new(config)
    }
    pub fn with_config_res(config: JsValue) -> JsValue {
        match config_from(config) {
            Ok(c) => error::ok(Session::rs_new(c).into()),
            Err(e) => error::err("invalid_config", e.to_string(), None),
        }
    }
    pub fn geom_version(&self) -> u64 { self.rs_geom_version() }
    pub fn view_version(&self) -> u64 { self.rs_view_version() }
    pub fn variant(&self) -> JsValue { to_js(&self.inner.variant()) }
    pub fn config(&self) -> JsValue { to_js(self.inner.config()) }
    pub fn is_loaded(&self) -> bool { self.inner.is_loaded() }
    pub fn bends_editable(&self) -> bool { self.inner.evaluator().bends_editable() }
    pub fn directed(&self) -> bool { self.inner.evaluator().directed() }
    pub fn node_count(&self) -> u32 { self.inner.graph().numnodes() as u32 }
    pub fn edge_count(&self) -> u32 { self.inner.graph().edges.len() as u32 }

    // Files
    pub fn load(&mut self, text: &str) -> bool { self.inner.load_json(text).is_ok() }
    pub fn load_res(&mut self, text: &str) -> JsValue {
        match self.inner.load_json(text) {
            Ok(()) => error::ok(JsValue::from_f64(self.inner.graph().nodes.len() as f64)),
            Err(e) => error::load_error(&e),
        }
    }
    pub fn load_value_res(&mut self, v: JsValue) -> JsValue {
        let value = match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(value) => value,
            Err(e) => return error::err("json_parse", e.to_string(), None),
        };
        match self.inner.load_value(value) {
            Ok(()) => error::ok(JsValue::from_f64(self.inner.graph().nodes.len() as f64)),
            Err(e) => error::load_error(&e),
        }
    }
    pub fn save(&self) -> Option<String> { self.inner.save_json().ok() }
    pub fn save_res(&self) -> JsValue {
        if !self.inner.is_loaded() {
            return error::not_loaded();
        }
        match self.inner.save_json() {
            Ok(text) => error::ok(JsValue::from_str(&text)),
            Err(e) => error::err("json_write", e.to_string(), None),
        }
    }
    pub fn to_value(&self) -> JsValue { to_js(&self.inner.save()) }

    // Pointer
    pub fn pointer_down(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool) -> bool {
        self.inner.pointer_down(x, y, mods(shift, ctrl, alt))
    }
    pub fn pointer_down_res(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool) -> JsValue {
        if let Some(e) = finite2(("x", x), ("y", y)) {
            return e;
        }
        if !self.inner.is_loaded() {
            return error::not_loaded();
        }
        if !matches!(self.inner.state(), InteractionState::Idle) {
            return error::busy(self.inner.state().name());
        }
        error::ok(JsValue::from_bool(self.inner.pointer_down(x, y, mods(shift, ctrl, alt))))
    }
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool { self.inner.pointer_move(x, y) }
    pub fn pointer_move_res(&mut self, x: f64, y: f64) -> JsValue {
        if let Some(e) = finite2(("x", x), ("y", y)) {
            return e;
        }
        error::ok(JsValue::from_bool(self.inner.pointer_move(x, y)))
    }
    pub fn pointer_up(&mut self, shift: bool, ctrl: bool, alt: bool) -> bool {
        self.inner.pointer_up(mods(shift, ctrl, alt))
    }
    pub fn state(&self) -> JsValue { to_js(self.inner.state()) }
    pub fn state_name(&self) -> String { self.inner.state().name().to_string() }
    pub fn clear_selection(&mut self) { self.inner.clear_selection(); }
    /// Node or bend under a screen point, or `null`.
    pub fn pick(&self, x: f64, y: f64) -> JsValue {
        let c = self.inner.config();
        match pick(self.inner.graph(), self.inner.view(), Point::new(x, y), c.node_radius, c.bend_radius) {
            Some(p) => to_js(&p),
            None => JsValue::NULL,
        }
    }

    // View
    pub fn set_viewport(&mut self, width: f64, height: f64) { self.inner.set_viewport(width, height); }
    pub fn set_viewport_res(&mut self, width: f64, height: f64) -> JsValue {
        if let Some(e) = finite2(("width", width), ("height", height)) {
            return e;
        }
        if width <= 0.0 {
            return error::out_of_range("width", 0.0, width);
        }
        if height <= 0.0 {
            return error::out_of_range("height", 0.0, height);
        }
        self.inner.set_viewport(width, height);
        error::ok(JsValue::UNDEFINED)
    }
    pub fn wheel(&mut self, x: f64, y: f64, steps: f64) -> bool { self.inner.wheel(x, y, steps) }
    pub fn wheel_res(&mut self, x: f64, y: f64, steps: f64) -> JsValue {
        if let Some(e) = finite2(("x", x), ("y", y)) {
            return e;
        }
        if !steps.is_finite() {
            return error::non_finite("steps");
        }
        if !self.inner.is_loaded() {
            return error::not_loaded();
        }
        error::ok(JsValue::from_bool(self.inner.wheel(x, y, steps)))
    }
    pub fn zoom_in(&mut self) { self.inner.zoom_in(); }
    pub fn zoom_out(&mut self) { self.inner.zoom_out(); }
    pub fn zoom_slider(&mut self, value: f64) { self.inner.zoom_slider(value); }
    pub fn slider_value(&self) -> f64 { self.inner.slider_value() }
    pub fn max_slider(&self) -> f64 { self.inner.max_slider() }
    pub fn center(&mut self) { self.inner.center(); }
    pub fn translate(&mut self, dx: f64, dy: f64) { self.inner.translate(dx, dy); }
    pub fn to_screen(&self, x: f64, y: f64) -> Float64Array { pair(self.inner.to_screen(x, y)) }
    pub fn to_graph(&self, x: f64, y: f64) -> Float64Array { pair(self.inner.to_graph(x, y)) }
    pub fn view(&self) -> JsValue { to_js(self.inner.view()) }
    pub fn grid_lines(&self) -> JsValue { to_js(&self.inner.grid_lines()) }

    // Edits
    pub fn undo(&mut self) -> bool { self.inner.undo() }
    pub fn undo_res(&mut self) -> JsValue {
        if !matches!(self.inner.state(), InteractionState::Idle) {
            return error::busy(self.inner.state().name());
        }
        error::ok(JsValue::from_bool(self.inner.undo()))
    }
    pub fn redo(&mut self) -> bool { self.inner.redo() }
    pub fn redo_res(&mut self) -> JsValue {
        if !matches!(self.inner.state(), InteractionState::Idle) {
            return error::busy(self.inner.state().name());
        }
        error::ok(JsValue::from_bool(self.inner.redo()))
    }
    pub fn can_undo(&self) -> bool { self.inner.can_undo() }
    pub fn can_redo(&self) -> bool { self.inner.can_redo() }
    pub fn delete_selected_bends(&mut self) -> bool { self.inner.delete_selected_bends() }
    pub fn toggle_force_pan(&mut self) -> bool { self.inner.toggle_force_pan() }
    pub fn force_pan(&self) -> bool { self.inner.force_pan() }
    pub fn toggle_add_bend(&mut self) -> bool { self.inner.toggle_add_bend() }
    pub fn add_bend_active(&self) -> bool { self.inner.add_bend_active() }

    // Keyboard
    /// Returns the bound action name, or `null` when the key is unbound in the current scope.
    pub fn key(&mut self, key: &str, code: &str, press: bool) -> JsValue {
        let phase = if press { KeyPhase::Press } else { KeyPhase::Down };
        match self.inner.key(key, code, phase) {
            Some(action) => to_js(&action),
            None => JsValue::NULL,
        }
    }
    pub fn open_modal(&mut self) { self.inner.open_modal(); }
    pub fn close_modal(&mut self) -> bool { self.inner.close_modal() }
    pub fn in_modal(&self) -> bool { self.inner.in_modal() }

    // Evaluation
    pub fn report(&self) -> JsValue { to_js(self.inner.report()) }
    pub fn feasible(&self) -> bool { self.inner.feasible() }
    pub fn quality_text(&self) -> String { self.inner.report().display.clone() }

    // Typed arrays getters
    pub fn get_node_data(&self) -> JsValue {
        let g = self.inner.graph();
        let r = self.inner.report();
        let mut pos = Vec::with_capacity(g.nodes.len() * 2);
        let mut degrees = Vec::with_capacity(g.nodes.len());
        let mut flags = vec![0u8; g.nodes.len()];
        for n in &g.nodes {
            pos.push(n.x);
            pos.push(n.y);
            degrees.push(n.degree as u32);
            let f = &mut flags[n.index];
            if n.selected { *f |= FLAG_SELECTED; }
            if n.active { *f |= FLAG_ACTIVE; }
        }
        for &i in &r.infeasible.nodes {
            if let Some(f) = flags.get_mut(i) { *f |= FLAG_INFEASIBLE; }
        }
        for &i in &r.quality.highlight_nodes {
            if let Some(f) = flags.get_mut(i) { *f |= FLAG_HIGHLIGHT; }
        }
        let ids: Vec<_> = g.nodes.iter().map(|n| &n.id).collect();
        let obj = new_obj();
        set_kv(&obj, "ids", &to_js(&ids));
        set_kv(&obj, "positions", &arr_f64(&pos).into());
        set_kv(&obj, "degrees", &arr_u32(&degrees).into());
        set_kv(&obj, "flags", &arr_u8(&flags).into());
        obj.into()
    }
    pub fn get_edge_data(&self) -> JsValue {
        let g = self.inner.graph();
        let r = self.inner.report();
        let mut endpoints = Vec::with_capacity(g.edges.len() * 2);
        let mut bend_offsets = Vec::with_capacity(g.edges.len() + 1);
        let mut flags = vec![0u8; g.edges.len()];
        let mut total = 0u32;
        bend_offsets.push(0);
        for e in &g.edges {
            endpoints.push(e.source as u32);
            endpoints.push(e.target as u32);
            total += e.bends.len() as u32;
            bend_offsets.push(total);
        }
        for &i in &r.infeasible.edges {
            if let Some(f) = flags.get_mut(i) { *f |= FLAG_INFEASIBLE; }
        }
        for &i in &r.quality.highlight_edges {
            if let Some(f) = flags.get_mut(i) { *f |= FLAG_HIGHLIGHT; }
        }
        if let Some(f) = r.flash_edge.and_then(|i| flags.get_mut(i)) {
            *f |= FLAG_FLASH;
        }
        let obj = new_obj();
        set_kv(&obj, "endpoints", &arr_u32(&endpoints).into());
        set_kv(&obj, "bend_offsets", &arr_u32(&bend_offsets).into());
        set_kv(&obj, "flags", &arr_u8(&flags).into());
        set_kv(&obj, "directed", &JsValue::from_bool(self.inner.evaluator().directed()));
        obj.into()
    }
    /// Bends in edge order, so `bend_offsets` from `get_edge_data` slices them per edge.
    pub fn get_bend_data(&self) -> JsValue {
        let g = self.inner.graph();
        let r = self.inner.report();
        let mut pos = Vec::new();
        let mut edges = Vec::new();
        let mut flags = Vec::new();
        for b in g.bend_refs() {
            pos.push(b.x);
            pos.push(b.y);
            edges.push(b.edge as u32);
            let mut f = 0u8;
            if b.selected { f |= FLAG_SELECTED; }
            if b.active { f |= FLAG_ACTIVE; }
            if r.infeasible.bends.contains(&b.id) { f |= FLAG_INFEASIBLE; }
            flags.push(f);
        }
        let obj = new_obj();
        set_kv(&obj, "positions", &arr_f64(&pos).into());
        set_kv(&obj, "edges", &arr_u32(&edges).into());
        set_kv(&obj, "flags", &arr_u8(&flags).into());
        obj.into()
    }
}
