pub mod model;
pub mod geometry {
    pub mod intersect;
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod quality {
    pub mod crossing_angle;
    pub mod crossings;
    pub mod edge_length_ratio;
    pub mod evaluator;
    pub mod overlap;
    pub mod playground;
    pub mod upward;
}
pub mod config;
pub mod error;
pub mod history;
pub mod interaction;
pub mod json;
pub mod keymap;
pub mod picking;
pub mod selection;
pub mod view;

pub use config::Config;
pub use error::{LoadError, ValidationError};
pub use interaction::{InteractionState, Modifiers};
pub use keymap::{Action, KeyPhase};
pub use model::{BendId, Graph, Point};
pub use quality::evaluator::{Feasibility, Quality, QualityEvaluator, Trend, Variant};

use history::History;
use keymap::KeyMap;
use log::{debug, info, warn};
use serde::Serialize;
use view::{GridLines, View};

/// What the shell shows after each event.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Report {
    pub feasible: bool,
    pub quality: Quality,
    pub display: String,
    /// Score movement since the current gesture started; only while feasible.
    pub trend: Option<Trend>,
    pub infeasible: Feasibility,
    /// Edge that refused a new bend on the last pointer-down.
    pub flash_edge: Option<usize>,
}

/// One editing session: graph, view, gesture state, history and evaluation.
pub struct Session {
    pub(crate) config: Config,
    pub(crate) evaluator: Box<dyn QualityEvaluator>,
    pub(crate) graph: Graph,
    pub(crate) loaded: bool,
    pub(crate) view: View,
    pub(crate) history: History,
    pub(crate) keymap: KeyMap,
    pub(crate) state: InteractionState,
    pub(crate) force_pan: bool,
    pub(crate) add_bend: bool,
    pub(crate) report: Report,
    pub(crate) gesture_quality: Option<f64>,
    pub(crate) flash_edge: Option<usize>,
    pub(crate) geom_ver: u64,
    pub(crate) view_ver: u64,
}

impl Session {
    pub fn new(config: Config) -> Session {
        let evaluator = quality::evaluator::evaluator_for(config.variant);
        info!("editing session for {:?}", config.variant);
        let mut s = Session {
            view: View::new(&config),
            keymap: KeyMap::contest(evaluator.bends_editable()),
            evaluator,
            config,
            graph: Graph::default(),
            loaded: false,
            history: History::default(),
            state: InteractionState::Idle,
            force_pan: false,
            add_bend: false,
            report: Report::default(),
            gesture_quality: None,
            flash_edge: None,
            geom_ver: 0,
            view_ver: 0,
        };
        s.refresh_report();
        s
    }

    pub fn with_variant(variant: Variant) -> Session { Session::new(Config::for_variant(variant)) }

    pub fn config(&self) -> &Config { &self.config }
    pub fn variant(&self) -> Variant { self.evaluator.variant() }
    pub fn evaluator(&self) -> &dyn QualityEvaluator { self.evaluator.as_ref() }
    pub fn graph(&self) -> &Graph { &self.graph }
    pub fn view(&self) -> &View { &self.view }
    pub fn state(&self) -> &InteractionState { &self.state }
    pub fn report(&self) -> &Report { &self.report }
    pub fn is_loaded(&self) -> bool { self.loaded }
    pub fn geom_version(&self) -> u64 { self.geom_ver }
    pub fn view_version(&self) -> u64 { self.view_ver }
    pub fn feasible(&self) -> bool { self.report.feasible }
    pub fn force_pan(&self) -> bool { self.force_pan }
    pub fn add_bend_active(&self) -> bool { self.add_bend }
    pub fn can_undo(&self) -> bool { self.history.can_undo() }
    pub fn can_redo(&self) -> bool { self.history.can_redo() }
    pub fn history(&self) -> &History { &self.history }

    // Loading and saving

    /// Replaces the graph if the text is a valid descriptor; otherwise nothing changes.
    pub fn load_json(&mut self, text: &str) -> Result<(), LoadError> {
        let graph = json::parse_descriptor(text).map_err(|e| {
            warn!("load rejected: {}", e);
            e
        })?;
        self.install(graph);
        Ok(())
    }

    pub fn load_value(&mut self, v: serde_json::Value) -> Result<(), LoadError> {
        let graph = json::graph_from_value(v).map_err(|e| {
            warn!("load rejected: {}", e);
            e
        })?;
        self.install(graph);
        Ok(())
    }

    fn install(&mut self, graph: Graph) {
        self.graph = graph;
        self.loaded = true;
        self.history.clear();
        self.state = InteractionState::Idle;
        self.gesture_quality = None;
        self.flash_edge = None;
        let scales = self.evaluator.axis_scales(&self.graph);
        self.view.fit_graph(&self.graph, scales);
        self.bump_view();
        self.geometry_changed();
    }

    pub fn save(&self) -> serde_json::Value { json::to_descriptor(&self.graph) }

    pub fn save_json(&self) -> Result<String, serde_json::Error> { json::to_json_string(&self.graph) }

    // Evaluation

    pub(crate) fn bump_view(&mut self) { self.view_ver = self.view_ver.wrapping_add(1); }

    pub(crate) fn geometry_changed(&mut self) {
        self.geom_ver = self.geom_ver.wrapping_add(1);
        self.refresh_report();
    }

    /// Full feasibility and quality pass over the current drawing.
    pub(crate) fn refresh_report(&mut self) {
        let infeasible = self.evaluator.check_feasibility(&self.graph);
        let quality = self.evaluator.compute_quality(&self.graph);
        let feasible = infeasible.is_feasible();
        let display = if !feasible && self.config.hide_quality_if_infeasible {
            "-".to_string()
        } else {
            self.evaluator.format_quality(&quality)
        };
        let trend = match self.gesture_quality {
            Some(start) if feasible => Some(Trend::between(start, quality.value)),
            _ => None,
        };
        self.report = Report { feasible, quality, display, trend, infeasible, flash_edge: self.flash_edge };
    }

    // Pointer

    pub fn pointer_down(&mut self, x: f64, y: f64, mods: Modifiers) -> bool {
        if !self.loaded {
            return false;
        }
        let started = interaction::pointer_down(self, Point::new(x, y), mods);
        self.report.flash_edge = self.flash_edge;
        started
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool { interaction::pointer_move(self, Point::new(x, y)) }

    pub fn pointer_up(&mut self, mods: Modifiers) -> bool { interaction::pointer_up(self, mods) }

    pub fn clear_selection(&mut self) { self.graph.clear_selection(); }

    // View

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return;
        }
        self.view.set_viewport(width, height);
        self.bump_view();
    }

    /// Wheel zoom around the pointer by `steps` notches (positive zooms in).
    pub fn wheel(&mut self, x: f64, y: f64, steps: f64) -> bool {
        if !self.loaded || !self.view.zoom_wheel(x, y, steps) {
            return false;
        }
        self.bump_view();
        true
    }

    pub fn zoom_in(&mut self) {
        if self.loaded {
            self.view.zoom_in();
            self.bump_view();
        }
    }

    pub fn zoom_out(&mut self) {
        if self.loaded {
            self.view.zoom_out();
            self.bump_view();
        }
    }

    pub fn zoom_slider(&mut self, value: f64) {
        if self.loaded && value.is_finite() {
            self.view.zoom_to_slider(value);
            self.bump_view();
        }
    }

    pub fn slider_value(&self) -> f64 { self.view.slider_value() }
    pub fn max_slider(&self) -> f64 { self.view.max_slider() }

    pub fn center(&mut self) {
        if self.loaded {
            self.view.center(&self.graph);
            self.bump_view();
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        if self.loaded {
            self.view.translate(dx, dy);
            self.bump_view();
        }
    }

    pub fn to_screen(&self, x: f64, y: f64) -> Point { self.view.to_screen(Point::new(x, y)) }
    pub fn to_graph(&self, x: f64, y: f64) -> Point { self.view.to_graph(Point::new(x, y)) }

    pub fn grid_lines(&self) -> GridLines {
        if !self.loaded {
            return GridLines::default();
        }
        self.view.grid_lines(self.config.granularity)
    }

    // Edits

    pub fn undo(&mut self) -> bool {
        if !matches!(self.state, InteractionState::Idle) || !self.history.undo(&mut self.graph) {
            return false;
        }
        self.geometry_changed();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !matches!(self.state, InteractionState::Idle) || !self.history.redo(&mut self.graph) {
            return false;
        }
        self.geometry_changed();
        true
    }

    pub fn delete_selected_bends(&mut self) -> bool { interaction::delete_selected_bends(self) }

    pub fn toggle_force_pan(&mut self) -> bool {
        self.force_pan = !self.force_pan;
        debug!("force pan {}", self.force_pan);
        self.force_pan
    }

    /// Switches the add-bend tool; variants without editable bends keep it off.
    pub fn toggle_add_bend(&mut self) -> bool {
        self.add_bend = self.evaluator.bends_editable() && !self.add_bend;
        debug!("add-bend tool {}", self.add_bend);
        self.add_bend
    }

    // Keyboard

    /// Runs the bound action, if any, and returns it so the shell can finish
    /// the ones that need it (dialogs, files, server).
    pub fn key(&mut self, key: &str, code: &str, phase: KeyPhase) -> Option<Action> {
        let action = self.keymap.resolve(key, code, phase)?;
        match action {
            Action::ForcePan => { self.toggle_force_pan(); }
            Action::Undo => { self.undo(); }
            Action::Redo => { self.redo(); }
            Action::ZoomIn => self.zoom_in(),
            Action::ZoomOut => self.zoom_out(),
            Action::Center => self.center(),
            Action::AddBend => { self.toggle_add_bend(); }
            Action::DeleteBends => { self.delete_selected_bends(); }
            Action::PanLeft => self.translate(-1.0, 0.0),
            Action::PanRight => self.translate(1.0, 0.0),
            Action::PanUp => self.translate(0.0, -1.0),
            Action::PanDown => self.translate(0.0, 1.0),
            Action::CloseModal | Action::ConfirmModal => { self.keymap.pop_scope(); }
            Action::Open | Action::Save | Action::Copy | Action::Paste
            | Action::LoadFromServer | Action::Submit => {}
        }
        Some(action)
    }

    /// Background shortcuts stay silent until the modal closes.
    pub fn open_modal(&mut self) { self.keymap.push_modal(); }

    pub fn close_modal(&mut self) -> bool { self.keymap.pop_scope() }

    pub fn in_modal(&self) -> bool { self.keymap.in_modal() }
}

impl Default for Session {
    fn default() -> Self { Session::new(Config::default()) }
}
