use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ForcePan,
    Open,
    Save,
    Copy,
    Paste,
    LoadFromServer,
    Submit,
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    Center,
    AddBend,
    DeleteBends,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    CloseModal,
    ConfirmModal,
}

/// `Press` fires for character keys, `Down` for keys without a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPhase {
    Press,
    Down,
}

#[derive(Clone, Debug, PartialEq)]
struct Binding {
    key: &'static str,
    phase: KeyPhase,
    action: Action,
}

const fn bind(key: &'static str, phase: KeyPhase, action: Action) -> Binding {
    Binding { key, phase, action }
}

/// Stack of binding scopes; only the innermost scope is consulted.
#[derive(Clone, Debug)]
pub struct KeyMap {
    scopes: Vec<Vec<Binding>>,
}

impl KeyMap {
    pub fn contest(bends_editable: bool) -> KeyMap {
        use Action::*;
        use KeyPhase::*;
        let mut base = vec![
            bind("T", Press, ForcePan),
            bind("O", Press, Open),
            bind("S", Press, Save),
            bind("C", Press, Copy),
            bind("V", Press, Paste),
            bind("L", Press, LoadFromServer),
            bind("K", Press, Submit),
            bind("Z", Press, Undo),
            bind("Y", Press, Redo),
            bind("+", Press, ZoomIn),
            bind("-", Press, ZoomOut),
            bind("X", Press, Center),
            bind("ArrowLeft", Down, PanLeft),
            bind("ArrowRight", Down, PanRight),
            bind("ArrowUp", Down, PanUp),
            bind("ArrowDown", Down, PanDown),
        ];
        if bends_editable {
            base.push(bind("A", Press, AddBend));
            base.push(bind("Delete", Down, DeleteBends));
        }
        KeyMap { scopes: vec![base] }
    }

    /// Opens a modal scope that only knows how to close or confirm it.
    pub fn push_modal(&mut self) {
        self.scopes.push(vec![
            bind("Escape", KeyPhase::Down, Action::CloseModal),
            bind("Enter", KeyPhase::Down, Action::ConfirmModal),
            bind("NumpadEnter", KeyPhase::Down, Action::ConfirmModal),
        ]);
    }

    /// Drops the innermost scope. The base scope stays.
    pub fn pop_scope(&mut self) -> bool {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            true
        } else {
            false
        }
    }

    pub fn in_modal(&self) -> bool { self.scopes.len() > 1 }

    /// Matches `key` or `code` case-insensitively against the innermost scope.
    pub fn resolve(&self, key: &str, code: &str, phase: KeyPhase) -> Option<Action> {
        let scope = self.scopes.last()?;
        scope
            .iter()
            .find(|b| b.phase == phase && (b.key.eq_ignore_ascii_case(key) || b.key.eq_ignore_ascii_case(code)))
            .map(|b| b.action)
    }
}
