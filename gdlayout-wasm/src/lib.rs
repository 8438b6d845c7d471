use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

#[wasm_bindgen]
pub struct Session { pub(crate) inner: gdlayout::Session }

impl Session {
    pub fn rs_new(config: gdlayout::Config) -> Session {
        init_logging();
        Session { inner: gdlayout::Session::new(config) }
    }
    pub fn rs_geom_version(&self) -> u64 { self.inner.geom_version() }
    pub fn rs_view_version(&self) -> u64 { self.inner.view_version() }
}

static LOGGING: std::sync::Once = std::sync::Once::new();

/// Routes `log` records to the browser console once per module instance.
pub fn init_logging() {
    LOGGING.call_once(|| {
        #[cfg(feature = "console_log")]
        {
            if console_log::init_with_level(log::Level::Debug).is_err() {
                web_sys::console::warn_1(&JsValue::from_str("gdlayout: a logger is already installed"));
            }
        }
        #[cfg(not(feature = "console_log"))]
        {
            web_sys::console::warn_1(&JsValue::from_str("gdlayout: built without console logging"));
        }
    });
}
