//! Browser console output. Nothing installs a `log` backend in the page, so
//! the bridge writes to `console` directly.

use std::fmt::Debug;

use wasm_bindgen::JsValue;

pub(crate) fn failure_message(what: &str, detail: &dyn Debug) -> String {
    format!("clock intro: {what} failed: {detail:?}")
}

pub(crate) fn warn(what: &str, detail: &JsValue) {
    web_sys::console::warn_1(&failure_message(what, detail).into());
}

pub(crate) fn error(what: &str, detail: &JsValue) {
    web_sys::console::error_1(&failure_message(what, detail).into());
}
