use clock_intro_core::ScrollHost;
use wasm_bindgen::JsValue;
use web_sys::HtmlElement;

/// Locks page scrolling by pinning `<body>` with `position: fixed`.
///
/// While locked the window reports a scroll offset of zero, so the pinned
/// offset is remembered here.
#[derive(Debug, Default)]
pub struct BodyScrollLock {
    pinned: Option<f64>,
}

fn body() -> Option<HtmlElement> {
    web_sys::window()?.document()?.body()
}

fn log_failure(what: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        crate::console::warn(what, &e);
    }
}

impl ScrollHost for BodyScrollLock {
    fn scroll_offset(&self) -> f64 {
        if let Some(offset) = self.pinned {
            return offset;
        }
        web_sys::window()
            .and_then(|w| w.scroll_y().ok())
            .unwrap_or(0.0)
    }

    fn lock_scroll(&mut self, offset: f64) {
        let Some(body) = body() else {
            return;
        };
        let style = body.style();
        log_failure("pin body", style.set_property("position", "fixed"));
        log_failure("pin body", style.set_property("top", &format!("-{offset}px")));
        log_failure("pin body", style.set_property("width", "100%"));
        self.pinned = Some(offset);
    }

    fn unlock_scroll(&mut self) {
        self.pinned = None;
        let Some(body) = body() else {
            return;
        };
        let style = body.style();
        for property in ["position", "top", "width"] {
            log_failure("unpin body", style.remove_property(property).map(drop));
        }
    }

    fn scroll_to(&mut self, offset: f64) {
        if let Some(window) = web_sys::window() {
            window.scroll_to_with_x_and_y(0.0, offset);
        }
    }
}
