//! JavaScript bindings for the clock intro.
//!
//! The page owns `requestAnimationFrame` and `setTimeout`. After every call
//! into an [`IntroHandle`] it drains [`IntroHandle::take_requests`] and
//! applies each request, reporting back through [`IntroHandle::frame`] and
//! [`IntroHandle::timer`] with the id it was given:
//!
//! ```js
//! const intro = new IntroHandle(null, () => showPage());
//! intro.mount();
//! for (const req of JSON.parse(intro.take_requests())) {
//!   if (req.op === "request_frame") raf[req.id] = requestAnimationFrame(t => intro.frame(req.id, t));
//!   // ...
//! }
//! ```

mod console;
mod scroll;

use clock_intro_core::render::{Presentation, render_intro};
use clock_intro_core::svg::render_svg;
use clock_intro_core::{
    ClockIntroController, DismissInput, FrameHandle, FrameScheduler, IntroConfig, IntroKey,
    LocalClock, TimerHandle, TimerKind,
};
use clock_intro_protocol::Viewport;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use scroll::BodyScrollLock;

/// One instruction for the page's event loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HostRequest {
    RequestFrame { id: u64 },
    CancelFrame { id: u64 },
    SetTimeout { id: u64, delay_ms: f64 },
    ClearTimeout { id: u64 },
}

/// Records scheduling requests until the page collects them.
#[derive(Debug, Default)]
pub struct JsScheduler {
    next_id: u64,
    requests: Vec<HostRequest>,
}

impl JsScheduler {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn drain(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl FrameScheduler for JsScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let id = self.next_id();
        self.requests.push(HostRequest::RequestFrame { id });
        FrameHandle(id)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.requests.push(HostRequest::CancelFrame { id: handle.0 });
    }

    fn start_timer(&mut self, _kind: TimerKind, delay_ms: f64) -> TimerHandle {
        let id = self.next_id();
        self.requests.push(HostRequest::SetTimeout { id, delay_ms });
        TimerHandle(id)
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        self.requests.push(HostRequest::ClearTimeout { id: handle.0 });
    }
}

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// Route panics to the browser console.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// A running intro bound to the document body.
#[wasm_bindgen]
pub struct IntroHandle {
    controller: ClockIntroController<JsScheduler, BodyScrollLock, LocalClock>,
}

#[wasm_bindgen]
impl IntroHandle {
    /// `config_json` may be a partial config document or `null`.
    /// `on_complete` is invoked once, after the exit delay.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: Option<String>,
        on_complete: js_sys::Function,
    ) -> Result<IntroHandle, JsError> {
        let config = match config_json.as_deref() {
            Some(text) => IntroConfig::from_json(text).map_err(js_err)?,
            None => IntroConfig::default(),
        };
        let controller = ClockIntroController::new(
            config,
            JsScheduler::default(),
            BodyScrollLock::default(),
            move || {
                if let Err(e) = on_complete.call0(&JsValue::NULL) {
                    console::error("completion callback", &e);
                }
            },
        );
        Ok(Self { controller })
    }

    pub fn mount(&mut self) {
        self.controller.mount();
    }

    pub fn unmount(&mut self) {
        self.controller.unmount();
    }

    /// Pending scheduling requests, as a JSON array of [`HostRequest`].
    pub fn take_requests(&mut self) -> Result<String, JsError> {
        let requests = self.controller.scheduler_mut().drain();
        serde_json::to_string(&requests).map_err(js_err)
    }

    /// Deliver an animation frame; `now_ms` is the rAF timestamp.
    pub fn frame(&mut self, id: u32, now_ms: f64) -> bool {
        self.controller.on_frame(FrameHandle(u64::from(id)), now_ms)
    }

    /// Deliver a fired timeout; `now_ms` is `performance.now()`.
    pub fn timer(&mut self, id: u32, now_ms: f64) -> bool {
        self.controller.on_timer(TimerHandle(u64::from(id)), now_ms)
    }

    /// Returns whether the page should call `preventDefault()`.
    pub fn click(&mut self, on_control: bool) -> bool {
        self.controller
            .dismiss(DismissInput::Click { on_control })
            .prevent_default
    }

    pub fn touch_start(&mut self, on_control: bool) -> bool {
        self.controller
            .dismiss(DismissInput::TouchStart { on_control })
            .prevent_default
    }

    pub fn wheel(&mut self) -> bool {
        self.controller.dismiss(DismissInput::Wheel).prevent_default
    }

    /// `key` is a DOM `KeyboardEvent.key` value.
    pub fn key(&mut self, key: &str) -> bool {
        self.controller
            .dismiss(DismissInput::Key(IntroKey::from_dom_key(key)))
            .prevent_default
    }

    pub fn skip(&mut self) -> bool {
        self.controller.dismiss(DismissInput::Skip).dismissed
    }

    /// The current [`IntroFrame`](clock_intro_protocol::IntroFrame) as JSON.
    pub fn snapshot(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.controller.frame()).map_err(js_err)
    }

    /// Draw commands for the current frame, as JSON. `now_ms` drives the
    /// looping continue hint.
    pub fn render(
        &self,
        width: f64,
        height: f64,
        dpr: f64,
        layer_opacity: f32,
        skip_hovered: bool,
        now_ms: f64,
    ) -> Result<String, JsError> {
        let viewport = Viewport {
            dpr,
            ..Viewport::new(width, height)
        };
        let presentation = Presentation {
            layer_opacity,
            skip_hovered,
            now_ms,
        };
        let commands = render_intro(
            &self.controller.frame(),
            &viewport,
            &self.controller.config().labels,
            &presentation,
        );
        serde_json::to_string(&commands).map_err(js_err)
    }

    /// The current frame as a standalone SVG document.
    pub fn render_svg(&self, width: f64, height: f64) -> String {
        let commands = render_intro(
            &self.controller.frame(),
            &Viewport::new(width, height),
            &self.controller.config().labels,
            &Presentation::default(),
        );
        render_svg(&commands, width, height)
    }
}

/// `HH:MM:SS` on a 12-hour dial.
#[wasm_bindgen]
pub fn format_time(hours: u32, minutes: u32, seconds: u32) -> String {
    clock_intro_core::angles::format_time(hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_drain_in_issue_order() {
        let mut s = JsScheduler::default();
        let f = s.request_frame();
        let t = s.start_timer(TimerKind::Boot, 400.0);
        s.cancel_frame(f);
        s.cancel_timer(t);
        assert_eq!(
            s.drain(),
            vec![
                HostRequest::RequestFrame { id: 1 },
                HostRequest::SetTimeout {
                    id: 2,
                    delay_ms: 400.0
                },
                HostRequest::CancelFrame { id: 1 },
                HostRequest::ClearTimeout { id: 2 },
            ]
        );
        assert!(s.drain().is_empty());
    }

    #[test]
    fn requests_serialize_with_op_tag() {
        let json = serde_json::to_string(&HostRequest::SetTimeout {
            id: 7,
            delay_ms: 600.0,
        });
        assert_eq!(
            json.ok().as_deref(),
            Some(r#"{"op":"set_timeout","id":7,"delay_ms":600.0}"#)
        );
    }
}
