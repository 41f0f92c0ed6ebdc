use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use super::movement::Ticker;

/// `window.setInterval` backed ticker. The callback is bound after construction
/// so it can hold a weak handle back to whatever owns this ticker.
pub struct IntervalTicker {
    window: Window,
    callback: Option<Closure<dyn FnMut()>>,
    handle: Option<i32>,
}

impl IntervalTicker {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: None,
            handle: None,
        }
    }

    pub fn bind(&mut self, callback: Closure<dyn FnMut()>) {
        self.stop();
        self.callback = Some(callback);
    }
}

impl Ticker for IntervalTicker {
    fn start(&mut self, period_ms: i32) {
        self.stop();
        let Some(cb) = &self.callback else {
            tracing::warn!("pan interval started before a callback was bound");
            return;
        };
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                period_ms,
            ) {
            Ok(id) => self.handle = Some(id),
            Err(e) => tracing::error!(?e, "setInterval failed"),
        }
    }

    fn stop(&mut self) {
        if let Some(id) = self.handle.take() {
            self.window.clear_interval_with_handle(id);
        }
    }

    fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
