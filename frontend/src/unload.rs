//! Best-effort "leave page?" prompt while missions are in progress.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{BeforeUnloadEvent, Window};

/// Registers a `beforeunload` listener for its whole lifetime. The listener
/// only asks the browser to confirm while the guard is armed.
pub struct UnloadGuard {
    window: Option<Window>,
    armed: Rc<Cell<bool>>,
    handler: Option<Closure<dyn FnMut(BeforeUnloadEvent)>>,
}

impl UnloadGuard {
    pub fn install() -> Self {
        let armed = Rc::new(Cell::new(false));
        let window = web_sys::window();
        let mut handler = None;

        if let Some(window) = &window {
            let armed_flag = armed.clone();
            let closure =
                Closure::<dyn FnMut(BeforeUnloadEvent)>::new(move |event: BeforeUnloadEvent| {
                    if armed_flag.get() {
                        event.prevent_default();
                        // older browsers only prompt when a return value is set
                        event.set_return_value("");
                    }
                });
            match window
                .add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref())
            {
                Ok(()) => handler = Some(closure),
                Err(e) => tracing::warn!(error = ?e, "beforeunload listener not installed"),
            }
        }

        Self {
            window,
            armed,
            handler,
        }
    }

    pub fn set_armed(&self, armed: bool) {
        if self.armed.replace(armed) != armed {
            tracing::debug!(armed, "unload prompt");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.get()
    }

    pub fn is_installed(&self) -> bool {
        self.handler.is_some()
    }
}

impl Drop for UnloadGuard {
    fn drop(&mut self) {
        if let (Some(window), Some(handler)) = (&self.window, &self.handler) {
            let _ = window.remove_event_listener_with_callback(
                "beforeunload",
                handler.as_ref().unchecked_ref(),
            );
        }
    }
}
