//! `HtmlAudioElement` playback for music and sound cues.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spyboard_shared::playlist::AudioOutput;
use spyboard_shared::PlaybackRejected;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{DomException, Event, HtmlAudioElement};

/// One detached `<audio>` element.
///
/// `play()` resolves asynchronously; a late rejection and the `ended` event
/// are latched into shared cells and picked up by the next frame.
pub struct WebAudio {
    element: Option<HtmlAudioElement>,
    src: String,
    rejection: Rc<RefCell<Option<PlaybackRejected>>>,
    ended: Rc<Cell<bool>>,
    // keep the listener alive for as long as the element is used
    _onended: Option<Closure<dyn FnMut(Event)>>,
}

impl Default for WebAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudio {
    pub fn new() -> Self {
        let ended = Rc::new(Cell::new(false));
        let element = match HtmlAudioElement::new() {
            Ok(element) => Some(element),
            Err(e) => {
                tracing::warn!(error = ?e, "audio element unavailable, sound disabled");
                None
            }
        };

        let mut onended = None;
        if let Some(element) = &element {
            element.set_preload("auto");
            let ended_flag = ended.clone();
            let closure = Closure::<dyn FnMut(Event)>::new(move |_e: Event| {
                ended_flag.set(true);
            });
            if let Err(e) =
                element.add_event_listener_with_callback("ended", closure.as_ref().unchecked_ref())
            {
                tracing::warn!(error = ?e, "could not listen for track end");
            }
            onended = Some(closure);
        }

        Self {
            element,
            src: String::new(),
            rejection: Rc::new(RefCell::new(None)),
            ended,
            _onended: onended,
        }
    }

    fn rejected(&self, err: &JsValue) -> PlaybackRejected {
        PlaybackRejected {
            source_url: self.src.clone(),
            reason: describe(err),
        }
    }
}

impl AudioOutput for WebAudio {
    fn load(&mut self, src: &str) {
        self.src = src.to_string();
        self.ended.set(false);
        if let Some(element) = &self.element {
            element.set_src(src);
            element.set_current_time(0.0);
        }
    }

    fn play(&mut self) -> Result<(), PlaybackRejected> {
        let Some(element) = &self.element else {
            return Err(PlaybackRejected {
                source_url: self.src.clone(),
                reason: "no audio element".to_string(),
            });
        };
        let promise = element.play().map_err(|e| self.rejected(&e))?;
        let slot = self.rejection.clone();
        let source_url = self.src.clone();
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                *slot.borrow_mut() = Some(PlaybackRejected {
                    source_url,
                    reason: describe(&e),
                });
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(element) = &self.element {
            if let Err(e) = element.pause() {
                tracing::debug!(error = ?e, "pause failed");
            }
        }
    }

    fn set_volume(&mut self, volume: f64) {
        if let Some(element) = &self.element {
            element.set_volume(volume.clamp(0.0, 1.0));
        }
    }

    fn take_rejection(&mut self) -> Option<PlaybackRejected> {
        self.rejection.borrow_mut().take()
    }

    fn take_ended(&mut self) -> bool {
        self.ended.replace(false)
    }
}

impl Drop for WebAudio {
    fn drop(&mut self) {
        if let Some(element) = &self.element {
            let _ = element.pause();
            if let Some(closure) = &self._onended {
                let _ = element.remove_event_listener_with_callback(
                    "ended",
                    closure.as_ref().unchecked_ref(),
                );
            }
        }
    }
}

fn describe(err: &JsValue) -> String {
    match err.dyn_ref::<DomException>() {
        Some(exception) => format!("{}: {}", exception.name(), exception.message()),
        None => format!("{:?}", err),
    }
}
