//! Thin owners for browser resources. Each handle releases its timer,
//! listener or frame callback on drop, so components keep them in effect
//! state and let the cleanup closure drop them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

pub fn viewport_size() -> (f64, f64) {
    let Some(win) = window() else {
        return (1280.0, 720.0);
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0);

    (width, height)
}

pub fn scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

pub fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

pub fn current_path() -> String {
    window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

pub fn push_history(path: &str) {
    if let Some(history) = window().and_then(|w| w.history().ok()) {
        let _ = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path));
    }
}

pub fn scroll_to_id(id: &str) {
    if let Some(element) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    {
        element.scroll_into_view();
    }
}

pub fn is_text_field(target: &EventTarget) -> bool {
    target.dyn_ref::<HtmlInputElement>().is_some()
        || target.dyn_ref::<HtmlTextAreaElement>().is_some()
}

/// Distance from the top of the document, following the offset parent chain.
/// Transforms do not affect it.
pub fn document_offset(element: &HtmlElement) -> f64 {
    let mut top = f64::from(element.offset_top());
    let mut parent = element.offset_parent();

    while let Some(current) = parent.and_then(|p| p.dyn_into::<HtmlElement>().ok()) {
        top += f64::from(current.offset_top());
        parent = current.offset_parent();
    }

    top
}

/// Fires once after `ms`; the closure frees itself after running. Use
/// [`Timeout`] when the call may need cancelling.
pub fn set_timeout_detached(ms: u32, f: impl FnOnce() + 'static) {
    let Some(win) = window() else {
        return;
    };

    let callback = Closure::once_into_js(f);
    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        ms as i32,
    );
}

pub struct Timeout {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn new(ms: u32, f: impl FnOnce() + 'static) -> Option<Self> {
        let mut f = Some(f);
        let callback = Closure::<dyn FnMut()>::new(move || {
            if let Some(f) = f.take() {
                f();
            }
        });

        let id = window()?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                ms as i32,
            )
            .ok()?;

        Some(Self {
            id,
            _callback: callback,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(win) = window() {
            win.clear_timeout_with_handle(self.id);
        }
    }
}

pub struct Interval {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn new(ms: u32, f: impl FnMut() + 'static) -> Option<Self> {
        let callback = Closure::<dyn FnMut()>::new(f);
        let id = window()?
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                ms as i32,
            )
            .ok()?;

        Some(Self {
            id,
            _callback: callback,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let Some(win) = window() {
            win.clear_interval_with_handle(self.id);
        }
    }
}

pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(target: &EventTarget, event: &'static str, f: impl FnMut(Event) + 'static) -> Self {
        let callback = Closure::<dyn FnMut(Event)>::new(f);
        let _ = target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref());

        Self {
            target: target.clone(),
            event,
            callback,
        }
    }

    pub fn on_window(event: &'static str, f: impl FnMut(Event) + 'static) -> Option<Self> {
        let win = window()?;
        Some(Self::new(&win, event, f))
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Calls `tick` once per animation frame until dropped.
pub struct AnimationLoop {
    handle: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl AnimationLoop {
    pub fn start(mut tick: impl FnMut() + 'static) -> Option<Self> {
        let win = window()?;
        let handle = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        let next_frame = callback.clone();
        let next_handle = handle.clone();
        *callback.borrow_mut() = Some(Closure::new(move |_timestamp: f64| {
            tick();

            let Some(win) = window() else {
                return;
            };
            if let Some(frame) = next_frame.borrow().as_ref() {
                next_handle.set(win.request_animation_frame(frame.as_ref().unchecked_ref()).ok());
            }
        }));

        if let Some(frame) = callback.borrow().as_ref() {
            handle.set(win.request_animation_frame(frame.as_ref().unchecked_ref()).ok());
        }

        Some(Self { handle, callback })
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        if let (Some(win), Some(id)) = (window(), self.handle.take()) {
            let _ = win.cancel_animation_frame(id);
        }

        // The loop may be dropped from inside its own frame; free the
        // closure on the next task instead.
        let callback = self.callback.borrow_mut().take();
        set_timeout_detached(0, move || drop(callback));
    }
}

/// Runs `f` on the next animation frame.
pub fn next_frame(f: impl FnOnce() + 'static) {
    if let Some(win) = window() {
        let callback = Closure::once_into_js(move |_timestamp: f64| f());
        let _ = win.request_animation_frame(callback.unchecked_ref());
    }
}
