#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

use crate::model::{ElementBounds, Viewport};

const FALLBACK_VIEWPORT: Viewport = Viewport {
    width: 1024.0,
    height: 768.0,
};

/// Current wall-clock time in milliseconds, used by the throttles.
pub fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
            * 1000.0
    }
}

pub(super) fn viewport() -> Viewport {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let read = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>, fallback| {
                value.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
            };
            return Viewport {
                width: read(window.inner_width(), FALLBACK_VIEWPORT.width),
                height: read(window.inner_height(), FALLBACK_VIEWPORT.height),
            };
        }
    }

    FALLBACK_VIEWPORT
}

pub(super) fn element_bounds(element_id: &str) -> Option<ElementBounds> {
    #[cfg(target_arch = "wasm32")]
    {
        let element = web_sys::window()?
            .document()?
            .get_element_by_id(element_id)?;
        let rect = element.get_bounding_client_rect();
        Some(ElementBounds {
            top: rect.top(),
            left: rect.left(),
            right: rect.right(),
            bottom: rect.bottom(),
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = element_id;
        None
    }
}

pub(super) fn dispatch_window_resize() {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        match web_sys::Event::new("resize") {
            Ok(event) => {
                let _ = window.dispatch_event(&event);
            }
            Err(err) => leptos::logging::warn!("could not create resize event: {err:?}"),
        }
    }
}

/// Focuses the first focusable descendant of `element_id` on the next tick, after the
/// activity's content has rendered.
pub(super) fn focus_first_focusable(element_id: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let element_id = element_id.to_string();
        let callback = Closure::once_into_js(move || {
            let Some(container) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id(&element_id))
            else {
                return;
            };
            let Ok(Some(target)) = container.query_selector(super::FOCUSABLE_SELECTOR) else {
                return;
            };
            if let Ok(target) = target.dyn_into::<web_sys::HtmlElement>() {
                let _ = target.focus();
            }
        });
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0);
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = element_id;
}

/// Runs `task` once the browser has laid out the current DOM; immediately off the browser.
pub(super) fn after_next_frame(task: impl FnOnce() + 'static) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::once_into_js(task);
        if let Err(err) = window.request_animation_frame(callback.unchecked_ref()) {
            leptos::logging::warn!("could not request animation frame: {err:?}");
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        task();
    }
}

/// Capture-phase listener on an event target, removed on drop.
pub struct CaptureListener {
    #[cfg(target_arch = "wasm32")]
    target: web_sys::EventTarget,
    #[cfg(target_arch = "wasm32")]
    event: &'static str,
    #[cfg(target_arch = "wasm32")]
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl CaptureListener {
    /// Listens for `event` on `target` before any descendant sees it.
    pub fn install(
        target: &web_sys::EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Option<Self> {
        #[cfg(target_arch = "wasm32")]
        {
            let callback = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
            target
                .add_event_listener_with_callback_and_bool(
                    event,
                    callback.as_ref().unchecked_ref(),
                    true,
                )
                .ok()?;
            Some(Self {
                target: target.clone(),
                event,
                callback,
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (target, event, handler);
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for CaptureListener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback_and_bool(
            self.event,
            self.callback.as_ref().unchecked_ref(),
            true,
        );
    }
}
