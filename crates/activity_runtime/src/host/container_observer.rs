use leptos::leptos_dom::helpers::WindowListenerHandle;

use super::{dom, timers::ThrottledCallback};
use crate::runtime_context::ActivityRuntimeContext;

/// Keeps the container rectangle signal in sync with window resizes and page scrolls.
///
/// Listeners are removed and any trailing refresh is cancelled when this is dropped.
pub(crate) struct ContainerObserver {
    refresh: ThrottledCallback,
    resize: Option<WindowListenerHandle>,
    #[cfg(target_arch = "wasm32")]
    _scroll: Option<dom::CaptureListener>,
}

impl Drop for ContainerObserver {
    fn drop(&mut self) {
        if let Some(listener) = self.resize.take() {
            listener.remove();
        }
        self.refresh.cancel();
    }
}

/// Measures the container once the mounted page has been laid out, then re-measures on every
/// throttled resize or scroll.
pub(crate) fn observe_container(runtime: ActivityRuntimeContext) -> ContainerObserver {
    dom::after_next_frame(move || runtime.refresh_container());

    let refresh = ThrottledCallback::new(runtime.config().container_refresh_throttle(), move || {
        runtime.refresh_container()
    });

    #[cfg(target_arch = "wasm32")]
    {
        let on_resize = refresh.clone();
        let resize = leptos::window_event_listener(leptos::ev::resize, move |_| on_resize.call());
        ContainerObserver {
            _scroll: web_sys::window().and_then(|window| {
                let on_scroll = refresh.clone();
                dom::CaptureListener::install(&window, "scroll", move |_| on_scroll.call())
            }),
            refresh,
            resize: Some(resize),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        ContainerObserver {
            refresh,
            resize: None,
        }
    }
}
