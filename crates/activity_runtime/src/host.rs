//! Browser-facing helpers for executing runtime effects and measuring the page.
//!
//! Everything that touches `window`, `document`, or timers lives behind this module so the
//! reducer, geometry, and command façade stay testable off the browser.

mod container_observer;
mod dom;
mod timers;

use std::cell::Cell;

use leptos::logging;

pub(crate) use container_observer::observe_container;
pub use dom::{now_ms, CaptureListener};
pub use timers::{DeferredTask, ThrottledCallback, TimerSet};

use crate::{
    geometry::visible_container_rect,
    model::{ActivityId, ContainerRect, Viewport},
    reducer::RuntimeEffect,
    runtime_context::ActivityRuntimeContext,
};

/// Selector for the first element that can take keyboard focus inside activity content.
pub const FOCUSABLE_SELECTOR: &str =
    "button, [href], input, select, textarea, [tabindex]:not([tabindex=\"-1\"])";

/// DOM id of the element wrapping an activity's content.
///
/// Bytes outside `[A-Za-z0-9-]` are written as `_XX` hex, so any activity id yields a valid
/// selector and distinct ids never share an element id.
pub fn activity_content_dom_id(id: &ActivityId) -> String {
    let mut dom_id = String::from("activity-content-");
    for byte in id.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            dom_id.push(char::from(byte));
        } else {
            dom_id.push_str(&format!("_{byte:02X}"));
        }
    }
    dom_id
}

#[derive(Debug, Clone, Default)]
/// Host services for one mounted activity renderer.
pub struct ActivityHostContext {
    container_element_id: String,
    warned_missing_container: Cell<bool>,
}

impl ActivityHostContext {
    pub fn new(container_element_id: impl Into<String>) -> Self {
        Self {
            container_element_id: container_element_id.into(),
            warned_missing_container: Cell::new(false),
        }
    }

    pub fn container_element_id(&self) -> &str {
        &self.container_element_id
    }

    pub fn viewport(&self) -> Viewport {
        dom::viewport()
    }

    /// Visible rectangle of the container element, or an empty rect when it is not in the page.
    pub fn container_rect(&self) -> ContainerRect {
        match dom::element_bounds(&self.container_element_id) {
            Some(bounds) => {
                self.warned_missing_container.set(false);
                visible_container_rect(bounds, self.viewport())
            }
            None => {
                if !self.warned_missing_container.replace(true) {
                    logging::warn!(
                        "activity container `#{}` not found; drawing into an empty rect",
                        self.container_element_id
                    );
                }
                ContainerRect::default()
            }
        }
    }

    /// Tells page content that layout changed by dispatching a window `resize` event.
    pub fn broadcast_layout_change(&self) {
        dom::dispatch_window_resize();
    }

    pub fn focus_activity_content(&self, id: &ActivityId) {
        dom::focus_first_focusable(&activity_content_dom_id(id));
    }

    /// Executes one reducer-emitted effect.
    pub fn run_runtime_effect(&self, runtime: ActivityRuntimeContext, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::FocusActivityContent(id) => self.focus_activity_content(&id),
            RuntimeEffect::ActivitiesRemoved(ids) => runtime.abandon_sessions_for(&ids),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn content_dom_id_is_selector_safe() {
        assert_eq!(
            activity_content_dom_id(&ActivityId::new("cluster/pod logs#1")),
            "activity-content-cluster_2Fpod_20logs_231"
        );
        assert_eq!(
            activity_content_dom_id(&ActivityId::new("shell-2")),
            "activity-content-shell-2"
        );
    }

    #[test]
    fn content_dom_ids_never_collide() {
        let slash = activity_content_dom_id(&ActivityId::new("logs/pod-a"));
        let underscore = activity_content_dom_id(&ActivityId::new("logs_pod-a"));

        assert_ne!(slash, underscore);
        assert_eq!(underscore, "activity-content-logs_5Fpod-a");
        assert_eq!(
            activity_content_dom_id(&ActivityId::new("caf\u{e9}")),
            "activity-content-caf_C3_A9"
        );
    }

    #[test]
    fn missing_container_measures_as_empty() {
        let host = ActivityHostContext::new("nowhere");

        assert_eq!(host.container_rect(), ContainerRect::default());
        assert_eq!(host.container_element_id(), "nowhere");
    }
}
