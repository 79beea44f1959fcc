//! Pointer-drag resizing for floating (`window`) activities.
//!
//! The drag writes straight into the activity's [`ActivityFrame`] signal instead of going
//! through the reducer, so canonical state never sees intermediate or final drag sizes.

use std::{cell::RefCell, rc::Rc, time::Duration};

use leptos::{
    leptos_dom::helpers::WindowListenerHandle, RwSignal, SignalUpdate, SignalWithUntracked,
};

use crate::{
    frame::ActivityFrame,
    host::{now_ms, DeferredTask},
    model::{ActivityId, FrameSize, PointerPosition},
    runtime_context::ActivityRuntimeContext,
    throttle::{ThrottleDecision, ThrottleGate},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeStep {
    pub size: FrameSize,
    pub notify: ThrottleDecision,
}

/// State of one resize drag, from pointer-down on the handle to pointer-up.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeDrag {
    activity_id: ActivityId,
    pointer_start: PointerPosition,
    size_start: FrameSize,
    minimum: FrameSize,
    notify: ThrottleGate,
    restore_transitions: bool,
}

impl ResizeDrag {
    pub fn begin(
        activity_id: ActivityId,
        pointer_start: PointerPosition,
        size_start: FrameSize,
        minimum: FrameSize,
        notify_interval: Duration,
        restore_transitions: bool,
    ) -> Self {
        Self {
            activity_id,
            pointer_start,
            size_start,
            minimum,
            notify: ThrottleGate::new(notify_interval),
            restore_transitions,
        }
    }

    pub fn activity_id(&self) -> &ActivityId {
        &self.activity_id
    }

    /// Transition setting to put back when the drag ends.
    pub fn restore_transitions(&self) -> bool {
        self.restore_transitions
    }

    /// Size for the given pointer position, never below the minimum and never NaN.
    pub fn size_at(&self, pointer: PointerPosition) -> FrameSize {
        let delta = |now: f64, start: f64| {
            let d = now - start;
            if d.is_finite() {
                d
            } else {
                0.0
            }
        };
        let clamp = |start: f64, d: f64, min: f64| {
            let size = start + d;
            if size.is_finite() {
                size.max(min)
            } else {
                min
            }
        };

        FrameSize {
            width: clamp(
                self.size_start.width,
                delta(pointer.x, self.pointer_start.x),
                self.minimum.width,
            ),
            height: clamp(
                self.size_start.height,
                delta(pointer.y, self.pointer_start.y),
                self.minimum.height,
            ),
        }
    }

    pub fn pointer_moved(&mut self, pointer: PointerPosition, now_ms: f64) -> ResizeStep {
        ResizeStep {
            size: self.size_at(pointer),
            notify: self.notify.call(now_ms),
        }
    }

    pub fn trailing_notify_elapsed(&mut self, now_ms: f64) -> bool {
        self.notify.trailing_elapsed(now_ms)
    }
}

pub(crate) struct ActiveResize {
    drag: ResizeDrag,
    frame: RwSignal<ActivityFrame>,
    listeners: Vec<WindowListenerHandle>,
    trailing_notify: DeferredTask,
}

impl ActiveResize {
    fn release(self) {
        for listener in self.listeners {
            listener.remove();
        }
        self.trailing_notify.cancel();
        let restore = self.drag.restore_transitions();
        let _ = self
            .frame
            .try_update(|frame| frame.set_transitions_enabled(restore));
    }
}

/// Holder for the single in-flight resize drag; listeners are keyed to it, not to the activity.
#[derive(Clone, Default)]
pub(crate) struct ResizeSlot(Rc<RefCell<Option<ActiveResize>>>);

impl ResizeSlot {
    fn activity_id(&self) -> Option<ActivityId> {
        self.0
            .borrow()
            .as_ref()
            .map(|active| active.drag.activity_id().clone())
    }

    /// Ends the current drag, removing its listeners exactly once.
    pub(crate) fn end(&self) {
        let taken = self.0.borrow_mut().take();
        if let Some(active) = taken {
            active.release();
        }
    }

    /// Abandons the drag when its activity is among `removed`.
    pub(crate) fn end_if_targets(&self, removed: &[ActivityId]) {
        let targeted = self
            .activity_id()
            .is_some_and(|id| removed.contains(&id));
        if targeted {
            self.end();
        }
    }

    fn step(
        &self,
        pointer: PointerPosition,
        now: f64,
    ) -> Option<(RwSignal<ActivityFrame>, DeferredTask, ResizeStep)> {
        let mut guard = self.0.borrow_mut();
        let active = guard.as_mut()?;
        let step = active.drag.pointer_moved(pointer, now);
        Some((active.frame, active.trailing_notify.clone(), step))
    }

    fn trailing_elapsed(&self, now: f64) -> bool {
        self.0
            .borrow_mut()
            .as_mut()
            .is_some_and(|active| active.drag.trailing_notify_elapsed(now))
    }
}

/// Starts a drag on the resize handle of `activity_id`, replacing any drag still in flight.
pub(crate) fn begin_resize(
    runtime: ActivityRuntimeContext,
    activity_id: ActivityId,
    frame: RwSignal<ActivityFrame>,
    pointer: PointerPosition,
    size_start: FrameSize,
) {
    let slot = runtime.resize_slot();
    slot.end();

    let config = runtime.config();
    let restore_transitions = frame
        .try_with_untracked(|f| f.transitions_enabled())
        .unwrap_or(true);
    let drag = ResizeDrag::begin(
        activity_id,
        pointer,
        size_start,
        FrameSize {
            width: config.min_window_width,
            height: config.min_window_height,
        },
        config.resize_notify_throttle(),
        restore_transitions,
    );
    let _ = frame.try_update(|f| f.set_transitions_enabled(false));

    let listeners = install_drag_listeners(runtime, slot.clone());
    *slot.0.borrow_mut() = Some(ActiveResize {
        drag,
        frame,
        listeners,
        trailing_notify: DeferredTask::default(),
    });
}

fn pointer_moved(runtime: ActivityRuntimeContext, slot: &ResizeSlot, pointer: PointerPosition) {
    let Some(activity_id) = slot.activity_id() else {
        return;
    };
    if !runtime.is_live(&activity_id) {
        slot.end();
        return;
    }

    let Some((frame, trailing_notify, step)) = slot.step(pointer, now_ms()) else {
        return;
    };
    if frame.try_update(|f| f.resize_to(step.size)).is_none() {
        slot.end();
        return;
    }

    match step.notify {
        ThrottleDecision::Fire => runtime.broadcast_layout_change(),
        ThrottleDecision::ScheduleTrailing { delay_ms } => {
            let slot = slot.clone();
            trailing_notify.schedule(
                Duration::from_millis(delay_ms.max(0.0).ceil() as u64),
                move || {
                    if slot.trailing_elapsed(now_ms()) {
                        runtime.broadcast_layout_change();
                    }
                },
            );
        }
        ThrottleDecision::Coalesced => {}
    }
}

#[cfg(target_arch = "wasm32")]
fn install_drag_listeners(
    runtime: ActivityRuntimeContext,
    slot: ResizeSlot,
) -> Vec<WindowListenerHandle> {
    use leptos::{ev, window_event_listener};

    let move_slot = slot.clone();
    let on_move = window_event_listener(ev::pointermove, move |ev| {
        pointer_moved(
            runtime,
            &move_slot,
            PointerPosition {
                x: f64::from(ev.client_x()),
                y: f64::from(ev.client_y()),
            },
        );
    });
    let up_slot = slot.clone();
    let on_up = window_event_listener(ev::pointerup, move |_| up_slot.end());
    let on_cancel = window_event_listener(ev::pointercancel, move |_| slot.end());
    vec![on_move, on_up, on_cancel]
}

#[cfg(not(target_arch = "wasm32"))]
fn install_drag_listeners(
    runtime: ActivityRuntimeContext,
    slot: ResizeSlot,
) -> Vec<WindowListenerHandle> {
    let _ = (runtime, slot, pointer_moved);
    Vec::new()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const MINIMUM: FrameSize = FrameSize {
        width: 400.0,
        height: 200.0,
    };

    fn drag(start: FrameSize) -> ResizeDrag {
        ResizeDrag::begin(
            "logs".into(),
            PointerPosition { x: 500.0, y: 400.0 },
            start,
            MINIMUM,
            Duration::from_millis(100),
            true,
        )
    }

    #[test]
    fn drag_grows_by_pointer_delta() {
        let drag = drag(FrameSize {
            width: 640.0,
            height: 480.0,
        });

        assert_eq!(
            drag.size_at(PointerPosition { x: 560.0, y: 380.0 }),
            FrameSize {
                width: 700.0,
                height: 460.0
            }
        );
    }

    #[test]
    fn drag_never_shrinks_below_minimum() {
        let drag = drag(MINIMUM);

        assert_eq!(
            drag.size_at(PointerPosition {
                x: 500.0 - 1000.0,
                y: 400.0 - 1000.0,
            }),
            MINIMUM
        );
    }

    #[test]
    fn non_finite_input_clamps_to_minimum_or_start() {
        let drag = drag(FrameSize {
            width: f64::NAN,
            height: 300.0,
        });

        let size = drag.size_at(PointerPosition {
            x: 600.0,
            y: f64::INFINITY,
        });

        assert_eq!(size, FrameSize { width: 400.0, height: 300.0 });
    }

    #[test]
    fn notifications_are_throttled_while_dragging() {
        let mut drag = drag(MINIMUM);
        let at = |x: f64| PointerPosition { x, y: 400.0 };

        assert_eq!(drag.pointer_moved(at(510.0), 0.0).notify, ThrottleDecision::Fire);
        assert_eq!(
            drag.pointer_moved(at(520.0), 30.0).notify,
            ThrottleDecision::ScheduleTrailing { delay_ms: 70.0 }
        );
        assert_eq!(
            drag.pointer_moved(at(530.0), 60.0).notify,
            ThrottleDecision::Coalesced
        );
        assert!(drag.trailing_notify_elapsed(100.0));
        assert_eq!(drag.pointer_moved(at(540.0), 200.0).notify, ThrottleDecision::Fire);
    }

    #[test]
    fn drag_remembers_transition_setting_to_restore() {
        let drag = ResizeDrag::begin(
            "logs".into(),
            PointerPosition::default(),
            MINIMUM,
            MINIMUM,
            Duration::from_millis(100),
            false,
        );

        assert!(!drag.restore_transitions());
        assert_eq!(drag.activity_id().as_str(), "logs");
    }
}
