use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
    time::Duration,
};

use leptos::leptos_dom::helpers::TimeoutHandle;

use super::dom::now_ms;
use crate::throttle::{ThrottleDecision, ThrottleGate};

#[cfg(target_arch = "wasm32")]
fn start_timeout(task: impl FnOnce() + 'static, delay: Duration) -> Option<TimeoutHandle> {
    match leptos::set_timeout_with_handle(task, delay) {
        Ok(handle) => Some(handle),
        Err(err) => {
            leptos::logging::warn!("failed to schedule timer: {err:?}");
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn start_timeout(task: impl FnOnce() + 'static, delay: Duration) -> Option<TimeoutHandle> {
    let _ = (task, delay);
    None
}

/// Single-slot timeout: scheduling again replaces whatever is pending.
#[derive(Clone, Default)]
pub struct DeferredTask {
    pending: Rc<Cell<Option<TimeoutHandle>>>,
}

impl DeferredTask {
    pub fn schedule(&self, delay: Duration, task: impl FnOnce() + 'static) {
        self.cancel();
        let pending = Rc::clone(&self.pending);
        let handle = start_timeout(
            move || {
                pending.set(None);
                task();
            },
            delay,
        );
        self.pending.set(handle);
    }

    pub fn cancel(&self) {
        if let Some(handle) = self.pending.take() {
            handle.clear();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

/// Independent timeouts that each run once; only [`TimerSet::cancel_all`] stops them early.
#[derive(Clone, Default)]
pub struct TimerSet {
    pending: Rc<RefCell<BTreeMap<u64, TimeoutHandle>>>,
    next_key: Rc<Cell<u64>>,
}

impl TimerSet {
    pub fn schedule(&self, delay: Duration, task: impl FnOnce() + 'static) {
        let key = self.next_key.get();
        self.next_key.set(key.wrapping_add(1));

        let pending = Rc::clone(&self.pending);
        let handle = start_timeout(
            move || {
                pending.borrow_mut().remove(&key);
                task();
            },
            delay,
        );
        if let Some(handle) = handle {
            self.pending.borrow_mut().insert(key, handle);
        }
    }

    pub fn cancel_all(&self) {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        for handle in pending.into_values() {
            handle.clear();
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }
}

/// Callback limited to one run per interval, plus one trailing run for suppressed calls.
#[derive(Clone)]
pub struct ThrottledCallback {
    gate: Rc<RefCell<ThrottleGate>>,
    callback: Rc<dyn Fn()>,
    trailing: DeferredTask,
}

impl ThrottledCallback {
    pub fn new(interval: Duration, callback: impl Fn() + 'static) -> Self {
        Self {
            gate: Rc::new(RefCell::new(ThrottleGate::new(interval))),
            callback: Rc::new(callback),
            trailing: DeferredTask::default(),
        }
    }

    pub fn call(&self) {
        let decision = self.gate.borrow_mut().call(now_ms());
        match decision {
            ThrottleDecision::Fire => (self.callback)(),
            ThrottleDecision::ScheduleTrailing { delay_ms } => {
                let gate = Rc::clone(&self.gate);
                let callback = Rc::clone(&self.callback);
                self.trailing.schedule(
                    Duration::from_millis(delay_ms.max(0.0).ceil() as u64),
                    move || {
                        let fire = gate.borrow_mut().trailing_elapsed(now_ms());
                        if fire {
                            callback();
                        }
                    },
                );
            }
            ThrottleDecision::Coalesced => {}
        }
    }

    /// Drops any pending trailing run.
    pub fn cancel(&self) {
        self.gate.borrow_mut().cancel();
        self.trailing.cancel();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn leading_call_runs_immediately() {
        let count = Rc::new(Cell::new(0));
        let throttled = ThrottledCallback::new(Duration::from_secs(60), {
            let count = Rc::clone(&count);
            move || count.set(count.get() + 1)
        });

        throttled.call();
        throttled.call();
        throttled.call();

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn timer_set_keys_every_schedule_separately() {
        let timers = TimerSet::default();
        timers.schedule(Duration::from_millis(200), || {});
        timers.schedule(Duration::from_millis(200), || {});

        assert_eq!(timers.next_key.get(), 2);
        timers.cancel_all();
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn cancelled_task_is_not_pending() {
        let task = DeferredTask::default();
        task.schedule(Duration::from_millis(10), || {});
        task.cancel();

        assert!(!task.is_pending());
    }
}
