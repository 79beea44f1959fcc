//! Runtime provider and context wiring for the activity manager.
//!
//! This module owns the reducer-backed store, the runtime effect queue, container measurement,
//! and the attachment to the process-wide [`ActivityCommands`] façade. UI composition stays in
//! [`crate::components`].

use std::rc::Rc;

use leptos::*;

use crate::{
    commands::{ActivityCommands, ActivityStore},
    config::ActivityManagerConfig,
    effect_executor,
    host::{observe_container, ActivityHostContext, TimerSet},
    model::{ActivityId, ActivityState, ContainerRect},
    reducer::{reduce_activities, ActivityAction, ReduceContext, RuntimeEffect},
    resize::ResizeSlot,
};

#[derive(Clone, Copy)]
/// Leptos context for reading activity state and geometry inputs.
///
/// State is read-only from here; every mutation goes through [`ActivityCommands`].
pub struct ActivityRuntimeContext {
    /// Browser bindings used to run effects and measure the page.
    pub host: StoredValue<ActivityHostContext>,
    config: StoredValue<ActivityManagerConfig>,
    state: RwSignal<ActivityState>,
    /// Visible rectangle of the container element.
    pub container: RwSignal<ContainerRect>,
    /// Whether overview (tiled) mode is active.
    pub overview: RwSignal<bool>,
    /// Incremented on every layout broadcast; content can track it to re-measure itself.
    pub layout_epoch: RwSignal<u64>,
    /// Queue of runtime effects emitted by the reducer.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    commands: StoredValue<ActivityCommands>,
    resize: StoredValue<ResizeSlot>,
    layout_broadcasts: StoredValue<TimerSet>,
}

impl ActivityRuntimeContext {
    fn new(config: ActivityManagerConfig, commands: ActivityCommands) -> Self {
        Self {
            host: store_value(ActivityHostContext::new(config.container_element_id.clone())),
            config: store_value(config),
            state: create_rw_signal(ActivityState::default()),
            container: create_rw_signal(ContainerRect::default()),
            overview: create_rw_signal(false),
            layout_epoch: create_rw_signal(0),
            effects: create_rw_signal(Vec::new()),
            commands: store_value(commands),
            resize: store_value(ResizeSlot::default()),
            layout_broadcasts: store_value(TimerSet::default()),
        }
    }

    pub fn state(&self) -> ReadSignal<ActivityState> {
        self.state.read_only()
    }

    pub fn config(&self) -> ActivityManagerConfig {
        self.config.get_value()
    }

    pub fn commands(&self) -> ActivityCommands {
        self.commands.get_value()
    }

    pub(crate) fn resize_slot(&self) -> ResizeSlot {
        self.resize.get_value()
    }

    /// Whether `id` is still a known activity; false once the runtime has been torn down.
    pub fn is_live(&self, id: &ActivityId) -> bool {
        self.state
            .try_with_untracked(|state| state.contains(id))
            .unwrap_or(false)
    }

    /// Re-measures the container, writing only when the rectangle changed.
    pub fn refresh_container(&self) {
        let Some(rect) = self.host.try_with_value(ActivityHostContext::container_rect) else {
            return;
        };
        let changed = self
            .container
            .try_with_untracked(|current| *current != rect)
            .unwrap_or(false);
        if changed {
            self.container.set(rect);
        }
    }

    pub fn set_overview(&self, enabled: bool) {
        if enabled {
            self.resize_slot().end();
        }
        if self.overview.get_untracked() != enabled {
            self.overview.set(enabled);
        }
    }

    pub fn toggle_overview(&self) {
        self.set_overview(!self.overview.get_untracked());
    }

    /// Signals content that layout may have changed.
    pub fn broadcast_layout_change(&self) {
        if self.layout_epoch.try_update(|epoch| *epoch += 1).is_none() {
            return;
        }
        let _ = self.host.try_with_value(ActivityHostContext::broadcast_layout_change);
    }

    pub(crate) fn abandon_sessions_for(&self, removed: &[ActivityId]) {
        let _ = self
            .resize
            .try_with_value(|slot| slot.end_if_targets(removed));
    }

    fn dispatch(&self, action: ActivityAction) {
        let Some(viewport) = self.host.try_with_value(ActivityHostContext::viewport) else {
            return;
        };
        let ctx = ReduceContext {
            viewport_width: viewport.width,
            narrow_breakpoint: self.config.with_value(|c| c.narrow_viewport_breakpoint),
        };
        let mut state = self.state.get_untracked();
        let previous = state.clone();

        match reduce_activities(&mut state, ctx, action) {
            Ok(new_effects) => {
                if state != previous {
                    self.state.set(state);
                }
                if !new_effects.is_empty() {
                    self.effects.update(|queue| queue.extend(new_effects));
                }
            }
            Err(err) => {
                logging::debug_warn!("activity command ignored: {err}");
            }
        }
    }

    /// Starts one broadcast timer per command; pending timers are only cleared on unmount.
    fn schedule_layout_broadcast(&self) {
        let runtime = *self;
        let Some(delay) = self
            .config
            .try_with_value(ActivityManagerConfig::layout_broadcast_delay)
        else {
            return;
        };
        let _ = self.layout_broadcasts.try_with_value(|timers| {
            timers.schedule(delay, move || runtime.broadcast_layout_change());
        });
    }
}

struct MountedActivityStore {
    runtime: ActivityRuntimeContext,
}

impl ActivityStore for MountedActivityStore {
    fn dispatch(&self, action: ActivityAction) {
        self.runtime.dispatch(action);
    }

    fn schedule_layout_broadcast(&self) {
        self.runtime.schedule_layout_broadcast();
    }
}

#[component]
/// Mounts the activity store, attaches it to the command façade, and provides
/// [`ActivityRuntimeContext`] to descendants.
pub fn ActivityProvider(
    /// Façade to attach to; defaults to the one in context, or a fresh handle.
    #[prop(optional)]
    commands: Option<ActivityCommands>,
    #[prop(optional)] config: Option<ActivityManagerConfig>,
    children: Children,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let commands = commands
        .or_else(use_context::<ActivityCommands>)
        .unwrap_or_default();

    let runtime = ActivityRuntimeContext::new(config, commands.clone());
    provide_context(runtime);
    provide_context(commands.clone());

    let attachment = commands.attach(Rc::new(MountedActivityStore { runtime }));
    let observer = observe_container(runtime);
    effect_executor::install(runtime);

    let resize = runtime.resize_slot();
    let layout_broadcasts = runtime.layout_broadcasts.get_value();
    on_cleanup(move || {
        drop(attachment);
        drop(observer);
        layout_broadcasts.cancel_all();
        resize.end();
    });

    children().into_view()
}

/// Returns the current [`ActivityRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`ActivityProvider`].
pub fn use_activity_runtime() -> ActivityRuntimeContext {
    use_context::<ActivityRuntimeContext>().expect("ActivityRuntimeContext not provided")
}
