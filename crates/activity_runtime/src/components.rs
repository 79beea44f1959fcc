//! Activity manager UI composition: the renderer, activity frames, and the taskbar.

mod a11y;
mod taskbar;
mod window;

use leptos::*;

use self::{
    a11y::{focus_element_by_id, focus_first_menu_item, handle_menu_roving_keydown},
    taskbar::ActivityTaskbar,
    window::ActivityWindow,
};

use crate::{
    commands::ActivityCommands,
    model::{ActivityDescriptor, ActivityId, ActivityPatch, ActivityState},
};

pub use self::taskbar::{taskbar_entries, TaskbarEntry, UNTITLED_ACTIVITY};
pub use crate::runtime_context::{use_activity_runtime, ActivityProvider, ActivityRuntimeContext};

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

/// Handle to the activity whose content is currently rendering.
#[derive(Clone)]
pub struct ActivityHandle {
    id: ActivityId,
    runtime: ActivityRuntimeContext,
    commands: ActivityCommands,
}

impl ActivityHandle {
    pub fn id(&self) -> &ActivityId {
        &self.id
    }

    /// Current descriptor, tracked; `None` once the activity has closed.
    pub fn descriptor(&self) -> Option<ActivityDescriptor> {
        self.runtime
            .state()
            .try_with(|state| state.get(&self.id).cloned())
            .flatten()
    }

    pub fn update(&self, patch: ActivityPatch) {
        self.commands.update(&self.id, patch);
    }

    pub fn close(&self) {
        self.commands.close(&self.id);
    }
}

/// Returns the enclosing activity's handle, or `None` outside activity content.
pub fn use_activity() -> Option<ActivityHandle> {
    use_context::<ActivityHandle>()
}

#[component]
/// Draws every activity, the overview backdrop, and the taskbar.
pub fn ActivitiesRenderer() -> impl IntoView {
    let runtime = use_activity_runtime();
    let state = runtime.state();
    let overview = runtime.overview;
    let base_z = runtime.config().base_z_index;

    create_effect(move |_| {
        if overview.get() && state.with(ActivityState::is_empty) {
            runtime.set_overview(false);
        }
    });

    let activity_ids = move || {
        state.with(|state| {
            state
                .activities
                .iter()
                .map(|activity| activity.id.clone())
                .collect::<Vec<_>>()
        })
    };

    let close_all = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        runtime.commands().reset();
        runtime.set_overview(false);
    };

    view! {
        <div class="activity-layer" data-overview=move || overview.get().to_string()>
            <Show when=move || overview.get() fallback=|| ()>
                <div
                    class="activity-overview-backdrop"
                    aria-hidden="true"
                    style=format!("position:fixed;inset:0;z-index:{};", base_z - 2)
                />
                <button
                    class="activity-overview-close-all"
                    style=move || {
                        let top = base_z + state.with(|s| s.activities.len()) as i32;
                        format!("position:fixed;right:16px;bottom:16px;z-index:{top};")
                    }
                    on:click=close_all
                >
                    "Close All"
                </button>
            </Show>
            <For each=activity_ids key=|id| id.clone() let:activity_id>
                <ActivityWindow activity_id=activity_id />
            </For>
            <ActivityTaskbar />
        </div>
    }
}

#[component]
fn ActivityBody(handle: ActivityHandle) -> impl IntoView {
    let runtime = handle.runtime;
    let id = handle.id.clone();
    provide_context(handle);

    let content = create_memo(move |_| {
        runtime
            .state()
            .with(|state| state.get(&id).map(|activity| activity.content.clone()))
    });

    move || content.get().map(|content| content.render())
}
