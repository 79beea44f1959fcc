use super::*;
use crate::reducer::taskbar_activation_patch;

/// Label for activities launched without a title.
pub const UNTITLED_ACTIVITY: &str = "Untitled";

/// One taskbar button, derived from an [`ActivityDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskbarEntry {
    pub id: ActivityId,
    pub title: String,
    pub icon: Option<String>,
    pub origin: Option<String>,
    pub focused: bool,
    pub minimized: bool,
    pub temporary: bool,
}

/// Taskbar contents, most recently launched first.
pub fn taskbar_entries(state: &ActivityState) -> Vec<TaskbarEntry> {
    let focused = state.focused_activity_id();
    state
        .taskbar_entries()
        .map(|activity| TaskbarEntry {
            id: activity.id.clone(),
            title: activity
                .title
                .clone()
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| UNTITLED_ACTIVITY.to_string()),
            icon: activity.icon.clone(),
            origin: activity.origin.clone(),
            focused: focused == Some(&activity.id),
            minimized: activity.minimized,
            temporary: activity.temporary,
        })
        .collect()
}

#[component]
pub(super) fn ActivityTaskbar() -> impl IntoView {
    let runtime = use_activity_runtime();
    let state = runtime.state();
    let overview = runtime.overview;
    let top_z = runtime.config().base_z_index + 1_000;

    let entries = create_memo(move |_| state.with(taskbar_entries));

    view! {
        <Show when=move || entries.with(|entries| !entries.is_empty()) fallback=|| ()>
            <nav
                class="activity-taskbar"
                aria-label="Activities"
                style=format!("z-index:{top_z};")
            >
                <For each=move || entries.get() key=|entry| entry.clone() let:entry>
                    <TaskbarButton entry=entry />
                </For>
                <button
                    class="activity-taskbar-overview"
                    style="margin-left:auto;position:sticky;right:0;"
                    aria-pressed=move || overview.get().to_string()
                    on:click=move |ev| {
                        stop_mouse_event(&ev);
                        runtime.toggle_overview();
                    }
                >
                    "Overview"
                </button>
            </nav>
        </Show>
    }
}

#[component]
fn TaskbarButton(entry: TaskbarEntry) -> impl IntoView {
    let runtime = use_activity_runtime();
    let commands = runtime.commands();

    let activate = {
        let id = entry.id.clone();
        let commands = commands.clone();
        move |ev: web_sys::MouseEvent| {
            stop_mouse_event(&ev);
            let patch = runtime
                .state()
                .with_untracked(|state| taskbar_activation_patch(state, &id));
            commands.update(&id, patch);
        }
    };
    let close_on_middle_click = {
        let id = entry.id.clone();
        let commands = commands.clone();
        move |ev: web_sys::MouseEvent| {
            if ev.button() == 1 {
                stop_mouse_event(&ev);
                commands.close(&id);
            }
        }
    };
    let close = {
        let id = entry.id.clone();
        move |ev: web_sys::MouseEvent| {
            stop_mouse_event(&ev);
            commands.close(&id);
        }
    };

    let class_name = format!(
        "activity-taskbar-entry{}{}",
        if entry.focused { " focused" } else { "" },
        if entry.minimized { " minimized" } else { "" }
    );
    let title_style = if entry.temporary {
        "font-style:italic;"
    } else {
        ""
    };

    view! {
        <div class=class_name role="group">
            <button
                class="activity-taskbar-button"
                aria-pressed=entry.focused.to_string()
                on:click=activate
                on:mousedown=close_on_middle_click
            >
                {entry
                    .icon
                    .clone()
                    .map(|icon| {
                        view! {
                            <span class="activity-taskbar-icon" aria-hidden="true">
                                {icon}
                            </span>
                        }
                    })}
                <span class="activity-taskbar-text">
                    {entry
                        .origin
                        .clone()
                        .map(|origin| view! { <span class="activity-taskbar-origin">{origin}</span> })}
                    <span class="activity-taskbar-title" style=title_style>
                        {entry.title.clone()}
                    </span>
                </span>
            </button>
            <button
                class="activity-taskbar-close"
                aria-label=format!("Close {}", entry.title)
                on:click=close
            >
                "\u{00d7}"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::ActivityContent;

    fn activity(id: &str) -> ActivityDescriptor {
        ActivityDescriptor::new(id, ActivityContent::new(|| ()))
    }

    #[test]
    fn entries_run_newest_first_and_flag_focus() {
        let state = ActivityState {
            history: vec![ActivityId::new("a")],
            activities: vec![
                activity("a").with_title("Logs").with_origin("prod-eu"),
                activity("b").minimized().temporary(),
            ],
        };

        let entries = taskbar_entries(&state);

        assert_eq!(
            entries,
            vec![
                TaskbarEntry {
                    id: ActivityId::new("b"),
                    title: UNTITLED_ACTIVITY.to_string(),
                    icon: None,
                    origin: None,
                    focused: false,
                    minimized: true,
                    temporary: true,
                },
                TaskbarEntry {
                    id: ActivityId::new("a"),
                    title: "Logs".to_string(),
                    icon: None,
                    origin: Some("prod-eu".to_string()),
                    focused: true,
                    minimized: false,
                    temporary: false,
                },
            ]
        );
    }

    #[test]
    fn blank_title_falls_back() {
        let state = ActivityState {
            history: Vec::new(),
            activities: vec![activity("a").with_title("   ")],
        };

        assert_eq!(taskbar_entries(&state)[0].title, UNTITLED_ACTIVITY);
    }

    #[test]
    fn empty_state_has_no_entries() {
        assert!(taskbar_entries(&ActivityState::default()).is_empty());
    }
}
