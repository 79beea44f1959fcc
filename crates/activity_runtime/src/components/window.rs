use wasm_bindgen::JsCast;

use super::*;
use crate::{
    frame::ActivityFrame,
    geometry::PlacementFrame,
    host::{activity_content_dom_id, CaptureListener},
    model::{Placement, PointerPosition},
    resize::begin_resize,
};

/// Side of the square grab area in the bottom-right corner of floating activities.
const RESIZE_HANDLE_PX: u32 = 44;

fn placement_menu_dom_id(content_dom_id: &str) -> String {
    format!("{content_dom_id}-placement-menu")
}

fn placement_toggle_dom_id(content_dom_id: &str) -> String {
    format!("{content_dom_id}-placement-toggle")
}

/// Patch for a pointer-down anywhere inside an activity; in overview it also brings the
/// activity back from the taskbar.
fn pointer_down_patch(in_overview: bool) -> ActivityPatch {
    let patch = ActivityPatch::make_permanent();
    if in_overview {
        ActivityPatch {
            minimized: Some(false),
            ..patch
        }
    } else {
        patch
    }
}

fn pointer_from_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: f64::from(ev.client_x()),
        y: f64::from(ev.client_y()),
    }
}

#[component]
pub(super) fn ActivityWindow(activity_id: ActivityId) -> impl IntoView {
    let runtime = use_activity_runtime();
    let commands = runtime.commands();
    let state = runtime.state();
    let overview = runtime.overview;
    let config = runtime.config();
    let base_z = config.base_z_index;
    let grid = config.overview;
    let frame = create_rw_signal(ActivityFrame::default());
    let content_dom_id = activity_content_dom_id(&activity_id);

    let activity = create_memo({
        let id = activity_id.clone();
        move |_| state.with(|state| state.get(&id).cloned())
    });
    let placement = create_memo(move |_| {
        activity.with(|activity| activity.as_ref().map(|a| a.placement).unwrap_or_default())
    });
    let minimized = create_memo(move |_| {
        activity.with(|activity| activity.as_ref().is_some_and(|a| a.minimized))
    });
    let launch_index = create_memo({
        let id = activity_id.clone();
        move |_| state.with(|state| state.launch_index(&id).unwrap_or(0))
    });
    let z_index = create_memo({
        let id = activity_id.clone();
        move |_| state.with(|state| state.z_index(&id, base_z))
    });
    let geometry = create_memo(move |_| {
        let placement = placement.get();
        let container = runtime.container.get();
        let index = launch_index.get();
        frame.with(|frame| frame.resolve(placement, container, index, grid))
    });

    create_effect(move |previous: Option<Placement>| {
        let current = placement.get();
        if previous.is_some_and(|previous| previous != current) {
            frame.update(|frame| frame.placement_changed(current));
        }
        current
    });

    create_effect(move |_| {
        let tiled = overview.get();
        if frame.with_untracked(ActivityFrame::in_overview) != tiled {
            frame.update(|frame| {
                if tiled {
                    frame.enter_overview();
                } else {
                    frame.exit_overview();
                }
            });
        }
    });

    let on_pointerdown = {
        let id = activity_id.clone();
        let commands = commands.clone();
        move |ev: web_sys::Event| {
            let in_overview = overview.get_untracked();
            if in_overview {
                ev.prevent_default();
                ev.stop_propagation();
                runtime.set_overview(false);
            }
            commands.update(&id, pointer_down_patch(in_overview));
        }
    };

    // Capture phase, so content that stops propagation still makes the activity permanent.
    let frame_ref = create_node_ref::<html::Section>();
    let pointer_capture = store_value(None::<CaptureListener>);
    create_effect(move |_| {
        let Some(section) = frame_ref.get() else {
            return;
        };
        let target: &web_sys::EventTarget = section.unchecked_ref();
        let listener = CaptureListener::install(target, "pointerdown", on_pointerdown.clone());
        pointer_capture.set_value(listener);
    });
    on_cleanup(move || {
        let _ = pointer_capture.try_update_value(Option::take);
    });

    let outer_style = move || {
        let container = runtime.container.get();
        let hidden = minimized.get() && !overview.get();
        format!(
            "position:fixed;left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};pointer-events:none;{}",
            container.left,
            container.top,
            container.width,
            container.height,
            z_index.get(),
            if hidden { "display:none;" } else { "" }
        )
    };
    let frame_style = move || {
        format!(
            "position:absolute;pointer-events:auto;{}{}",
            geometry.get().to_style(),
            frame.with(ActivityFrame::transition_style)
        )
    };
    let frame_class = {
        let id = activity_id.clone();
        move || {
            let floating = geometry.with(|g| g.floating);
            let focused = state.with(|s| s.focused_activity_id() == Some(&id));
            format!(
                "activity-frame activity-placement-{}{}{}",
                placement.get().css_id(),
                if floating { " floating" } else { "" },
                if focused { " focused" } else { "" }
            )
        }
    };

    let handle = ActivityHandle {
        id: activity_id.clone(),
        runtime,
        commands: commands.clone(),
    };

    let header_id = activity_id.clone();
    let header_dom_id = content_dom_id.clone();
    let resize_id = activity_id;

    view! {
        <div class="activity-slot" style=outer_style>
            <section
                class=frame_class
                style=frame_style
                role="dialog"
                aria-label=move || activity.with(|a| a.as_ref().and_then(|a| a.title.clone()))
                node_ref=frame_ref
            >
                <Show when=move || !overview.get() fallback=|| ()>
                    <ActivityHeader
                        activity_id=header_id.clone()
                        activity=activity
                        placement=placement
                        content_dom_id=header_dom_id.clone()
                    />
                </Show>
                <div class="activity-body" id=content_dom_id>
                    <ActivityBody handle=handle.clone() />
                </div>
                <Show
                    when=move || placement.get() == Placement::Window && !overview.get()
                    fallback=|| ()
                >
                    <ActivityResizeHandle
                        activity_id=resize_id.clone()
                        frame=frame
                        geometry=geometry
                    />
                </Show>
            </section>
        </div>
    }
}

#[component]
fn ActivityHeader(
    activity_id: ActivityId,
    activity: Memo<Option<ActivityDescriptor>>,
    placement: Memo<Placement>,
    content_dom_id: String,
) -> impl IntoView {
    let runtime = use_activity_runtime();
    let commands = runtime.commands();
    let menu_open = create_rw_signal(false);
    let menu_was_open = create_rw_signal(false);
    let menu_id = placement_menu_dom_id(&content_dom_id);
    let toggle_id = placement_toggle_dom_id(&content_dom_id);

    create_effect({
        let menu_id = menu_id.clone();
        move |_| {
            let is_open = menu_open.get();
            let was_open = menu_was_open.get_untracked();
            if is_open && !was_open {
                menu_was_open.set(true);
                let _ = focus_first_menu_item(&menu_id);
            } else if !is_open && was_open {
                menu_was_open.set(false);
            }
        }
    });

    let minimize = {
        let id = activity_id.clone();
        let commands = commands.clone();
        move |ev: web_sys::MouseEvent| {
            stop_mouse_event(&ev);
            commands.update(&id, ActivityPatch::minimize());
        }
    };
    let close = {
        let id = activity_id.clone();
        let commands = commands.clone();
        move |ev: web_sys::MouseEvent| {
            stop_mouse_event(&ev);
            commands.close(&id);
        }
    };

    let title = move || {
        activity.with(|a| {
            a.as_ref()
                .filter(|a| !a.hide_title_in_header)
                .and_then(|a| a.title.clone())
        })
    };
    let icon = move || activity.with(|a| a.as_ref().and_then(|a| a.icon.clone()));
    let origin = move || activity.with(|a| a.as_ref().and_then(|a| a.origin.clone()));

    let menu_activity_id = activity_id;
    let menu_toggle_id = toggle_id.clone();

    view! {
        <header class="activity-header">
            <div class="activity-header-title">
                {move || {
                    icon()
                        .map(|icon| {
                            view! {
                                <span class="activity-header-icon" aria-hidden="true">
                                    {icon}
                                </span>
                            }
                        })
                }}
                {move || title().map(|title| view! { <span>{title}</span> })}
                {move || {
                    origin()
                        .map(|origin| view! { <span class="activity-origin">{origin}</span> })
                }}
            </div>
            <div class="activity-header-controls">
                <button
                    id=toggle_id
                    aria-label="Change placement"
                    aria-haspopup="menu"
                    aria-expanded=move || menu_open.get().to_string()
                    on:mousedown=move |ev| stop_mouse_event(&ev)
                    on:click=move |ev| {
                        stop_mouse_event(&ev);
                        menu_open.update(|open| *open = !*open);
                    }
                >
                    "\u{22ef}"
                </button>
                <Show when=move || menu_open.get() fallback=|| ()>
                    <PlacementMenu
                        activity_id=menu_activity_id.clone()
                        placement=placement
                        menu_open=menu_open
                        menu_id=menu_id.clone()
                        toggle_id=menu_toggle_id.clone()
                    />
                </Show>
                <button
                    aria-label="Minimize activity"
                    on:mousedown=move |ev| stop_mouse_event(&ev)
                    on:click=minimize
                >
                    "\u{2013}"
                </button>
                <button
                    aria-label="Close activity"
                    on:mousedown=move |ev| stop_mouse_event(&ev)
                    on:click=close
                >
                    "\u{00d7}"
                </button>
            </div>
        </header>
    }
}

#[component]
fn PlacementMenu(
    activity_id: ActivityId,
    placement: Memo<Placement>,
    menu_open: RwSignal<bool>,
    menu_id: String,
    toggle_id: String,
) -> impl IntoView {
    let commands = use_activity_runtime().commands();
    let keydown_menu_id = menu_id.clone();

    let items = Placement::ALL
        .into_iter()
        .map(|option| {
            let id = activity_id.clone();
            let commands = commands.clone();
            view! {
                <button
                    role="menuitem"
                    class="activity-placement-item"
                    disabled=move || placement.get() == option
                    on:click=move |ev| {
                        stop_mouse_event(&ev);
                        menu_open.set(false);
                        commands.update(&id, ActivityPatch::place(option));
                    }
                >
                    {option.menu_label()}
                </button>
            }
        })
        .collect_view();

    view! {
        <div
            id=menu_id
            class="activity-placement-menu"
            role="menu"
            aria-label="Placement"
            on:keydown=move |ev: web_sys::KeyboardEvent| {
                if handle_menu_roving_keydown(&ev, &keydown_menu_id) {
                    return;
                }
                if ev.key() == "Escape" {
                    ev.prevent_default();
                    ev.stop_propagation();
                    menu_open.set(false);
                    let _ = focus_element_by_id(&toggle_id);
                }
            }
            on:mousedown=move |ev| ev.stop_propagation()
        >
            {items}
        </div>
    }
}

#[component]
fn ActivityResizeHandle(
    activity_id: ActivityId,
    frame: RwSignal<ActivityFrame>,
    geometry: Memo<PlacementFrame>,
) -> impl IntoView {
    let runtime = use_activity_runtime();

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        ev.prevent_default();
        begin_resize(
            runtime,
            activity_id.clone(),
            frame,
            pointer_from_event(&ev),
            geometry.get_untracked().size(),
        );
    };

    view! {
        <div
            class="activity-resize-handle"
            aria-hidden="true"
            style=format!(
                "position:absolute;right:0;bottom:0;width:{RESIZE_HANDLE_PX}px;height:{RESIZE_HANDLE_PX}px;cursor:nwse-resize;"
            )
            on:pointerdown=on_pointerdown
        />
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        model::ActivityContent,
        reducer::{reduce_activities, ActivityAction, ReduceContext},
    };

    const WIDE: ReduceContext = ReduceContext {
        viewport_width: 1920.0,
        narrow_breakpoint: 1280.0,
    };

    fn launch(state: &mut ActivityState, descriptor: ActivityDescriptor) {
        reduce_activities(state, WIDE, ActivityAction::Launch(descriptor)).expect("launch");
    }

    #[test]
    fn pointer_down_in_overview_keeps_preview_alive() {
        let mut state = ActivityState::default();
        launch(
            &mut state,
            ActivityDescriptor::new("logs", ActivityContent::new(|| ()))
                .temporary()
                .minimized(),
        );

        reduce_activities(
            &mut state,
            WIDE,
            ActivityAction::Update {
                id: "logs".into(),
                patch: pointer_down_patch(true),
            },
        )
        .expect("update");
        launch(
            &mut state,
            ActivityDescriptor::new("shell", ActivityContent::new(|| ())),
        );

        let logs = state.get(&ActivityId::new("logs")).expect("logs survives");
        assert!(!logs.temporary);
        assert!(!logs.minimized);
        assert_eq!(
            state.history,
            vec![ActivityId::new("logs"), ActivityId::new("shell")]
        );
    }

    #[test]
    fn pointer_down_outside_overview_only_makes_permanent() {
        assert_eq!(pointer_down_patch(false), ActivityPatch::make_permanent());
        assert_eq!(pointer_down_patch(true).minimized, Some(false));
        assert_eq!(pointer_down_patch(true).temporary, Some(false));
    }

    #[test]
    fn menu_ids_derive_from_content_id() {
        let content = activity_content_dom_id(&ActivityId::new("pod/logs"));

        assert_eq!(
            placement_menu_dom_id(&content),
            "activity-content-pod_2Flogs-placement-menu"
        );
        assert_eq!(
            placement_toggle_dom_id(&content),
            "activity-content-pod_2Flogs-placement-toggle"
        );
    }
}
