use activity_runtime::{
    use_activity, use_activity_runtime, ActivitiesRenderer, ActivityCommands, ActivityContent,
    ActivityDescriptor, ActivityManagerConfig, ActivityPatch, ActivityProvider, Placement,
};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

const EMBEDDED_CONFIG: &str = include_str!("../activity_manager.toml");

fn load_config() -> ActivityManagerConfig {
    match ActivityManagerConfig::from_toml_str(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(err) => {
            logging::warn!("activity manager config rejected, using defaults: {err}");
            ActivityManagerConfig::default()
        }
    }
}

/// Sample activities the demo page can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoActivity {
    /// Transient log preview that becomes permanent once clicked.
    LogPreview,
    /// Floating, resizable shell.
    Shell,
    /// Notes pinned to the right half.
    Notes,
}

impl DemoActivity {
    pub const ALL: [DemoActivity; 3] = [Self::LogPreview, Self::Shell, Self::Notes];

    pub fn slug(self) -> &'static str {
        match self {
            Self::LogPreview => "logs",
            Self::Shell => "shell",
            Self::Notes => "notes",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|demo| demo.slug() == slug)
    }

    pub fn launcher_label(self) -> &'static str {
        match self {
            Self::LogPreview => "Preview logs",
            Self::Shell => "Open shell",
            Self::Notes => "Open notes",
        }
    }

    pub fn descriptor(self) -> ActivityDescriptor {
        match self {
            Self::LogPreview => ActivityDescriptor::new(
                "demo-logs",
                ActivityContent::new(|| view! { <DemoLogView /> }),
            )
            .with_title("api-gateway logs")
            .with_icon("\u{1f4dc}")
            .with_origin("prod-eu-1")
            .temporary(),
            Self::Shell => ActivityDescriptor::new(
                "demo-shell",
                ActivityContent::new(|| view! { <DemoShell /> }),
            )
            .with_title("Shell")
            .with_icon(">_")
            .with_placement(Placement::Window),
            Self::Notes => ActivityDescriptor::new(
                "demo-notes",
                ActivityContent::new(|| view! { <DemoNotes /> }),
            )
            .with_title("Notes")
            .with_placement(Placement::SplitRight),
        }
    }
}

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Activity Manager" />
        <Meta name="description" content="In-page windowing for dashboard activities." />

        <Router>
            <Routes>
                <Route path="" view=|| view! { <ActivityDashboard /> } />
                <Route path="/open/:slug" view=DeepLinkedDashboard />
            </Routes>
        </Router>
    }
}

#[component]
fn DeepLinkedDashboard() -> impl IntoView {
    let params = use_params_map();
    let launch = params
        .with_untracked(|map| map.get("slug").cloned())
        .and_then(|slug| DemoActivity::from_slug(&slug));

    view! { <ActivityDashboard launch=launch /> }
}

#[component]
/// Dashboard page: launcher buttons, the designated container, and the activity renderer.
pub fn ActivityDashboard(
    /// Sample to open once the manager has mounted.
    #[prop(default = None)]
    launch: Option<DemoActivity>,
) -> impl IntoView {
    let config = load_config();
    let container_id = config.container_element_id.clone();
    let commands = ActivityCommands::detached();
    provide_context(commands.clone());

    view! {
        <ActivityProvider commands=commands.clone() config=config>
            <header class="dashboard-launcher">
                {DemoActivity::ALL
                    .into_iter()
                    .map(|demo| {
                        let commands = commands.clone();
                        view! {
                            <button on:click=move |_: web_sys::MouseEvent| {
                                commands.launch(demo.descriptor())
                            }>{demo.launcher_label()}</button>
                        }
                    })
                    .collect_view()}
            </header>
            <main id=container_id.clone() class="dashboard-main">
                <p>"Open an activity from the launcher above."</p>
            </main>
            <ActivitiesRenderer />
            <LaunchOnMount demo=launch />
        </ActivityProvider>
    }
}

#[component]
fn LaunchOnMount(demo: Option<DemoActivity>) -> impl IntoView {
    if let Some(demo) = demo {
        use_activity_runtime().commands().launch(demo.descriptor());
    }
}

#[component]
fn DemoLogView() -> impl IntoView {
    let runtime = use_activity_runtime();
    let activity = use_activity();
    let measured = move || runtime.layout_epoch.get();
    let temporary = move || {
        activity
            .as_ref()
            .and_then(|handle| handle.descriptor())
            .is_some_and(|descriptor| descriptor.temporary)
    };

    view! {
        <div class="demo-log-view">
            <p>{move || if temporary() { "Preview: click to keep" } else { "Pinned" }}</p>
            <p>{move || format!("Layout changes seen: {}", measured())}</p>
            <pre>
                "GET /healthz 200 1ms\nGET /api/v1/orders 200 38ms\nPOST /api/v1/orders 201 112ms"
            </pre>
        </div>
    }
}

#[component]
fn DemoShell() -> impl IntoView {
    let activity = use_activity();
    let input = create_rw_signal(String::new());
    let rename = move |_: web_sys::MouseEvent| {
        let title = input.get_untracked();
        if let Some(handle) = activity.as_ref() {
            if !title.trim().is_empty() {
                handle.update(ActivityPatch::default().with_title(title));
            }
        }
    };

    view! {
        <div class="demo-shell">
            <input
                placeholder="rename this activity"
                prop:value=move || input.get()
                on:input=move |ev| input.set(event_target_value(&ev))
            />
            <button on:click=rename>"Rename"</button>
        </div>
    }
}

#[component]
fn DemoNotes() -> impl IntoView {
    let notes = create_rw_signal(String::new());

    view! {
        <textarea
            class="demo-notes"
            prop:value=move || notes.get()
            on:input=move |ev| notes.set(event_target_value(&ev))
        />
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn embedded_config_is_valid() {
        let config = ActivityManagerConfig::from_toml_str(EMBEDDED_CONFIG).expect("embedded config");

        assert_eq!(config.container_element_id, "activity-main");
        assert_eq!(config, ActivityManagerConfig::default());
    }

    #[test]
    fn demo_slugs_resolve() {
        for demo in DemoActivity::ALL {
            assert_eq!(DemoActivity::from_slug(demo.slug()), Some(demo));
        }
        assert_eq!(DemoActivity::from_slug("unknown"), None);
    }
}
