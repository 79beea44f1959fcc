use std::{fmt, rc::Rc};

use leptos::{IntoView, View};
use serde::{Deserialize, Serialize};

/// Caller-supplied unique key of an activity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActivityId(String);

impl ActivityId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActivityId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ActivityId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&ActivityId> for ActivityId {
    fn from(id: &ActivityId) -> Self {
        id.clone()
    }
}

/// Layout mode governing where an activity is drawn inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    #[default]
    Full,
    SplitLeft,
    SplitRight,
    SplitTop,
    SplitBottom,
    Window,
}

impl Placement {
    pub const ALL: [Placement; 6] = [
        Self::SplitLeft,
        Self::SplitRight,
        Self::SplitTop,
        Self::SplitBottom,
        Self::Full,
        Self::Window,
    ];

    /// Label used by the placement menu in the activity header.
    pub fn menu_label(self) -> &'static str {
        match self {
            Self::Full => "Fullscreen",
            Self::SplitLeft => "Snap Left",
            Self::SplitRight => "Snap Right",
            Self::SplitTop => "Snap Top",
            Self::SplitBottom => "Snap Bottom",
            Self::Window => "Float",
        }
    }

    pub fn css_id(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::SplitLeft => "split-left",
            Self::SplitRight => "split-right",
            Self::SplitTop => "split-top",
            Self::SplitBottom => "split-bottom",
            Self::Window => "window",
        }
    }
}

/// Opaque renderable content owned by the caller.
///
/// The manager never inspects it; it only mounts it once inside the activity body. Two handles
/// compare equal only when they point at the same render function.
#[derive(Clone)]
pub struct ActivityContent(Rc<dyn Fn() -> View>);

impl ActivityContent {
    pub fn new<F, V>(render: F) -> Self
    where
        F: Fn() -> V + 'static,
        V: IntoView,
    {
        Self(Rc::new(move || render().into_view()))
    }

    pub fn render(&self) -> View {
        (self.0)()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ActivityContent {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ActivityContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActivityContent(..)")
    }
}

/// One open or minimized activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityDescriptor {
    pub id: ActivityId,
    pub content: ActivityContent,
    pub placement: Placement,
    pub title: Option<String>,
    pub icon: Option<String>,
    pub hide_title_in_header: bool,
    pub minimized: bool,
    /// Discarded when another activity launches, until the user interacts with it.
    pub temporary: bool,
    /// Originating context (e.g. cluster name) shown in the chrome.
    pub origin: Option<String>,
}

impl ActivityDescriptor {
    pub fn new(id: impl Into<ActivityId>, content: ActivityContent) -> Self {
        Self {
            id: id.into(),
            content,
            placement: Placement::default(),
            title: None,
            icon: None,
            hide_title_in_header: false,
            minimized: false,
            temporary: false,
            origin: None,
        }
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn title_hidden_in_header(mut self) -> Self {
        self.hide_title_in_header = true;
        self
    }

    pub fn minimized(mut self) -> Self {
        self.minimized = true;
        self
    }

    pub fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    pub fn is_visible(&self) -> bool {
        !self.minimized
    }
}

/// Partial update merged field-by-field into a stored [`ActivityDescriptor`].
///
/// `None` leaves the stored field untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivityPatch {
    pub content: Option<ActivityContent>,
    pub placement: Option<Placement>,
    pub title: Option<String>,
    pub icon: Option<String>,
    pub hide_title_in_header: Option<bool>,
    pub minimized: Option<bool>,
    pub temporary: Option<bool>,
    pub origin: Option<String>,
}

impl ActivityPatch {
    pub fn minimize() -> Self {
        Self {
            minimized: Some(true),
            ..Self::default()
        }
    }

    pub fn restore() -> Self {
        Self {
            minimized: Some(false),
            ..Self::default()
        }
    }

    pub fn place(placement: Placement) -> Self {
        Self {
            placement: Some(placement),
            ..Self::default()
        }
    }

    pub fn make_permanent() -> Self {
        Self {
            temporary: Some(false),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn apply_to(self, activity: &mut ActivityDescriptor) {
        if let Some(content) = self.content {
            activity.content = content;
        }
        if let Some(placement) = self.placement {
            activity.placement = placement;
        }
        if let Some(title) = self.title {
            activity.title = Some(title);
        }
        if let Some(icon) = self.icon {
            activity.icon = Some(icon);
        }
        if let Some(hide) = self.hide_title_in_header {
            activity.hide_title_in_header = hide;
        }
        if let Some(minimized) = self.minimized {
            activity.minimized = minimized;
        }
        if let Some(temporary) = self.temporary {
            activity.temporary = temporary;
        }
        if let Some(origin) = self.origin {
            activity.origin = Some(origin);
        }
    }
}

/// Canonical set of activities plus their focus history.
///
/// `activities` keeps launch order; `history` runs oldest to most recent, so its last element
/// is the focused, topmost activity. Minimized activities never appear in `history`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivityState {
    pub history: Vec<ActivityId>,
    pub activities: Vec<ActivityDescriptor>,
}

impl ActivityState {
    pub fn get(&self, id: &ActivityId) -> Option<&ActivityDescriptor> {
        self.activities.iter().find(|a| &a.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &ActivityId) -> Option<&mut ActivityDescriptor> {
        self.activities.iter_mut().find(|a| &a.id == id)
    }

    pub fn contains(&self, id: &ActivityId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn focused_activity_id(&self) -> Option<&ActivityId> {
        self.history.last()
    }

    pub fn history_position(&self, id: &ActivityId) -> Option<usize> {
        self.history.iter().position(|h| h == id)
    }

    /// Position of the activity in launch order; drives the overview grid cell.
    pub fn launch_index(&self, id: &ActivityId) -> Option<usize> {
        self.activities.iter().position(|a| &a.id == id)
    }

    /// Stacking order: `base + position in history`, one below `base` when not in history.
    pub fn z_index(&self, id: &ActivityId, base: i32) -> i32 {
        match self.history_position(id) {
            Some(position) => base + position as i32,
            None => base - 1,
        }
    }

    /// Taskbar order: every known activity, most recently launched first.
    pub fn taskbar_entries(&self) -> impl Iterator<Item = &ActivityDescriptor> {
        self.activities.iter().rev()
    }

    /// Checks the history invariants: no duplicates, every entry known, no minimized entry.
    pub fn history_is_consistent(&self) -> bool {
        self.history.iter().enumerate().all(|(idx, id)| {
            !self.history[..idx].contains(id) && self.get(id).is_some_and(|a| !a.minimized)
        })
    }

    pub(crate) fn remove_from_history(&mut self, id: &ActivityId) {
        self.history.retain(|h| h != id);
    }

    pub(crate) fn bring_to_front(&mut self, id: &ActivityId) {
        self.remove_from_history(id);
        self.history.push(id.clone());
    }
}

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Raw bounding box edges of the mount element, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementBounds {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ElementBounds {
    pub fn from_rect(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            right: left + width,
            bottom: top + height,
        }
    }
}

/// Visible portion of the mount element, clamped to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn descriptor(id: &str) -> ActivityDescriptor {
        ActivityDescriptor::new(id, ActivityContent::new(|| "body"))
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut activity = descriptor("logs")
            .with_title("Logs")
            .with_origin("prod")
            .temporary();
        let patch = ActivityPatch {
            placement: Some(Placement::Window),
            temporary: Some(false),
            ..ActivityPatch::default()
        };

        patch.apply_to(&mut activity);

        assert_eq!(activity.placement, Placement::Window);
        assert!(!activity.temporary);
        assert_eq!(activity.title.as_deref(), Some("Logs"));
        assert_eq!(activity.origin.as_deref(), Some("prod"));
    }

    #[test]
    fn content_equality_is_by_identity() {
        let shared = ActivityContent::new(|| "same");
        let twin = ActivityContent::new(|| "same");

        assert_eq!(shared.clone(), shared);
        assert_ne!(shared, twin);
    }

    #[test]
    fn z_index_follows_history_position() {
        let state = ActivityState {
            history: vec!["a".into(), "b".into()],
            activities: vec![descriptor("a"), descriptor("b"), descriptor("c").minimized()],
        };

        assert_eq!(state.z_index(&"a".into(), 4), 4);
        assert_eq!(state.z_index(&"b".into(), 4), 5);
        assert_eq!(state.z_index(&"c".into(), 4), 3);
        assert_eq!(state.focused_activity_id(), Some(&ActivityId::from("b")));
    }

    #[test]
    fn taskbar_lists_newest_launch_first() {
        let state = ActivityState {
            history: vec!["b".into()],
            activities: vec![descriptor("a").minimized(), descriptor("b"), descriptor("c").minimized()],
        };

        let ids: Vec<&str> = state.taskbar_entries().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn history_consistency_rejects_minimized_and_duplicate_entries() {
        let mut state = ActivityState {
            history: vec!["a".into()],
            activities: vec![descriptor("a")],
        };
        assert!(state.history_is_consistent());

        state.history.push("a".into());
        assert!(!state.history_is_consistent());

        state.history = vec!["a".into()];
        state.activities[0].minimized = true;
        assert!(!state.history_is_consistent());
    }

    #[test]
    fn placement_serializes_kebab_case() {
        let encoded = serde_json::to_string(&Placement::SplitBottom).expect("serialize placement");
        assert_eq!(encoded, "\"split-bottom\"");
    }
}
