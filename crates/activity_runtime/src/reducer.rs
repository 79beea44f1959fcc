//! Reducer actions, side-effect intents, and transition logic for the activity store.

use thiserror::Error;

use crate::model::{ActivityDescriptor, ActivityId, ActivityPatch, ActivityState, Placement};

#[derive(Debug, Clone, PartialEq)]
/// Commands accepted by [`reduce_activities`] to mutate [`ActivityState`].
pub enum ActivityAction {
    /// Open (or re-open) an activity and bring it to front unless it launches minimized.
    Launch(ActivityDescriptor),
    /// Remove an activity entirely.
    Close {
        /// Activity to close.
        id: ActivityId,
    },
    /// Shallow-merge a partial diff into an existing activity.
    Update {
        /// Activity to update.
        id: ActivityId,
        /// Fields to overwrite.
        patch: ActivityPatch,
    },
    /// Drop every activity.
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_activities`] for the host runtime to execute.
pub enum RuntimeEffect {
    /// The activity went from minimized (or absent) to visible; move input focus into its content.
    FocusActivityContent(ActivityId),
    /// Activities that no longer exist; sessions keyed to them must be abandoned.
    ActivitiesRemoved(Vec<ActivityId>),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that reference unknown activities.
///
/// State is left untouched whenever one of these is returned.
pub enum ReducerError {
    /// The target activity id was not found in the current state.
    #[error("activity `{0}` not found")]
    ActivityNotFound(ActivityId),
}

/// Host inputs the reducer depends on, passed explicitly so transitions stay deterministic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReduceContext {
    /// Current viewport width in CSS pixels.
    pub viewport_width: f64,
    /// Below this width every launched activity is forced to [`Placement::Full`].
    pub narrow_breakpoint: f64,
}

impl ReduceContext {
    fn is_narrow(&self) -> bool {
        self.viewport_width < self.narrow_breakpoint
    }
}

/// Applies an [`ActivityAction`] to the activity state and collects resulting side effects.
///
/// # Errors
///
/// Returns [`ReducerError::ActivityNotFound`] when `Close` or `Update` names an unknown activity.
pub fn reduce_activities(
    state: &mut ActivityState,
    ctx: ReduceContext,
    action: ActivityAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        ActivityAction::Launch(activity) => {
            let id = activity.id.clone();
            let was_visible = is_visible(state, &id);

            if !activity.minimized {
                state.bring_to_front(&id);
            }

            let evicted: Vec<ActivityId> = state
                .activities
                .iter()
                .filter(|existing| existing.temporary && existing.id != id)
                .map(|existing| existing.id.clone())
                .collect();
            if !evicted.is_empty() {
                state.activities.retain(|existing| !evicted.contains(&existing.id));
                state.history.retain(|h| !evicted.contains(h));
                effects.push(RuntimeEffect::ActivitiesRemoved(evicted));
            }

            match state.get_mut(&id) {
                Some(existing) => existing.minimized = false,
                None => state.activities.push(activity),
            }

            if ctx.is_narrow() {
                if let Some(launched) = state.get_mut(&id) {
                    launched.placement = Placement::Full;
                }
            }

            if !was_visible && is_visible(state, &id) {
                effects.push(RuntimeEffect::FocusActivityContent(id));
            }
        }
        ActivityAction::Close { id } => {
            if !state.contains(&id) {
                return Err(ReducerError::ActivityNotFound(id));
            }
            state.remove_from_history(&id);
            state.activities.retain(|a| a.id != id);
            effects.push(RuntimeEffect::ActivitiesRemoved(vec![id]));
        }
        ActivityAction::Update { id, patch } => {
            let was_visible = is_visible(state, &id);
            let activity = state
                .get_mut(&id)
                .ok_or_else(|| ReducerError::ActivityNotFound(id.clone()))?;
            patch.apply_to(activity);
            let stays_minimized = activity.minimized;

            // An untouched `minimized` flag on a minimized activity must not re-enter history.
            if stays_minimized {
                state.remove_from_history(&id);
            } else {
                state.bring_to_front(&id);
            }

            if !was_visible && is_visible(state, &id) {
                effects.push(RuntimeEffect::FocusActivityContent(id));
            }
        }
        ActivityAction::Reset => {
            let removed: Vec<ActivityId> = state.activities.iter().map(|a| a.id.clone()).collect();
            *state = ActivityState::default();
            if !removed.is_empty() {
                effects.push(RuntimeEffect::ActivitiesRemoved(removed));
            }
        }
    }

    Ok(effects)
}

/// Patch a taskbar entry click applies.
///
/// Clicking the focused activity toggles minimization; any other entry is restored and raised.
pub fn taskbar_activation_patch(state: &ActivityState, id: &ActivityId) -> ActivityPatch {
    let focused = state.focused_activity_id() == Some(id);
    let minimized = state.get(id).map(|a| a.minimized).unwrap_or(false);
    ActivityPatch {
        minimized: Some(focused && !minimized),
        ..ActivityPatch::default()
    }
}

fn is_visible(state: &ActivityState, id: &ActivityId) -> bool {
    state.get(id).is_some_and(ActivityDescriptor::is_visible)
}
