//! Process-wide command façade for launching, closing, and updating activities.
//!
//! [`ActivityCommands`] is a cheap cloneable handle that can be created before any renderer
//! exists. Commands issued while no store is attached are dropped. Once a mounted store attaches,
//! every command dispatches one reducer action and then (re)starts the delayed layout broadcast.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use leptos::{logging, use_context};

use crate::{
    model::{ActivityDescriptor, ActivityId, ActivityPatch},
    reducer::ActivityAction,
};

/// Receiver of façade commands, normally the mounted activity renderer.
pub trait ActivityStore {
    /// Applies one reducer action.
    fn dispatch(&self, action: ActivityAction);

    /// Cancels any pending layout broadcast and schedules a new one.
    fn schedule_layout_broadcast(&self);
}

#[derive(Default)]
enum CommandTarget {
    #[default]
    Detached,
    Attached {
        token: u64,
        store: Rc<dyn ActivityStore>,
    },
}

#[derive(Default)]
struct CommandBus {
    target: RefCell<CommandTarget>,
    next_token: Cell<u64>,
}

/// Handle for issuing activity commands from anywhere in the page.
#[derive(Clone, Default)]
pub struct ActivityCommands {
    bus: Rc<CommandBus>,
}

impl fmt::Debug for ActivityCommands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityCommands")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Keeps a store attached to an [`ActivityCommands`] handle until dropped.
///
/// Dropping a stale attachment (one already replaced by a newer store) leaves the newer store in
/// place.
#[must_use = "dropping the attachment detaches the store immediately"]
pub struct StoreAttachment {
    bus: Rc<CommandBus>,
    token: u64,
}

impl Drop for StoreAttachment {
    fn drop(&mut self) {
        let mut target = self.bus.target.borrow_mut();
        if matches!(*target, CommandTarget::Attached { token, .. } if token == self.token) {
            *target = CommandTarget::Detached;
        }
    }
}

impl ActivityCommands {
    /// Creates a handle with no store attached.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        matches!(*self.bus.target.borrow(), CommandTarget::Attached { .. })
    }

    /// Routes subsequent commands to `store`, replacing any previous store.
    pub fn attach(&self, store: Rc<dyn ActivityStore>) -> StoreAttachment {
        let token = self.bus.next_token.get().wrapping_add(1);
        self.bus.next_token.set(token);
        *self.bus.target.borrow_mut() = CommandTarget::Attached { token, store };
        StoreAttachment {
            bus: Rc::clone(&self.bus),
            token,
        }
    }

    /// Opens `activity`, or re-opens the existing activity with the same id.
    pub fn launch(&self, activity: ActivityDescriptor) {
        self.send(ActivityAction::Launch(activity));
    }

    pub fn close(&self, id: impl Into<ActivityId>) {
        self.send(ActivityAction::Close { id: id.into() });
    }

    /// Shallow-merges `patch` into the activity named `id`.
    pub fn update(&self, id: impl Into<ActivityId>, patch: ActivityPatch) {
        self.send(ActivityAction::Update {
            id: id.into(),
            patch,
        });
    }

    /// Closes every activity.
    pub fn reset(&self) {
        self.send(ActivityAction::Reset);
    }

    fn send(&self, action: ActivityAction) {
        let store = match &*self.bus.target.borrow() {
            CommandTarget::Attached { store, .. } => Some(Rc::clone(store)),
            CommandTarget::Detached => None,
        };
        let Some(store) = store else {
            logging::debug_warn!("activity command dropped, no renderer mounted: {action:?}");
            return;
        };
        store.dispatch(action);
        store.schedule_layout_broadcast();
    }
}

/// Returns the [`ActivityCommands`] handle from context, or a detached one when none is provided.
pub fn use_activity_commands() -> ActivityCommands {
    use_context::<ActivityCommands>().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{ActivityContent, Placement};

    #[derive(Default)]
    struct RecordingStore {
        actions: RefCell<Vec<ActivityAction>>,
        broadcasts: Cell<usize>,
    }

    impl ActivityStore for RecordingStore {
        fn dispatch(&self, action: ActivityAction) {
            self.actions.borrow_mut().push(action);
        }

        fn schedule_layout_broadcast(&self) {
            self.broadcasts.set(self.broadcasts.get() + 1);
        }
    }

    fn activity(id: &str) -> ActivityDescriptor {
        ActivityDescriptor::new(id, ActivityContent::new(|| ()))
    }

    #[test]
    fn commands_before_attach_are_dropped() {
        let commands = ActivityCommands::detached();
        commands.launch(activity("early"));

        let store = Rc::new(RecordingStore::default());
        let _attachment = commands.attach(store.clone());

        assert!(store.actions.borrow().is_empty());
        assert_eq!(store.broadcasts.get(), 0);
    }

    #[test]
    fn every_command_dispatches_then_schedules_broadcast() {
        let commands = ActivityCommands::detached();
        let store = Rc::new(RecordingStore::default());
        let _attachment = commands.attach(store.clone());

        commands.launch(activity("logs"));
        commands.update("logs", ActivityPatch::place(Placement::SplitLeft));
        commands.close("logs");
        commands.reset();

        let actions = store.actions.borrow();
        assert_eq!(actions.len(), 4);
        assert!(matches!(actions[0], ActivityAction::Launch(_)));
        assert_eq!(
            actions[2],
            ActivityAction::Close {
                id: ActivityId::new("logs")
            }
        );
        assert_eq!(actions[3], ActivityAction::Reset);
        assert_eq!(store.broadcasts.get(), 4);
    }

    #[test]
    fn clones_share_the_attached_store() {
        let commands = ActivityCommands::detached();
        let elsewhere = commands.clone();
        let store = Rc::new(RecordingStore::default());
        let _attachment = commands.attach(store.clone());

        elsewhere.close("a");

        assert!(elsewhere.is_attached());
        assert_eq!(store.actions.borrow().len(), 1);
    }

    #[test]
    fn dropping_attachment_detaches() {
        let commands = ActivityCommands::detached();
        let store = Rc::new(RecordingStore::default());
        let attachment = commands.attach(store.clone());

        drop(attachment);
        commands.close("a");

        assert!(!commands.is_attached());
        assert!(store.actions.borrow().is_empty());
    }

    #[test]
    fn stale_attachment_does_not_detach_newer_store() {
        let commands = ActivityCommands::detached();
        let first = Rc::new(RecordingStore::default());
        let second = Rc::new(RecordingStore::default());

        let stale = commands.attach(first.clone());
        let _current = commands.attach(second.clone());
        drop(stale);
        commands.reset();

        assert!(first.actions.borrow().is_empty());
        assert_eq!(second.actions.borrow().len(), 1);
    }

    #[test]
    fn store_may_reenter_commands_during_dispatch() {
        struct Reentrant {
            commands: ActivityCommands,
            seen: Cell<usize>,
        }
        impl ActivityStore for Reentrant {
            fn dispatch(&self, action: ActivityAction) {
                self.seen.set(self.seen.get() + 1);
                if matches!(action, ActivityAction::Reset) {
                    self.commands.close("nested");
                }
            }
            fn schedule_layout_broadcast(&self) {}
        }

        let commands = ActivityCommands::detached();
        let store = Rc::new(Reentrant {
            commands: commands.clone(),
            seen: Cell::new(0),
        });
        let _attachment = commands.attach(store.clone());

        commands.reset();

        assert_eq!(store.seen.get(), 2);
    }
}
