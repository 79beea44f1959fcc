use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use activity_runtime::{
    reduce_activities, ActivityAction, ActivityCommands, ActivityContent, ActivityDescriptor,
    ActivityId, ActivityPatch, ActivityState, ActivityStore, Placement, ReduceContext,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const WIDE: ReduceContext = ReduceContext {
    viewport_width: 1920.0,
    narrow_breakpoint: 1280.0,
};

/// Reducer-backed store without any rendering surface.
struct HeadlessStore {
    state: RefCell<ActivityState>,
    ctx: ReduceContext,
    broadcasts: Cell<usize>,
}

impl HeadlessStore {
    fn new(ctx: ReduceContext) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(ActivityState::default()),
            ctx,
            broadcasts: Cell::new(0),
        })
    }

    fn snapshot(&self) -> ActivityState {
        self.state.borrow().clone()
    }
}

impl ActivityStore for HeadlessStore {
    fn dispatch(&self, action: ActivityAction) {
        let mut next = self.snapshot();
        if reduce_activities(&mut next, self.ctx, action).is_ok() {
            *self.state.borrow_mut() = next;
        }
    }

    fn schedule_layout_broadcast(&self) {
        self.broadcasts.set(self.broadcasts.get() + 1);
    }
}

fn activity(id: &str) -> ActivityDescriptor {
    ActivityDescriptor::new(id, ActivityContent::new(|| ()))
}

fn ids(values: &[&str]) -> Vec<ActivityId> {
    values.iter().map(|v| ActivityId::new(*v)).collect()
}

#[test]
fn temporary_preview_is_replaced_by_next_launch() {
    let commands = ActivityCommands::detached();
    let store = HeadlessStore::new(WIDE);
    let _attachment = commands.attach(store.clone());

    commands.launch(activity("preview").temporary());
    commands.launch(activity("b"));

    let state = store.snapshot();
    assert_eq!(state.history, ids(&["b"]));
    assert_eq!(state.activities.len(), 1);
    assert_eq!(store.broadcasts.get(), 2);
}

#[test]
fn minimize_and_restore_cycle_through_history() {
    let commands = ActivityCommands::detached();
    let store = HeadlessStore::new(WIDE);
    let _attachment = commands.attach(store.clone());

    commands.launch(activity("a"));
    commands.launch(activity("b"));
    commands.update("a", ActivityPatch::minimize());
    assert_eq!(store.snapshot().history, ids(&["b"]));
    assert!(store.snapshot().contains(&ActivityId::new("a")));

    commands.update("a", ActivityPatch::restore());
    assert_eq!(store.snapshot().history, ids(&["b", "a"]));
}

#[test]
fn unknown_ids_and_detached_calls_are_silent() {
    let commands = ActivityCommands::detached();
    commands.close("ghost");
    commands.reset();

    let store = HeadlessStore::new(WIDE);
    let attachment = commands.attach(store.clone());
    commands.launch(activity("a"));
    commands.close("ghost");
    commands.update("ghost", ActivityPatch::minimize());
    assert_eq!(store.snapshot().history, ids(&["a"]));

    drop(attachment);
    commands.reset();
    assert_eq!(store.snapshot().activities.len(), 1);
}

#[test]
fn narrow_viewport_forces_full_placement() {
    let commands = ActivityCommands::detached();
    let store = HeadlessStore::new(ReduceContext {
        viewport_width: 800.0,
        narrow_breakpoint: 1280.0,
    });
    let _attachment = commands.attach(store.clone());

    commands.launch(activity("a").with_placement(Placement::Window));

    let state = store.snapshot();
    assert_eq!(
        state.get(&ActivityId::new("a")).map(|a| a.placement),
        Some(Placement::Full)
    );
}

#[test]
fn reset_clears_everything() {
    let commands = ActivityCommands::detached();
    let store = HeadlessStore::new(WIDE);
    let _attachment = commands.attach(store.clone());

    commands.launch(activity("a"));
    commands.launch(activity("b").minimized());
    commands.reset();

    assert_eq!(store.snapshot(), ActivityState::default());
}

#[derive(Debug, Clone)]
enum Op {
    Launch {
        id: u8,
        minimized: bool,
        temporary: bool,
    },
    Close(u8),
    Minimize(u8, bool),
    Place(u8),
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..6, any::<bool>(), any::<bool>()).prop_map(|(id, minimized, temporary)| Op::Launch {
            id,
            minimized,
            temporary,
        }),
        2 => (0u8..6).prop_map(Op::Close),
        3 => (0u8..6, any::<bool>()).prop_map(|(id, m)| Op::Minimize(id, m)),
        1 => (0u8..6).prop_map(Op::Place),
        1 => Just(Op::Reset),
    ]
}

proptest! {
    #[test]
    fn history_stays_consistent_for_any_command_sequence(ops in proptest::collection::vec(op(), 0..40)) {
        let commands = ActivityCommands::detached();
        let store = HeadlessStore::new(WIDE);
        let _attachment = commands.attach(store.clone());

        for op in ops {
            match op {
                Op::Launch { id, minimized, temporary } => {
                    let mut descriptor = activity(&format!("a{id}"));
                    descriptor.minimized = minimized;
                    descriptor.temporary = temporary;
                    commands.launch(descriptor);
                }
                Op::Close(id) => commands.close(format!("a{id}")),
                Op::Minimize(id, minimized) => commands.update(
                    format!("a{id}"),
                    ActivityPatch { minimized: Some(minimized), ..ActivityPatch::default() },
                ),
                Op::Place(id) => commands.update(format!("a{id}"), ActivityPatch::place(Placement::SplitTop)),
                Op::Reset => commands.reset(),
            }

            let state = store.snapshot();
            prop_assert!(state.history_is_consistent(), "inconsistent: {:?}", state.history);
            let mut seen = state.activities.iter().map(|a| a.id.clone()).collect::<Vec<_>>();
            seen.sort();
            seen.dedup();
            prop_assert_eq!(seen.len(), state.activities.len());
        }
    }
}
