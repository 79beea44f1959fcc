//! In-page activity window manager for Leptos dashboards.
//!
//! Activities are embedded views (logs, shells, editors) drawn on top of a designated container
//! element. Callers drive them through [`ActivityCommands`]; [`ActivityProvider`] mounts the store
//! and [`ActivitiesRenderer`] draws the frames and taskbar.

pub mod commands;
pub mod components;
pub mod config;
mod effect_executor;
pub mod frame;
pub mod geometry;
pub mod host;
pub mod model;
pub mod reducer;
pub mod resize;
mod runtime_context;
pub mod throttle;

pub use commands::{use_activity_commands, ActivityCommands, ActivityStore, StoreAttachment};
pub use components::{
    use_activity, use_activity_runtime, ActivitiesRenderer, ActivityHandle, ActivityProvider,
    ActivityRuntimeContext,
};
pub use config::{ActivityManagerConfig, ConfigError, OverviewGrid};
pub use model::*;
pub use reducer::{reduce_activities, ActivityAction, ReduceContext, ReducerError, RuntimeEffect};
