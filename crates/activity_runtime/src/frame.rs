//! Per-activity visual frame state that lives outside the canonical reducer state.
//!
//! Holds the resize-controller size override, the transition toggle used while dragging, and
//! the pre-overview snapshot restored when overview mode ends.

use crate::{
    config::OverviewGrid,
    geometry::{overview_cell, placement_frame, PlacementFrame},
    model::{ContainerRect, FrameSize, Placement},
};

/// Transition applied to geometry changes outside of a drag.
pub const FRAME_TRANSITION: &str = "transition-duration:0.25s;transition-property:width,height,left,top,transform;";
const FRAME_TRANSITION_DISABLED: &str = "transition-duration:0s;";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityFrame {
    size_override: Option<FrameSize>,
    transitions_enabled: bool,
    /// Size override captured on entering overview; `Some` exactly while overview is applied.
    pre_overview: Option<Option<FrameSize>>,
}

impl Default for ActivityFrame {
    fn default() -> Self {
        Self {
            size_override: None,
            transitions_enabled: true,
            pre_overview: None,
        }
    }
}

impl ActivityFrame {
    pub fn size_override(&self) -> Option<FrameSize> {
        self.size_override
    }

    pub fn transitions_enabled(&self) -> bool {
        self.transitions_enabled
    }

    pub fn in_overview(&self) -> bool {
        self.pre_overview.is_some()
    }

    /// Caches the current geometry; repeated calls keep the first snapshot.
    pub fn enter_overview(&mut self) {
        if self.pre_overview.is_none() {
            self.pre_overview = Some(self.size_override);
        }
    }

    pub fn exit_overview(&mut self) {
        if let Some(saved) = self.pre_overview.take() {
            self.size_override = saved;
        }
    }

    pub fn set_transitions_enabled(&mut self, enabled: bool) {
        self.transitions_enabled = enabled;
    }

    pub fn resize_to(&mut self, size: FrameSize) {
        self.size_override = Some(size);
    }

    /// Leaving floating placement discards any dragged size so the new rule applies as-is.
    pub fn placement_changed(&mut self, placement: Placement) {
        if placement != Placement::Window {
            self.size_override = None;
            if let Some(saved) = self.pre_overview.as_mut() {
                *saved = None;
            }
        }
    }

    /// Geometry to draw right now.
    pub fn resolve(
        &self,
        placement: Placement,
        container: ContainerRect,
        launch_index: usize,
        grid: OverviewGrid,
    ) -> PlacementFrame {
        if self.in_overview() {
            return overview_cell(launch_index, container, grid);
        }
        let mut frame = placement_frame(placement, container);
        if placement == Placement::Window {
            if let Some(size) = self.size_override {
                frame.width = size.width;
                frame.height = size.height;
            }
        }
        frame
    }

    pub fn transition_style(&self) -> &'static str {
        if self.transitions_enabled {
            FRAME_TRANSITION
        } else {
            FRAME_TRANSITION_DISABLED
        }
    }
}
