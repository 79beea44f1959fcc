//! Container clamping, per-placement rectangles, and the overview grid.

use crate::{
    config::OverviewGrid,
    model::{ContainerRect, ElementBounds, FrameSize, Placement, Viewport},
};

/// Share of the container width a floating window starts with.
pub const WINDOW_WIDTH_RATIO: f64 = 0.5;
/// Share of the container height a floating window starts with.
pub const WINDOW_HEIGHT_RATIO: f64 = 0.7;
pub const WINDOW_BORDER_RADIUS: f64 = 10.0;
pub const OVERVIEW_BORDER_RADIUS: f64 = 20.0;

/// Clamps the mount element's bounding box to the visible viewport.
///
/// Non-finite edges collapse to zero so the result is always a finite, non-negative rectangle.
pub fn visible_container_rect(bounds: ElementBounds, viewport: Viewport) -> ContainerRect {
    let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
    let top = finite(bounds.top).max(0.0);
    let left = finite(bounds.left).max(0.0);
    let right = finite(bounds.right).min(finite(viewport.width));
    let bottom = finite(bounds.bottom).min(finite(viewport.height));

    ContainerRect {
        top,
        left,
        width: (right - left).max(0.0),
        height: (bottom - top).max(0.0),
    }
}

/// Absolute rectangle of an activity relative to its container.
///
/// `translate_x`/`translate_y` are applied as a CSS transform on top of `left`/`top`, which is how
/// split-right and overview cells move without repositioning so transitions can animate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlacementFrame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub border_radius: f64,
    /// Draws the full border and drop shadow instead of side borders only.
    pub floating: bool,
}

impl PlacementFrame {
    pub fn size(&self) -> FrameSize {
        FrameSize {
            width: self.width,
            height: self.height,
        }
    }

    pub fn to_style(&self) -> String {
        format!(
            "left:{}px;top:{}px;width:{}px;height:{}px;transform:translate({}px, {}px);border-radius:{}px;",
            self.left,
            self.top,
            self.width,
            self.height,
            self.translate_x,
            self.translate_y,
            self.border_radius
        )
    }
}

pub fn placement_frame(placement: Placement, container: ContainerRect) -> PlacementFrame {
    let w = container.width;
    let h = container.height;
    let half_w = w / 2.0;
    let half_h = h / 2.0;
    match placement {
        Placement::Full => PlacementFrame {
            width: w,
            height: h,
            ..PlacementFrame::default()
        },
        Placement::SplitLeft => PlacementFrame {
            width: half_w,
            height: h,
            ..PlacementFrame::default()
        },
        Placement::SplitRight => PlacementFrame {
            width: half_w,
            height: h,
            translate_x: half_w,
            ..PlacementFrame::default()
        },
        Placement::SplitTop => PlacementFrame {
            width: w,
            height: half_h,
            ..PlacementFrame::default()
        },
        Placement::SplitBottom => PlacementFrame {
            top: h - half_h,
            width: w,
            height: half_h,
            ..PlacementFrame::default()
        },
        Placement::Window => PlacementFrame {
            width: w * WINDOW_WIDTH_RATIO,
            height: h * WINDOW_HEIGHT_RATIO,
            border_radius: WINDOW_BORDER_RADIUS,
            floating: true,
            ..PlacementFrame::default()
        },
    }
}

/// Grid cell for the activity at `index` (launch order) while overview mode is active.
///
/// The width and height subtract `gap * (columns - 2)` and `gap * (rows - 2)` rather than a
/// per-side gap; with the default 3x5 grid that is one gap horizontally and three vertically.
pub fn overview_cell(index: usize, container: ContainerRect, grid: OverviewGrid) -> PlacementFrame {
    let columns = grid.columns.max(1) as usize;
    let rows = grid.rows.max(1) as usize;
    let column_width = container.width / columns as f64;
    let row_height = container.height / rows as f64;

    let x = column_width * (index % columns) as f64 + grid.gap;
    let y = row_height * (index / columns) as f64 + grid.gap;
    let width = column_width - grid.gap * (columns as f64 - 2.0);
    let height = row_height - grid.gap * (rows as f64 - 2.0);

    PlacementFrame {
        left: 0.0,
        top: 0.0,
        width: width.max(0.0),
        height: height.max(0.0),
        translate_x: x,
        translate_y: y,
        border_radius: OVERVIEW_BORDER_RADIUS,
        floating: true,
    }
}
