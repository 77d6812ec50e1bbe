// Core infrastructure module
// Provides foundational systems that the widgets depend on

pub mod animation;
pub mod geometry;
pub mod scroll_surface;

pub use animation::{ease_in_out, Tween, DEFAULT_ANIMATION_DURATION};
pub use geometry::{to_cell, Bounds, CellRect, EdgeInsets, Lerp, Size, GEOMETRY_EPSILON};
pub use scroll_surface::{
    ScrollEvent, ScrollPhase, ScrollSnapshot, ScrollSurface, SharedScrollSurface,
    SubscriptionId, DEFAULT_DECELERATION_DURATION,
};
