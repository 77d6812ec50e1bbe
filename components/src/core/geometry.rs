// Geometry Primitives
// Floating-point points, sizes, bounds and insets shared by every widget
//
// Widgets keep geometry in f64 "points" so interpolation stays smooth; one point
// renders as one terminal cell and rounding only happens at draw time.

use ratatui::layout::Rect;
use serde::Deserialize;

/// Tolerance used when comparing scroll positions against whole pages
pub const GEOMETRY_EPSILON: f64 = 1e-6;

/// A width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (or negative)
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl From<Rect> for Size {
    fn from(rect: Rect) -> Self {
        Self {
            width: rect.width as f64,
            height: rect.height as f64,
        }
    }
}

/// Edge insets (padding) in points
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct EdgeInsets {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub right: f64,
}

impl EdgeInsets {
    pub const ZERO: EdgeInsets = EdgeInsets { top: 0.0, left: 0.0, bottom: 0.0, right: 0.0 };

    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self { top, left, bottom, right }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    pub(crate) fn is_valid(&self) -> bool {
        [self.top, self.left, self.bottom, self.right]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Axis-aligned rectangle in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const ZERO: Bounds = Bounds { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Check if a point is within these bounds (right/bottom edges exclusive)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.max_x() && y >= self.y && y < self.max_y()
    }

    /// Approximate equality, used where values come out of interpolation
    pub fn approx_eq(&self, other: &Bounds) -> bool {
        (self.x - other.x).abs() < GEOMETRY_EPSILON
            && (self.y - other.y).abs() < GEOMETRY_EPSILON
            && (self.width - other.width).abs() < GEOMETRY_EPSILON
            && (self.height - other.height).abs() < GEOMETRY_EPSILON
    }
}

/// Linear interpolation between two values
pub trait Lerp: Copy {
    /// `t == 0.0` yields `self`, `t == 1.0` yields `to`
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Bounds {
    fn lerp(self, to: Self, t: f64) -> Self {
        Bounds {
            x: self.x.lerp(to.x, t),
            y: self.y.lerp(to.y, t),
            width: self.width.lerp(to.width, t),
            height: self.height.lerp(to.height, t),
        }
    }
}

/// Round a point coordinate to the nearest terminal cell
pub fn to_cell(value: f64) -> i32 {
    value.round() as i32
}

/// Cell-space rectangle that may extend past the visible area (negative origins allowed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CellRect {
    /// Snap `bounds` to cells, shifted left by `scroll_x` and placed relative to `origin`
    pub fn from_bounds(bounds: Bounds, scroll_x: f64, origin: Rect) -> Self {
        let left = to_cell(bounds.x - scroll_x);
        let right = to_cell(bounds.max_x() - scroll_x);
        let top = to_cell(bounds.y);
        let bottom = to_cell(bounds.max_y());
        Self {
            x: origin.x as i32 + left,
            y: origin.y as i32 + top,
            width: right - left,
            height: bottom - top,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Visible part of this rectangle inside `clip`
    pub fn clip_to(&self, clip: Rect) -> Option<Rect> {
        let left = self.x.max(clip.x as i32);
        let top = self.y.max(clip.y as i32);
        let right = self.right().min(clip.right() as i32);
        let bottom = self.bottom().min(clip.bottom() as i32);
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(left as u16, top as u16, (right - left) as u16, (bottom - top) as u16))
    }
}
