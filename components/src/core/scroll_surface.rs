// Scroll Surface
// Horizontal scroll state with drag, paging, animation and push-based offset observers
//
// Usage:
//   let surface = ScrollSurface::new().with_paging(true).into_shared();
//   let id = surface.borrow_mut().subscribe(|snapshot| println!("{}", snapshot.offset_x));
//   surface.borrow_mut().begin_drag();
//   surface.borrow_mut().drag_by(12.0);
//   surface.borrow_mut().unsubscribe(id);

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use super::animation::{Tween, DEFAULT_ANIMATION_DURATION};
use super::geometry::{Size, GEOMETRY_EPSILON};

/// Default time a paging surface takes to settle after the finger lifts
pub const DEFAULT_DECELERATION_DURATION: Duration = Duration::from_millis(250);

/// Surfaces are shared between the widget that owns them and any observer
pub type SharedScrollSurface = Rc<RefCell<ScrollSurface>>;

/// What is currently moving the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    /// At rest
    Idle,
    /// The user is actively dragging
    Dragging,
    /// Settling onto a page after a drag
    Decelerating,
    /// Running a programmatic offset animation
    Animating,
}

/// Offset notification pushed to observers on every offset change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSnapshot {
    pub offset_x: f64,
    pub viewport_width: f64,
    pub content_width: f64,
    pub phase: ScrollPhase,
}

impl ScrollSnapshot {
    pub fn max_offset_x(&self) -> f64 {
        (self.content_width - self.viewport_width).max(0.0)
    }

    pub fn is_at_start(&self) -> bool {
        self.offset_x <= GEOMETRY_EPSILON
    }

    pub fn is_at_end(&self) -> bool {
        self.offset_x >= self.max_offset_x() - GEOMETRY_EPSILON
    }

    /// Number of whole pages in the content
    pub fn page_count(&self) -> usize {
        if self.viewport_width <= 0.0 {
            return 0;
        }
        (self.content_width / self.viewport_width + GEOMETRY_EPSILON).floor() as usize
    }
}

/// Identifies one observer registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Lifecycle notifications returned to the surface's owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEvent {
    DidEndDragging { will_decelerate: bool },
    DidEndDecelerating,
    DidEndScrollingAnimation,
}

type ScrollObserver = Box<dyn FnMut(&ScrollSnapshot)>;

pub struct ScrollSurface {
    viewport: Size,
    content_size: Size,
    offset_x: f64,
    paging_enabled: bool,
    phase: ScrollPhase,
    animation: Option<Tween<f64>>,
    animation_duration: Duration,
    deceleration_duration: Duration,
    observers: Vec<(SubscriptionId, ScrollObserver)>,
    next_subscription: u64,
}

impl fmt::Debug for ScrollSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollSurface")
            .field("viewport", &self.viewport)
            .field("content_size", &self.content_size)
            .field("offset_x", &self.offset_x)
            .field("paging_enabled", &self.paging_enabled)
            .field("phase", &self.phase)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for ScrollSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSurface {
    pub fn new() -> Self {
        Self {
            viewport: Size::ZERO,
            content_size: Size::ZERO,
            offset_x: 0.0,
            paging_enabled: false,
            phase: ScrollPhase::Idle,
            animation: None,
            animation_duration: DEFAULT_ANIMATION_DURATION,
            deceleration_duration: DEFAULT_DECELERATION_DURATION,
            observers: Vec::new(),
            next_subscription: 1,
        }
    }

    pub fn with_paging(mut self, enabled: bool) -> Self {
        self.paging_enabled = enabled;
        self
    }

    pub fn with_durations(mut self, animation: Duration, deceleration: Duration) -> Self {
        self.animation_duration = animation;
        self.deceleration_duration = deceleration;
        self
    }

    pub fn into_shared(self) -> SharedScrollSurface {
        Rc::new(RefCell::new(self))
    }

    // ┌────────────────────────────────────────────────────────────────────────────────────────────┐
    // │                                        Geometry                                            │
    // └────────────────────────────────────────────────────────────────────────────────────────────┘

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.reclamp();
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn set_content_size(&mut self, size: Size) {
        self.content_size = size;
        self.reclamp();
    }

    pub fn content_offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn max_offset_x(&self) -> f64 {
        (self.content_size.width - self.viewport.width).max(0.0)
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == ScrollPhase::Dragging
    }

    pub fn snapshot(&self) -> ScrollSnapshot {
        ScrollSnapshot {
            offset_x: self.offset_x,
            viewport_width: self.viewport.width,
            content_width: self.content_size.width,
            phase: self.phase,
        }
    }

    fn clamp_offset(&self, x: f64) -> f64 {
        x.clamp(0.0, self.max_offset_x())
    }

    fn reclamp(&mut self) {
        let clamped = self.clamp_offset(self.offset_x);
        self.apply_offset(clamped);
    }

    // ┌────────────────────────────────────────────────────────────────────────────────────────────┐
    // │                                        Observers                                           │
    // └────────────────────────────────────────────────────────────────────────────────────────────┘

    /// Register a callback invoked on every offset change
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&ScrollSnapshot) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a registration; returns false if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn apply_offset(&mut self, x: f64) -> bool {
        if (x - self.offset_x).abs() < f64::EPSILON {
            return false;
        }
        self.offset_x = x;
        let snapshot = self.snapshot();
        for (_, observer) in self.observers.iter_mut() {
            observer(&snapshot);
        }
        true
    }

    // ┌────────────────────────────────────────────────────────────────────────────────────────────┐
    // │                                        Movement                                            │
    // └────────────────────────────────────────────────────────────────────────────────────────────┘

    /// Move to `x` (clamped). Returns true if the offset changed or an animation started.
    pub fn set_content_offset(&mut self, x: f64, animated: bool) -> bool {
        let target = self.clamp_offset(x);
        self.animation = None;
        if (target - self.offset_x).abs() < f64::EPSILON {
            self.phase = ScrollPhase::Idle;
            return false;
        }
        if animated && !self.animation_duration.is_zero() {
            self.phase = ScrollPhase::Animating;
            self.animation = Some(Tween::new(self.offset_x, target, self.animation_duration));
            true
        } else {
            self.phase = ScrollPhase::Idle;
            self.apply_offset(target)
        }
    }

    /// Immediate relative scroll outside of a drag (mouse wheel)
    pub fn scroll_by(&mut self, dx: f64) -> bool {
        if self.phase == ScrollPhase::Dragging {
            return false;
        }
        self.animation = None;
        self.phase = ScrollPhase::Idle;
        let target = self.clamp_offset(self.offset_x + dx);
        self.apply_offset(target)
    }

    pub fn begin_drag(&mut self) {
        self.animation = None;
        self.phase = ScrollPhase::Dragging;
    }

    /// Drag the content by `dx` points; positive values reveal content to the right
    pub fn drag_by(&mut self, dx: f64) -> bool {
        if self.phase != ScrollPhase::Dragging {
            return false;
        }
        let target = self.clamp_offset(self.offset_x + dx);
        self.apply_offset(target)
    }

    /// Finish a drag; paging surfaces start settling on the nearest page
    pub fn end_drag(&mut self) -> ScrollEvent {
        if self.phase != ScrollPhase::Dragging {
            return ScrollEvent::DidEndDragging { will_decelerate: false };
        }

        let page_width = self.viewport.width;
        if self.paging_enabled && page_width > 0.0 {
            let page = (self.offset_x / page_width).round();
            let target = self.clamp_offset(page * page_width);
            if (target - self.offset_x).abs() > GEOMETRY_EPSILON {
                self.phase = ScrollPhase::Decelerating;
                self.animation = Some(Tween::new(self.offset_x, target, self.deceleration_duration));
                return ScrollEvent::DidEndDragging { will_decelerate: true };
            }
            self.phase = ScrollPhase::Idle;
            self.apply_offset(target);
        } else {
            self.phase = ScrollPhase::Idle;
        }
        ScrollEvent::DidEndDragging { will_decelerate: false }
    }

    /// Advance a running animation; reports when deceleration or an animation completes
    pub fn tick(&mut self, dt: Duration) -> Option<ScrollEvent> {
        let tween = self.animation.as_mut()?;
        let value = tween.advance(dt);
        if !tween.is_finished() {
            self.apply_offset(value);
            return None;
        }

        self.animation = None;
        let event = match self.phase {
            ScrollPhase::Decelerating => ScrollEvent::DidEndDecelerating,
            _ => ScrollEvent::DidEndScrollingAnimation,
        };
        // Final notification is delivered at rest
        self.phase = ScrollPhase::Idle;
        let value = self.clamp_offset(value);
        self.apply_offset(value);
        Some(event)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paged_surface(pages: usize) -> ScrollSurface {
        let mut surface = ScrollSurface::new().with_paging(true);
        surface.set_viewport(Size::new(40.0, 10.0));
        surface.set_content_size(Size::new(40.0 * pages as f64, 10.0));
        surface
    }

    #[test]
    fn test_offset_is_clamped() {
        let mut surface = paged_surface(3);
        surface.set_content_offset(500.0, false);
        assert_eq!(surface.content_offset_x(), 80.0);
        surface.set_content_offset(-5.0, false);
        assert_eq!(surface.content_offset_x(), 0.0);
    }

    #[test]
    fn test_observers_receive_changes_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut surface = paged_surface(3);
        let sink = Rc::clone(&seen);
        let id = surface.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.offset_x));

        surface.set_content_offset(40.0, false);
        // Unchanged offsets are not re-announced
        surface.set_content_offset(40.0, false);
        assert_eq!(*seen.borrow(), vec![40.0]);

        assert!(surface.unsubscribe(id));
        assert!(!surface.unsubscribe(id));
        surface.set_content_offset(0.0, false);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(surface.observer_count(), 0);
    }

    #[test]
    fn test_drag_requires_drag_phase() {
        let mut surface = paged_surface(3);
        assert!(!surface.drag_by(10.0));
        surface.begin_drag();
        assert!(surface.drag_by(10.0));
        assert_eq!(surface.content_offset_x(), 10.0);
        assert_eq!(surface.phase(), ScrollPhase::Dragging);
    }

    #[test]
    fn test_paging_settles_on_nearest_page() {
        let mut surface = paged_surface(3);
        surface.begin_drag();
        surface.drag_by(25.0);
        assert_eq!(surface.end_drag(), ScrollEvent::DidEndDragging { will_decelerate: true });
        assert_eq!(surface.phase(), ScrollPhase::Decelerating);

        assert_eq!(surface.tick(Duration::from_millis(100)), None);
        assert_eq!(surface.tick(Duration::from_secs(1)), Some(ScrollEvent::DidEndDecelerating));
        assert_eq!(surface.content_offset_x(), 40.0);
        assert_eq!(surface.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn test_drag_ending_on_page_does_not_decelerate() {
        let mut surface = paged_surface(3);
        surface.begin_drag();
        surface.drag_by(40.0);
        assert_eq!(surface.end_drag(), ScrollEvent::DidEndDragging { will_decelerate: false });
        assert!(!surface.is_animating());
    }

    #[test]
    fn test_animated_offset_reports_completion() {
        let mut surface = paged_surface(4);
        let phases = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&phases);
        surface.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.phase));

        assert!(surface.set_content_offset(120.0, true));
        assert_eq!(surface.content_offset_x(), 0.0);
        assert_eq!(surface.tick(Duration::from_millis(150)), None);
        assert_eq!(
            surface.tick(Duration::from_millis(150)),
            Some(ScrollEvent::DidEndScrollingAnimation)
        );
        assert_eq!(surface.content_offset_x(), 120.0);
        assert_eq!(phases.borrow().first(), Some(&ScrollPhase::Animating));
        assert_eq!(phases.borrow().last(), Some(&ScrollPhase::Idle));
    }

    #[test]
    fn test_snapshot_extremes_and_page_count() {
        let mut surface = paged_surface(5);
        let snapshot = surface.snapshot();
        assert!(snapshot.is_at_start());
        assert_eq!(snapshot.page_count(), 5);
        surface.set_content_offset(160.0, false);
        assert!(surface.snapshot().is_at_end());
    }
}
