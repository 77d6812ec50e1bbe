// Paged Container
// Horizontally paging surface that lazily attaches one page view per index
//
// Pages are requested from a data source the first time they become visible (or are
// about to, while dragging) and stay attached until the container is dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use tracing::{debug, trace};

use crate::core::{
    Bounds, CellRect, ScrollEvent, ScrollSurface, SharedScrollSurface, Size, DEFAULT_ANIMATION_DURATION,
    DEFAULT_DECELERATION_DURATION, GEOMETRY_EPSILON,
};
use crate::utilities::blit;

/// Content shown on one page
pub trait PageView {
    /// Draw the page into `area`, which always covers the whole page
    fn render(&self, area: Rect, buf: &mut Buffer);

    /// Called when the page is attached and whenever the container changes size
    fn did_resize(&self, _size: Size) {}
}

pub type PageHandle = Rc<dyn PageView>;

pub trait PageDataSource {
    fn page_count(&self) -> usize;
    fn page_content(&self, index: usize) -> PageHandle;
}

/// Notified once per completed page transition
///
/// Called while the container is mutably borrowed by its owner, so implementations
/// must not call back into the same container.
pub trait PageDelegate {
    fn on_page_entered(&self, index: usize, page: &PageHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerConfig {
    pub animation_duration: Duration,
    pub deceleration_duration: Duration,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            animation_duration: DEFAULT_ANIMATION_DURATION,
            deceleration_duration: DEFAULT_DECELERATION_DURATION,
        }
    }
}

struct AttachedPage {
    view: PageHandle,
    frame: Bounds,
}

pub struct PagedContainer {
    surface: SharedScrollSurface,
    data_source: Option<Weak<dyn PageDataSource>>,
    delegate: Option<Weak<dyn PageDelegate>>,
    page_count: Option<usize>,
    pages: BTreeMap<usize, AttachedPage>,
    selected_index: usize,
    dragging: bool,
    previous_offset: f64,
    size: Size,
}

impl fmt::Debug for PagedContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedContainer")
            .field("surface", &self.surface)
            .field("page_count", &self.page_count)
            .field("attached", &self.attached_indices())
            .field("selected_index", &self.selected_index)
            .field("dragging", &self.dragging)
            .field("size", &self.size)
            .finish()
    }
}

impl Default for PagedContainer {
    fn default() -> Self {
        Self::new(PagerConfig::default())
    }
}

impl PagedContainer {
    pub fn new(config: PagerConfig) -> Self {
        let surface = ScrollSurface::new()
            .with_paging(true)
            .with_durations(config.animation_duration, config.deceleration_duration)
            .into_shared();
        Self {
            surface,
            data_source: None,
            delegate: None,
            page_count: None,
            pages: BTreeMap::new(),
            selected_index: 0,
            dragging: false,
            previous_offset: 0.0,
            size: Size::ZERO,
        }
    }

    pub fn set_data_source(&mut self, data_source: Weak<dyn PageDataSource>) {
        self.data_source = Some(data_source);
    }

    pub fn set_delegate(&mut self, delegate: Weak<dyn PageDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Shared handle to the paging surface, for observers such as the tab bar
    pub fn surface(&self) -> SharedScrollSurface {
        Rc::clone(&self.surface)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn content_offset_x(&self) -> f64 {
        self.surface.borrow().content_offset_x()
    }

    /// Page count from the data source, fetched once and cached until `reload_pages`
    pub fn number_of_pages(&mut self) -> usize {
        if let Some(count) = self.page_count {
            return count;
        }
        let Some(data_source) = self.data_source.as_ref().and_then(Weak::upgrade) else {
            return 0;
        };
        let count = data_source.page_count();
        debug!(count, "page count fetched");
        self.page_count = Some(count);
        count
    }

    // ── Attached pages ───────────────────────────────────────────────────────────────────────────

    pub fn attached_indices(&self) -> Vec<usize> {
        self.pages.keys().copied().collect()
    }

    pub fn is_attached(&self, index: usize) -> bool {
        self.pages.contains_key(&index)
    }

    pub fn page(&self, index: usize) -> Option<PageHandle> {
        self.pages.get(&index).map(|page| Rc::clone(&page.view))
    }

    pub fn page_frame(&self, index: usize) -> Option<Bounds> {
        self.pages.get(&index).map(|page| page.frame)
    }

    fn frame_for(&self, index: usize) -> Bounds {
        Bounds::new(index as f64 * self.size.width, 0.0, self.size.width, self.size.height)
    }

    /// Attach the page at `index` unless it already is; false if it cannot be
    fn attach(&mut self, index: usize) -> bool {
        if self.pages.contains_key(&index) {
            return true;
        }
        let count = self.number_of_pages();
        if index >= count {
            trace!(index, count, "ignoring out of range page");
            return false;
        }
        let Some(data_source) = self.data_source.as_ref().and_then(Weak::upgrade) else {
            return false;
        };

        let view = data_source.page_content(index);
        if !self.size.is_empty() {
            view.did_resize(self.size);
        }
        let frame = self.frame_for(index);
        self.pages.insert(index, AttachedPage { view, frame });
        debug!(index, "page attached");
        true
    }

    fn update_content_size(&mut self) {
        let count = self.number_of_pages();
        let mut surface = self.surface.borrow_mut();
        surface.set_viewport(self.size);
        surface.set_content_size(Size::new(self.size.width * count as f64, self.size.height));
    }

    // ── Layout ───────────────────────────────────────────────────────────────────────────────────

    /// Lay pages out side by side; a no-op unless the size changed
    pub fn layout(&mut self, size: Size) {
        if size.is_empty() {
            trace!("skipping layout of empty pager");
            return;
        }
        if size == self.size {
            return;
        }
        self.size = size;
        self.update_content_size();

        let frames: Vec<(usize, Bounds)> = self.pages.keys().map(|&index| (index, self.frame_for(index))).collect();
        for (index, frame) in frames {
            if let Some(page) = self.pages.get_mut(&index) {
                page.frame = frame;
                page.view.did_resize(size);
            }
        }

        self.attach(self.selected_index);
        let aligned = self.selected_index as f64 * size.width;
        self.surface.borrow_mut().set_content_offset(aligned, false);
        debug!(width = size.width, height = size.height, "pager laid out");
    }

    /// Drop the cached page count and attach the selected page again
    pub fn reload_pages(&mut self) {
        self.page_count = None;
        if self.size.is_empty() {
            self.number_of_pages();
        } else {
            self.update_content_size();
        }
        self.attach(self.selected_index);
        debug!(count = self.page_count.unwrap_or(0), "pages reloaded");
    }

    // ── Navigation ───────────────────────────────────────────────────────────────────────────────

    /// Move to a page; out-of-range indices are ignored
    pub fn jump_to(&mut self, index: usize, animated: bool) -> bool {
        let count = self.number_of_pages();
        if index >= count {
            trace!(index, count, "ignoring jump to out of range page");
            return false;
        }

        self.attach(index);
        self.dragging = false;
        let target = index as f64 * self.size.width;
        let moved = self.surface.borrow_mut().set_content_offset(target, animated);
        self.selected_index = index;
        debug!(index, animated, moved, "jumped to page");

        // Animated jumps report entry when the animation ends
        if moved && !animated {
            self.enter_page(index);
        }
        true
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
        let mut surface = self.surface.borrow_mut();
        self.previous_offset = surface.content_offset_x();
        surface.begin_drag();
    }

    /// Drag by `dx` points and attach the page the drag is heading towards
    pub fn drag_by(&mut self, dx: f64) -> bool {
        if !self.dragging {
            return false;
        }
        let moved = self.surface.borrow_mut().drag_by(dx);
        self.prefetch_adjacent();
        moved
    }

    fn prefetch_adjacent(&mut self) {
        let (offset, max_offset) = {
            let surface = self.surface.borrow();
            (surface.content_offset_x(), surface.max_offset_x())
        };
        if !self.dragging || offset < 0.0 || offset >= max_offset {
            return;
        }

        let next = if offset > self.previous_offset {
            self.selected_index.checked_add(1)
        } else {
            self.selected_index.checked_sub(1)
        };
        if let Some(next) = next {
            if next < self.number_of_pages() {
                self.attach(next);
            }
        }
    }

    /// Release the drag; settles immediately if the offset moved and no deceleration is needed
    pub fn end_drag(&mut self) -> ScrollEvent {
        let (event, offset) = {
            let mut surface = self.surface.borrow_mut();
            (surface.end_drag(), surface.content_offset_x())
        };
        let was_dragging = std::mem::replace(&mut self.dragging, false);
        let moved = (offset - self.previous_offset).abs() > GEOMETRY_EPSILON;
        if was_dragging && moved && event == (ScrollEvent::DidEndDragging { will_decelerate: false }) {
            self.settle();
        }
        event
    }

    /// Advance the paging animation; settles when it completes
    pub fn tick(&mut self, dt: Duration) -> Option<ScrollEvent> {
        let event = self.surface.borrow_mut().tick(dt);
        if matches!(
            event,
            Some(ScrollEvent::DidEndDecelerating) | Some(ScrollEvent::DidEndScrollingAnimation)
        ) {
            self.settle();
        }
        event
    }

    pub fn is_animating(&self) -> bool {
        self.surface.borrow().is_animating()
    }

    fn settle(&mut self) {
        let page_width = self.size.width;
        if page_width <= 0.0 {
            return;
        }
        let offset = self.surface.borrow().content_offset_x();
        let index = (offset / page_width + GEOMETRY_EPSILON).floor().max(0.0) as usize;
        self.selected_index = index;
        self.attach(index);
        self.enter_page(index);
    }

    fn enter_page(&self, index: usize) {
        let Some(page) = self.page(index) else {
            return;
        };
        debug!(index, "page entered");
        if let Some(delegate) = self.delegate.as_ref().and_then(Weak::upgrade) {
            delegate.on_page_entered(index, &page);
        }
    }
}

// ┌────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                         Rendering                                              │
// └────────────────────────────────────────────────────────────────────────────────────────────────┘

impl Widget for &PagedContainer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let scroll_x = self.surface.borrow().content_offset_x();

        for page in self.pages.values() {
            let cells = CellRect::from_bounds(page.frame, scroll_x, area);
            let Some(visible) = cells.clip_to(area) else {
                continue;
            };

            // Pages draw at full size offscreen; only the visible slice is copied
            let page_area = Rect::new(0, 0, cells.width.max(0) as u16, cells.height.max(0) as u16);
            let mut offscreen = Buffer::empty(page_area);
            page.view.render(page_area, &mut offscreen);

            let source_x = (visible.x as i32 - cells.x) as u16;
            let source_y = (visible.y as i32 - cells.y) as u16;
            blit(&offscreen, (source_x, source_y), visible, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Style};
    use std::cell::RefCell;

    const WIDTH: f64 = 40.0;

    struct FillPage {
        index: usize,
        symbol: &'static str,
        color: Color,
        resizes: Rc<RefCell<Vec<(usize, Size)>>>,
    }

    impl PageView for FillPage {
        fn render(&self, area: Rect, buf: &mut Buffer) {
            buf.set_style(area, Style::default().bg(self.color));
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    buf[(x, y)].set_symbol(self.symbol);
                }
            }
        }

        fn did_resize(&self, size: Size) {
            self.resizes.borrow_mut().push((self.index, size));
        }
    }

    struct TestPages {
        count: RefCell<usize>,
        count_queries: RefCell<usize>,
        requested: RefCell<Vec<usize>>,
        resizes: Rc<RefCell<Vec<(usize, Size)>>>,
    }

    impl TestPages {
        fn new(count: usize) -> Rc<Self> {
            Rc::new(Self {
                count: RefCell::new(count),
                count_queries: RefCell::new(0),
                requested: RefCell::new(Vec::new()),
                resizes: Rc::new(RefCell::new(Vec::new())),
            })
        }
    }

    impl PageDataSource for TestPages {
        fn page_count(&self) -> usize {
            *self.count_queries.borrow_mut() += 1;
            *self.count.borrow()
        }

        fn page_content(&self, index: usize) -> PageHandle {
            self.requested.borrow_mut().push(index);
            let symbol = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l"][index % 12];
            Rc::new(FillPage {
                index,
                symbol,
                color: Color::Indexed(index as u8),
                resizes: Rc::clone(&self.resizes),
            })
        }
    }

    #[derive(Default)]
    struct RecordingDelegate {
        entered: RefCell<Vec<usize>>,
    }

    impl PageDelegate for RecordingDelegate {
        fn on_page_entered(&self, index: usize, _page: &PageHandle) {
            self.entered.borrow_mut().push(index);
        }
    }

    fn pager(count: usize) -> (PagedContainer, Rc<TestPages>, Rc<RecordingDelegate>) {
        let source = TestPages::new(count);
        let delegate = Rc::new(RecordingDelegate::default());
        let mut pager = PagedContainer::default();
        pager.set_data_source(Rc::downgrade(&source) as Weak<dyn PageDataSource>);
        pager.set_delegate(Rc::downgrade(&delegate) as Weak<dyn PageDelegate>);
        pager.layout(Size::new(WIDTH, 10.0));
        (pager, source, delegate)
    }

    fn settle(pager: &mut PagedContainer) {
        for _ in 0..10 {
            pager.tick(Duration::from_millis(100));
        }
    }

    #[test]
    fn test_first_layout_attaches_selected_page_only() {
        let (pager, source, _delegate) = pager(10);
        assert_eq!(pager.attached_indices(), vec![0]);
        assert_eq!(*source.requested.borrow(), vec![0]);
        assert_eq!(pager.surface().borrow().content_size().width, 400.0);
        assert_eq!(pager.page_frame(0), Some(Bounds::new(0.0, 0.0, WIDTH, 10.0)));
    }

    #[test]
    fn test_page_count_is_cached() {
        let (mut pager, source, _delegate) = pager(10);
        pager.jump_to(3, false);
        pager.jump_to(5, true);
        assert_eq!(pager.number_of_pages(), 10);
        assert_eq!(*source.count_queries.borrow(), 1);
    }

    #[test]
    fn test_jump_attaches_and_notifies_once() {
        let (mut pager, source, delegate) = pager(10);
        assert!(pager.jump_to(4, false));
        assert_eq!(pager.selected_index(), 4);
        assert_eq!(pager.content_offset_x(), 160.0);
        assert!(pager.is_attached(4));
        assert_eq!(*delegate.entered.borrow(), vec![4]);

        // Already there: nothing moves, nothing is re-requested
        pager.jump_to(4, false);
        assert_eq!(*delegate.entered.borrow(), vec![4]);
        assert_eq!(*source.requested.borrow(), vec![0, 4]);
    }

    #[test]
    fn test_animated_jump_notifies_when_animation_ends() {
        let (mut pager, _source, delegate) = pager(10);
        assert!(pager.jump_to(2, true));
        assert_eq!(pager.selected_index(), 2);
        assert!(delegate.entered.borrow().is_empty());

        settle(&mut pager);
        assert_eq!(pager.content_offset_x(), 80.0);
        assert_eq!(*delegate.entered.borrow(), vec![2]);
    }

    #[test]
    fn test_out_of_range_jump_is_ignored() {
        let (mut pager, _source, delegate) = pager(3);
        assert!(!pager.jump_to(3, false));
        assert!(!pager.jump_to(usize::MAX, true));
        assert_eq!(pager.selected_index(), 0);
        assert_eq!(pager.attached_indices(), vec![0]);
        assert!(delegate.entered.borrow().is_empty());
    }

    #[test]
    fn test_rightward_drag_prefetches_next_page() {
        let (mut pager, _source, _delegate) = pager(10);
        pager.jump_to(2, false);
        pager.begin_drag();
        pager.drag_by(5.0);
        assert!(pager.is_attached(3));
        assert!(!pager.is_attached(1));
        assert!(pager.is_dragging());
    }

    #[test]
    fn test_leftward_drag_prefetches_previous_page() {
        let (mut pager, _source, _delegate) = pager(10);
        pager.jump_to(2, false);
        pager.begin_drag();
        pager.drag_by(-5.0);
        assert!(pager.is_attached(1));
        assert!(!pager.is_attached(3));
    }

    #[test]
    fn test_drag_at_last_page_never_requests_past_end() {
        let (mut pager, source, _delegate) = pager(3);
        pager.jump_to(2, false);
        pager.begin_drag();
        pager.drag_by(15.0);
        assert_eq!(pager.content_offset_x(), 80.0);
        assert!(!source.requested.borrow().contains(&3));
        assert_eq!(pager.attached_indices(), vec![0, 2]);
    }

    #[test]
    fn test_drag_settles_on_nearest_page_and_notifies() {
        let (mut pager, _source, delegate) = pager(10);
        pager.begin_drag();
        pager.drag_by(25.0);
        assert_eq!(pager.end_drag(), ScrollEvent::DidEndDragging { will_decelerate: true });
        assert!(delegate.entered.borrow().is_empty());
        assert!(!pager.is_dragging());

        settle(&mut pager);
        assert_eq!(pager.selected_index(), 1);
        assert_eq!(pager.content_offset_x(), WIDTH);
        assert_eq!(*delegate.entered.borrow(), vec![1]);
    }

    #[test]
    fn test_drag_released_on_page_boundary_settles_immediately() {
        let (mut pager, _source, delegate) = pager(10);
        pager.begin_drag();
        pager.drag_by(WIDTH);
        assert_eq!(pager.end_drag(), ScrollEvent::DidEndDragging { will_decelerate: false });
        assert_eq!(pager.selected_index(), 1);
        assert_eq!(*delegate.entered.borrow(), vec![1]);
    }

    #[test]
    fn test_release_without_movement_enters_nothing() {
        let (mut pager, _source, delegate) = pager(10);
        pager.jump_to(2, false);
        delegate.entered.borrow_mut().clear();

        pager.begin_drag();
        pager.end_drag();
        pager.begin_drag();
        pager.drag_by(0.0);
        pager.end_drag();
        assert_eq!(pager.selected_index(), 2);
        assert!(delegate.entered.borrow().is_empty());

        // Dragging away and back to the same page is not a transition either
        pager.begin_drag();
        pager.drag_by(10.0);
        pager.drag_by(-10.0);
        pager.end_drag();
        assert!(delegate.entered.borrow().is_empty());
    }

    #[test]
    fn test_drag_without_begin_is_ignored() {
        let (mut pager, _source, delegate) = pager(10);
        assert!(!pager.drag_by(10.0));
        pager.end_drag();
        assert_eq!(pager.content_offset_x(), 0.0);
        assert!(delegate.entered.borrow().is_empty());
    }

    #[test]
    fn test_reload_is_idempotent() {
        let (mut pager, source, _delegate) = pager(10);
        pager.jump_to(3, false);
        pager.reload_pages();
        let first = (pager.attached_indices(), pager.selected_index());
        pager.reload_pages();
        assert_eq!((pager.attached_indices(), pager.selected_index()), first);
        assert_eq!(*source.count_queries.borrow(), 3);
        assert_eq!(*source.requested.borrow(), vec![0, 3]);
    }

    #[test]
    fn test_reload_picks_up_new_pages() {
        let (mut pager, source, _delegate) = pager(3);
        assert!(!pager.jump_to(3, false));
        *source.count.borrow_mut() = 4;
        pager.reload_pages();
        assert_eq!(pager.surface().borrow().content_size().width, 160.0);
        assert!(pager.jump_to(3, false));
    }

    #[test]
    fn test_layout_only_reframes_on_size_change() {
        let (mut pager, _source, _delegate) = pager(10);
        pager.jump_to(2, false);
        assert!(pager.page(2).is_some());

        pager.layout(Size::new(WIDTH, 10.0));
        assert_eq!(pager.page_frame(2), Some(Bounds::new(80.0, 0.0, WIDTH, 10.0)));

        pager.layout(Size::new(50.0, 12.0));
        assert_eq!(pager.page_frame(2), Some(Bounds::new(100.0, 0.0, 50.0, 12.0)));
        assert_eq!(pager.page_frame(0), Some(Bounds::new(0.0, 0.0, 50.0, 12.0)));
        assert_eq!(pager.content_offset_x(), 100.0);
        assert_eq!(pager.surface().borrow().content_size().width, 500.0);
    }

    #[test]
    fn test_pages_receive_resize_notifications() {
        let source = TestPages::new(2);
        let mut pager = PagedContainer::default();
        pager.set_data_source(Rc::downgrade(&source) as Weak<dyn PageDataSource>);
        pager.layout(Size::ZERO);
        assert!(pager.attached_indices().is_empty());

        pager.layout(Size::new(20.0, 5.0));
        pager.layout(Size::new(20.0, 5.0));
        pager.layout(Size::new(30.0, 5.0));
        assert_eq!(pager.attached_indices(), vec![0]);
        assert_eq!(
            *source.resizes.borrow(),
            vec![(0, Size::new(20.0, 5.0)), (0, Size::new(30.0, 5.0))]
        );
    }

    #[test]
    fn test_missing_data_source_has_no_pages() {
        let mut pager = PagedContainer::default();
        pager.layout(Size::new(WIDTH, 10.0));
        assert_eq!(pager.number_of_pages(), 0);
        assert!(!pager.jump_to(0, false));
        assert!(pager.attached_indices().is_empty());
    }

    #[test]
    fn test_render_blits_visible_slices() {
        let (mut pager, _source, _delegate) = pager(3);
        pager.begin_drag();
        pager.drag_by(30.0);

        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        (&pager).render(area, &mut buf);

        // Page 0 shows its last 10 columns, page 1 its first 30
        assert_eq!(buf[(0, 0)].symbol(), "a");
        assert_eq!(buf[(9, 9)].symbol(), "a");
        assert_eq!(buf[(10, 0)].symbol(), "b");
        assert_eq!(buf[(39, 9)].symbol(), "b");
        assert_eq!(buf[(10, 0)].bg, Color::Indexed(1));
    }
}
