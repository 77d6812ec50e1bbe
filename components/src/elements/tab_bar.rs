// Category Tab Bar
// Horizontally scrollable strip of tab items with an animated selection indicator
//
// The bar can observe an external scroll surface (usually a paged container) and
// interpolates its indicator between two tabs while that surface is being dragged.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols,
    widgets::Widget,
};
use tracing::{debug, trace, warn};

use crate::core::{
    Bounds, CellRect, EdgeInsets, Lerp, ScrollPhase, ScrollSnapshot, ScrollSurface, SharedScrollSurface,
    Size, SubscriptionId, Tween, DEFAULT_ANIMATION_DURATION, GEOMETRY_EPSILON,
};
use crate::elements::tab_item::{TabFont, TabItem};

/// Receives tab selections made by tapping or through `select_index`
pub trait TabBarDelegate {
    fn on_tab_selected(&self, title: &str, index: usize);
}

/// How wide the selection indicator is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorWidth {
    /// Track the selected item's width
    Dynamic,
    /// Constant width centered under the selected item
    Fixed(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabBarConfig {
    pub item_spacing: f64,
    pub bar_inset: EdgeInsets,
    pub item_inset: EdgeInsets,
    pub text_color: Color,
    pub selected_text_color: Color,
    pub font: TabFont,
    pub indicator_color: Color,
    pub indicator_height: f64,
    pub indicator_width: IndicatorWidth,
    pub default_index: usize,
    pub animation_duration: Duration,
}

impl Default for TabBarConfig {
    fn default() -> Self {
        Self {
            item_spacing: 2.0,
            bar_inset: EdgeInsets::ZERO,
            item_inset: EdgeInsets::new(0.0, 1.0, 0.0, 1.0),
            text_color: Color::Gray,
            selected_text_color: Color::White,
            font: TabFont::new(Modifier::empty()),
            indicator_color: Color::Cyan,
            indicator_height: 1.0,
            indicator_width: IndicatorWidth::Dynamic,
            default_index: 0,
            animation_duration: DEFAULT_ANIMATION_DURATION,
        }
    }
}

impl TabBarConfig {
    /// Geometric values must be finite and non-negative
    pub fn is_valid(&self) -> bool {
        let fixed_width_ok = match self.indicator_width {
            IndicatorWidth::Dynamic => true,
            IndicatorWidth::Fixed(width) => width.is_finite() && width >= 0.0,
        };
        self.item_spacing.is_finite()
            && self.item_spacing >= 0.0
            && self.indicator_height.is_finite()
            && self.indicator_height >= 0.0
            && self.bar_inset.is_valid()
            && self.item_inset.is_valid()
            && fixed_width_ok
    }

    fn apply_to(&self, item: &mut TabItem) {
        item.set_text_color(self.text_color);
        item.set_selected_text_color(self.selected_text_color);
        item.set_font(self.font);
        item.set_edge_inset(self.item_inset);
    }
}

// ┌────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                   Tab Bar State (shared)                                       │
// └────────────────────────────────────────────────────────────────────────────────────────────────┘

/// Everything the scroll observer needs to mutate lives here, behind its own `RefCell`
#[derive(Debug)]
struct TabBarCore {
    config: TabBarConfig,
    items: Vec<TabItem>,
    size: Size,
    selected_index: usize,
    indicator: Bounds,
    indicator_tween: Option<Tween<Bounds>>,
    indicator_visible: bool,
    strip: ScrollSurface,
}

impl TabBarCore {
    fn new(config: TabBarConfig) -> Self {
        let strip = ScrollSurface::new().with_durations(config.animation_duration, config.animation_duration);
        Self {
            config,
            items: Vec::new(),
            size: Size::ZERO,
            selected_index: 0,
            indicator: Bounds::ZERO,
            indicator_tween: None,
            indicator_visible: false,
            strip,
        }
    }

    fn create_items(&mut self, titles: Vec<String>) {
        self.items.clear();
        for title in titles {
            self.add_item(title);
        }
        self.selected_index = 0;
        self.layout_items();
        self.layout_indicator();

        let default_index = self.config.default_index;
        if !self.scroll_to(default_index, false) && !self.items.is_empty() {
            debug!(default_index, count = self.items.len(), "default tab index out of range; selecting first tab");
            self.scroll_to(0, false);
        }
    }

    fn add_item(&mut self, title: String) {
        let mut item = TabItem::new(title);
        self.config.apply_to(&mut item);
        self.items.push(item);
    }

    fn update_items_appearance(&mut self) {
        let config = self.config.clone();
        for item in &mut self.items {
            config.apply_to(item);
        }
    }

    fn layout_items(&mut self) {
        if self.items.is_empty() || self.size.is_empty() {
            return;
        }

        let inset = self.config.bar_inset;
        let height = (self.size.height - inset.vertical()).max(0.0);
        let mut x = inset.left;
        for item in &mut self.items {
            let width = item.preferred_size().width;
            item.set_frame(Bounds::new(x, inset.top, width, height));
            x = item.frame().max_x() + self.config.item_spacing;
        }
        x += inset.right;

        self.strip.set_viewport(self.size);
        self.strip.set_content_size(Size::new(x, self.size.height));
    }

    fn layout_indicator(&mut self) {
        if self.items.is_empty() {
            self.indicator_visible = false;
            return;
        }
        self.indicator_visible = true;
        self.indicator_tween = None;
        if let Some(frame) = self.indicator_frame(self.selected_index) {
            self.indicator = frame;
        }
    }

    fn indicator_frame(&self, index: usize) -> Option<Bounds> {
        let frame = self.items.get(index)?.frame();
        let height = self.config.indicator_height;
        let (x, width) = match self.config.indicator_width {
            IndicatorWidth::Dynamic => (frame.min_x(), frame.width),
            IndicatorWidth::Fixed(width) => (frame.mid_x() - width / 2.0, width),
        };
        let y = (self.size.height - height - self.config.bar_inset.bottom).max(0.0);
        Some(Bounds::new(x, y, width, height))
    }

    fn indicator_target(&self) -> Bounds {
        self.indicator_tween
            .as_ref()
            .map(|tween| tween.target())
            .unwrap_or(self.indicator)
    }

    /// Center the item in the strip, never scrolling past either end
    fn scroll_item(&mut self, index: usize, animated: bool) {
        let Some(frame) = self.items.get(index).map(TabItem::frame) else {
            return;
        };
        let target = frame.min_x() - self.size.width / 2.0 + frame.width / 2.0;
        let target = target.clamp(0.0, self.strip.max_offset_x());
        self.strip.set_content_offset(target, animated);
    }

    fn move_indicator(&mut self, index: usize, animated: bool) {
        let Some(target) = self.indicator_frame(index) else {
            return;
        };
        let duration = self.config.animation_duration;
        if animated && !duration.is_zero() && !self.indicator.approx_eq(&target) {
            self.indicator_tween = Some(Tween::new(self.indicator, target, duration));
        } else {
            self.indicator_tween = None;
            self.indicator = target;
        }
    }

    /// Select `index` without notifying anyone; false if out of range
    fn scroll_to(&mut self, index: usize, animated: bool) -> bool {
        if index >= self.items.len() {
            trace!(index, count = self.items.len(), "ignoring out of range tab index");
            return false;
        }

        self.scroll_item(index, animated);
        self.move_indicator(index, animated);

        for item in self.items.iter_mut().filter(|item| item.is_selected()) {
            item.set_selected(false);
        }
        self.items[index].set_selected(true);
        self.selected_index = index;
        true
    }

    fn relayout(&mut self) {
        self.layout_items();
        self.layout_indicator();
    }

    fn tick(&mut self, dt: Duration) {
        if let Some(tween) = self.indicator_tween.as_mut() {
            let value = tween.advance(dt);
            let finished = tween.is_finished();
            self.indicator = value;
            if finished {
                self.indicator_tween = None;
            }
        }
        self.strip.tick(dt);
    }

    // ┌────────────────────────────────────────────────────────────────────────────────────────────┐
    // │                               Observed scroll interpolation                                │
    // └────────────────────────────────────────────────────────────────────────────────────────────┘

    fn handle_content_offset(&mut self, snapshot: &ScrollSnapshot) {
        let page_width = snapshot.viewport_width;
        if page_width <= 0.0 || self.items.is_empty() {
            return;
        }
        // Programmatic jumps already animate the indicator through selection; the
        // surface reports its final offset as Idle
        if snapshot.phase == ScrollPhase::Animating {
            return;
        }

        let offset = snapshot.offset_x;
        // A surface at rest always lands on the page under its offset
        if snapshot.phase == ScrollPhase::Idle {
            self.snap_to_page((offset / page_width).round().max(0.0) as usize);
            return;
        }

        let start_x = self.selected_index as f64 * page_width;
        let progress = (offset - start_x) / page_width;
        let magnitude = progress.abs();

        if magnitude < GEOMETRY_EPSILON || (magnitude - 1.0).abs() < GEOMETRY_EPSILON {
            self.snap_to_page((offset / page_width).round().max(0.0) as usize);
            return;
        }
        if snapshot.is_at_start() {
            self.snap_to_page(0);
            return;
        }
        if snapshot.is_at_end() {
            if let Some(last) = snapshot.page_count().checked_sub(1) {
                self.snap_to_page(last);
            }
            return;
        }
        let page = offset / page_width;
        let whole = page.floor().max(0.0) as usize;
        let (from, to) = if offset > start_x {
            (whole, whole + 1)
        } else {
            (whole + 1, whole)
        };
        let (Some(from_frame), Some(to_frame)) = (self.indicator_frame(from), self.indicator_frame(to)) else {
            return;
        };

        // Equals |progress| while the drag stays within one page of the selection
        let blend = (page - from as f64).abs().min(1.0);
        self.indicator_tween = None;
        self.indicator = from_frame.lerp(to_frame, blend);
        trace!(from, to, blend, "indicator interpolated");
    }

    /// Select the page the observed surface settled on; already heading there means nothing to do
    fn snap_to_page(&mut self, index: usize) {
        let Some(frame) = self.indicator_frame(index) else {
            return;
        };
        if index == self.selected_index && self.indicator_target().approx_eq(&frame) {
            return;
        }
        self.scroll_to(index, true);
    }
}

// ┌────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                     Category Tab Bar                                           │
// └────────────────────────────────────────────────────────────────────────────────────────────────┘

struct Observation {
    surface: Weak<RefCell<ScrollSurface>>,
    subscription: SubscriptionId,
}

pub struct CategoryTabBar {
    core: Rc<RefCell<TabBarCore>>,
    delegate: Option<Weak<dyn TabBarDelegate>>,
    observation: Option<Observation>,
}

impl fmt::Debug for CategoryTabBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryTabBar")
            .field("core", &self.core)
            .field("has_delegate", &self.delegate.is_some())
            .field("observing", &self.observation.is_some())
            .finish()
    }
}

impl Drop for CategoryTabBar {
    fn drop(&mut self) {
        self.stop_observing();
    }
}

impl CategoryTabBar {
    /// Create an empty bar. Panics if `config` carries non-finite or negative geometry.
    pub fn new(config: TabBarConfig) -> Self {
        assert!(config.is_valid(), "invalid tab bar configuration: {config:?}");
        Self {
            core: Rc::new(RefCell::new(TabBarCore::new(config))),
            delegate: None,
            observation: None,
        }
    }

    /// Create a bar with titles and a size in one step
    pub fn with_titles<I, S>(titles: I, size: Size, config: TabBarConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut bar = Self::new(config);
        bar.core.borrow_mut().size = size;
        bar.set_titles(titles);
        bar
    }

    pub fn set_delegate(&mut self, delegate: Weak<dyn TabBarDelegate>) {
        self.delegate = Some(delegate);
    }

    // ── Items ────────────────────────────────────────────────────────────────────────────────────

    /// Replace every item; selection resets to the default index
    pub fn set_titles<I, S>(&mut self, titles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let titles: Vec<String> = titles.into_iter().map(Into::into).collect();
        debug!(count = titles.len(), "tab titles replaced");
        self.core.borrow_mut().create_items(titles);
    }

    /// Append one item without touching the selection
    pub fn add_title(&mut self, title: impl Into<String>) {
        let mut core = self.core.borrow_mut();
        core.add_item(title.into());
        core.layout_items();
    }

    pub fn add_titles<I, S>(&mut self, titles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for title in titles {
            self.add_title(title);
        }
    }

    pub fn titles(&self) -> Vec<String> {
        self.core.borrow().items.iter().map(|item| item.text().to_string()).collect()
    }

    pub fn item_count(&self) -> usize {
        self.core.borrow().items.len()
    }

    pub fn item(&self, index: usize) -> Option<TabItem> {
        self.core.borrow().items.get(index).cloned()
    }

    // ── Selection ────────────────────────────────────────────────────────────────────────────────

    pub fn selected_index(&self) -> usize {
        self.core.borrow().selected_index
    }

    pub fn selected_title(&self) -> Option<String> {
        let core = self.core.borrow();
        core.items.get(core.selected_index).map(|item| item.text().to_string())
    }

    /// Select a tab and notify the delegate; out-of-range indices are ignored
    pub fn select_index(&mut self, index: usize, animated: bool) -> bool {
        let title = {
            let mut core = self.core.borrow_mut();
            if !core.scroll_to(index, animated) {
                return false;
            }
            core.items[index].text().to_string()
        };

        debug!(index, title = %title, "tab selected");
        if let Some(delegate) = self.delegate.as_ref().and_then(Weak::upgrade) {
            delegate.on_tab_selected(&title, index);
        }
        true
    }

    /// Index of the item under a bar-local point
    pub fn item_at(&self, x: f64, y: f64) -> Option<usize> {
        let core = self.core.borrow();
        let content_x = x + core.strip.content_offset_x();
        core.items.iter().position(|item| item.frame().contains(content_x, y))
    }

    /// Tap at a bar-local point; selects the item under it with animation
    pub fn tap(&mut self, x: f64, y: f64) -> bool {
        match self.item_at(x, y) {
            Some(index) => self.select_index(index, true),
            None => false,
        }
    }

    // ── Geometry ─────────────────────────────────────────────────────────────────────────────────

    pub fn size(&self) -> Size {
        self.core.borrow().size
    }

    /// Resize the bar; re-lays out and re-centers the selection without animation
    pub fn set_size(&mut self, size: Size) {
        let mut core = self.core.borrow_mut();
        if core.size == size {
            return;
        }
        core.size = size;
        core.strip.set_viewport(size);
        core.relayout();
        let selected = core.selected_index;
        core.scroll_to(selected, false);
    }

    /// Indicator geometry as currently presented (mid-animation values included)
    pub fn indicator_frame(&self) -> Bounds {
        self.core.borrow().indicator
    }

    /// Where the indicator is heading (equals `indicator_frame` at rest)
    pub fn indicator_target(&self) -> Bounds {
        self.core.borrow().indicator_target()
    }

    /// Indicator geometry for a whole index
    pub fn indicator_frame_at(&self, index: usize) -> Option<Bounds> {
        self.core.borrow().indicator_frame(index)
    }

    pub fn is_indicator_visible(&self) -> bool {
        self.core.borrow().indicator_visible
    }

    pub fn strip_offset(&self) -> f64 {
        self.core.borrow().strip.content_offset_x()
    }

    pub fn content_width(&self) -> f64 {
        self.core.borrow().strip.content_size().width
    }

    /// Scroll the strip itself (e.g. mouse wheel over the bar)
    pub fn scroll_strip_by(&mut self, dx: f64) {
        self.core.borrow_mut().strip.scroll_by(dx);
    }

    /// Advance indicator and strip animations
    pub fn tick(&mut self, dt: Duration) {
        self.core.borrow_mut().tick(dt);
    }

    pub fn is_animating(&self) -> bool {
        let core = self.core.borrow();
        core.indicator_tween.is_some() || core.strip.is_animating()
    }

    // ── Configuration ────────────────────────────────────────────────────────────────────────────

    pub fn config(&self) -> TabBarConfig {
        self.core.borrow().config.clone()
    }

    /// Apply several configuration changes with a single re-layout
    pub fn update_config<F>(&mut self, update: F)
    where
        F: FnOnce(&mut TabBarConfig),
    {
        let mut core = self.core.borrow_mut();
        let previous_default = core.config.default_index;
        update(&mut core.config);
        assert!(core.config.is_valid(), "invalid tab bar configuration: {:?}", core.config);

        let duration = core.config.animation_duration;
        core.strip = std::mem::take(&mut core.strip).with_durations(duration, duration);
        core.update_items_appearance();
        core.relayout();
        let default_index = core.config.default_index;
        if default_index != previous_default {
            core.scroll_to(default_index, false);
        }
    }

    pub fn set_item_spacing(&mut self, spacing: f64) {
        let mut core = self.core.borrow_mut();
        core.config.item_spacing = spacing;
        core.relayout();
    }

    pub fn set_bar_inset(&mut self, inset: EdgeInsets) {
        let mut core = self.core.borrow_mut();
        core.config.bar_inset = inset;
        core.relayout();
    }

    pub fn set_item_inset(&mut self, inset: EdgeInsets) {
        let mut core = self.core.borrow_mut();
        core.config.item_inset = inset;
        core.update_items_appearance();
        core.relayout();
    }

    pub fn set_text_color(&mut self, color: Color) {
        let mut core = self.core.borrow_mut();
        core.config.text_color = color;
        core.update_items_appearance();
    }

    pub fn set_selected_text_color(&mut self, color: Color) {
        let mut core = self.core.borrow_mut();
        core.config.selected_text_color = color;
        core.update_items_appearance();
    }

    /// Letter spacing changes label widths, so fonts re-run layout too
    pub fn set_font(&mut self, font: TabFont) {
        let mut core = self.core.borrow_mut();
        core.config.font = font;
        core.update_items_appearance();
        core.relayout();
    }

    pub fn set_indicator_color(&mut self, color: Color) {
        self.core.borrow_mut().config.indicator_color = color;
    }

    pub fn set_indicator_height(&mut self, height: f64) {
        let mut core = self.core.borrow_mut();
        core.config.indicator_height = height;
        core.layout_indicator();
    }

    pub fn set_indicator_width(&mut self, width: IndicatorWidth) {
        let mut core = self.core.borrow_mut();
        core.config.indicator_width = width;
        core.layout_indicator();
    }

    /// Change the default index and move the selection there immediately (no delegate call)
    pub fn set_default_index(&mut self, index: usize) {
        let mut core = self.core.borrow_mut();
        core.config.default_index = index;
        core.scroll_to(index, false);
    }

    // ── Observation ──────────────────────────────────────────────────────────────────────────────

    /// Follow another surface's offset; replaces any previous observation
    pub fn observe(&mut self, surface: &SharedScrollSurface) {
        self.stop_observing();

        let core = Rc::downgrade(&self.core);
        let Ok(mut observed) = surface.try_borrow_mut() else {
            warn!("scroll surface busy; tab bar observation not installed");
            return;
        };
        let subscription = observed.subscribe(move |snapshot| {
            let Some(core) = core.upgrade() else {
                return;
            };
            match core.try_borrow_mut() {
                Ok(mut core) => core.handle_content_offset(snapshot),
                Err(_) => warn!(offset = snapshot.offset_x, "tab bar busy; scroll update dropped"),
            };
        });
        self.observation = Some(Observation {
            surface: Rc::downgrade(surface),
            subscription,
        });
    }

    pub fn stop_observing(&mut self) {
        let Some(observation) = self.observation.take() else {
            return;
        };
        if let Some(surface) = observation.surface.upgrade() {
            match surface.try_borrow_mut() {
                Ok(mut surface) => {
                    surface.unsubscribe(observation.subscription);
                }
                Err(_) => warn!(
                    subscription = ?observation.subscription,
                    "scroll surface busy; tab bar subscription left in place"
                ),
            };
        }
    }

    pub fn is_observing(&self) -> bool {
        self.observation
            .as_ref()
            .map(|observation| observation.surface.strong_count() > 0)
            .unwrap_or(false)
    }

    /// Feed one scroll position directly, bypassing the observer registry
    pub fn handle_scroll(&mut self, snapshot: &ScrollSnapshot) {
        self.core.borrow_mut().handle_content_offset(snapshot);
    }
}

// ┌────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                         Rendering                                              │
// └────────────────────────────────────────────────────────────────────────────────────────────────┘

impl Widget for &CategoryTabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let core = self.core.borrow();
        let scroll_x = core.strip.content_offset_x();

        for item in &core.items {
            let cells = CellRect::from_bounds(item.frame(), scroll_x, area);
            if cells.clip_to(area).is_some() {
                item.render_label(cells, area, buf);
            }
        }

        if !core.indicator_visible {
            return;
        }
        let cells = CellRect::from_bounds(core.indicator, scroll_x, area);
        let Some(visible) = cells.clip_to(area) else {
            return;
        };
        let style = Style::default().fg(core.config.indicator_color);
        for y in visible.top()..visible.bottom() {
            for x in visible.left()..visible.right() {
                buf[(x, y)].set_symbol(symbols::line::THICK_HORIZONTAL).set_style(style);
            }
        }
    }
}
