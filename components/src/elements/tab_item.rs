// Tab Item
// A single selectable label inside the category tab bar

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::{Bounds, CellRect, EdgeInsets, Size};

/// Text font for tab labels
///
/// Terminal cells have a fixed size, so a "font" is the set of text modifiers plus
/// optional letter spacing (blank cells inserted between characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabFont {
    pub modifier: Modifier,
    pub letter_spacing: u16,
}

impl TabFont {
    pub fn new(modifier: Modifier) -> Self {
        Self { modifier, letter_spacing: 0 }
    }

    pub fn with_letter_spacing(mut self, spacing: u16) -> Self {
        self.letter_spacing = spacing;
        self
    }

    /// Text as it is laid out with this font
    pub fn layout_text(&self, text: &str) -> String {
        if self.letter_spacing == 0 {
            return text.to_string();
        }
        let gap = " ".repeat(self.letter_spacing as usize);
        text.chars()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(&gap)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabItem {
    text: String,
    edge_inset: EdgeInsets,
    text_color: Color,
    selected_text_color: Color,
    font: TabFont,
    is_selected: bool,
    frame: Bounds,
    appearance: Style,
}

impl TabItem {
    pub fn new(text: impl Into<String>) -> Self {
        let mut item = Self {
            text: text.into(),
            edge_inset: EdgeInsets::ZERO,
            text_color: Color::Gray,
            selected_text_color: Color::White,
            font: TabFont::default(),
            is_selected: false,
            frame: Bounds::ZERO,
            appearance: Style::default(),
        };
        item.update_appearance();
        item
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.update_appearance();
    }

    pub fn edge_inset(&self) -> EdgeInsets {
        self.edge_inset
    }

    pub fn set_edge_inset(&mut self, inset: EdgeInsets) {
        self.edge_inset = inset;
        self.update_appearance();
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
        self.update_appearance();
    }

    pub fn selected_text_color(&self) -> Color {
        self.selected_text_color
    }

    pub fn set_selected_text_color(&mut self, color: Color) {
        self.selected_text_color = color;
        self.update_appearance();
    }

    pub fn font(&self) -> TabFont {
        self.font
    }

    pub fn set_font(&mut self, font: TabFont) {
        self.font = font;
        self.update_appearance();
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.is_selected = selected;
        self.update_appearance();
    }

    pub fn frame(&self) -> Bounds {
        self.frame
    }

    pub fn set_frame(&mut self, frame: Bounds) {
        self.frame = frame;
    }

    /// Style the label is currently drawn with
    pub fn appearance(&self) -> Style {
        self.appearance
    }

    fn update_appearance(&mut self) {
        let color = if self.is_selected {
            self.selected_text_color
        } else {
            self.text_color
        };
        self.appearance = Style::default().fg(color).add_modifier(self.font.modifier);
    }

    /// Natural label size plus edge insets
    pub fn preferred_size(&self) -> Size {
        let label = self.font.layout_text(&self.text);
        let label_width = UnicodeWidthStr::width(label.as_str()) as f64;
        Size::new(
            label_width + self.edge_inset.horizontal(),
            1.0 + self.edge_inset.vertical(),
        )
    }

    pub fn fit_to_preferred_size(&mut self) {
        let size = self.preferred_size();
        self.frame.width = size.width;
        self.frame.height = size.height;
    }

    /// Draw the label centered in `area`, which is the item's frame in cells
    pub(crate) fn render_label(&self, area: CellRect, clip: Rect, buf: &mut Buffer) {
        let label = self.font.layout_text(&self.text);
        let label_width = UnicodeWidthStr::width(label.as_str()) as i32;
        let x = area.x + (area.width - label_width) / 2;
        let y = area.y + (area.height - 1).max(0) / 2;
        if y < clip.y as i32 || y >= clip.bottom() as i32 {
            return;
        }

        let mut column = x;
        let mut scratch = [0u8; 4];
        for ch in label.chars() {
            let width = UnicodeWidthChar::width(ch).unwrap_or(0).max(1) as i32;
            if column >= clip.x as i32 && column + width <= clip.right() as i32 {
                if let Some(cell) = buf.cell_mut((column as u16, y as u16)) {
                    cell.set_symbol(ch.encode_utf8(&mut scratch)).set_style(self.appearance);
                }
            }
            column += width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_size_includes_insets() {
        let mut item = TabItem::new("Item AAA");
        assert_eq!(item.preferred_size(), Size::new(8.0, 1.0));

        item.set_edge_inset(EdgeInsets::new(1.0, 2.0, 1.0, 3.0));
        assert_eq!(item.preferred_size(), Size::new(13.0, 3.0));
    }

    #[test]
    fn test_letter_spacing_widens_label() {
        let mut item = TabItem::new("FF23");
        item.set_font(TabFont::new(Modifier::BOLD).with_letter_spacing(1));
        assert_eq!(item.preferred_size().width, 7.0);
        assert!(item.appearance().add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_wide_characters_measure_by_display_width() {
        let item = TabItem::new("家瑋");
        assert_eq!(item.preferred_size().width, 4.0);
    }

    #[test]
    fn test_selection_switches_color() {
        let mut item = TabItem::new("C1");
        item.set_text_color(Color::Green);
        item.set_selected_text_color(Color::Yellow);
        assert_eq!(item.appearance().fg, Some(Color::Green));

        item.set_selected(true);
        assert_eq!(item.appearance().fg, Some(Color::Yellow));
        item.set_selected(false);
        assert_eq!(item.appearance().fg, Some(Color::Green));
    }

    #[test]
    fn test_fit_to_preferred_size_keeps_origin() {
        let mut item = TabItem::new("DDDD");
        item.set_frame(Bounds::new(5.0, 1.0, 0.0, 0.0));
        item.fit_to_preferred_size();
        assert_eq!(item.frame(), Bounds::new(5.0, 1.0, 4.0, 1.0));
    }

    #[test]
    fn test_render_label_is_centered_and_clipped() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 1));
        let item = TabItem::new("abcd");
        let area = CellRect { x: 0, y: 0, width: 8, height: 1 };
        item.render_label(area, Rect::new(0, 0, 5, 1), &mut buf);
        assert_eq!(buf[(2, 0)].symbol(), "a");
        assert_eq!(buf[(4, 0)].symbol(), "c");
        assert_eq!(buf[(5, 0)].symbol(), " ");
    }
}
