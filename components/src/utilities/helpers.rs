// Helper utilities for TUI components
use std::str::FromStr;

use ratatui::{buffer::Buffer, layout::Rect, style::Color};

use crate::managers::ConfigError;

/// Parse a color name ("red", "lightblue"), "#RRGGBB" or an indexed color ("42")
pub fn parse_color(field: &'static str, value: &str) -> Result<Color, ConfigError> {
    Color::from_str(value.trim()).map_err(|_| ConfigError::InvalidColor {
        field,
        value: value.to_string(),
    })
}

/// Copy `target.width` x `target.height` cells from `source` (starting at `source_origin`) into `dest`
pub fn blit(source: &Buffer, source_origin: (u16, u16), target: Rect, dest: &mut Buffer) {
    let (source_x, source_y) = source_origin;
    for dy in 0..target.height {
        for dx in 0..target.width {
            let Some(cell) = source.cell((source_x + dx, source_y + dy)) else {
                continue;
            };
            if let Some(slot) = dest.cell_mut((target.x + dx, target.y + dy)) {
                *slot = cell.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_accepts_names_hex_and_indices() {
        assert_eq!(parse_color("text_color", "red"), Ok(Color::Red));
        assert_eq!(parse_color("text_color", " LightBlue "), Ok(Color::LightBlue));
        assert_eq!(parse_color("text_color", "#ff8000"), Ok(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_color("text_color", "42"), Ok(Color::Indexed(42)));
    }

    #[test]
    fn test_parse_color_reports_field() {
        let err = parse_color("indicator_color", "not-a-color").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidColor {
                field: "indicator_color",
                value: "not-a-color".to_string()
            }
        );
        assert_eq!(err.to_string(), "invalid color 'not-a-color' for 'indicator_color'");
    }

    #[test]
    fn test_blit_copies_clipped_region() {
        let mut source = Buffer::empty(Rect::new(0, 0, 4, 1));
        for (x, symbol) in ["w", "x", "y", "z"].iter().enumerate() {
            source[(x as u16, 0)].set_symbol(symbol);
        }
        let mut dest = Buffer::empty(Rect::new(0, 0, 6, 1));
        blit(&source, (2, 0), Rect::new(4, 0, 4, 1), &mut dest);

        assert_eq!(dest[(4, 0)].symbol(), "y");
        assert_eq!(dest[(5, 0)].symbol(), "z");
        assert_eq!(dest[(3, 0)].symbol(), " ");
    }
}
