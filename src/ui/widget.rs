//! egui rendering of the navigation control and legends

use crate::{
    layers::style::LegendEntry,
    traits::ControlPosition,
    ui::controls::{NavButton, NavigationControl},
};
use egui::{Align2, Color32, FontId, Rect, Sense, Stroke, Ui, Vec2};

const BUTTON_SIZE: f32 = 30.0;
const BUTTON_GAP: f32 = 5.0;
const MARGIN: f32 = 10.0;

/// Draws the control's visible buttons in its corner of `rect`; returns the clicked button
pub fn show_navigation(ui: &mut Ui, rect: Rect, control: &NavigationControl) -> Option<NavButton> {
    let position = control.config().position;
    let mut clicked = None;

    for (i, button) in control.root().children.iter().enumerate() {
        let offset = MARGIN + i as f32 * (BUTTON_SIZE + BUTTON_GAP);
        let min = match position {
            ControlPosition::TopLeft => rect.left_top() + Vec2::new(MARGIN, offset),
            ControlPosition::TopRight => {
                rect.right_top() + Vec2::new(-MARGIN - BUTTON_SIZE, offset)
            }
            ControlPosition::BottomLeft => {
                rect.left_bottom() + Vec2::new(MARGIN, -offset - BUTTON_SIZE)
            }
            ControlPosition::BottomRight => {
                rect.right_bottom() + Vec2::new(-MARGIN - BUTTON_SIZE, -offset - BUTTON_SIZE)
            }
        };
        let button_rect = Rect::from_min_size(min, Vec2::splat(BUTTON_SIZE));

        let response = ui.allocate_rect(button_rect, Sense::click());
        let fill = if response.hovered() {
            Color32::from_rgba_unmultiplied(240, 240, 240, 240)
        } else {
            Color32::from_rgba_unmultiplied(255, 255, 255, 220)
        };

        ui.painter().rect_filled(button_rect, 3.0, fill);
        ui.painter()
            .rect_stroke(button_rect, 3.0, Stroke::new(1.0, Color32::from_gray(100)));
        ui.painter().text(
            button_rect.center(),
            Align2::CENTER_CENTER,
            button.label(),
            FontId::proportional(16.0),
            Color32::BLACK,
        );

        if response.clicked() {
            clicked = Some(*button);
        }
    }

    clicked
}

/// Draws legend swatches stacked at the bottom-right of `rect`
pub fn show_legend(ui: &mut Ui, rect: Rect, title: &str, entries: &[LegendEntry]) {
    let row_height = 18.0;
    let height = row_height * (entries.len() as f32 + 1.0) + MARGIN;
    let panel = Rect::from_min_size(
        rect.right_bottom() + Vec2::new(-150.0 - MARGIN, -height - MARGIN),
        Vec2::new(150.0, height),
    );
    ui.painter()
        .rect_filled(panel, 3.0, Color32::from_rgba_unmultiplied(255, 255, 255, 220));
    ui.painter().text(
        panel.left_top() + Vec2::new(6.0, 4.0),
        Align2::LEFT_TOP,
        title,
        FontId::proportional(12.0),
        Color32::BLACK,
    );

    for (i, entry) in entries.iter().enumerate() {
        let top = panel.top() + row_height * (i as f32 + 1.0) + 4.0;
        let swatch = Rect::from_min_size(egui::pos2(panel.left() + 6.0, top), Vec2::splat(12.0));
        let color = entry
            .output
            .as_str()
            .and_then(parse_color)
            .unwrap_or(Color32::GRAY);
        ui.painter().rect_filled(swatch, 2.0, color);
        ui.painter().text(
            egui::pos2(swatch.right() + 6.0, top),
            Align2::LEFT_TOP,
            &entry.label,
            FontId::proportional(11.0),
            Color32::from_gray(40),
        );
    }
}

/// `#rrggbb` or a handful of CSS names
pub fn parse_color(color: &str) -> Option<Color32> {
    match color {
        "red" => return Some(Color32::RED),
        "pink" => return Some(Color32::from_rgb(255, 192, 203)),
        "blue" => return Some(Color32::BLUE),
        "green" => return Some(Color32::GREEN),
        "cyan" => return Some(Color32::from_rgb(0, 255, 255)),
        "yellow" => return Some(Color32::YELLOW),
        "purple" => return Some(Color32::from_rgb(128, 0, 128)),
        _ => {}
    }
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_legend_colors() {
        assert_eq!(parse_color("#51bbd6"), Some(Color32::from_rgb(0x51, 0xbb, 0xd6)));
        assert_eq!(parse_color("red"), Some(Color32::RED));
        assert_eq!(parse_color("#fff"), None);
    }
}
