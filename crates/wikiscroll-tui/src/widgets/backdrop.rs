use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::images::Raster;

/// Full-panel background: a halfblock raster darkened for legibility, or a
/// flat fill when no image is ready
pub struct Backdrop<'a> {
    raster: Option<&'a Raster>,
    dim: f32,
    fill: Color,
}

impl<'a> Backdrop<'a> {
    pub fn new(raster: Option<&'a Raster>, fill: Color) -> Self {
        Self {
            raster,
            dim: 0.0,
            fill,
        }
    }

    /// Darken the image by `amount` (0.0 keeps it, 1.0 turns it black)
    pub fn dim(mut self, amount: f32) -> Self {
        self.dim = amount.clamp(0.0, 1.0);
        self
    }
}

impl Widget for Backdrop<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };
                match self.raster.and_then(|r| r.cell(col, row)) {
                    Some((top, bottom)) => {
                        cell.set_char('▀')
                            .set_fg(darken(top, self.dim))
                            .set_bg(darken(bottom, self.dim));
                    }
                    None => {
                        cell.set_char(' ').set_bg(self.fill);
                    }
                }
            }
        }
    }
}

/// Scale an RGB color towards black; other colors pass through
pub fn darken(color: Color, amount: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let keep = 1.0 - amount.clamp(0.0, 1.0);
            let scale = |c: u8| (f32::from(c) * keep).round() as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        other => other,
    }
}
