use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, Frame};

use super::{ArticlePanel, Backdrop, LoadingPanel, WelcomePanel, MORE_MESSAGE};
use crate::app::{App, Panel};

/// The scrolling column of full-height panels
///
/// Each visible panel is drawn into its own buffer at full size, then the
/// rows inside the viewport are copied into the frame. That keeps partially
/// scrolled panels laid out exactly as when they are fully visible.
pub struct FeedView;

impl FeedView {
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        if area.is_empty() {
            return;
        }

        let panel_height = app.panel_height();
        let offset = app.scroll.current();
        let first = offset / panel_height;
        let last = (offset + panel_height - 1) / panel_height;

        for index in first..=last {
            let Some(panel) = app.panel_at(index as usize) else {
                break;
            };

            let panel_area = Rect::new(0, 0, area.width, panel_height as u16);
            let mut scratch = Buffer::empty(panel_area);
            render_panel(app, panel, panel_area, &mut scratch);

            let top = i64::from(index) * i64::from(panel_height) - i64::from(offset);
            blit(&scratch, frame.buffer_mut(), area, top);
        }
    }
}

fn render_panel(app: &mut App, panel: Panel, area: Rect, buf: &mut Buffer) {
    let bounce = app.bounce();

    match panel {
        Panel::Welcome => {
            let raster = app.backdrop_raster(panel, area.width, area.height);
            Backdrop::new(raster.as_deref(), app.theme.background)
                .dim(app.config.ui.overlay_strength)
                .render(area, buf);
            WelcomePanel::new(&app.theme, bounce).render(area, buf);
        }
        Panel::Article(index) => {
            let raster = app.backdrop_raster(panel, area.width, area.height);
            Backdrop::new(raster.as_deref(), app.theme.background)
                .dim(app.config.ui.overlay_strength)
                .render(area, buf);
            if let Some(article) = app.feed.articles().get(index) {
                ArticlePanel::new(article, &app.theme)
                    .bounce(bounce)
                    .open_hint(app.open_hint())
                    .render(area, buf);
            }
        }
        Panel::LoadingMore => {
            LoadingPanel::new(&app.theme, MORE_MESSAGE, app.tick_count).render(area, buf);
        }
    }
}

/// Copy `src` into `area` of `dst`, with `src` row 0 landing `top` rows below
/// the top of `area`; rows outside `area` are dropped
fn blit(src: &Buffer, dst: &mut Buffer, area: Rect, top: i64) {
    for row in 0..src.area.height {
        let y = top + i64::from(row);
        if y < 0 || y >= i64::from(area.height) {
            continue;
        }
        for col in 0..src.area.width.min(area.width) {
            if let (Some(from), Some(to)) = (
                src.cell((col, row)),
                dst.cell_mut((area.x + col, area.y + y as u16)),
            ) {
                *to = from.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_blit_clips_partial_panel() {
        let mut src = Buffer::empty(Rect::new(0, 0, 2, 4));
        for row in 0..4u16 {
            src[(0, row)].set_char(char::from(b'a' + row as u8)).set_bg(Color::Red);
        }

        let area = Rect::new(0, 1, 2, 3);
        let mut dst = Buffer::empty(Rect::new(0, 0, 2, 4));

        // Panel scrolled two rows past the top of the viewport
        blit(&src, &mut dst, area, -2);
        assert_eq!(dst[(0, 1)].symbol(), "c");
        assert_eq!(dst[(0, 2)].symbol(), "d");
        assert_eq!(dst[(0, 3)].symbol(), " ");
        assert_eq!(dst[(0, 0)].symbol(), " ");
    }
}
