mod article_panel;
mod backdrop;
mod feed;
mod loading;
mod status_bar;
mod welcome;

pub use article_panel::{ArticlePanel, READ_BUTTON};
pub use backdrop::{darken, Backdrop};
pub use feed::FeedView;
pub use loading::{LoadingPanel, INITIAL_MESSAGE, MORE_MESSAGE};
pub use status_bar::StatusBarWidget;
pub use welcome::WelcomePanel;

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
};

use crate::theme::Theme;

/// Vertically centered strip of `height` rows
pub(crate) fn centered_rows(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}

/// Horizontally centered strip at most `width` columns wide
pub(crate) fn centered_columns(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Two-row scroll hint; `bounce` drops the arrow by one row
pub(crate) fn chevron(theme: &Theme, bounce: bool) -> Vec<Line<'static>> {
    let arrow = Line::from(Span::styled("⌄", Style::default().fg(theme.accent)));
    if bounce {
        vec![Line::default(), arrow]
    } else {
        vec![arrow, Line::default()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centering() {
        let area = Rect::new(2, 4, 20, 10);
        assert_eq!(centered_rows(area, 4), Rect::new(2, 7, 20, 4));
        assert_eq!(centered_rows(area, 40), area);
        assert_eq!(centered_columns(area, 10), Rect::new(7, 4, 10, 10));
        assert_eq!(centered_columns(area, 0), Rect::new(12, 4, 0, 10));
    }
}
