use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::{centered_rows, chevron};
use crate::theme::Theme;

/// First panel of the feed, shown above the articles
pub struct WelcomePanel<'a> {
    theme: &'a Theme,
    bounce: bool,
}

impl<'a> WelcomePanel<'a> {
    pub fn new(theme: &'a Theme, bounce: bool) -> Self {
        Self { theme, bounce }
    }
}

impl Widget for WelcomePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let accent = Style::default().fg(self.theme.accent);
        let mut lines = vec![
            Line::from(Span::styled("🌐", accent)),
            Line::default(),
            Line::from(Span::styled(
                "WikiScroll",
                accent.add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                "Fuel Your Curiosity",
                Style::default().fg(self.theme.foreground),
            )),
            Line::default(),
            Line::from(Span::styled(
                "Scroll down to explore random Wikipedia articles",
                Style::default().fg(self.theme.muted),
            )),
            Line::default(),
        ];
        lines.extend(chevron(self.theme, self.bounce));

        let text_area = centered_rows(area, lines.len() as u16);
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(text_area, buf);
    }
}
