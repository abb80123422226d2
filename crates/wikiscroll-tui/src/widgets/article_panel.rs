use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;
use wikiscroll_core::ArticleSummary;

use super::{centered_columns, chevron};
use crate::theme::Theme;

/// Widest the title and extract are allowed to grow
const CONTENT_MAX_WIDTH: u16 = 76;
const SEARCH_PLACEHOLDER: &str = " 🔍 Search Wikipedia... ";
pub const READ_BUTTON: &str = "Read full article";

/// One article filling a whole panel
pub struct ArticlePanel<'a> {
    article: &'a ArticleSummary,
    theme: &'a Theme,
    bounce: bool,
    open_hint: &'a str,
}

impl<'a> ArticlePanel<'a> {
    pub fn new(article: &'a ArticleSummary, theme: &'a Theme) -> Self {
        Self {
            article,
            theme,
            bounce: false,
            open_hint: "⏎",
        }
    }

    pub fn bounce(mut self, bounce: bool) -> Self {
        self.bounce = bounce;
        self
    }

    /// Key shown on the "Read full article" button
    pub fn open_hint(mut self, hint: &'a str) -> Self {
        self.open_hint = hint;
        self
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let brand = Line::from(vec![
            Span::styled("🌐 ", Style::default().fg(self.theme.accent)),
            Span::styled(
                "WikiScroll",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(brand).render(area, buf);

        // Search is not wired up; draw it disabled so the layout matches
        let search_width = SEARCH_PLACEHOLDER.width() as u16;
        if area.width >= search_width + 16 {
            let search_area = Rect {
                x: area.right() - search_width,
                width: search_width,
                ..area
            };
            Paragraph::new(Span::styled(
                SEARCH_PLACEHOLDER,
                Style::default()
                    .fg(self.theme.disabled)
                    .add_modifier(Modifier::DIM | Modifier::UNDERLINED),
            ))
            .render(search_area, buf);
        }
    }
}

impl Widget for ArticlePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = area.inner(Margin::new(2, 1));
        let content_width = inner.width.min(CONTENT_MAX_WIDTH).max(1);

        let title_rows = (self.article.title().width() as u16)
            .div_ceil(content_width)
            .clamp(1, 3);

        let [header, _, icon, title, _, extract, _, button, _, chevron_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(title_rows),
            Constraint::Length(1),
            Constraint::Max(16),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .areas(inner);

        self.render_header(header, buf);

        Paragraph::new(Span::styled("📖", Style::default().fg(self.theme.accent)))
            .alignment(Alignment::Center)
            .render(icon, buf);

        Paragraph::new(Span::styled(
            self.article.title(),
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(centered_columns(title, content_width), buf);

        if extract.height >= 3 {
            let extract_block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(self.theme.muted))
                .padding(Padding::horizontal(1))
                .style(Style::default().bg(self.theme.background));
            Paragraph::new(self.article.extract())
                .style(Style::default().fg(self.theme.foreground))
                .wrap(Wrap { trim: true })
                .block(extract_block)
                .render(centered_columns(extract, content_width), buf);
        }

        let label = format!(" {}  {} ", READ_BUTTON, self.open_hint);
        Paragraph::new(Span::styled(
            label,
            Style::default()
                .fg(self.theme.background)
                .bg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(button, buf);

        Paragraph::new(chevron(self.theme, self.bounce))
            .alignment(Alignment::Center)
            .render(chevron_area, buf);
    }
}
