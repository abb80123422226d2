use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::{Paragraph, Widget},
};

use super::centered_rows;
use crate::theme::Theme;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub const INITIAL_MESSAGE: &str = "Loading articles...";
pub const MORE_MESSAGE: &str = "Loading more articles...";

/// Plain panel with a centered spinner and message
pub struct LoadingPanel<'a> {
    theme: &'a Theme,
    message: &'a str,
    frame: u64,
}

impl<'a> LoadingPanel<'a> {
    pub fn new(theme: &'a Theme, message: &'a str, frame: u64) -> Self {
        Self {
            theme,
            message,
            frame,
        }
    }
}

impl Widget for LoadingPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.theme.background));

        let spinner = SPINNER[(self.frame % SPINNER.len() as u64) as usize];
        let line = Line::styled(
            format!("{} {}", spinner, self.message),
            Style::default().fg(self.theme.foreground),
        );
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(centered_rows(area, 1), buf);
    }
}
