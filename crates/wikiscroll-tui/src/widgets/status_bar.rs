use chrono::Local;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            let mut text = format!(
                " {}/{} | Articles: {} | Batches: {}",
                app.current_panel_index() + 1,
                app.panel_count(),
                app.feed.len(),
                app.feed.batches_resolved()
            );
            if let Some(at) = app.feed.last_batch_at() {
                text.push_str(&format!(
                    " | Updated {}",
                    at.with_timezone(&Local).format("%H:%M:%S")
                ));
            }
            if app.feed.is_loading_more() {
                text.push_str(" | Loading...");
            }
            text
        };

        let help_hint = " j/k:scroll space:next ⏎:open q:quit ";
        let padding_len = usize::from(area.width)
            .saturating_sub(status_text.width() + help_hint.width());

        let base = Style::default().bg(app.theme.status_bg);
        let line = Line::from(vec![
            Span::styled(status_text, base.fg(app.theme.status_fg)),
            Span::styled(" ".repeat(padding_len), base),
            Span::styled(help_hint, base.fg(app.theme.muted)),
        ]);

        frame.render_widget(Paragraph::new(line).style(base), area);
    }
}
