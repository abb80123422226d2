use ratatui::{
    layout::{Constraint, Layout},
    Frame,
};

use crate::app::{App, STATUS_BAR_HEIGHT};
use crate::widgets::{FeedView, LoadingPanel, StatusBarWidget, INITIAL_MESSAGE};

/// Draw one frame
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    if app.feed.is_initial_loading() {
        frame.render_widget(
            LoadingPanel::new(&app.theme, INITIAL_MESSAGE, app.tick_count),
            area,
        );
        return;
    }

    let [feed_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(STATUS_BAR_HEIGHT)]).areas(area);

    FeedView::render(frame, feed_area, app);
    StatusBarWidget::render(frame, status_area, app);
}
