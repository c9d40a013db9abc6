use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let theme = &app.config.theme;
    let mut ids = app.manager.workspace_ids();
    // The current workspace may be empty and therefore not created yet.
    if !ids.contains(&app.active_workspace) {
        ids.push(app.active_workspace);
        ids.sort_unstable();
    }

    let mut spans = vec![Span::styled(
        " trellis ",
        Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
    )];
    for ws in ids {
        let count = app.manager.pane_count(ws);
        let style = if ws == app.active_workspace {
            Style::default()
                .fg(theme.bar_active)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.bar_inactive)
        };
        spans.push(Span::styled(format!(" {}:{} ", ws, count), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
