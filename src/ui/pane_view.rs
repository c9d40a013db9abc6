use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, BorderType, Borders},
    Frame,
};

use crate::app::App;

/// Draw a frame for every pane the manager says is visible. Panes absent
/// from the map are not drawn at all; their content stays hidden.
pub fn render(app: &mut App, frame: &mut Frame, area: Rect) {
    let ws = app.active_workspace;
    let visible = app.manager.compute_visible(ws, area);
    let active = app.manager.active_pane(ws);

    let mut panes: Vec<(crate::layout::PaneId, Rect)> = visible.into_iter().collect();
    panes.sort_by_key(|(_, r)| (r.y, r.x));

    for (id, rect) in panes {
        if rect.width == 0 || rect.height == 0 {
            continue;
        }
        let border = if active == Some(id) {
            app.config.theme.border_active
        } else {
            app.config.theme.border_inactive
        };
        let title = app
            .pane_titles
            .get(&id)
            .cloned()
            .unwrap_or_else(|| "pane".to_string());
        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border));
        frame.render_widget(block, rect);
    }
}
