use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

const MAX_TAB_WIDTH: usize = 16;

/// One tab per pane in stacked order; only the active one is on screen.
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let ws = app.active_workspace;
    let Some(state) = app.manager.workspace(ws) else {
        return;
    };
    let theme = &app.config.theme;

    let mut spans = vec![Span::styled(
        format!(" [{}] ", crate::ui::mode_label(state.mode)),
        Style::default().fg(theme.dim),
    )];
    for pane in &state.stacked_order {
        let title = app
            .pane_titles
            .get(pane)
            .map(String::as_str)
            .unwrap_or("pane");
        let label = truncate(title, MAX_TAB_WIDTH);
        let style = if state.active_pane == Some(*pane) {
            Style::default()
                .fg(theme.bar_active)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.bar_inactive)
        };
        spans.push(Span::styled(format!(" {} ", label), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for ch in s.chars() {
        if out.width() + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}
