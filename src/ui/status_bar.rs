use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let ws = app.active_workspace;
    let theme = &app.config.theme;

    let left = format!(
        " {} · {} panes",
        crate::ui::mode_label(app.manager.mode(ws)),
        app.manager.pane_count(ws),
    );
    frame.render_widget(
        Paragraph::new(left).style(Style::default().fg(theme.dim)),
        area,
    );

    let right = match &app.status {
        Some(message) => message.clone(),
        None => "ctrl+n new · ctrl+x close · ctrl+q quit ".to_string(),
    };
    frame.render_widget(
        Paragraph::new(right)
            .alignment(Alignment::Right)
            .style(Style::default().fg(theme.dim)),
        area,
    );
}
