pub mod pane_view;
pub mod status_bar;
pub mod tab_strip;
pub mod workspace_bar;

use ratatui::layout::{Constraint, Layout};
use ratatui::Frame;

use crate::app::App;
use crate::layout::DisplayMode;

pub fn render(app: &mut App, frame: &mut Frame) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    workspace_bar::render(app, frame, header);

    let ws = app.active_workspace;
    let mode = app.manager.mode(ws);
    let body = if mode != DisplayMode::Tiled && app.manager.pane_count(ws) > 0 {
        let [strip, rest] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(body);
        tab_strip::render(app, frame, strip);
        rest
    } else {
        body
    };

    pane_view::render(app, frame, body);
    status_bar::render(app, frame, footer);
}

pub fn mode_label(mode: DisplayMode) -> &'static str {
    match mode {
        DisplayMode::Tiled => "tiled",
        DisplayMode::Stacked => "stacked",
        DisplayMode::Tabbed => "tabbed",
    }
}
