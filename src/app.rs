use std::collections::HashMap;

use crossterm::event::KeyEvent;
use tokio::sync::mpsc;

use crate::config::{self, Action, AnchorPreference, Config};
use crate::event::{self, AppEvent, LayoutRequest};
use crate::geometry::Direction;
use crate::layout::{LayoutError, PaneId, WorkspaceId};
use crate::manager::LayoutManager;
use crate::session::{self, SavedState};
use crate::tui::Tui;
use crate::ui;

/// Ratio step for one resize keypress.
const RESIZE_STEP: f64 = 0.05;

/// The single owner of all layout state. Every mutation — keypresses and
/// asynchronous pane-exit notifications alike — arrives through one event
/// channel and is applied here, fully, before the next is admitted.
pub struct App {
    pub should_quit: bool,
    pub manager: LayoutManager,
    pub active_workspace: WorkspaceId,
    pub pane_titles: HashMap<PaneId, String>,
    /// Last engine failure or notice, shown on the status line.
    pub status: Option<String>,
    pub config: Config,
    /// Previously focused pane per workspace, for swap-with-last.
    last_focus: HashMap<WorkspaceId, PaneId>,
    next_pane_number: u64,
}

impl App {
    pub fn new(config: Config) -> Self {
        let manager = LayoutManager::new(config.behavior.gap, config.behavior.refocus);
        let mut app = Self {
            should_quit: false,
            manager,
            active_workspace: 1,
            pane_titles: HashMap::new(),
            status: None,
            last_focus: HashMap::new(),
            next_pane_number: 1,
            config,
        };
        app.manager.set_mode(1, app.config.behavior.default_mode);
        app.apply_request(1, LayoutRequest::Insert);
        app
    }

    fn from_saved(state: &SavedState, config: Config) -> Result<Self, LayoutError> {
        let manager = state.restore(config.behavior.gap, config.behavior.refocus)?;
        let mut app = Self {
            should_quit: false,
            manager,
            active_workspace: state.active_workspace,
            pane_titles: state.pane_titles.clone(),
            status: None,
            last_focus: HashMap::new(),
            next_pane_number: state.pane_titles.len() as u64 + 1,
            config,
        };
        if app.manager.workspace_ids().is_empty() {
            app.active_workspace = 1;
            app.apply_request(1, LayoutRequest::Insert);
        }
        Ok(app)
    }

    pub fn run(config: Config) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(Self::run_async(config))
    }

    async fn run_async(config: Config) -> anyhow::Result<()> {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        event::start_event_loop(event_tx);

        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut app = match session::store::load() {
            Some(state) => Self::from_saved(&state, config.clone())
                .unwrap_or_else(|_| Self::new(config)),
            None => Self::new(config),
        };

        loop {
            tui.draw(|frame| ui::render(&mut app, frame))?;

            if let Some(event) = event_rx.recv().await {
                app.handle_event(event);
            }

            if app.should_quit {
                let state =
                    SavedState::capture(&app.manager, app.active_workspace, &app.pane_titles);
                let _ = session::store::save(&state);
                break;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            // The next draw pulls fresh geometry; nothing to mutate here.
            AppEvent::Resize(_, _) | AppEvent::Tick => {}
            AppEvent::PaneExited { pane_id } => {
                if let Some(ws) = self.manager.find_pane(pane_id) {
                    self.apply_request(ws, LayoutRequest::Remove(pane_id));
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let key = config::normalize_key(key);
        let Some(action) = self.config.keys.lookup(&key).cloned() else {
            return;
        };
        self.status = None;
        self.handle_action(action);
    }

    fn handle_action(&mut self, action: Action) {
        let ws = self.active_workspace;
        match action {
            Action::Quit => self.should_quit = true,
            Action::NewPane => self.apply_request(ws, LayoutRequest::Insert),
            Action::ClosePane => {
                if let Some(active) = self.manager.active_pane(ws) {
                    self.apply_request(ws, LayoutRequest::Remove(active));
                }
            }
            Action::FocusLeft => self.apply_request(ws, LayoutRequest::Navigate(Direction::Left)),
            Action::FocusDown => self.apply_request(ws, LayoutRequest::Navigate(Direction::Down)),
            Action::FocusUp => self.apply_request(ws, LayoutRequest::Navigate(Direction::Up)),
            Action::FocusRight => self.apply_request(ws, LayoutRequest::Navigate(Direction::Right)),
            Action::ResizeGrow => {
                if let Some(active) = self.manager.active_pane(ws) {
                    self.apply_request(ws, LayoutRequest::Resize(active, RESIZE_STEP));
                }
            }
            Action::ResizeShrink => {
                if let Some(active) = self.manager.active_pane(ws) {
                    self.apply_request(ws, LayoutRequest::Resize(active, -RESIZE_STEP));
                }
            }
            Action::Equalize => self.apply_request(ws, LayoutRequest::Equalize),
            Action::SwapWithLast => {
                if let (Some(active), Some(&last)) =
                    (self.manager.active_pane(ws), self.last_focus.get(&ws))
                {
                    if active != last {
                        self.apply_request(ws, LayoutRequest::Swap(active, last));
                    }
                }
            }
            Action::ModeTiled => {
                self.apply_request(ws, LayoutRequest::SetMode(crate::layout::DisplayMode::Tiled))
            }
            Action::ModeStacked => self.apply_request(
                ws,
                LayoutRequest::SetMode(crate::layout::DisplayMode::Stacked),
            ),
            Action::ModeTabbed => self.apply_request(
                ws,
                LayoutRequest::SetMode(crate::layout::DisplayMode::Tabbed),
            ),
            Action::NextPane => self.apply_request(ws, LayoutRequest::CycleActive { forward: true }),
            Action::PrevPane => {
                self.apply_request(ws, LayoutRequest::CycleActive { forward: false })
            }
            Action::SwitchWorkspace(n) => {
                self.active_workspace = n;
            }
        }
    }

    /// Route one layout request to the manager. Failures become status-line
    /// notices; the layout is left exactly as it was.
    pub fn apply_request(&mut self, ws: WorkspaceId, request: LayoutRequest) {
        if let Err(err) = self.dispatch(ws, request) {
            self.status = Some(err.to_string());
        }
    }

    fn dispatch(&mut self, ws: WorkspaceId, request: LayoutRequest) -> Result<(), LayoutError> {
        match request {
            LayoutRequest::Insert => {
                let pane = PaneId::new_v4();
                let anchor = match self.config.behavior.anchor {
                    AnchorPreference::Focused => self.manager.active_pane(ws),
                    AnchorPreference::LastInserted => None,
                };
                let previous = self.manager.active_pane(ws);
                self.manager.insert_pane(ws, pane, anchor)?;
                self.pane_titles
                    .insert(pane, format!("pane {}", self.next_pane_number));
                self.next_pane_number += 1;
                if let Some(prev) = previous {
                    self.last_focus.insert(ws, prev);
                }
                Ok(())
            }
            LayoutRequest::Remove(pane) => {
                self.manager.remove_pane(ws, pane)?;
                self.pane_titles.remove(&pane);
                if self.last_focus.get(&ws) == Some(&pane) {
                    self.last_focus.remove(&ws);
                }
                Ok(())
            }
            LayoutRequest::Navigate(direction) => {
                let previous = self.manager.active_pane(ws);
                match self.manager.navigate(ws, direction)? {
                    Some(_) => {
                        if let Some(prev) = previous {
                            self.last_focus.insert(ws, prev);
                        }
                    }
                    None => self.status = Some("no pane in that direction".to_string()),
                }
                Ok(())
            }
            LayoutRequest::Resize(pane, delta) => self.manager.adjust_ratio(ws, pane, delta),
            LayoutRequest::SetMode(mode) => {
                self.manager.set_mode(ws, mode);
                Ok(())
            }
            LayoutRequest::Equalize => self.manager.equalize(ws),
            LayoutRequest::Swap(a, b) => self.manager.swap(ws, a, b),
            LayoutRequest::CycleActive { forward } => self.manager.cycle_active(ws, forward),
        }
    }
}
