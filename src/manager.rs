use std::collections::{HashMap, HashSet};

use ratatui::layout::Rect;

use crate::geometry::Direction;
use crate::layout::{DisplayMode, LayoutError, LayoutNode, LayoutTree, PaneId, WorkspaceId};

/// Which pane takes focus after the active pane is removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RefocusPolicy {
    /// The pane now occupying the removed pane's position in the stacked
    /// order, clamped to the new length.
    #[default]
    StableIndex,
    /// The most recently added pane.
    MostRecent,
}

/// Everything the manager tracks for one workspace.
pub struct WorkspaceLayout {
    pub tree: LayoutTree,
    pub mode: DisplayMode,
    pub active_pane: Option<PaneId>,
    /// Panes in the order they were added; drives stacked/tabbed cycling.
    pub stacked_order: Vec<PaneId>,
    last_bounds: Option<Rect>,
}

impl WorkspaceLayout {
    fn new(gap: u16) -> Self {
        Self {
            tree: LayoutTree::new(gap),
            mode: DisplayMode::Tiled,
            active_pane: None,
            stacked_order: Vec::new(),
            last_bounds: None,
        }
    }
}

/// Owns the layout state of every workspace and is the single entry point
/// for pane lifecycle, navigation and geometry queries. Workspaces come
/// into existence the first time they are referenced; they are never
/// destroyed here.
pub struct LayoutManager {
    workspaces: HashMap<WorkspaceId, WorkspaceLayout>,
    gap: u16,
    refocus: RefocusPolicy,
}

/// Geometry used for navigation before the first frame has been drawn.
fn default_bounds() -> Rect {
    Rect::new(0, 0, 80, 24)
}

impl LayoutManager {
    pub fn new(gap: u16, refocus: RefocusPolicy) -> Self {
        Self {
            workspaces: HashMap::new(),
            gap,
            refocus,
        }
    }

    fn entry(&mut self, ws: WorkspaceId) -> &mut WorkspaceLayout {
        let gap = self.gap;
        self.workspaces
            .entry(ws)
            .or_insert_with(|| WorkspaceLayout::new(gap))
    }

    pub fn workspace(&self, ws: WorkspaceId) -> Option<&WorkspaceLayout> {
        self.workspaces.get(&ws)
    }

    /// All workspaces that have been referenced, in id order.
    pub fn workspace_ids(&self) -> Vec<WorkspaceId> {
        let mut ids: Vec<WorkspaceId> = self.workspaces.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn mode(&self, ws: WorkspaceId) -> DisplayMode {
        self.workspaces.get(&ws).map_or_else(DisplayMode::default, |w| w.mode)
    }

    pub fn active_pane(&self, ws: WorkspaceId) -> Option<PaneId> {
        self.workspaces.get(&ws).and_then(|w| w.active_pane)
    }

    pub fn pane_count(&self, ws: WorkspaceId) -> usize {
        self.workspaces.get(&ws).map_or(0, |w| w.tree.pane_count())
    }

    /// Which workspace currently holds `pane`.
    pub fn find_pane(&self, pane: PaneId) -> Option<WorkspaceId> {
        self.workspaces
            .iter()
            .find(|(_, w)| w.tree.contains(pane))
            .map(|(ws, _)| *ws)
    }

    /// Insert `pane`, splitting at `anchor_hint` when given (typically the
    /// workspace's active pane). The new pane becomes active and joins the
    /// end of the stacked order.
    pub fn insert_pane(
        &mut self,
        ws: WorkspaceId,
        pane: PaneId,
        anchor_hint: Option<PaneId>,
    ) -> Result<(), LayoutError> {
        let state = self.entry(ws);
        state.tree.insert_at(anchor_hint, pane)?;
        state.active_pane = Some(pane);
        state.stacked_order.push(pane);
        Ok(())
    }

    /// Remove `pane` from the workspace. When the active pane goes away,
    /// the refocus policy picks its successor from the stacked order.
    pub fn remove_pane(&mut self, ws: WorkspaceId, pane: PaneId) -> Result<(), LayoutError> {
        let refocus = self.refocus;
        let state = self
            .workspaces
            .get_mut(&ws)
            .ok_or(LayoutError::NotFound(pane))?;
        state.tree.remove(pane)?;

        let removed_at = state.stacked_order.iter().position(|p| *p == pane);
        if let Some(idx) = removed_at {
            state.stacked_order.remove(idx);
        }

        if state.active_pane == Some(pane) {
            state.active_pane = if state.stacked_order.is_empty() {
                None
            } else {
                match refocus {
                    RefocusPolicy::StableIndex => {
                        let idx = removed_at
                            .unwrap_or(0)
                            .min(state.stacked_order.len() - 1);
                        Some(state.stacked_order[idx])
                    }
                    RefocusPolicy::MostRecent => state.stacked_order.last().copied(),
                }
            };
        }
        Ok(())
    }

    /// Change the display mode. Metadata only; the tree is untouched.
    pub fn set_mode(&mut self, ws: WorkspaceId, mode: DisplayMode) {
        self.entry(ws).mode = mode;
    }

    /// Focus `pane` directly (e.g. from the workspace bar).
    pub fn set_active(&mut self, ws: WorkspaceId, pane: PaneId) -> Result<(), LayoutError> {
        let state = self
            .workspaces
            .get_mut(&ws)
            .ok_or(LayoutError::NotFound(pane))?;
        if !state.tree.contains(pane) {
            return Err(LayoutError::NotFound(pane));
        }
        state.active_pane = Some(pane);
        Ok(())
    }

    /// The pane→rect map the renderer should draw. Tiled mode tiles the
    /// whole tree; stacked/tabbed modes show only the active pane at full
    /// bounds. Panes absent from the map must not be drawn.
    pub fn compute_visible(&mut self, ws: WorkspaceId, bounds: Rect) -> HashMap<PaneId, Rect> {
        let state = self.entry(ws);
        state.last_bounds = Some(bounds);
        match state.mode {
            DisplayMode::Tiled => state.tree.compute_layout(bounds),
            DisplayMode::Stacked | DisplayMode::Tabbed => {
                let mut out = HashMap::new();
                if let Some(active) = state.active_pane.filter(|p| state.tree.contains(*p)) {
                    out.insert(active, bounds);
                }
                out
            }
        }
    }

    /// Advance the active pane through the stacked order, wrapping.
    /// Only meaningful in stacked/tabbed modes.
    pub fn cycle_active(&mut self, ws: WorkspaceId, forward: bool) -> Result<(), LayoutError> {
        let state = self
            .workspaces
            .get_mut(&ws)
            .ok_or(LayoutError::EmptyWorkspace(ws))?;
        if state.mode == DisplayMode::Tiled {
            return Err(LayoutError::ModeMismatch(state.mode));
        }
        if state.stacked_order.is_empty() {
            return Err(LayoutError::EmptyWorkspace(ws));
        }
        let len = state.stacked_order.len();
        let current = state
            .active_pane
            .and_then(|p| state.stacked_order.iter().position(|q| *q == p))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        state.active_pane = Some(state.stacked_order[next]);
        Ok(())
    }

    /// Move focus to the nearest pane in `direction` from the active pane.
    /// `Ok(None)` means there is nothing in that direction. Only meaningful
    /// in tiled mode.
    pub fn navigate(
        &mut self,
        ws: WorkspaceId,
        direction: Direction,
    ) -> Result<Option<PaneId>, LayoutError> {
        let state = self
            .workspaces
            .get_mut(&ws)
            .ok_or(LayoutError::EmptyWorkspace(ws))?;
        if state.mode != DisplayMode::Tiled {
            return Err(LayoutError::ModeMismatch(state.mode));
        }
        let from = state.active_pane.ok_or(LayoutError::EmptyWorkspace(ws))?;
        let bounds = state.last_bounds.unwrap_or_else(default_bounds);
        let found = state.tree.navigate(from, direction, bounds);
        if let Some(pane) = found {
            state.active_pane = Some(pane);
        }
        Ok(found)
    }

    pub fn adjust_ratio(
        &mut self,
        ws: WorkspaceId,
        pane: PaneId,
        delta: f64,
    ) -> Result<(), LayoutError> {
        self.tiled_workspace(ws, pane)?.tree.adjust_ratio(pane, delta)
    }

    pub fn set_ratio(
        &mut self,
        ws: WorkspaceId,
        pane: PaneId,
        ratio: f64,
    ) -> Result<(), LayoutError> {
        self.tiled_workspace(ws, pane)?.tree.set_ratio(pane, ratio)
    }

    /// Reset every split in the workspace to 0.5. A no-op for workspaces
    /// that have never been touched.
    pub fn equalize(&mut self, ws: WorkspaceId) -> Result<(), LayoutError> {
        let Some(state) = self.workspaces.get_mut(&ws) else {
            return Ok(());
        };
        if state.mode != DisplayMode::Tiled {
            return Err(LayoutError::ModeMismatch(state.mode));
        }
        state.tree.equalize();
        Ok(())
    }

    /// Exchange two panes' positions. Allowed in any mode: it changes tree
    /// shape only, which stacked/tabbed modes don't display.
    pub fn swap(&mut self, ws: WorkspaceId, a: PaneId, b: PaneId) -> Result<(), LayoutError> {
        let state = self
            .workspaces
            .get_mut(&ws)
            .ok_or(LayoutError::NotFound(a))?;
        state.tree.swap(a, b)
    }

    fn tiled_workspace(
        &mut self,
        ws: WorkspaceId,
        pane: PaneId,
    ) -> Result<&mut WorkspaceLayout, LayoutError> {
        let state = self
            .workspaces
            .get_mut(&ws)
            .ok_or(LayoutError::NotFound(pane))?;
        if state.mode != DisplayMode::Tiled {
            return Err(LayoutError::ModeMismatch(state.mode));
        }
        Ok(state)
    }

    /// Iterate workspaces for persistence.
    pub fn workspaces(&self) -> impl Iterator<Item = (WorkspaceId, &WorkspaceLayout)> {
        self.workspaces.iter().map(|(ws, state)| (*ws, state))
    }

    /// Reinstate a workspace from a persisted snapshot. The tree shape is
    /// validated; the stacked order is reconciled so it names exactly the
    /// tree's panes, and a missing active pane falls back to the first in
    /// the order.
    pub fn restore_workspace(
        &mut self,
        ws: WorkspaceId,
        root: Option<LayoutNode>,
        mode: DisplayMode,
        active_pane: Option<PaneId>,
        stacked_order: Vec<PaneId>,
    ) -> Result<(), LayoutError> {
        let tree = LayoutTree::from_snapshot(root, self.gap)?;
        let panes = tree.all_panes();
        let live: HashSet<PaneId> = panes.iter().copied().collect();

        let mut seen = HashSet::new();
        let mut order: Vec<PaneId> = stacked_order
            .into_iter()
            .filter(|p| live.contains(p) && seen.insert(*p))
            .collect();
        for pane in panes {
            if seen.insert(pane) {
                order.push(pane);
            }
        }

        let active = active_pane
            .filter(|p| live.contains(p))
            .or_else(|| order.first().copied());

        self.workspaces.insert(
            ws,
            WorkspaceLayout {
                tree,
                mode,
                active_pane: active,
                stacked_order: order,
                last_bounds: None,
            },
        );
        Ok(())
    }
}
