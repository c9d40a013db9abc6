pub mod store;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::layout::{DisplayMode, LayoutError, LayoutNode, PaneId, WorkspaceId};
use crate::manager::{LayoutManager, RefocusPolicy};

pub const STATE_VERSION: u32 = 1;

/// One workspace's persisted layout: enough shape to rebuild an identical
/// tree, plus the visibility state the manager tracks alongside it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub id: WorkspaceId,
    pub layout: Option<LayoutNode>,
    pub mode: DisplayMode,
    pub active_pane: Option<PaneId>,
    pub stacked_order: Vec<PaneId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedState {
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    pub workspaces: Vec<WorkspaceSnapshot>,
    pub active_workspace: WorkspaceId,
    pub pane_titles: HashMap<PaneId, String>,
}

impl SavedState {
    pub fn capture(
        manager: &LayoutManager,
        active_workspace: WorkspaceId,
        pane_titles: &HashMap<PaneId, String>,
    ) -> Self {
        let mut workspaces: Vec<WorkspaceSnapshot> = manager
            .workspaces()
            .map(|(id, state)| WorkspaceSnapshot {
                id,
                layout: state.tree.snapshot(),
                mode: state.mode,
                active_pane: state.active_pane,
                stacked_order: state.stacked_order.clone(),
            })
            .collect();
        workspaces.sort_by_key(|w| w.id);

        Self {
            version: STATE_VERSION,
            updated_at: Utc::now(),
            workspaces,
            active_workspace,
            pane_titles: pane_titles.clone(),
        }
    }

    /// Rebuild a manager from the snapshot, validating every tree shape.
    pub fn restore(
        &self,
        gap: u16,
        refocus: RefocusPolicy,
    ) -> Result<LayoutManager, LayoutError> {
        let mut manager = LayoutManager::new(gap, refocus);
        for ws in &self.workspaces {
            manager.restore_workspace(
                ws.id,
                ws.layout.clone(),
                ws.mode,
                ws.active_pane,
                ws.stacked_order.clone(),
            )?;
        }
        Ok(manager)
    }
}
