use std::collections::HashMap;

use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{self, Direction, SplitDirection};

pub type PaneId = uuid::Uuid;
pub type WorkspaceId = u8;

/// A split never gives a side less than 10% or more than 90% of its space.
pub const MIN_RATIO: f64 = 0.1;
pub const MAX_RATIO: f64 = 0.9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Tiled,
    Stacked,
    Tabbed,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("pane {0} is already in the layout")]
    AlreadyPresent(PaneId),
    #[error("pane {0} is not in the layout")]
    NotFound(PaneId),
    #[error("workspace {0} has no panes")]
    EmptyWorkspace(WorkspaceId),
    #[error("ratio {0} is outside {MIN_RATIO}..={MAX_RATIO}")]
    InvalidRatio(f64),
    #[error("operation not available in {0:?} mode")]
    ModeMismatch(DisplayMode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Branch {
    First,
    Second,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LayoutNode {
    Leaf(PaneId),
    Split {
        direction: SplitDirection,
        ratio: f64,
        first: Box<LayoutNode>,
        second: Box<LayoutNode>,
    },
}

impl LayoutNode {
    fn leaf_count(&self) -> usize {
        match self {
            LayoutNode::Leaf(_) => 1,
            LayoutNode::Split { first, second, .. } => first.leaf_count() + second.leaf_count(),
        }
    }

    fn first_leaf(&self) -> PaneId {
        match self {
            LayoutNode::Leaf(id) => *id,
            LayoutNode::Split { first, .. } => first.first_leaf(),
        }
    }

    fn collect_panes(&self, out: &mut Vec<PaneId>) {
        match self {
            LayoutNode::Leaf(id) => out.push(*id),
            LayoutNode::Split { first, second, .. } => {
                first.collect_panes(out);
                second.collect_panes(out);
            }
        }
    }
}

/// One workspace's split tree.
///
/// Leaves hold pane ids; split nodes hold a direction and the fraction of
/// space given to their first child. A side index maps each pane to its
/// path from the root, so removal and ratio lookups never walk the whole
/// tree, and there are no parent pointers to keep in sync.
pub struct LayoutTree {
    root: Option<LayoutNode>,
    paths: HashMap<PaneId, Vec<Branch>>,
    arrival: HashMap<PaneId, u64>,
    next_arrival: u64,
    anchor: Option<PaneId>,
    gap: u16,
}

impl LayoutTree {
    pub fn new(gap: u16) -> Self {
        Self {
            root: None,
            paths: HashMap::new(),
            arrival: HashMap::new(),
            next_arrival: 0,
            anchor: None,
            gap,
        }
    }

    /// Insert `pane`, splitting the most recently inserted leaf.
    pub fn insert(&mut self, pane: PaneId) -> Result<(), LayoutError> {
        self.insert_at(None, pane)
    }

    /// Insert `pane` by splitting the anchor leaf. The anchor is
    /// `anchor_hint` when it names a live pane, otherwise the most recently
    /// inserted leaf, otherwise any existing leaf. The split direction
    /// alternates with the anchor's depth (vertical at even depths,
    /// horizontal at odd), producing the spiral subdivision pattern.
    pub fn insert_at(
        &mut self,
        anchor_hint: Option<PaneId>,
        pane: PaneId,
    ) -> Result<(), LayoutError> {
        if self.paths.contains_key(&pane) {
            return Err(LayoutError::AlreadyPresent(pane));
        }

        let seq = self.next_arrival;
        self.next_arrival += 1;

        let Some(root) = self.root.as_mut() else {
            self.root = Some(LayoutNode::Leaf(pane));
            self.paths.insert(pane, Vec::new());
            self.arrival.insert(pane, seq);
            self.anchor = Some(pane);
            return Ok(());
        };

        let anchor = anchor_hint
            .filter(|a| self.paths.contains_key(a))
            .or_else(|| self.anchor.filter(|a| self.paths.contains_key(a)))
            .unwrap_or_else(|| root.first_leaf());

        let anchor_path = self.paths[&anchor].clone();
        let direction = if anchor_path.len() % 2 == 0 {
            SplitDirection::Vertical
        } else {
            SplitDirection::Horizontal
        };

        let node = node_at_mut(root, &anchor_path);
        *node = LayoutNode::Split {
            direction,
            ratio: 0.5,
            first: Box::new(LayoutNode::Leaf(anchor)),
            second: Box::new(LayoutNode::Leaf(pane)),
        };

        let mut first_path = anchor_path.clone();
        first_path.push(Branch::First);
        let mut second_path = anchor_path;
        second_path.push(Branch::Second);
        self.paths.insert(anchor, first_path);
        self.paths.insert(pane, second_path);
        self.arrival.insert(pane, seq);
        self.anchor = Some(pane);

        self.check_index();
        Ok(())
    }

    /// Remove `pane`, promoting its sibling subtree into the parent's slot.
    pub fn remove(&mut self, pane: PaneId) -> Result<(), LayoutError> {
        let path = self
            .paths
            .get(&pane)
            .cloned()
            .ok_or(LayoutError::NotFound(pane))?;

        if path.is_empty() {
            // Sole leaf: the tree becomes empty.
            self.root = None;
            self.paths.clear();
            self.arrival.clear();
            self.anchor = None;
            return Ok(());
        }

        let root = self.root.as_mut().expect("non-empty path implies a root");
        let parent_path = &path[..path.len() - 1];
        let parent = node_at_mut(root, parent_path);
        let sibling = match parent {
            LayoutNode::Split { first, second, .. } => match path[path.len() - 1] {
                Branch::First => std::mem::replace(second.as_mut(), LayoutNode::Leaf(pane)),
                Branch::Second => std::mem::replace(first.as_mut(), LayoutNode::Leaf(pane)),
            },
            LayoutNode::Leaf(_) => unreachable!("pane path runs through a leaf"),
        };
        *parent = sibling;

        self.paths.remove(&pane);
        self.arrival.remove(&pane);

        // The promoted subtree moved up a level; re-path every leaf in it.
        let mut prefix = parent_path.to_vec();
        reindex(node_at(root, parent_path), &mut prefix, &mut self.paths);

        if self.anchor == Some(pane) {
            let root = self.root.as_ref().expect("tree still has leaves");
            self.anchor = Some(node_at(root, parent_path).first_leaf());
        }

        self.check_index();
        Ok(())
    }

    /// Map every pane to its on-screen rect inside `bounds`.
    pub fn compute_layout(&self, bounds: Rect) -> HashMap<PaneId, Rect> {
        let mut out = HashMap::new();
        if let Some(root) = &self.root {
            collect_rects(root, bounds, self.gap, &mut out);
        }
        out
    }

    /// Nudge the ratio of the split directly above `pane` by `delta`,
    /// clamped to `MIN_RATIO..=MAX_RATIO`. A sole pane has no split to
    /// adjust and the call is a no-op.
    pub fn adjust_ratio(&mut self, pane: PaneId, delta: f64) -> Result<(), LayoutError> {
        self.with_parent_split(pane, |ratio| {
            *ratio = (*ratio + delta).clamp(MIN_RATIO, MAX_RATIO);
        })
    }

    /// Set the exact ratio of the split directly above `pane`. Unlike
    /// `adjust_ratio`, out-of-range values are rejected rather than
    /// clamped.
    pub fn set_ratio(&mut self, pane: PaneId, ratio: f64) -> Result<(), LayoutError> {
        if !(MIN_RATIO..=MAX_RATIO).contains(&ratio) {
            return Err(LayoutError::InvalidRatio(ratio));
        }
        self.with_parent_split(pane, |r| *r = ratio)
    }

    fn with_parent_split(
        &mut self,
        pane: PaneId,
        apply: impl FnOnce(&mut f64),
    ) -> Result<(), LayoutError> {
        let path = self
            .paths
            .get(&pane)
            .cloned()
            .ok_or(LayoutError::NotFound(pane))?;
        if path.is_empty() {
            return Ok(());
        }
        let root = self.root.as_mut().expect("indexed pane implies a root");
        match node_at_mut(root, &path[..path.len() - 1]) {
            LayoutNode::Split { ratio, .. } => apply(ratio),
            LayoutNode::Leaf(_) => unreachable!("pane path runs through a leaf"),
        }
        Ok(())
    }

    /// Reset every split in the tree to an even 0.5.
    pub fn equalize(&mut self) {
        fn reset(node: &mut LayoutNode) {
            if let LayoutNode::Split {
                ratio,
                first,
                second,
                ..
            } = node
            {
                *ratio = 0.5;
                reset(first);
                reset(second);
            }
        }
        if let Some(root) = self.root.as_mut() {
            reset(root);
        }
    }

    /// Exchange the panes held by two leaves without changing tree shape.
    pub fn swap(&mut self, a: PaneId, b: PaneId) -> Result<(), LayoutError> {
        let path_a = self
            .paths
            .get(&a)
            .cloned()
            .ok_or(LayoutError::NotFound(a))?;
        let path_b = self
            .paths
            .get(&b)
            .cloned()
            .ok_or(LayoutError::NotFound(b))?;
        if a == b {
            return Ok(());
        }
        let root = self.root.as_mut().expect("indexed panes imply a root");
        *node_at_mut(root, &path_a) = LayoutNode::Leaf(b);
        *node_at_mut(root, &path_b) = LayoutNode::Leaf(a);
        self.paths.insert(a, path_b);
        self.paths.insert(b, path_a);

        self.check_index();
        Ok(())
    }

    /// Nearest pane in `direction` from `from`, judged on the layout for
    /// `bounds`: highest adjacency affinity wins, ties broken by center
    /// distance, then by insertion order. `None` at the screen edge or
    /// when the tree holds at most one pane.
    pub fn navigate(&self, from: PaneId, direction: Direction, bounds: Rect) -> Option<PaneId> {
        let rects = self.compute_layout(bounds);
        let from_rect = *rects.get(&from)?;

        let mut best: Option<(f64, f64, u64, PaneId)> = None;
        for (&id, &rect) in &rects {
            if id == from {
                continue;
            }
            let Some(score) = geometry::adjacency(from_rect, rect, direction) else {
                continue;
            };
            let dist = geometry::center_distance(from_rect, rect);
            let seq = self.arrival[&id];
            let better = match &best {
                None => true,
                Some((best_score, best_dist, best_seq, _)) => {
                    score > *best_score
                        || (score == *best_score && dist < *best_dist)
                        || (score == *best_score && dist == *best_dist && seq < *best_seq)
                }
            };
            if better {
                best = Some((score, dist, seq, id));
            }
        }
        best.map(|(_, _, _, id)| id)
    }

    /// All panes in pre-order (first child before second, top-down).
    pub fn all_panes(&self) -> Vec<PaneId> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.collect_panes(&mut out);
        }
        out
    }

    pub fn contains(&self, pane: PaneId) -> bool {
        self.paths.contains_key(&pane)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn pane_count(&self) -> usize {
        self.paths.len()
    }

    /// Drop the whole tree.
    pub fn clear(&mut self) {
        self.root = None;
        self.paths.clear();
        self.arrival.clear();
        self.anchor = None;
    }

    /// Tree shape for persistence: node kinds, directions, ratios and
    /// pane ids, enough to rebuild an identical tree.
    pub fn snapshot(&self) -> Option<LayoutNode> {
        self.root.clone()
    }

    /// Rebuild a tree from a persisted shape. Duplicate pane ids and
    /// out-of-range ratios are rejected instead of trusted.
    pub fn from_snapshot(root: Option<LayoutNode>, gap: u16) -> Result<Self, LayoutError> {
        let mut tree = Self::new(gap);
        let Some(root) = root else {
            return Ok(tree);
        };

        validate_node(&root)?;

        let mut panes = Vec::new();
        root.collect_panes(&mut panes);
        let mut prefix = Vec::new();
        reindex(&root, &mut prefix, &mut tree.paths);
        for (seq, pane) in panes.iter().enumerate() {
            tree.arrival.insert(*pane, seq as u64);
        }
        tree.next_arrival = panes.len() as u64;
        tree.anchor = panes.last().copied();
        tree.root = Some(root);

        tree.check_index();
        Ok(tree)
    }

    /// The index must name exactly the tree's leaves; anything else means
    /// the two structures have drifted apart.
    fn check_index(&self) {
        if cfg!(debug_assertions) {
            let leaves = self.root.as_ref().map_or(0, |r| r.leaf_count());
            debug_assert_eq!(self.paths.len(), leaves);
            debug_assert_eq!(self.arrival.len(), leaves);
            if let Some(root) = &self.root {
                for (pane, path) in &self.paths {
                    match node_at(root, path) {
                        LayoutNode::Leaf(id) => debug_assert_eq!(id, pane),
                        LayoutNode::Split { .. } => {
                            panic!("path for pane {pane} ends at a split")
                        }
                    }
                }
            }
        }
    }
}

fn validate_node(node: &LayoutNode) -> Result<(), LayoutError> {
    let mut panes = Vec::new();
    node.collect_panes(&mut panes);
    let mut seen = std::collections::HashSet::new();
    for pane in panes {
        if !seen.insert(pane) {
            return Err(LayoutError::AlreadyPresent(pane));
        }
    }

    fn ratios(node: &LayoutNode) -> Result<(), LayoutError> {
        if let LayoutNode::Split {
            ratio,
            first,
            second,
            ..
        } = node
        {
            if !(MIN_RATIO..=MAX_RATIO).contains(ratio) {
                return Err(LayoutError::InvalidRatio(*ratio));
            }
            ratios(first)?;
            ratios(second)?;
        }
        Ok(())
    }
    ratios(node)
}

fn node_at<'a>(root: &'a LayoutNode, path: &[Branch]) -> &'a LayoutNode {
    let mut node = root;
    for branch in path {
        node = match node {
            LayoutNode::Split { first, second, .. } => match branch {
                Branch::First => first.as_ref(),
                Branch::Second => second.as_ref(),
            },
            LayoutNode::Leaf(_) => unreachable!("path runs past a leaf"),
        };
    }
    node
}

fn node_at_mut<'a>(root: &'a mut LayoutNode, path: &[Branch]) -> &'a mut LayoutNode {
    let mut node = root;
    for branch in path {
        node = match node {
            LayoutNode::Split { first, second, .. } => match branch {
                Branch::First => first.as_mut(),
                Branch::Second => second.as_mut(),
            },
            LayoutNode::Leaf(_) => unreachable!("path runs past a leaf"),
        };
    }
    node
}

fn reindex(node: &LayoutNode, prefix: &mut Vec<Branch>, paths: &mut HashMap<PaneId, Vec<Branch>>) {
    match node {
        LayoutNode::Leaf(id) => {
            paths.insert(*id, prefix.clone());
        }
        LayoutNode::Split { first, second, .. } => {
            prefix.push(Branch::First);
            reindex(first, prefix, paths);
            prefix.pop();
            prefix.push(Branch::Second);
            reindex(second, prefix, paths);
            prefix.pop();
        }
    }
}

fn collect_rects(node: &LayoutNode, area: Rect, gap: u16, out: &mut HashMap<PaneId, Rect>) {
    match node {
        LayoutNode::Leaf(id) => {
            out.insert(*id, area);
        }
        LayoutNode::Split {
            direction,
            ratio,
            first,
            second,
        } => {
            let (first_area, second_area) = geometry::split_rect(area, *direction, *ratio, gap);
            collect_rects(first, first_area, gap, out);
            collect_rects(second, second_area, gap, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<PaneId> {
        (0..n).map(|_| PaneId::new_v4()).collect()
    }

    /// Insert p1, p2, p3 with the default (last-inserted) anchor.
    fn spiral_three() -> (LayoutTree, PaneId, PaneId, PaneId) {
        let mut tree = LayoutTree::new(0);
        let p = ids(3);
        for &pane in &p {
            tree.insert(pane).unwrap();
        }
        (tree, p[0], p[1], p[2])
    }

    #[test]
    fn test_insert_into_empty_becomes_root() {
        let mut tree = LayoutTree::new(0);
        let p1 = PaneId::new_v4();
        tree.insert(p1).unwrap();
        assert_eq!(tree.all_panes(), vec![p1]);
        let rects = tree.compute_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(rects[&p1], Rect::new(0, 0, 80, 24));
    }

    #[test]
    fn test_insert_duplicate_rejected() {
        let mut tree = LayoutTree::new(0);
        let p1 = PaneId::new_v4();
        tree.insert(p1).unwrap();
        assert_eq!(tree.insert(p1), Err(LayoutError::AlreadyPresent(p1)));
        assert_eq!(tree.pane_count(), 1);
    }

    #[test]
    fn test_spiral_directions_alternate_by_depth() {
        let (tree, p1, p2, p3) = spiral_three();
        // Root splits vertically; the second level splits horizontally.
        match tree.snapshot().unwrap() {
            LayoutNode::Split {
                direction: SplitDirection::Vertical,
                first,
                second,
                ..
            } => {
                assert_eq!(*first, LayoutNode::Leaf(p1));
                match *second {
                    LayoutNode::Split {
                        direction: SplitDirection::Horizontal,
                        first,
                        second,
                        ..
                    } => {
                        assert_eq!(*first, LayoutNode::Leaf(p2));
                        assert_eq!(*second, LayoutNode::Leaf(p3));
                    }
                    other => panic!("expected horizontal split, got {other:?}"),
                }
            }
            other => panic!("expected vertical root split, got {other:?}"),
        }
    }

    #[test]
    fn test_spiral_layout_rects() {
        let (tree, p1, p2, p3) = spiral_three();
        let rects = tree.compute_layout(Rect::new(0, 0, 100, 100));
        assert_eq!(rects[&p1], Rect::new(0, 0, 100, 50));
        assert_eq!(rects[&p2], Rect::new(0, 50, 50, 50));
        assert_eq!(rects[&p3], Rect::new(50, 50, 50, 50));
    }

    #[test]
    fn test_insert_count_matches_panes() {
        let mut tree = LayoutTree::new(0);
        let panes = ids(16);
        for &pane in &panes {
            tree.insert(pane).unwrap();
        }
        let all = tree.all_panes();
        assert_eq!(all.len(), 16);
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn test_insert_at_explicit_anchor() {
        let mut tree = LayoutTree::new(0);
        let [p1, p2, p3]: [PaneId; 3] = ids(3).try_into().unwrap();
        tree.insert(p1).unwrap();
        tree.insert(p2).unwrap();
        // Anchor at p1 (depth 1, odd): splits horizontally inside the top half.
        tree.insert_at(Some(p1), p3).unwrap();
        let rects = tree.compute_layout(Rect::new(0, 0, 100, 100));
        assert_eq!(rects[&p1], Rect::new(0, 0, 50, 50));
        assert_eq!(rects[&p3], Rect::new(50, 0, 50, 50));
        assert_eq!(rects[&p2], Rect::new(0, 50, 100, 50));
    }

    #[test]
    fn test_insert_with_stale_anchor_falls_back() {
        let mut tree = LayoutTree::new(0);
        let [p1, p2, gone]: [PaneId; 3] = ids(3).try_into().unwrap();
        tree.insert(p1).unwrap();
        // A hint naming a pane that was never inserted anchors at the
        // last-inserted leaf instead.
        tree.insert_at(Some(gone), p2).unwrap();
        assert_eq!(tree.all_panes(), vec![p1, p2]);
    }

    #[test]
    fn test_remove_root_leaf_empties_tree() {
        let mut tree = LayoutTree::new(0);
        let p1 = PaneId::new_v4();
        tree.insert(p1).unwrap();
        tree.remove(p1).unwrap();
        assert!(tree.is_empty());
        assert!(tree.compute_layout(Rect::new(0, 0, 80, 24)).is_empty());
    }

    #[test]
    fn test_remove_promotes_sibling() {
        let (mut tree, p1, p2, p3) = spiral_three();
        tree.remove(p2).unwrap();
        let rects = tree.compute_layout(Rect::new(0, 0, 100, 100));
        assert_eq!(rects[&p1], Rect::new(0, 0, 100, 50));
        assert_eq!(rects[&p3], Rect::new(0, 50, 100, 50));
    }

    #[test]
    fn test_remove_missing_pane() {
        let (mut tree, ..) = spiral_three();
        let ghost = PaneId::new_v4();
        assert_eq!(tree.remove(ghost), Err(LayoutError::NotFound(ghost)));
        assert_eq!(tree.pane_count(), 3);
    }

    #[test]
    fn test_insert_remove_round_trip_restores_layout() {
        let (mut tree, ..) = spiral_three();
        let bounds = Rect::new(0, 0, 120, 80);
        let before = tree.compute_layout(bounds);
        let extra = PaneId::new_v4();
        tree.insert(extra).unwrap();
        tree.remove(extra).unwrap();
        assert_eq!(tree.compute_layout(bounds), before);
    }

    #[test]
    fn test_layout_covers_bounds_without_overlap() {
        let mut tree = LayoutTree::new(0);
        for pane in ids(9) {
            tree.insert(pane).unwrap();
        }
        let bounds = Rect::new(0, 0, 120, 60);
        let rects: Vec<Rect> = tree.compute_layout(bounds).into_values().collect();

        let area: u32 = rects.iter().map(|r| r.area()).sum();
        assert_eq!(area, bounds.area());
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(*b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_adjust_ratio_clamps_extremes() {
        let mut tree = LayoutTree::new(0);
        let [p1, p2]: [PaneId; 2] = ids(2).try_into().unwrap();
        tree.insert(p1).unwrap();
        tree.insert(p2).unwrap();

        tree.adjust_ratio(p1, 1e9).unwrap();
        match tree.snapshot().unwrap() {
            LayoutNode::Split { ratio, .. } => assert_eq!(ratio, MAX_RATIO),
            _ => unreachable!(),
        }
        tree.adjust_ratio(p1, -1e9).unwrap();
        match tree.snapshot().unwrap() {
            LayoutNode::Split { ratio, .. } => assert_eq!(ratio, MIN_RATIO),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_adjust_ratio_on_sole_pane_is_noop() {
        let mut tree = LayoutTree::new(0);
        let p1 = PaneId::new_v4();
        tree.insert(p1).unwrap();
        assert_eq!(tree.adjust_ratio(p1, 0.2), Ok(()));
    }

    #[test]
    fn test_adjust_ratio_missing_pane() {
        let mut tree = LayoutTree::new(0);
        let ghost = PaneId::new_v4();
        assert_eq!(tree.adjust_ratio(ghost, 0.1), Err(LayoutError::NotFound(ghost)));
    }

    #[test]
    fn test_set_ratio_rejects_out_of_range() {
        let mut tree = LayoutTree::new(0);
        let [p1, p2]: [PaneId; 2] = ids(2).try_into().unwrap();
        tree.insert(p1).unwrap();
        tree.insert(p2).unwrap();
        assert_eq!(tree.set_ratio(p2, 0.05), Err(LayoutError::InvalidRatio(0.05)));
        assert_eq!(tree.set_ratio(p2, 0.95), Err(LayoutError::InvalidRatio(0.95)));
        tree.set_ratio(p2, 0.3).unwrap();
        match tree.snapshot().unwrap() {
            LayoutNode::Split { ratio, .. } => assert_eq!(ratio, 0.3),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_equalize_resets_all_ratios() {
        let (mut tree, p1, _, p3) = spiral_three();
        tree.adjust_ratio(p1, 0.3).unwrap();
        tree.adjust_ratio(p3, -0.25).unwrap();
        tree.equalize();

        fn check(node: &LayoutNode) {
            if let LayoutNode::Split {
                ratio,
                first,
                second,
                ..
            } = node
            {
                assert!((*ratio - 0.5).abs() < f64::EPSILON);
                check(first);
                check(second);
            }
        }
        check(&tree.snapshot().unwrap());
    }

    #[test]
    fn test_equalize_two_leaves_halves_bounds() {
        let mut tree = LayoutTree::new(0);
        let [p1, p2]: [PaneId; 2] = ids(2).try_into().unwrap();
        tree.insert(p1).unwrap();
        tree.insert(p2).unwrap();
        tree.adjust_ratio(p1, 0.3).unwrap();
        tree.equalize();
        let rects = tree.compute_layout(Rect::new(0, 0, 100, 100));
        assert_eq!(rects[&p1], Rect::new(0, 0, 100, 50));
        assert_eq!(rects[&p2], Rect::new(0, 50, 100, 50));
    }

    #[test]
    fn test_swap_exchanges_rects_only() {
        let (mut tree, p1, p2, p3) = spiral_three();
        let bounds = Rect::new(0, 0, 100, 100);
        let before = tree.compute_layout(bounds);
        tree.swap(p1, p3).unwrap();
        let after = tree.compute_layout(bounds);
        assert_eq!(after[&p1], before[&p3]);
        assert_eq!(after[&p3], before[&p1]);
        assert_eq!(after[&p2], before[&p2]);
    }

    #[test]
    fn test_swap_missing_pane() {
        let (mut tree, p1, ..) = spiral_three();
        let ghost = PaneId::new_v4();
        assert_eq!(tree.swap(p1, ghost), Err(LayoutError::NotFound(ghost)));
        assert_eq!(tree.swap(ghost, p1), Err(LayoutError::NotFound(ghost)));
    }

    #[test]
    fn test_swap_then_remove_uses_new_position() {
        let (mut tree, p1, p2, p3) = spiral_three();
        tree.swap(p1, p3).unwrap();
        // p1 now lives in the bottom-right leaf; removing it must promote p2.
        tree.remove(p1).unwrap();
        let rects = tree.compute_layout(Rect::new(0, 0, 100, 100));
        assert_eq!(rects[&p3], Rect::new(0, 0, 100, 50));
        assert_eq!(rects[&p2], Rect::new(0, 50, 100, 50));
    }

    #[test]
    fn test_navigate_basic_directions() {
        let (tree, p1, p2, p3) = spiral_three();
        let bounds = Rect::new(0, 0, 100, 100);
        assert_eq!(tree.navigate(p2, Direction::Right, bounds), Some(p3));
        assert_eq!(tree.navigate(p3, Direction::Left, bounds), Some(p2));
        assert_eq!(tree.navigate(p2, Direction::Up, bounds), Some(p1));
        assert_eq!(tree.navigate(p3, Direction::Up, bounds), Some(p1));
    }

    #[test]
    fn test_navigate_edge_returns_none() {
        let (tree, p1, p2, p3) = spiral_three();
        let bounds = Rect::new(0, 0, 100, 100);
        assert_eq!(tree.navigate(p1, Direction::Up, bounds), None);
        assert_eq!(tree.navigate(p2, Direction::Left, bounds), None);
        assert_eq!(tree.navigate(p3, Direction::Right, bounds), None);
    }

    #[test]
    fn test_navigate_right_then_left_returns_home() {
        let (tree, _, p2, p3) = spiral_three();
        let bounds = Rect::new(0, 0, 100, 100);
        let there = tree.navigate(p2, Direction::Right, bounds).unwrap();
        assert_eq!(there, p3);
        assert_eq!(tree.navigate(there, Direction::Left, bounds), Some(p2));
    }

    #[test]
    fn test_navigate_tie_broken_by_insertion_order() {
        // p1 spans the top; p2 and p3 sit below it, mirror images of each
        // other, so affinity and center distance both tie going down.
        let (tree, p1, p2, _) = spiral_three();
        let bounds = Rect::new(0, 0, 100, 100);
        assert_eq!(tree.navigate(p1, Direction::Down, bounds), Some(p2));
    }

    #[test]
    fn test_navigate_single_pane() {
        let mut tree = LayoutTree::new(0);
        let p1 = PaneId::new_v4();
        tree.insert(p1).unwrap();
        let bounds = Rect::new(0, 0, 80, 24);
        assert_eq!(tree.navigate(p1, Direction::Right, bounds), None);
    }

    #[test]
    fn test_navigate_unknown_pane() {
        let (tree, ..) = spiral_three();
        let ghost = PaneId::new_v4();
        assert_eq!(
            tree.navigate(ghost, Direction::Right, Rect::new(0, 0, 100, 100)),
            None
        );
    }

    #[test]
    fn test_clear_drops_everything() {
        let (mut tree, ..) = spiral_three();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.pane_count(), 0);
        // Reuse after clear starts a fresh spiral.
        let p = PaneId::new_v4();
        tree.insert(p).unwrap();
        assert_eq!(tree.all_panes(), vec![p]);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let (mut tree, p1, _, p3) = spiral_three();
        tree.adjust_ratio(p1, 0.2).unwrap();
        tree.adjust_ratio(p3, -0.1).unwrap();
        let bounds = Rect::new(0, 0, 133, 77);
        let before = tree.compute_layout(bounds);

        let restored = LayoutTree::from_snapshot(tree.snapshot(), 0).unwrap();
        assert_eq!(restored.compute_layout(bounds), before);
        assert_eq!(restored.all_panes(), tree.all_panes());
    }

    #[test]
    fn test_snapshot_serde_round_trip() {
        let (tree, ..) = spiral_three();
        let json = serde_json::to_string(&tree.snapshot()).unwrap();
        let shape: Option<LayoutNode> = serde_json::from_str(&json).unwrap();
        let restored = LayoutTree::from_snapshot(shape, 0).unwrap();
        assert_eq!(restored.all_panes(), tree.all_panes());
    }

    #[test]
    fn test_from_snapshot_rejects_bad_ratio() {
        let [p1, p2]: [PaneId; 2] = ids(2).try_into().unwrap();
        let shape = LayoutNode::Split {
            direction: SplitDirection::Vertical,
            ratio: 0.95,
            first: Box::new(LayoutNode::Leaf(p1)),
            second: Box::new(LayoutNode::Leaf(p2)),
        };
        assert_eq!(
            LayoutTree::from_snapshot(Some(shape), 0).err(),
            Some(LayoutError::InvalidRatio(0.95))
        );
    }

    #[test]
    fn test_from_snapshot_rejects_duplicate_pane() {
        let p1 = PaneId::new_v4();
        let shape = LayoutNode::Split {
            direction: SplitDirection::Vertical,
            ratio: 0.5,
            first: Box::new(LayoutNode::Leaf(p1)),
            second: Box::new(LayoutNode::Leaf(p1)),
        };
        assert_eq!(
            LayoutTree::from_snapshot(Some(shape), 0).err(),
            Some(LayoutError::AlreadyPresent(p1))
        );
    }

    #[test]
    fn test_restored_tree_accepts_inserts() {
        let (tree, ..) = spiral_three();
        let mut restored = LayoutTree::from_snapshot(tree.snapshot(), 0).unwrap();
        let p4 = PaneId::new_v4();
        restored.insert(p4).unwrap();
        assert_eq!(restored.pane_count(), 4);
    }

    #[test]
    fn test_gap_applies_at_every_split() {
        let mut tree = LayoutTree::new(1);
        let [p1, p2]: [PaneId; 2] = ids(2).try_into().unwrap();
        tree.insert(p1).unwrap();
        tree.insert(p2).unwrap();
        let rects = tree.compute_layout(Rect::new(0, 0, 100, 41));
        // 40 inner rows at 0.5: 20 up top, the gap row, 20 below.
        assert_eq!(rects[&p1], Rect::new(0, 0, 100, 20));
        assert_eq!(rects[&p2], Rect::new(0, 21, 100, 20));
    }

    #[test]
    fn test_deep_insertion_removal_stays_consistent() {
        let mut tree = LayoutTree::new(0);
        let panes = ids(12);
        for &pane in &panes {
            tree.insert(pane).unwrap();
        }
        // Remove every other pane, then verify the survivors still tile.
        for pane in panes.iter().step_by(2) {
            tree.remove(*pane).unwrap();
        }
        assert_eq!(tree.pane_count(), 6);
        let bounds = Rect::new(0, 0, 100, 60);
        let rects = tree.compute_layout(bounds);
        assert_eq!(rects.len(), 6);
        let area: u32 = rects.values().map(|r| r.area()).sum();
        assert_eq!(area, bounds.area());
    }
}
