use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};

/// Direction of a split: `Horizontal` places children side by side,
/// `Vertical` stacks them top/bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitDirection {
    Horizontal,
    Vertical,
}

/// Screen direction for focus navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Split `area` along `direction`, giving `ratio` of the space to the first
/// child. `gap` cells are reserved between the children before the ratio is
/// applied, and fractional cells go to the first child, so
/// `first + gap + second` always equals the original extent exactly.
pub fn split_rect(area: Rect, direction: SplitDirection, ratio: f64, gap: u16) -> (Rect, Rect) {
    match direction {
        SplitDirection::Horizontal => {
            let gap = gap.min(area.width);
            let inner = area.width - gap;
            let first_w = ((inner as f64) * ratio).ceil().min(inner as f64) as u16;
            let second_w = inner - first_w;
            (
                Rect::new(area.x, area.y, first_w, area.height),
                Rect::new(area.x + first_w + gap, area.y, second_w, area.height),
            )
        }
        SplitDirection::Vertical => {
            let gap = gap.min(area.height);
            let inner = area.height - gap;
            let first_h = ((inner as f64) * ratio).ceil().min(inner as f64) as u16;
            let second_h = inner - first_h;
            (
                Rect::new(area.x, area.y, area.width, first_h),
                Rect::new(area.x, area.y + first_h + gap, area.width, second_h),
            )
        }
    }
}

/// Affinity of `b` as a navigation target in `dir` from `a`.
///
/// `None` when `b` does not lie entirely in that direction. Otherwise a
/// score that grows with perpendicular overlap and shrinks with the
/// distance between the facing edges, so immediate neighbors with large
/// shared edges win over distant or diagonal candidates.
pub fn adjacency(a: Rect, b: Rect, dir: Direction) -> Option<f64> {
    let (edge_gap, overlap) = match dir {
        Direction::Left => {
            if b.right() > a.x {
                return None;
            }
            (a.x - b.right(), vertical_overlap(a, b))
        }
        Direction::Right => {
            if b.x < a.right() {
                return None;
            }
            (b.x - a.right(), vertical_overlap(a, b))
        }
        Direction::Up => {
            if b.bottom() > a.y {
                return None;
            }
            (a.y - b.bottom(), horizontal_overlap(a, b))
        }
        Direction::Down => {
            if b.y < a.bottom() {
                return None;
            }
            (b.y - a.bottom(), horizontal_overlap(a, b))
        }
    };
    Some(overlap as f64 / (1.0 + edge_gap as f64))
}

/// Euclidean distance between the centers of two rects.
pub fn center_distance(a: Rect, b: Rect) -> f64 {
    let (ax, ay) = center(a);
    let (bx, by) = center(b);
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}

fn center(r: Rect) -> (f64, f64) {
    (
        r.x as f64 + r.width as f64 / 2.0,
        r.y as f64 + r.height as f64 / 2.0,
    )
}

fn vertical_overlap(a: Rect, b: Rect) -> u16 {
    let top = a.y.max(b.y);
    let bottom = a.bottom().min(b.bottom());
    bottom.saturating_sub(top)
}

fn horizontal_overlap(a: Rect, b: Rect) -> u16 {
    let left = a.x.max(b.x);
    let right = a.right().min(b.right());
    right.saturating_sub(left)
}
