use tracing::debug;

use crate::model::TreeNode;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Rect {
    pub lower: [f64; 2],
    pub upper: [f64; 2],
}

impl Rect {
    pub const UNIT: Rect = Rect {
        lower: [0.0, 0.0],
        upper: [1.0, 1.0],
    };

    pub fn new(lower: [f64; 2], upper: [f64; 2]) -> Self {
        Self { lower, upper }
    }

    pub fn extent(self, axis: Axis) -> f64 {
        let index = axis.index();
        self.upper[index] - self.lower[index]
    }

    pub fn width(self) -> f64 {
        self.extent(Axis::Horizontal)
    }

    pub fn height(self) -> f64 {
        self.extent(Axis::Vertical)
    }

    pub fn area(self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(self) -> [f64; 2] {
        [
            self.lower[0] + self.width() / 2.0,
            self.lower[1] + self.height() / 2.0,
        ]
    }

    /// Same rectangle with its span along `axis` replaced by `[start, end]`.
    pub fn with_span(self, axis: Axis, start: f64, end: f64) -> Self {
        let index = axis.index();
        let mut lower = self.lower;
        let mut upper = self.upper;
        lower[index] = start;
        upper[index] = end;
        Self { lower, upper }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LaidOutNode<'a> {
    pub node: &'a TreeNode,
    pub rect: Rect,
    pub depth: usize,
    /// Axis this node's children are sliced along.
    pub axis: Axis,
}

pub fn layout_treemap(root: &TreeNode) -> Vec<LaidOutNode<'_>> {
    layout_subtree(root, Rect::UNIT, Axis::Horizontal)
}

/// Slice-and-dice layout: each node's children become consecutive slabs along
/// `axis`, proportional to size, and the axis alternates one level down.
///
/// Emits the node itself first, then its descendants depth-first. A subtree of
/// total size zero keeps its own rectangle but its children are not emitted.
pub fn layout_subtree(node: &TreeNode, bounds: Rect, axis: Axis) -> Vec<LaidOutNode<'_>> {
    let mut laid_out = Vec::with_capacity(node.node_count());
    slice_and_dice(node, bounds, axis, 0, &mut laid_out);
    debug!(rectangles = laid_out.len(), "laid out treemap");
    laid_out
}

fn slice_and_dice<'a>(
    node: &'a TreeNode,
    bounds: Rect,
    axis: Axis,
    depth: usize,
    laid_out: &mut Vec<LaidOutNode<'a>>,
) {
    laid_out.push(LaidOutNode {
        node,
        rect: bounds,
        depth,
        axis,
    });

    let children = node.children();
    let Some(last_index) = children.len().checked_sub(1) else {
        return;
    };
    let total = node.size();
    if total == 0 {
        debug!(node = node.name(), "zero-size subtree; children not subdivided");
        return;
    }

    let index = axis.index();
    let start = bounds.lower[index];
    let end = bounds.upper[index];
    let width = end - start;

    let mut cursor = start;
    for (child_index, child) in children.iter().enumerate() {
        let far_edge = if child_index == last_index {
            end
        } else {
            cursor + width * (child.size() as f64) / (total as f64)
        };
        let child_bounds = bounds.with_span(axis, cursor, far_edge);
        slice_and_dice(child, child_bounds, axis.next(), depth + 1, laid_out);
        cursor = far_edge;
    }
}
