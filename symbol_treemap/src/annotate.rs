use crate::layout::Rect;
use crate::model::{Rgb, TreeNode};

/// A symbol label stays on one line only when its box is wider than this many heights.
pub const SINGLE_LINE_ASPECT: f64 = 3.0;
pub const FILE_LABEL_DEGREES: f64 = 45.0;
pub const SYMBOL_LABEL_COLOR: Rgb = Rgb::WHITE;
pub const FILE_LABEL_COLOR: Rgb = Rgb::BLACK;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Symbol,
    File,
    Directory,
}

impl NodeRole {
    pub fn of(node: &TreeNode) -> Self {
        match node {
            TreeNode::Symbol(_) => Self::Symbol,
            TreeNode::Path(group) if group.is_file() => Self::File,
            TreeNode::Path(_) => Self::Directory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
    Degrees(f64),
}

impl Orientation {
    /// Counter-clockwise rotation from the horizontal.
    pub fn degrees(self) -> f64 {
        match self {
            Self::Horizontal => 0.0,
            Self::Vertical => 90.0,
            Self::Degrees(degrees) => degrees,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Label {
    pub text: String,
    pub color: Rgb,
    pub orientation: Orientation,
    /// Center of the label in unit-square coordinates.
    pub anchor: [f64; 2],
}

impl Label {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

/// Label for `node` drawn in `rect`, or `None` for pure directories.
pub fn annotate(node: &TreeNode, rect: Rect) -> Option<Label> {
    match node {
        TreeNode::Symbol(leaf) => {
            let record = &leaf.record;
            let separator = if rect.width() > SINGLE_LINE_ASPECT * rect.height() {
                ", "
            } else {
                "\n"
            };
            let orientation = if rect.width() < rect.height() {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            };
            Some(Label {
                text: format!("{}{separator}{}, {}", record.name, record.size, record.kind),
                color: SYMBOL_LABEL_COLOR,
                orientation,
                anchor: rect.center(),
            })
        }
        TreeNode::Path(group) if group.is_file() => Some(Label {
            text: group.name().to_string(),
            color: FILE_LABEL_COLOR,
            orientation: Orientation::Degrees(FILE_LABEL_DEGREES),
            anchor: rect.center(),
        }),
        TreeNode::Path(_) => None,
    }
}
