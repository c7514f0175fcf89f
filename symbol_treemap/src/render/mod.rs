//! Drawing surfaces for a laid-out treemap.
//!
//! The layout hands every node to a [`DrawingSink`] in depth-first order, parents
//! before children, together with its fill color and optional label.

mod json;
mod svg;

pub use json::JsonSink;
pub use svg::SvgSink;

use crate::annotate::{Label, NodeRole, annotate};
use crate::error::TreemapError;
use crate::layout::{LaidOutNode, Rect};
use crate::model::Rgb;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnBox<'a> {
    pub name: &'a str,
    pub role: NodeRole,
    pub depth: usize,
    pub size: u64,
    pub rect: Rect,
    pub fill: Rgb,
    pub label: Option<Label>,
}

pub trait DrawingSink {
    fn draw_box(&mut self, drawn: &DrawnBox<'_>) -> Result<(), TreemapError>;

    /// Called once after the last box.
    fn finish(&mut self) -> Result<(), TreemapError>;
}

pub fn drawn_box<'a>(entry: &LaidOutNode<'a>) -> DrawnBox<'a> {
    DrawnBox {
        name: entry.node.name(),
        role: NodeRole::of(entry.node),
        depth: entry.depth,
        size: entry.node.size(),
        rect: entry.rect,
        fill: entry.node.color(),
        label: annotate(entry.node, entry.rect),
    }
}

pub fn render_treemap(
    laid_out: &[LaidOutNode<'_>],
    sink: &mut dyn DrawingSink,
) -> Result<(), TreemapError> {
    for entry in laid_out {
        sink.draw_box(&drawn_box(entry))?;
    }
    sink.finish()
}
