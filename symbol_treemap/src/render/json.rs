use std::io::Write;

use crate::annotate::{Label, NodeRole};
use crate::error::TreemapError;
use crate::layout::Rect;
use crate::model::Rgb;

use super::{DrawingSink, DrawnBox};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
struct JsonBox {
    name: String,
    role: NodeRole,
    depth: usize,
    size: u64,
    rect: Rect,
    fill: Rgb,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<Label>,
}

/// Writes every drawn box as one element of a JSON array, for renderers living
/// outside this process.
pub struct JsonSink<W: Write> {
    writer: W,
    boxes: Vec<JsonBox>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            boxes: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DrawingSink for JsonSink<W> {
    fn draw_box(&mut self, drawn: &DrawnBox<'_>) -> Result<(), TreemapError> {
        self.boxes.push(JsonBox {
            name: drawn.name.to_string(),
            role: drawn.role,
            depth: drawn.depth,
            size: drawn.size,
            rect: drawn.rect,
            fill: drawn.fill,
            label: drawn.label.clone(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<(), TreemapError> {
        serde_json::to_writer_pretty(&mut self.writer, &self.boxes)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
