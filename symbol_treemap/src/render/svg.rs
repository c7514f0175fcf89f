use std::io::Write;

use crate::annotate::Label;
use crate::error::TreemapError;
use crate::model::Rgb;

use super::{DrawingSink, DrawnBox};

const FONT_SIZE_PX: f64 = 10.0;
const LINE_HEIGHT_EM: f64 = 1.2;

/// Standalone SVG document. The unit square maps onto the canvas with its origin
/// at the bottom-left; labels are written after every box so none is covered.
pub struct SvgSink<W: Write> {
    writer: W,
    width_px: f64,
    height_px: f64,
    header_written: bool,
    labels: Vec<Label>,
}

impl<W: Write> SvgSink<W> {
    pub fn new(writer: W, width_px: u32, height_px: u32) -> Self {
        Self {
            writer,
            width_px: f64::from(width_px),
            height_px: f64::from(height_px),
            header_written: false,
            labels: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn to_canvas(&self, point: [f64; 2]) -> (f64, f64) {
        (
            point[0] * self.width_px,
            (1.0 - point[1]) * self.height_px,
        )
    }

    fn write_header(&mut self) -> Result<(), TreemapError> {
        if self.header_written {
            return Ok(());
        }
        writeln!(
            self.writer,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="{FONT_SIZE_PX}">"#,
            w = self.width_px,
            h = self.height_px,
        )?;
        self.header_written = true;
        Ok(())
    }

    fn write_label(&mut self, label: &Label) -> Result<(), TreemapError> {
        let (center_x, center_y) = self.to_canvas(label.anchor);
        let degrees = label.orientation.degrees();
        let transform = if degrees == 0.0 {
            String::new()
        } else {
            format!(r#" transform="rotate({:.3} {center_x:.3} {center_y:.3})""#, -degrees)
        };
        write!(
            self.writer,
            r#"<text x="{center_x:.3}" y="{center_y:.3}" fill="{}" font-weight="bold" text-anchor="middle" dominant-baseline="central"{transform}>"#,
            label.color.to_hex(),
        )?;

        let line_count = label.lines().count();
        let first_offset_em = match line_count {
            0 | 1 => 0.0,
            count => -((count - 1) as f64) * LINE_HEIGHT_EM / 2.0,
        };
        for (index, line) in label.lines().enumerate() {
            let dy = if index == 0 {
                first_offset_em
            } else {
                LINE_HEIGHT_EM
            };
            write!(
                self.writer,
                r#"<tspan x="{center_x:.3}" dy="{dy:.2}em">{}</tspan>"#,
                escape_xml(line)
            )?;
        }
        writeln!(self.writer, "</text>")?;
        Ok(())
    }
}

impl<W: Write> DrawingSink for SvgSink<W> {
    fn draw_box(&mut self, drawn: &DrawnBox<'_>) -> Result<(), TreemapError> {
        self.write_header()?;
        let (left, top) = self.to_canvas([drawn.rect.lower[0], drawn.rect.upper[1]]);
        let width = drawn.rect.width() * self.width_px;
        let height = drawn.rect.height() * self.height_px;
        writeln!(
            self.writer,
            r#"<rect x="{left:.3}" y="{top:.3}" width="{width:.3}" height="{height:.3}" fill="{}" stroke="{}" stroke-width="0.5"><title>{} ({} bytes)</title></rect>"#,
            drawn.fill.to_hex(),
            Rgb::BLACK.to_hex(),
            escape_xml(drawn.name),
            drawn.size,
        )?;
        if let Some(label) = &drawn.label {
            self.labels.push(label.clone());
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), TreemapError> {
        self.write_header()?;
        for label in std::mem::take(&mut self.labels) {
            self.write_label(&label)?;
        }
        writeln!(self.writer, "</svg>")?;
        self.writer.flush()?;
        Ok(())
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
