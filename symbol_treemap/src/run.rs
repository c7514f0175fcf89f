use std::fs::File;
use std::io::{BufWriter, Write};

use tracing::info;

use crate::args::OutputFormat;
use crate::config::{OutputTarget, RunConfig};
use crate::error::TreemapError;
use crate::hierarchy::{ColorSource, HierarchyBuilder, ROOT_NAME};
use crate::ingest::ingest;
use crate::layout::{LaidOutNode, layout_treemap};
use crate::render::{JsonSink, SvgSink, render_treemap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub symbols: usize,
    pub bytes: u64,
    pub rectangles: usize,
}

/// Ingest, build, lay out and render in one pass. Nothing is written unless
/// every earlier stage succeeded.
pub fn run(config: &RunConfig) -> Result<RunSummary, TreemapError> {
    let source = config.backend.symbol_source();
    let entries = ingest(&config.binary_path, source.as_ref(), &config.ingest)?;

    let colors = config
        .seed
        .map(ColorSource::seeded)
        .unwrap_or_else(ColorSource::from_entropy);
    let tree = HierarchyBuilder::new(colors).build(ROOT_NAME, entries)?;
    let laid_out = layout_treemap(&tree);

    write_output(config, &laid_out)?;
    let summary = RunSummary {
        symbols: tree.leaf_count(),
        bytes: tree.size(),
        rectangles: laid_out.len(),
    };
    info!(
        symbols = summary.symbols,
        bytes = summary.bytes,
        rectangles = summary.rectangles,
        "rendered treemap"
    );
    Ok(summary)
}

pub fn render_to(
    writer: impl Write,
    format: OutputFormat,
    width_px: u32,
    height_px: u32,
    laid_out: &[LaidOutNode<'_>],
) -> Result<(), TreemapError> {
    match format {
        OutputFormat::Svg => {
            render_treemap(laid_out, &mut SvgSink::new(writer, width_px, height_px))
        }
        OutputFormat::Json => render_treemap(laid_out, &mut JsonSink::new(writer)),
    }
}

fn write_output(config: &RunConfig, laid_out: &[LaidOutNode<'_>]) -> Result<(), TreemapError> {
    match &config.output {
        OutputTarget::Stdout => render_to(
            std::io::stdout().lock(),
            config.format,
            config.width_px,
            config.height_px,
            laid_out,
        ),
        OutputTarget::File(path) => {
            let file = File::create(path).map_err(|source| TreemapError::Io {
                path: path.clone(),
                source,
            })?;
            render_to(
                BufWriter::new(file),
                config.format,
                config.width_px,
                config.height_px,
                laid_out,
            )?;
            info!("wrote {}", path.display());
            Ok(())
        }
    }
}
