use std::path::{Path, PathBuf};

use crate::args::{Backend, Cli, OutputFormat};
use crate::error::TreemapError;
use crate::ingest::{BinutilsSource, IngestOptions, ObjectFileSource, SymbolFilter, SymbolSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn from_path(path: &Path) -> Self {
        if path == Path::new("-") {
            Self::Stdout
        } else {
            Self::File(path.to_path_buf())
        }
    }
}

/// Everything one run needs, validated.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub binary_path: PathBuf,
    pub ingest: IngestOptions,
    pub backend: Backend,
    pub output: OutputTarget,
    pub format: OutputFormat,
    pub seed: Option<u64>,
    pub width_px: u32,
    pub height_px: u32,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, TreemapError> {
        let filter = SymbolFilter::new(cli.minimum_size, &cli.function_regex, &cli.object_regex)?;
        Ok(Self {
            binary_path: cli.filename.clone(),
            ingest: IngestOptions {
                filter,
                demangle: !cli.raw_names,
            },
            backend: cli.backend,
            output: OutputTarget::from_path(&cli.output),
            format: cli.format,
            seed: cli.seed,
            width_px: cli.width,
            height_px: cli.height,
        })
    }
}

impl Backend {
    pub fn symbol_source(self) -> Box<dyn SymbolSource> {
        match self {
            Backend::Object => Box::new(ObjectFileSource),
            Backend::Binutils => Box::new(BinutilsSource::default()),
        }
    }
}
