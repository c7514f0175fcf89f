//! Turns a binary's symbol table and debug line info into [`PathEntries`].

mod binutils;
mod object_file;

use std::path::Path;

use regex::Regex;
use tracing::{debug, info};

use crate::error::TreemapError;
use crate::hierarchy::PathEntries;
use crate::model::{SymbolKind, SymbolRecord};

pub use binutils::{BinutilsSource, parse_addr2line_line, parse_readelf_symbols};
pub use object_file::ObjectFileSource;

/// Path given to symbols whose address has no line information.
pub const UNKNOWN_PATH: &str = "??";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSymbol {
    pub address: u64,
    pub size: u64,
    pub kind: SymbolKind,
    pub binding: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedLocation {
    pub file_path: Option<String>,
    pub line_number: Option<u32>,
}

/// Where symbols and their source locations come from.
pub trait SymbolSource {
    fn name(&self) -> &'static str;

    fn read_symbols(&self, binary_path: &Path) -> Result<Vec<RawSymbol>, TreemapError>;

    /// One location per input symbol, in input order.
    fn resolve_locations(
        &self,
        binary_path: &Path,
        symbols: &[RawSymbol],
    ) -> Result<Vec<ResolvedLocation>, TreemapError>;
}

/// Inclusion rules: a size hurdle, then a path pattern chosen by symbol kind.
#[derive(Debug, Clone)]
pub struct SymbolFilter {
    minimum_size: u64,
    function_pattern: Regex,
    object_pattern: Regex,
}

impl SymbolFilter {
    pub fn new(
        minimum_size: u64,
        function_regex: &str,
        object_regex: &str,
    ) -> Result<Self, TreemapError> {
        Ok(Self {
            minimum_size,
            function_pattern: compile_pattern(function_regex)?,
            object_pattern: compile_pattern(object_regex)?,
        })
    }

    pub fn minimum_size(&self) -> u64 {
        self.minimum_size
    }

    pub fn admits_size(&self, size: u64) -> bool {
        size >= self.minimum_size
    }

    /// Symbols of any other kind always pass.
    pub fn admits_path(&self, kind: SymbolKind, path: &str) -> bool {
        match kind {
            SymbolKind::Function => self.function_pattern.is_match(path),
            SymbolKind::Object => self.object_pattern.is_match(path),
            SymbolKind::Other => true,
        }
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, TreemapError> {
    Regex::new(pattern).map_err(|source| TreemapError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub filter: SymbolFilter,
    pub demangle: bool,
}

pub fn ingest(
    binary_path: &Path,
    source: &dyn SymbolSource,
    options: &IngestOptions,
) -> Result<PathEntries, TreemapError> {
    if !binary_path.is_file() {
        return Err(TreemapError::InputNotFound {
            path: binary_path.to_path_buf(),
        });
    }

    let symbols = source.read_symbols(binary_path)?;
    let symbol_count = symbols.len();
    let sized = symbols
        .into_iter()
        .filter(|symbol| options.filter.admits_size(symbol.size))
        .collect::<Vec<_>>();
    debug!(
        backend = source.name(),
        symbols = symbol_count,
        below_minimum_size = symbol_count - sized.len(),
        "read symbol table"
    );

    let locations = source.resolve_locations(binary_path, &sized)?;
    if locations.len() != sized.len() {
        return Err(TreemapError::ingestion(
            source.name(),
            format!(
                "resolved {} locations for {} symbols",
                locations.len(),
                sized.len()
            ),
        ));
    }

    let mut entries = PathEntries::new();
    let mut excluded_by_pattern = 0usize;
    for (symbol, location) in sized.into_iter().zip(locations) {
        let path = normalize_source_path(location.file_path.as_deref().unwrap_or(UNKNOWN_PATH));
        if !options.filter.admits_path(symbol.kind, &path) {
            excluded_by_pattern += 1;
            continue;
        }

        let name = if options.demangle {
            demangle_symbol(&symbol.name)
        } else {
            symbol.name
        };
        let line = location
            .line_number
            .map(|line| line.to_string())
            .unwrap_or_else(|| "?".to_string());
        entries.entry(path).or_default().push(SymbolRecord {
            name,
            line,
            size: symbol.size,
            kind: symbol.kind,
            binding: symbol.binding,
        });
    }

    info!(
        paths = entries.len(),
        symbols = entries.values().map(Vec::len).sum::<usize>(),
        excluded_by_pattern,
        "ingested {}",
        binary_path.display()
    );
    Ok(entries)
}

/// Resolves `.` and `..`, collapses repeated separators and drops the leading `/`.
///
/// A `..` with nothing left to pop is kept for relative paths and dropped for
/// absolute ones.
pub fn normalize_source_path(raw: &str) -> String {
    let is_absolute = raw.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if is_absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }
    segments.join("/")
}

pub fn demangle_symbol(raw_symbol_name: &str) -> String {
    let trimmed = raw_symbol_name.trim_start_matches('_');
    if let Ok(demangled) = rustc_demangle::try_demangle(trimmed) {
        return format!("{demangled:#}");
    }
    raw_symbol_name.to_string()
}
