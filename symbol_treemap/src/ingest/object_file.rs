use std::path::Path;

use object::{Object, ObjectSymbol};
use rayon::prelude::*;
use tracing::debug;

use crate::error::TreemapError;
use crate::model::SymbolKind;

use super::{RawSymbol, ResolvedLocation, SymbolSource};

/// Reads the symbol table with `object` and resolves lines with `addr2line`, in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectFileSource;

impl SymbolSource for ObjectFileSource {
    fn name(&self) -> &'static str {
        "object"
    }

    fn read_symbols(&self, binary_path: &Path) -> Result<Vec<RawSymbol>, TreemapError> {
        let data = std::fs::read(binary_path).map_err(|source| TreemapError::Io {
            path: binary_path.to_path_buf(),
            source,
        })?;
        let file = object::File::parse(&*data).map_err(|error| {
            TreemapError::ingestion(
                self.name(),
                format!("failed to parse {}: {error}", binary_path.display()),
            )
        })?;

        let symbols = raw_symbols(file.symbols());
        if !symbols.is_empty() {
            return Ok(symbols);
        }
        debug!("static symbol table is empty; using dynamic symbols");
        Ok(raw_symbols(file.dynamic_symbols()))
    }

    fn resolve_locations(
        &self,
        binary_path: &Path,
        symbols: &[RawSymbol],
    ) -> Result<Vec<ResolvedLocation>, TreemapError> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let chunk_size = symbols
            .len()
            .div_ceil(rayon::current_num_threads().max(1))
            .max(1);
        let chunks = symbols
            .par_chunks(chunk_size)
            .map(|chunk| resolve_chunk(binary_path, chunk))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(chunks.into_iter().flatten().collect())
    }
}

fn raw_symbols<'data, S>(symbols: impl Iterator<Item = S>) -> Vec<RawSymbol>
where
    S: ObjectSymbol<'data>,
{
    symbols
        .filter_map(|symbol| {
            let name = match symbol.name() {
                Ok(name) => name.to_string(),
                Err(_) => String::from_utf8_lossy(symbol.name_bytes().ok()?).to_string(),
            };
            if name.is_empty() {
                return None;
            }
            Some(RawSymbol {
                address: symbol.address(),
                size: symbol.size(),
                kind: symbol_kind(symbol.kind()),
                binding: binding_of(&symbol).to_string(),
                name,
            })
        })
        .collect()
}

fn symbol_kind(kind: object::SymbolKind) -> SymbolKind {
    match kind {
        object::SymbolKind::Text => SymbolKind::Function,
        object::SymbolKind::Data => SymbolKind::Object,
        _ => SymbolKind::Other,
    }
}

fn binding_of<'data>(symbol: &impl ObjectSymbol<'data>) -> &'static str {
    if symbol.is_weak() {
        "WEAK"
    } else if symbol.is_global() {
        "GLOBAL"
    } else {
        "LOCAL"
    }
}

fn resolve_chunk(
    binary_path: &Path,
    chunk: &[RawSymbol],
) -> Result<Vec<ResolvedLocation>, TreemapError> {
    let loader = addr2line::Loader::new(binary_path).map_err(|error| {
        TreemapError::ingestion(
            "addr2line",
            format!("failed to load {}: {error}", binary_path.display()),
        )
    })?;
    let base = loader.relative_address_base();

    Ok(chunk
        .iter()
        .map(|symbol| resolve_one(&loader, base, symbol.address))
        .collect())
}

fn resolve_one(loader: &addr2line::Loader, base: u64, address: u64) -> ResolvedLocation {
    for probe in [address, address.saturating_sub(base)] {
        let Ok(Some(location)) = loader.find_location(probe) else {
            continue;
        };
        if let Some(file) = location.file {
            return ResolvedLocation {
                file_path: Some(file.to_string()),
                line_number: location.line,
            };
        }
    }
    ResolvedLocation::default()
}
