use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::TreemapError;
use crate::model::SymbolKind;

use super::{RawSymbol, ResolvedLocation, SymbolSource};

/// Shells out to `readelf -sW` for the symbol table and `addr2line` for locations.
#[derive(Debug, Clone)]
pub struct BinutilsSource {
    readelf: PathBuf,
    addr2line: PathBuf,
}

impl Default for BinutilsSource {
    fn default() -> Self {
        Self {
            readelf: PathBuf::from("readelf"),
            addr2line: PathBuf::from("addr2line"),
        }
    }
}

impl BinutilsSource {
    pub fn with_tools(readelf: impl Into<PathBuf>, addr2line: impl Into<PathBuf>) -> Self {
        Self {
            readelf: readelf.into(),
            addr2line: addr2line.into(),
        }
    }
}

impl SymbolSource for BinutilsSource {
    fn name(&self) -> &'static str {
        "binutils"
    }

    fn read_symbols(&self, binary_path: &Path) -> Result<Vec<RawSymbol>, TreemapError> {
        let output = Command::new(&self.readelf)
            .arg("-sW")
            .arg(binary_path)
            .stdin(Stdio::null())
            .output()
            .map_err(|error| {
                TreemapError::ingestion("readelf", format!("failed to spawn: {error}"))
            })?;
        if !output.status.success() {
            return Err(TreemapError::ingestion(
                "readelf",
                format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }
        parse_readelf_symbols(&String::from_utf8_lossy(&output.stdout))
    }

    fn resolve_locations(
        &self,
        binary_path: &Path,
        symbols: &[RawSymbol],
    ) -> Result<Vec<ResolvedLocation>, TreemapError> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let mut child = Command::new(&self.addr2line)
            .arg("-e")
            .arg(binary_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| {
                TreemapError::ingestion("addr2line", format!("failed to spawn: {error}"))
            })?;

        let Some(mut stdin) = child.stdin.take() else {
            return Err(TreemapError::ingestion("addr2line", "failed to capture stdin"));
        };
        let input = symbols
            .iter()
            .map(|symbol| format!("0x{:x}\n", symbol.address))
            .collect::<String>();
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output().map_err(|error| {
            TreemapError::ingestion("addr2line", format!("failed to wait: {error}"))
        })?;
        writer
            .join()
            .map_err(|_| TreemapError::ingestion("addr2line", "stdin writer panicked"))?
            .map_err(|error| {
                TreemapError::ingestion(
                    "addr2line",
                    format!("failed to write addresses: {error}"),
                )
            })?;

        if !output.status.success() {
            return Err(TreemapError::ingestion(
                "addr2line",
                format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let resolved = String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_addr2line_line)
            .collect::<Vec<_>>();
        if resolved.len() != symbols.len() {
            return Err(TreemapError::ingestion(
                "addr2line",
                format!(
                    "returned {} lines for {} addresses",
                    resolved.len(),
                    symbols.len()
                ),
            ));
        }
        debug!(addresses = symbols.len(), "resolved locations with addr2line");
        Ok(resolved)
    }
}

/// Parses the `.symtab` listing of `readelf -s` output.
///
/// ```text
/// Symbol table '.symtab' contains 3 entries:
///    Num:    Value  Size Type    Bind   Vis      Ndx Name
///    339: 00005968  1694 FUNC    GLOBAL DEFAULT    1 vuprintf
/// ```
pub fn parse_readelf_symbols(text: &str) -> Result<Vec<RawSymbol>, TreemapError> {
    let mut lines = text.lines();
    lines
        .by_ref()
        .find(|line| line.contains("'.symtab'"))
        .ok_or_else(|| {
            TreemapError::ingestion("readelf", "no .symtab section (stripped binary?)")
        })?;
    lines.next();

    let mut symbols = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        let symbol = parse_symbol_line(trimmed).ok_or_else(|| {
            TreemapError::ingestion("readelf", format!("unparseable symbol line: {trimmed}"))
        })?;
        if !symbol.name.is_empty() {
            symbols.push(symbol);
        }
    }
    Ok(symbols)
}

fn parse_symbol_line(line: &str) -> Option<RawSymbol> {
    let fields = line.split_whitespace().collect::<Vec<_>>();
    if fields.len() < 7 || !fields[0].ends_with(':') {
        return None;
    }

    let address = u64::from_str_radix(fields[1], 16).ok()?;
    let size = parse_size(fields[2])?;
    Some(RawSymbol {
        address,
        size,
        kind: SymbolKind::from_symbol_type(fields[3]),
        binding: fields[4].to_string(),
        name: fields.get(7..).map(|rest| rest.join(" ")).unwrap_or_default(),
    })
}

fn parse_size(token: &str) -> Option<u64> {
    match token.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => token.parse::<u64>().ok(),
    }
}

/// Parses one `addr2line` output line, `path:line`, with `??` for unknown parts.
pub fn parse_addr2line_line(line: &str) -> ResolvedLocation {
    let trimmed = line.trim();
    let trimmed = trimmed
        .split_once(" (discriminator")
        .map(|(location, _)| location)
        .unwrap_or(trimmed);

    let (file_text, line_text) = trimmed.rsplit_once(':').unwrap_or((trimmed, ""));
    let file_path = match file_text {
        "" | "??" => None,
        path => Some(path.to_string()),
    };
    ResolvedLocation {
        file_path,
        line_number: line_text.trim().parse::<u32>().ok().filter(|line| *line != 0),
    }
}
