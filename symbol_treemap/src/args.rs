use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(name = "symbol_treemap")]
#[command(about = "Display the static memory of an ELF file in a treemap", long_about = None)]
pub struct Cli {
    /// The ELF file to parse.
    #[arg(default_value = "a.out")]
    pub filename: PathBuf,

    /// Print additional documentation and exit.
    #[arg(short = 'd', long)]
    pub documentation: bool,

    /// Regular expression for function path filtering.
    #[arg(short = 'f', long, default_value = "")]
    pub function_regex: String,

    /// Regular expression for object path filtering.
    #[arg(short = 'o', long, default_value = "")]
    pub object_regex: String,

    /// Minimum size for all types; smaller symbols are ignored entirely.
    #[arg(short = 'm', long, default_value_t = 1)]
    pub minimum_size: u64,

    /// Where to write the rendered treemap (`-` for stdout).
    #[arg(long, default_value = "treemap.svg")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// How symbols and source locations are read.
    #[arg(long, value_enum, default_value_t = Backend::Object)]
    pub backend: Backend,

    /// Seed for node colors; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 1200, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    #[arg(long, default_value_t = 1200, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Keep mangled symbol names.
    #[arg(long)]
    pub raw_names: bool,

    /// More diagnostics on stderr (repeat for more).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Svg,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Parse the binary and its DWARF in-process.
    Object,
    /// Run `readelf` and `addr2line`.
    Binutils,
}

pub fn documentation_text() -> &'static str {
    r#"
Regular expression examples:
  --function-regex "xxxxxx"    # (probably) filter out functions completely
  --function-regex "net|core"  # display any function that comes from net or core
  --object-regex "\?\?"        # display objects whose source could not be looked up

Minimum size:
  The minimum-size argument is taken as an inclusion hurdle, i.e.
  objects/functions below that size are not taken into consideration at all.
"#
}
