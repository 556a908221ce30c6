//! CLI argument parsing for synthrun.
//!
//! Uses clap derive macros. The run itself is configured through
//! environment variables only; the command line carries `--help` and
//! `--version`.

use clap::Parser;

/// Synthrun: read, elaborate, optimize and rewrite a Verilog design with yosys.
///
/// Environment:
///   VERILOG_INPUT     path of the design to read (required)
///   VERILOG_OUTPUT    path the rewritten design is written to (required)
///   TOP_MODULE        module the hierarchy is elaborated from (required)
///   DECOMPOSE_MEMORY  memory decomposition flag, 0 or 1 (default 0, not yet used)
///   YOSYS_CMD         engine command line (default `yosys`)
///   SYNTH_LOG         file that receives the full engine log
///   RUST_LOG          diagnostic log filter (default `synthrun=info`)
#[derive(Parser, Debug)]
#[command(name = "synthrun")]
#[command(author, version, verbatim_doc_comment)]
pub struct Cli {}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
