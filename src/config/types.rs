//! Environment variable names and value parsing for the run configuration.

use regex::Regex;
use std::sync::LazyLock;

/// Path to the source hardware design.
pub const VERILOG_INPUT: &str = "VERILOG_INPUT";

/// Path the transformed design is written to.
pub const VERILOG_OUTPUT: &str = "VERILOG_OUTPUT";

/// Name of the module the hierarchy is elaborated from.
pub const TOP_MODULE: &str = "TOP_MODULE";

/// Memory decomposition flag. Resolved but not yet consumed by the pipeline.
pub const DECOMPOSE_MEMORY: &str = "DECOMPOSE_MEMORY";

/// Engine command line, split with shell-word rules.
pub const YOSYS_CMD: &str = "YOSYS_CMD";

/// Optional path that receives the engine's full log.
pub const SYNTH_LOG: &str = "SYNTH_LOG";

/// Engine command used when `YOSYS_CMD` is unset.
pub const DEFAULT_YOSYS_CMD: &str = "yosys";

// Plain identifier, or an escaped one that stays a single script token.
static MODULE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:[A-Za-z_][A-Za-z0-9_$]*|\\[^\s;#"]+)$"#)
        .expect("Invalid module name regex")
});

/// Check that a top module name is a Verilog identifier.
pub fn is_module_name(name: &str) -> bool {
    MODULE_NAME.is_match(name)
}

/// Why a path cannot be quoted into an engine script, if it can't.
pub fn unquotable_path(path: &str) -> Option<&'static str> {
    if path.contains('"') {
        Some("path must not contain '\"'")
    } else if path.contains(['\n', '\r']) {
        Some("path must not contain line breaks")
    } else {
        None
    }
}

/// Parse a boolean-ish flag value.
///
/// Accepts non-negative integers (non-zero is enabled) and the usual
/// true/false, yes/no, on/off words in any case. An empty value is disabled.
pub fn parse_flag(raw: &str) -> Option<bool> {
    let value = raw.trim();
    if value.is_empty() {
        return Some(false);
    }
    if value.bytes().all(|b| b.is_ascii_digit()) {
        return Some(value.bytes().any(|b| b != b'0'));
    }
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
