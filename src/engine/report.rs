//! Reading yosys logs and statistics reports.

use super::Stage;
use regex::Regex;
use std::sync::LazyLock;

/// Maximum number of lines kept when engine output is quoted in an error.
pub const DETAIL_MAX_LINES: usize = 20;

/// Maximum characters kept when engine output is quoted in an error.
pub const DETAIL_MAX_CHARS: usize = 2048;

// Top-level section headers ("4. Executing OPT pass"). Nested ones ("4.1.") don't match.
static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\d+)\.\s").expect("Invalid section header regex")
});

// Older yosys prints "Number of cells: N", newer releases print "N cells".
static CELL_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:Number of cells:\s*(\d+)|(\d+)\s+cells)\s*$")
        .expect("Invalid cell count regex")
});

/// Work out which stage a failed run stopped in.
///
/// Yosys opens one numbered top-level section per script command, so the
/// highest section number in the log is the 1-based index of the command
/// that was running. With no section at all the engine failed on the first
/// command.
pub fn attribute_stage(log: &str, stages: &[Stage]) -> Stage {
    let Some(&last) = stages.last() else {
        return Stage::Load;
    };

    let reached = SECTION_HEADER
        .captures_iter(log)
        .filter_map(|caps| caps[1].parse::<usize>().ok())
        .max()
        .unwrap_or(1)
        .max(1);

    stages.get(reached - 1).copied().unwrap_or(last)
}

/// Collect the `ERROR:` lines from engine output.
pub fn error_lines(output: &str) -> Vec<&str> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| line.trim_start().starts_with("ERROR:"))
        .collect()
}

/// Extract the total cell count from a statistics report.
///
/// Reports list per-module counts before the design total, so the last
/// match wins.
pub fn cell_count(report: &str) -> Option<u64> {
    CELL_COUNT
        .captures_iter(report)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .filter_map(|m| m.as_str().parse().ok())
        .last()
}

/// Keep the tail of engine output short enough to quote in an error.
pub(crate) fn truncate_output(output: &str, max_lines: usize, max_chars: usize) -> String {
    let lines: Vec<&str> = output.trim_end().lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    let result = lines[start..].join("\n");

    let char_count = result.chars().count();
    if char_count > max_chars {
        let tail: String = result.chars().skip(char_count - max_chars).collect();
        return format!("...(truncated)...\n{}", tail);
    }

    result
}
