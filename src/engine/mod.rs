//! The synthesis engine seam.
//!
//! The driver talks to the engine only through [`SynthesisEngine`], one
//! method per pipeline stage. [`YosysEngine`] is the real implementation;
//! tests substitute a recorder.

mod report;
mod yosys;

#[cfg(test)]
pub(crate) mod recording;

use crate::error::Result;
use std::fmt;
use std::path::Path;

pub use yosys::YosysEngine;

/// The fixed stages of a synthesis run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Load,
    Elaborate,
    Proceduralize,
    Optimize,
    ReportStatistics,
    Write,
}

impl Stage {
    /// All stages in the order the pipeline issues them.
    pub const ALL: [Stage; 6] = [
        Stage::Load,
        Stage::Elaborate,
        Stage::Proceduralize,
        Stage::Optimize,
        Stage::ReportStatistics,
        Stage::Write,
    ];

    /// Human-readable stage name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::Elaborate => "elaborate",
            Stage::Proceduralize => "proceduralize",
            Stage::Optimize => "optimize",
            Stage::ReportStatistics => "report statistics",
            Stage::Write => "write",
        }
    }

    /// 1-based position in the pipeline.
    pub fn ordinal(self) -> usize {
        Stage::ALL
            .iter()
            .position(|s| *s == self)
            .map_or(0, |i| i + 1)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the source design is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Postpone elaboration of parametric modules until the hierarchy pass.
    pub defer: bool,
    /// Accept the SystemVerilog dialect.
    pub system_verilog: bool,
}

/// How the resulting design is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Emit the SystemVerilog dialect.
    pub system_verilog: bool,
    /// Drop engine-internal attributes from the output.
    pub strip_attributes: bool,
}

/// What a completed run reports back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cell count taken from the statistics report, when one was produced.
    pub cell_count: Option<u64>,
}

/// An external synthesis engine operating on one in-memory design.
///
/// Stage methods are called in pipeline order. An engine may execute each
/// stage immediately or queue it; queued work must run in [`finish`], and
/// the first failing stage must be reported as that stage.
///
/// [`finish`]: SynthesisEngine::finish
pub trait SynthesisEngine {
    fn load(&mut self, path: &Path, options: LoadOptions) -> Result<()>;

    fn elaborate(&mut self, top: &str, strict: bool) -> Result<()>;

    fn proceduralize(&mut self) -> Result<()>;

    fn optimize(&mut self, purge: bool) -> Result<()>;

    fn report_statistics(&mut self) -> Result<()>;

    fn write(&mut self, path: &Path, options: WriteOptions) -> Result<()>;

    /// Complete the run and return its summary.
    fn finish(&mut self) -> Result<RunSummary>;
}
