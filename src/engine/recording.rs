//! An engine that records the calls it receives.

use super::{LoadOptions, RunSummary, Stage, SynthesisEngine, WriteOptions};
use crate::error::{Result, SynthError};
use std::path::{Path, PathBuf};

/// One recorded engine call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Load(PathBuf, LoadOptions),
    Elaborate(String, bool),
    Proceduralize,
    Optimize(bool),
    ReportStatistics,
    Write(PathBuf, WriteOptions),
    Finish,
}

impl Call {
    pub(crate) fn stage(&self) -> Option<Stage> {
        match self {
            Call::Load(..) => Some(Stage::Load),
            Call::Elaborate(..) => Some(Stage::Elaborate),
            Call::Proceduralize => Some(Stage::Proceduralize),
            Call::Optimize(_) => Some(Stage::Optimize),
            Call::ReportStatistics => Some(Stage::ReportStatistics),
            Call::Write(..) => Some(Stage::Write),
            Call::Finish => None,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingEngine {
    pub(crate) calls: Vec<Call>,
    pub(crate) fail_at: Option<Stage>,
    pub(crate) cell_count: Option<u64>,
}

impl RecordingEngine {
    pub(crate) fn failing_at(stage: Stage) -> Self {
        Self {
            fail_at: Some(stage),
            ..Default::default()
        }
    }

    pub(crate) fn stages(&self) -> Vec<Stage> {
        self.calls.iter().filter_map(Call::stage).collect()
    }

    fn record(&mut self, call: Call) -> Result<()> {
        let stage = call.stage();
        self.calls.push(call);
        match (stage, self.fail_at) {
            (Some(stage), Some(fail_at)) if stage == fail_at => Err(SynthError::EngineFailure {
                stage,
                detail: format!("ERROR: injected failure in {}", stage),
            }),
            _ => Ok(()),
        }
    }
}

impl SynthesisEngine for RecordingEngine {
    fn load(&mut self, path: &Path, options: LoadOptions) -> Result<()> {
        self.record(Call::Load(path.to_path_buf(), options))
    }

    fn elaborate(&mut self, top: &str, strict: bool) -> Result<()> {
        self.record(Call::Elaborate(top.to_string(), strict))
    }

    fn proceduralize(&mut self) -> Result<()> {
        self.record(Call::Proceduralize)
    }

    fn optimize(&mut self, purge: bool) -> Result<()> {
        self.record(Call::Optimize(purge))
    }

    fn report_statistics(&mut self) -> Result<()> {
        self.record(Call::ReportStatistics)
    }

    fn write(&mut self, path: &Path, options: WriteOptions) -> Result<()> {
        self.record(Call::Write(path.to_path_buf(), options))
    }

    fn finish(&mut self) -> Result<RunSummary> {
        self.record(Call::Finish)?;
        Ok(RunSummary {
            cell_count: self.cell_count,
        })
    }
}
