//! The synthesis pipeline driver.
//!
//! Resolves configuration first, then issues the fixed stage sequence
//! against an engine. The first error ends the run; nothing is retried and
//! partial output is left as the engine produced it.

use crate::config::{EnvSource, SynthConfig};
use crate::engine::{LoadOptions, RunSummary, SynthesisEngine, WriteOptions, YosysEngine};
use crate::error::Result;
use tracing::{debug, info};

/// Read mode for the source design: deferred elaboration, SystemVerilog.
pub const LOAD_OPTIONS: LoadOptions = LoadOptions {
    defer: true,
    system_verilog: true,
};

/// Output mode: SystemVerilog with engine attributes stripped.
pub const WRITE_OPTIONS: WriteOptions = WriteOptions {
    system_verilog: true,
    strip_attributes: true,
};

/// Issue the six pipeline stages in order, then complete the run.
pub fn run_pipeline(config: &SynthConfig, engine: &mut impl SynthesisEngine) -> Result<RunSummary> {
    if config.decompose_memory() {
        debug!("DECOMPOSE_MEMORY is set but no stage consumes it");
    }

    engine.load(config.input(), LOAD_OPTIONS)?;
    engine.elaborate(config.top_module(), true)?;
    engine.proceduralize()?;
    engine.optimize(true)?;
    engine.report_statistics()?;
    engine.write(config.output(), WRITE_OPTIONS)?;

    engine.finish()
}

/// Resolve configuration from `env` and run the pipeline through yosys.
///
/// The engine is only constructed once configuration has resolved.
pub fn run(env: &impl EnvSource) -> Result<RunSummary> {
    let config = SynthConfig::from_env(env)?;
    info!(
        input = %config.input().display(),
        output = %config.output().display(),
        top = config.top_module(),
        "starting synthesis"
    );

    let mut engine = YosysEngine::new(config.engine_command(), config.engine_log())?;
    let summary = run_pipeline(&config, &mut engine)?;

    info!(
        output = %config.output().display(),
        cells = ?summary.cell_count,
        "wrote synthesized design"
    );
    Ok(summary)
}
