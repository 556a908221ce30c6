//! Run configuration for synthrun.
//!
//! This module defines the `SynthConfig` record resolved from the process
//! environment. Environment access goes through the `EnvSource` trait so
//! resolution can be exercised against a plain map in tests.

mod model;
mod source;
pub mod types;


// Re-export public API
pub use model::SynthConfig;
pub use source::{EnvSource, ProcessEnv};
pub use types::{DECOMPOSE_MEMORY, SYNTH_LOG, TOP_MODULE, VERILOG_INPUT, VERILOG_OUTPUT, YOSYS_CMD};
