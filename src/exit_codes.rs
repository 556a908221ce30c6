//! Exit code constants for the synthrun CLI.
//!
//! - 0: Success
//! - 1: Configuration error (missing or malformed environment variable)
//! - 2: Engine failure (the synthesis run itself failed at some stage)
//! - 3: Environment failure (engine could not be started, local I/O error)

/// Successful execution of the whole pipeline.
pub const SUCCESS: i32 = 0;

/// A required environment variable is missing, or a value could not be parsed.
pub const CONFIG_ERROR: i32 = 1;

/// The synthesis engine reported an error at one of the pipeline stages.
pub const ENGINE_FAILURE: i32 = 2;

/// The engine could not be launched, or scratch files could not be handled.
pub const ENVIRONMENT_FAILURE: i32 = 3;
