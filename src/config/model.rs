//! The resolved run configuration.

use super::source::EnvSource;
use super::types::{
    DECOMPOSE_MEMORY, DEFAULT_YOSYS_CMD, SYNTH_LOG, TOP_MODULE, VERILOG_INPUT, VERILOG_OUTPUT,
    YOSYS_CMD, is_module_name, parse_flag, unquotable_path,
};
use crate::error::{Result, SynthError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for one synthesis run.
///
/// Built once from the environment before any engine call and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthConfig {
    input: PathBuf,
    output: PathBuf,
    top_module: String,
    decompose_memory: bool,
    engine_command: Vec<String>,
    engine_log: Option<PathBuf>,
}

impl SynthConfig {
    /// Resolve the configuration from an environment source.
    ///
    /// Required keys are checked in order (`VERILOG_INPUT`, `VERILOG_OUTPUT`,
    /// `TOP_MODULE`); the first one that is unset aborts resolution.
    pub fn from_env(env: &impl EnvSource) -> Result<Self> {
        let input = required(env, VERILOG_INPUT)?;
        let output = required(env, VERILOG_OUTPUT)?;
        let top_module = required(env, TOP_MODULE)?;

        script_path(VERILOG_INPUT, &input)?;
        script_path(VERILOG_OUTPUT, &output)?;
        if !is_module_name(&top_module) {
            return Err(SynthError::InvalidConfiguration {
                key: TOP_MODULE,
                reason: format!("'{}' is not a Verilog module identifier", top_module),
            });
        }

        let decompose_memory = match optional(env, DECOMPOSE_MEMORY)? {
            None => false,
            Some(raw) => parse_flag(&raw).ok_or_else(|| SynthError::InvalidConfiguration {
                key: DECOMPOSE_MEMORY,
                reason: format!("expected 0/1, true/false, yes/no or on/off, got '{}'", raw),
            })?,
        };

        let engine_command = match optional(env, YOSYS_CMD)? {
            None => vec![DEFAULT_YOSYS_CMD.to_string()],
            Some(raw) => parse_command(&raw)?,
        };

        let engine_log = optional(env, SYNTH_LOG)?
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let config = Self {
            input: PathBuf::from(input),
            output: PathBuf::from(output),
            top_module,
            decompose_memory,
            engine_command,
            engine_log,
        };
        debug!(?config, "resolved configuration");
        Ok(config)
    }

    /// Path of the design to read.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Path the transformed design is written to.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Module the hierarchy is elaborated from.
    pub fn top_module(&self) -> &str {
        &self.top_module
    }

    /// Whether memory decomposition was requested.
    ///
    /// No pipeline stage consults this yet.
    pub fn decompose_memory(&self) -> bool {
        self.decompose_memory
    }

    /// Engine program followed by its leading arguments. Never empty.
    pub fn engine_command(&self) -> &[String] {
        &self.engine_command
    }

    /// Where the engine's full log should be kept, if anywhere.
    pub fn engine_log(&self) -> Option<&Path> {
        self.engine_log.as_deref()
    }
}

fn required(env: &impl EnvSource, key: &'static str) -> Result<String> {
    let value = optional(env, key)?.ok_or(SynthError::MissingConfiguration { key })?;
    if value.trim().is_empty() {
        return Err(SynthError::InvalidConfiguration {
            key,
            reason: "value is empty".to_string(),
        });
    }
    Ok(value)
}

fn script_path(key: &'static str, path: &str) -> Result<()> {
    match unquotable_path(path) {
        Some(reason) => Err(SynthError::InvalidConfiguration {
            key,
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn optional(env: &impl EnvSource, key: &'static str) -> Result<Option<String>> {
    env.get(key).map(|raw| into_string(key, raw)).transpose()
}

fn into_string(key: &'static str, raw: OsString) -> Result<String> {
    raw.into_string()
        .map_err(|raw| SynthError::InvalidConfiguration {
            key,
            reason: format!("value is not valid UTF-8: {:?}", raw),
        })
}

fn parse_command(raw: &str) -> Result<Vec<String>> {
    let args = shell_words::split(raw).map_err(|e| SynthError::InvalidConfiguration {
        key: YOSYS_CMD,
        reason: format!(
            "failed to parse command '{}': {}. Check for unmatched quotes or invalid escape sequences.",
            raw, e
        ),
    })?;

    if args.is_empty() {
        return Err(SynthError::InvalidConfiguration {
            key: YOSYS_CMD,
            reason: "command is empty after parsing".to_string(),
        });
    }
    Ok(args)
}
