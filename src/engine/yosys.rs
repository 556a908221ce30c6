//! Yosys-backed synthesis engine.
//!
//! Stage calls are queued as yosys script commands. `finish` writes the
//! script to a scratch directory and runs yosys once over it, so every stage
//! works on the same in-memory design and yosys stops at the first command
//! that errors.

use super::report::{
    DETAIL_MAX_CHARS, DETAIL_MAX_LINES, attribute_stage, cell_count, error_lines,
    truncate_output,
};
use super::{LoadOptions, RunSummary, Stage, SynthesisEngine, WriteOptions};
use crate::error::{Result, SynthError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Instant;
use tempfile::TempDir;
use tracing::{debug, info, warn};

const SCRIPT_FILE: &str = "synth.ys";
const STATS_FILE: &str = "stat.txt";
const LOG_FILE: &str = "yosys.log";

/// Runs the pipeline through a yosys executable.
#[derive(Debug)]
pub struct YosysEngine {
    command: Vec<String>,
    log_path: Option<PathBuf>,
    scratch: TempDir,
    commands: Vec<(Stage, String)>,
}

impl YosysEngine {
    /// Create an engine that invokes `command` (program plus leading
    /// arguments). The full engine log goes to `log_path` when given, and
    /// to the scratch directory otherwise.
    pub fn new(command: &[String], log_path: Option<&Path>) -> Result<Self> {
        if command.is_empty() {
            return Err(SynthError::EngineUnavailable {
                command: String::new(),
                detail: "engine command is empty".to_string(),
            });
        }

        let scratch = tempfile::Builder::new()
            .prefix("synthrun-")
            .tempdir()
            .map_err(|e| {
                SynthError::io("failed to create scratch directory", std::env::temp_dir(), e)
            })?;

        Ok(Self {
            command: command.to_vec(),
            log_path: log_path.map(Path::to_path_buf),
            scratch,
            commands: Vec::new(),
        })
    }

    /// The script queued so far, one command per line.
    pub fn script(&self) -> String {
        let mut script = String::new();
        for (_, line) in &self.commands {
            script.push_str(line);
            script.push('\n');
        }
        script
    }

    fn push(&mut self, stage: Stage, line: String) -> Result<()> {
        debug!(%stage, command = %line, "queued engine command");
        self.commands.push((stage, line));
        Ok(())
    }

    fn stats_path(&self) -> PathBuf {
        self.scratch.path().join(STATS_FILE)
    }

    fn log_path(&self) -> PathBuf {
        self.log_path
            .clone()
            .unwrap_or_else(|| self.scratch.path().join(LOG_FILE))
    }

    fn display_command(&self) -> String {
        shell_words::join(&self.command)
    }

    fn stages(&self) -> Vec<Stage> {
        self.commands.iter().map(|(stage, _)| *stage).collect()
    }

    fn spawn(&self, script_path: &Path, log_path: &Path) -> Result<Output> {
        let program = &self.command[0];
        let leading_args = &self.command[1..];

        Command::new(program)
            .args(leading_args)
            .arg("-q")
            .arg("-l")
            .arg(log_path)
            .arg("-s")
            .arg(script_path)
            .output()
            .map_err(|e| SynthError::EngineUnavailable {
                command: self.display_command(),
                detail: format!("{}. Ensure yosys is installed and in PATH, or set YOSYS_CMD", e),
            })
    }

    fn failure(&self, output: &Output, log_path: &Path) -> SynthError {
        let log = std::fs::read(log_path).unwrap_or_default();
        let log = String::from_utf8_lossy(&log);
        let stage = attribute_stage(&log, &self.stages());

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);

        let mut errors = error_lines(&log);
        if errors.is_empty() {
            errors = error_lines(&stderr);
        }

        let detail = if !errors.is_empty() {
            errors.join("\n")
        } else if !stderr.trim().is_empty() {
            truncate_output(&stderr, DETAIL_MAX_LINES, DETAIL_MAX_CHARS)
        } else if !stdout.trim().is_empty() {
            truncate_output(&stdout, DETAIL_MAX_LINES, DETAIL_MAX_CHARS)
        } else {
            match output.status.code() {
                Some(code) => format!("engine exited with code {}", code),
                None => "engine was terminated by a signal".to_string(),
            }
        };

        SynthError::EngineFailure { stage, detail }
    }

    fn publish_statistics(&self) -> Result<Option<u64>> {
        let stats_path = self.stats_path();
        if !self.stages().contains(&Stage::ReportStatistics) {
            return Ok(None);
        }

        let report = std::fs::read_to_string(&stats_path)
            .map_err(|e| SynthError::io("failed to read statistics report", &stats_path, e))?;

        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(report.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| SynthError::io("failed to write statistics report", "<stdout>", e))?;

        Ok(cell_count(&report))
    }
}

impl SynthesisEngine for YosysEngine {
    fn load(&mut self, path: &Path, options: LoadOptions) -> Result<()> {
        let mut line = String::from("read_verilog");
        if options.defer {
            line.push_str(" -defer");
        }
        if options.system_verilog {
            line.push_str(" -sv");
        }
        line.push(' ');
        line.push_str(&quote_path(path));
        self.push(Stage::Load, line)
    }

    fn elaborate(&mut self, top: &str, strict: bool) -> Result<()> {
        let line = if strict {
            format!("hierarchy -check -top {}", top)
        } else {
            format!("hierarchy -top {}", top)
        };
        self.push(Stage::Elaborate, line)
    }

    fn proceduralize(&mut self) -> Result<()> {
        self.push(Stage::Proceduralize, "proc".to_string())
    }

    fn optimize(&mut self, purge: bool) -> Result<()> {
        let line = if purge { "opt -purge" } else { "opt" };
        self.push(Stage::Optimize, line.to_string())
    }

    fn report_statistics(&mut self) -> Result<()> {
        let line = format!("tee -o {} stat", quote_path(&self.stats_path()));
        self.push(Stage::ReportStatistics, line)
    }

    fn write(&mut self, path: &Path, options: WriteOptions) -> Result<()> {
        let mut line = String::from("write_verilog");
        if options.system_verilog {
            line.push_str(" -sv");
        }
        if options.strip_attributes {
            line.push_str(" -noattr");
        }
        line.push(' ');
        line.push_str(&quote_path(path));
        self.push(Stage::Write, line)
    }

    fn finish(&mut self) -> Result<RunSummary> {
        let script_path = self.scratch.path().join(SCRIPT_FILE);
        std::fs::write(&script_path, self.script())
            .map_err(|e| SynthError::io("failed to write engine script", &script_path, e))?;

        let log_path = self.log_path();
        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SynthError::io("failed to create engine log directory", parent, e))?;
        }
        // A log left by an earlier run would be misread if the engine dies before writing.
        match std::fs::remove_file(&log_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(SynthError::io(
                    "failed to remove stale engine log",
                    &log_path,
                    e,
                ));
            }
        }

        info!(
            command = %self.display_command(),
            script = %script_path.display(),
            log = %log_path.display(),
            "running synthesis engine"
        );
        let start = Instant::now();
        let output = self.spawn(&script_path, &log_path)?;
        let elapsed = start.elapsed();

        if !output.status.success() {
            let err = self.failure(&output, &log_path);
            warn!(?elapsed, error = %err, "synthesis engine failed");
            return Err(err);
        }

        for line in String::from_utf8_lossy(&output.stdout)
            .lines()
            .chain(String::from_utf8_lossy(&output.stderr).lines())
            .filter(|l| !l.trim().is_empty())
        {
            warn!(target: "synthrun::yosys", "{}", line);
        }

        let cell_count = self.publish_statistics()?;
        info!(?elapsed, cells = ?cell_count, "synthesis engine finished");

        Ok(RunSummary { cell_count })
    }
}

/// Quote a path for a yosys script argument.
fn quote_path(path: &Path) -> String {
    format!("\"{}\"", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> YosysEngine {
        YosysEngine::new(&["yosys".to_string()], None).unwrap()
    }

    fn queue_full_pipeline(engine: &mut YosysEngine) {
        engine
            .load(
                Path::new("/tmp/a.sv"),
                LoadOptions {
                    defer: true,
                    system_verilog: true,
                },
            )
            .unwrap();
        engine.elaborate("core", true).unwrap();
        engine.proceduralize().unwrap();
        engine.optimize(true).unwrap();
        engine.report_statistics().unwrap();
        engine
            .write(
                Path::new("/tmp/b.sv"),
                WriteOptions {
                    system_verilog: true,
                    strip_attributes: true,
                },
            )
            .unwrap();
    }

    #[test]
    fn renders_full_pipeline_script() {
        let mut engine = engine();
        queue_full_pipeline(&mut engine);

        let stats = engine.stats_path();
        let expected = format!(
            "read_verilog -defer -sv \"/tmp/a.sv\"\n\
             hierarchy -check -top core\n\
             proc\n\
             opt -purge\n\
             tee -o \"{}\" stat\n\
             write_verilog -sv -noattr \"/tmp/b.sv\"\n",
            stats.display()
        );
        assert_eq!(engine.script(), expected);
        assert_eq!(engine.stages(), Stage::ALL.to_vec());
    }

    #[test]
    fn renders_relaxed_options() {
        let mut engine = engine();
        engine
            .load(
                Path::new("design with space.v"),
                LoadOptions {
                    defer: false,
                    system_verilog: false,
                },
            )
            .unwrap();
        engine.elaborate("top", false).unwrap();
        engine.optimize(false).unwrap();

        assert_eq!(
            engine.script(),
            "read_verilog \"design with space.v\"\nhierarchy -top top\nopt\n"
        );
    }

    #[test]
    fn log_defaults_to_scratch_directory() {
        let engine = engine();
        assert!(engine.log_path().starts_with(engine.scratch.path()));

        let engine =
            YosysEngine::new(&["yosys".to_string()], Some(Path::new("/var/log/s.log"))).unwrap();
        assert_eq!(engine.log_path(), PathBuf::from("/var/log/s.log"));
    }

    #[test]
    fn empty_command_is_rejected() {
        let err = YosysEngine::new(&[], None).unwrap_err();
        assert!(matches!(err, SynthError::EngineUnavailable { .. }));
    }

    #[test]
    fn missing_binary_is_engine_unavailable() {
        let mut engine =
            YosysEngine::new(&["nonexistent_synth_engine_xyz_123".to_string()], None).unwrap();
        engine.proceduralize().unwrap();

        let err = engine.finish().unwrap_err();
        assert!(matches!(err, SynthError::EngineUnavailable { .. }));
        assert!(err.to_string().contains("nonexistent_synth_engine_xyz_123"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_engine_reports_stage_from_log() {
        // Stand-in engine: `sh -c <body> yosys -q -l <log> -s <script>`,
        // so the log path is $3.
        let body = "printf '1. Executing Verilog-2005 frontend\\n2. Executing HIERARCHY pass\\nERROR: Module `core'\"'\"' not found!\\n' > \"$3\"; exit 1";
        let mut engine = YosysEngine::new(
            &["sh".to_string(), "-c".to_string(), body.to_string(), "yosys".to_string()],
            None,
        )
        .unwrap();
        queue_full_pipeline(&mut engine);

        match engine.finish() {
            Err(SynthError::EngineFailure { stage, detail }) => {
                assert_eq!(stage, Stage::Elaborate);
                assert_eq!(detail, "ERROR: Module `core' not found!");
            }
            other => panic!("expected EngineFailure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn failing_engine_with_non_utf8_log_keeps_stage_and_error() {
        let body = "printf '1. Executing Verilog-2005 frontend\\n\\377\\n2. Executing HIERARCHY pass\\nERROR: Module not found!\\n' > \"$3\"; exit 1";
        let mut engine = YosysEngine::new(
            &["sh".to_string(), "-c".to_string(), body.to_string(), "yosys".to_string()],
            None,
        )
        .unwrap();
        queue_full_pipeline(&mut engine);

        match engine.finish() {
            Err(SynthError::EngineFailure { stage, detail }) => {
                assert_eq!(stage, Stage::Elaborate);
                assert_eq!(detail, "ERROR: Module not found!");
            }
            other => panic!("expected EngineFailure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn stale_log_is_not_read_after_early_exit() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("synth.log");
        std::fs::write(
            &log,
            "1. x\n2. x\n3. x\n4. x\n5. x\n6. Executing Verilog backend.\nERROR: old run\n",
        )
        .unwrap();

        let mut engine = YosysEngine::new(
            &["sh".to_string(), "-c".to_string(), "exit 1".to_string(), "yosys".to_string()],
            Some(log.as_path()),
        )
        .unwrap();
        queue_full_pipeline(&mut engine);

        match engine.finish() {
            Err(SynthError::EngineFailure { stage, detail }) => {
                assert_eq!(stage, Stage::Load);
                assert_eq!(detail, "engine exited with code 1");
            }
            other => panic!("expected EngineFailure, got {:?}", other),
        }
        assert!(!log.exists());
    }

    #[cfg(unix)]
    #[test]
    fn failing_engine_without_log_falls_back_to_exit_code() {
        let mut engine = YosysEngine::new(
            &["sh".to_string(), "-c".to_string(), "exit 3".to_string(), "yosys".to_string()],
            None,
        )
        .unwrap();
        queue_full_pipeline(&mut engine);

        match engine.finish() {
            Err(SynthError::EngineFailure { stage, detail }) => {
                assert_eq!(stage, Stage::Load);
                assert_eq!(detail, "engine exited with code 3");
            }
            other => panic!("expected EngineFailure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn successful_engine_returns_cell_count() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("logs").join("synth.log");

        let mut engine = YosysEngine::new(
            &["sh".to_string(), "-c".to_string(), "exit 0".to_string(), "yosys".to_string()],
            Some(log.as_path()),
        )
        .unwrap();
        queue_full_pipeline(&mut engine);
        std::fs::write(
            engine.stats_path(),
            "=== core ===\n\n   Number of cells:                 42\n",
        )
        .unwrap();

        let summary = engine.finish().unwrap();
        assert_eq!(summary.cell_count, Some(42));
        assert!(log.parent().unwrap().exists());
        assert!(engine.scratch.path().join(SCRIPT_FILE).exists());
    }
}
