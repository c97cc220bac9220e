//! The per-pair build loop.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossbuild_matrix::BuildPair;
use tracing::debug;

use crate::error::{ExecError, Result};
use crate::output::output_path;
use crate::runner::{CommandRunner, Invocation, ProcessRunner};

/// How the external compiler is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecConfig {
    /// Compiler program, invoked as `{compiler} build -o {output} {source}`.
    pub compiler: String,
    /// Variable carrying the target OS.
    pub os_var: String,
    /// Variable carrying the target architecture.
    pub arch_var: String,
    /// Directory the compiler runs in; outputs land under `{work_dir}/{version}/`.
    pub work_dir: PathBuf,
    /// Per-pair limit. `None` waits for the compiler indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            compiler: "go".to_string(),
            os_var: "GOOS".to_string(),
            arch_var: "GOARCH".to_string(),
            work_dir: PathBuf::from("."),
            timeout: None,
        }
    }
}

/// Result of building one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub pair: BuildPair,
    /// Output path relative to the working directory.
    pub output: PathBuf,
    /// Failure detail; `None` on success.
    pub error: Option<String>,
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(
                f,
                "[+] Build {} - {} .... success!",
                self.pair.os, self.pair.arch
            ),
            Some(detail) => write!(
                f,
                "[x] Build {} - {} .... Error! {detail}",
                self.pair.os, self.pair.arch
            ),
        }
    }
}

/// Runs one compiler invocation per build pair, strictly in sequence.
#[derive(Debug, Clone)]
pub struct Executor<R = ProcessRunner> {
    config: ExecConfig,
    runner: R,
}

impl Executor<ProcessRunner> {
    /// An executor that spawns real processes.
    pub fn with_config(config: ExecConfig) -> Self {
        Self::new(config, ProcessRunner)
    }
}

impl<R: CommandRunner> Executor<R> {
    pub fn new(config: ExecConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Describe the compiler call for one pair without running it.
    pub fn invocation(&self, pair: BuildPair, source: &Path, output: &Path) -> Invocation {
        Invocation {
            program: self.config.compiler.clone(),
            args: vec![
                "build".into(),
                "-o".into(),
                output.as_os_str().to_owned(),
                source.as_os_str().to_owned(),
            ],
            envs: vec![
                (self.config.os_var.clone(), pair.os.as_str().to_string()),
                (self.config.arch_var.clone(), pair.arch.as_str().to_string()),
            ],
            current_dir: Some(self.config.work_dir.clone()),
            timeout: self.config.timeout,
        }
    }

    /// Create `{work_dir}/{version}/` if it does not exist yet.
    pub fn prepare_output_dir(&self, version: &str) -> Result<PathBuf> {
        let path = self.config.work_dir.join(version);
        fs::create_dir_all(&path).map_err(|source| ExecError::OutputDir {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "output directory ready");
        Ok(path)
    }

    /// Build a single pair. Never fails; errors are folded into the outcome.
    pub fn build_one(&self, pair: BuildPair, source: &Path, version: &str) -> BuildOutcome {
        let output = output_path(source, version, pair);
        let invocation = self.invocation(pair, source, &output);
        let error = match self.runner.run(&invocation) {
            Ok(out) => {
                if let Some(stdout) = out.stdout_text() {
                    debug!(os = %pair.os, arch = %pair.arch, %stdout, "compiler output");
                }
                None
            }
            Err(e) => {
                // The outcome line already reports the failure to the user.
                debug!(os = %pair.os, arch = %pair.arch, error = %e, "build failed");
                Some(e.to_string())
            }
        };
        BuildOutcome {
            pair,
            output,
            error,
        }
    }

    /// Build every pair in order, handing each outcome to `on_outcome` as
    /// soon as it is produced.
    ///
    /// Only a failure to create the output directory aborts, and it does so
    /// before any compiler runs. Per-pair failures are reported and the loop
    /// moves on.
    pub fn run<F>(
        &self,
        pairs: &[BuildPair],
        source: &Path,
        version: &str,
        mut on_outcome: F,
    ) -> Result<Vec<BuildOutcome>>
    where
        F: FnMut(&BuildOutcome),
    {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        self.prepare_output_dir(version)?;

        let mut outcomes = Vec::with_capacity(pairs.len());
        for &pair in pairs {
            let outcome = self.build_one(pair, source, version);
            on_outcome(&outcome);
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}
