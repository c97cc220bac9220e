//! `crossbuild.toml` loading and settings resolution.
//!
//! Every setting comes from, in order of precedence: the command line, the
//! nearest `crossbuild.toml` at or above the working directory, or a built-in
//! default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use crossbuild_exec::ExecConfig;
use serde::Deserialize;

/// Name of the configuration file searched for.
pub const CONFIG_FILE: &str = "crossbuild.toml";

pub const DEFAULT_STYLE: &str = "pc";
pub const DEFAULT_VERSION: &str = "1.0";

/// Parsed `crossbuild.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossbuildConfig {
    #[serde(default)]
    pub build: BuildSection,
}

/// The `[build]` section. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildSection {
    /// Compiler program (default: `go`).
    #[serde(default)]
    pub compiler: Option<String>,
    /// Default style selector.
    #[serde(default)]
    pub style: Option<String>,
    /// Default version tag.
    #[serde(default)]
    pub version: Option<String>,
    /// Per-target timeout in seconds; 0 disables it.
    #[serde(default)]
    pub timeout: Option<u64>,
    /// Variable carrying the target OS (default: `GOOS`).
    #[serde(default)]
    pub os_var: Option<String>,
    /// Variable carrying the target architecture (default: `GOARCH`).
    #[serde(default)]
    pub arch_var: Option<String>,
}

impl CrossbuildConfig {
    /// Search upward from `start_dir` for `crossbuild.toml`, returning the
    /// parsed file and the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config = Self::parse(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

/// Values given on the command line, before defaults are applied.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub compiler: Option<String>,
    pub style: Option<String>,
    pub version: Option<String>,
    pub timeout: Option<u64>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub compiler: String,
    /// Raw style input; normalized when the selector is built.
    pub style: String,
    pub version: String,
    pub timeout: Option<Duration>,
    pub os_var: String,
    pub arch_var: String,
}

impl Settings {
    pub fn resolve(cli: &Overrides, file: Option<&CrossbuildConfig>) -> Self {
        let section = file.map(|c| &c.build);
        let defaults = ExecConfig::default();
        let timeout_secs = cli.timeout.or_else(|| section.and_then(|s| s.timeout));

        Self {
            compiler: cli
                .compiler
                .clone()
                .or_else(|| section.and_then(|s| s.compiler.clone()))
                .unwrap_or(defaults.compiler),
            style: cli
                .style
                .clone()
                .or_else(|| section.and_then(|s| s.style.clone()))
                .unwrap_or_else(|| DEFAULT_STYLE.to_string()),
            version: cli
                .version
                .clone()
                .or_else(|| section.and_then(|s| s.version.clone()))
                .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            timeout: timeout_secs.filter(|&s| s > 0).map(Duration::from_secs),
            os_var: section
                .and_then(|s| s.os_var.clone())
                .unwrap_or(defaults.os_var),
            arch_var: section
                .and_then(|s| s.arch_var.clone())
                .unwrap_or(defaults.arch_var),
        }
    }

    /// Executor configuration rooted at `work_dir`.
    pub fn exec_config(&self, work_dir: &Path) -> ExecConfig {
        ExecConfig {
            compiler: self.compiler.clone(),
            os_var: self.os_var.clone(),
            arch_var: self.arch_var.clone(),
            work_dir: work_dir.to_path_buf(),
            timeout: self.timeout,
        }
    }
}
