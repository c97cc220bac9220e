//! Default action: build every resolved pair and print each outcome.

use std::path::Path;

use anyhow::{Context, Result};
use crossbuild_exec::{BuildOutcome, CommandRunner, Executor};
use crossbuild_matrix::BuildPair;
use tracing::info;

use crate::config::Settings;

/// Build `source` for every pair, printing one line per outcome as it lands.
///
/// Per-pair failures are printed and do not make this fail.
pub fn run(work_dir: &Path, source: &Path, settings: &Settings, pairs: &[BuildPair]) -> Result<()> {
    let executor = Executor::with_config(settings.exec_config(work_dir));
    run_with(&executor, source, &settings.version, pairs)?;
    Ok(())
}

/// [`run`] over an arbitrary runner.
pub fn run_with<R: CommandRunner>(
    executor: &Executor<R>,
    source: &Path,
    version: &str,
    pairs: &[BuildPair],
) -> Result<Vec<BuildOutcome>> {
    if pairs.is_empty() {
        println!("Nothing to build: no targets match the selection.");
        return Ok(Vec::new());
    }

    info!(
        source = %source.display(),
        version,
        targets = pairs.len(),
        compiler = %executor.config().compiler,
        "starting build"
    );
    let outcomes = executor
        .run(pairs, source, version, |outcome| println!("{outcome}"))
        .with_context(|| format!("building {}", source.display()))?;

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    info!(built = outcomes.len() - failed, failed, "build finished");
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crossbuild_exec::{ExecConfig, ExecError, Invocation, RunOutput};
    use crossbuild_matrix::{resolve, Selector, TargetOs};

    use super::*;

    /// Fails every other invocation.
    #[derive(Default)]
    struct Alternating {
        count: Cell<usize>,
    }

    impl CommandRunner for Alternating {
        fn run(&self, _: &Invocation) -> crossbuild_exec::Result<RunOutput> {
            let n = self.count.get();
            self.count.set(n + 1);
            if n % 2 == 1 {
                return Err(ExecError::TimedOut {
                    limit: std::time::Duration::from_secs(3),
                });
            }
            Ok(RunOutput::default())
        }
    }

    #[test]
    fn failures_are_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Executor::new(
            ExecConfig {
                work_dir: dir.path().to_path_buf(),
                ..ExecConfig::default()
            },
            Alternating::default(),
        );
        let pairs = resolve(&Selector::os(TargetOs::Android));
        let outcomes = run_with(&executor, Path::new("app.go"), "1.0", &pairs).unwrap();
        assert_eq!(outcomes.len(), 4);
        let ok: Vec<_> = outcomes.iter().map(BuildOutcome::is_success).collect();
        assert_eq!(ok, vec![true, false, true, false]);
    }

    #[test]
    fn empty_selection_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Executor::new(
            ExecConfig {
                work_dir: dir.path().to_path_buf(),
                ..ExecConfig::default()
            },
            Alternating::default(),
        );
        let outcomes = run_with(&executor, Path::new("app.go"), "1.0", &[]).unwrap();
        assert!(outcomes.is_empty());
        assert_eq!(executor.runner().count.get(), 0);
    }
}
