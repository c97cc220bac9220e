//! Subprocess invocation.

use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{ExecError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A fully described subprocess call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
    /// Variables set on top of the inherited environment. Same-named
    /// inherited variables are overridden.
    pub envs: Vec<(String, String)>,
    pub current_dir: Option<PathBuf>,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Invocation {
    /// Value of a variable this invocation sets, if any.
    pub fn env(&self, key: &str) -> Option<&str> {
        self.envs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Captured output of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl RunOutput {
    /// Captured stdout as trimmed text, if the compiler printed anything.
    pub fn stdout_text(&self) -> Option<String> {
        let text = String::from_utf8_lossy(&self.stdout);
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Runs an [`Invocation`] to completion.
///
/// Implementations return `Ok` only when the process exited successfully.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<RunOutput> {
        (**self).run(invocation)
    }
}

/// Runs invocations as real child processes.
///
/// stdout and stderr are piped and captured; stdin is closed. The child is
/// left in this process's process group, so a terminal interrupt reaches it
/// as well as us. Nothing kills it if we are terminated by other means.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunOutput> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .envs(invocation.envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }

        debug!(program = %invocation.program, args = ?invocation.args, envs = ?invocation.envs, "spawning");
        let child = command.spawn().map_err(|source| ExecError::Launch {
            program: invocation.program.clone(),
            source,
        })?;

        let wait_error = |source| ExecError::Wait {
            program: invocation.program.clone(),
            source,
        };
        // A limit too large to represent as an instant is no limit at all.
        let deadline = invocation
            .timeout
            .and_then(|limit| Some((limit, Instant::now().checked_add(limit)?)));
        let (status, stdout, stderr) = match deadline {
            None => {
                let output = child.wait_with_output().map_err(wait_error)?;
                (output.status, output.stdout, output.stderr)
            }
            Some((limit, deadline)) => wait_with_timeout(child, deadline).map_err(|e| match e {
                Waited::Io(source) => wait_error(source),
                Waited::Expired => ExecError::TimedOut { limit },
            })?,
        };

        if status.success() {
            Ok(RunOutput { stdout, stderr })
        } else {
            Err(ExecError::Failed {
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            })
        }
    }
}

enum Waited {
    Io(std::io::Error),
    Expired,
}

/// Poll the child until it exits or `deadline` passes, draining its pipes on
/// background threads so a chatty compiler cannot block on a full pipe.
fn wait_with_timeout(
    mut child: Child,
    deadline: Instant,
) -> std::result::Result<(ExitStatus, Vec<u8>, Vec<u8>), Waited> {
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let status = loop {
        match child.try_wait().map_err(Waited::Io)? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                // The child may have exited since the poll; kill then fails harmlessly.
                let _ = child.kill();
                let _ = child.wait();
                return Err(Waited::Expired);
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    };

    let collect = |handle: Option<thread::JoinHandle<Vec<u8>>>| {
        handle
            .map(|h| h.join().unwrap_or_default())
            .unwrap_or_default()
    };
    Ok((status, collect(stdout), collect(stderr)))
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}
