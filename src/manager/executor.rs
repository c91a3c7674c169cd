//! Running AURIC stages as external programs
//!
//! The manager never spawns processes itself; it hands an [`Invocation`] to a
//! [`StageExecutor`] and gets an exit code back. [`ProcessExecutor`] is the
//! real implementation, tests substitute a recording one.

use crate::error::{AuricError, Result};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// One program run: what to run, where, and with which environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Complete environment of the child; nothing is inherited
    pub env: BTreeMap<String, OsString>,
    pub working_dir: PathBuf,
    /// Bytes written to the child's standard input
    pub stdin: Option<Vec<u8>>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            working_dir: working_dir.into(),
            stdin: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_env(mut self, env: BTreeMap<String, OsString>) -> Self {
        self.env = env;
        self
    }

    pub fn with_stdin(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Program and arguments joined for display
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs an invocation to completion and reports its exit code
pub trait StageExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<i32>;
}

/// Runs invocations as blocking child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl StageExecutor for ProcessExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<i32> {
        info!(
            "Running '{}' in {}",
            invocation.command_line(),
            invocation.working_dir.display()
        );

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .env_clear()
            .envs(&invocation.env)
            .current_dir(&invocation.working_dir);
        if invocation.stdin.is_some() {
            command.stdin(Stdio::piped());
        }

        let mut child = command
            .spawn()
            .map_err(|e| AuricError::file_access(&invocation.program, e))?;

        if let (Some(input), Some(mut stdin)) = (&invocation.stdin, child.stdin.take()) {
            match stdin.write_all(input) {
                Ok(()) => {}
                // The stage stopped reading; its exit code still decides
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("'{}' closed stdin before all input was written", invocation.program);
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(AuricError::file_access(&invocation.program, e));
                }
            }
        }

        let status = child.wait()?;
        // Killed by a signal: no exit code
        let code = status.code().unwrap_or(-1);
        debug!("'{}' exited with {}", invocation.program, code);
        Ok(code)
    }
}
