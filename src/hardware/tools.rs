//! External tool invocation
//!
//! Each call spawns one child process, waits for it and returns its stdout.
//! There is no timeout, pooling or retry.

use std::io;
use std::process::Command;
use tracing::{debug, warn};

use crate::error::{SysError, SysResult};

/// Runs an external program and returns what it printed
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> SysResult<String>;
}

/// Spawns real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[&str]) -> SysResult<String> {
        debug!(program, ?args, "running external tool");

        let output = Command::new(program).args(args).output().map_err(|e| {
            let reason = match e.kind() {
                io::ErrorKind::NotFound => "not installed or not on PATH".to_string(),
                _ => e.to_string(),
            };
            SysError::tool(program, reason)
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        // lshw exits non-zero without root but still prints what it can see
        if !output.status.success() {
            warn!(program, status = %output.status, "external tool exited with failure");
        }

        if stdout.trim().is_empty() {
            return Err(SysError::tool(program, "produced no output"));
        }

        Ok(stdout)
    }
}
