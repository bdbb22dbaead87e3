//! External tool invocation
//!
//! Every phase that shells out goes through [ToolRunner], so the command
//! sequence can be checked in tests with [RecordingRunner] instead of a
//! real CMake installation.

use crate::error::{PackError, Result};
use std::cell::RefCell;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::Command;

/// A single external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<OsString>,
    pub env: Vec<(String, OsString)>,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        ToolInvocation {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.as_os_str().to_os_string())
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Arguments rendered lossily, for assertions and log lines
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs external commands to completion
pub trait ToolRunner {
    /// Run the command; a non-zero exit is an [PackError::ExternalTool]
    fn run(&self, invocation: &ToolInvocation) -> Result<()>;
}

/// Spawns real processes, inheriting stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<()> {
        tracing::debug!(command = %invocation, "running external tool");

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }

        let status = cmd.status()?;
        if !status.success() {
            return Err(PackError::ExternalTool {
                program: invocation.program.clone(),
                status: status.code().unwrap_or(-1),
            });
        }

        Ok(())
    }
}

/// Records invocations instead of running them
#[derive(Debug, Default)]
pub struct RecordingRunner {
    invocations: RefCell<Vec<ToolInvocation>>,
    fail_at: Option<usize>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `index`-th invocation (0-based) exit with status 1
    pub fn failing_at(index: usize) -> Self {
        RecordingRunner {
            invocations: RefCell::new(Vec::new()),
            fail_at: Some(index),
        }
    }

    pub fn invocations(&self) -> Vec<ToolInvocation> {
        self.invocations.borrow().clone()
    }

    /// Each recorded command as one display string
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(|i| i.to_string())
            .collect()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<()> {
        let index = self.invocations.borrow().len();
        self.invocations.borrow_mut().push(invocation.clone());

        if self.fail_at == Some(index) {
            return Err(PackError::ExternalTool {
                program: invocation.program.clone(),
                status: 1,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display() {
        let inv = ToolInvocation::new("cmake")
            .arg("--build")
            .arg("out")
            .arg("--config")
            .arg("Debug");
        assert_eq!(inv.to_string(), "cmake --build out --config Debug");
    }

    #[test]
    fn test_recording_runner_records_in_order() {
        let runner = RecordingRunner::new();
        runner.run(&ToolInvocation::new("a")).unwrap();
        runner.run(&ToolInvocation::new("b")).unwrap();
        assert_eq!(runner.command_lines(), vec!["a", "b"]);
    }

    #[test]
    fn test_recording_runner_failure() {
        let runner = RecordingRunner::failing_at(1);
        assert!(runner.run(&ToolInvocation::new("a")).is_ok());
        let err = runner.run(&ToolInvocation::new("b")).unwrap_err();
        assert!(matches!(err, PackError::ExternalTool { status: 1, .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_success() {
        assert!(SystemRunner.run(&ToolInvocation::new("true")).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_non_zero_exit() {
        let err = SystemRunner
            .run(&ToolInvocation::new("sh").arg("-c").arg("exit 3"))
            .unwrap_err();
        match err {
            PackError::ExternalTool { program, status } => {
                assert_eq!(program, "sh");
                assert_eq!(status, 3);
            }
            other => panic!("expected tool failure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_passes_environment() {
        let inv = ToolInvocation::new("sh")
            .arg("-c")
            .arg("test \"$PLUGIN_PACK_PROBE\" = ok")
            .env("PLUGIN_PACK_PROBE", "ok");
        assert!(SystemRunner.run(&inv).is_ok());
    }

    #[test]
    fn test_system_runner_missing_program() {
        let err = SystemRunner
            .run(&ToolInvocation::new("plugin-pack-no-such-tool"))
            .unwrap_err();
        assert!(matches!(err, PackError::Io(_)));
    }
}
