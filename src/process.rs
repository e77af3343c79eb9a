//! Thin wrapper around `std::process::Command` for running system tools.
//!
//! Every external invocation in this crate goes through [`Cmd`], which
//! captures output, checks the exit status, and attaches a useful error
//! message. Long-running package-manager commands use [`Cmd::run_streamed`]
//! so the operator sees their output live.

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

/// Builder for an external command invocation.
pub struct Cmd {
    program: String,
    args: Vec<OsString>,
    envs: Vec<(String, String)>,
    allow_fail: bool,
    error_msg: Option<String>,
}

/// Captured result of a finished command.
#[derive(Debug)]
pub struct CmdResult {
    pub stdout: String,
    pub stderr: String,
    success: bool,
}

impl CmdResult {
    pub fn success(&self) -> bool {
        self.success
    }
}

impl Cmd {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            envs: Vec::new(),
            allow_fail: false,
            error_msg: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn arg_path(mut self, path: &Path) -> Self {
        self.args.push(path.as_os_str().to_os_string());
        self
    }

    /// Set an environment variable for this invocation only.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    /// Don't treat a non-zero exit status as an error.
    pub fn allow_fail(mut self) -> Self {
        self.allow_fail = true;
        self
    }

    /// Message to use when the command exits non-zero.
    pub fn error_msg(mut self, msg: &str) -> Self {
        self.error_msg = Some(msg.to_string());
        self
    }

    /// Run the command, capturing stdout and stderr.
    pub fn run(self) -> Result<CmdResult> {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        for (key, value) in &self.envs {
            command.env(key, value);
        }

        let output = command
            .output()
            .with_context(|| format!("failed to run '{}'", self.program))?;

        let result = CmdResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        };

        if !result.success && !self.allow_fail {
            self.fail(&result.stderr)?;
        }

        Ok(result)
    }

    /// Run the command with stdout/stderr inherited from this process.
    ///
    /// Used for package-manager and other long-running commands whose
    /// output the operator should see as it happens.
    pub fn run_streamed(self) -> Result<CmdResult> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        for (key, value) in &self.envs {
            command.env(key, value);
        }

        let status = command
            .status()
            .with_context(|| format!("failed to run '{}'", self.program))?;

        let result = CmdResult {
            stdout: String::new(),
            stderr: String::new(),
            success: status.success(),
        };

        if !result.success && !self.allow_fail {
            self.fail("")?;
        }

        Ok(result)
    }

    fn fail(&self, stderr: &str) -> Result<()> {
        let rendered = format!("{} {:?}", self.program, self.args);
        match &self.error_msg {
            Some(msg) if stderr.is_empty() => bail!("{} ({})", msg, rendered),
            Some(msg) => bail!("{} ({}): {}", msg, rendered, stderr.trim()),
            None if stderr.is_empty() => bail!("command failed: {}", rendered),
            None => bail!("command failed: {}: {}", rendered, stderr.trim()),
        }
    }
}

/// Check if a command exists on the host system.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_captures_stdout() {
        let result = Cmd::new("echo").arg("hello").run().unwrap();
        assert!(result.success());
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn test_run_failure_is_error() {
        let result = Cmd::new("false").run();
        assert!(result.is_err());
    }

    #[test]
    fn test_allow_fail() {
        let result = Cmd::new("false").allow_fail().run().unwrap();
        assert!(!result.success());
    }

    #[test]
    fn test_error_msg() {
        let err = Cmd::new("false").error_msg("step went sideways").run();
        assert!(err.unwrap_err().to_string().contains("step went sideways"));
    }

    #[test]
    fn test_env_is_scoped_to_child() {
        let result = Cmd::new("sh")
            .args(["-c", "echo $INSTALLER_TEST_VAR"])
            .env("INSTALLER_TEST_VAR", "scoped")
            .run()
            .unwrap();
        assert_eq!(result.stdout.trim(), "scoped");
        assert!(std::env::var("INSTALLER_TEST_VAR").is_err());
    }

    #[test]
    fn test_command_exists() {
        assert!(command_exists("ls"));
        assert!(!command_exists("definitely_not_a_real_command_12345"));
    }
}
