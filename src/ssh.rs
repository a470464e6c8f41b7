use anyhow::{Context, Result};
use std::{
    path::Path,
    process::{Command, Stdio},
};

/// A non-interactive `ssh <host> exit` used to check that a host answers.
#[derive(Debug, Clone)]
pub struct ConnectionTest<'a> {
    pub binary: &'a str,
    /// Config file the client should read, so unsaved defaults don't leak in.
    pub config_path: &'a Path,
    /// Matches the `Host` alias in the config.
    pub host: &'a str,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl ConnectionTest<'_> {
    pub fn ssh_args(&self) -> Vec<String> {
        vec![
            "-F".into(),
            self.config_path.display().to_string(),
            "-o".into(),
            "BatchMode=yes".into(),
            "-o".into(),
            format!("ConnectTimeout={}", self.timeout_secs),
            self.host.to_string(),
            "exit".into(),
        ]
    }

    /// Blocks until the client exits.
    pub fn run(&self) -> Result<TestOutcome> {
        let output = Command::new(self.binary)
            .args(self.ssh_args())
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("running {}", self.binary))?;

        Ok(TestOutcome {
            success: output.status.success(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
