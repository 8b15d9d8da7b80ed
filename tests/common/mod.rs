//! Shared integration-test harness for running the `envschema` binary.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};

/// Runs `envschema` with a scrubbed environment.
pub struct EnvSchemaProcess {
    command: Command,
}

impl EnvSchemaProcess {
    /// Prepares an invocation with `args`, no inherited environment and
    /// `--quiet` logging.
    pub fn new(args: &[&str]) -> Self {
        let mut command = Command::new(env!("CARGO_BIN_EXE_envschema"));
        command.env_clear().arg("--quiet").args(args);
        Self { command }
    }

    /// Adds a process environment variable.
    #[must_use]
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.command.env(key, value);
        self
    }

    /// Runs from `dir`.
    #[must_use]
    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.command.current_dir(dir);
        self
    }

    /// Runs to completion and captures output.
    #[allow(clippy::missing_panics_doc)]
    pub fn output(mut self) -> Output {
        self.command.output().expect("failed to run envschema")
    }

    /// Starts the process without waiting for it.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn(mut self) -> Child {
        self.command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn envschema")
    }

    /// Runs `args` with no environment at all.
    pub fn spawn_command(args: &[&str]) -> Output {
        Self::new(args).output()
    }

    /// Absolute path of a file under `tests/fixtures`.
    pub fn fixture_path(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }
}

/// Writes `.env`-style files into a fresh temporary directory.
pub fn env_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).expect("failed to write env file");
    }
    dir
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
