//! Runtime abstraction for system operations.
//!
//! This module provides a trait-based abstraction over the parts of the host
//! system the inspector touches, enabling dependency injection and testability.
//!
//! # Structure
//!
//! - `path` - Path helpers (normalize, absolutize, executable lookup in `PATH`)
//! - `env` - Environment variables and working directory
//! - `fs` - File metadata and writes
//! - `process` - Running external tools with a wall-clock limit

mod env;
mod fs;
pub mod path;
mod process;

use anyhow::Result;
use async_trait::async_trait;
use std::env as std_env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use path::{absolutize, find_program};

/// Captured result of an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;
    fn current_dir(&self) -> Result<PathBuf>;

    // File System
    fn exists(&self, path: &Path) -> bool;
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Whether `path` is a regular file with an executable bit set.
    fn is_executable(&self, path: &Path) -> bool;

    /// Size of `path` if it is a regular file.
    /// Symlinks are not followed: a symlink, directory or missing path yields `None`.
    fn regular_file_size(&self, path: &Path) -> Option<u64>;

    // Processes
    /// Run `program` with `args` and capture its output.
    /// Fails if the program cannot be spawned or does not finish within `timeout`.
    async fn exec(&self, program: &Path, args: &[String], timeout: Duration)
    -> Result<CommandOutput>;
}

pub struct RealRuntime;

#[async_trait]
impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn current_dir(&self) -> Result<PathBuf> {
        self.current_dir_impl()
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn is_executable(&self, path: &Path) -> bool {
        self.is_executable_impl(path)
    }

    fn regular_file_size(&self, path: &Path) -> Option<u64> {
        self.regular_file_size_impl(path)
    }

    async fn exec(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput> {
        self.exec_impl(program, args, timeout).await
    }
}
