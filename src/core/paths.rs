// src/core/paths.rs

//! Locates the repository root and the files that workloads reference inside it.

use crate::constants::{BIN_SUFFIX, NESTED_BINARY_SUFFIX};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures while resolving paths relative to the repository root.
#[derive(Error, Debug)]
pub enum PathError {
    /// The operating system could not report the running executable.
    #[error("Could not determine the path of the running executable: {0}")]
    CurrentExe(#[source] std::io::Error),
    /// The executable path exists but could not be made symlink-free.
    #[error("Could not resolve symlinks for '{path}': {source}")]
    SymlinkResolution {
        /// The path as reported.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The executable resolved to a path without a parent.
    #[error("Executable path '{0}' has no parent directory.")]
    NoParent(String),
    /// A file named by a workload flag is not there.
    #[error("File for --{flag} not found: {}", .path.display())]
    FileNotFound {
        /// The flag that named the file.
        flag: String,
        /// The resolved, absolute path.
        path: PathBuf,
    },
}

/// Returns the repository root for the running `virtbench` binary.
///
/// The result does not depend on the current working directory. Callers are
/// expected to compute it once at startup and pass it down.
pub fn resolve_root() -> Result<PathBuf, PathError> {
    let exe = env::current_exe().map_err(PathError::CurrentExe)?;
    resolve_root_from(&exe)
}

/// Resolves the repository root for an executable located at `exe`.
/// Symlinks are followed first, so a linked binary resolves to its real location.
pub fn resolve_root_from(exe: &Path) -> Result<PathBuf, PathError> {
    let real_exe = dunce::canonicalize(exe).map_err(|e| PathError::SymlinkResolution {
        path: exe.display().to_string(),
        source: e,
    })?;

    let exe_dir = real_exe
        .parent()
        .ok_or_else(|| PathError::NoParent(real_exe.display().to_string()))?;

    let root = root_from_exe_dir(exe_dir);
    log::debug!(
        "Resolved repository root '{}' from executable '{}'",
        root.display(),
        real_exe.display()
    );
    Ok(root)
}

/// Maps the directory containing the binary to the repository root.
///
/// - `<root>/cmd/virtbench` -> `<root>`
/// - `<root>/bin` -> `<root>`
/// - anything else is the root itself.
pub fn root_from_exe_dir(exe_dir: &Path) -> PathBuf {
    let levels_up = if exe_dir.ends_with(NESTED_BINARY_SUFFIX) {
        2
    } else if exe_dir.ends_with(BIN_SUFFIX) {
        1
    } else {
        0
    };

    exe_dir
        .ancestors()
        .nth(levels_up)
        .unwrap_or(exe_dir)
        .to_path_buf()
}

/// Resolves `value` against `root` unless it is already absolute.
pub fn resolve_repo_file(root: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

// MARK: --- UNIT TESTS ---
