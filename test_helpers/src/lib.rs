//! Testing infrastructure shared by the workspace crates.
//!
//! Tests that produce artifacts (rendered frames, display lists, census
//! dumps) write them under `<workspace root>/test_output/` so they can be
//! inspected after a run.
//!
//! ```text
//! test_output/
//! ├── frames/           # Rasterized planetarium frames
//! └── ...               # One file or directory per test
//! ```
//!
//! # Usage
//!
//! ```rust
//! use test_helpers::{find_project_root, output_path};
//!
//! let root = find_project_root().expect("Failed to find project");
//! assert!(root.join("Cargo.toml").exists());
//!
//! let frame = output_path("frames/sky_000.png");
//! assert!(frame.starts_with(root));
//! ```

use once_cell::sync::Lazy;
use std::env;
use std::path::{Path, PathBuf};

/// Errors raised while locating test resources.
#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    /// No Cargo.toml with a `[workspace]` section above the working directory.
    #[error("Failed to find project root: {0}")]
    ProjectRootNotFound(String),

    /// An output directory could not be created.
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Locate the workspace root.
///
/// Walks from the current directory towards the filesystem root and returns
/// the first directory whose Cargo.toml contains a `[workspace]` section.
pub fn find_project_root() -> Result<PathBuf, TestHelperError> {
    let mut current_dir = env::current_dir().map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to get current directory: {}", e))
    })?;

    loop {
        let cargo_toml = current_dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml).map_err(|e| {
                TestHelperError::ProjectRootNotFound(format!("Failed to read Cargo.toml: {}", e))
            })?;

            if content.contains("[workspace]") {
                return Ok(current_dir);
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Err(TestHelperError::ProjectRootNotFound(
        "Workspace root not found".to_string(),
    ))
}

/// Cached project root. Tests fail fast if the workspace cannot be found.
static PROJECT_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_project_root().expect("Failed to find project root directory"));

/// `<workspace root>/test_output`, created on first use.
pub fn get_output_dir() -> PathBuf {
    let output_dir = PROJECT_ROOT.join("test_output");

    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");
    }

    output_dir
}

/// Path of an artifact inside the test output directory.
///
/// Parent directories of `path` are not created; use [`output_subdir`] for
/// nested layouts.
pub fn output_path<P: AsRef<Path>>(path: P) -> PathBuf {
    get_output_dir().join(path)
}

/// Create (if needed) and return a subdirectory of the test output directory.
pub fn output_subdir<P: AsRef<Path>>(name: P) -> Result<PathBuf, TestHelperError> {
    let dir = get_output_dir().join(name);
    std::fs::create_dir_all(&dir).map_err(|source| TestHelperError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
