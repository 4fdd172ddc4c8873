use crate::error::{Result, UpdaterError};
use std::path::{Path, PathBuf};

const FLAKE_FILE: &str = "flake.nix";

/// Resolve the directory holding `flake.nix`, starting at `path` and walking
/// up like nix does for a `.#` reference. The search stops at the enclosing
/// git work tree so an unrelated flake higher up is never picked.
pub fn locate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();

    let start = path.canonicalize().map_err(|e| {
        UpdaterError::Configuration(format!("Invalid path '{}': {e}", path.display()))
    })?;
    if !start.is_dir() {
        return Err(UpdaterError::Configuration(format!(
            "Path '{}' is not a directory",
            start.display()
        )));
    }

    for dir in start.ancestors() {
        if dir.join(FLAKE_FILE).is_file() {
            return Ok(dir.to_path_buf());
        }
        if dir.join(".git").exists() {
            break;
        }
    }

    Err(UpdaterError::Configuration(format!(
        "No {FLAKE_FILE} found in '{}' or its parents",
        start.display()
    )))
}
