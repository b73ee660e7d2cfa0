//! Asset staging: mirror drill folders into the publicly served tree.
//!
//! Runs once per build, before any page is generated, so every
//! `/drills/<slug>/<file>` path the pages and sheet exporter reference is
//! already in place. The destination is deleted first: a drill renamed or
//! removed since the previous build must not leave stale files behind.
//!
//! Plain file copy semantics only. Symlinks and permissions are out of
//! scope, and the copy assumes exclusive access to the source tree while it
//! runs.

use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Mirror every file under `src_root` into `dest_root`.
///
/// Deletes any pre-existing contents of `dest_root` first, so two
/// consecutive runs over an unchanged source produce byte-identical
/// destination trees. A missing `src_root` cleans the destination and
/// copies nothing.
pub fn stage_assets(src_root: &Path, dest_root: &Path) -> Result<(), StageError> {
    if dest_root.exists() {
        fs::remove_dir_all(dest_root)?;
    }
    fs::create_dir_all(dest_root)?;

    if !src_root.is_dir() {
        return Ok(());
    }

    for entry in WalkDir::new(src_root) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src_root)
            .expect("walkdir yields paths under its root");
        if rel.as_os_str().is_empty() {
            continue;
        }
        let dest = dest_root.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
        }
    }

    Ok(())
}
