//! Drill catalog loading and validation.
//!
//! Stage 1 of the drillbook build pipeline. Discovers drill folders under the
//! content root, parses each folder's `drill.yml`, and validates it into a
//! [`DrillRecord`].
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! └── drills/
//!     ├── power-push/              # One folder per drill; folder name = slug
//!     │   ├── drill.yml            # Metadata (required)
//!     │   ├── setup.png            # Images referenced by drill.yml
//!     │   └── finish.png
//!     ├── butterfly-slides/
//!     │   └── drill.yml
//!     └── notes/                   # No drill.yml = silently skipped
//! ```
//!
//! ## Validation
//!
//! `drill.yml` is parsed as an untyped mapping first ([`serde_yaml::Value`])
//! and then run through an explicit schema check, so a malformed file can
//! never produce a partially-typed record. Scalars are taken as their literal
//! text: `2010` under `tags:` stays the string "2010". Required fields:
//!
//! - `name`, `description`: non-empty strings
//! - `coaching_points`, `images`: lists of strings (empty allowed)
//! - `tags`: mapping; only the six [`TagCategory`] keys are kept, anything
//!   else is ignored
//!
//! Every `images` entry must also exist as a file in the drill folder.
//!
//! ## Two error policies
//!
//! The same malformed folder is handled differently depending on consumer:
//!
//! - [`load_catalog`] (page generation) is fail-fast: the first bad folder
//!   aborts the build with a diagnostic naming the folder and field. Partial,
//!   inconsistent output is worse than no output.
//! - [`index_catalog`] (query surface: `index`, `pick`, `export`) is
//!   best-effort: bad folders are skipped and reported as warnings so the
//!   rest of the catalog stays usable. The warnings are always surfaced with
//!   a count, never swallowed.
//!
//! These are deliberately distinct policies. Do not unify them.

use crate::types::{DrillRecord, TagCategory, Tags};
use serde_yaml::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("drills directory does not exist: {0}")]
    DrillsDirMissing(PathBuf),
    #[error("[{folder}] drill.yml is not valid YAML: {source}")]
    Parse {
        folder: String,
        source: serde_yaml::Error,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A drill folder's metadata failed the schema check.
///
/// Diagnostics always carry the folder name and, where applicable, the exact
/// field that was missing or malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("[{folder}] drill.yml must contain a mapping")]
    NotAMapping { folder: String },
    #[error("[{folder}] drill.yml missing required field '{field}' ({expected})")]
    MissingField {
        folder: String,
        field: String,
        expected: &'static str,
    },
    #[error("[{folder}] image '{image}' referenced by drill.yml does not exist")]
    MissingImage { folder: String, image: String },
}

impl ValidationError {
    /// The offending field name, when the error concerns a specific field.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingField { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// One skipped entry from the best-effort indexing path.
#[derive(Debug, Clone)]
pub enum IndexWarning {
    /// The drills directory itself is absent; treated as an empty catalog.
    MissingDrillsDir(PathBuf),
    /// A single drill folder was skipped.
    SkippedDrill { folder: String, message: String },
}

impl fmt::Display for IndexWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexWarning::MissingDrillsDir(path) => {
                write!(f, "drills directory does not exist: {}", path.display())
            }
            IndexWarning::SkippedDrill { folder, message } => {
                write!(f, "skipped drill '{folder}': {message}")
            }
        }
    }
}

/// Result of the best-effort indexing path: every loadable drill, plus a
/// warning per entry that had to be skipped.
#[derive(Debug)]
pub struct CatalogIndex {
    pub drills: Vec<DrillRecord>,
    pub warnings: Vec<IndexWarning>,
}

const DRILLS_DIR: &str = "drills";
const DRILL_FILE: &str = "drill.yml";

/// List drill folder names under `<content_root>/drills`, sorted by name.
///
/// `readdir` order is platform-dependent, so discovery sorts for
/// deterministic builds. Fails with [`LoadError::DrillsDirMissing`] when the
/// directory is absent; [`index_catalog`] downgrades that to a warning.
pub fn discover_drill_folders(content_root: &Path) -> Result<Vec<String>, LoadError> {
    let drills_dir = content_root.join(DRILLS_DIR);
    if !drills_dir.is_dir() {
        return Err(LoadError::DrillsDirMissing(drills_dir));
    }

    let mut folders: Vec<String> = fs::read_dir(&drills_dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();

    folders.sort();
    Ok(folders)
}

/// Load and validate a single drill folder. The folder name becomes the slug.
pub fn load_drill(folder_path: &Path) -> Result<DrillRecord, LoadError> {
    let folder = folder_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let content = fs::read_to_string(folder_path.join(DRILL_FILE))?;
    let value: Value = serde_yaml::from_str(&content).map_err(|source| LoadError::Parse {
        folder: folder.clone(),
        source,
    })?;

    let record = validate_drill(&value, &folder)?;

    // Every referenced image must resolve to a file in the folder. Resolving
    // this at load time keeps the fail-fast guarantee; the sheet exporter
    // still degrades gracefully if a file rots between load and export.
    for image in &record.images {
        if !folder_path.join(image).is_file() {
            return Err(ValidationError::MissingImage {
                folder,
                image: image.clone(),
            }
            .into());
        }
    }

    Ok(record)
}

/// Load the full catalog, fail-fast. Used by page generation.
///
/// Slug uniqueness holds by construction: slugs are folder names, and a
/// directory cannot contain two identically-named folders.
pub fn load_catalog(content_root: &Path) -> Result<Vec<DrillRecord>, LoadError> {
    let drills_dir = content_root.join(DRILLS_DIR);
    let mut drills = Vec::new();

    for folder in discover_drill_folders(content_root)? {
        let folder_path = drills_dir.join(&folder);
        if !folder_path.join(DRILL_FILE).is_file() {
            continue;
        }
        drills.push(load_drill(&folder_path)?);
    }

    Ok(drills)
}

/// Load the catalog best-effort. Used by the query/index surface.
///
/// Malformed folders are skipped and collected as warnings; a missing drills
/// directory yields an empty catalog with a single warning.
pub fn index_catalog(content_root: &Path) -> Result<CatalogIndex, LoadError> {
    let drills_dir = content_root.join(DRILLS_DIR);

    let folders = match discover_drill_folders(content_root) {
        Ok(folders) => folders,
        Err(LoadError::DrillsDirMissing(path)) => {
            return Ok(CatalogIndex {
                drills: Vec::new(),
                warnings: vec![IndexWarning::MissingDrillsDir(path)],
            });
        }
        Err(err) => return Err(err),
    };

    let mut drills = Vec::new();
    let mut warnings = Vec::new();

    for folder in folders {
        let folder_path = drills_dir.join(&folder);
        if !folder_path.join(DRILL_FILE).is_file() {
            continue;
        }
        match load_drill(&folder_path) {
            Ok(drill) => drills.push(drill),
            Err(err) => warnings.push(IndexWarning::SkippedDrill {
                folder,
                message: err.to_string(),
            }),
        }
    }

    Ok(CatalogIndex { drills, warnings })
}

// ============================================================================
// Schema validation
// ============================================================================

/// Literal text of a YAML scalar, without type coercion.
///
/// `serde_yaml` resolves `2010` to a number and `true` to a bool; drill
/// metadata treats every scalar as its source text, so those render back to
/// "2010" and "true".
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn missing(folder: &str, field: &str, expected: &'static str) -> ValidationError {
    ValidationError::MissingField {
        folder: folder.to_string(),
        field: field.to_string(),
        expected,
    }
}

fn required_string(value: &Value, folder: &str, field: &str) -> Result<String, ValidationError> {
    value
        .get(field)
        .and_then(scalar_text)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| missing(folder, field, "string"))
}

fn required_string_list(
    value: &Value,
    folder: &str,
    field: &str,
) -> Result<Vec<String>, ValidationError> {
    let seq = value
        .get(field)
        .and_then(Value::as_sequence)
        .ok_or_else(|| missing(folder, field, "list"))?;

    seq.iter()
        .map(|entry| scalar_text(entry).ok_or_else(|| missing(folder, field, "list of strings")))
        .collect()
}

/// Explicit schema check: untyped YAML mapping in, typed [`DrillRecord`] out.
fn validate_drill(value: &Value, folder: &str) -> Result<DrillRecord, ValidationError> {
    if !value.is_mapping() {
        return Err(ValidationError::NotAMapping {
            folder: folder.to_string(),
        });
    }

    let name = required_string(value, folder, "name")?;
    let description = required_string(value, folder, "description")?;
    let coaching_points = required_string_list(value, folder, "coaching_points")?;
    let images = required_string_list(value, folder, "images")?;

    let video = match value.get("video") {
        Some(v) => Some(scalar_text(v).ok_or_else(|| missing(folder, "video", "string"))?),
        None => None,
    };

    let tags_mapping = value
        .get("tags")
        .and_then(Value::as_mapping)
        .ok_or_else(|| missing(folder, "tags", "mapping"))?;

    let mut tags = Tags::new();
    for (key, values) in tags_mapping {
        // Only the six known categories are kept; anything else is ignored.
        let Some(category) = key
            .as_str()
            .and_then(|k| k.parse::<TagCategory>().ok())
        else {
            continue;
        };

        let seq = values.as_sequence().ok_or_else(|| {
            missing(folder, &format!("tags.{category}"), "list of strings")
        })?;
        let parsed: Vec<String> = seq
            .iter()
            .map(|entry| {
                scalar_text(entry).ok_or_else(|| {
                    missing(folder, &format!("tags.{category}"), "list of strings")
                })
            })
            .collect::<Result<_, _>>()?;
        tags.insert(category, parsed);
    }

    Ok(DrillRecord {
        slug: folder.to_string(),
        name,
        description,
        coaching_points,
        images,
        video,
        tags,
    })
}
