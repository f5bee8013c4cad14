//! Migration descriptor files and the directory loader.
//!
//! Each file in the migrations directory is one descriptor: a document with
//! an `up` member and an optional `down` member. Files are ordered by their
//! [`MigrationKey`] and a descriptor's 1-based position in that order is its
//! version number.

use crate::compiler::{compile_all, Statement};
use crate::error::{CoreError, CoreResult};
use crate::inverse::inverse_statements;
use crate::migration_key::MigrationKey;
use crate::operation::Operation;
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// File extensions recognised as descriptors.
///
/// All of them go through the YAML parser, which also accepts strict JSON and
/// the relaxed object notation with unquoted keys and single-quoted strings.
pub const DESCRIPTOR_EXTENSIONS: &[&str] = &["json", "js", "yml", "yaml"];

/// One parsed migration file.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationDescriptor {
    /// Sort key (file name without extension)
    pub key: MigrationKey,

    /// Source file
    pub path: PathBuf,

    /// Operations applied when migrating up, in declared order
    pub up: Vec<Operation>,

    /// Operations applied when migrating down; `None` means infer from `up`
    pub down: Option<Vec<Operation>>,
}

impl MigrationDescriptor {
    /// Parse a descriptor from document text.
    ///
    /// `path` is only used to identify the file in errors.
    pub fn parse(key: MigrationKey, path: &Path, content: &str) -> CoreResult<Self> {
        let parse_error = |message: String| CoreError::DescriptorParse {
            path: path.display().to_string(),
            message,
        };

        let doc: Value = serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
        let Value::Mapping(map) = &doc else {
            return Err(parse_error(
                "expected an object with 'up' and optional 'down' members".to_string(),
            ));
        };

        let up_value = map.get("up").unwrap_or(&Value::Null);
        let down_value = map.get("down").unwrap_or(&Value::Null);
        if up_value.is_null() && down_value.is_null() {
            return Err(parse_error("neither 'up' nor 'down' is defined".to_string()));
        }

        let invalid = |source: CoreError| CoreError::DescriptorInvalid {
            path: path.display().to_string(),
            source: Box::new(source),
        };
        let up = Operation::list_from_value(up_value).map_err(invalid)?;
        let down = if down_value.is_null() {
            None
        } else {
            Some(Operation::list_from_value(down_value).map_err(invalid)?)
        };

        Ok(Self {
            key,
            path: path.to_path_buf(),
            up,
            down,
        })
    }

    /// Read and parse a descriptor file, deriving its key from the file name
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let key = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(MigrationKey::try_new)
            .ok_or_else(|| CoreError::DescriptorParse {
                path: path.display().to_string(),
                message: "invalid file name".to_string(),
            })?;

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(key, path, &content)
    }

    /// Whether the descriptor declares its own `down`
    pub fn has_explicit_down(&self) -> bool {
        self.down.is_some()
    }

    /// Statements that apply this descriptor
    pub fn up_statements(&self) -> Vec<Statement> {
        compile_all(&self.up)
    }

    /// Statements that revert this descriptor: the explicit `down` if
    /// declared, otherwise the inferred inverse of `up`
    pub fn down_statements(&self) -> Vec<Statement> {
        match &self.down {
            Some(down) => compile_all(down),
            None => inverse_statements(&self.up),
        }
    }
}

/// Whether a path looks like a descriptor file
pub fn is_descriptor_file(path: &Path) -> bool {
    path.is_file()
        && !path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'))
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| DESCRIPTOR_EXTENSIONS.contains(&e))
}

/// Load every descriptor in `dir`, ordered by key.
///
/// Sub-directories and files with other extensions are skipped. Any file that
/// fails to parse fails the whole load.
pub fn load_descriptors(dir: &Path) -> CoreResult<Vec<MigrationDescriptor>> {
    if !dir.is_dir() {
        return Err(CoreError::MigrationsDirNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut descriptors = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })? {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if !is_descriptor_file(&path) {
            log::debug!("Skipping non-migration entry {}", path.display());
            continue;
        }
        descriptors.push(MigrationDescriptor::from_file(&path)?);
    }

    let descriptors = sort_descriptors(descriptors)?;
    log::debug!(
        "Loaded {} migrations from {}",
        descriptors.len(),
        dir.display()
    );
    Ok(descriptors)
}

/// Order descriptors by key, rejecting duplicate keys.
///
/// The result is independent of the order the descriptors were discovered in.
pub fn sort_descriptors(
    mut descriptors: Vec<MigrationDescriptor>,
) -> CoreResult<Vec<MigrationDescriptor>> {
    descriptors.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.path.cmp(&b.path)));

    if let Some(pair) = descriptors.windows(2).find(|w| w[0].key == w[1].key) {
        return Err(CoreError::DuplicateDescriptor {
            key: pair[0].key.to_string(),
            path1: pair[0].path.display().to_string(),
            path2: pair[1].path.display().to_string(),
        });
    }
    Ok(descriptors)
}

#[cfg(test)]
#[path = "descriptor_test.rs"]
mod tests;
