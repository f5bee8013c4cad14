//! Scaffolding for new descriptor files.

use crate::error::{CoreError, CoreResult};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// Timestamp prefix format; sorts lexicographically in chronological order.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// File name for a new descriptor created at `now`
pub fn descriptor_file_name(name: &str, now: NaiveDateTime) -> CoreResult<String> {
    validate_name(name)?;
    Ok(format!("{}_{}.json", now.format(TIMESTAMP_FORMAT), name))
}

/// Write an empty descriptor named `<timestamp>_<name>.json` into `dir`.
///
/// Refuses to overwrite an existing file.
pub fn new_descriptor_file(dir: &Path, name: &str, now: NaiveDateTime) -> CoreResult<PathBuf> {
    if !dir.is_dir() {
        return Err(CoreError::MigrationsDirNotFound {
            path: dir.display().to_string(),
        });
    }

    let path = dir.join(descriptor_file_name(name, now)?);
    if path.exists() {
        return Err(CoreError::DescriptorExists {
            path: path.display().to_string(),
        });
    }

    let skeleton = serde_json::json!({ "up": [] });
    let mut content = serde_json::to_string_pretty(&skeleton)?;
    content.push('\n');

    std::fs::write(&path, content).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(path)
}

fn validate_name(name: &str) -> CoreResult<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_whitespace);
    if valid {
        Ok(())
    } else {
        Err(CoreError::ConfigInvalid {
            message: format!(
                "migration name '{}' must be non-empty and contain no whitespace or path separators",
                name
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::load_descriptors;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_file_name_format() {
        assert_eq!(
            descriptor_file_name("create_users", at(7, 5, 3)).unwrap(),
            "20240309070503_create_users.json"
        );
    }

    #[test]
    fn test_rejects_bad_names() {
        for bad in ["", "../escape", "a/b", "with space", ".hidden"] {
            assert!(descriptor_file_name(bad, at(0, 0, 0)).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_new_file_is_loadable_and_sorted() {
        let dir = TempDir::new().unwrap();
        new_descriptor_file(dir.path(), "second", at(12, 0, 1)).unwrap();
        new_descriptor_file(dir.path(), "first", at(12, 0, 0)).unwrap();

        let descriptors = load_descriptors(dir.path()).unwrap();
        let keys: Vec<&str> = descriptors.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["20240309120000_first", "20240309120001_second"]);
        assert!(descriptors[0].up.is_empty());
        assert!(descriptors[0].down.is_none());
    }

    #[test]
    fn test_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        new_descriptor_file(dir.path(), "dup", at(1, 2, 3)).unwrap();
        let err = new_descriptor_file(dir.path(), "dup", at(1, 2, 3)).unwrap_err();
        assert!(matches!(err, CoreError::DescriptorExists { .. }));
    }
}
