//! Strongly-typed descriptor sort key.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Sort key of a migration descriptor: its file name without extension.
///
/// Keys order by plain lexicographic string comparison, so descriptor files
/// must be named so that this order is also their chronological order
/// (zero-padded sequence numbers or timestamp prefixes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationKey(String);

impl MigrationKey {
    /// Try to create a new `MigrationKey`, returning `None` if the key is empty.
    pub fn try_new(key: impl Into<String>) -> Option<Self> {
        let s = key.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Return the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MigrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for MigrationKey {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MigrationKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MigrationKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MigrationKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
