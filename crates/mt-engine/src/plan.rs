//! Migration planning.
//!
//! A plan is the exact ordered sequence of steps a migration from one version
//! to another executes. Version `v` means descriptors `1..=v` are applied.

use mt_core::{MigrationDescriptor, MigrationKey, Statement};
use serde::Serialize;
use std::fmt;

/// Direction a step moves the version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// One descriptor applied or reverted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationStep {
    pub direction: Direction,

    /// 1-based position of the descriptor this step runs
    pub version: usize,

    /// Descriptor key; `None` when the stored version points past the last
    /// descriptor and there is nothing to revert
    pub key: Option<MigrationKey>,

    /// Version persisted once the step succeeds
    pub version_after: usize,

    pub statements: Vec<Statement>,
}

/// Ordered steps from one version to another
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationPlan {
    pub from: usize,
    pub to: usize,
    pub steps: Vec<MigrationStep>,
}

impl MigrationPlan {
    /// Build the plan that moves `from` to `to`.
    ///
    /// Moving up applies descriptors `from+1..=to` in order. Moving down
    /// reverts `from` down to `to+1`, newest first.
    pub fn build(descriptors: &[MigrationDescriptor], from: usize, to: usize) -> Self {
        let steps = if to > from {
            (from + 1..=to)
                .map(|version| {
                    let descriptor = descriptors.get(version - 1);
                    MigrationStep {
                        direction: Direction::Up,
                        version,
                        key: descriptor.map(|d| d.key.clone()),
                        version_after: version,
                        statements: descriptor.map(|d| d.up_statements()).unwrap_or_default(),
                    }
                })
                .collect()
        } else {
            (to + 1..=from)
                .rev()
                .map(|version| {
                    let descriptor = descriptors.get(version - 1);
                    MigrationStep {
                        direction: Direction::Down,
                        version,
                        key: descriptor.map(|d| d.key.clone()),
                        version_after: version - 1,
                        statements: descriptor
                            .map(|d| d.down_statements())
                            .unwrap_or_default(),
                    }
                })
                .collect()
        };

        Self { from, to, steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Every statement in the plan, in execution order
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.steps.iter().flat_map(|s| s.statements.iter())
    }
}
