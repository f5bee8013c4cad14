//! Inverse-operation inference for descriptors that declare no `down`.
//!
//! Only additive operations have an unambiguous inverse. Everything else
//! infers nothing and is rendered as a diagnostic no-op; no destructive
//! statement is ever guessed.

use crate::compiler::{compile, Statement};
use crate::operation::{DropConstraintSpec, Operation, OperationKind, RemoveColumnSpec};

/// Whether [`infer`] produces an inverse for operations of this kind.
pub fn can_infer(kind: OperationKind) -> bool {
    matches!(
        kind,
        OperationKind::CreateTable
            | OperationKind::AddColumn
            | OperationKind::AddIndex
            | OperationKind::AddForeignKey
    )
}

/// Derive the inverse of one operation.
///
/// `add_column` reverses only its first declared column.
pub fn infer(op: &Operation) -> Option<Operation> {
    match op {
        Operation::CreateTable(spec) => Some(Operation::DropTable(spec.name.clone())),
        Operation::AddColumn(spec) => {
            let first = spec.columns.first()?;
            if spec.columns.len() > 1 {
                log::warn!(
                    "Inferred down for add_column on '{}' drops only '{}'; declare an explicit down to drop all {} columns",
                    spec.table,
                    first.name,
                    spec.columns.len()
                );
            }
            Some(Operation::RemoveColumn(RemoveColumnSpec {
                table: spec.table.clone(),
                name: first.name.clone(),
            }))
        }
        Operation::AddIndex(spec) => Some(Operation::RemoveIndex(spec.clone())),
        Operation::AddForeignKey(spec) => Some(Operation::DropConstraint(DropConstraintSpec {
            table: spec.from.table.clone(),
            name: spec.name.clone(),
        })),
        _ => None,
    }
}

/// Statements that revert `up` when no explicit down exists.
///
/// Inverses run in reverse declared order. Each operation with no inverse
/// contributes one diagnostic no-op, as does an empty `up`.
pub fn inverse_statements(up: &[Operation]) -> Vec<Statement> {
    if up.is_empty() {
        return vec![Statement::no_op()];
    }

    up.iter()
        .rev()
        .flat_map(|op| match infer(op) {
            Some(inverse) => compile(&inverse),
            None => {
                log::warn!(
                    "Cannot infer a down for '{}'; declare one explicitly",
                    op.kind()
                );
                vec![Statement::no_op()]
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "inverse_test.rs"]
mod tests;
