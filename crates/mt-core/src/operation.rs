//! Declarative migration operations.
//!
//! A descriptor's `up` and `down` members are lists of operation objects such
//! as `{ create_table: { ... } }` or `{ drop_table: "Foo" }`. Each object is
//! mapped to exactly one [`Operation`] variant by [`Operation::from_value`];
//! anything that matches no variant, or several, is rejected before any SQL
//! is compiled.

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::{scalar_to_string, truthy};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fmt;

/// A single declarative schema change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `create_table`
    CreateTable(CreateTableSpec),
    /// `drop_table: <name>`
    DropTable(String),
    /// `add_column`
    AddColumn(ColumnsSpec),
    /// `remove_column`
    RemoveColumn(RemoveColumnSpec),
    /// `change_column`
    ChangeColumn(ColumnsSpec),
    /// `foreign_key`
    AddForeignKey(ForeignKeySpec),
    /// `drop_constraint`
    DropConstraint(DropConstraintSpec),
    /// `add_index`
    AddIndex(IndexSpec),
    /// `remove_index`
    RemoveIndex(IndexSpec),
    /// `execute: <sql>` or `execute: [<fragment>, ...]`
    Execute(ExecuteSql),
    /// A bare string in place of an operation object (legacy literal SQL)
    RawShorthand(String),
}

/// Discriminant of [`Operation`], named after the descriptor key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CreateTable,
    DropTable,
    AddColumn,
    RemoveColumn,
    ChangeColumn,
    AddForeignKey,
    DropConstraint,
    AddIndex,
    RemoveIndex,
    Execute,
    RawShorthand,
}

/// Every kind that is spelled as an object key, in the order keys are checked.
const KEYED_KINDS: &[OperationKind] = &[
    OperationKind::CreateTable,
    OperationKind::DropTable,
    OperationKind::AddColumn,
    OperationKind::RemoveColumn,
    OperationKind::ChangeColumn,
    OperationKind::AddForeignKey,
    OperationKind::DropConstraint,
    OperationKind::AddIndex,
    OperationKind::RemoveIndex,
    OperationKind::Execute,
];

impl OperationKind {
    /// Descriptor key for this kind (`raw` for the bare-string shorthand)
    pub fn key(self) -> &'static str {
        match self {
            OperationKind::CreateTable => "create_table",
            OperationKind::DropTable => "drop_table",
            OperationKind::AddColumn => "add_column",
            OperationKind::RemoveColumn => "remove_column",
            OperationKind::ChangeColumn => "change_column",
            OperationKind::AddForeignKey => "foreign_key",
            OperationKind::DropConstraint => "drop_constraint",
            OperationKind::AddIndex => "add_index",
            OperationKind::RemoveIndex => "remove_index",
            OperationKind::Execute => "execute",
            OperationKind::RawShorthand => "raw",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Column definition used by `create_table`, `add_column`, and `change_column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,

    /// Shorthand or native type
    #[serde(rename = "type")]
    pub column_type: String,

    /// Explicit nullability; absent means `NOT NULL`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    /// Named default constraint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultSpec>,
}

impl ColumnSpec {
    /// Create a column with no explicit nullability and no default
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            nullable: None,
            default: None,
        }
    }

    /// Set explicit nullability
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Attach a named default constraint
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default = Some(DefaultSpec {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Whether the column is the identity primary key (`pk` shorthand)
    pub fn is_primary_key(&self) -> bool {
        self.column_type == crate::column_type::PRIMARY_KEY_SHORTHAND
    }

    /// Nullability as emitted: only an explicit `true` allows NULL
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(false)
    }
}

/// Named default constraint on a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultSpec {
    /// Constraint name
    pub name: String,

    /// Literal SQL default expression
    #[serde(deserialize_with = "scalar_to_string")]
    pub value: String,
}

/// Payload of `create_table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTableSpec {
    /// Table name
    pub name: String,

    /// Append the four audit columns
    #[serde(default, deserialize_with = "truthy")]
    pub timestamps: bool,

    /// Columns in declaration order
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

/// Payload of `add_column` and `change_column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnsSpec {
    /// Target table
    pub table: String,

    /// Columns in declaration order
    pub columns: Vec<ColumnSpec>,
}

/// Payload of `remove_column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveColumnSpec {
    pub table: String,
    pub name: String,
}

/// Payload of `drop_constraint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropConstraintSpec {
    pub table: String,
    pub name: String,
}

/// Payload of `foreign_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeySpec {
    /// Constraint name
    pub name: String,

    /// Referencing side
    pub from: ForeignKeyEnd,

    /// Referenced side
    pub to: ForeignKeyEnd,
}

/// One side of a foreign key: a table and its ordered key columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyEnd {
    pub table: String,
    pub columns: Vec<String>,
}

/// Payload of `add_index` and `remove_index`.
///
/// The index name is never stored; it is always derived from the table and
/// columns so that `add_index` and `remove_index` agree on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    /// Indexed table
    pub table_name: String,

    /// Indexed columns in declaration order
    pub columns: Vec<String>,
}

impl IndexSpec {
    /// Derived index name: `IX_<table>_<col1>_<col2>...`, spaces in column
    /// names replaced with underscores.
    pub fn derived_name(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| c.replace(' ', "_")).collect();
        format!("IX_{}_{}", self.table_name, columns.join("_"))
    }
}

/// Payload of `execute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecuteSql {
    /// One literal statement
    Single(String),
    /// Fragments of one long statement, joined by line breaks
    Fragments(Vec<String>),
}

impl ExecuteSql {
    /// The statement text to run
    pub fn to_sql(&self) -> String {
        match self {
            ExecuteSql::Single(sql) => sql.clone(),
            ExecuteSql::Fragments(parts) => parts.join("\n"),
        }
    }
}

impl Operation {
    /// The kind of this operation
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::CreateTable(_) => OperationKind::CreateTable,
            Operation::DropTable(_) => OperationKind::DropTable,
            Operation::AddColumn(_) => OperationKind::AddColumn,
            Operation::RemoveColumn(_) => OperationKind::RemoveColumn,
            Operation::ChangeColumn(_) => OperationKind::ChangeColumn,
            Operation::AddForeignKey(_) => OperationKind::AddForeignKey,
            Operation::DropConstraint(_) => OperationKind::DropConstraint,
            Operation::AddIndex(_) => OperationKind::AddIndex,
            Operation::RemoveIndex(_) => OperationKind::RemoveIndex,
            Operation::Execute(_) => OperationKind::Execute,
            Operation::RawShorthand(_) => OperationKind::RawShorthand,
        }
    }

    /// Parse one operation from its document form.
    ///
    /// A bare string is the legacy literal-SQL shorthand. An object must carry
    /// exactly one recognised operation key with a non-null value; other keys
    /// are ignored.
    pub fn from_value(value: &Value) -> CoreResult<Self> {
        let map = match value {
            Value::String(sql) => return Ok(Operation::RawShorthand(sql.clone())),
            Value::Mapping(map) => map,
            other => {
                return Err(CoreError::UnknownOperation {
                    found: describe_value(other).to_string(),
                })
            }
        };

        let present: Vec<(OperationKind, &Value)> = KEYED_KINDS
            .iter()
            .filter_map(|kind| match map.get(kind.key()) {
                None | Some(Value::Null) => None,
                Some(payload) => Some((*kind, payload)),
            })
            .collect();

        let (kind, payload) = match present.as_slice() {
            [single] => *single,
            [] => {
                let keys: Vec<String> = map
                    .keys()
                    .map(|k| k.as_str().unwrap_or("<non-string key>").to_string())
                    .collect();
                return Err(CoreError::UnknownOperation {
                    found: if keys.is_empty() {
                        "empty object".to_string()
                    } else {
                        format!("object with keys [{}]", keys.join(", "))
                    },
                });
            }
            many => {
                let keys: Vec<&str> = many.iter().map(|(k, _)| k.key()).collect();
                return Err(CoreError::InvalidOperation {
                    operation: keys.join("+"),
                    message: "operation keys are mutually exclusive; split them into separate operations"
                        .to_string(),
                });
            }
        };

        let op = match kind {
            OperationKind::CreateTable => Operation::CreateTable(payload_as(kind, payload)?),
            OperationKind::DropTable => match payload {
                Value::String(name) if !name.is_empty() => Operation::DropTable(name.clone()),
                other => return Err(invalid(kind, expected("a table name", other))),
            },
            OperationKind::AddColumn => {
                Operation::AddColumn(non_empty_columns(kind, payload_as(kind, payload)?)?)
            }
            OperationKind::RemoveColumn => Operation::RemoveColumn(payload_as(kind, payload)?),
            OperationKind::ChangeColumn => {
                Operation::ChangeColumn(non_empty_columns(kind, payload_as(kind, payload)?)?)
            }
            OperationKind::AddForeignKey => {
                let fk: ForeignKeySpec = payload_as(kind, payload)?;
                if fk.from.columns.is_empty() || fk.to.columns.is_empty() {
                    return Err(invalid(
                        kind,
                        "both 'from' and 'to' need at least one column".to_string(),
                    ));
                }
                Operation::AddForeignKey(fk)
            }
            OperationKind::DropConstraint => Operation::DropConstraint(payload_as(kind, payload)?),
            OperationKind::AddIndex => Operation::AddIndex(non_empty_index(kind, payload)?),
            OperationKind::RemoveIndex => Operation::RemoveIndex(non_empty_index(kind, payload)?),
            OperationKind::Execute => match payload {
                Value::String(sql) => Operation::Execute(ExecuteSql::Single(sql.clone())),
                Value::Sequence(_) => Operation::Execute(payload_as(kind, payload)?),
                other => {
                    return Err(invalid(
                        kind,
                        expected("a string or a list of strings", other),
                    ))
                }
            },
            OperationKind::RawShorthand => {
                return Err(invalid(kind, "literal SQL must be a bare string".to_string()))
            }
        };
        Ok(op)
    }

    /// Parse an `up` or `down` member into an ordered operation list.
    ///
    /// A missing (`null`) member yields an empty list, a sequence yields one
    /// operation per element, and anything else is a one-element list.
    pub fn list_from_value(value: &Value) -> CoreResult<Vec<Self>> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Sequence(items) => items.iter().map(Self::from_value).collect(),
            single => Ok(vec![Self::from_value(single)?]),
        }
    }
}

fn payload_as<T: DeserializeOwned>(kind: OperationKind, payload: &Value) -> CoreResult<T> {
    serde_yaml::from_value(payload.clone()).map_err(|e| invalid(kind, e.to_string()))
}

fn non_empty_columns(kind: OperationKind, spec: ColumnsSpec) -> CoreResult<ColumnsSpec> {
    if spec.columns.is_empty() {
        return Err(invalid(kind, "'columns' must list at least one column".to_string()));
    }
    Ok(spec)
}

fn non_empty_index(kind: OperationKind, payload: &Value) -> CoreResult<IndexSpec> {
    let spec: IndexSpec = payload_as(kind, payload)?;
    if spec.columns.is_empty() {
        return Err(invalid(kind, "'columns' must list at least one column".to_string()));
    }
    Ok(spec)
}

fn invalid(kind: OperationKind, message: String) -> CoreError {
    CoreError::InvalidOperation {
        operation: kind.key().to_string(),
        message,
    }
}

fn expected(what: &str, found: &Value) -> String {
    format!("expected {}, found {}", what, describe_value(found))
}

/// Short human-readable name for a YAML value's shape
pub(crate) fn describe_value(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(s) if s.is_empty() => "an empty string",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "an object",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
#[path = "operation_test.rs"]
mod tests;
