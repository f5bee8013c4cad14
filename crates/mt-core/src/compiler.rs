//! Statement compiler: turns [`Operation`]s into literal SQL Server statements.

use crate::column_type::{declares_identity, resolve, PRIMARY_KEY_CLAUSE};
use crate::operation::{
    ColumnSpec, ColumnsSpec, CreateTableSpec, ForeignKeySpec, IndexSpec, Operation,
};
use serde::Serialize;
use std::fmt;

/// Comment emitted when a step has no operation to run.
pub const NO_DOWN_DIAGNOSTIC: &str =
    "-- no DOWN specified. If this is a CREATE table or ADD COLUMN - it will be generated for you";

/// Audit columns appended to tables created with `timestamps: true`.
const TIMESTAMP_COLUMNS: &[&str] = &[
    "[CreatedBy] nvarchar(250) NOT NULL",
    "[CreatedOn] datetime DEFAULT getdate() NOT NULL",
    "[ModifiedBy] nvarchar(250) NOT NULL",
    "[ModifiedOn] datetime DEFAULT getdate() NOT NULL",
];

/// Name of the identity column injected when a table declares none.
const IMPLICIT_PK_NAME: &str = "Id";

/// One compiled statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "sql", rename_all = "lowercase")]
pub enum Statement {
    /// SQL to send to the executor
    Sql(String),
    /// A no-op comment; reported, never executed
    Diagnostic(String),
}

impl Statement {
    /// Statement text as it would appear in a script
    pub fn text(&self) -> &str {
        match self {
            Statement::Sql(sql) | Statement::Diagnostic(sql) => sql,
        }
    }

    /// Whether this statement must be sent to the database
    pub fn is_executable(&self) -> bool {
        matches!(self, Statement::Sql(_))
    }

    /// The diagnostic no-op used when nothing can be compiled
    pub fn no_op() -> Self {
        Statement::Diagnostic(NO_DOWN_DIAGNOSTIC.to_string())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Compile one operation into its ordered statements.
///
/// Every operation yields a single statement except `change_column`, which
/// yields one `ALTER COLUMN` per column because T-SQL alters one column per
/// statement.
///
/// `drop_table` and `remove_index` accept schema-qualified table names
/// (`dbo.Users`) and quote each part separately.
pub fn compile(op: &Operation) -> Vec<Statement> {
    match op {
        Operation::CreateTable(spec) => vec![Statement::Sql(create_table(spec))],
        Operation::DropTable(name) => vec![Statement::Sql(format!(
            "DROP TABLE {}",
            quote_qualified(name)
        ))],
        Operation::AddColumn(spec) => vec![Statement::Sql(add_column(spec))],
        Operation::ChangeColumn(spec) => change_column(spec)
            .into_iter()
            .map(Statement::Sql)
            .collect(),
        Operation::RemoveColumn(spec) => vec![Statement::Sql(format!(
            "ALTER TABLE {} DROP COLUMN {}",
            quote(&spec.table),
            quote(&spec.name)
        ))],
        Operation::AddForeignKey(spec) => vec![Statement::Sql(add_foreign_key(spec))],
        Operation::DropConstraint(spec) => vec![Statement::Sql(format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            quote(&spec.table),
            quote(&spec.name)
        ))],
        Operation::AddIndex(spec) => vec![Statement::Sql(add_index(spec))],
        Operation::RemoveIndex(spec) => vec![Statement::Sql(format!(
            "DROP INDEX {}.{}",
            quote_qualified(&spec.table_name),
            quote(&spec.derived_name())
        ))],
        Operation::Execute(sql) => vec![Statement::Sql(sql.to_sql())],
        Operation::RawShorthand(sql) => vec![Statement::Sql(raw_shorthand(sql))],
    }
}

/// Compile a list of operations in declared order.
pub fn compile_all(ops: &[Operation]) -> Vec<Statement> {
    ops.iter().flat_map(compile).collect()
}

/// Bracket-quote an identifier
pub fn quote(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

/// Bracket-quote each dot-separated part of a possibly schema-qualified name
pub fn quote_qualified(name: &str) -> String {
    name.split('.').map(quote).collect::<Vec<_>>().join(".")
}

/// Render one column definition: name, resolved type, default, nullability.
///
/// The primary-key column never carries a nullability annotation.
pub fn column_definition(col: &ColumnSpec) -> String {
    let mut def = format!("{} {}", quote(&col.name), resolve(&col.column_type));

    if let Some(default) = &col.default {
        def.push_str(&format!(
            " CONSTRAINT {} DEFAULT {}",
            quote(&default.name),
            default.value
        ));
    }

    if !col.is_primary_key() {
        def.push_str(if col.is_nullable() { " NULL" } else { " NOT NULL" });
    }
    def
}

fn create_table(spec: &CreateTableSpec) -> String {
    let mut defs: Vec<String> = spec.columns.iter().map(column_definition).collect();

    if spec.timestamps {
        defs.extend(TIMESTAMP_COLUMNS.iter().map(|c| c.to_string()));
    }

    let has_identity = spec
        .columns
        .iter()
        .any(|c| declares_identity(&resolve(&c.column_type)));
    if !has_identity {
        defs.insert(
            0,
            format!("{} {} NOT NULL", quote(IMPLICIT_PK_NAME), PRIMARY_KEY_CLAUSE),
        );
    }

    format!(
        "CREATE TABLE {} (\n    {}\n)",
        quote(&spec.name),
        defs.join(",\n    ")
    )
}

fn add_column(spec: &ColumnsSpec) -> String {
    let defs: Vec<String> = spec.columns.iter().map(column_definition).collect();
    format!("ALTER TABLE {} ADD {}", quote(&spec.table), defs.join(", "))
}

// ALTER COLUMN takes a single column, so each changed column is its own statement
fn change_column(spec: &ColumnsSpec) -> Vec<String> {
    spec.columns
        .iter()
        .map(|col| {
            format!(
                "ALTER TABLE {} ALTER COLUMN {}",
                quote(&spec.table),
                column_definition(col)
            )
        })
        .collect()
}

fn add_foreign_key(spec: &ForeignKeySpec) -> String {
    format!(
        "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
        quote(&spec.from.table),
        quote(&spec.name),
        quote_list(&spec.from.columns),
        quote(&spec.to.table),
        quote_list(&spec.to.columns)
    )
}

fn add_index(spec: &IndexSpec) -> String {
    let columns: Vec<String> = spec
        .columns
        .iter()
        .map(|c| format!("{} ASC", quote(c)))
        .collect();
    format!(
        "CREATE NONCLUSTERED INDEX {} ON {} ({})",
        quote(&spec.derived_name()),
        quote(&spec.table_name),
        columns.join(", ")
    )
}

fn raw_shorthand(sql: &str) -> String {
    resolve(sql).replace(['{', '}'], "")
}

fn quote_list(idents: &[String]) -> String {
    idents.iter().map(|i| quote(i)).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
#[path = "compiler_test.rs"]
mod tests;
