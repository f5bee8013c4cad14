//! Shorthand column types and their native SQL Server spellings.
//!
//! Descriptor authors write portable names such as `string` or `pk`; these are
//! rewritten to native type clauses before a column definition is emitted.

/// Native clause for the `pk` shorthand: identity integer primary key.
pub const PRIMARY_KEY_CLAUSE: &str = "int PRIMARY KEY IDENTITY(1,1)";

/// Shorthand token that marks a primary-key column.
pub const PRIMARY_KEY_SHORTHAND: &str = "pk";

/// Substitutions applied in order. Order matters: each rewrite sees the output
/// of the previous one.
const SHORTHANDS: &[(&str, &str)] = &[
    (PRIMARY_KEY_SHORTHAND, PRIMARY_KEY_CLAUSE),
    ("money", "decimal(8,2)"),
    ("date", "datetime"),
    ("string", "nvarchar(255)"),
    ("boolean", "bit"),
    ("text", "nvarchar(MAX)"),
    ("guid", "uniqueidentifier"),
];

/// Resolve a shorthand type to its native clause.
///
/// Substitution is literal and substring-based: `varchar(50)` passes through
/// unchanged, but a native type that merely contains a shorthand word is
/// rewritten too (`datetime` becomes `datetimetime`). Existing descriptors
/// rely on this, so it is kept as-is.
pub fn resolve(token: &str) -> String {
    SHORTHANDS
        .iter()
        .fold(token.to_string(), |acc, (short, native)| {
            acc.replace(short, native)
        })
}

/// Whether a resolved type clause already declares a primary key or identity.
pub fn declares_identity(resolved: &str) -> bool {
    resolved.contains("PRIMARY KEY") || resolved.contains("IDENTITY")
}
