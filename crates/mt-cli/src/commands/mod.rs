//! CLI command implementations

pub(crate) mod compile;
pub(crate) mod goto;
pub(crate) mod list;
pub(crate) mod new;
