//! SQL fragment builders.
//!
//! These helpers turn request-shaped data into the body of a `SET` or `WHERE`
//! clause plus the values for its `$1, $2, ...` placeholders. They never touch
//! the database; data-access code splices the fragment into a statement
//! template and passes the values to the client.
//!
//! # Example
//!
//! ```ignore
//! use jobly::sql::{AliasMap, UpdatePayload, sql_for_partial_update};
//!
//! let payload = UpdatePayload::new().set("firstName", "Aliya").set("age", 32);
//! let aliases = AliasMap::new(&[("firstName", "first_name")]);
//! let frag = sql_for_partial_update(payload, &aliases)?;
//!
//! assert_eq!(frag.fragment, r#""first_name"=$1, "age"=$2"#);
//! ```

mod filter;
mod fragment;
mod partial_update;

#[cfg(test)]
mod tests;

pub use filter::{CompanyFilter, JobFilter, sql_for_company_filter, sql_for_job_filter};
pub use fragment::SqlFragment;
pub use partial_update::{AliasMap, UpdatePayload, sql_for_partial_update};

/// Render a positional placeholder (`$n`).
pub(crate) fn placeholder(n: usize) -> String {
    format!("${n}")
}

/// Append `"<column>"` to `out`.
pub(crate) fn push_quoted(out: &mut String, column: &str) {
    out.push('"');
    out.push_str(column);
    out.push('"');
}
