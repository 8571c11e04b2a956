//! # jobly
//!
//! Companies and the jobs they post, stored in PostgreSQL.
//!
//! ## Features
//!
//! - **Fragment builders**: [`sql`] turns partial-update payloads and search
//!   filters into parameterized `SET` / `WHERE` clauses
//! - **Data access**: [`Company`] and [`Job`] run against any [`GenericClient`]
//! - **Transaction-friendly**: pass a transaction anywhere a client is expected
//! - **Statement tracing**: wrap a client in [`TracingClient`] to log SQL
//!
//! ```ignore
//! use jobly::{Company, CompanyFilter};
//!
//! let filter = CompanyFilter {
//!     name: Some("net".into()),
//!     ..Default::default()
//! };
//! let companies = Company::search(&client, filter).await?;
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod row;
pub mod sql;
pub mod trace;
pub mod value;

pub use client::GenericClient;
pub use error::{JoblyError, JoblyResult};
pub use models::{COMPANY_ALIASES, Company, CompanyDetail, JOB_ALIASES, Job, NewCompany, NewJob};
pub use row::{FromRow, RowExt};
pub use sql::{
    AliasMap, CompanyFilter, JobFilter, SqlFragment, UpdatePayload, sql_for_company_filter,
    sql_for_job_filter, sql_for_partial_update,
};
pub use trace::TracingClient;
pub use value::Value;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};

#[cfg(feature = "pool")]
pub use deadpool_postgres::Pool;
