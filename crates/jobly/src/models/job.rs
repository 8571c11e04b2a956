use super::{FieldRule, check_update_fields};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::row::{FromRow, RowExt, from_rows};
use crate::sql::{
    AliasMap, JobFilter, UpdatePayload, placeholder, sql_for_job_filter, sql_for_partial_update,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// External field names that differ from `jobs` columns.
pub const JOB_ALIASES: AliasMap<'static> = AliasMap::new(&[("companyHandle", "company_handle")]);

const UPDATABLE: &[(&str, FieldRule)] = &[
    ("title", FieldRule::Text),
    ("salary", FieldRule::OptionalInt),
    ("equity", FieldRule::OptionalNumeric),
];

const COLUMNS: &str = "id, title, salary, equity, company_handle";

/// A row of the `jobs` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Input for [`Job::create`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

fn no_such_job(id: i32) -> JoblyError {
    JoblyError::not_found(format!("No job with id: {id}"))
}

impl Job {
    pub async fn create(conn: &impl GenericClient, new: &NewJob) -> JoblyResult<Job> {
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        let row = conn
            .query_one(
                &sql,
                &[&new.title, &new.salary, &new.equity, &new.company_handle],
            )
            .await?;
        let job = Job::from_row(&row)?;
        tracing::info!(id = job.id, company = %job.company_handle, "created job");
        Ok(job)
    }

    /// All jobs, ordered by title.
    pub async fn find_all(conn: &impl GenericClient) -> JoblyResult<Vec<Job>> {
        let sql = format!("SELECT {COLUMNS} FROM jobs ORDER BY title");
        let rows = conn.query(&sql, &[]).await?;
        from_rows(&rows)
    }

    /// Jobs matching `filter`, ordered by title.
    ///
    /// A filter that emits no predicate (empty, or only `has_equity: false`)
    /// behaves like [`Job::find_all`].
    pub async fn search(conn: &impl GenericClient, filter: JobFilter) -> JoblyResult<Vec<Job>> {
        let frag = sql_for_job_filter(filter);
        if frag.is_empty() {
            return Self::find_all(conn).await;
        }

        let sql = format!(
            "SELECT {COLUMNS} FROM jobs WHERE {} ORDER BY title",
            frag.fragment
        );
        let rows = conn.query(&sql, &frag.params_ref()).await?;
        from_rows(&rows)
    }

    /// Jobs posted by one company, ordered by id.
    pub async fn for_company(conn: &impl GenericClient, handle: &str) -> JoblyResult<Vec<Job>> {
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE company_handle = $1 ORDER BY id");
        let rows = conn.query(&sql, &[&handle]).await?;
        from_rows(&rows)
    }

    pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<Job> {
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        let row = conn
            .query_opt(&sql, &[&id])
            .await?
            .ok_or_else(|| no_such_job(id))?;
        Job::from_row(&row)
    }

    /// Partially update a job.
    ///
    /// Accepts `title` (text), `salary` (integer or null) and `equity` (number
    /// or null). Moving a job to another company (`companyHandle` /
    /// `company_handle`) is rejected.
    pub async fn update(
        conn: &impl GenericClient,
        id: i32,
        payload: UpdatePayload,
    ) -> JoblyResult<Job> {
        if payload
            .keys()
            .any(|k| JOB_ALIASES.column(k) == "company_handle")
        {
            return Err(JoblyError::validation(
                "a job cannot be moved to another company",
            ));
        }
        check_update_fields(&payload, UPDATABLE)?;
        let frag = sql_for_partial_update(payload, &JOB_ALIASES)?;

        let sql = format!(
            "UPDATE jobs SET {} WHERE id = {} RETURNING {COLUMNS}",
            frag.fragment,
            placeholder(frag.next_placeholder())
        );
        let mut params = frag.params_ref();
        params.push(&id);

        let row = conn
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| no_such_job(id))?;
        tracing::info!(id, "updated job");
        Job::from_row(&row)
    }

    pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
        let deleted = conn
            .execute("DELETE FROM jobs WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(no_such_job(id));
        }
        tracing::info!(id, "removed job");
        Ok(())
    }
}
