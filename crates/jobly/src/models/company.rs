use super::{FieldRule, check_update_fields};
use super::job::Job;
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::row::{FromRow, RowExt, from_rows};
use crate::sql::{
    AliasMap, CompanyFilter, UpdatePayload, placeholder, sql_for_company_filter,
    sql_for_partial_update,
};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// External field names that differ from `companies` columns.
pub const COMPANY_ALIASES: AliasMap<'static> =
    AliasMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

const UPDATABLE: &[(&str, FieldRule)] = &[
    ("name", FieldRule::Text),
    ("description", FieldRule::Text),
    ("numEmployees", FieldRule::OptionalInt),
    ("logoUrl", FieldRule::OptionalText),
];

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

/// A row of the `companies` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Input for [`Company::create`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// A company together with its jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

impl Company {
    /// Insert a company.
    ///
    /// A handle that already exists is a validation error.
    pub async fn create(conn: &impl GenericClient, new: &NewCompany) -> JoblyResult<Company> {
        let duplicate = conn
            .query_opt(
                "SELECT handle FROM companies WHERE handle = $1",
                &[&new.handle],
            )
            .await?;
        if duplicate.is_some() {
            return Err(JoblyError::validation(format!(
                "Duplicate company: {}",
                new.handle
            )));
        }

        let sql = format!(
            "INSERT INTO companies ({COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        let row = conn
            .query_one(
                &sql,
                &[
                    &new.handle,
                    &new.name,
                    &new.description,
                    &new.num_employees,
                    &new.logo_url,
                ],
            )
            .await?;
        tracing::info!(handle = %new.handle, "created company");
        Company::from_row(&row)
    }

    /// All companies, ordered by name.
    pub async fn find_all(conn: &impl GenericClient) -> JoblyResult<Vec<Company>> {
        let sql = format!("SELECT {COLUMNS} FROM companies ORDER BY name");
        let rows = conn.query(&sql, &[]).await?;
        from_rows(&rows)
    }

    /// Companies matching `filter`, ordered by name.
    ///
    /// An empty filter behaves like [`Company::find_all`].
    pub async fn search(
        conn: &impl GenericClient,
        filter: CompanyFilter,
    ) -> JoblyResult<Vec<Company>> {
        let frag = sql_for_company_filter(filter)?;
        if frag.is_empty() {
            return Self::find_all(conn).await;
        }

        let sql = format!(
            "SELECT {COLUMNS} FROM companies WHERE {} ORDER BY name",
            frag.fragment
        );
        let rows = conn.query(&sql, &frag.params_ref()).await?;
        from_rows(&rows)
    }

    /// A company and its jobs.
    pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
        let sql = format!("SELECT {COLUMNS} FROM companies WHERE handle = $1");
        let row = conn
            .query_opt(&sql, &[&handle])
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;
        let company = Company::from_row(&row)?;
        let jobs = Job::for_company(conn, handle).await?;
        Ok(CompanyDetail { company, jobs })
    }

    /// Partially update a company.
    ///
    /// Accepts `name`, `description`, `numEmployees` and `logoUrl`; the handle
    /// is immutable. Values of the wrong shape (a null name, a non-integer
    /// employee count) are validation errors.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        payload: UpdatePayload,
    ) -> JoblyResult<Company> {
        check_update_fields(&payload, UPDATABLE)?;
        let frag = sql_for_partial_update(payload, &COMPANY_ALIASES)?;

        let sql = format!(
            "UPDATE companies SET {} WHERE handle = {} RETURNING {COLUMNS}",
            frag.fragment,
            placeholder(frag.next_placeholder())
        );
        let mut params = frag.params_ref();
        params.push(&handle);

        let row = conn
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;
        tracing::info!(handle, "updated company");
        Company::from_row(&row)
    }

    /// Delete a company (its jobs go with it).
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> JoblyResult<()> {
        let deleted = conn
            .execute("DELETE FROM companies WHERE handle = $1", &[&handle])
            .await?;
        if deleted == 0 {
            return Err(JoblyError::not_found(format!("No company: {handle}")));
        }
        tracing::info!(handle, "removed company");
        Ok(())
    }
}
