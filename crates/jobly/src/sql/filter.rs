use super::{SqlFragment, placeholder};
use crate::error::{JoblyError, JoblyResult};
use crate::value::Value;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::cmp::Ordering;

/// Search parameters for companies.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFilter {
    /// Case-insensitive substring of the company name.
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub min_employees: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub max_employees: Option<i64>,
}

/// Search parameters for jobs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    /// Case-insensitive substring of the job title.
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub min_salary: Option<i64>,
    /// Only jobs with non-zero equity when `Some(true)`.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_equity: Option<bool>,
}

/// Filters usually arrive as query strings, so numbers and flags may be text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose<T> {
    Native(T),
    Text(String),
}

fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    match Option::<Loose<i64>>::deserialize(d)? {
        None => Ok(None),
        Some(Loose::Native(n)) => Ok(Some(n)),
        Some(Loose::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected an integer, got {s:?}"))),
    }
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    match Option::<Loose<bool>>::deserialize(d)? {
        None => Ok(None),
        Some(Loose::Native(b)) => Ok(Some(b)),
        Some(Loose::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected true or false, got {s:?}"))),
    }
}

impl CompanyFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.min_employees.is_none() && self.max_employees.is_none()
    }
}

impl JobFilter {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.min_salary.is_none() && self.has_equity.is_none()
    }
}

fn like_pattern(s: &str) -> String {
    format!("%{s}%")
}

fn ilike(column: &str, n: usize) -> String {
    format!("LOWER(\"{column}\") LIKE LOWER({})", placeholder(n))
}

/// Descending numeric order; values without a numeric reading sort first and
/// keep their relative order.
fn numeric_desc(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Build the body of a `WHERE` clause for a company search.
///
/// - `name`: `LOWER("name") LIKE LOWER($n)` bound to `%name%`
/// - both bounds: `"num_employees" BETWEEN $min AND $max`
/// - only `max_employees`: `"num_employees" BETWEEN 0 AND $n`
/// - only `min_employees`: `"num_employees" >= $n`
///
/// Predicates are joined with `", "`, so more than one predicate does not form
/// a valid `WHERE` clause. The bind values are sorted numerically, largest
/// first, with the pattern ahead of the numbers; placeholder numbers follow
/// that layout (the upper bound binds before the lower one).
///
/// Fails with a validation error when `min_employees > max_employees`.
pub fn sql_for_company_filter(filter: CompanyFilter) -> JoblyResult<SqlFragment> {
    let CompanyFilter {
        name,
        min_employees,
        max_employees,
    } = filter;

    if let (Some(min), Some(max)) = (min_employees, max_employees) {
        if min > max {
            return Err(JoblyError::validation(format!(
                "minEmployees ({min}) cannot be greater than maxEmployees ({max})"
            )));
        }
    }

    let pattern = name.as_deref().map(like_pattern);

    let mut values: Vec<Value> = [
        pattern.map(Value::Text),
        min_employees.map(Value::Int),
        max_employees.map(Value::Int),
    ]
    .into_iter()
    .flatten()
    .collect();
    values.sort_by(numeric_desc);

    // Positions in the sorted layout: pattern, upper bound, lower bound.
    let mut next = 0;
    let mut slot = |present: bool| {
        present.then(|| {
            next += 1;
            next
        })
    };
    let name_pos = slot(name.is_some());
    let max_pos = slot(max_employees.is_some());
    let min_pos = slot(min_employees.is_some());

    let mut predicates = Vec::with_capacity(2);
    if let Some(n) = name_pos {
        predicates.push(ilike("name", n));
    }
    match (min_pos, max_pos) {
        (Some(lo), Some(hi)) => predicates.push(format!(
            "\"num_employees\" BETWEEN {} AND {}",
            placeholder(lo),
            placeholder(hi)
        )),
        (None, Some(hi)) => {
            predicates.push(format!("\"num_employees\" BETWEEN 0 AND {}", placeholder(hi)))
        }
        (Some(lo), None) => predicates.push(format!("\"num_employees\" >= {}", placeholder(lo))),
        (None, None) => {}
    }

    let fragment = predicates.join(", ");
    tracing::debug!(
        target: "jobly.sql",
        fragment = %fragment,
        param_count = values.len(),
        "built company filter"
    );

    Ok(SqlFragment::new(fragment, values))
}

/// Build the body of a `WHERE` clause for a job search.
///
/// - `title`: `LOWER("title") LIKE LOWER($n)` bound to `%title%`
/// - `min_salary`: `"salary" >= $n`
/// - `has_equity == Some(true)`: `"equity" > 0`, with no placeholder
///
/// Predicates are joined with `", "`. Values keep field order; the equity flag
/// is never bound.
pub fn sql_for_job_filter(filter: JobFilter) -> SqlFragment {
    let JobFilter {
        title,
        min_salary,
        has_equity,
    } = filter;

    let mut predicates = Vec::with_capacity(3);
    let mut values = Vec::with_capacity(2);

    if let Some(title) = title {
        values.push(Value::Text(like_pattern(&title)));
        predicates.push(ilike("title", values.len()));
    }
    if let Some(min) = min_salary {
        values.push(Value::Int(min));
        predicates.push(format!("\"salary\" >= {}", placeholder(values.len())));
    }
    if has_equity == Some(true) {
        predicates.push("\"equity\" > 0".to_string());
    }

    let fragment = predicates.join(", ");
    tracing::debug!(
        target: "jobly.sql",
        fragment = %fragment,
        param_count = values.len(),
        "built job filter"
    );

    SqlFragment::new(fragment, values)
}
