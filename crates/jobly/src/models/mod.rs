//! Data access for companies and jobs.
//!
//! Every function takes `&impl GenericClient` and returns `JoblyResult<T>`.
//! Search and partial-update statements are assembled from the fragment
//! builders in [`crate::sql`].

mod company;
mod job;

pub use company::{COMPANY_ALIASES, Company, CompanyDetail, NewCompany};
pub use job::{JOB_ALIASES, Job, NewJob};

use crate::error::{JoblyError, JoblyResult};
use crate::sql::UpdatePayload;
use crate::value::Value;
use rust_decimal::Decimal;

/// What an updatable field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldRule {
    /// Non-null text.
    Text,
    /// Text or null.
    OptionalText,
    /// A 32-bit integer (integral number or numeric text) or null.
    OptionalInt,
    /// Any number or numeric text, or null.
    OptionalNumeric,
}

impl FieldRule {
    fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (FieldRule::Text, Value::Text(_)) => true,
            (FieldRule::Text, _) => false,
            (_, Value::Null) => true,
            (FieldRule::OptionalText, v) => matches!(v, Value::Text(_)),
            (FieldRule::OptionalInt, Value::Int(i)) => i32::try_from(*i).is_ok(),
            (FieldRule::OptionalInt, Value::Float(f)) => {
                f.fract() == 0.0 && *f >= f64::from(i32::MIN) && *f <= f64::from(i32::MAX)
            }
            (FieldRule::OptionalInt, Value::Text(s)) => s.trim().parse::<i32>().is_ok(),
            (FieldRule::OptionalNumeric, Value::Int(_)) => true,
            (FieldRule::OptionalNumeric, Value::Float(f)) => Decimal::try_from(*f).is_ok(),
            (FieldRule::OptionalNumeric, Value::Text(s)) => s.trim().parse::<Decimal>().is_ok(),
            _ => false,
        }
    }

    fn expected(self) -> &'static str {
        match self {
            FieldRule::Text => "text",
            FieldRule::OptionalText => "text or null",
            FieldRule::OptionalInt => "an integer or null",
            FieldRule::OptionalNumeric => "a number or null",
        }
    }
}

/// Reject payload keys outside `rules` and values their rule does not accept.
pub(crate) fn check_update_fields(
    payload: &UpdatePayload,
    rules: &[(&str, FieldRule)],
) -> JoblyResult<()> {
    for (field, value) in payload.iter() {
        let Some(&(_, rule)) = rules.iter().find(|(name, _)| *name == field) else {
            return Err(JoblyError::validation(format!(
                "field cannot be updated: {field}"
            )));
        };
        if !rule.accepts(value) {
            return Err(JoblyError::validation(format!(
                "{field} must be {}, got {value}",
                rule.expected()
            )));
        }
    }
    Ok(())
}
