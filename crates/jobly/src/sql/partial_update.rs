use super::{SqlFragment, placeholder, push_quoted};
use crate::error::{JoblyError, JoblyResult};
use crate::value::Value;
use serde::Deserialize;

/// Static table from external field names to storage column names.
///
/// Only fields whose names differ need an entry; everything else resolves to
/// itself.
#[derive(Debug, Clone, Copy)]
pub struct AliasMap<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl<'a> AliasMap<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }

    pub const fn empty() -> Self {
        Self { entries: &[] }
    }

    /// Storage column for `key`, or `key` itself when it has no alias.
    pub fn column<'s>(&'s self, key: &'s str) -> &'s str {
        self.entries
            .iter()
            .find(|(external, _)| *external == key)
            .map_or(key, |&(_, column)| column)
    }
}

/// Ordered field → value pairs for a partial update.
///
/// Order is significant: the n-th field becomes placeholder `$n`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Map<String, serde_json::Value>")]
pub struct UpdatePayload {
    fields: Vec<(String, Value)>,
}

impl UpdatePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing (in place) an earlier value for the same key.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Mutable counterpart of [`UpdatePayload::set`].
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for UpdatePayload {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for UpdatePayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = Self::new();
        for (k, v) in iter {
            payload.insert(k, v);
        }
        payload
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for UpdatePayload {
    type Error = JoblyError;

    fn try_from(map: serde_json::Map<String, serde_json::Value>) -> JoblyResult<Self> {
        let mut payload = Self::new();
        for (k, v) in map {
            payload.insert(k, Value::try_from(v)?);
        }
        Ok(payload)
    }
}

impl TryFrom<serde_json::Value> for UpdatePayload {
    type Error = JoblyError;

    fn try_from(v: serde_json::Value) -> JoblyResult<Self> {
        match v {
            serde_json::Value::Object(map) => Self::try_from(map),
            _ => Err(JoblyError::validation("update payload must be a JSON object")),
        }
    }
}

/// Build the body of a `SET` clause for a partial update.
///
/// Each field becomes `"<column>"=$<position>`, columns resolved through
/// `aliases`. Fails with a validation error when `payload` is empty.
///
/// ```ignore
/// let frag = sql_for_partial_update(
///     UpdatePayload::new().set("firstName", "Aliya").set("age", 32),
///     &AliasMap::new(&[("firstName", "first_name")]),
/// )?;
/// assert_eq!(frag.fragment, r#""first_name"=$1, "age"=$2"#);
/// ```
pub fn sql_for_partial_update(
    payload: UpdatePayload,
    aliases: &AliasMap<'_>,
) -> JoblyResult<SqlFragment> {
    if payload.is_empty() {
        return Err(JoblyError::validation("No data"));
    }

    let mut fragment = String::new();
    let mut values = Vec::with_capacity(payload.len());
    for (idx, (key, value)) in payload.into_iter().enumerate() {
        if idx > 0 {
            fragment.push_str(", ");
        }
        push_quoted(&mut fragment, aliases.column(&key));
        fragment.push('=');
        fragment.push_str(&placeholder(idx + 1));
        values.push(value);
    }

    tracing::debug!(
        target: "jobly.sql",
        fragment = %fragment,
        param_count = values.len(),
        "built partial update"
    );

    Ok(SqlFragment::new(fragment, values))
}
