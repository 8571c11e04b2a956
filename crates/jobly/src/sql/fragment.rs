use crate::value::Value;
use tokio_postgres::types::ToSql;

/// A partial SQL clause and the values for its positional placeholders.
///
/// `values[i]` binds to `$<i + 1>` in `fragment`.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct SqlFragment {
    pub fragment: String,
    pub values: Vec<Value>,
}

impl SqlFragment {
    pub fn new(fragment: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            fragment: fragment.into(),
            values,
        }
    }

    /// No predicates or assignments were emitted.
    pub fn is_empty(&self) -> bool {
        self.fragment.is_empty()
    }

    /// Index of the first placeholder free for the surrounding statement.
    ///
    /// An `UPDATE ... SET <fragment> WHERE id = $n` statement uses this for `n`.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }
}
