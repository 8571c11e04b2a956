//! `tracing` instrumentation for database clients.

use crate::client::GenericClient;
use crate::error::JoblyResult;
use std::time::Instant;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use tracing::Level;

/// Wraps a [`GenericClient`] and emits every statement before it runs.
///
/// Events go to target `jobly.sql`; failures are reported at WARN with the
/// elapsed time.
///
/// ```ignore
/// let client = TracingClient::new(pool.get().await?).max_sql_length(120);
/// let jobs = Job::find_all(&client).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TracingClient<C> {
    client: C,
    level: Level,
    max_sql_length: Option<usize>,
}

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

impl<C: GenericClient> TracingClient<C> {
    /// Wrap `client`, logging at DEBUG and truncating SQL to 200 bytes.
    pub fn new(client: C) -> Self {
        Self {
            client,
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    fn display_sql(&self, sql: &str) -> String {
        let sql = sql.split_whitespace().collect::<Vec<_>>().join(" ");
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(&sql, max)),
            _ => sql,
        }
    }

    fn emit(&self, op: &'static str, sql: &str, param_count: usize) {
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.display_sql(sql);
        emit_at_level!(self.level, target: "jobly.sql", op, param_count, sql = %sql);
    }

    fn report<T>(&self, op: &'static str, started: Instant, result: &JoblyResult<T>) {
        if let Err(err) = result {
            tracing::warn!(
                target: "jobly.sql",
                op,
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %err,
                "statement failed"
            );
        }
    }
}

impl<C: GenericClient> GenericClient for TracingClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<Vec<Row>> {
        self.emit("query", sql, params.len());
        let started = Instant::now();
        let result = self.client.query(sql, params).await;
        self.report("query", started, &result);
        result
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<u64> {
        self.emit("execute", sql, params.len());
        let started = Instant::now();
        let result = self.client.execute(sql, params).await;
        self.report("execute", started, &result);
        result
    }
}
