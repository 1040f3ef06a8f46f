//! Statement logging.
//!
//! With the `tracing` feature enabled, every executing operation emits one
//! debug event on the `pgmodel.sql` target right before the statement is sent.
//! The event message is the SQL itself; the table, tag and parameter kinds
//! travel as fields.

use crate::value::Value;

/// What is known about a statement just before it runs.
#[derive(Debug, Clone, Copy)]
pub struct StatementContext<'a> {
    /// `exec`, `all` or `find`.
    pub operation: &'static str,
    pub table: &'a str,
    pub tag: Option<&'a str>,
    pub sql: &'a str,
    /// Values in bind order.
    pub params: &'a [Value],
}

impl StatementContext<'_> {
    /// The SQL cut to at most `max_bytes`, with `...` appended when cut.
    pub fn display_sql(&self, max_bytes: Option<usize>) -> String {
        match max_bytes {
            Some(max) if self.sql.len() > max => {
                format!("{}...", truncate_sql_bytes(self.sql, max))
            }
            _ => self.sql.to_string(),
        }
    }

    /// Bind kinds as `$1:integer,$2:text`.
    pub fn param_kinds(&self) -> String {
        self.params
            .iter()
            .enumerate()
            .map(|(i, v)| format!("${}:{}", i + 1, v.kind()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Settings for the per-statement debug event.
///
/// Parameter values are never logged, only their kinds.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone)]
pub struct SqlTracer {
    max_sql_bytes: Option<usize>,
    param_kinds: bool,
}

#[cfg(feature = "tracing")]
impl Default for SqlTracer {
    fn default() -> Self {
        Self {
            max_sql_bytes: Some(200),
            param_kinds: true,
        }
    }
}

#[cfg(feature = "tracing")]
impl SqlTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cut logged SQL after `bytes` bytes.
    pub fn truncate_at(mut self, bytes: usize) -> Self {
        self.max_sql_bytes = Some(bytes);
        self
    }

    /// Log SQL in full.
    pub fn full_sql(mut self) -> Self {
        self.max_sql_bytes = None;
        self
    }

    /// Include the `$n:kind` list in each event.
    pub fn param_kinds(mut self, enabled: bool) -> Self {
        self.param_kinds = enabled;
        self
    }

    pub(crate) fn emit(&self, ctx: &StatementContext<'_>) {
        let sql = ctx.display_sql(self.max_sql_bytes);
        let kinds = if self.param_kinds {
            ctx.param_kinds()
        } else {
            String::new()
        };
        tracing::debug!(
            target: "pgmodel.sql",
            operation = ctx.operation,
            table = ctx.table,
            tag = ctx.tag.unwrap_or("-"),
            param_count = ctx.params.len(),
            param_kinds = %kinds,
            "{sql}"
        );
    }
}
