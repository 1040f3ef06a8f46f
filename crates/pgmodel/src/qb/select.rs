//! The SELECT query builder.

use crate::client::GenericClient;
use crate::error::{ModelError, ModelResult};
use crate::model::TableDef;
use crate::qb::fragment::{Connective, Fragment};
use crate::qb::param::{BoundParam, ParamList};
use crate::row::{FromRow, Record};
use crate::trace::StatementContext;
use crate::value::Value;
use tokio_postgres::Row;

#[cfg(feature = "tracing")]
use crate::trace::SqlTracer;

/// JOIN flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "join",
            JoinKind::Left => "left join",
        }
    }
}

#[derive(Clone, Debug)]
struct JoinClause {
    kind: JoinKind,
    table: String,
    on: Fragment,
}

/// Fluent builder for one parameterized SELECT statement.
///
/// Clause methods consume and return the builder. Argument mistakes (a `?`
/// without a value, a value count that doesn't match) are recorded on the
/// first occurrence and reported by [`to_sql`](Self::to_sql) or before
/// anything is sent by [`exec`](Self::exec).
#[derive(Clone, Debug)]
pub struct QueryBuilder {
    def: TableDef,
    /// SELECT columns (`None` renders `*`)
    select_cols: Option<Vec<String>>,
    /// FROM target (`None` renders the configured table)
    from_expr: Option<String>,
    joins: Vec<JoinClause>,
    wheres: Vec<(Connective, Fragment)>,
    group_by: Option<String>,
    having: Option<Fragment>,
    order_by: Option<String>,
    offset: Option<u64>,
    take: Option<u64>,
    tag: Option<String>,
    build_error: Option<String>,
    #[cfg(feature = "tracing")]
    tracer: SqlTracer,
}

impl QueryBuilder {
    /// Start a builder for the table described by `def`.
    pub fn new(def: TableDef) -> Self {
        Self {
            def,
            select_cols: None,
            from_expr: None,
            joins: Vec::new(),
            wheres: Vec::new(),
            group_by: None,
            having: None,
            order_by: None,
            offset: None,
            take: None,
            tag: None,
            build_error: None,
            #[cfg(feature = "tracing")]
            tracer: SqlTracer::default(),
        }
    }

    /// Shorthand for `QueryBuilder::new(TableDef::new(table, columns)?)`.
    pub fn for_table<I, S>(table: impl Into<String>, columns: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::new(TableDef::new(table, columns)?))
    }

    pub fn table_def(&self) -> &TableDef {
        &self.def
    }

    fn record_error(&mut self, err: ModelError) {
        if self.build_error.is_some() {
            return;
        }
        self.build_error = Some(match err {
            ModelError::Argument(msg) => msg,
            other => other.to_string(),
        });
    }

    // ==================== Clauses ====================

    /// Set SELECT columns. An empty slice selects `*`.
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.select_cols = if columns.is_empty() {
            None
        } else {
            Some(columns.iter().map(|c| c.to_string()).collect())
        };
        self
    }

    /// Set the FROM target. `None` uses the configured table.
    pub fn from(mut self, table: Option<&str>) -> Self {
        self.from_expr = table.map(str::to_string);
        self
    }

    /// Add `join <table> on <on>`.
    pub fn join(self, table: &str, on: &str) -> Self {
        self.push_join(JoinKind::Inner, table, on, Vec::new())
    }

    /// Add `join <table> on <on>` where `on` carries `?` placeholders, one per value.
    pub fn join_with<V: Into<Value>>(
        self,
        table: &str,
        on: &str,
        params: impl IntoIterator<Item = V>,
    ) -> Self {
        let params = params.into_iter().map(Into::into).collect();
        self.push_join(JoinKind::Inner, table, on, params)
    }

    /// Add `left join <table> on <on>`.
    pub fn left_join(self, table: &str, on: &str) -> Self {
        self.push_join(JoinKind::Left, table, on, Vec::new())
    }

    fn push_join(mut self, kind: JoinKind, table: &str, on: &str, params: Vec<Value>) -> Self {
        match Fragment::template(on, params) {
            Ok(on) => self.joins.push(JoinClause {
                kind,
                table: table.to_string(),
                on,
            }),
            Err(e) => self.record_error(e),
        }
        self
    }

    /// Add a WHERE condition without a parameter, joined to earlier ones with `and`.
    pub fn where_(self, expr: &str) -> Self {
        self.push_where(Connective::And, expr, None)
    }

    /// Add a WHERE condition with exactly one `?`, joined with `and`.
    pub fn where_bind(self, expr: &str, param: impl Into<Value>) -> Self {
        self.push_where(Connective::And, expr, Some(param.into()))
    }

    /// Add a WHERE condition without a parameter, joined to earlier ones with `or`.
    pub fn where_or(self, expr: &str) -> Self {
        self.push_where(Connective::Or, expr, None)
    }

    /// Add a WHERE condition with exactly one `?`, joined with `or`.
    pub fn where_or_bind(self, expr: &str, param: impl Into<Value>) -> Self {
        self.push_where(Connective::Or, expr, Some(param.into()))
    }

    fn push_where(mut self, connective: Connective, expr: &str, param: Option<Value>) -> Self {
        match Fragment::single(expr, param) {
            Ok(frag) => self.wheres.push((connective, frag)),
            Err(e) => self.record_error(e),
        }
        self
    }

    /// Set GROUP BY.
    pub fn group_by(mut self, expr: &str) -> Self {
        self.group_by = Some(expr.to_string());
        self
    }

    /// Set HAVING without a parameter.
    pub fn having(self, expr: &str) -> Self {
        self.set_having(expr, None)
    }

    /// Set HAVING with exactly one `?`.
    pub fn having_bind(self, expr: &str, param: impl Into<Value>) -> Self {
        self.set_having(expr, Some(param.into()))
    }

    fn set_having(mut self, expr: &str, param: Option<Value>) -> Self {
        match Fragment::single(expr, param) {
            Ok(frag) => self.having = Some(frag),
            Err(e) => self.record_error(e),
        }
        self
    }

    /// Set ORDER BY.
    pub fn order_by(mut self, expr: &str) -> Self {
        self.order_by = Some(expr.to_string());
        self
    }

    /// Skip the first `n` rows.
    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Return at most `n` rows.
    pub fn take(mut self, n: u64) -> Self {
        self.take = Some(n);
        self
    }

    /// Associate a tag, reported alongside the SQL in logs.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Replace the SQL logger settings for this builder.
    #[cfg(feature = "tracing")]
    pub fn with_tracer(mut self, tracer: SqlTracer) -> Self {
        self.tracer = tracer;
        self
    }

    // ==================== Build helpers ====================

    /// The first argument error recorded while chaining, if any.
    pub fn build_error(&self) -> Option<&str> {
        self.build_error.as_deref()
    }

    /// Validate builder state before rendering or execution.
    pub fn validate(&self) -> ModelResult<()> {
        match &self.build_error {
            Some(err) => Err(ModelError::Argument(err.clone())),
            None => Ok(()),
        }
    }

    fn build_select_sql(&self) -> (String, ParamList) {
        let mut params = ParamList::new();
        let mut sql = String::from("select ");

        match &self.select_cols {
            Some(cols) => sql.push_str(&cols.join(",")),
            None => sql.push('*'),
        }

        sql.push_str(" from ");
        sql.push_str(self.from_expr.as_deref().unwrap_or(self.def.table()));

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join.kind.keyword());
            sql.push(' ');
            sql.push_str(&join.table);
            sql.push_str(" on ");
            join.on.render(&mut sql, &mut params);
        }

        for (i, (connective, frag)) in self.wheres.iter().enumerate() {
            if i == 0 {
                sql.push_str(" where ");
            } else {
                sql.push_str(connective.as_sql());
            }
            frag.render(&mut sql, &mut params);
        }

        if let Some(ref group) = self.group_by {
            sql.push_str(" group by ");
            sql.push_str(group);
        }

        if let Some(ref having) = self.having {
            sql.push_str(" having ");
            having.render(&mut sql, &mut params);
        }

        if let Some(ref order) = self.order_by {
            sql.push_str(" order by ");
            sql.push_str(order);
        }

        if let Some(take) = self.take {
            sql.push_str(&format!(" limit {take}"));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" offset {offset}"));
        }

        (sql, params)
    }

    /// Render the statement and its parameters in bind order.
    pub fn build(&self) -> ModelResult<(String, ParamList)> {
        self.validate()?;
        Ok(self.build_select_sql())
    }

    /// The final statement text with `$n` placeholders.
    pub fn to_sql(&self) -> ModelResult<String> {
        Ok(self.build()?.0)
    }

    /// Bound parameters (name, value, kind) in bind order.
    pub fn params(&self) -> ModelResult<Vec<BoundParam>> {
        Ok(self.build()?.1.bindings())
    }

    /// `select * from <table>`, ignoring any chained clauses.
    pub fn all_sql(&self) -> String {
        format!("select * from {}", self.def.table())
    }

    /// `select <columns> from <table> where <pk> = $1 limit 1`.
    pub fn find_sql(&self) -> String {
        format!(
            "select {} from {} where {} = $1 limit 1",
            self.def.select_list(),
            self.def.table(),
            self.def.primary_key_column()
        )
    }

    // ==================== Execution ====================

    fn trace(&self, operation: &'static str, sql: &str, params: &ParamList) {
        let ctx = StatementContext {
            operation,
            table: self.def.table(),
            tag: self.tag.as_deref(),
            sql,
            params: params.values(),
        };
        #[cfg(feature = "tracing")]
        self.tracer.emit(&ctx);
        #[cfg(not(feature = "tracing"))]
        let _ = ctx;
    }

    async fn query_rows(
        &self,
        conn: &impl GenericClient,
        operation: &'static str,
        sql: &str,
        params: &ParamList,
    ) -> ModelResult<Vec<Row>> {
        self.trace(operation, sql, params);
        let params_ref = params.as_refs();
        conn.query(sql, &params_ref).await
    }

    /// Run the built statement and return every row as a [`Record`].
    pub async fn exec(self, conn: &impl GenericClient) -> ModelResult<Vec<Record>> {
        self.exec_as::<Record>(conn).await
    }

    /// Run the built statement and map every row to `T`.
    pub async fn exec_as<T: FromRow>(self, conn: &impl GenericClient) -> ModelResult<Vec<T>> {
        let (sql, params) = self.build()?;
        let rows = self.query_rows(conn, "exec", &sql, &params).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Every row of the configured table. Chained clauses are ignored.
    pub async fn all(&self, conn: &impl GenericClient) -> ModelResult<Vec<Record>> {
        self.all_as::<Record>(conn).await
    }

    /// Every row of the configured table, mapped to `T`.
    pub async fn all_as<T: FromRow>(&self, conn: &impl GenericClient) -> ModelResult<Vec<T>> {
        let sql = self.all_sql();
        let rows = self.query_rows(conn, "all", &sql, &ParamList::new()).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// The row whose primary key equals `id`, if any.
    pub async fn find(
        &self,
        conn: &impl GenericClient,
        id: impl Into<Value>,
    ) -> ModelResult<Option<Record>> {
        self.find_as::<Record>(conn, id).await
    }

    /// The row whose primary key equals `id`, mapped to `T`.
    pub async fn find_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
        id: impl Into<Value>,
    ) -> ModelResult<Option<T>> {
        let sql = self.find_sql();
        let mut params = ParamList::new();
        params.push(id.into());
        self.trace("find", &sql, &params);
        let params_ref = params.as_refs();
        let row = conn.query_opt(&sql, &params_ref).await?;
        row.as_ref().map(T::from_row).transpose()
    }
}
