//! Table descriptors and the active-record style [`Model`] trait.

use crate::client::GenericClient;
use crate::error::{ModelError, ModelResult};
use crate::qb::QueryBuilder;
use crate::row::FromRow;
use crate::value::Value;

/// Schema descriptor for one table: name, primary key, and output columns.
///
/// Construction fails with [`ModelError::Configuration`] when the table name
/// or the column list is empty, so a builder can never be created without them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    table: String,
    primary_key: String,
    columns: Vec<String>,
}

impl TableDef {
    /// Describe `table` with the given output columns. The primary key defaults to `id`.
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = table.into();
        if table.trim().is_empty() {
            return Err(ModelError::configuration("the table name must be assigned"));
        }
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(ModelError::configuration(format!(
                "the column list of `{table}` must be assigned"
            )));
        }
        Ok(Self {
            table,
            primary_key: "id".to_string(),
            columns,
        })
    }

    /// Override the primary-key column.
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_key_column(&self) -> &str {
        &self.primary_key
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Comma-separated column list, e.g. `id,email`.
    pub fn select_list(&self) -> String {
        self.columns.join(",")
    }
}

/// A table-backed type with active-record style reads.
///
/// Usually derived:
///
/// ```ignore
/// #[derive(FromRow, Model)]
/// #[orm(table = "users")]
/// struct User {
///     #[orm(id)]
///     id: i64,
///     email: String,
/// }
///
/// let user = User::find(&client, 5).await?;
/// let adults = User::query()?
///     .where_bind("age >= ?", 18)
///     .order_by("email")
///     .exec_as::<User>(&client)
///     .await?;
/// ```
pub trait Model: Sized {
    /// Table name.
    const TABLE: &'static str;
    /// Primary-key column.
    const PRIMARY_KEY: &'static str = "id";
    /// Output columns, in select order.
    const COLUMNS: &'static [&'static str];

    /// The validated table descriptor for this model.
    fn table_def() -> ModelResult<TableDef> {
        Ok(TableDef::new(Self::TABLE, Self::COLUMNS.iter().copied())?.primary_key(Self::PRIMARY_KEY))
    }

    /// Start a fresh query on this model's table.
    fn query() -> ModelResult<QueryBuilder> {
        Ok(QueryBuilder::new(Self::table_def()?))
    }

    /// Every row of the table.
    fn all(
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = ModelResult<Vec<Self>>> + Send
    where
        Self: FromRow + Send,
    {
        let qb = Self::query();
        async move { qb?.all_as::<Self>(conn).await }
    }

    /// The row whose primary key equals `id`, if any.
    fn find(
        conn: &impl GenericClient,
        id: impl Into<Value>,
    ) -> impl std::future::Future<Output = ModelResult<Option<Self>>> + Send
    where
        Self: FromRow + Send,
    {
        let qb = Self::query();
        let id = id.into();
        async move { qb?.find_as::<Self>(conn, id).await }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct User;

    impl Model for User {
        const TABLE: &'static str = "users";
        const COLUMNS: &'static [&'static str] = &["id", "email"];
    }

    struct Unconfigured;

    impl Model for Unconfigured {
        const TABLE: &'static str = "";
        const COLUMNS: &'static [&'static str] = &["id"];
    }

    #[test]
    fn table_def_requires_table_and_columns() {
        let err = TableDef::new("", ["id"]).unwrap_err();
        assert!(err.is_configuration());

        let err = TableDef::new("users", Vec::<String>::new()).unwrap_err();
        assert!(err.is_configuration());

        let def = TableDef::new("users", ["id", "email"]).unwrap();
        assert_eq!(def.table(), "users");
        assert_eq!(def.primary_key_column(), "id");
        assert_eq!(def.select_list(), "id,email");
    }

    #[test]
    fn primary_key_override() {
        let def = TableDef::new("accounts", ["account_id"])
            .unwrap()
            .primary_key("account_id");
        assert_eq!(def.primary_key_column(), "account_id");
    }

    #[test]
    fn model_consts_feed_table_def() {
        let def = User::table_def().unwrap();
        assert_eq!(def.table(), "users");
        assert_eq!(def.primary_key_column(), "id");
        assert_eq!(def.columns(), &["id".to_string(), "email".to_string()]);
        assert_eq!(User::query().unwrap().to_sql().unwrap(), "select * from users");
    }

    #[test]
    fn unconfigured_model_fails_at_construction() {
        assert!(Unconfigured::query().unwrap_err().is_configuration());
    }
}
