//! Connection-handle trait used by every executing operation.

use crate::error::ModelResult;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A trait that unifies database clients and transactions.
///
/// Builders never reach for a global connection: the handle is passed to
/// `exec`/`all`/`find`, so a plain client and an open transaction are
/// interchangeable. Connecting, pooling and closing are the caller's business.
pub trait GenericClient: Send + Sync {
    /// Prepare `sql`, bind `params` positionally, execute, and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = ModelResult<Vec<Row>>> + Send;

    /// Execute a query and return the first row, if any.
    ///
    /// Semantics:
    /// - 0 rows: returns `Ok(None)`
    /// - 1 row: returns `Ok(Some(row))`
    /// - multiple rows: returns `Ok(Some(first_row))` (does **not** error)
    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = ModelResult<Option<Row>>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            Ok(rows.into_iter().next())
        }
    }
}

impl GenericClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<Vec<Row>> {
        let stmt = tokio_postgres::Client::prepare(self, sql).await?;
        Ok(tokio_postgres::Client::query(self, &stmt, params).await?)
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<Vec<Row>> {
        let stmt = tokio_postgres::Transaction::prepare(self, sql).await?;
        Ok(tokio_postgres::Transaction::query(self, &stmt, params).await?)
    }
}

impl<C: GenericClient> GenericClient for &C {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<Vec<Row>> {
        GenericClient::query(&**self, sql, params).await
    }
}
