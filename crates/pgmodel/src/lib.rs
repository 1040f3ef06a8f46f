//! # pgmodel
//!
//! A small Postgres query builder with active-record style reads.
//!
//! ## Features
//!
//! - **Fluent SELECT builder**: `select`, `from`, `join`, `where_`, `group_by`,
//!   `having`, `order_by`, `offset`, `take`
//! - **Bound parameters only**: callers write `?`, values are bound as `$n`
//! - **Typed parameters**: every value carries a [`ParamKind`]
//! - **Connection injection**: anything implementing [`GenericClient`]
//!   (a client or a transaction) runs the statement
//! - **Statement logging**: one `tracing` event per executed statement
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use pgmodel::prelude::*;
//!
//! #[derive(Debug, FromRow, Model)]
//! #[orm(table = "users")]
//! struct User {
//!     #[orm(id)]
//!     id: i64,
//!     name: String,
//!     age: i32,
//! }
//!
//! let sql = User::query()?
//!     .select(&["id", "name"])
//!     .where_bind("age > ?", 18)
//!     .order_by("name")
//!     .to_sql()?;
//! assert_eq!(sql, "select id,name from users where age > $1 order by name");
//!
//! let everyone = User::all(&client).await?;
//! let one = User::find(&client, 5).await?;
//! ```

pub mod client;
pub mod error;
pub mod model;
pub mod prelude;
pub mod qb;
pub mod row;
pub mod trace;
pub mod value;

pub use client::GenericClient;
pub use error::{ModelError, ModelResult};
pub use model::{Model, TableDef};
pub use qb::{BoundParam, JoinKind, QueryBuilder};
pub use row::{FromRow, Record, RowExt};
pub use trace::StatementContext;
pub use value::{ParamKind, Value};

#[cfg(feature = "tracing")]
pub use trace::SqlTracer;

// Re-exported for derive-generated code
pub use tokio_postgres;

#[cfg(feature = "derive")]
pub use pgmodel_derive::{FromRow, Model};
