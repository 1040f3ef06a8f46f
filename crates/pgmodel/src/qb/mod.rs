//! SELECT query builder.
//!
//! Clauses are stored as structured fragments. Callers write `?` for each
//! bound value; the builder renumbers them as `$1, $2, ...` when the
//! statement is rendered, in textual order (JOIN, WHERE, HAVING).
//!
//! # Usage
//!
//! ```ignore
//! use pgmodel::qb::QueryBuilder;
//!
//! let rows = QueryBuilder::for_table("users", ["id", "name"])?
//!     .select(&["id", "name"])
//!     .where_bind("age > ?", 18)
//!     .order_by("name")
//!     .take(20)
//!     .exec(&client)
//!     .await?;
//! ```

mod fragment;
mod param;
mod select;

pub use fragment::{Connective, Fragment};
pub use param::{BoundParam, ParamList};
pub use select::{JoinKind, QueryBuilder};
