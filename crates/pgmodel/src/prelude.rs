//! Convenient imports for typical `pgmodel` usage.
//!
//! ```ignore
//! use pgmodel::prelude::*;
//! ```

pub use crate::{
    FromRow, GenericClient, Model, ModelError, ModelResult, QueryBuilder, Record, RowExt,
    TableDef, Value,
};

#[cfg(feature = "tracing")]
pub use crate::SqlTracer;
