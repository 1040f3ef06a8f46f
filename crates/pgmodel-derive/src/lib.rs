//! Derive macros for pgmodel
//!
//! Provides `#[derive(FromRow)]` and `#[derive(Model)]` macros.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod from_row;
mod model;

/// Derive `FromRow` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use pgmodel::FromRow;
///
/// #[derive(FromRow)]
/// struct User {
///     id: i64,
///     username: String,
///     #[orm(column = "email_address")]
///     email: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Map field to a different column name
#[proc_macro_derive(FromRow, attributes(orm))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `Model` for a struct.
///
/// # Example
///
/// ```ignore
/// use pgmodel::Model;
///
/// #[derive(FromRow, Model)]
/// #[orm(table = "users")]
/// struct User {
///     #[orm(id)]
///     user_id: i64,
///     username: String,
/// }
///
/// let user = User::find(&client, 1).await?;
/// ```
///
/// # Generated
///
/// - `TABLE`, `PRIMARY_KEY` and `COLUMNS` constants of `pgmodel::Model`
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Specify table name (required, non-empty)
/// - `#[orm(id)]` - Mark field as primary key (defaults to `id`)
/// - `#[orm(column = "name")]` - Map field to different column name
#[proc_macro_derive(Model, attributes(orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
