//! Model derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs::{column_name, field_attr, named_fields, table_name};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let table = table_name(&input)?;
    let fields = named_fields(&input, "Model")?;

    let mut columns = Vec::with_capacity(fields.named.len());
    let mut id_column: Option<String> = None;

    for field in &fields.named {
        let column = column_name(field)?;
        if field_attr(field)?.is_id {
            if id_column.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field can be marked #[orm(id)]",
                ));
            }
            id_column = Some(column.clone());
        }
        columns.push(column);
    }

    if columns.is_empty() {
        return Err(syn::Error::new_spanned(
            &input,
            "Model requires at least one column",
        ));
    }

    let primary_key = id_column.unwrap_or_else(|| "id".to_string());

    Ok(quote! {
        impl #impl_generics pgmodel::Model for #name #ty_generics #where_clause {
            const TABLE: &'static str = #table;
            const PRIMARY_KEY: &'static str = #primary_key;
            const COLUMNS: &'static [&'static str] = &[#(#columns),*];
        }
    })
}
