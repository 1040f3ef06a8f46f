//! FromRow derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs::{column_name, field_ident, named_fields};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = named_fields(&input, "FromRow")?;

    let field_extracts = fields
        .named
        .iter()
        .map(|field| {
            let field_name = field_ident(field)?;
            let column = column_name(field)?;
            Ok(quote! {
                #field_name: row.try_get_column(#column)?
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        impl #impl_generics pgmodel::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &pgmodel::tokio_postgres::Row) -> pgmodel::ModelResult<Self> {
                use pgmodel::RowExt;
                Ok(Self {
                    #(#field_extracts),*
                })
            }
        }
    })
}
