//! `#[orm(...)]` attribute parsing shared by both derives.

use syn::{DeriveInput, Fields, FieldsNamed, Result};

/// Parsed field-level `#[orm(...)]` attribute.
#[derive(Default)]
pub(crate) struct FieldAttr {
    pub is_id: bool,
    pub column: Option<String>,
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            if ident == "id" {
                attr.is_id = true;
            } else if ident == "column" {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                attr.column = Some(value.value());
            } else {
                return Err(syn::Error::new_spanned(
                    &ident,
                    "unknown orm field attribute, expected `id` or `column = \"...\"`",
                ));
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attr)
    }
}

/// Merge every `#[orm(...)]` on a field.
pub(crate) fn field_attr(field: &syn::Field) -> Result<FieldAttr> {
    let mut merged = FieldAttr::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let parsed: FieldAttr = attr.parse_args()?;
        merged.is_id |= parsed.is_id;
        if parsed.column.is_some() {
            merged.column = parsed.column;
        }
    }
    Ok(merged)
}

/// Column name of a field: `#[orm(column = "...")]` or the field name.
pub(crate) fn column_name(field: &syn::Field) -> Result<String> {
    let attr = field_attr(field)?;
    match attr.column {
        Some(column) => Ok(column),
        None => Ok(field_ident(field)?.to_string()),
    }
}

pub(crate) fn field_ident(field: &syn::Field) -> Result<&syn::Ident> {
    field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))
}

/// Extract the table name from struct-level `#[orm(table = "...")]`.
pub(crate) fn table_name(input: &DeriveInput) -> Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        if let Ok(nested) = attr.parse_args::<syn::MetaNameValue>() {
            if nested.path.is_ident("table") {
                if let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(lit),
                    ..
                }) = &nested.value
                {
                    let table = lit.value();
                    if table.trim().is_empty() {
                        return Err(syn::Error::new_spanned(lit, "table name must not be empty"));
                    }
                    return Ok(table);
                }
            }
        }
    }
    Err(syn::Error::new_spanned(
        input,
        "Model requires #[orm(table = \"table_name\")] attribute",
    ))
}

/// Named fields of a struct, or an error naming the derive.
pub(crate) fn named_fields<'a>(input: &'a DeriveInput, derive: &str) -> Result<&'a FieldsNamed> {
    match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(fields),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{derive} can only be derived for structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs"),
        )),
    }
}
