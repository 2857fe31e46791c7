//! `#[derive(Record)]` implementation.
//!
//! Generates an implementation of the `dataform_record::Record` trait: a
//! static `RecordMeta` describing the fields, value extraction, and strict
//! construction from a name-to-value map.

use darling::{FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Type};

/// Struct-level attributes parsed from `#[record(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(record), supports(struct_named))]
pub struct RecordOpts {
    pub ident: syn::Ident,
    pub data: darling::ast::Data<(), RecordFieldOpts>,

    /// Record name used in error messages; defaults to the struct name.
    #[darling(default)]
    pub name: Option<String>,

    /// Path of the crate the generated code refers to; defaults to
    /// `dataform_record`.
    #[darling(default, rename = "crate")]
    pub krate: Option<syn::Path>,
}

/// Per-field attributes parsed from `#[record(...)]`.
#[derive(Debug, FromField)]
#[darling(attributes(record))]
pub struct RecordFieldOpts {
    pub ident: Option<syn::Ident>,
    pub ty: syn::Type,

    /// The field may be omitted at construction time.
    #[darling(default)]
    pub default: bool,
}

/// Generates the `Record` trait implementation for the given derive input.
pub fn derive_record_impl(input: DeriveInput) -> TokenStream {
    let opts = match RecordOpts::from_derive_input(&input) {
        Ok(o) => o,
        Err(e) => return e.write_errors(),
    };

    let struct_name = &opts.ident;
    let krate: syn::Path = opts
        .krate
        .clone()
        .unwrap_or_else(|| syn::parse_quote!(dataform_record));
    let record_name = opts
        .name
        .clone()
        .unwrap_or_else(|| struct_name.to_string());

    let Some(fields) = opts.data.as_ref().take_struct() else {
        return syn::Error::new_spanned(struct_name, "#[derive(Record)] only supports named structs")
            .to_compile_error();
    };
    let fields: Vec<(&syn::Ident, &RecordFieldOpts)> = fields
        .fields
        .into_iter()
        .filter_map(|f| f.ident.as_ref().map(|ident| (ident, f)))
        .collect();

    let field_meta_tokens: Vec<TokenStream> = fields
        .iter()
        .map(|(ident, f)| generate_record_field(&krate, ident, f))
        .collect();

    let field_value_tokens: Vec<TokenStream> = fields
        .iter()
        .map(|(ident, _)| {
            let name_str = ident.to_string();
            quote! {
                (#name_str, #krate::Value::from(self.#ident.clone()))
            }
        })
        .collect();

    let from_values_tokens: Vec<TokenStream> = fields
        .iter()
        .map(|(ident, f)| generate_take_field(&krate, ident, f))
        .collect();

    quote! {
        impl #krate::Record for #struct_name {
            fn meta() -> &'static #krate::RecordMeta {
                use std::sync::LazyLock;
                static META: LazyLock<#krate::RecordMeta> = LazyLock::new(|| {
                    #krate::RecordMeta {
                        name: #record_name,
                        fields: vec![#(#field_meta_tokens),*],
                    }
                });
                &META
            }

            fn field_values(&self) -> Vec<(&'static str, #krate::Value)> {
                vec![
                    #(#field_value_tokens),*
                ]
            }

            fn from_values(
                values: &::std::collections::HashMap<String, #krate::Value>,
            ) -> #krate::DataformResult<Self> {
                let meta = <Self as #krate::Record>::meta();
                #krate::record::reject_unknown(meta, values)?;
                Ok(Self {
                    #(#from_values_tokens),*
                })
            }
        }
    }
}

/// Generates a `RecordField` construction expression for one field.
fn generate_record_field(krate: &syn::Path, ident: &syn::Ident, f: &RecordFieldOpts) -> TokenStream {
    let name_str = ident.to_string();
    let field_type = infer_field_type(krate, &f.ty);

    let mut chain = Vec::new();
    if is_option_type(&f.ty) {
        chain.push(quote! { .nullable() });
    }
    if f.default {
        chain.push(quote! { .with_default() });
    }

    quote! {
        #krate::RecordField::new(#name_str, #field_type)
            #(#chain)*
    }
}

/// Generates the `ident: value` initializer used by `from_values`.
fn generate_take_field(krate: &syn::Path, ident: &syn::Ident, f: &RecordFieldOpts) -> TokenStream {
    let name_str = ident.to_string();
    if is_option_type(&f.ty) {
        quote! { #ident: #krate::record::take_optional_field(meta, values, #name_str)? }
    } else if f.default {
        quote! { #ident: #krate::record::take_default_field(meta, values, #name_str)? }
    } else {
        quote! { #ident: #krate::record::take_field(meta, values, #name_str)? }
    }
}

/// Infers the `RecordFieldType` tag from the Rust type, looking through
/// `Option<T>`.
fn infer_field_type(krate: &syn::Path, ty: &Type) -> TokenStream {
    let ty = peel(ty);
    let inner_type = peel(unwrap_option_type(ty).unwrap_or(ty));
    let type_str = type_to_string(inner_type);

    match type_str.as_str() {
        "String" => quote! { #krate::RecordFieldType::Text },
        "i16" | "i32" | "i64" | "u32" => quote! { #krate::RecordFieldType::Integer },
        "f32" | "f64" => quote! { #krate::RecordFieldType::Float },
        "bool" => quote! { #krate::RecordFieldType::Boolean },
        _ => {
            let last = last_segment_name(inner_type);
            match last.as_deref() {
                Some("NaiveDateTime") => quote! { #krate::RecordFieldType::DateTime },
                Some("NaiveDate") => quote! { #krate::RecordFieldType::Date },
                Some("NaiveTime") => quote! { #krate::RecordFieldType::Time },
                _ => {
                    let display = display_type_name(inner_type);
                    quote! { #krate::RecordFieldType::Other(#display) }
                }
            }
        }
    }
}

/// Strips invisible groups and parentheses. Types passed through a
/// `macro_rules!` `$ty:ty` fragment arrive wrapped in `Type::Group`.
pub(crate) fn peel(ty: &Type) -> &Type {
    match ty {
        Type::Group(group) => peel(&group.elem),
        Type::Paren(paren) => peel(&paren.elem),
        other => other,
    }
}

/// Checks if a type is `Option<T>`.
pub(crate) fn is_option_type(ty: &Type) -> bool {
    unwrap_option_type(ty).is_some()
}

/// If the type is `Option<T>`, returns `Some(&T)`. Otherwise `None`.
pub(crate) fn unwrap_option_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = peel(ty) {
        let segment = type_path.path.segments.last()?;
        if segment.ident == "Option" {
            if let syn::PathArguments::AngleBracketed(ref args) = segment.arguments {
                if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                    return Some(peel(inner));
                }
            }
        }
    }
    None
}

/// Returns the identifier of the last path segment, e.g. `NaiveDate` for
/// `chrono::NaiveDate`.
fn last_segment_name(ty: &Type) -> Option<String> {
    match peel(ty) {
        Type::Path(type_path) => type_path.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    }
}

/// Converts a `syn::Type` to a string for matching.
pub(crate) fn type_to_string(ty: &Type) -> String {
    let ty = peel(ty);
    quote!(#ty).to_string()
}

/// Renders a type the way it is written in source, e.g. `Vec<String>`.
fn display_type_name(ty: &Type) -> String {
    type_to_string(ty).replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_is_option_type() {
        let ty: Type = parse_quote!(Option<String>);
        assert!(is_option_type(&ty));

        let ty: Type = parse_quote!(String);
        assert!(!is_option_type(&ty));
    }

    #[test]
    fn test_unwrap_option_type() {
        let ty: Type = parse_quote!(Option<i64>);
        let inner = unwrap_option_type(&ty).unwrap();
        assert_eq!(type_to_string(inner), "i64");
    }

    #[test]
    fn test_display_type_name() {
        let ty: Type = parse_quote!(Vec<String>);
        assert_eq!(display_type_name(&ty), "Vec<String>");

        let ty: Type = parse_quote!(std::collections::HashMap<String, i64>);
        assert_eq!(display_type_name(&ty), "std::collections::HashMap<String,i64>");
    }

    #[test]
    fn test_last_segment_name() {
        let ty: Type = parse_quote!(chrono::NaiveDateTime);
        assert_eq!(last_segment_name(&ty).as_deref(), Some("NaiveDateTime"));

        let ty: Type = parse_quote!([u8; 4]);
        assert_eq!(last_segment_name(&ty), None);
    }

    #[test]
    fn test_infer_field_type() {
        let cases: Vec<(Type, &str)> = vec![
            (parse_quote!(String), "Text"),
            (parse_quote!(Option<i32>), "Integer"),
            (parse_quote!(f64), "Float"),
            (parse_quote!(bool), "Boolean"),
            (parse_quote!(chrono::NaiveDate), "Date"),
            (parse_quote!(NaiveDateTime), "DateTime"),
            (parse_quote!(Option<chrono::NaiveTime>), "Time"),
            (parse_quote!(Vec<String>), "Other"),
        ];
        for (ty, expected) in cases {
            let tokens = infer_field_type(&syn::parse_quote!(dataform_record), &ty).to_string();
            assert!(
                tokens.contains(expected),
                "{} should map to {expected}, got {tokens}",
                type_to_string(&ty)
            );
        }
    }

    #[test]
    fn test_derive_generates_record_impl() {
        let input: DeriveInput = parse_quote! {
            #[record(name = "Person")]
            struct PersonRecord {
                name: String,
                nickname: Option<String>,
                #[record(default)]
                score: i64,
            }
        };
        let out = derive_record_impl(input).to_string();
        assert!(out.contains("Record for PersonRecord"));
        assert!(out.contains("\"Person\""));
        assert!(out.contains("take_optional_field"));
        assert!(out.contains("take_default_field"));
        assert!(out.contains("with_default"));
        assert!(out.contains("nullable"));
    }

    #[test]
    fn test_crate_path_override() {
        let input: DeriveInput = parse_quote! {
            #[record(crate = "dataform")]
            struct Tag {
                label: String,
            }
        };
        let out = derive_record_impl(input).to_string();
        assert!(out.contains("Record for Tag"));
        assert!(!out.contains("dataform_record"));
    }

    fn grouped(ty: Type) -> Type {
        Type::Group(syn::TypeGroup {
            group_token: syn::token::Group::default(),
            elem: Box::new(ty),
        })
    }

    #[test]
    fn test_grouped_types_are_seen_through() {
        let krate: syn::Path = parse_quote!(dataform_record);

        let time = grouped(parse_quote!(chrono::NaiveTime));
        let tag = infer_field_type(&krate, &time).to_string();
        assert!(tag.contains("Time"));
        assert!(!tag.contains("Other"));

        let optional = grouped(parse_quote!(Option<i64>));
        assert!(is_option_type(&optional));
        assert!(infer_field_type(&krate, &optional).to_string().contains("Integer"));

        let paren: Type = parse_quote!((String));
        assert!(infer_field_type(&krate, &paren).to_string().contains("Text"));
    }

    #[test]
    fn test_derive_of_grouped_option_is_nullable() {
        let mut input: DeriveInput = parse_quote! {
            struct Wrapped {
                value: String,
            }
        };
        if let syn::Data::Struct(data) = &mut input.data {
            if let Some(field) = data.fields.iter_mut().next() {
                field.ty = grouped(parse_quote!(Option<chrono::NaiveDate>));
            }
        }
        let out = derive_record_impl(input).to_string();
        assert!(out.contains("nullable"));
        assert!(out.contains("Date"));
        assert!(out.contains("take_optional_field"));
        assert!(!out.contains("Other"));
    }

    #[test]
    fn test_derive_rejects_tuple_struct() {
        let input: DeriveInput = parse_quote! {
            struct Pair(i64, i64);
        };
        let out = derive_record_impl(input).to_string();
        assert!(out.contains("compile_error"));
    }
}
