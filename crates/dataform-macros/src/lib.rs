//! # dataform-macros
//!
//! Procedural macros for dataform. `#[derive(Record)]` turns a plain struct
//! with named fields into a record type whose fields can be turned into form
//! fields.
//!
//! This crate is independent of the other dataform crates because proc-macro
//! crates cannot depend on crates that use them. Generated code refers to
//! `dataform_record`, which re-exports the derive.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod record;

/// Derives `dataform_record::Record` for a struct with named fields.
///
/// Struct attributes:
/// - `#[record(name = "...")]` overrides the record name used in messages.
/// - `#[record(crate = "...")]` sets the path generated code uses to reach
///   the record API, e.g. `"dataform"` when only the facade crate is a
///   dependency.
///
/// Field attributes:
/// - `#[record(default)]` marks a field that has a default: it may be absent
///   when the record is constructed (the `Default` value is used) and its
///   derived form field is optional.
///
/// Field types must convert into `dataform_core::Value` and implement
/// `dataform_core::FromValue`.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::derive_record_impl(input).into()
}
