//! # dataform
//!
//! Forms generated from plain data records.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. Depend on `dataform` to get everything, or on the individual
//! crates for finer-grained control.
//!
//! Records deriving [`Record`] through this crate name it as their crate
//! path:
//!
//! ```
//! use dataform::{record_form_factory, Record, RecordFormMeta};
//!
//! #[derive(Record)]
//! #[record(crate = "dataform")]
//! struct Ticket {
//!     title: String,
//!     priority: i32,
//! }
//!
//! let form_type = record_form_factory::<Ticket>(RecordFormMeta::new()).unwrap();
//! assert_eq!(form_type.name(), "TicketForm");
//! ```

/// Core types, settings, values, and error types.
pub use dataform_core as core;

/// Procedural macros for record types.
pub use dataform_macros as macros;

/// Form fields, widgets, submitted data, and validation.
pub use dataform_forms as forms;

/// The record contract used by derived implementations.
pub use dataform_record::record;

/// Record-backed forms: field derivation, form types, and saving.
pub use dataform_record as record_forms;

pub use dataform_core::{DataformError, DataformResult, Settings, Value, SETTINGS};
pub use dataform_forms::{
    BaseForm, ErrorMap, FieldSet, Form, FormData, FormFieldDef, FormFieldType, WidgetType,
};
pub use dataform_record::{
    fields_for_record, from_cleaned, record_form_factory, record_to_map, Record, RecordField,
    RecordFieldType, RecordForm, RecordFormMeta, RecordFormType, RecordMeta, ALL_FIELDS,
};

pub use async_trait::async_trait;
pub use chrono;
pub use serde;
pub use tracing;
