//! # dataform-record
//!
//! Forms derived from immutable record types. A record is a plain struct
//! with `#[derive(Record)]`; a form type built from it gets one form field per
//! record field, and a valid submission is turned back into a new record.
//!
//! ## Modules
//!
//! - [`record`] - The [`Record`] trait and record descriptions
//! - [`options`] - Declared and normalized form options
//! - [`fields_for`] - Deriving form fields from a record type
//! - [`form_type`] - Defining form types
//! - [`instance`] - Converting between records and form values
//! - [`form`] - Record-backed form instances

pub mod fields_for;
pub mod form;
pub mod form_type;
pub mod instance;
pub mod options;
pub mod record;

pub use fields_for::{fields_for_record, DerivedFields, FieldOverrides, FormFieldCallback};
pub use form::{RecordForm, RecordFormBuilder};
pub use form_type::{record_form_factory, CleanHook, RecordFormType, RecordFormTypeBuilder};
pub use instance::{from_cleaned, record_to_map};
pub use options::{FieldSelection, RecordFormMeta, RecordFormOptions, ALL_FIELDS};
pub use record::{Record, RecordField, RecordFieldType, RecordMeta};

pub use dataform_core::{DataformError, DataformResult, Value};
pub use dataform_forms::{
    ErrorMap, FieldSet, Form, FormData, FormFieldDef, FormFieldType, WidgetType,
};
pub use dataform_macros::Record;
