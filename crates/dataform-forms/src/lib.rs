//! # dataform-forms
//!
//! The form layer that record-backed forms plug into: field schemas with
//! type-level cleaning, widget kinds, submitted form data, the [`Form`](form::Form)
//! trait and the general-purpose [`BaseForm`](form::BaseForm).
//!
//! There is no HTML rendering here. Widgets are described, not drawn.

pub mod data;
pub mod fields;
pub mod form;
pub mod validation;
pub mod widgets;

pub use data::FormData;
pub use fields::{FieldSet, FormFieldDef, FormFieldType};
pub use form::{BaseForm, ErrorMap, Form, NON_FIELD_ERRORS};
pub use widgets::WidgetType;
