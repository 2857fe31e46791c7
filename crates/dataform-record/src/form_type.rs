//! Defining record form types.
//!
//! A form type is declared once with [`RecordFormType::declare`], given its
//! options and locally declared fields, and then [`define`]d. Definition
//! validates the options, derives fields from the record type, merges in
//! the declared fields and caches the result. A defined type is cheap to
//! clone and is shared by every form instance built from it.
//!
//! [`define`]: RecordFormTypeBuilder::define

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use dataform_core::logging::form_span;
use dataform_core::{DataformError, DataformResult, Value};
use dataform_forms::{ErrorMap, FieldSet, FormFieldDef};

use crate::fields_for::fields_for_record;
use crate::options::{RecordFormMeta, RecordFormOptions};
use crate::record::Record;

/// A form-level validation hook run after field cleaning.
pub type CleanHook = Arc<dyn Fn(&HashMap<String, Value>) -> Result<(), ErrorMap> + Send + Sync>;

struct FormTypeInner {
    name: String,
    options: RecordFormOptions,
    base_fields: Arc<FieldSet>,
    declared_fields: FieldSet,
    clean: Option<CleanHook>,
}

/// A defined record form type.
pub struct RecordFormType<R: Record> {
    inner: Arc<FormTypeInner>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Clone for RecordFormType<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _record: PhantomData,
        }
    }
}

impl<R: Record> fmt::Debug for RecordFormType<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFormType")
            .field("name", &self.inner.name)
            .field("options", &self.inner.options)
            .field("fields", &self.inner.base_fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<R: Record> RecordFormType<R> {
    /// Starts declaring a form type called `name`.
    pub fn declare(name: impl Into<String>) -> RecordFormTypeBuilder<R> {
        RecordFormTypeBuilder {
            name: name.into(),
            meta: RecordFormMeta::new(),
            declared: Vec::new(),
            clean: None,
            _record: PhantomData,
        }
    }

    /// The form type's name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The validated options.
    pub fn options(&self) -> &RecordFormOptions {
        &self.inner.options
    }

    /// The complete, ordered field set shared by every instance.
    pub fn base_fields(&self) -> &Arc<FieldSet> {
        &self.inner.base_fields
    }

    /// The fields declared on the form itself.
    pub fn declared_fields(&self) -> &FieldSet {
        &self.inner.declared_fields
    }

    /// The form-level validation hook, if any.
    pub fn clean_hook(&self) -> Option<&CleanHook> {
        self.inner.clean.as_ref()
    }

    /// Returns `true` if a record type is configured.
    pub fn has_model(&self) -> bool {
        self.inner.options.model.is_some()
    }
}

/// Collects the parts of a form type declaration.
pub struct RecordFormTypeBuilder<R: Record> {
    name: String,
    meta: RecordFormMeta,
    declared: Vec<FormFieldDef>,
    clean: Option<CleanHook>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordFormTypeBuilder<R> {
    /// Sets the configuration block.
    #[must_use]
    pub fn meta(mut self, meta: RecordFormMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Declares a field on the form itself. Declared fields are always part
    /// of the form and replace a derived field of the same name.
    #[must_use]
    pub fn field(mut self, field: FormFieldDef) -> Self {
        self.declared.push(field);
        self
    }

    /// Sets the form-level validation hook.
    #[must_use]
    pub fn clean<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HashMap<String, Value>) -> Result<(), ErrorMap> + Send + Sync + 'static,
    {
        self.clean = Some(Arc::new(hook));
        self
    }

    /// Validates the declaration and builds the form type.
    ///
    /// # Errors
    ///
    /// - [`DataformError::InvalidOption`] if `fields` or `exclude` is a bare name.
    /// - [`DataformError::ImproperlyConfigured`] if the configured record type
    ///   is not `R`, or a derived field has an unsupported type.
    /// - [`DataformError::FieldError`] if `fields` names something that is
    ///   neither a usable record field nor a declared field.
    pub fn define(self) -> DataformResult<RecordFormType<R>> {
        let span = form_span(&self.name);
        let _guard = span.enter();

        let options = self.meta.normalize(&self.name)?;
        let declared: FieldSet = self
            .declared
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect();

        let base_fields = match options.model {
            None => declared.clone(),
            Some(model) => {
                let record_meta = R::meta();
                if !std::ptr::eq(model, record_meta) {
                    return Err(DataformError::ImproperlyConfigured(format!(
                        "{} declares model {} but is defined for {}",
                        self.name, model.name, record_meta.name
                    )));
                }

                let derived = fields_for_record(model, &options)?;
                let missing: Vec<&str> = derived
                    .unresolved()
                    .filter(|name| !declared.contains_key(*name))
                    .collect();
                if !missing.is_empty() {
                    return Err(DataformError::FieldError(format!(
                        "Unknown field(s) ({}) specified for {}",
                        missing.join(", "),
                        model.name
                    )));
                }

                let mut fields: FieldSet = derived
                    .fields
                    .into_iter()
                    .filter_map(|(name, field)| {
                        let field = declared.get(&name).cloned().or(field)?;
                        Some((name, field))
                    })
                    .collect();
                for (name, field) in &declared {
                    if !fields.contains_key(name) {
                        fields.insert(name.clone(), field.clone());
                    }
                }
                fields
            }
        };

        tracing::info!(
            form = %self.name,
            fields = base_fields.len(),
            declared = declared.len(),
            "defined form type"
        );

        Ok(RecordFormType {
            inner: Arc::new(FormTypeInner {
                name: self.name,
                options,
                base_fields: Arc::new(base_fields),
                declared_fields: declared,
                clean: self.clean,
            }),
            _record: PhantomData,
        })
    }
}

/// Defines a form type named `<Record>Form` for `R` with no declared fields.
///
/// The configuration block's record type is set to `R`.
///
/// # Examples
///
/// ```
/// use dataform_record::{record_form_factory, Record, RecordFormMeta};
///
/// #[derive(Record)]
/// struct Note {
///     title: String,
///     body: String,
/// }
///
/// let form_type = record_form_factory::<Note>(RecordFormMeta::new().fields(["title"])).unwrap();
/// assert_eq!(form_type.name(), "NoteForm");
/// assert_eq!(form_type.base_fields().len(), 1);
/// ```
pub fn record_form_factory<R: Record>(meta: RecordFormMeta) -> DataformResult<RecordFormType<R>> {
    RecordFormType::<R>::declare(format!("{}Form", R::meta().name))
        .meta(meta.model::<R>())
        .define()
}
