//! Record-backed form instances.
//!
//! A [`RecordForm`] is one use of a [`RecordFormType`]: it may start from an
//! existing record, is bound to submitted data, validates it, and
//! reconstructs a record from the cleaned values on [`save`](RecordForm::save).

use std::collections::HashMap;

use async_trait::async_trait;

use dataform_core::{DataformError, DataformResult, Value, SETTINGS};
use dataform_forms::{BaseForm, ErrorMap, FieldSet, Form, FormData};

use crate::form_type::RecordFormType;
use crate::instance::{from_cleaned, record_to_map};
use crate::record::Record;

/// A form built from a record type.
///
/// # Examples
///
/// ```
/// use dataform_record::{record_form_factory, Form, FormData, Record, RecordForm, RecordFormMeta};
///
/// #[derive(Debug, PartialEq, Record)]
/// struct Note {
///     title: String,
///     pages: i64,
/// }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let form_type = record_form_factory::<Note>(RecordFormMeta::new()).unwrap();
/// let mut form = RecordForm::builder(&form_type)
///     .data(FormData::parse("title=Hello&pages=3"))
///     .build()
///     .unwrap();
/// assert!(form.is_valid().await.unwrap());
/// assert_eq!(form.save().unwrap(), Note { title: "Hello".into(), pages: 3 });
/// # });
/// ```
pub struct RecordForm<R: Record> {
    form_type: RecordFormType<R>,
    base: BaseForm,
    instance: Option<R>,
    validated: bool,
}

/// Builder for [`RecordForm`].
pub struct RecordFormBuilder<R: Record> {
    form_type: RecordFormType<R>,
    instance: Option<R>,
    initial: HashMap<String, Value>,
    prefix: Option<String>,
    data: Option<FormData>,
}

impl<R: Record> RecordFormBuilder<R> {
    /// Seeds the form from an existing record. On save, the record is copied
    /// with the cleaned fields replaced.
    #[must_use]
    pub fn instance(mut self, instance: R) -> Self {
        self.instance = Some(instance);
        self
    }

    /// Sets initial values. Each entry overrides the value taken from the
    /// instance for the same field.
    #[must_use]
    pub fn initial(mut self, initial: HashMap<String, Value>) -> Self {
        self.initial = initial;
        self
    }

    /// Sets the form prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Binds submitted data.
    #[must_use]
    pub fn data(mut self, data: FormData) -> Self {
        self.data = Some(data);
        self
    }

    /// Builds the form.
    ///
    /// # Errors
    ///
    /// Returns [`DataformError::ImproperlyConfigured`] if the form type has
    /// no record type.
    pub fn build(self) -> DataformResult<RecordForm<R>> {
        let options = self.form_type.options();
        if options.model.is_none() {
            return Err(DataformError::ImproperlyConfigured(format!(
                "{} has no model specified.",
                self.form_type.name()
            )));
        }

        let mut object_data: HashMap<String, Value> = match &self.instance {
            Some(instance) => record_to_map(
                instance,
                options.fields.as_deref(),
                options.exclude.as_deref(),
            )
            .into_iter()
            .collect(),
            None => HashMap::new(),
        };
        object_data.extend(self.initial);

        let mut base = BaseForm::from_shared(self.form_type.base_fields().clone())
            .with_initial(object_data);
        if let Some(prefix) = self.prefix {
            base = base.with_prefix(prefix);
        }
        if let Some(data) = &self.data {
            base.bind(data);
        }

        Ok(RecordForm {
            form_type: self.form_type,
            base,
            instance: self.instance,
            validated: false,
        })
    }
}

impl<R: Record> RecordForm<R> {
    /// Starts building a form of the given type.
    pub fn builder(form_type: &RecordFormType<R>) -> RecordFormBuilder<R> {
        RecordFormBuilder {
            form_type: form_type.clone(),
            instance: None,
            initial: HashMap::new(),
            prefix: None,
            data: None,
        }
    }

    /// Builds an unbound form with no instance and no initial values.
    pub fn new(form_type: &RecordFormType<R>) -> DataformResult<Self> {
        Self::builder(form_type).build()
    }

    /// The form's type.
    pub fn form_type(&self) -> &RecordFormType<R> {
        &self.form_type
    }

    /// The record the form was seeded from.
    pub fn instance(&self) -> Option<&R> {
        self.instance.as_ref()
    }

    /// Records an error against `field`, or against the form when `None`.
    pub fn add_error(&mut self, field: Option<&str>, message: impl Into<String>) {
        self.base.add_error(field, message);
    }

    /// Returns the non-field (form-level) errors.
    pub fn non_field_errors(&self) -> &[String] {
        self.base.non_field_errors()
    }

    /// Returns the names of fields whose bound data differs from the initial
    /// data.
    pub fn changed_data(&self) -> Vec<String> {
        self.base.changed_data()
    }

    /// Reconstructs a record from the cleaned data.
    ///
    /// # Errors
    ///
    /// Returns [`DataformError::NotValid`] if the form has not been
    /// validated or has errors, and propagates reconstruction errors.
    pub fn save(&self) -> DataformResult<R> {
        if !self.validated || !self.base.errors().is_empty() {
            tracing::warn!(form = self.form_type.name(), "refusing to save invalid form");
            return Err(DataformError::NotValid(format!(
                "The {} could not be created because the data didn't validate.",
                R::meta().name
            )));
        }
        self.build_instance()
    }

    fn build_instance(&self) -> DataformResult<R> {
        let instance = from_cleaned(self.instance.as_ref(), self.reconstruction_values())?;
        tracing::debug!(
            form = self.form_type.name(),
            replaced = self.instance.is_some(),
            "reconstructed record"
        );
        Ok(instance)
    }

    /// Cleaned values handed to the record. Unless strict reconstruction is
    /// configured, names that are not record fields are dropped.
    fn reconstruction_values(&self) -> HashMap<String, Value> {
        let cleaned = self.base.cleaned_data().clone();
        if SETTINGS.get().strict_reconstruction {
            return cleaned;
        }
        let meta = R::meta();
        cleaned
            .into_iter()
            .filter(|(name, _)| {
                let keep = meta.has_field(name);
                if !keep {
                    tracing::debug!(field = %name, "dropping non-record value before reconstruction");
                }
                keep
            })
            .collect()
    }
}

#[async_trait]
impl<R: Record> Form for RecordForm<R> {
    fn fields(&self) -> &FieldSet {
        self.base.fields()
    }

    fn initial(&self) -> &HashMap<String, Value> {
        self.base.initial()
    }

    fn prefix(&self) -> Option<&str> {
        self.base.prefix()
    }

    fn bind(&mut self, data: &FormData) {
        self.validated = false;
        self.base.bind(data);
    }

    fn is_bound(&self) -> bool {
        self.base.is_bound()
    }

    async fn is_valid(&mut self) -> DataformResult<bool> {
        if !self.base.is_bound() {
            return Ok(false);
        }

        self.base.clean_fields();
        if let Err(errors) = self.clean().await {
            self.base.merge_errors(errors);
        }
        self.validated = true;
        self.post_clean()?;

        Ok(self.base.errors().is_empty())
    }

    fn errors(&self) -> &ErrorMap {
        self.base.errors()
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        self.base.cleaned_data()
    }

    async fn clean(&self) -> Result<(), ErrorMap> {
        match self.form_type.clean_hook() {
            Some(hook) => hook(self.base.cleaned_data()),
            None => Ok(()),
        }
    }

    /// Attempts reconstruction so that a record that cannot be built fails
    /// validation. Skipped while field or form errors exist.
    fn post_clean(&mut self) -> DataformResult<()> {
        if !self.base.errors().is_empty() {
            return Ok(());
        }
        self.build_instance().map(|_| ())
    }

    fn has_changed(&self) -> bool {
        self.base.has_changed()
    }
}
