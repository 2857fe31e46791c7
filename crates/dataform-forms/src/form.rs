//! Form trait and `BaseForm` implementation.
//!
//! The [`Form`] trait is the core abstraction for all form types. Validation
//! is async so form-level hooks may perform I/O. [`BaseForm`] is a concrete,
//! general-purpose implementation built from a shared [`FieldSet`]; richer
//! forms wrap it and override the `clean` / `post_clean` hooks.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use dataform_core::{DataformResult, Value};

use crate::data::FormData;
use crate::fields::{FieldSet, FormFieldDef, FormFieldType};
use crate::validation;

/// Validation errors keyed by field name.
pub type ErrorMap = HashMap<String, Vec<String>>;

/// The error key for errors that belong to no single field.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// The core form trait. All form types implement this.
///
/// `is_valid()` runs three stages: field cleaning, the form-level
/// [`clean`](Form::clean) hook, and the [`post_clean`](Form::post_clean)
/// hook. Errors from the first two are collected into [`errors`](Form::errors);
/// an error returned by `post_clean` propagates out of `is_valid()`.
#[async_trait]
pub trait Form: Send + Sync {
    /// Returns the form's field definitions.
    fn fields(&self) -> &FieldSet;

    /// Returns the initial (default) values for fields.
    fn initial(&self) -> &HashMap<String, Value>;

    /// Returns the form prefix (for namespacing multiple forms on one page).
    fn prefix(&self) -> Option<&str>;

    /// Binds raw form data to this form.
    fn bind(&mut self, data: &FormData);

    /// Returns `true` if this form has been bound to data.
    fn is_bound(&self) -> bool;

    /// Validates the form. Returns `Ok(true)` if no errors were recorded.
    ///
    /// An unbound form is never valid.
    async fn is_valid(&mut self) -> DataformResult<bool>;

    /// Returns per-field validation errors.
    fn errors(&self) -> &ErrorMap;

    /// Returns the cleaned (validated and coerced) data.
    fn cleaned_data(&self) -> &HashMap<String, Value>;

    /// Cross-field validation hook. The default implementation does nothing.
    async fn clean(&self) -> Result<(), ErrorMap> {
        Ok(())
    }

    /// Runs after field and form-level cleaning.
    fn post_clean(&mut self) -> DataformResult<()> {
        Ok(())
    }

    /// Returns `true` if the bound data differs from the initial data.
    fn has_changed(&self) -> bool;
}

/// A general-purpose form implementation.
///
/// # Examples
///
/// ```
/// use dataform_forms::{BaseForm, Form, FormData, FormFieldDef, FormFieldType};
///
/// let mut form = BaseForm::new(vec![FormFieldDef::new("name", FormFieldType::char())]);
/// form.bind(&FormData::parse("name=Ada"));
/// assert!(form.is_bound());
/// ```
#[derive(Debug, Clone)]
pub struct BaseForm {
    fields: Arc<FieldSet>,
    initial_data: HashMap<String, Value>,
    prefix: Option<String>,
    bound: bool,
    raw_data: HashMap<String, Option<String>>,
    errors: ErrorMap,
    cleaned_data: HashMap<String, Value>,
}

impl BaseForm {
    /// Creates a new `BaseForm` with the given field definitions.
    pub fn new(fields: Vec<FormFieldDef>) -> Self {
        let set: FieldSet = fields.into_iter().map(|f| (f.name.clone(), f)).collect();
        Self::from_shared(Arc::new(set))
    }

    /// Creates a `BaseForm` over a field set shared with other forms.
    pub fn from_shared(fields: Arc<FieldSet>) -> Self {
        Self {
            fields,
            initial_data: HashMap::new(),
            prefix: None,
            bound: false,
            raw_data: HashMap::new(),
            errors: ErrorMap::new(),
            cleaned_data: HashMap::new(),
        }
    }

    /// Sets initial (default) values for fields.
    #[must_use]
    pub fn with_initial(mut self, initial: HashMap<String, Value>) -> Self {
        self.initial_data = initial;
        self
    }

    /// Sets the form prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Returns the submitted name of a field, including the prefix.
    pub fn html_name(&self, field_name: &str) -> String {
        match &self.prefix {
            Some(p) => format!("{p}-{field_name}"),
            None => field_name.to_string(),
        }
    }

    /// Returns the raw submitted value for a field.
    pub fn raw_value(&self, field_name: &str) -> Option<&str> {
        self.raw_data.get(field_name).and_then(|v| v.as_deref())
    }

    /// Clears previous results and runs field-level cleaning.
    pub fn clean_fields(&mut self) {
        self.errors.clear();
        self.cleaned_data.clear();
        validation::clean_fields(
            &self.fields,
            &self.initial_data,
            &self.raw_data,
            &mut self.cleaned_data,
            &mut self.errors,
        );
    }

    /// Records an error against `field`, or against the form when `None`.
    ///
    /// A field that receives an error no longer has cleaned data.
    pub fn add_error(&mut self, field: Option<&str>, message: impl Into<String>) {
        let key = field.unwrap_or(NON_FIELD_ERRORS).to_string();
        self.cleaned_data.remove(&key);
        self.errors.entry(key).or_default().push(message.into());
    }

    /// Merges a whole error map into the form's errors.
    pub fn merge_errors(&mut self, errors: ErrorMap) {
        for (key, msgs) in errors {
            self.cleaned_data.remove(&key);
            self.errors.entry(key).or_default().extend(msgs);
        }
    }

    /// Returns the non-field (form-level) errors.
    pub fn non_field_errors(&self) -> &[String] {
        self.errors
            .get(NON_FIELD_ERRORS)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the names of fields whose bound data differs from their
    /// initial value, in field order.
    pub fn changed_data(&self) -> Vec<String> {
        if !self.bound {
            return Vec::new();
        }
        self.fields
            .values()
            .filter(|field| !field.disabled)
            .filter(|field| {
                let initial = self
                    .initial_data
                    .get(&field.name)
                    .or(field.initial.as_ref());
                value_changed(field, initial, self.raw_value(&field.name))
            })
            .map(|field| field.name.clone())
            .collect()
    }
}

fn value_changed(field: &FormFieldDef, initial: Option<&Value>, raw: Option<&str>) -> bool {
    if field.field_type == FormFieldType::Boolean {
        let initial = matches!(initial, Some(Value::Bool(true)));
        let submitted = raw.is_some_and(|r| {
            matches!(r.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
        });
        return initial != submitted;
    }
    let initial = initial.map(ToString::to_string).unwrap_or_default();
    initial != raw.unwrap_or("")
}

#[async_trait]
impl Form for BaseForm {
    fn fields(&self) -> &FieldSet {
        &self.fields
    }

    fn initial(&self) -> &HashMap<String, Value> {
        &self.initial_data
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn bind(&mut self, data: &FormData) {
        self.bound = true;
        self.errors.clear();
        self.cleaned_data.clear();

        let raw: HashMap<String, Option<String>> = self
            .fields
            .keys()
            .map(|name| {
                let value = data.get(&self.html_name(name)).map(String::from);
                (name.clone(), value)
            })
            .collect();
        self.raw_data = raw;
    }

    fn is_bound(&self) -> bool {
        self.bound
    }

    async fn is_valid(&mut self) -> DataformResult<bool> {
        if !self.bound {
            return Ok(false);
        }

        self.clean_fields();

        if let Err(form_errors) = self.clean().await {
            self.merge_errors(form_errors);
        }

        self.post_clean()?;

        tracing::debug!(error_count = self.errors.len(), "form validated");
        Ok(self.errors.is_empty())
    }

    fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        &self.cleaned_data
    }

    fn has_changed(&self) -> bool {
        !self.changed_data().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_form() -> BaseForm {
        BaseForm::new(vec![
            FormFieldDef::new(
                "username",
                FormFieldType::Char {
                    min_length: Some(3),
                    max_length: Some(20),
                    strip: true,
                },
            ),
            FormFieldDef::new("email", FormFieldType::Email),
            FormFieldDef::new(
                "age",
                FormFieldType::Integer {
                    min_value: Some(0),
                    max_value: Some(150),
                },
            )
            .required(false),
        ])
    }

    #[tokio::test]
    async fn test_form_unbound() {
        let mut form = make_test_form();
        assert!(!form.is_bound());
        assert!(!form.is_valid().await.unwrap());
    }

    #[tokio::test]
    async fn test_form_bind_and_validate() {
        let mut form = make_test_form();
        form.bind(&FormData::parse("username=alice&email=alice@example.com&age=30"));
        assert!(form.is_bound());
        assert!(form.is_valid().await.unwrap());
        assert_eq!(
            form.cleaned_data().get("username"),
            Some(&Value::String("alice".into()))
        );
        assert_eq!(form.cleaned_data().get("age"), Some(&Value::Int(30)));
    }

    #[tokio::test]
    async fn test_form_validation_errors() {
        let mut form = make_test_form();
        form.bind(&FormData::parse("username=al&email=bad"));
        assert!(!form.is_valid().await.unwrap());
        assert!(form.errors().contains_key("username"));
        assert!(form.errors().contains_key("email"));
        assert!(!form.errors().contains_key("age"));
    }

    #[tokio::test]
    async fn test_form_with_prefix() {
        let mut form = make_test_form().with_prefix("signup");
        form.bind(&FormData::parse(
            "signup-username=alice&signup-email=a@example.com&username=ignored",
        ));
        assert!(form.is_valid().await.unwrap());
        assert_eq!(form.html_name("email"), "signup-email");
        assert_eq!(
            form.cleaned_data().get("username"),
            Some(&Value::String("alice".into()))
        );
    }

    #[tokio::test]
    async fn test_rebind_clears_errors() {
        let mut form = make_test_form();
        form.bind(&FormData::new());
        assert!(!form.is_valid().await.unwrap());
        assert!(!form.errors().is_empty());
        form.bind(&FormData::parse("username=alice&email=a@example.com"));
        assert!(form.errors().is_empty());
        assert!(form.is_valid().await.unwrap());
    }

    #[test]
    fn test_add_error_and_non_field_errors() {
        let mut form = make_test_form();
        form.add_error(None, "Passwords do not match.");
        form.add_error(Some("email"), "Taken.");
        assert_eq!(form.non_field_errors(), ["Passwords do not match."]);
        assert_eq!(form.errors()["email"], vec!["Taken."]);
    }

    #[test]
    fn test_merge_errors_drops_cleaned_value() {
        let mut form = make_test_form();
        form.cleaned_data
            .insert("email".to_string(), Value::String("a@example.com".into()));
        let mut extra = ErrorMap::new();
        extra.insert("email".to_string(), vec!["Taken.".to_string()]);
        form.merge_errors(extra);
        assert!(!form.cleaned_data().contains_key("email"));
    }

    #[test]
    fn test_changed_data() {
        let mut initial = HashMap::new();
        initial.insert("username".to_string(), Value::String("alice".into()));
        initial.insert("age".to_string(), Value::Int(30));
        let mut form = make_test_form().with_initial(initial);
        assert!(!form.has_changed());

        form.bind(&FormData::parse("username=alice&email=new@example.com&age=30"));
        assert_eq!(form.changed_data(), vec!["email".to_string()]);
        assert!(form.has_changed());
    }

    #[test]
    fn test_changed_data_boolean_and_disabled() {
        let mut form = BaseForm::new(vec![
            FormFieldDef::new("active", FormFieldType::Boolean)
                .required(false)
                .initial(Value::Bool(false)),
            FormFieldDef::new("code", FormFieldType::char()).disabled(true),
        ]);
        form.bind(&FormData::parse("code=changed"));
        assert!(form.changed_data().is_empty());

        form.bind(&FormData::parse("active=on"));
        assert_eq!(form.changed_data(), vec!["active".to_string()]);
    }

    #[test]
    fn test_shared_field_set() {
        let set = Arc::new(make_test_form().fields().clone());
        let a = BaseForm::from_shared(Arc::clone(&set));
        let b = BaseForm::from_shared(Arc::clone(&set));
        assert_eq!(a.fields().len(), 3);
        assert!(Arc::ptr_eq(&a.fields, &b.fields));
    }
}
