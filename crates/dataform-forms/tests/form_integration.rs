//! Integration tests for the form layer: binding, cleaning, form-level hooks
//! and post-clean propagation.

use std::collections::HashMap;

use async_trait::async_trait;

use dataform_core::{DataformError, DataformResult, Value};
use dataform_forms::validation::full_clean;
use dataform_forms::{
    BaseForm, ErrorMap, FieldSet, Form, FormData, FormFieldDef, FormFieldType, NON_FIELD_ERRORS,
};

// ============================================================================
// Shared helpers
// ============================================================================

fn make_contact_form() -> BaseForm {
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

/// A sign-up form whose two password fields must match.
struct SignupForm {
    base: BaseForm,
    fail_post_clean: bool,
}

impl SignupForm {
    fn new() -> Self {
        Self {
            base: BaseForm::new(vec![
                FormFieldDef::new("password", FormFieldType::char()),
                FormFieldDef::new("confirm", FormFieldType::char()),
            ]),
            fail_post_clean: false,
        }
    }
}

#[async_trait]
impl Form for SignupForm {
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
        self.base.bind(data);
    }

    fn is_bound(&self) -> bool {
        self.base.is_bound()
    }

    async fn is_valid(&mut self) -> DataformResult<bool> {
        if !self.is_bound() {
            return Ok(false);
        }
        self.base.clean_fields();
        if let Err(errors) = self.clean().await {
            self.base.merge_errors(errors);
        }
        self.post_clean()?;
        Ok(self.errors().is_empty())
    }

    fn errors(&self) -> &ErrorMap {
        self.base.errors()
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        self.base.cleaned_data()
    }

    async fn clean(&self) -> Result<(), ErrorMap> {
        let cleaned = self.cleaned_data();
        if cleaned.get("password") != cleaned.get("confirm") {
            let mut errors = ErrorMap::new();
            errors.insert(
                NON_FIELD_ERRORS.to_string(),
                vec!["Passwords do not match.".to_string()],
            );
            return Err(errors);
        }
        Ok(())
    }

    fn post_clean(&mut self) -> DataformResult<()> {
        if self.fail_post_clean {
            return Err(DataformError::Construction("cannot build".to_string()));
        }
        Ok(())
    }

    fn has_changed(&self) -> bool {
        self.base.has_changed()
    }
}

// ============================================================================
// BaseForm
// ============================================================================

#[tokio::test]
async fn test_contact_form_valid_submission() {
    let mut form = make_contact_form();
    form.bind(&FormData::parse(
        "username=+alice+&email=alice%40example.com&age=",
    ));
    assert!(form.is_valid().await.unwrap());
    let cleaned = form.cleaned_data();
    assert_eq!(cleaned["username"], Value::String("alice".into()));
    assert_eq!(cleaned["email"], Value::String("alice@example.com".into()));
    assert_eq!(cleaned["age"], Value::Null);
}

#[tokio::test]
async fn test_contact_form_reports_every_error() {
    let mut form = make_contact_form();
    form.bind(&FormData::parse("username=al&age=200"));
    let errors = full_clean(&mut form).await.unwrap();
    let names: Vec<&str> = errors.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, ["age", "email", "username"]);
}

#[tokio::test]
async fn test_field_order_is_declaration_order() {
    let form = make_contact_form();
    let names: Vec<&String> = form.fields().keys().collect();
    assert_eq!(names, ["username", "email", "age"]);
}

#[tokio::test]
async fn test_last_submitted_value_wins() {
    let mut form = make_contact_form();
    form.bind(&FormData::parse(
        "username=first&username=second&email=a@example.com",
    ));
    assert!(form.is_valid().await.unwrap());
    assert_eq!(
        form.cleaned_data()["username"],
        Value::String("second".into())
    );
}

// ============================================================================
// Custom forms with hooks
// ============================================================================

#[tokio::test]
async fn test_form_level_clean_adds_non_field_error() {
    let mut form = SignupForm::new();
    form.bind(&FormData::parse("password=abc&confirm=xyz"));
    assert!(!form.is_valid().await.unwrap());
    assert_eq!(form.base.non_field_errors(), ["Passwords do not match."]);
}

#[tokio::test]
async fn test_form_level_clean_passes() {
    let mut form = SignupForm::new();
    form.bind(&FormData::parse("password=abc&confirm=abc"));
    assert!(form.is_valid().await.unwrap());
}

#[tokio::test]
async fn test_post_clean_error_propagates() {
    let mut form = SignupForm::new();
    form.fail_post_clean = true;
    form.bind(&FormData::parse("password=abc&confirm=abc"));
    let err = form.is_valid().await.unwrap_err();
    assert!(matches!(err, DataformError::Construction(_)));
}

#[tokio::test]
async fn test_form_as_trait_object() {
    let mut forms: Vec<Box<dyn Form>> = vec![Box::new(make_contact_form()), Box::new(SignupForm::new())];
    for form in &mut forms {
        form.bind(&FormData::new());
        assert!(!form.is_valid().await.unwrap());
        assert!(!form.errors().is_empty());
    }
}
