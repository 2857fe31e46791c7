//! Saving with `strict_reconstruction` enabled. Settings are global, so
//! these tests live in their own binary.

use dataform_core::{Settings, SETTINGS};
use dataform_record::{
    record_form_factory, DataformError, Form, FormData, FormFieldDef, FormFieldType, Record,
    RecordForm, RecordFormMeta, RecordFormType,
};

#[derive(Debug, Clone, PartialEq, Record)]
struct Account {
    username: String,
    age: i32,
}

fn configure_strict() {
    // Every test installs the same settings; only the first call succeeds.
    let _ = SETTINGS.configure(Settings {
        strict_reconstruction: true,
        ..Settings::default()
    });
}

#[tokio::test]
async fn test_extra_declared_field_fails_reconstruction() {
    configure_strict();
    let form_type = RecordFormType::<Account>::declare("SignupForm")
        .meta(RecordFormMeta::new().model::<Account>())
        .field(FormFieldDef::new("password", FormFieldType::char()))
        .define()
        .unwrap();

    let mut form = RecordForm::builder(&form_type)
        .data(FormData::parse("username=ada&age=36&password=secret"))
        .build()
        .unwrap();
    let err = form.is_valid().await.unwrap_err();
    assert!(matches!(err, DataformError::Construction(_)));
    assert!(err
        .to_string()
        .contains("Account() got unexpected keyword argument(s): password"));
}

#[tokio::test]
async fn test_record_fields_only_still_save() {
    configure_strict();
    assert!(SETTINGS.get().strict_reconstruction);

    let form_type = record_form_factory::<Account>(RecordFormMeta::new()).unwrap();
    let mut form = RecordForm::builder(&form_type)
        .data(FormData::parse("username=ada&age=36"))
        .build()
        .unwrap();
    assert!(form.is_valid().await.unwrap());
    assert_eq!(
        form.save().unwrap(),
        Account {
            username: "ada".into(),
            age: 36,
        }
    );
}
