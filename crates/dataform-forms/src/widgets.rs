//! Widget kinds for form fields.
//!
//! A [`WidgetType`] names the input element a field should be presented
//! with. Rendering belongs to whatever sits on top of the form layer; here a
//! widget is only a tag that can be overridden per field and declared in
//! configuration files by its snake_case name (`"textarea"`, `"email_input"`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Enumerates all built-in widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetType {
    /// `<input type="text">`.
    TextInput,
    /// `<input type="number">`.
    NumberInput,
    /// `<input type="email">`.
    EmailInput,
    /// `<input type="url">`.
    UrlInput,
    /// `<input type="password">`.
    PasswordInput,
    /// `<input type="hidden">`.
    HiddenInput,
    /// `<textarea>`.
    Textarea,
    /// `<input type="checkbox">`.
    CheckboxInput,
    /// `<select>`.
    Select,
    /// A set of `<input type="radio">` elements.
    RadioSelect,
    /// `<input type="date">`.
    DateInput,
    /// `<input type="datetime-local">`.
    DateTimeInput,
    /// `<input type="time">`.
    TimeInput,
}

impl WidgetType {
    /// Returns the HTML `type` attribute for `<input>` based widgets, or
    /// `None` for widgets backed by other elements.
    pub const fn input_type(self) -> Option<&'static str> {
        match self {
            Self::TextInput => Some("text"),
            Self::NumberInput => Some("number"),
            Self::EmailInput => Some("email"),
            Self::UrlInput => Some("url"),
            Self::PasswordInput => Some("password"),
            Self::HiddenInput => Some("hidden"),
            Self::CheckboxInput => Some("checkbox"),
            Self::RadioSelect => Some("radio"),
            Self::DateInput => Some("date"),
            Self::DateTimeInput => Some("datetime-local"),
            Self::TimeInput => Some("time"),
            Self::Textarea | Self::Select => None,
        }
    }

    /// Returns `true` if the widget is not shown to the user.
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::HiddenInput)
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "TextInput",
            Self::NumberInput => "NumberInput",
            Self::EmailInput => "EmailInput",
            Self::UrlInput => "UrlInput",
            Self::PasswordInput => "PasswordInput",
            Self::HiddenInput => "HiddenInput",
            Self::Textarea => "Textarea",
            Self::CheckboxInput => "CheckboxInput",
            Self::Select => "Select",
            Self::RadioSelect => "RadioSelect",
            Self::DateInput => "DateInput",
            Self::DateTimeInput => "DateTimeInput",
            Self::TimeInput => "TimeInput",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_types() {
        assert_eq!(WidgetType::TextInput.input_type(), Some("text"));
        assert_eq!(WidgetType::DateTimeInput.input_type(), Some("datetime-local"));
        assert_eq!(WidgetType::Textarea.input_type(), None);
        assert_eq!(WidgetType::Select.input_type(), None);
    }

    #[test]
    fn test_hidden() {
        assert!(WidgetType::HiddenInput.is_hidden());
        assert!(!WidgetType::TextInput.is_hidden());
    }

    #[test]
    fn test_display() {
        assert_eq!(WidgetType::CheckboxInput.to_string(), "CheckboxInput");
    }

    #[test]
    fn test_serde_names() {
        let w: WidgetType = serde_json::from_str(r#""textarea""#).unwrap();
        assert_eq!(w, WidgetType::Textarea);
        let w: WidgetType = serde_json::from_str(r#""email_input""#).unwrap();
        assert_eq!(w, WidgetType::EmailInput);
        assert_eq!(
            serde_json::to_string(&WidgetType::DateTimeInput).unwrap(),
            r#""date_time_input""#
        );
    }
}
