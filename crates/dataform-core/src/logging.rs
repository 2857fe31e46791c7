//! Logging integration for dataform.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-form spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug", "info",
/// "`dataform_record=debug`"). In debug mode a pretty, human-readable format
/// is used; otherwise a structured JSON format is used. If a subscriber is
/// already installed this is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span scoped to one form type.
///
/// # Examples
///
/// ```
/// use dataform_core::logging::form_span;
///
/// let span = form_span("PersonForm");
/// let _guard = span.enter();
/// tracing::debug!("deriving fields");
/// ```
pub fn form_span(form_name: &str) -> tracing::Span {
    tracing::info_span!("form", name = form_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_is_idempotent() {
        let settings = Settings::default();
        setup_logging(&settings);
        setup_logging(&settings);
    }

    #[test]
    fn test_setup_logging_bad_filter_falls_back() {
        let settings = Settings {
            log_level: "[[not a filter".to_string(),
            debug: true,
            ..Settings::default()
        };
        setup_logging(&settings);
    }

    #[test]
    fn test_form_span_enter() {
        let span = form_span("ContactForm");
        let _guard = span.enter();
        tracing::info!("inside form span");
    }
}
