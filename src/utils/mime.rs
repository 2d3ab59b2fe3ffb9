//! MIME utilities shared across modules

/// Guesses a content type from the extension of an object key.
#[must_use]
pub fn content_type_for_key(key: &str) -> Option<&'static str> {
    mime_guess::from_path(key).first_raw()
}
