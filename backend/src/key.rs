//! Storage key generation for uploaded files

use uuid::Uuid;

/// Suffix used when the client-supplied filename has nothing usable left
const FALLBACK_FILE_NAME: &str = "file";

/// Generates a unique storage key of the form `<uuid>-<filename>`
///
/// Uniqueness comes from the random v4 UUID alone, so two uploads with the
/// same filename still land on distinct keys.
#[must_use]
pub fn generate_key(original_file_name: &str) -> String {
    format!("{}-{}", Uuid::new_v4(), sanitize_file_name(original_file_name))
}

/// Reduces a client-supplied filename to a single path segment
///
/// Keeps only what follows the last `/` or `\` and strips ASCII control
/// characters. Everything else is kept verbatim.
#[must_use]
pub fn sanitize_file_name(original_file_name: &str) -> String {
    let last_segment = original_file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = last_segment
        .chars()
        .filter(|c| !c.is_ascii_control())
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => FALLBACK_FILE_NAME.to_string(),
        _ => cleaned,
    }
}
