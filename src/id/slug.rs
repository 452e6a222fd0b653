//! Slug derivation for natural-key identifiers.

use crate::error::{KglinkError, Result};

/// Derive a URL-safe slug from a natural-key string.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single hyphen, and trims leading/trailing hyphens. Fails with
/// `EmptyInput` when nothing survives (e.g. the input was pure
/// punctuation). Two distinct keys may collide to the same slug; that is
/// accepted behavior the caller must account for, not an error.
pub fn generate_slug(text: &str) -> Result<String> {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        return Err(KglinkError::EmptyInput(text.to_string()));
    }

    Ok(slug)
}
