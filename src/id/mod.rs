//! Identifier generation: canonical, dereferenceable IRIs for entities.
//!
//! Products get GS1 Digital Link identifiers keyed by GTIN; everything
//! else gets slug-based identifiers keyed by a recognized entity type and
//! a natural key. Generation fails closed: an IRI outside the two
//! canonical grammars is never constructed, so malformed identifiers are
//! caught here instead of being silently dropped downstream.

mod gtin;
mod slug;

pub use gtin::{extract_gtin_from_url, is_product_url, normalize_gtin, validate_gtin_check_digit};
pub use slug::generate_slug;

use std::collections::BTreeSet;

use regex::Regex;

use crate::config::Config;
use crate::error::{KglinkError, Result};

/// Entity types recognized by default for slug-based identifiers.
///
/// The remote graph service owns the authoritative set; override it via
/// `[identifiers].entity_types` in the config file when it drifts.
pub const DEFAULT_ENTITY_TYPES: &[&str] = &[
    "organization",
    "person",
    "webpage",
    "place",
    "destination",
    "article",
    "brand",
    "event",
    "service",
    "state",
];

/// Generates canonical entity IRIs against one dataset base URI.
///
/// Immutable once constructed; safe to share across threads.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    base_uri: String,
    entity_types: BTreeSet<String>,
}

impl IdGenerator {
    /// Create a generator for a dataset base URI with the default
    /// recognized entity-type set. A trailing slash on the base URI is
    /// trimmed so path concatenation stays canonical.
    pub fn new(base_uri: &str) -> Self {
        Self::with_entity_types(base_uri, DEFAULT_ENTITY_TYPES.iter().map(|s| s.to_string()))
    }

    /// Create a generator with an explicit recognized entity-type set.
    /// Types are matched case-insensitively; the set is stored lowercase.
    pub fn with_entity_types(base_uri: &str, entity_types: impl IntoIterator<Item = String>) -> Self {
        Self {
            base_uri: base_uri.trim_end_matches('/').to_string(),
            entity_types: entity_types.into_iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Build a generator from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_entity_types(
            &config.dataset.base_uri,
            config.identifiers.entity_types.iter().cloned(),
        )
    }

    /// The dataset base URI (no trailing slash).
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Whether an entity type is in the recognized set (case-insensitive).
    pub fn recognizes(&self, entity_type: &str) -> bool {
        self.entity_types.contains(&entity_type.to_lowercase())
    }

    /// Generate a GS1 Digital Link identifier for a product.
    ///
    /// Format: `{base}/01/{GTIN-14}[/21/{serial}][/10/{lot}]`. The GTIN
    /// is normalized (and its check digit validated) first; serial always
    /// precedes lot so output is deterministic regardless of call-site
    /// argument habits. Empty serial/lot strings are treated as absent.
    pub fn product_id(&self, gtin: &str, serial: Option<&str>, lot: Option<&str>) -> Result<String> {
        let gtin14 = normalize_gtin(gtin)?;

        let mut iri = format!("{}/01/{}", self.base_uri, gtin14);

        if let Some(serial) = serial.filter(|s| !s.is_empty()) {
            iri.push_str("/21/");
            iri.push_str(serial);
        }

        if let Some(lot) = lot.filter(|l| !l.is_empty()) {
            iri.push_str("/10/");
            iri.push_str(lot);
        }

        Ok(iri)
    }

    /// Generate a slug-based identifier for a non-product entity.
    ///
    /// Format: `{base}/{entity_type}/{slug}`. Fails with
    /// `UnrecognizedEntityType` when the type is outside the recognized
    /// set: the remote service accepts such IRIs but silently drops the
    /// entities, so they must never leave this function.
    pub fn entity_id(&self, entity_type: &str, natural_key: &str) -> Result<String> {
        let entity_type = entity_type.to_lowercase();
        if !self.entity_types.contains(&entity_type) {
            log::debug!("rejected entity type not in recognized set: {}", entity_type);
            return Err(KglinkError::UnrecognizedEntityType(entity_type));
        }

        let slug = generate_slug(natural_key)?;

        Ok(format!("{}/{}/{}", self.base_uri, entity_type, slug))
    }
}

/// Whether an IRI matches the product (GS1 Digital Link) grammar exactly:
/// `{base}/01/{14 digits}` with optional `/21/{serial}` then `/10/{lot}`
/// segments and nothing else.
pub fn is_valid_product_iri(iri: &str) -> bool {
    let pattern = Regex::new(r"^https?://[^/]+\S*/01/\d{14}(/21/[^/\s]+)?(/10/[^/\s]+)?$")
        .expect("Invalid regex pattern");
    pattern.is_match(iri)
}

/// Whether an IRI matches the slug grammar exactly:
/// `{base}/{entity_type}/{slug}` with a recognized type token and a
/// well-formed slug as the final two segments.
pub fn is_valid_entity_iri(iri: &str, entity_types: &BTreeSet<String>) -> bool {
    let pattern = Regex::new(r"^https?://\S+/([a-z]+)/([a-z0-9]+(?:-[a-z0-9]+)*)$")
        .expect("Invalid regex pattern");
    match pattern.captures(iri) {
        Some(cap) => entity_types.contains(cap.get(1).unwrap().as_str()),
        None => false,
    }
}
