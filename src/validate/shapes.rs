//! Shape definitions: per-type required/recommended fields and field
//! constraints for schema.org entity documents.

use regex::Regex;
use serde_json::Value;
use url::Url;

/// Schema.org types the validator ships shapes for.
///
/// Article and BlogPosting validate under the WebPage shape. Types
/// outside this enum are not rejected; the validator reports them as
/// unknown and treats the document as vacuously valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Product,
    Organization,
    Person,
    WebPage,
    Article,
    BlogPosting,
    Offer,
    Brand,
}

impl SchemaType {
    /// Parse a `@type` string. Returns None for types without a shape.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Product" => Some(SchemaType::Product),
            "Organization" => Some(SchemaType::Organization),
            "Person" => Some(SchemaType::Person),
            "WebPage" => Some(SchemaType::WebPage),
            "Article" => Some(SchemaType::Article),
            "BlogPosting" => Some(SchemaType::BlogPosting),
            "Offer" => Some(SchemaType::Offer),
            "Brand" => Some(SchemaType::Brand),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Product => "Product",
            SchemaType::Organization => "Organization",
            SchemaType::Person => "Person",
            SchemaType::WebPage => "WebPage",
            SchemaType::Article => "Article",
            SchemaType::BlogPosting => "BlogPosting",
            SchemaType::Offer => "Offer",
            SchemaType::Brand => "Brand",
        }
    }
}

/// A declarative field constraint.
///
/// Each variant can test a JSON value and describe the rule it enforces;
/// the description is what surfaces in `ConstraintViolation` findings.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// String with at least one character.
    NonEmptyString,
    /// String of exactly this many ASCII digits (e.g. gtin14).
    DigitsExactly(usize),
    /// String of exactly this many characters (e.g. priceCurrency).
    LengthExactly(usize),
    /// String starting with the given prefix.
    StartsWith(&'static str),
    /// String parsing as an absolute URL.
    AbsoluteUrl,
    /// String or number (prices arrive in both forms).
    PriceLike,
    /// String matching the GS1 Digital Link product grammar.
    ProductIri,
    /// Object carrying `@type` equal to the given schema type.
    NestedType(SchemaType),
}

impl Constraint {
    /// Whether a value satisfies this constraint.
    pub fn check(&self, value: &Value) -> bool {
        match self {
            Constraint::NonEmptyString => {
                value.as_str().is_some_and(|s| !s.is_empty())
            }
            Constraint::DigitsExactly(n) => value
                .as_str()
                .is_some_and(|s| s.len() == *n && s.chars().all(|c| c.is_ascii_digit())),
            Constraint::LengthExactly(n) => {
                value.as_str().is_some_and(|s| s.chars().count() == *n)
            }
            Constraint::StartsWith(prefix) => {
                value.as_str().is_some_and(|s| s.starts_with(prefix))
            }
            Constraint::AbsoluteUrl => {
                value.as_str().is_some_and(|s| Url::parse(s).is_ok())
            }
            Constraint::PriceLike => value.is_string() || value.is_number(),
            Constraint::ProductIri => value.as_str().is_some_and(product_iri_matches),
            Constraint::NestedType(expected) => value
                .as_object()
                .and_then(|obj| obj.get("@type"))
                .and_then(Value::as_str)
                .is_some_and(|t| t == expected.as_str()),
        }
    }

    /// Human-readable rule description.
    pub fn describe(&self) -> String {
        match self {
            Constraint::NonEmptyString => "must be a non-empty string".to_string(),
            Constraint::DigitsExactly(n) => format!("must be exactly {} digits", n),
            Constraint::LengthExactly(n) => format!("must be exactly {} characters", n),
            Constraint::StartsWith(prefix) => format!("must start with {:?}", prefix),
            Constraint::AbsoluteUrl => "must be an absolute URL".to_string(),
            Constraint::PriceLike => "must be a string or number".to_string(),
            Constraint::ProductIri => {
                "must match the GS1 Digital Link grammar (/01/{GTIN-14})".to_string()
            }
            Constraint::NestedType(expected) => {
                format!("must be a nested {} document", expected.as_str())
            }
        }
    }
}

// Same grammar the identifier generator emits; kept local so the
// validator depends only on the document model.
fn product_iri_matches(iri: &str) -> bool {
    let pattern = Regex::new(r"^https?://[^/]+\S*/01/\d{14}(/21/[^/\s]+)?(/10/[^/\s]+)?$")
        .expect("Invalid regex pattern");
    pattern.is_match(iri)
}

/// Shape for one schema type: which fields must or should be present,
/// and per-field constraints applied when the field is present.
#[derive(Debug, Clone)]
pub struct Shape {
    pub required: &'static [&'static str],
    pub recommended: &'static [&'static str],
    pub constraints: Vec<(&'static str, Constraint)>,
}

/// The built-in shape table, constructed once at startup and shared
/// read-only for the process lifetime.
#[derive(Debug, Clone)]
pub struct ShapeRegistry {
    product: Shape,
    organization: Shape,
    person: Shape,
    webpage: Shape,
    offer: Shape,
    brand: Shape,
}

impl ShapeRegistry {
    /// Default shapes for common schema.org types.
    pub fn built_in() -> Self {
        Self {
            product: Shape {
                required: &["@id", "@type", "name", "gtin14"],
                recommended: &["description", "brand", "offers", "image"],
                constraints: vec![
                    ("gtin14", Constraint::DigitsExactly(14)),
                    ("name", Constraint::NonEmptyString),
                    ("offers", Constraint::NestedType(SchemaType::Offer)),
                    ("@id", Constraint::ProductIri),
                ],
            },
            organization: Shape {
                required: &["@id", "@type", "name"],
                recommended: &["url", "logo", "description"],
                constraints: vec![
                    ("name", Constraint::NonEmptyString),
                    ("url", Constraint::StartsWith("http")),
                ],
            },
            person: Shape {
                required: &["@id", "@type", "name"],
                recommended: &["jobTitle", "email"],
                constraints: vec![("name", Constraint::NonEmptyString)],
            },
            webpage: Shape {
                required: &["@id", "@type", "url", "name"],
                recommended: &["description", "datePublished"],
                constraints: vec![
                    ("url", Constraint::StartsWith("http")),
                    ("name", Constraint::NonEmptyString),
                ],
            },
            offer: Shape {
                required: &["@type", "price", "priceCurrency"],
                recommended: &["availability", "url"],
                constraints: vec![
                    ("price", Constraint::PriceLike),
                    ("priceCurrency", Constraint::LengthExactly(3)),
                    ("availability", Constraint::AbsoluteUrl),
                ],
            },
            brand: Shape {
                required: &["@id", "@type", "name"],
                recommended: &["logo", "url"],
                constraints: vec![("name", Constraint::NonEmptyString)],
            },
        }
    }

    /// Shape for a schema type. Total over `SchemaType`.
    pub fn shape(&self, schema_type: SchemaType) -> &Shape {
        match schema_type {
            SchemaType::Product => &self.product,
            SchemaType::Organization => &self.organization,
            SchemaType::Person => &self.person,
            SchemaType::WebPage | SchemaType::Article | SchemaType::BlogPosting => &self.webpage,
            SchemaType::Offer => &self.offer,
            SchemaType::Brand => &self.brand,
        }
    }
}
