//! Shape validation for schema.org entity documents.
//!
//! Documents are validated against per-type shapes (required and
//! recommended fields plus field constraints) before they are handed to
//! the sync layer. Validation is pure: the shape table is built once and
//! only read afterwards, so a single `Validator` can be shared freely.

mod report;
mod shapes;

pub use report::validation_report;
pub use shapes::{Constraint, SchemaType, Shape, ShapeRegistry};

use serde::Serialize;
use serde_json::Value;

/// One validation problem, structured for machine consumption.
/// Human-readable text is produced only at Display/report time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Issue {
    MissingContext,
    InvalidContext { value: String },
    MissingType,
    /// The validator has no shape for this type. A limitation of the
    /// shape table, not a document defect; always a warning.
    UnknownType { schema_type: String },
    MissingRequiredField { field: String },
    MissingRecommendedField { field: String },
    ConstraintViolation { field: String, rule: String },
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Issue::MissingContext => write!(f, "Missing @context"),
            Issue::InvalidContext { value } => write!(f, "Invalid @context: {}", value),
            Issue::MissingType => write!(f, "Missing @type"),
            Issue::UnknownType { schema_type } => {
                write!(f, "No shape defined for type: {}", schema_type)
            }
            Issue::MissingRequiredField { field } => {
                write!(f, "Missing required field: {}", field)
            }
            Issue::MissingRecommendedField { field } => {
                write!(f, "Missing recommended field: {}", field)
            }
            Issue::ConstraintViolation { field, rule } => {
                write!(f, "Constraint failed for field '{}': {}", field, rule)
            }
        }
    }
}

/// An issue located in a document: `path` holds the field names leading
/// to the nested document the issue was found in (empty at the root).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub path: Vec<String>,
    pub issue: Issue,
}

impl Finding {
    fn root(issue: Issue) -> Self {
        Self { path: Vec::new(), issue }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.issue)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.issue)
        }
    }
}

/// Outcome of validating a single document. Warnings never affect
/// validity; `valid` is true exactly when `errors` is empty.
#[derive(Debug, Clone, Serialize)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

/// Per-document entry in a batch report.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    pub index: usize,
    pub id: String,
    pub schema_type: String,
    pub valid: bool,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

/// Aggregate result of `validate_batch`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub documents: Vec<DocumentResult>,
}

/// A document rejected by `validate_before_upload`, with its errors.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedDocument {
    pub document: Value,
    pub errors: Vec<Finding>,
}

/// Validates entity documents against a fixed shape registry.
#[derive(Debug, Clone)]
pub struct Validator {
    shapes: ShapeRegistry,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Validator with the built-in shape table.
    pub fn new() -> Self {
        Self {
            shapes: ShapeRegistry::built_in(),
        }
    }

    /// Validator with an explicit shape registry.
    pub fn with_shapes(shapes: ShapeRegistry) -> Self {
        Self { shapes }
    }

    /// Validate a document against the shape for its `@type`.
    ///
    /// With `strict` set, missing recommended fields become errors
    /// instead of warnings, so the strict error set is always a superset
    /// of the non-strict one. Fields holding objects that carry `@type`
    /// are validated recursively; their findings are prefixed with the
    /// parent field name.
    pub fn validate(&self, document: &Value, strict: bool) -> Validation {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut path = Vec::new();
        self.validate_at(document, strict, true, &mut path, &mut errors, &mut warnings);
        Validation {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    fn validate_at(
        &self,
        document: &Value,
        strict: bool,
        root: bool,
        path: &mut Vec<String>,
        errors: &mut Vec<Finding>,
        warnings: &mut Vec<Finding>,
    ) {
        let at = |issue: Issue, path: &[String]| Finding {
            path: path.to_vec(),
            issue,
        };

        let Some(obj) = document.as_object() else {
            errors.push(at(Issue::MissingType, path));
            return;
        };

        // @context is mandatory at the top level only; nested documents
        // inherit the parent's context.
        if root {
            match obj.get("@context") {
                None => errors.push(Finding::root(Issue::MissingContext)),
                Some(value) => match value.as_str() {
                    Some("https://schema.org") | Some("http://schema.org") => {}
                    _ => errors.push(Finding::root(Issue::InvalidContext {
                        value: value.to_string(),
                    })),
                },
            }
        }

        let Some(type_name) = obj.get("@type").and_then(Value::as_str) else {
            errors.push(at(Issue::MissingType, path));
            return;
        };

        let Some(schema_type) = SchemaType::from_name(type_name) else {
            warnings.push(at(
                Issue::UnknownType {
                    schema_type: type_name.to_string(),
                },
                path,
            ));
            return;
        };

        let shape = self.shapes.shape(schema_type);

        for field in shape.required {
            let missing = match obj.get(*field) {
                None => true,
                Some(value) => is_empty_value(value),
            };
            if missing {
                errors.push(at(
                    Issue::MissingRequiredField {
                        field: field.to_string(),
                    },
                    path,
                ));
            }
        }

        for field in shape.recommended {
            if !obj.contains_key(*field) {
                let issue = Issue::MissingRecommendedField {
                    field: field.to_string(),
                };
                if strict {
                    errors.push(at(issue, path));
                } else {
                    warnings.push(at(issue, path));
                }
            }
        }

        for (field, constraint) in &shape.constraints {
            if let Some(value) = obj.get(*field) {
                if !constraint.check(value) {
                    errors.push(at(
                        Issue::ConstraintViolation {
                            field: field.to_string(),
                            rule: constraint.describe(),
                        },
                        path,
                    ));
                }
            }
        }

        // Recurse into nested typed documents
        for (field, value) in obj {
            if field.starts_with('@') {
                continue;
            }
            if value.as_object().is_some_and(|o| o.contains_key("@type")) {
                path.push(field.clone());
                self.validate_at(value, strict, false, path, errors, warnings);
                path.pop();
            }
        }
    }

    /// Validate documents independently; input order is preserved and no
    /// document's result depends on another's.
    pub fn validate_batch(&self, documents: &[Value], strict: bool) -> BatchReport {
        let mut report = BatchReport {
            total: documents.len(),
            valid: 0,
            invalid: 0,
            documents: Vec::with_capacity(documents.len()),
        };

        for (index, document) in documents.iter().enumerate() {
            let validation = self.validate(document, strict);

            if validation.valid {
                report.valid += 1;
            } else {
                report.invalid += 1;
            }

            report.documents.push(DocumentResult {
                index,
                id: string_field(document, "@id"),
                schema_type: string_field(document, "@type"),
                valid: validation.valid,
                errors: validation.errors,
                warnings: validation.warnings,
            });
        }

        log::debug!(
            "validated {} documents: {} valid, {} invalid",
            report.total,
            report.valid,
            report.invalid
        );

        report
    }

    /// Partition documents into upload-ready and rejected sets.
    ///
    /// A stable, pure partition: order within each set follows input
    /// order, and documents are returned unmodified.
    pub fn validate_before_upload(
        &self,
        documents: Vec<Value>,
        strict: bool,
    ) -> (Vec<Value>, Vec<RejectedDocument>) {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for document in documents {
            let validation = self.validate(&document, strict);
            if validation.valid {
                accepted.push(document);
            } else {
                rejected.push(RejectedDocument {
                    document,
                    errors: validation.errors,
                });
            }
        }

        (accepted, rejected)
    }
}

/// Absent-equivalent values for required-field checks.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

fn string_field(document: &Value, key: &str) -> String {
    document
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_product() -> Value {
        json!({
            "@context": "https://schema.org",
            "@type": "Product",
            "@id": "https://data.example.org/wl1/01/12345678901231",
            "name": "Example Product",
            "gtin14": "12345678901231",
            "description": "A great product",
            "brand": {
                "@type": "Brand",
                "@id": "https://data.example.org/wl1/brand/acme",
                "name": "Acme",
                "logo": "https://example.org/logo.png",
                "url": "https://example.org"
            },
            "image": "https://example.org/p.jpg",
            "offers": {
                "@type": "Offer",
                "price": "29.99",
                "priceCurrency": "USD",
                "availability": "https://schema.org/InStock",
                "url": "https://example.org/buy"
            }
        })
    }

    fn error_strings(v: &Validation) -> Vec<String> {
        v.errors.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_valid_product_passes() {
        let validator = Validator::new();
        let result = validator.validate(&valid_product(), false);
        assert!(result.valid, "errors: {:?}", error_strings(&result));
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let validator = Validator::new();
        let mut doc = valid_product();
        doc.as_object_mut().unwrap().remove("gtin14");
        let result = validator.validate(&doc, false);
        assert!(!result.valid);
        assert!(result.errors.contains(&Finding::root(
            Issue::MissingRequiredField {
                field: "gtin14".to_string()
            }
        )));
    }

    #[test]
    fn test_empty_required_value_is_missing() {
        let validator = Validator::new();
        let mut doc = valid_product();
        doc.as_object_mut().unwrap().insert("name".to_string(), json!(""));
        let result = validator.validate(&doc, false);
        assert!(!result.valid);
        // Reported as missing, and the non-empty-string constraint fires too
        assert!(result
            .errors
            .iter()
            .any(|f| f.issue == Issue::MissingRequiredField { field: "name".to_string() }));
    }

    #[test]
    fn test_missing_context_is_error_at_root() {
        let validator = Validator::new();
        let mut doc = valid_product();
        doc.as_object_mut().unwrap().remove("@context");
        let result = validator.validate(&doc, false);
        assert!(!result.valid);
        assert!(result.errors.contains(&Finding::root(Issue::MissingContext)));
    }

    #[test]
    fn test_invalid_context_is_error() {
        let validator = Validator::new();
        let mut doc = valid_product();
        doc.as_object_mut()
            .unwrap()
            .insert("@context".to_string(), json!("https://example.org/ctx"));
        let result = validator.validate(&doc, false);
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|f| matches!(&f.issue, Issue::InvalidContext { value } if value.contains("example.org"))));
    }

    #[test]
    fn test_nested_offer_needs_no_context() {
        // The Offer inside valid_product() has no @context and must not
        // be flagged for it
        let validator = Validator::new();
        let result = validator.validate(&valid_product(), false);
        assert!(!result
            .errors
            .iter()
            .any(|f| f.issue == Issue::MissingContext));
    }

    #[test]
    fn test_missing_recommended_is_warning() {
        let validator = Validator::new();
        let mut doc = valid_product();
        doc.as_object_mut().unwrap().remove("description");
        let result = validator.validate(&doc, false);
        assert!(result.valid);
        assert!(result.warnings.contains(&Finding::root(
            Issue::MissingRecommendedField {
                field: "description".to_string()
            }
        )));
    }

    #[test]
    fn test_strict_promotes_recommended_to_error() {
        let validator = Validator::new();
        let mut doc = valid_product();
        doc.as_object_mut().unwrap().remove("description");
        let result = validator.validate(&doc, true);
        assert!(!result.valid);
        assert!(result.errors.contains(&Finding::root(
            Issue::MissingRecommendedField {
                field: "description".to_string()
            }
        )));
    }

    #[test]
    fn test_strict_errors_superset_of_normal() {
        let validator = Validator::new();
        let doc = json!({
            "@type": "Product",
            "name": "X",
            "gtin14": "123"
        });
        let normal = validator.validate(&doc, false);
        let strict = validator.validate(&doc, true);
        for error in &normal.errors {
            assert!(
                strict.errors.contains(error),
                "strict mode lost error: {}",
                error
            );
        }
        assert!(strict.errors.len() > normal.errors.len());
    }

    #[test]
    fn test_constraint_violation_reported() {
        let validator = Validator::new();
        let mut doc = valid_product();
        doc.as_object_mut()
            .unwrap()
            .insert("gtin14".to_string(), json!("123"));
        let result = validator.validate(&doc, false);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|f| matches!(
            &f.issue,
            Issue::ConstraintViolation { field, .. } if field == "gtin14"
        )));
    }

    #[test]
    fn test_product_id_must_match_digital_link_grammar() {
        let validator = Validator::new();
        let mut doc = valid_product();
        doc.as_object_mut().unwrap().insert(
            "@id".to_string(),
            json!("https://data.example.org/wl1/product/example"),
        );
        let result = validator.validate(&doc, false);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|f| matches!(
            &f.issue,
            Issue::ConstraintViolation { field, rule } if field == "@id" && rule.contains("Digital Link")
        )));
    }

    #[test]
    fn test_nested_offer_error_is_prefixed() {
        // Offer missing priceCurrency must be attributed to the offers
        // sub-document
        let validator = Validator::new();
        let doc = json!({
            "@type": "Product",
            "name": "X",
            "gtin14": "12345678901231",
            "offers": {"@type": "Offer", "price": "9.99"}
        });
        let result = validator.validate(&doc, false);
        assert!(!result.valid);
        let finding = result
            .errors
            .iter()
            .find(|f| f.issue == Issue::MissingRequiredField { field: "priceCurrency".to_string() })
            .expect("missing priceCurrency error not reported");
        assert_eq!(finding.path, vec!["offers".to_string()]);
        assert_eq!(
            finding.to_string(),
            "offers: Missing required field: priceCurrency"
        );
    }

    #[test]
    fn test_deeply_nested_paths_accumulate() {
        let validator = Validator::new();
        let doc = json!({
            "@context": "https://schema.org",
            "@type": "Product",
            "@id": "https://data.example.org/wl1/01/12345678901231",
            "name": "X",
            "gtin14": "12345678901231",
            "offers": {
                "@type": "Offer",
                "price": "9.99",
                "priceCurrency": "USD",
                "seller": {"@type": "Organization", "name": ""}
            }
        });
        let result = validator.validate(&doc, false);
        let finding = result
            .errors
            .iter()
            .find(|f| f.path == vec!["offers".to_string(), "seller".to_string()])
            .expect("nested seller finding not reported");
        assert!(finding.to_string().starts_with("offers.seller: "));
    }

    #[test]
    fn test_unknown_type_vacuously_valid_with_warning() {
        let validator = Validator::new();
        let doc = json!({
            "@context": "https://schema.org",
            "@type": "Recipe",
            "name": "Carbonara"
        });
        let result = validator.validate(&doc, false);
        assert!(result.valid);
        assert!(result.warnings.contains(&Finding::root(Issue::UnknownType {
            schema_type: "Recipe".to_string()
        })));
    }

    #[test]
    fn test_missing_type_is_error() {
        let validator = Validator::new();
        let doc = json!({"@context": "https://schema.org", "name": "X"});
        let result = validator.validate(&doc, false);
        assert!(!result.valid);
        assert!(result.errors.contains(&Finding::root(Issue::MissingType)));
    }

    #[test]
    fn test_non_object_document_is_error() {
        let validator = Validator::new();
        let result = validator.validate(&json!("just a string"), false);
        assert!(!result.valid);
    }

    #[test]
    fn test_monotonicity_fixing_a_field_only_removes_its_errors() {
        let validator = Validator::new();
        let mut doc = json!({
            "@context": "https://schema.org",
            "@type": "Product",
            "@id": "https://data.example.org/wl1/01/12345678901231",
            "name": "X"
        });
        let before = validator.validate(&doc, false);
        doc.as_object_mut()
            .unwrap()
            .insert("gtin14".to_string(), json!("12345678901231"));
        let after = validator.validate(&doc, false);

        // Every remaining error was already present before the fix
        for error in &after.errors {
            assert!(before.errors.contains(error));
        }
        // And the fix removed the gtin14 error
        assert!(before
            .errors
            .iter()
            .any(|f| f.issue == Issue::MissingRequiredField { field: "gtin14".to_string() }));
        assert!(!after
            .errors
            .iter()
            .any(|f| f.issue == Issue::MissingRequiredField { field: "gtin14".to_string() }));
    }

    #[test]
    fn test_validate_batch_counts_and_order() {
        let _ = env_logger::builder().is_test(true).try_init();
        let validator = Validator::new();
        let documents = vec![
            valid_product(),
            json!({"@context": "https://schema.org", "@type": "Product", "name": "bad"}),
            valid_product(),
        ];
        let report = validator.validate_batch(&documents, false);
        assert_eq!(report.total, 3);
        assert_eq!(report.valid, 2);
        assert_eq!(report.invalid, 1);
        assert_eq!(report.documents.len(), 3);
        assert_eq!(report.documents[1].index, 1);
        assert!(!report.documents[1].valid);
        assert_eq!(report.documents[1].schema_type, "Product");
        assert_eq!(report.documents[1].id, "unknown");
    }

    #[test]
    fn test_validate_batch_documents_independent() {
        let validator = Validator::new();
        let bad = json!({"@context": "https://schema.org", "@type": "Product", "name": "bad"});
        let alone = validator.validate_batch(std::slice::from_ref(&valid_product()), false);
        let mixed = validator.validate_batch(&[bad, valid_product()], false);
        assert!(alone.documents[0].valid);
        assert!(mixed.documents[1].valid);
        assert_eq!(
            alone.documents[0].errors.len(),
            mixed.documents[1].errors.len()
        );
    }

    #[test]
    fn test_validate_before_upload_partitions_stably() {
        let validator = Validator::new();
        let mut good_a = valid_product();
        good_a
            .as_object_mut()
            .unwrap()
            .insert("name".to_string(), json!("First"));
        let mut good_b = valid_product();
        good_b
            .as_object_mut()
            .unwrap()
            .insert("name".to_string(), json!("Second"));
        let bad = json!({"@context": "https://schema.org", "@type": "Product", "name": "bad"});

        let (accepted, rejected) =
            validator.validate_before_upload(vec![good_a, bad, good_b], false);
        assert_eq!(accepted.len(), 2);
        assert_eq!(rejected.len(), 1);
        assert_eq!(accepted[0]["name"], "First");
        assert_eq!(accepted[1]["name"], "Second");
        assert!(!rejected[0].errors.is_empty());
        assert_eq!(rejected[0].document["name"], "bad");
    }

    #[test]
    fn test_warnings_never_affect_validity() {
        let validator = Validator::new();
        let mut doc = valid_product();
        let obj = doc.as_object_mut().unwrap();
        obj.remove("description");
        obj.remove("image");
        let result = validator.validate(&doc, false);
        assert!(result.valid);
        assert!(!result.warnings.is_empty());
    }
}
