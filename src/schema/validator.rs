//! In-process document validation
//!
//! Evaluates a document against a [`CollectionSchema`] with the same rules
//! the engine applies to the rendered `$jsonSchema`:
//!
//! - every required field must be present
//! - present fields must carry the declared BSON type (null is a type too)
//! - enum fields must hold one of the declared strings
//! - pattern fields must match their regular expression
//! - arrays must meet `minItems` and every element must satisfy `items`
//! - closed shapes reject undeclared fields
//!
//! Unlike the engine, which stops at the first failure, all violations are
//! collected so a report can explain everything wrong with a document.

use super::bson_type::BsonType;
use super::shape::{CollectionSchema, Constraint, ObjectShape};
use mongodb::bson::{Bson, Document};
use regex::Regex;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViolationKind {
    MissingField,
    TypeMismatch { expected: String, found: String },
    PatternMismatch { pattern: String },
    InvalidPattern { pattern: String, cause: String },
    NotInEnum { allowed: Vec<String> },
    TooFewItems { min: u32, found: usize },
    UnexpectedField,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Dotted path to the offending field, array elements by index
    pub path: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::MissingField => write!(f, "{}: missing required field", self.path),
            ViolationKind::TypeMismatch { expected, found } => {
                write!(f, "{}: expected {}, found {}", self.path, expected, found)
            }
            ViolationKind::PatternMismatch { pattern } => {
                write!(f, "{}: does not match pattern {}", self.path, pattern)
            }
            ViolationKind::InvalidPattern { pattern, cause } => {
                write!(f, "{}: pattern {} is invalid: {}", self.path, pattern, cause)
            }
            ViolationKind::NotInEnum { allowed } => {
                write!(f, "{}: value not in [{}]", self.path, allowed.join(", "))
            }
            ViolationKind::TooFewItems { min, found } => {
                write!(f, "{}: expected at least {} items, found {}", self.path, min, found)
            }
            ViolationKind::UnexpectedField => {
                write!(f, "{}: field is not declared by the schema", self.path)
            }
        }
    }
}

/// Result of validating one document
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub collection: String,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }

    /// Generate a human-readable error log
    pub fn error_log(&self) -> String {
        let mut log = String::new();

        log.push_str("═══════════════════════════════════════════════════════════════\n");
        log.push_str(&format!(
            "              DOCUMENT REJECTED BY {}\n",
            self.collection.to_uppercase()
        ));
        log.push_str("═══════════════════════════════════════════════════════════════\n\n");

        let sections: [(&str, fn(&ViolationKind) -> bool); 4] = [
            ("MISSING REQUIRED FIELDS", |k| matches!(k, ViolationKind::MissingField)),
            ("TYPE MISMATCHES", |k| matches!(k, ViolationKind::TypeMismatch { .. })),
            ("VALUE CONSTRAINTS", |k| {
                matches!(
                    k,
                    ViolationKind::PatternMismatch { .. }
                        | ViolationKind::InvalidPattern { .. }
                        | ViolationKind::NotInEnum { .. }
                        | ViolationKind::TooFewItems { .. }
                )
            }),
            ("UNDECLARED FIELDS", |k| matches!(k, ViolationKind::UnexpectedField)),
        ];

        for (title, belongs) in sections.iter() {
            let entries: Vec<&Violation> =
                self.violations.iter().filter(|v| belongs(&v.kind)).collect();
            if entries.is_empty() {
                continue;
            }
            log.push_str(title);
            log.push_str(":\n");
            for v in entries {
                log.push_str(&format!("  - {}\n", v));
            }
            log.push('\n');
        }

        log.push_str("═══════════════════════════════════════════════════════════════\n");
        log
    }
}

pub struct DocumentValidator;

impl DocumentValidator {
    pub fn validate(schema: &CollectionSchema, document: &Document) -> ValidationReport {
        let mut violations = Vec::new();
        check_object(&schema.shape, document, "", &mut violations);

        ValidationReport {
            collection: schema.name.to_string(),
            violations,
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn check_object(shape: &ObjectShape, document: &Document, prefix: &str, out: &mut Vec<Violation>) {
    for field in &shape.fields {
        let path = join_path(prefix, field.name);
        match document.get(field.name) {
            Some(value) => check_value(&field.constraint, value, &path, out),
            None if field.required => out.push(Violation {
                path,
                kind: ViolationKind::MissingField,
            }),
            None => {}
        }
    }

    if shape.closed {
        for key in document.keys() {
            if shape.get(key).is_none() {
                out.push(Violation {
                    path: join_path(prefix, key),
                    kind: ViolationKind::UnexpectedField,
                });
            }
        }
    }
}

fn check_value(constraint: &Constraint, value: &Bson, path: &str, out: &mut Vec<Violation>) {
    match constraint {
        Constraint::Typed { bson_type, pattern } => {
            if !bson_type.matches(value) {
                out.push(type_mismatch(path, *bson_type, value));
                return;
            }
            if let (Some(pattern), Bson::String(s)) = (pattern, value) {
                match Regex::new(pattern) {
                    Ok(re) if re.is_match(s) => {}
                    Ok(_) => out.push(Violation {
                        path: path.to_string(),
                        kind: ViolationKind::PatternMismatch {
                            pattern: pattern.to_string(),
                        },
                    }),
                    Err(e) => out.push(Violation {
                        path: path.to_string(),
                        kind: ViolationKind::InvalidPattern {
                            pattern: pattern.to_string(),
                            cause: e.to_string(),
                        },
                    }),
                }
            }
        }
        Constraint::Enum(allowed) => {
            let accepted =
                matches!(value, Bson::String(s) if allowed.iter().any(|a| *a == s.as_str()));
            if !accepted {
                out.push(Violation {
                    path: path.to_string(),
                    kind: ViolationKind::NotInEnum {
                        allowed: allowed.iter().map(|v| v.to_string()).collect(),
                    },
                });
            }
        }
        Constraint::Object(shape) => match value {
            Bson::Document(inner) => check_object(shape, inner, path, out),
            other => out.push(type_mismatch(path, BsonType::Object, other)),
        },
        Constraint::Array { items, min_items } => match value {
            Bson::Array(elements) => {
                if let Some(min) = min_items {
                    if elements.len() < *min as usize {
                        out.push(Violation {
                            path: path.to_string(),
                            kind: ViolationKind::TooFewItems {
                                min: *min,
                                found: elements.len(),
                            },
                        });
                    }
                }
                for (i, element) in elements.iter().enumerate() {
                    check_value(items, element, &format!("{}.{}", path, i), out);
                }
            }
            other => out.push(type_mismatch(path, BsonType::Array, other)),
        },
    }
}

fn type_mismatch(path: &str, expected: BsonType, found: &Bson) -> Violation {
    Violation {
        path: path.to_string(),
        kind: ViolationKind::TypeMismatch {
            expected: expected.alias().to_string(),
            found: BsonType::alias_of(found).to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use mongodb::bson::oid::ObjectId;

    fn schema() -> CollectionSchema {
        CollectionSchema::new(
            "notes",
            ObjectShape::new()
                .required("title", Constraint::string())
                .required("state", Constraint::one_of(&["open", "closed"]))
                .optional("code", Constraint::matching(r"^[A-Z]{3}$"))
                .optional("owners", Constraint::non_empty_array_of(Constraint::object_id()))
                .optional(
                    "meta",
                    Constraint::object(ObjectShape::new().required("size", Constraint::int()).closed()),
                ),
        )
    }

    #[test]
    fn test_valid_document_passes() {
        let document = doc! {
            "title": "Intro",
            "state": "open",
            "code": "ABC",
            "owners": [ObjectId::new()],
            "meta": { "size": 10 },
            "anything": "else",
        };

        let report = DocumentValidator::validate(&schema(), &document);
        assert!(report.passed(), "{:?}", report.violations);
    }

    #[test]
    fn test_collects_every_violation() {
        let document = doc! {
            "state": "archived",
            "code": "abcd",
            "owners": [],
            "meta": { "size": "big", "extra": true },
        };

        let report = DocumentValidator::validate(&schema(), &document);
        let paths: Vec<&str> = report.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["title", "state", "code", "owners", "meta.size", "meta.extra"]);

        assert_eq!(report.violations[0].kind, ViolationKind::MissingField);
        assert_eq!(
            report.violations[3].kind,
            ViolationKind::TooFewItems { min: 1, found: 0 }
        );
        assert_eq!(
            report.violations[4].kind,
            ViolationKind::TypeMismatch {
                expected: "int".to_string(),
                found: "string".to_string()
            }
        );
        assert_eq!(report.violations[5].kind, ViolationKind::UnexpectedField);
    }

    #[test]
    fn test_array_elements_are_checked_by_index() {
        let document = doc! {
            "title": "t",
            "state": "closed",
            "owners": [ObjectId::new(), "not-an-id"],
        };

        let report = DocumentValidator::validate(&schema(), &document);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].path, "owners.1");
    }

    #[test]
    fn test_null_is_a_type_mismatch() {
        let document = doc! { "title": null, "state": "open" };

        let report = DocumentValidator::validate(&schema(), &document);
        assert_eq!(
            report.messages(),
            vec!["title: expected string, found null".to_string()]
        );
    }

    #[test]
    fn test_enum_rejects_non_strings() {
        let document = doc! { "title": "t", "state": 1 };

        let report = DocumentValidator::validate(&schema(), &document);
        assert!(matches!(
            report.violations[0].kind,
            ViolationKind::NotInEnum { .. }
        ));
    }

    #[test]
    fn test_error_log_groups_sections() {
        let document = doc! { "state": "archived", "meta": { "size": 1, "x": 1 } };

        let log = DocumentValidator::validate(&schema(), &document).error_log();
        assert!(log.contains("DOCUMENT REJECTED BY NOTES"));
        assert!(log.contains("MISSING REQUIRED FIELDS:\n  - title: missing required field"));
        assert!(log.contains("VALUE CONSTRAINTS:\n  - state: value not in [open, closed]"));
        assert!(log.contains("UNDECLARED FIELDS:\n  - meta.x"));
        assert!(!log.contains("TYPE MISMATCHES"));
    }
}
