//! Release metadata validation
//!
//! Checks a `ReleaseDraft` against the release schema and reports every
//! violation in a single pass, so a human can fix all issues at once.
//! Pure functions, no I/O.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::metadata::{ReleaseDraft, ReleaseMetadata};
use crate::schema::{FieldShape, FieldSpec, RELEASE_SCHEMA};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Kind of schema violation found in a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    MissingRequiredField,
    InvalidFieldShape,
    DuplicatePropertyName,
}

/// One violation: the offending field (or property name) and what was wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
}

impl Violation {
    fn new(field: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::MissingRequiredField => {
                write!(f, "missing required field '{}'", self.field)
            }
            ViolationKind::InvalidFieldShape => {
                write!(f, "field '{}' has an invalid value", self.field)
            }
            ViolationKind::DuplicatePropertyName => {
                write!(f, "duplicate additional property name '{}'", self.field)
            }
        }
    }
}

/// Result of validating a draft
#[derive(Debug)]
pub enum ValidationOutcome {
    /// All checks passed; carries the normalized metadata
    Valid(ReleaseMetadata),
    /// The complete list of violations, in schema order
    Invalid(Vec<Violation>),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    pub fn into_result(self) -> Result<ReleaseMetadata, Vec<Violation>> {
        match self {
            ValidationOutcome::Valid(m) => Ok(m),
            ValidationOutcome::Invalid(v) => Err(v),
        }
    }
}

/// Validate a draft against the release schema
pub fn validate(draft: &ReleaseDraft) -> ValidationOutcome {
    validate_against(RELEASE_SCHEMA, draft)
}

/// Validate a draft against an explicit schema
///
/// All violations are collected; nothing short-circuits.
pub fn validate_against(schema: &[FieldSpec], draft: &ReleaseDraft) -> ValidationOutcome {
    let mut violations = Vec::new();

    for spec in schema {
        check_field(spec, draft, &mut violations);
    }

    if violations.is_empty() {
        ValidationOutcome::Valid(normalize(draft))
    } else {
        ValidationOutcome::Invalid(violations)
    }
}

fn check_field(spec: &FieldSpec, draft: &ReleaseDraft, violations: &mut Vec<Violation>) {
    match spec.shape {
        FieldShape::Text => check_single(spec, single_value(draft, spec.name), violations, |_| true),
        FieldShape::Uri => check_single(spec, single_value(draft, spec.name), violations, |v| {
            Url::parse(v).is_ok()
        }),
        FieldShape::Date => check_single(spec, single_value(draft, spec.name), violations, |v| {
            parse_release_date(v).is_some()
        }),
        FieldShape::Email => check_single(spec, single_value(draft, spec.name), violations, |v| {
            EMAIL_RE.is_match(v)
        }),
        FieldShape::Enumerated(allowed) => {
            check_single(spec, single_value(draft, spec.name), violations, |v| {
                allowed.contains(&v)
            })
        }
        FieldShape::TextList => {
            let values = list_value(draft, spec.name);
            if values.is_empty() {
                if spec.required {
                    violations.push(Violation::new(spec.name, ViolationKind::MissingRequiredField));
                }
            } else if values.iter().any(|v| v.trim().is_empty()) {
                violations.push(Violation::new(spec.name, ViolationKind::InvalidFieldShape));
            }
        }
        FieldShape::PropertyList => check_properties(spec, draft, violations),
    }
}

/// Check a single-valued field: presence for required fields, then shape
fn check_single(
    spec: &FieldSpec,
    value: Option<&str>,
    violations: &mut Vec<Violation>,
    shape_ok: impl Fn(&str) -> bool,
) {
    match value {
        None => {
            if spec.required {
                violations.push(Violation::new(spec.name, ViolationKind::MissingRequiredField));
            }
        }
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                // Present-but-empty counts as missing when required
                let kind = if spec.required {
                    ViolationKind::MissingRequiredField
                } else {
                    ViolationKind::InvalidFieldShape
                };
                violations.push(Violation::new(spec.name, kind));
            } else if !shape_ok(trimmed) {
                violations.push(Violation::new(spec.name, ViolationKind::InvalidFieldShape));
            }
        }
    }
}

fn check_properties(spec: &FieldSpec, draft: &ReleaseDraft, violations: &mut Vec<Violation>) {
    let props = &draft.additional_properties;
    if props.is_empty() {
        if spec.required {
            violations.push(Violation::new(spec.name, ViolationKind::MissingRequiredField));
        }
        return;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<&str> = HashSet::new();
    for prop in props {
        let name = prop.name.trim();
        if name.is_empty() || prop.value.trim().is_empty() {
            violations.push(Violation::new(spec.name, ViolationKind::InvalidFieldShape));
            continue;
        }
        if !seen.insert(name) && reported.insert(name) {
            violations.push(Violation::new(name, ViolationKind::DuplicatePropertyName));
        }
    }
}

/// Parse a publication date: ISO `YYYY-MM-DD`, with `MM/DD/YYYY` accepted
/// as a legacy input form
pub fn parse_release_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%m/%d/%Y"))
        .ok()
}

/// Build normalized metadata from a draft that passed all checks
fn normalize(draft: &ReleaseDraft) -> ReleaseMetadata {
    let date = draft
        .date_published
        .as_deref()
        .and_then(|d| parse_release_date(d.trim()))
        .unwrap_or_default();

    ReleaseMetadata {
        guid: trim_owned(&draft.guid),
        name: trim_owned(&draft.name),
        description: trim_owned(&draft.description),
        keywords: dedupe(&draft.keywords),
        license: trim_owned(&draft.license),
        version: trim_owned(&draft.version),
        date_published: date,
        authors: trim_list(&draft.authors),
        principal_investigator: trim_opt(&draft.principal_investigator),
        contact_email: trim_opt(&draft.contact_email),
        publisher: trim_opt(&draft.publisher),
        funders: trim_list(&draft.funders),
        doi: trim_opt(&draft.doi),
        citation: trim_opt(&draft.citation),
        associated_publications: trim_list(&draft.associated_publications),
        confidentiality_level: trim_opt(&draft.confidentiality_level),
        additional_properties: draft
            .additional_properties
            .iter()
            .map(|p| crate::metadata::AdditionalProperty {
                name: p.name.trim().to_string(),
                value: p.value.trim().to_string(),
            })
            .collect(),
    }
}

fn trim_owned(value: &Option<String>) -> String {
    value.as_deref().unwrap_or("").trim().to_string()
}

fn trim_opt(value: &Option<String>) -> Option<String> {
    value.as_deref().map(|v| v.trim().to_string())
}

fn trim_list(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.trim().to_string()).collect()
}

/// Deduplicate while preserving first-occurrence order
fn dedupe(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Get a single-valued field from the draft by schema name
fn single_value<'a>(draft: &'a ReleaseDraft, name: &str) -> Option<&'a str> {
    match name {
        "guid" => draft.guid.as_deref(),
        "name" => draft.name.as_deref(),
        "description" => draft.description.as_deref(),
        "license" => draft.license.as_deref(),
        "version" => draft.version.as_deref(),
        "date_published" => draft.date_published.as_deref(),
        "principal_investigator" => draft.principal_investigator.as_deref(),
        "contact_email" => draft.contact_email.as_deref(),
        "publisher" => draft.publisher.as_deref(),
        "doi" => draft.doi.as_deref(),
        "citation" => draft.citation.as_deref(),
        "confidentiality_level" => draft.confidentiality_level.as_deref(),
        _ => None,
    }
}

/// Get a list-valued field from the draft by schema name
fn list_value<'a>(draft: &'a ReleaseDraft, name: &str) -> &'a [String] {
    match name {
        "keywords" => &draft.keywords,
        "authors" => &draft.authors,
        "funders" => &draft.funders,
        "associated_publications" => &draft.associated_publications,
        _ => &[],
    }
}
