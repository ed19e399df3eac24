//! Invocation building for the external packaging tool
//!
//! Turns validated release metadata into the ordered flag/value sequence the
//! packaging tool expects. Deterministic: identical metadata always produces
//! an identical invocation. The inverse parser exists so an emitted
//! invocation can be checked field-for-field.

use serde_json::json;

use crate::error::ReleaseError;
use crate::metadata::{AdditionalProperty, ReleaseDraft, ReleaseMetadata};
use crate::schema::{field_by_flag, FieldShape, RELEASE_SCHEMA};
use crate::validate::validate;

/// Program the invocation targets
pub const RELEASE_PROGRAM: &str = "fairscape-cli";

/// Subcommand path within the program
pub const RELEASE_SUBCOMMAND: &[&str] = &["rocrate", "release"];

/// One named argument of the invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationArg {
    pub flag: String,
    pub value: String,
}

/// A complete invocation of the packaging tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub subcommand: Vec<String>,
    /// Positional crate directory argument, if set
    pub crate_path: Option<String>,
    /// Named arguments, in schema order
    pub args: Vec<InvocationArg>,
}

impl Invocation {
    pub fn with_crate_path(mut self, path: impl Into<String>) -> Self {
        self.crate_path = Some(path.into());
        self
    }

    /// Flatten into an argv-style vector
    pub fn to_args(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(2 + self.subcommand.len() + self.args.len() * 2);
        out.push(self.program.clone());
        out.extend(self.subcommand.iter().cloned());
        if let Some(path) = &self.crate_path {
            out.push(path.clone());
        }
        for arg in &self.args {
            out.push(arg.flag.clone());
            out.push(arg.value.clone());
        }
        out
    }

    /// Render as a single shell command line with quoting
    pub fn to_command_line(&self) -> String {
        self.to_args()
            .iter()
            .map(|a| shell_quote(a))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Build a packaging invocation from release metadata
///
/// Re-checks the schema contract first: handing this function metadata that
/// was never validated (or was mutated after validation) is a programming
/// error, reported as `SchemaMismatch` with the full violation list.
pub fn build(metadata: &ReleaseMetadata) -> Result<Invocation, ReleaseError> {
    if let Err(violations) = validate(&metadata.to_draft()).into_result() {
        return Err(ReleaseError::SchemaMismatch { violations });
    }

    let mut args = Vec::new();
    for spec in RELEASE_SCHEMA {
        match spec.shape {
            FieldShape::TextList => {
                for value in list_field(metadata, spec.name) {
                    args.push(InvocationArg {
                        flag: spec.flag.to_string(),
                        value: value.clone(),
                    });
                }
            }
            FieldShape::PropertyList => {
                if !metadata.additional_properties.is_empty() {
                    args.push(InvocationArg {
                        flag: spec.flag.to_string(),
                        value: properties_document(&metadata.additional_properties)?,
                    });
                }
            }
            _ => {
                if let Some(value) = single_field(metadata, spec.name) {
                    args.push(InvocationArg {
                        flag: spec.flag.to_string(),
                        value,
                    });
                }
            }
        }
    }

    Ok(Invocation {
        program: RELEASE_PROGRAM.to_string(),
        subcommand: RELEASE_SUBCOMMAND.iter().map(|s| s.to_string()).collect(),
        crate_path: None,
        args,
    })
}

/// Serialize additional properties as the single structured-data argument:
/// an ordered array of PropertyValue objects
fn properties_document(props: &[AdditionalProperty]) -> Result<String, ReleaseError> {
    let entries: Vec<serde_json::Value> = props
        .iter()
        .map(|p| {
            json!({
                "@type": "PropertyValue",
                "name": p.name,
                "value": p.value,
            })
        })
        .collect();
    Ok(serde_json::to_string(&entries)?)
}

fn single_field(metadata: &ReleaseMetadata, name: &str) -> Option<String> {
    match name {
        "guid" => Some(metadata.guid.clone()),
        "name" => Some(metadata.name.clone()),
        "description" => Some(metadata.description.clone()),
        "license" => Some(metadata.license.clone()),
        "version" => Some(metadata.version.clone()),
        "date_published" => Some(metadata.date_published.format("%Y-%m-%d").to_string()),
        "principal_investigator" => metadata.principal_investigator.clone(),
        "contact_email" => metadata.contact_email.clone(),
        "publisher" => metadata.publisher.clone(),
        "doi" => metadata.doi.clone(),
        "citation" => metadata.citation.clone(),
        "confidentiality_level" => metadata.confidentiality_level.clone(),
        _ => None,
    }
}

fn list_field<'a>(metadata: &'a ReleaseMetadata, name: &str) -> &'a [String] {
    match name {
        "keywords" => &metadata.keywords,
        "authors" => &metadata.authors,
        "funders" => &metadata.funders,
        "associated_publications" => &metadata.associated_publications,
        _ => &[],
    }
}

/// Parse an argv-style invocation back into a draft
///
/// The inverse of `build`: flag/value pairs map onto draft fields, repeated
/// flags accumulate in declaration order, and the additional-properties
/// document is decoded back into name/value pairs. A leading program name,
/// subcommand words, and the positional crate path are skipped.
pub fn parse_invocation(args: &[String]) -> Result<ReleaseDraft, ReleaseError> {
    let mut draft = ReleaseDraft::default();

    let mut iter = args.iter().peekable();
    while let Some(token) = iter.next() {
        if !token.starts_with("--") {
            // Program name, subcommand word, or crate path positional
            continue;
        }
        let spec = field_by_flag(token).ok_or_else(|| ReleaseError::UnknownFlag(token.clone()))?;
        let value = iter
            .next()
            .ok_or_else(|| ReleaseError::UnknownFlag(format!("{} (missing value)", token)))?;

        match spec.name {
            "guid" => draft.guid = Some(value.clone()),
            "name" => draft.name = Some(value.clone()),
            "description" => draft.description = Some(value.clone()),
            "keywords" => draft.keywords.push(value.clone()),
            "license" => draft.license = Some(value.clone()),
            "version" => draft.version = Some(value.clone()),
            "date_published" => draft.date_published = Some(value.clone()),
            "authors" => draft.authors.push(value.clone()),
            "principal_investigator" => draft.principal_investigator = Some(value.clone()),
            "contact_email" => draft.contact_email = Some(value.clone()),
            "publisher" => draft.publisher = Some(value.clone()),
            "funders" => draft.funders.push(value.clone()),
            "doi" => draft.doi = Some(value.clone()),
            "citation" => draft.citation = Some(value.clone()),
            "associated_publications" => draft.associated_publications.push(value.clone()),
            "confidentiality_level" => draft.confidentiality_level = Some(value.clone()),
            "additional_properties" => {
                draft.additional_properties = serde_json::from_str(value)?;
            }
            _ => {}
        }
    }

    Ok(draft)
}

/// Quote a single argument for a POSIX shell
fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_metadata() -> ReleaseMetadata {
        let draft = ReleaseDraft {
            guid: Some("ark:59852/rocrate-test".to_string()),
            name: Some("Test Release".to_string()),
            description: Some("Release for invocation tests".to_string()),
            keywords: vec!["genomics".to_string(), "proteomics".to_string()],
            license: Some("https://creativecommons.org/licenses/by-nc-sa/4.0/".to_string()),
            version: Some("0.5".to_string()),
            date_published: Some("2025-03-03".to_string()),
            authors: vec!["Alice Smith".to_string(), "Bob Jones".to_string()],
            additional_properties: vec![
                AdditionalProperty {
                    name: "Completeness".to_string(),
                    value: "Complete as released".to_string(),
                },
                AdditionalProperty {
                    name: "Human Subject".to_string(),
                    value: "No".to_string(),
                },
            ],
            ..Default::default()
        };
        validate(&draft).into_result().unwrap()
    }

    #[test]
    fn test_build_schema_order() {
        let invocation = build(&sample_metadata()).unwrap();
        let flags: Vec<&str> = invocation.args.iter().map(|a| a.flag.as_str()).collect();
        assert_eq!(
            flags,
            vec![
                "--guid",
                "--name",
                "--description",
                "--keywords",
                "--keywords",
                "--license",
                "--version",
                "--date-published",
                "--author",
                "--author",
                "--additional-properties",
            ]
        );
    }

    #[test]
    fn test_build_deterministic() {
        let metadata = sample_metadata();
        let a = build(&metadata).unwrap();
        let b = build(&metadata).unwrap();
        assert_eq!(a.to_command_line(), b.to_command_line());
    }

    #[test]
    fn test_repeatable_fields_expanded_in_order() {
        let invocation = build(&sample_metadata()).unwrap();
        let authors: Vec<&str> = invocation
            .args
            .iter()
            .filter(|a| a.flag == "--author")
            .map(|a| a.value.as_str())
            .collect();
        assert_eq!(authors, vec!["Alice Smith", "Bob Jones"]);
    }

    #[test]
    fn test_properties_single_json_argument() {
        let invocation = build(&sample_metadata()).unwrap();
        let props_arg = invocation
            .args
            .iter()
            .find(|a| a.flag == "--additional-properties")
            .unwrap();

        let parsed: Vec<serde_json::Value> = serde_json::from_str(&props_arg.value).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["@type"], "PropertyValue");
        assert_eq!(parsed[0]["name"], "Completeness");
        assert_eq!(parsed[1]["name"], "Human Subject");
    }

    #[test]
    fn test_round_trip() {
        let metadata = sample_metadata();
        let invocation = build(&metadata).unwrap().with_crate_path("./my-crate");

        let draft = parse_invocation(&invocation.to_args()).unwrap();
        let recovered = validate(&draft).into_result().unwrap();
        assert_eq!(recovered, metadata);
    }

    #[test]
    fn test_schema_mismatch_on_unvalidated_metadata() {
        let mut metadata = sample_metadata();
        metadata.name = String::new();

        let err = build(&metadata).unwrap_err();
        match err {
            ReleaseError::SchemaMismatch { violations } => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "name");
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let args = vec!["--bogus".to_string(), "x".to_string()];
        assert!(matches!(
            parse_invocation(&args),
            Err(ReleaseError::UnknownFlag(_))
        ));
    }

    #[test]
    fn test_command_line_quoting() {
        let invocation = build(&sample_metadata()).unwrap();
        let line = invocation.to_command_line();
        assert!(line.starts_with("fairscape-cli rocrate release --guid"));
        assert!(line.contains("'Test Release'"));
        // Flags themselves never need quoting
        assert!(line.contains(" --license https://creativecommons.org"));
    }

    #[test]
    fn test_date_echoed_verbatim() {
        let mut metadata = sample_metadata();
        metadata.date_published = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();

        let invocation = build(&metadata).unwrap();
        let date_arg = invocation
            .args
            .iter()
            .find(|a| a.flag == "--date-published")
            .unwrap();
        assert_eq!(date_arg.value, "2024-12-01");
    }
}
