//! Loading release drafts from disk
//!
//! Drafts come from two places: a plain JSON draft file, or an existing
//! `ro-crate-metadata.json` whose root dataset node is mapped onto draft
//! fields (so a re-release can start from what was already packaged).

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ReleaseError;
use crate::metadata::{AdditionalProperty, ReleaseDraft};

/// Standard metadata descriptor filename
pub const METADATA_DESCRIPTOR_ID: &str = "ro-crate-metadata.json";

/// Load a draft from a JSON draft file
pub fn load_draft(path: &Path) -> Result<ReleaseDraft, ReleaseError> {
    let content = fs::read_to_string(path).map_err(|e| ReleaseError::LoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| ReleaseError::LoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Load a draft by mapping an existing RO-Crate's root dataset node
///
/// `path` may be the metadata file itself or a directory containing one.
pub fn load_draft_from_crate(path: &Path) -> Result<ReleaseDraft, ReleaseError> {
    let metadata_path = if path.is_dir() {
        find_metadata_file(path)?
    } else if path.is_file() {
        path.to_path_buf()
    } else {
        return Err(ReleaseError::InvalidPath(path.to_path_buf()));
    };

    let content = fs::read_to_string(&metadata_path).map_err(|e| ReleaseError::LoadError {
        path: metadata_path.display().to_string(),
        reason: e.to_string(),
    })?;

    let doc: Value = serde_json::from_str(&content).map_err(|e| ReleaseError::LoadError {
        path: metadata_path.display().to_string(),
        reason: e.to_string(),
    })?;

    let graph = doc
        .get("@graph")
        .and_then(|g| g.as_array())
        .ok_or_else(|| ReleaseError::LoadError {
            path: metadata_path.display().to_string(),
            reason: "No @graph array in metadata".to_string(),
        })?;

    draft_from_graph(graph)
}

/// Find ro-crate-metadata.json (with optional prefix) in a directory
fn find_metadata_file(dir: &Path) -> Result<PathBuf, ReleaseError> {
    let standard = dir.join(METADATA_DESCRIPTOR_ID);
    if standard.exists() {
        return Ok(standard);
    }

    // Look for *-ro-crate-metadata.json
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with("-ro-crate-metadata.json") {
                    return Ok(entry.path());
                }
            }
        }
    }

    Err(ReleaseError::LoadError {
        path: dir.display().to_string(),
        reason: "No ro-crate-metadata.json found".to_string(),
    })
}

/// Map the root dataset node of a crate graph onto a draft
pub fn draft_from_graph(graph: &[Value]) -> Result<ReleaseDraft, ReleaseError> {
    let root = find_root_dataset(graph).ok_or(ReleaseError::MissingRootEntity)?;

    let guid = root
        .get("@id")
        .and_then(|v| v.as_str())
        .filter(|id| *id != "./")
        .map(String::from);

    Ok(ReleaseDraft {
        guid,
        name: string_prop(root, "name"),
        description: string_prop(root, "description"),
        keywords: list_prop(root, "keywords"),
        license: reference_prop(root, "license"),
        version: string_prop(root, "version"),
        date_published: string_prop(root, "datePublished").map(|d| {
            // Drop any time component
            d.split('T').next().unwrap_or(&d).to_string()
        }),
        authors: list_prop(root, "author"),
        principal_investigator: string_prop(root, "principalInvestigator"),
        contact_email: string_prop(root, "contactEmail"),
        publisher: reference_prop(root, "publisher"),
        funders: list_prop(root, "funder"),
        doi: reference_prop(root, "identifier").filter(|id| id.starts_with("https://doi.org/")),
        citation: string_prop(root, "citation"),
        associated_publications: list_prop(root, "associatedPublication"),
        confidentiality_level: None,
        additional_properties: properties_prop(root),
    })
}

/// Find the root dataset node, skipping the metadata descriptor
fn find_root_dataset(graph: &[Value]) -> Option<&Value> {
    graph.iter().find(|entity| {
        let id = entity.get("@id").and_then(|v| v.as_str()).unwrap_or("");
        !id.ends_with(METADATA_DESCRIPTOR_ID) && has_type(entity, "Dataset")
    })
}

fn has_type(entity: &Value, type_name: &str) -> bool {
    match entity.get("@type") {
        Some(Value::String(t)) => t == type_name,
        Some(Value::Array(arr)) => arr.iter().any(|v| v.as_str() == Some(type_name)),
        _ => false,
    }
}

fn string_prop(entity: &Value, key: &str) -> Option<String> {
    entity
        .get(key)
        .and_then(|v| v.as_str())
        .map(String::from)
        .filter(|s| !s.is_empty())
}

/// A property that may be a plain string or an `{"@id": ...}` reference
fn reference_prop(entity: &Value, key: &str) -> Option<String> {
    match entity.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(obj) => obj
            .get("@id")
            .and_then(|v| v.as_str())
            .map(String::from),
        _ => None,
    }
}

/// A property that may be a single string, a semicolon-joined string, or an
/// array of strings
fn list_prop(entity: &Value, key: &str) -> Vec<String> {
    match entity.get(key) {
        Some(Value::String(s)) => s
            .split(';')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(|v| v.as_str())
            .map(String::from)
            .collect(),
        _ => vec![],
    }
}

/// Map `additionalProperty` PropertyValue entries onto name/value pairs
fn properties_prop(entity: &Value) -> Vec<AdditionalProperty> {
    let entries = match entity.get("additionalProperty") {
        Some(Value::Array(arr)) => arr.as_slice(),
        _ => return vec![],
    };

    entries
        .iter()
        .filter_map(|entry| {
            let name = entry.get("name")?.as_str()?.to_string();
            let value = entry.get("value")?.as_str()?.to_string();
            Some(AdditionalProperty { name, value })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_graph() -> Vec<Value> {
        vec![
            json!({
                "@id": "ro-crate-metadata.json",
                "@type": "CreativeWork",
                "about": {"@id": "./"}
            }),
            json!({
                "@id": "ark:59852/rocrate-sample",
                "@type": ["Dataset", "https://w3id.org/EVI#ROCrate"],
                "name": "Sample Release",
                "description": "A packaged dataset",
                "keywords": ["genomics", "imaging"],
                "license": "https://creativecommons.org/licenses/by/4.0/",
                "version": "1.0",
                "datePublished": "2025-03-03T12:00:00",
                "author": "Alice Smith; Bob Jones",
                "principalInvestigator": "Alice Smith",
                "contactEmail": "alice@example.edu",
                "additionalProperty": [
                    {"@type": "PropertyValue", "name": "Completeness", "value": "Complete"},
                    {"@type": "PropertyValue", "name": "Human Subject", "value": "No"}
                ]
            }),
            json!({
                "@id": "./data.csv",
                "@type": "File"
            }),
        ]
    }

    #[test]
    fn test_draft_from_graph() {
        let draft = draft_from_graph(&sample_graph()).unwrap();

        assert_eq!(draft.guid.as_deref(), Some("ark:59852/rocrate-sample"));
        assert_eq!(draft.name.as_deref(), Some("Sample Release"));
        assert_eq!(draft.keywords, vec!["genomics", "imaging"]);
        // Semicolon-joined author string split into entries
        assert_eq!(draft.authors, vec!["Alice Smith", "Bob Jones"]);
        // Time component dropped
        assert_eq!(draft.date_published.as_deref(), Some("2025-03-03"));
        assert_eq!(draft.additional_properties.len(), 2);
        assert_eq!(draft.additional_properties[0].name, "Completeness");
    }

    #[test]
    fn test_descriptor_skipped_when_finding_root() {
        // Descriptor first in graph must not be picked as root
        let draft = draft_from_graph(&sample_graph()).unwrap();
        assert_ne!(draft.guid.as_deref(), Some("ro-crate-metadata.json"));
    }

    #[test]
    fn test_missing_root_entity() {
        let graph = vec![json!({
            "@id": "ro-crate-metadata.json",
            "@type": "CreativeWork"
        })];
        assert!(matches!(
            draft_from_graph(&graph),
            Err(ReleaseError::MissingRootEntity)
        ));
    }

    #[test]
    fn test_license_as_reference_object() {
        let graph = vec![json!({
            "@id": "./",
            "@type": "Dataset",
            "name": "Ref License",
            "license": {"@id": "https://creativecommons.org/licenses/by/4.0/"}
        })];

        let draft = draft_from_graph(&graph).unwrap();
        assert_eq!(
            draft.license.as_deref(),
            Some("https://creativecommons.org/licenses/by/4.0/")
        );
        // Root "./" id is not a usable release identifier
        assert!(draft.guid.is_none());
    }

    #[test]
    fn test_doi_only_from_doi_identifier() {
        let graph = vec![json!({
            "@id": "./",
            "@type": "Dataset",
            "name": "With DOI",
            "identifier": "https://doi.org/10.18130/example"
        })];

        let draft = draft_from_graph(&graph).unwrap();
        assert_eq!(draft.doi.as_deref(), Some("https://doi.org/10.18130/example"));
    }
}
