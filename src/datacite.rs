//! DataCite DOI request construction
//!
//! Builds the kernel-4 JSON:API document the DataCite DOI service expects
//! from validated release metadata. Pure transform; submitting the document
//! is left to the external DOI client.

use chrono::Datelike;
use serde_json::{json, Value};

use crate::metadata::ReleaseMetadata;

/// DataCite metadata schema version
pub const DATACITE_SCHEMA: &str = "http://datacite.org/schema/kernel-4";

/// Build a DataCite DOI creation document for a release
///
/// `prefix` is the registrant's DOI prefix (e.g. "10.18130"). The
/// publication year is taken from `date_published`, never from the clock,
/// so the output is deterministic.
pub fn datacite_payload(metadata: &ReleaseMetadata, prefix: &str) -> Value {
    let creators: Vec<Value> = metadata
        .authors
        .iter()
        .map(|name| json!({ "name": name }))
        .collect();

    let subjects: Vec<Value> = metadata
        .keywords
        .iter()
        .map(|kw| json!({ "subject": kw }))
        .collect();

    let publisher = metadata
        .publisher
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());

    let mut attributes = json!({
        "event": "publish",
        "prefix": prefix,
        "creators": creators,
        "titles": [{ "title": metadata.name }],
        "publisher": publisher,
        "publicationYear": metadata.date_published.year(),
        "types": { "resourceTypeGeneral": "Dataset" },
        "descriptions": [{
            "description": metadata.description,
            "descriptionType": "Abstract"
        }],
        "schemaVersion": DATACITE_SCHEMA,
        "subjects": subjects,
        "version": metadata.version,
        "rightsList": [{ "rights": metadata.license }],
        "dates": [{
            "date": metadata.date_published.format("%Y-%m-%d").to_string(),
            "dateType": "Issued"
        }],
    });

    // Resolvable identifiers double as the landing URL
    if metadata.guid.starts_with("http://") || metadata.guid.starts_with("https://") {
        attributes["url"] = json!(metadata.guid);
    }

    json!({
        "data": {
            "type": "dois",
            "attributes": attributes
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ReleaseDraft;
    use crate::validate::validate;

    fn sample_metadata() -> ReleaseMetadata {
        let draft = ReleaseDraft {
            guid: Some("ark:59852/rocrate-test".to_string()),
            name: Some("Test Release".to_string()),
            description: Some("Release for DataCite tests".to_string()),
            keywords: vec!["genomics".to_string()],
            license: Some("https://creativecommons.org/licenses/by/4.0/".to_string()),
            version: Some("1.2".to_string()),
            date_published: Some("2025-03-03".to_string()),
            authors: vec!["Alice Smith".to_string(), "Bob Jones".to_string()],
            publisher: Some("University of Virginia Dataverse".to_string()),
            ..Default::default()
        };
        validate(&draft).into_result().unwrap()
    }

    #[test]
    fn test_payload_shape() {
        let payload = datacite_payload(&sample_metadata(), "10.18130");
        let attrs = &payload["data"]["attributes"];

        assert_eq!(payload["data"]["type"], "dois");
        assert_eq!(attrs["event"], "publish");
        assert_eq!(attrs["prefix"], "10.18130");
        assert_eq!(attrs["titles"][0]["title"], "Test Release");
        assert_eq!(attrs["creators"].as_array().unwrap().len(), 2);
        assert_eq!(attrs["creators"][0]["name"], "Alice Smith");
        assert_eq!(attrs["schemaVersion"], DATACITE_SCHEMA);
    }

    #[test]
    fn test_publication_year_from_date_published() {
        let payload = datacite_payload(&sample_metadata(), "10.18130");
        let attrs = &payload["data"]["attributes"];
        assert_eq!(attrs["publicationYear"], 2025);
        assert_eq!(attrs["dates"][0]["date"], "2025-03-03");
        assert_eq!(attrs["dates"][0]["dateType"], "Issued");
    }

    #[test]
    fn test_license_in_rights_list() {
        let payload = datacite_payload(&sample_metadata(), "10.18130");
        assert_eq!(
            payload["data"]["attributes"]["rightsList"][0]["rights"],
            "https://creativecommons.org/licenses/by/4.0/"
        );
    }

    #[test]
    fn test_ark_identifier_has_no_url() {
        let payload = datacite_payload(&sample_metadata(), "10.18130");
        assert!(payload["data"]["attributes"].get("url").is_none());
    }

    #[test]
    fn test_https_identifier_becomes_url() {
        let mut metadata = sample_metadata();
        metadata.guid = "https://example.org/releases/1".to_string();

        let payload = datacite_payload(&metadata, "10.18130");
        assert_eq!(
            payload["data"]["attributes"]["url"],
            "https://example.org/releases/1"
        );
    }

    #[test]
    fn test_deterministic() {
        let metadata = sample_metadata();
        let a = serde_json::to_string(&datacite_payload(&metadata, "10.18130")).unwrap();
        let b = serde_json::to_string(&datacite_payload(&metadata, "10.18130")).unwrap();
        assert_eq!(a, b);
    }
}
