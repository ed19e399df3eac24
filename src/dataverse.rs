//! Dataverse dataset request construction
//!
//! Builds the `datasetVersion` document the Dataverse native API expects
//! from validated release metadata. Pure transform; the upload itself is an
//! external collaborator.

use serde_json::{json, Value};

use crate::metadata::ReleaseMetadata;

/// Known license URIs and their Dataverse display names
const LICENSE_MAP: &[(&str, &str)] = &[
    ("https://creativecommons.org/licenses/by/4.0", "CC BY 4.0"),
    (
        "https://creativecommons.org/licenses/by-nc-sa/4.0",
        "CC BY-NC-SA 4.0",
    ),
    (
        "https://creativecommons.org/publicdomain/zero/1.0",
        "CC0 1.0",
    ),
];

/// Map a license URI onto Dataverse's name/uri pair, defaulting to CC BY 4.0
fn license_entry(license: &str) -> Value {
    let normalized = license.trim_end_matches('/');
    let (uri, name) = LICENSE_MAP
        .iter()
        .find(|(uri, _)| *uri == normalized)
        .copied()
        .unwrap_or(LICENSE_MAP[0]);
    json!({ "name": name, "uri": uri })
}

fn primitive(type_name: &str, value: &str) -> Value {
    json!({
        "value": value,
        "typeClass": "primitive",
        "multiple": false,
        "typeName": type_name
    })
}

/// Build the dataset creation document for the Dataverse native API
pub fn dataverse_dataset(metadata: &ReleaseMetadata) -> Value {
    let date = metadata.date_published.format("%Y-%m-%d").to_string();

    let author_entries: Vec<Value> = metadata
        .authors
        .iter()
        .map(|name| {
            json!({
                "authorName": primitive("authorName", name),
                "authorAffiliation": primitive("authorAffiliation", ""),
            })
        })
        .collect();

    let keyword_entries: Vec<Value> = metadata
        .keywords
        .iter()
        .map(|kw| json!({ "keywordValue": primitive("keywordValue", kw) }))
        .collect();

    let contact_name = metadata.principal_investigator.as_deref().unwrap_or("");
    let contact_email = metadata.contact_email.as_deref().unwrap_or("");

    let fields = json!([
        {
            "value": metadata.name,
            "typeClass": "primitive",
            "multiple": false,
            "typeName": "title"
        },
        {
            "value": author_entries,
            "typeClass": "compound",
            "multiple": true,
            "typeName": "author"
        },
        {
            "value": [{
                "datasetContactName": primitive("datasetContactName", contact_name),
                "datasetContactEmail": primitive("datasetContactEmail", contact_email),
            }],
            "typeClass": "compound",
            "multiple": true,
            "typeName": "datasetContact"
        },
        {
            "value": [{
                "dsDescriptionValue": primitive("dsDescriptionValue", &metadata.description),
            }],
            "typeClass": "compound",
            "multiple": true,
            "typeName": "dsDescription"
        },
        {
            "value": ["Computer and Information Science"],
            "typeClass": "controlledVocabulary",
            "multiple": true,
            "typeName": "subject"
        },
        {
            "value": keyword_entries,
            "typeClass": "compound",
            "multiple": true,
            "typeName": "keyword"
        },
        {
            "value": date,
            "typeClass": "primitive",
            "multiple": false,
            "typeName": "datasetPublicationDate"
        },
        {
            "value": date,
            "typeClass": "primitive",
            "multiple": false,
            "typeName": "distributionDate"
        },
        {
            "value": date,
            "typeClass": "primitive",
            "multiple": false,
            "typeName": "productionDate"
        }
    ]);

    json!({
        "datasetVersion": {
            "license": license_entry(&metadata.license),
            "metadataBlocks": {
                "citation": { "fields": fields }
            }
        }
    })
}
