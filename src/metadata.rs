//! Release metadata data model
//!
//! `ReleaseDraft` is the raw, partially-filled field mapping as assembled by
//! a human or an upstream process. `ReleaseMetadata` is the normalized form
//! produced by validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// One extensible name/value property (e.g. "Completeness", "Human Subject")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalProperty {
    pub name: String,
    pub value: String,
}

/// Raw release description before validation
///
/// Every field is optional here; requiredness is enforced by the validator,
/// which reports all missing fields in one pass. Lists default to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseDraft {
    /// Globally unique identifier (e.g. "ark:59852/rocrate-...")
    pub guid: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    pub license: Option<String>,
    pub version: Option<String>,
    pub date_published: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    pub principal_investigator: Option<String>,
    pub contact_email: Option<String>,
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub funders: Vec<String>,
    pub doi: Option<String>,
    pub citation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub associated_publications: Vec<String>,
    pub confidentiality_level: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_properties: Vec<AdditionalProperty>,
}

/// Validated, normalized release metadata
///
/// Produced only by `validate`. String fields are trimmed, keywords are
/// deduplicated (first occurrence wins), and the publication date is a
/// parsed calendar date. Immutable once a DOI has been minted against it;
/// later changes require a new version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseMetadata {
    pub guid: String,
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub license: String,
    pub version: String,
    pub date_published: NaiveDate,
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_investigator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub funders: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub associated_publications: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidentiality_level: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_properties: Vec<AdditionalProperty>,
}

impl ReleaseMetadata {
    /// View the metadata as a draft again (used by the builder to re-check
    /// the schema contract before emitting an invocation)
    pub fn to_draft(&self) -> ReleaseDraft {
        ReleaseDraft {
            guid: Some(self.guid.clone()),
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            keywords: self.keywords.clone(),
            license: Some(self.license.clone()),
            version: Some(self.version.clone()),
            date_published: Some(self.date_published.format("%Y-%m-%d").to_string()),
            authors: self.authors.clone(),
            principal_investigator: self.principal_investigator.clone(),
            contact_email: self.contact_email.clone(),
            publisher: self.publisher.clone(),
            funders: self.funders.clone(),
            doi: self.doi.clone(),
            citation: self.citation.clone(),
            associated_publications: self.associated_publications.clone(),
            confidentiality_level: self.confidentiality_level.clone(),
            additional_properties: self.additional_properties.clone(),
        }
    }
}

/// ARK namespace used for minted identifiers
pub const ARK_NAMESPACE: &str = "ark:59852";

/// Mint a release identifier from a human-readable name
///
/// Produces `ark:59852/rocrate-<slug>-<ULID>`. The ULID component makes each
/// minted identifier unique; the slug keeps it recognizable.
pub fn mint_guid(name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        format!("{}/rocrate-{}", ARK_NAMESPACE, Ulid::new())
    } else {
        format!("{}/rocrate-{}-{}", ARK_NAMESPACE, slug, Ulid::new())
    }
}

/// Lowercase, alphanumerics kept, runs of anything else collapsed to '-'
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
