//! Declarative field schema for release metadata
//!
//! Defines the recognized fields of a release descriptor: their canonical
//! names, command-line flags, requiredness, and expected value shapes.
//! Pure data, no side effects.

/// Expected shape of a field's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Free text, non-empty after trimming
    Text,
    /// Parseable URI (license, DOI)
    Uri,
    /// Calendar date, ISO `YYYY-MM-DD` (also accepts `MM/DD/YYYY` input)
    Date,
    /// Email address
    Email,
    /// Ordered list of non-empty strings, repeatable on the command line
    TextList,
    /// One value from a fixed set
    Enumerated(&'static [&'static str]),
    /// Ordered list of name/value pairs, names unique
    PropertyList,
}

/// One recognized field of the release schema
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Canonical field name (matches the draft JSON key)
    pub name: &'static str,
    /// Command-line flag the packaging tool expects
    pub flag: &'static str,
    pub required: bool,
    pub shape: FieldShape,
}

impl FieldSpec {
    pub fn is_repeatable(&self) -> bool {
        matches!(self.shape, FieldShape::TextList)
    }
}

/// Allowed confidentiality levels (HL7 confidentiality codes)
pub const CONFIDENTIALITY_LEVELS: &[&str] = &[
    "HL7 Unrestricted",
    "HL7 Low",
    "HL7 Moderate",
    "HL7 Normal",
    "HL7 Restricted",
    "HL7 Very Restricted",
];

/// The release schema, in the order the packaging tool expects its flags.
///
/// Invocation argument order follows this table exactly.
pub const RELEASE_SCHEMA: &[FieldSpec] = &[
    FieldSpec {
        name: "guid",
        flag: "--guid",
        required: true,
        shape: FieldShape::Text,
    },
    FieldSpec {
        name: "name",
        flag: "--name",
        required: true,
        shape: FieldShape::Text,
    },
    FieldSpec {
        name: "description",
        flag: "--description",
        required: true,
        shape: FieldShape::Text,
    },
    FieldSpec {
        name: "keywords",
        flag: "--keywords",
        required: true,
        shape: FieldShape::TextList,
    },
    FieldSpec {
        name: "license",
        flag: "--license",
        required: true,
        shape: FieldShape::Uri,
    },
    FieldSpec {
        name: "version",
        flag: "--version",
        required: true,
        shape: FieldShape::Text,
    },
    FieldSpec {
        name: "date_published",
        flag: "--date-published",
        required: true,
        shape: FieldShape::Date,
    },
    FieldSpec {
        name: "authors",
        flag: "--author",
        required: true,
        shape: FieldShape::TextList,
    },
    FieldSpec {
        name: "principal_investigator",
        flag: "--principal-investigator",
        required: false,
        shape: FieldShape::Text,
    },
    FieldSpec {
        name: "contact_email",
        flag: "--contact-email",
        required: false,
        shape: FieldShape::Email,
    },
    FieldSpec {
        name: "publisher",
        flag: "--publisher",
        required: false,
        shape: FieldShape::Text,
    },
    FieldSpec {
        name: "funders",
        flag: "--funder",
        required: false,
        shape: FieldShape::TextList,
    },
    FieldSpec {
        name: "doi",
        flag: "--doi",
        required: false,
        shape: FieldShape::Uri,
    },
    FieldSpec {
        name: "citation",
        flag: "--citation",
        required: false,
        shape: FieldShape::Text,
    },
    FieldSpec {
        name: "associated_publications",
        flag: "--associated-publication",
        required: false,
        shape: FieldShape::TextList,
    },
    FieldSpec {
        name: "confidentiality_level",
        flag: "--confidentiality-level",
        required: false,
        shape: FieldShape::Enumerated(CONFIDENTIALITY_LEVELS),
    },
    FieldSpec {
        name: "additional_properties",
        flag: "--additional-properties",
        required: false,
        shape: FieldShape::PropertyList,
    },
];

/// Look up a field spec by canonical name
pub fn field_by_name(name: &str) -> Option<&'static FieldSpec> {
    RELEASE_SCHEMA.iter().find(|f| f.name == name)
}

/// Look up a field spec by command-line flag
pub fn field_by_flag(flag: &str) -> Option<&'static FieldSpec> {
    RELEASE_SCHEMA.iter().find(|f| f.flag == flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        let name = field_by_name("name").unwrap();
        assert!(name.required);
        assert_eq!(name.flag, "--name");

        let authors = field_by_flag("--author").unwrap();
        assert_eq!(authors.name, "authors");
        assert!(authors.is_repeatable());

        assert!(field_by_name("nonexistent").is_none());
    }

    #[test]
    fn test_schema_names_and_flags_unique() {
        for (i, a) in RELEASE_SCHEMA.iter().enumerate() {
            for b in &RELEASE_SCHEMA[i + 1..] {
                assert_ne!(a.name, b.name);
                assert_ne!(a.flag, b.flag);
            }
        }
    }

    #[test]
    fn test_confidentiality_levels_fixed() {
        assert!(CONFIDENTIALITY_LEVELS.contains(&"HL7 Unrestricted"));
        assert!(CONFIDENTIALITY_LEVELS.contains(&"HL7 Very Restricted"));
        assert_eq!(CONFIDENTIALITY_LEVELS.len(), 6);
    }
}
