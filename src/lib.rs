//! Release Metadata Packaging Library
//!
//! This library models the contract between a dataset release description
//! and the external tooling that packages and publishes it: a declarative
//! field schema, a validator that reports every violation in one pass, and
//! deterministic builders for the downstream requests.
//!
//! # Overview
//!
//! Preparing a dataset release means assembling a metadata descriptor
//! (identifier, name, authors, license, DOI, dates, extensible properties)
//! and handing it to external collaborators. This library covers the
//! in-process part of that pipeline:
//!
//! 1. Assembling a [`ReleaseDraft`] (from JSON, or prefilled from an
//!    existing RO-Crate's root dataset)
//! 2. Validating it against the release schema, collecting all violations
//! 3. Building the packaging tool invocation with schema-ordered flags
//! 4. Building the DataCite DOI and Dataverse dataset documents
//!
//! Validation and building are pure, synchronous, single-pass transforms;
//! each call is independent and idempotent.
//!
//! # Usage
//!
//! ```ignore
//! use rocrate_release::{build, validate, ReleaseDraft};
//!
//! let draft: ReleaseDraft = serde_json::from_str(&content)?;
//! let metadata = validate(&draft).into_result()?;
//!
//! let invocation = build(&metadata)?.with_crate_path("./my-crate");
//! println!("{}", invocation.to_command_line());
//! ```

pub mod datacite;
pub mod dataverse;
pub mod error;
pub mod invoke;
pub mod loader;
pub mod metadata;
pub mod schema;
pub mod validate;

// Re-export main types for convenience
pub use crate::datacite::datacite_payload;
pub use crate::dataverse::dataverse_dataset;
pub use crate::error::ReleaseError;
pub use crate::invoke::{build, parse_invocation, Invocation, InvocationArg};
pub use crate::loader::{draft_from_graph, load_draft, load_draft_from_crate};
pub use crate::metadata::{mint_guid, AdditionalProperty, ReleaseDraft, ReleaseMetadata};
pub use crate::schema::{field_by_flag, field_by_name, FieldShape, FieldSpec, RELEASE_SCHEMA};
pub use crate::validate::{validate, ValidationOutcome, Violation, ViolationKind};
