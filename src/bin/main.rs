//! Release Metadata CLI
//!
//! Command-line tool for validating release metadata drafts and building
//! the downstream packaging, DOI, and repository-upload requests.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use rocrate_release::{
    build, datacite_payload, dataverse_dataset, load_draft, load_draft_from_crate, mint_guid,
    validate, ReleaseDraft, ReleaseError, ReleaseMetadata,
};

#[derive(Parser)]
#[command(name = "rocrate-release")]
#[command(about = "Validate release metadata and build RO-Crate packaging invocations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a release draft against the schema
    Validate(SourceArgs),
    /// Build the packaging tool invocation from a valid draft
    Build(BuildArgs),
    /// Build the DataCite DOI creation document
    Datacite(DataciteArgs),
    /// Build the Dataverse dataset creation document
    Dataverse(OutputArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// Path to a draft JSON file, or an RO-Crate directory/metadata file
    /// with --from-crate
    source: PathBuf,

    /// Treat the source as an existing RO-Crate and prefill from its root
    /// dataset
    #[arg(long)]
    from_crate: bool,

    /// Mint an ark identifier if the draft has none
    #[arg(long)]
    mint_guid: bool,
}

#[derive(Args)]
struct BuildArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Positional crate directory for the packaging tool
    #[arg(long)]
    crate_path: Option<String>,

    /// Emit argv as a JSON array instead of a shell line
    #[arg(long)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct DataciteArgs {
    #[command(flatten)]
    output: OutputArgs,

    /// DataCite DOI prefix (e.g. 10.18130)
    #[arg(long)]
    prefix: String,
}

#[derive(Args)]
struct OutputArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Load a draft from either source form, minting an identifier if requested
fn load_source(args: &SourceArgs) -> Result<ReleaseDraft, ReleaseError> {
    let mut draft = if args.from_crate {
        load_draft_from_crate(&args.source)?
    } else {
        load_draft(&args.source)?
    };

    if args.mint_guid && draft.guid.is_none() {
        let guid = mint_guid(draft.name.as_deref().unwrap_or(""));
        eprintln!("Minted identifier: {}", guid);
        draft.guid = Some(guid);
    }

    Ok(draft)
}

/// Validate a draft, printing every violation on failure
fn validate_source(args: &SourceArgs) -> Result<ReleaseMetadata, ReleaseError> {
    let draft = load_source(args)?;
    match validate(&draft).into_result() {
        Ok(metadata) => Ok(metadata),
        Err(violations) => {
            for violation in &violations {
                eprintln!("  - {}", violation);
            }
            Err(ReleaseError::SchemaMismatch { violations })
        }
    }
}

/// Write output to file or stdout
fn write_output(content: &str, output: Option<&PathBuf>) -> Result<(), ReleaseError> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("Wrote output to {}", path.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

fn to_json_string(value: &serde_json::Value, pretty: bool) -> Result<String, ReleaseError> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

fn run_validate(args: SourceArgs) -> Result<(), ReleaseError> {
    let metadata = validate_source(&args)?;
    eprintln!(
        "Valid release: {} ({}), {} author(s), {} keyword(s)",
        metadata.name,
        metadata.guid,
        metadata.authors.len(),
        metadata.keywords.len()
    );
    Ok(())
}

fn run_build(args: BuildArgs) -> Result<(), ReleaseError> {
    let metadata = validate_source(&args.source)?;

    let mut invocation = build(&metadata)?;
    if let Some(path) = args.crate_path {
        invocation = invocation.with_crate_path(path);
    }

    eprintln!(
        "Built invocation with {} argument(s) for {}",
        invocation.args.len(),
        metadata.guid
    );

    let content = if args.json {
        serde_json::to_string(&invocation.to_args())?
    } else {
        invocation.to_command_line()
    };
    write_output(&content, args.output.as_ref())
}

fn run_datacite(args: DataciteArgs) -> Result<(), ReleaseError> {
    let metadata = validate_source(&args.output.source)?;
    let payload = datacite_payload(&metadata, &args.prefix);
    let content = to_json_string(&payload, args.output.pretty)?;
    write_output(&content, args.output.output.as_ref())
}

fn run_dataverse(args: OutputArgs) -> Result<(), ReleaseError> {
    let metadata = validate_source(&args.source)?;
    let doc = dataverse_dataset(&metadata);
    let content = to_json_string(&doc, args.pretty)?;
    write_output(&content, args.output.as_ref())
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::Build(args) => run_build(args),
        Commands::Datacite(args) => run_datacite(args),
        Commands::Dataverse(args) => run_dataverse(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
