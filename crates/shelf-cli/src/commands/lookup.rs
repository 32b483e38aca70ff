//! LOOKUP command - Resolve book metadata for an ISBN.

use clap::Args;
use serde::Serialize;
use shelf_core::{BookField, LookupError, MergePolicy, Resolution, Resolver, Result};
use tracing::debug;

use super::{print_json, ConfigArgs, EXIT_INVALID_INPUT, EXIT_NO_MATCH, EXIT_OK};

/// Arguments for the lookup command.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// ISBN-10 or ISBN-13; hyphens and spaces are ignored
    pub isbn: String,

    /// Merge policy: priority-fallback or field-merge (default from config)
    #[arg(long)]
    pub policy: Option<MergePolicy>,

    /// Print the resolution as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON shape for a failed lookup.
#[derive(Debug, Serialize, PartialEq)]
pub struct LookupFailure {
    pub input: String,
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl LookupFailure {
    pub fn new(input: &str, err: &LookupError) -> Self {
        match err {
            LookupError::InvalidIdentifier(e) => Self {
                input: input.to_string(),
                error: "invalid_identifier",
                message: e.to_string(),
                reason: Some(e.reason().as_str()),
            },
            LookupError::NoMatchFound { .. } => Self {
                input: input.to_string(),
                error: "no_match",
                message: err.to_string(),
                reason: None,
            },
        }
    }
}

/// Field-per-line rendering with provenance.
pub fn render_resolution(resolution: &Resolution) -> String {
    let record = &resolution.record;
    let mut lines = Vec::new();

    for field in BookField::all() {
        let (Some(value), Some(source)) = (record.display_value(*field), record.source_of(*field))
        else {
            continue;
        };
        lines.push(format!(
            "{:<12} {}  [{}]",
            format!("{}:", field_label(*field)),
            value,
            source.label()
        ));
    }

    let contributors: Vec<&str> = resolution
        .contributors
        .iter()
        .map(|id| id.display_name())
        .collect();
    lines.push(format!(
        "{:<12} {} ({})",
        "Sources:",
        contributors.join(", "),
        resolution.policy
    ));

    lines.join("\n")
}

fn field_label(field: BookField) -> &'static str {
    match field {
        BookField::Title => "Title",
        BookField::Author => "Author",
        BookField::Description => "Description",
        BookField::CoverUrl => "Cover",
        BookField::Isbn13 => "ISBN-13",
        BookField::Isbn10 => "ISBN-10",
    }
}

pub async fn execute(config_args: &ConfigArgs, args: LookupArgs) -> Result<i32> {
    let config = config_args.load()?;
    let mut resolver = Resolver::from_config(&config)?;
    if let Some(policy) = args.policy {
        resolver = resolver.with_policy(policy);
    }
    debug!(providers = ?resolver.providers(), policy = %resolver.policy(), "Resolver ready");

    match resolver.resolve(&args.isbn).await {
        Ok(resolution) => {
            if args.json {
                print_json(&resolution)?;
            } else {
                println!("{}", render_resolution(&resolution));
            }
            Ok(EXIT_OK)
        }
        Err(err) => {
            if args.json {
                print_json(&LookupFailure::new(&args.isbn, &err))?;
            } else if err.is_invalid_input() {
                eprintln!("{}", err);
            } else {
                eprintln!("{}. Enter the book manually instead.", err);
            }
            Ok(if err.is_invalid_input() {
                EXIT_INVALID_INPUT
            } else {
                EXIT_NO_MATCH
            })
        }
    }
}
