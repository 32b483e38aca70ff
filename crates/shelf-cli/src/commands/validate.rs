//! VALIDATE command - Check ISBN checksums.

use clap::Args;
use serde::Serialize;
use shelf_core::{Isbn, Result};

use super::{print_json, EXIT_FAILURE, EXIT_OK};

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// ISBNs to check; hyphens and spaces are ignored
    #[arg(required = true)]
    pub isbns: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Outcome for one input.
#[derive(Debug, Serialize, PartialEq)]
pub struct ValidationReport {
    pub input: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationReport {
    pub fn check(raw: &str) -> Self {
        match Isbn::parse(raw) {
            Ok(isbn) => Self {
                input: raw.to_string(),
                valid: true,
                isbn: Some(isbn.to_string()),
                kind: Some(isbn.kind().display_name().to_string()),
                reason: None,
                message: None,
            },
            Err(e) => Self {
                input: raw.to_string(),
                valid: false,
                isbn: None,
                kind: None,
                reason: Some(e.reason().as_str().to_string()),
                message: Some(e.reason().message().to_string()),
            },
        }
    }

    pub fn to_line(&self) -> String {
        match (&self.isbn, &self.kind) {
            (Some(isbn), Some(kind)) => format!("{}: valid {} {}", self.input, kind, isbn),
            _ => format!(
                "{}: invalid ({}) {}",
                self.input,
                self.reason.as_deref().unwrap_or("unknown"),
                self.message.as_deref().unwrap_or_default()
            ),
        }
    }
}

pub fn execute(args: ValidateArgs) -> Result<i32> {
    let reports: Vec<ValidationReport> =
        args.isbns.iter().map(|raw| ValidationReport::check(raw)).collect();

    if args.json {
        print_json(&reports)?;
    } else {
        for report in &reports {
            println!("{}", report.to_line());
        }
    }

    Ok(if reports.iter().all(|r| r.valid) {
        EXIT_OK
    } else {
        EXIT_FAILURE
    })
}
