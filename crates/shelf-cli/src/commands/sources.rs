//! SOURCES command - Show configured providers.

use clap::Args;
use serde::Serialize;
use shelf_core::sources::source_metadata;
use shelf_core::{MergePolicy, ProviderId, Result, ShelfConfig};

use super::{print_json, ConfigArgs, EXIT_OK};

/// Arguments for the sources command.
#[derive(Args, Debug)]
pub struct SourcesArgs {
    /// Print providers as JSON
    #[arg(long)]
    pub json: bool,
}

/// One provider as configured.
#[derive(Debug, Serialize, PartialEq)]
pub struct SourceStatus {
    pub id: ProviderId,
    pub name: &'static str,
    pub description: &'static str,
    pub enabled: bool,
    /// Position in the priority list, from 1; `None` when not listed
    pub rank: Option<usize>,
    pub has_api_key: bool,
    pub requires_api_key: bool,
}

/// All providers, listed ones first in priority order.
pub fn source_statuses(config: &ShelfConfig) -> Vec<SourceStatus> {
    let priority = &config.lookup.priority;
    let mut ids: Vec<ProviderId> = priority.clone();
    ids.extend(ProviderId::all().iter().filter(|id| !priority.contains(*id)));

    ids.into_iter()
        .map(|id| {
            let metadata = source_metadata(id);
            let has_api_key = match id {
                ProviderId::GoogleBooks => config.sources.google_books.api_key.is_some(),
                ProviderId::OpenLibrary => false,
                ProviderId::Isbndb => config.sources.isbndb.api_key.is_some(),
            };
            SourceStatus {
                id,
                name: id.display_name(),
                description: metadata.description,
                enabled: config.sources.is_enabled(id),
                rank: priority.iter().position(|p| *p == id).map(|i| i + 1),
                has_api_key,
                requires_api_key: metadata.requires_api_key,
            }
        })
        .collect()
}

/// Lookup settings together with the provider list, as printed by `--json`.
#[derive(Debug, Serialize, PartialEq)]
pub struct SourcesReport {
    pub policy: MergePolicy,
    pub timeout_secs: u64,
    pub providers: Vec<SourceStatus>,
}

impl SourcesReport {
    pub fn new(config: &ShelfConfig) -> Self {
        Self {
            policy: config.lookup.policy,
            timeout_secs: config.lookup.timeout_secs,
            providers: source_statuses(config),
        }
    }
}

pub fn execute(config_args: &ConfigArgs, args: SourcesArgs) -> Result<i32> {
    let config = config_args.load()?;
    let report = SourcesReport::new(&config);

    if args.json {
        print_json(&report)?;
        return Ok(EXIT_OK);
    }

    println!("Merge policy: {}", report.policy);
    println!("Timeout: {}s", report.timeout_secs);
    for status in &report.providers {
        let rank = status
            .rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let state = if !status.enabled || status.rank.is_none() {
            "off"
        } else if status.requires_api_key && !status.has_api_key {
            "no key"
        } else {
            "on"
        };
        println!("{:>2}. {:<13} [{}] {}", rank, status.name, state, status.description);
    }
    Ok(EXIT_OK)
}
