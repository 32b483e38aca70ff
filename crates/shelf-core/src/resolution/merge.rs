//! Reconciling provider records into one canonical record

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::{
    CanonicalBookRecord, FieldSource, ProviderId, ProviderRecord, Sourced,
};

/// How provider results are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// First ranked provider with a title supplies the whole record
    /// (falling back to the first provider with any data)
    #[default]
    PriorityFallback,
    /// Each field comes from the first ranked provider that has it
    FieldMerge,
}

impl MergePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            MergePolicy::PriorityFallback => "priority_fallback",
            MergePolicy::FieldMerge => "field_merge",
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "priority_fallback" | "priority" => Ok(MergePolicy::PriorityFallback),
            "field_merge" | "fields" => Ok(MergePolicy::FieldMerge),
            _ => Err(format!("Unknown merge policy: {}", s)),
        }
    }
}

/// What one provider returned for one lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderOutcome {
    pub provider: ProviderId,
    /// `None` for no data, failure or timeout
    pub record: Option<ProviderRecord>,
}

impl ProviderOutcome {
    pub fn new(provider: ProviderId, record: Option<ProviderRecord>) -> Self {
        Self { provider, record }
    }
}

/// Merge outcomes given in rank order
pub fn merge(policy: MergePolicy, ranked: &[ProviderOutcome]) -> CanonicalBookRecord {
    let ranked = normalized(ranked);
    match policy {
        MergePolicy::PriorityFallback => merge_priority(&ranked),
        MergePolicy::FieldMerge => merge_fields(&ranked),
    }
}

fn normalized(ranked: &[ProviderOutcome]) -> Vec<(ProviderId, ProviderRecord)> {
    ranked
        .iter()
        .filter_map(|o| {
            o.record
                .clone()
                .map(|record| (o.provider, record.normalized()))
        })
        .collect()
}

/// Without any titled record, the first non-empty one is used
fn merge_priority(ranked: &[(ProviderId, ProviderRecord)]) -> CanonicalBookRecord {
    ranked
        .iter()
        .find(|(_, record)| record.has_title())
        .or_else(|| ranked.iter().find(|(_, record)| !record.is_empty()))
        .map(|(provider, record)| CanonicalBookRecord::from_provider(*provider, record.clone()))
        .unwrap_or_default()
}

fn merge_fields(ranked: &[(ProviderId, ProviderRecord)]) -> CanonicalBookRecord {
    fn pick<T: Clone>(
        ranked: &[(ProviderId, ProviderRecord)],
        get: impl Fn(&ProviderRecord) -> Option<&T>,
    ) -> Option<Sourced<T>> {
        ranked.iter().find_map(|(provider, record)| {
            get(record).map(|value| Sourced::new(value.clone(), FieldSource::Provider(*provider)))
        })
    }

    CanonicalBookRecord {
        title: pick(ranked, |r| r.title.as_ref()),
        author: pick(ranked, |r| r.author.as_ref()),
        description: pick(ranked, |r| r.description.as_ref()),
        cover_url: pick(ranked, |r| r.cover_url.as_ref()),
        isbn13: pick(ranked, |r| r.isbn13.as_ref()),
        isbn10: pick(ranked, |r| r.isbn10.as_ref()),
    }
}
