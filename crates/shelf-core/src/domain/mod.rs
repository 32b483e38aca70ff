//! Domain types for book metadata
//!
//! Provider output, the reconciled canonical record and provenance tags.

pub mod manual;
pub mod provider;
pub mod record;

pub use manual::*;
pub use provider::*;
pub use record::*;
