//! Subcommand implementations and shared helpers

pub mod convert;
pub mod extract;
pub mod lookup;
pub mod sources;
pub mod validate;

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use shelf_core::config::default_config_path;
use shelf_core::{Result, ShelfConfig};
use tracing::debug;

pub const EXIT_OK: i32 = 0;
/// Generic failure, and any invalid input to validate/convert
pub const EXIT_FAILURE: i32 = 1;
/// Lookup input was not a valid ISBN
pub const EXIT_INVALID_INPUT: i32 = 2;
/// Lookup input was valid but no provider had the book
pub const EXIT_NO_MATCH: i32 = 3;

/// Configuration sources shared by every subcommand
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration file (default: <config dir>/shelf/config.toml)
    #[arg(long, env = "SHELF_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Google Books API key
    #[arg(long, env = "SHELF_GOOGLE_BOOKS_API_KEY", hide_env_values = true, global = true)]
    pub google_books_key: Option<String>,

    /// ISBNdb API key
    #[arg(long, env = "SHELF_ISBNDB_API_KEY", hide_env_values = true, global = true)]
    pub isbndb_key: Option<String>,
}

impl ConfigArgs {
    /// Load the config file, then apply key overrides
    pub fn load(&self) -> Result<ShelfConfig> {
        let mut config = match &self.config {
            Some(path) => {
                debug!(path = %path.display(), "Loading config");
                ShelfConfig::load(path)?
            }
            None => {
                debug!(path = ?default_config_path(), "Loading default config");
                ShelfConfig::load_default()?
            }
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ShelfConfig) {
        if let Some(key) = non_empty(&self.google_books_key) {
            config.sources.google_books.api_key = Some(key);
        }
        if let Some(key) = non_empty(&self.isbndb_key) {
            config.sources.isbndb.api_key = Some(key);
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_overrides() {
        let args = ConfigArgs {
            config: None,
            google_books_key: Some("g-key".to_string()),
            isbndb_key: Some("  ".to_string()),
        };
        let mut config = ShelfConfig::default();
        config.sources.isbndb.api_key = Some("from-file".to_string());

        args.apply_overrides(&mut config);
        assert_eq!(config.sources.google_books.api_key.as_deref(), Some("g-key"));
        assert_eq!(config.sources.isbndb.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let args = ConfigArgs {
            config: Some(PathBuf::from("/nonexistent/shelf/config.toml")),
            google_books_key: None,
            isbndb_key: None,
        };
        assert!(args.load().is_err());
    }
}
