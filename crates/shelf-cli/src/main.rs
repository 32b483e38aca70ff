//! Command-line interface for the shelf book collection tracker.
//!
//! Commands:
//! - validate: Check ISBN-10/13 checksums
//! - convert: Print both ISBN forms
//! - extract: Find ISBNs in free text
//! - lookup: Resolve book metadata from the configured providers
//! - sources: Show configured providers in priority order
//!
//! Configuration via environment:
//! - SHELF_CONFIG: Path to a TOML config file
//! - SHELF_GOOGLE_BOOKS_API_KEY: Google Books API key
//! - SHELF_ISBNDB_API_KEY: ISBNdb API key
//! - RUST_LOG: Log filter (default: warn)

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    convert::ConvertArgs, extract::ExtractArgs, lookup::LookupArgs, sources::SourcesArgs,
    validate::ValidateArgs, ConfigArgs, EXIT_FAILURE,
};

/// Validate ISBNs and look up book metadata
#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log lookup progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check one or more ISBNs
    Validate(ValidateArgs),

    /// Print the ISBN-13 and ISBN-10 forms of an ISBN
    Convert(ConvertArgs),

    /// Find valid ISBNs in text
    Extract(ExtractArgs),

    /// Resolve metadata for an ISBN
    Lookup(LookupArgs),

    /// List providers in priority order
    Sources(SourcesArgs),
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,shelf_core=debug,shelf_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Convert(args) => commands::convert::execute(args),
        Commands::Extract(args) => commands::extract::execute(args),
        Commands::Lookup(args) => commands::lookup::execute(&cli.config, args).await,
        Commands::Sources(args) => commands::sources::execute(&cli.config, args),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "shelf",
            "lookup",
            "9780441013593",
            "--policy",
            "field-merge",
            "-v",
            "--config",
            "/tmp/shelf.toml",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config.config, Some(PathBuf::from("/tmp/shelf.toml")));
        assert!(matches!(cli.command, Commands::Lookup(_)));
    }

    #[test]
    fn test_validate_requires_input() {
        assert!(Cli::try_parse_from(["shelf", "validate"]).is_err());
    }
}
