//! EXTRACT command - Find ISBNs in free text.

use std::io::Read;

use clap::Args;
use shelf_core::Result;
use shelf_identifiers::extract_isbns;

use super::{print_json, EXIT_OK};

/// Arguments for the extract command.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Text to scan; read from stdin when omitted
    pub text: Vec<String>,

    /// Print the ISBNs as a JSON array
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ExtractArgs) -> Result<i32> {
    let text = if args.text.is_empty() {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        args.text.join(" ")
    };

    let isbns = extract_isbns(&text);
    if args.json {
        print_json(&isbns)?;
    } else {
        for isbn in &isbns {
            println!("{}", isbn);
        }
    }
    Ok(EXIT_OK)
}
