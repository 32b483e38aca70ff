//! CONVERT command - Print both forms of an ISBN.

use clap::Args;
use serde::Serialize;
use shelf_core::{Isbn, Result};

use super::{print_json, EXIT_FAILURE, EXIT_OK};

/// Arguments for the convert command.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// ISBN-10 or ISBN-13
    pub isbn: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Both identifier forms; `isbn10` is absent for 979 ISBN-13s.
#[derive(Debug, Serialize, PartialEq)]
pub struct Conversion {
    pub isbn13: String,
    pub isbn10: Option<String>,
}

impl Conversion {
    pub fn of(isbn: &Isbn) -> Self {
        Self {
            isbn13: isbn.to_isbn13().to_string(),
            isbn10: isbn.to_isbn10().map(|i| i.to_string()),
        }
    }

    pub fn to_lines(&self) -> String {
        format!(
            "ISBN-13: {}\nISBN-10: {}",
            self.isbn13,
            self.isbn10.as_deref().unwrap_or("-")
        )
    }
}

pub fn execute(args: ConvertArgs) -> Result<i32> {
    let isbn = match Isbn::parse(&args.isbn) {
        Ok(isbn) => isbn,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(EXIT_FAILURE);
        }
    };

    let conversion = Conversion::of(&isbn);
    if args.json {
        print_json(&conversion)?;
    } else {
        println!("{}", conversion.to_lines());
    }
    Ok(EXIT_OK)
}
