//! Example: Audit a CSV/TSV file, clean it, and print the results.
//!
//! Usage:
//!   cargo run --example audit_and_clean -- <file_path>

use std::env;
use std::path::Path;

use scour::{Auditor, Cleaner, Columns, Keep, MissingStrategy, Parser, StringNormalization};

fn main() -> scour::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example audit_and_clean -- <file_path>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let table = Parser::new().parse_file(path)?;

    let auditor = Auditor::new(&table)?;
    println!("{}", auditor.render());

    let mut cleaner = Cleaner::new(&table)?;
    cleaner
        .drop_duplicates(Keep::First)?
        .handle_missing(MissingStrategy::Median, Columns::Auto)?
        .normalize_strings(StringNormalization::default(), Columns::Auto)?
        .strip_accents(Columns::Auto)?
        .remove_outliers_iqr(Columns::Auto, scour::DEFAULT_IQR_MULTIPLIER)?;

    println!("{}", cleaner.summary_text());

    let cleaned = cleaner.into_table();
    let after = Auditor::new(&cleaned)?;
    println!("\nAfter cleaning:\n{}", after.render());

    Ok(())
}
