//! CSV Reader Examples
//!
//! Demonstrates:
//! - Reading rows with inferred headers
//! - Skipping preamble lines and using a custom dialect
//! - Reading header-keyed maps
//! - Stepping past malformed rows
//!
//! Run with `RUST_LOG=streamcsv=debug` to see the reader's log events.

use std::error::Error;
use streamcsv::{CsvError, CsvReader, KeyedFields, ReaderConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let dir = std::env::temp_dir().join("streamcsv_demo");
    std::fs::create_dir_all(&dir)?;

    println!("=== CSV Reader Examples ===\n");

    // Example 1: rows with headers from the first line
    println!("1. Reading rows...");
    {
        let path = dir.join("people.csv");
        std::fs::write(&path, "Name,Age,City\nAlice,30,NYC\n\"Bob, Jr.\",25,SF\n")?;

        let mut reader = CsvReader::open(&path)?;
        for row in reader.records() {
            println!("   {:?}", row?);
        }
        println!("   Headers: {:?}", reader.headers());
        println!("   Lines consumed: {}", reader.line_number());
    }

    // Example 2: preamble + semicolon dialect + keyed maps
    println!("\n2. Reading keyed records...");
    {
        let path = dir.join("report.csv");
        std::fs::write(
            &path,
            "Exported by billing\nid;amount;note\n1;10.50;'paid'\n2;3.00;'it''s late'\n",
        )?;

        let config = ReaderConfig::new()
            .delimiter(';')
            .quote_char('\'')
            .escape_char('\'')
            .skip_rows(1);
        let mut reader = CsvReader::open_with(&path, config)?.with_materializer(KeyedFields)?;

        while reader.has_next()? {
            let record = reader.next_record()?;
            println!("   line {:?}: {:?}", reader.record_line(), record);
        }
    }

    // Example 3: skipping malformed rows by hand
    println!("\n3. Handling malformed rows...");
    {
        let path = dir.join("ragged.csv");
        std::fs::write(&path, "a,b\n1,2\n3,4,5\n6,7\n")?;

        let mut reader = CsvReader::open(&path)?;
        while reader.has_next()? {
            match reader.next_record() {
                Ok(row) => println!("   {:?}", row),
                Err(CsvError::MalformedRow { line, .. }) => {
                    let skipped = reader.skip_row()?;
                    println!("   skipped line {}: {:?}", line, skipped);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    std::fs::remove_dir_all(&dir).ok();
    Ok(())
}
