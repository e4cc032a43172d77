//! CSV Reader Example
//!
//! Reads a CSV file with a header row and prints every field together with
//! its numeric interpretation.
//!
//! ```text
//! cargo run --example csv_read -- data/example.csv ';'
//! RUST_LOG=lenient_csv=debug cargo run --example csv_read -- data/example.csv
//! ```

use lenient_csv::{CsvReader, DELIM_COMMA};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "data/example.csv".to_string());
    let delimiter = args
        .next()
        .and_then(|d| d.chars().next())
        .unwrap_or(DELIM_COMMA);

    let mut reader = CsvReader::open(&path).delimiter(delimiter).has_header(true);

    if let Some(header) = reader.headers()? {
        println!("Header ({} columns): {}", header.len(), header);
    }

    while let Some(row) = reader.read_row()? {
        println!("==NEW LINE==");
        for field in row.iter() {
            // Strict parse: anything that is not a whole number, including text
            // with a numeric prefix such as "1.62kg", reads as zero
            let value = field.trim().parse::<f64>().unwrap_or(0.0);
            println!("FIELD: {:<20} {}", field, value);
        }
        println!();
    }

    println!(
        "Read {} rows from {} physical lines",
        reader.row_count(),
        reader.line_number()
    );
    reader.close();

    Ok(())
}
