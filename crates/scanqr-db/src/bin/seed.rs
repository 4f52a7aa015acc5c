//! # Seed Data Generator
//!
//! Populates a development SQLite store with sample scans.
//!
//! ## Usage
//! ```bash
//! # Generate 200 scans (default)
//! cargo run -p scanqr-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p scanqr-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p scanqr-db --bin seed -- --db ./data/scanqr.db
//! ```
//!
//! ## Generated Scans
//! Cycles through every common code type, each with a payload shaped like
//! what a scanner would decode for it:
//! - qr: URLs and free text
//! - ean13 / upc_a: numeric retail codes
//! - code128 / code39: alphanumeric shipping labels
//! - datamatrix / aztec / pdf417: structured payloads

use scanqr_core::MonotonicClock;
use scanqr_db::{Database, DbConfig};
use std::env;

/// Code types and a payload generator for each.
const CODE_TYPES: &[(&str, fn(usize) -> String)] = &[
    ("qr", |i| format!("https://example.com/item/{}", i)),
    ("ean13", |i| format!("590{:010}", i)),
    ("upc_a", |i| format!("0{:011}", i * 7)),
    ("code128", |i| format!("PKG-{:06}-MX", i)),
    ("code39", |i| format!("LOT{:05}", i)),
    ("datamatrix", |i| format!("GTIN:0{:013};SN:{}", i, i * 31)),
    ("aztec", |i| format!("TICKET|{}|SEAT-{}", i, i % 60)),
    ("pdf417", |i| format!("ID*{:08}*DOE*JANE", i)),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./scanqr_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("ScanQR Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of scans to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./scanqr_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 ScanQR Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Scans:    {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.codes().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} scans", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating scans...");

    let clock = MonotonicClock::default();
    let start = std::time::Instant::now();
    let mut generated = 0;

    for n in 0..count {
        let (code_type, payload) = CODE_TYPES[n % CODE_TYPES.len()];
        let data = payload(n);

        if let Err(e) = db.codes().insert(&data, code_type, clock.now()).await {
            eprintln!("Failed to insert {}: {}", data, e);
            continue;
        }

        generated += 1;
        if generated % 100 == 0 {
            println!("  Generated {} scans...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} scans in {:?}", generated, elapsed);
    println!(
        "  Rate: {:.0} scans/second",
        generated as f64 / elapsed.as_secs_f64()
    );

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
