//! CLI tool for storyview - outlines a IIIF manifest as JSON
//!
//! Usage:
//!   storyview_cli <manifest.json>              # Output JSON to stdout
//!   storyview_cli <manifest.json> -o out.json  # Output JSON to file
//!   storyview_cli <manifest.json> --no-credits # Outline without a credits slide

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use storyview::outline::Outline;
use storyview::parser::parse;
use storyview::SlideOptions;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: storyview_cli <manifest.json> [-o output.json] [--no-credits]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = args
        .iter()
        .position(|a| a == "-o")
        .and_then(|i| args.get(i + 1));
    let options = SlideOptions {
        show_credit_slide: !args.iter().any(|a| a == "--no-credits"),
        ..SlideOptions::default()
    };

    // Read input file
    let text = match fs::read_to_string(input_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    // Parse manifest
    let parsed = match parse(&text) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error parsing manifest [{}]: {}", e.status_code(), e);
            std::process::exit(1);
        }
    };
    for status in &parsed.statuses {
        eprintln!("warning [{}]: {}", status, status.message());
    }

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&Outline::new(parsed, options)) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
