//! CLI tool for flipview - resolves a container configuration and prints the
//! viewer plan as JSON
//!
//! Usage:
//!   flipview_plan <config.json>                          # 800px container, 10 pages
//!   flipview_plan <config.json> --width 600 --pages 24
//!
//! The plan shows the effective layout, widget dimensions and options, and
//! which document page every display slot shows.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use flipview::layout::{map_slot, slot_count};
use flipview::logger::ConsoleLogger;
use flipview::viewer::ViewerSession;
use flipview::ViewerConfig;
use serde_json::json;

const USAGE: &str = "Usage: flipview_plan <config.json> [--width PX] [--pages N]";

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("{USAGE}");
        std::process::exit(1);
    }

    ConsoleLogger::init(log::LevelFilter::Warn);

    let input_path = &args[1];
    let mut width = 800.0;
    let mut pages = 10;

    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        let value = rest.next();
        match (flag.as_str(), value) {
            ("--width", Some(v)) => width = parse_arg(flag, v),
            ("--pages", Some(v)) => pages = parse_arg(flag, v),
            _ => {
                eprintln!("{USAGE}");
                std::process::exit(1);
            }
        }
    }

    // Read and validate the payload
    let raw = match fs::read_to_string(input_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };
    let config = match ViewerConfig::from_json(&raw) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let book_layout = config.book_layout;
    let session = ViewerSession::new("cli", config.into(), width, false);
    let slots: Vec<_> = (0..slot_count(book_layout, pages))
        .map(|slot| json!({ "slot": slot, "content": map_slot(slot, book_layout, pages) }))
        .collect();

    let plan = json!({
        "pdf": session.config().pdf,
        "containerWidth": width,
        "pages": pages,
        "layout": session.layout(),
        "bookLayout": book_layout,
        "dimensions": session.dimensions(),
        "widgetOptions": session.widget_options(),
        "slots": slots,
    });

    let json = match serde_json::to_string_pretty(&plan) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };
    io::stdout().write_all(json.as_bytes()).unwrap();
    println!();
}

fn parse_arg<T: std::str::FromStr>(flag: &str, value: &str) -> T {
    match value.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Invalid value for {flag}: {value}");
            std::process::exit(1);
        }
    }
}
