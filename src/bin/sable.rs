//! Command-line interface for the sable context engine.
//!
//! This binary is a debugging and inspection tool: it runs the region
//! scanners over a file and prints what the engine sees.
//!
//! Usage:
//!   sable scan `<path>` [--fast]             - Print comment/string/script ranges as JSON
//!   sable sanitize `<path>`                  - Print the comment-blanked text
//!   sable context `<path>` `<line:column>`     - Print cursor-position facts as JSON

use clap::{Arg, ArgAction, Command};
use serde::Serialize;

use sable::context::{document_position_state_context, document_state_context};
use sable::document::{Position, Range, TextDocument};

fn main() {
    let matches = Command::new("sable")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect how the sable context engine classifies a document")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("scan")
                .about("Print the detected comment, string, and script ranges")
                .arg(Arg::new("path").help("Path to the document").required(true).index(1))
                .arg(
                    Arg::new("fast")
                        .long("fast")
                        .action(ArgAction::SetTrue)
                        .help("Use the approximate regex comment strategy"),
                ),
        )
        .subcommand(
            Command::new("sanitize")
                .about("Print the document text with comment contents blanked")
                .arg(Arg::new("path").help("Path to the document").required(true).index(1)),
        )
        .subcommand(
            Command::new("context")
                .about("Print position facts for a cursor at line:column (0-based)")
                .arg(Arg::new("path").help("Path to the document").required(true).index(1))
                .arg(Arg::new("position").help("Cursor as line:column").required(true).index(2)),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("scan", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            handle_scan(path, sub.get_flag("fast"));
        }
        Some(("sanitize", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            handle_sanitize(path);
        }
        Some(("context", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            let position = sub.get_one::<String>("position").unwrap();
            handle_context(path, position);
        }
        _ => unreachable!(),
    }
}

fn load_document(path: &str) -> TextDocument {
    let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });
    let language_id = if path.ends_with(".sbs") { "sable-script" } else { "sable" };
    TextDocument::new(language_id, 0, text)
}

#[derive(Serialize)]
struct ScanReport {
    language_id: String,
    doc_is_script: bool,
    comment_ranges: Vec<Range>,
    string_ranges: Vec<Range>,
    embedded_ranges: Vec<Range>,
    script_ranges: Vec<Range>,
}

fn handle_scan(path: &str, fast: bool) {
    let document = load_document(path);
    let ctx = document_state_context(&document, fast);
    let report = ScanReport {
        language_id: document.language_id().to_string(),
        doc_is_script: ctx.doc_is_script,
        comment_ranges: ctx.comment_ranges.clone(),
        string_ranges: ctx.string_ranges.clone(),
        embedded_ranges: ctx.embedded_ranges.clone(),
        script_ranges: ctx.script_ranges.clone(),
    };
    print_json(&report);
}

fn handle_sanitize(path: &str) {
    let document = load_document(path);
    let ctx = document_state_context(&document, false);
    print!("{}", ctx.sanitized_document_text);
}

#[derive(Serialize)]
struct ContextReport {
    position: Position,
    position_in_comment: bool,
    position_in_string: bool,
    position_is_script: bool,
    current_word: String,
    is_continuing_expression: bool,
}

fn handle_context(path: &str, position: &str) {
    let Some(position) = parse_position(position) else {
        eprintln!("Error: position must be line:column, e.g. 3:14");
        std::process::exit(1);
    };
    let document = load_document(path);
    let ctx = document_position_state_context(&document, position, false);
    let report = ContextReport {
        position: ctx.position,
        position_in_comment: ctx.position_in_comment,
        position_in_string: ctx.position_in_string,
        position_is_script: ctx.position_is_script,
        current_word: ctx.current_word.clone(),
        is_continuing_expression: ctx.is_continuing_expression,
    };
    print_json(&report);
}

fn parse_position(raw: &str) -> Option<Position> {
    let (line, column) = raw.split_once(':')?;
    Some(Position::new(line.parse().ok()?, column.parse().ok()?))
}

fn print_json(report: &impl Serialize) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing report: {}", e);
            std::process::exit(1);
        }
    }
}
