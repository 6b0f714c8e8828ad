//! CLI tool to parse and validate source-tag line files.

use std::fs;
use std::process::ExitCode;

use sourcetag_rs::{ParseContext, SourceTagFormat};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: sourcetag <command> [files...]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  parse     Parse each line and print the records");
        eprintln!("  validate  Check each line, report errors per file");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  sourcetag parse tags.txt");
        eprintln!("  sourcetag validate tags.txt");
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    let files = &args[2..];

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let format = SourceTagFormat::new();
    let ctx = ParseContext::default();
    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        match command {
            "parse" => {
                for (number, line) in numbered_lines(&content) {
                    match format.parse(line, &ctx) {
                        Ok(tag) => println!("{tag}"),
                        Err(e) => {
                            eprintln!("{path}:{number}: {e}");
                            had_error = true;
                        }
                    }
                }
            }
            "validate" => {
                let mut ok = 0usize;
                let mut invalid = 0usize;
                for (number, line) in numbered_lines(&content) {
                    match format.parse(line, &ctx) {
                        Ok(_) => ok += 1,
                        Err(e) => {
                            eprintln!("{path}:{number}: {e}");
                            invalid += 1;
                        }
                    }
                }
                eprintln!("{path}: {ok} valid, {invalid} invalid");
                if invalid > 0 {
                    had_error = true;
                }
            }
            _ => {
                eprintln!("Unknown command: {command}");
                return ExitCode::from(2);
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Non-blank lines with their 1-based line numbers.
fn numbered_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}
