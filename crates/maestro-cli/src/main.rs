use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use maestro_lsp_core::schema;
use serde::Serialize;

mod complete;
mod lint;
mod scan;

/// Maestro flow tooling
#[derive(Parser)]
#[command(name = "maestro")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect, lint and complete Maestro flow files", long_about = "Maestro flow toolkit\n\nRuns the same analysis as the language server from the command line:\n  - Expression highlighting dump\n  - Legacy $VARIABLE warnings\n  - Completion at a position\n  - Command reference")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the expression spans found in a flow
    Scan {
        /// Flow file
        file: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Warn about $VARIABLE references without braces
    Lint {
        /// Flow file
        file: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show completions at a position
    Complete {
        /// Flow file
        file: String,
        /// 1-based line
        #[arg(long)]
        line: u32,
        /// 1-based column
        #[arg(long)]
        column: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the commands a flow can use
    Commands {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan { file, json } => scan_command(&file, json),
        Commands::Lint { file, json } => lint_command(&file, json),
        Commands::Complete {
            file,
            line,
            column,
            json,
        } => complete_command(&file, line, column, json),
        Commands::Commands { json } => commands_command(json),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn read_flow(filename: &str) -> Result<String> {
    fs::read_to_string(filename).with_context(|| format!("reading file '{}'", filename))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing JSON")?;
    println!("{}", json);
    Ok(())
}

// ============================================================================
// SCAN COMMAND
// ============================================================================

fn scan_command(filename: &str, json_output: bool) -> Result<ExitCode> {
    let contents = read_flow(filename)?;
    let spans = scan::scan_flow(&contents);

    if json_output {
        print_json(&spans)?;
    } else if spans.is_empty() {
        println!("No expressions found: {}", filename);
    } else {
        for span in &spans {
            println!(
                "{}:{}:{}: {} {}",
                filename,
                span.line,
                span.column,
                span.kind.display_name(),
                span.text
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// LINT COMMAND
// ============================================================================

fn lint_command(filename: &str, json_output: bool) -> Result<ExitCode> {
    let contents = read_flow(filename)?;
    let issues = lint::check_flow(&contents);

    if json_output {
        print_json(&issues)?;
    } else if issues.is_empty() {
        println!("No issues found: {}", filename);
    } else {
        eprintln!("Issues in '{}':", filename);
        for issue in &issues {
            eprintln!(
                "  {}:{}:{}: {} [{}]",
                filename, issue.line, issue.column, issue.message, issue.severity
            );
        }
    }

    Ok(if issues.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

// ============================================================================
// COMPLETE COMMAND
// ============================================================================

fn complete_command(filename: &str, line: u32, column: u32, json_output: bool) -> Result<ExitCode> {
    let contents = read_flow(filename)?;
    let report = complete::complete_at(&contents, line, column)
        .with_context(|| format!("completing {}:{}:{}", filename, line, column))?;

    if json_output {
        print_json(&report)?;
        return Ok(ExitCode::SUCCESS);
    }

    match &report.context.enclosing_key {
        Some(key) => println!("{} ({})", report.context.kind.as_str(), key),
        None => println!("{}", report.context.kind.as_str()),
    }
    for item in &report.items {
        let marker = if item.emphasize { "*" } else { " " };
        println!("{} {:<28} {}", marker, item.label, item.description);
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// COMMANDS COMMAND
// ============================================================================

fn commands_command(json_output: bool) -> Result<ExitCode> {
    let commands = &schema().commands;

    if json_output {
        print_json(commands)?;
        return Ok(ExitCode::SUCCESS);
    }

    for command in commands {
        println!("{:<28} {}", command.name, command.description);
        if command.uses_selector {
            println!("    (accepts element selector properties)");
        }
        for property in &command.properties {
            println!("    {:<24} {}", property.name, property.description);
        }
    }
    Ok(ExitCode::SUCCESS)
}
