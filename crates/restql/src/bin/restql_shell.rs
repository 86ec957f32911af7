//! Interactive projection shell over a JSON fixture.
//!
//! Usage: restql_shell <fixture.json> [config.toml]
//!
//! Commands:
//!   :many   - project every record (default)
//!   :one    - project the first record only
//!   :help   - show help
//!   :quit   - exit
//!
//! Any other line is a projection query; an empty line uses the configured
//! default query.

use restql::{
    Envelope, Error, ProjectionConfig, Serializer, core::overwrite::Overwrites,
    fixture::Fixture,
};
use rustyline::{DefaultEditor, error::ReadlineError};
use serde_json::{Value as JsonValue, json};
use std::{env, path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

const PROMPT: &str = "restql> ";

///
/// Mode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    One,
    Many,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (fixture, config) = match args.as_slice() {
        [fixture] => (PathBuf::from(fixture), None),
        [fixture, config] => (PathBuf::from(fixture), Some(PathBuf::from(config))),
        _ => {
            eprintln!("usage: restql_shell <fixture.json> [config.toml]");
            return ExitCode::FAILURE;
        }
    };

    match run(fixture, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(fixture: PathBuf, config: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => ProjectionConfig::load(path)?,
        None => ProjectionConfig::default(),
    };
    let fixture = Fixture::load(&fixture).map_err(Error::from)?;
    let serializer = Serializer::from_config(config)?;

    println!(
        "restql v{} - {} {} record(s); :help for commands",
        restql::VERSION,
        fixture.records().len(),
        fixture.entity()
    );

    let mut editor = DefaultEditor::new()?;
    let mut mode = Mode::Many;

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if !line.is_empty() {
                    let _ = editor.add_history_entry(line);
                }

                match line {
                    ":quit" | ":q" => break,
                    ":help" => print_help(),
                    ":one" => {
                        mode = Mode::One;
                        println!("mode: one");
                    }
                    ":many" => {
                        mode = Mode::Many;
                        println!("mode: many");
                    }
                    _ if line.starts_with(':') => println!("unknown command '{line}'; :help for commands"),
                    _ => {
                        let query = (!line.is_empty()).then_some(line);
                        let envelope = project(&serializer, &fixture, mode, query);
                        println!("{}", serde_json::to_string_pretty(&envelope)?);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => println!("use :quit or Ctrl-D to exit"),
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn project(serializer: &Serializer, fixture: &Fixture, mode: Mode, query: Option<&str>) -> Envelope {
    let overwrites = Overwrites::new();
    let records = fixture.records();

    match mode {
        Mode::Many => serializer
            .many_json(records, query, &overwrites)
            .map(|rows| (json!({"count": records.len()}), rows))
            .map_or_else(
                |err| Envelope::failure(&err),
                |(meta, rows)| Envelope::success(rows).with_meta(meta),
            ),
        Mode::One => match records.first() {
            Some(record) => serializer
                .one(record, query, &overwrites)
                .map(JsonValue::Object)
                .into(),
            None => Envelope::success(JsonValue::Null),
        },
    }
}

fn print_help() {
    println!("  <query>   project with the query, e.g. {{id, name, line_ids{{id}}}}");
    println!("  <empty>   project with the configured default query");
    println!("  :many     project every record");
    println!("  :one      project the first record only");
    println!("  :quit     exit");
}
