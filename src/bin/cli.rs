//! BucketKV CLI
//!
//! Interactive shell over a single store. The directory only lives in
//! memory, so the store is rebuilt each time the CLI starts.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use bucketkv::{BucketKvError, Config, Store};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// BucketKV CLI
#[derive(Parser, Debug)]
#[command(name = "bucketkv-cli")]
#[command(about = "Shell for the BucketKV extendible hash store")]
#[command(version)]
struct Args {
    /// Backing data file (truncated on start)
    #[arg(short, long, default_value = "./bucketkv.data")]
    path: PathBuf,

    /// Maximum global depth of the directory (1-8)
    #[arg(short, long, default_value = "8")]
    max_depth: u8,
}

/// A parsed shell line
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Set { key: &'a str, value: &'a str },
    Get { key: &'a str },
    Stats,
    Quit,
    Empty,
}

fn parse_line(line: &str) -> Result<Line<'_>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Line::Empty);
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim_start()),
        None => (line, ""),
    };

    match command.to_ascii_lowercase().as_str() {
        "set" => match rest.split_once(char::is_whitespace) {
            Some((key, value)) => Ok(Line::Set {
                key,
                value: value.trim_start(),
            }),
            None if !rest.is_empty() => Ok(Line::Set { key: rest, value: "" }),
            None => Err("usage: set <key> <value>".to_string()),
        },
        "get" if !rest.is_empty() => Ok(Line::Get { key: rest }),
        "get" => Err("usage: get <key>".to_string()),
        "stats" => Ok(Line::Stats),
        "quit" | "exit" => Ok(Line::Quit),
        other => Err(format!("unknown command: {}", other)),
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bucketkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("BucketKV CLI v{}", bucketkv::VERSION);

    let config = Config::builder()
        .path(&args.path)
        .max_global_depth(args.max_depth)
        .build();

    let mut store = match Store::open(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&mut store) {
        tracing::error!("Shell error: {}", e);
        std::process::exit(1);
    }
}

fn run(store: &mut Store) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;

        match parse_line(&line) {
            Ok(Line::Set { key, value }) => match store.set(key, value) {
                Ok(()) => writeln!(stdout, "OK")?,
                Err(e) => writeln!(stdout, "ERR {}", e)?,
            },
            Ok(Line::Get { key }) => match store.get(key) {
                Ok(value) => writeln!(stdout, "{}", value)?,
                Err(BucketKvError::KeyNotFound) => writeln!(stdout, "(not found)")?,
                Err(e) => writeln!(stdout, "ERR {}", e)?,
            },
            Ok(Line::Stats) => {
                let stats = store.stats();
                writeln!(
                    stdout,
                    "global_depth={} directory={} buckets={} file_bytes={}",
                    stats.global_depth, stats.directory_len, stats.bucket_count, stats.end_offset
                )?;
            }
            Ok(Line::Quit) => break,
            Ok(Line::Empty) => {}
            Err(msg) => writeln!(stdout, "ERR {}", msg)?,
        }

        stdout.flush()?;
    }

    Ok(())
}
