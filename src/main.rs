//! Batch extraction of plain text from raw message files

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Parser;
use email_plaintext::{Extraction, Outcome, extract, text_from_bytes};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "email-plaintext")]
#[command(about = "Extract readable plain text from raw email messages", long_about = None)]
struct Cli {
    /// Number of messages to process
    #[arg(long, default_value_t = 100)]
    limit: usize,

    /// Print one JSON record per message instead of bare text
    #[arg(long)]
    json: bool,

    /// Raw message files or directories of them (stdin when omitted or `-`)
    paths: Vec<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn label(&self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        match self {
            Self::Stdin => {
                let mut raw = Vec::new();
                io::stdin().read_to_end(&mut raw)?;
                Ok(raw)
            }
            Self::File(path) => fs::read(path),
        }
    }
}

/// One line of `--json` output
#[derive(Debug, Serialize)]
struct Report<'a> {
    source: &'a str,
    outcome: Outcome,
    text: &'a str,
    length: usize,
    parsed_at: DateTime<Utc>,
}

impl<'a> Report<'a> {
    fn new(source: &'a str, extraction: &'a Extraction, parsed_at: DateTime<Utc>) -> Self {
        Self {
            source,
            outcome: extraction.outcome,
            text: &extraction.text,
            length: extraction.text.chars().count(),
            parsed_at,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let inputs = collect_inputs(&cli.paths)?;
    if inputs.is_empty() {
        info!("No messages found");
        return Ok(());
    }

    let batch = &inputs[..inputs.len().min(cli.limit)];
    info!(found = inputs.len(), limit = cli.limit, "Parsing messages");

    let with_headers = batch.len() > 1;
    let mut stdout = io::stdout().lock();
    let mut processed = 0usize;
    let mut failed = 0usize;

    for input in batch {
        let label = input.label();
        let raw = match input.read() {
            Ok(raw) => raw,
            Err(e) => {
                error!(source = %label, error = %e, "Failed to read message");
                failed += 1;
                continue;
            }
        };

        let extraction = extract(&text_from_bytes(raw));
        info!(
            source = %label,
            strategy = ?extraction.strategy(),
            length = extraction.text.len(),
            "Parsed message"
        );

        if cli.json {
            let report = Report::new(&label, &extraction, Utc::now());
            writeln!(stdout, "{}", serde_json::to_string(&report)?)?;
        } else {
            if with_headers {
                writeln!(stdout, "==> {label} <==")?;
            }
            writeln!(stdout, "{}", extraction.text)?;
        }
        processed += 1;
    }

    info!(processed, failed, "Finished");
    if processed == 0 && failed > 0 {
        bail!("none of the {failed} messages could be read");
    }
    Ok(())
}

/// Expand CLI paths into inputs; directories contribute their files in
/// sorted order.
fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<Input>> {
    if paths.is_empty() {
        return Ok(vec![Input::Stdin]);
    }

    let mut inputs = Vec::new();
    for path in paths {
        if path.as_os_str() == "-" {
            inputs.push(Input::Stdin);
        } else if path.is_dir() {
            inputs.extend(dir_files(path)?.into_iter().map(Input::File));
        } else {
            inputs.push(Input::File(path.clone()));
        }
    }
    Ok(inputs)
}

fn dir_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use email_plaintext::Strategy;

    #[test]
    fn no_paths_reads_stdin() {
        assert_eq!(collect_inputs(&[]).unwrap(), vec![Input::Stdin]);
        assert_eq!(
            collect_inputs(&[PathBuf::from("-")]).unwrap(),
            vec![Input::Stdin]
        );
    }

    #[test]
    fn directory_contributes_sorted_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.eml"), "b").unwrap();
        fs::write(dir.path().join("a.eml"), "a").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let inputs = collect_inputs(&[dir.path().to_path_buf()]).unwrap();

        assert_eq!(
            inputs,
            vec![
                Input::File(dir.path().join("a.eml")),
                Input::File(dir.path().join("b.eml")),
            ]
        );
    }

    #[test]
    fn missing_file_is_kept_and_fails_on_read() {
        let path = PathBuf::from("/definitely/not/here.eml");
        let inputs = collect_inputs(&[path.clone()]).unwrap();

        assert_eq!(inputs, vec![Input::File(path)]);
        assert!(inputs[0].read().is_err());
    }

    #[test]
    fn report_serializes_outcome_and_length() {
        let extraction = Extraction::extracted("Grüße aus Berlin".to_string(), Strategy::Multipart);
        let parsed_at = DateTime::parse_from_rfc3339("2025-01-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let json = serde_json::to_value(Report::new("a.eml", &extraction, parsed_at)).unwrap();

        assert_eq!(json["source"], "a.eml");
        assert_eq!(json["outcome"]["kind"], "extracted");
        assert_eq!(json["outcome"]["strategy"], "multipart");
        assert_eq!(json["length"], 16);
        assert_eq!(json["parsed_at"], "2025-01-01T12:00:00Z");
    }
}
