//! FOLIO host binary
//!
//! Reads one extraction JSON document, runs the reconstruction engine and
//! writes the ownership snapshot JSON. Warnings go to stderr through the
//! log; the snapshot is the only thing written to stdout.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use folio_core::{ExtractInput, FolioResult, RegistryExtract};
use folio_ledger::{reconstruct, FormatMode, ReconstructOptions};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "folio",
    about = "Reconstruct current folio ownership from extracted transfer events"
)]
struct Cli {
    /// Input JSON file, or "-" for stdin.
    input: PathBuf,

    /// Rescale final percentages so bare ownership sums to exactly 100%.
    #[arg(long)]
    normalize: bool,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,

    /// Write the snapshot here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> FolioResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let raw = if cli.input.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(&cli.input)?
    };

    let input: ExtractInput = serde_json::from_str(&raw)?;
    let extract = RegistryExtract::from(input);

    let options = ReconstructOptions {
        mode: if cli.normalize {
            FormatMode::Normalized
        } else {
            FormatMode::Raw
        },
        ..ReconstructOptions::default()
    };
    let result = reconstruct(extract, &options);

    if !result.diagnostics.is_empty() {
        tracing::info!(
            warnings = result.diagnostics.len(),
            "reconstruction finished with warnings"
        );
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&result.snapshot)?
    } else {
        serde_json::to_string(&result.snapshot)?
    };

    match cli.output {
        Some(path) => fs::write(path, json + "\n")?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}
