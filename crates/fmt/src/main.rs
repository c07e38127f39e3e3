/*
 * vSMTP mail transfer agent
 *
 * Copyright (C) 2003 - viridIT SAS
 * Licensed under the Elastic License 2.0
 *
 * You should have received a copy of the Elastic License 2.0 along with
 * this program. If not, see https://www.elastic.co/licensing/elastic-license.
 *
 */

use config::FmtConfig;
use ordered_headers::{read_message, HeaderError, IncompleteHeader, Kv, Message};
use ordered_headers_config::Config;

mod config;

/// Error which can happen while formatting a message.
#[derive(thiserror::Error, Debug)]
pub enum FmtError {
    #[error("{0}")]
    Read(#[from] IncompleteHeader),
    #[error("{0}")]
    Header(#[from] HeaderError),
    #[error("failed to write the message: {0}")]
    Write(#[from] std::io::Error),
}

/// Read a message from `input`, apply the configured changes to its header
/// block and write it to `out`.
#[tracing::instrument(skip_all, err)]
fn format_message<R: std::io::BufRead, W: std::io::Write>(
    config: &FmtConfig,
    input: R,
    out: &mut W,
    headers_only: bool,
) -> Result<(), FmtError> {
    let Message { mut header, mut body } = read_message(input)?;
    tracing::debug!(fields = header.len(), "Header block read");

    for key in &config.remove {
        header.remove_all(key);
    }
    for Kv { key, value } in &config.set {
        header.set(key, value.clone())?;
    }
    if config.normalize {
        header.normalize();
    }
    if config.check_mandatory {
        header.check_mandatory()?;
    }

    header.write_to(out, config.options)?;
    if !headers_only {
        out.write_all(b"\r\n")?;
        std::io::copy(&mut body, out)?;
    }
    out.flush()?;

    tracing::info!(fields = header.len(), "Message formatted");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::prelude::*;

    let args = <config::cli::Args as clap::Parser>::parse();
    let config = match &args.config {
        Some(path) => FmtConfig::from_json_file(path),
        None => FmtConfig::with_path(&""),
    }
    .map_err(|error| {
        eprintln!("Failed to boot headers-fmt: {error}");
        error
    })?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(config.logs().targets()),
        )
        .try_init()?;

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());

    match &args.input {
        Some(path) => format_message(
            &config,
            std::io::BufReader::new(std::fs::File::open(path)?),
            &mut out,
            args.headers_only,
        )?,
        None => format_message(&config, std::io::stdin().lock(), &mut out, args.headers_only)?,
    }

    Ok(())
}
