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

#[derive(clap::Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Path to the JSON configuration file. Defaults are used if absent.
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,
    /// Message to read, the standard input if absent.
    #[arg(short, long)]
    pub input: Option<std::path::PathBuf>,
    /// Only write the header block.
    #[arg(long)]
    pub headers_only: bool,
}

#[cfg(test)]
mod tests {
    use super::Args;

    #[test]
    fn parse() {
        let args = <Args as clap::Parser>::try_parse_from([
            "headers-fmt",
            "--config",
            "fmt.json",
            "-i",
            "message.eml",
            "--headers-only",
        ])
        .unwrap();

        pretty_assertions::assert_eq!(args.config, Some("fmt.json".into()));
        pretty_assertions::assert_eq!(args.input, Some("message.eml".into()));
        assert!(args.headers_only);

        let args = <Args as clap::Parser>::try_parse_from(["headers-fmt"]).unwrap();
        assert!(args.config.is_none() && args.input.is_none() && !args.headers_only);
    }
}
