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

use crate::{mail::headers::Header, HeaderError, IncompleteHeader};

/// Line unfolding.
pub mod reader;

/// Read a header block, up to the empty line separating it from the body or
/// the end of the stream.
///
/// Lines without a name (`: value`) are skipped. Keys are canonicalized,
/// values are stored as read. On failure, the fields read so far are
/// returned with the error.
pub fn read_header<R: std::io::BufRead>(
    reader: &mut reader::LineReader<R>,
) -> Result<Header, IncompleteHeader> {
    let mut header = Header::new();

    loop {
        let line = match reader.read_continued_line() {
            Ok(Some(line)) => line,
            Ok(None) => return Ok(header),
            Err(error) => {
                return Err(IncompleteHeader {
                    header,
                    error: error.into(),
                })
            }
        };

        let Some((key, value)) = line.split_once(':') else {
            return Err(IncompleteHeader {
                header,
                error: HeaderError::MalformedLine { line },
            });
        };

        let key = key.trim_end_matches(' ');
        if key.is_empty() {
            tracing::trace!(%line, "Header line without a name skipped");
            continue;
        }

        header.add(key, value.trim_start_matches([' ', '\t']));
    }
}
