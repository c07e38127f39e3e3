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

use std::io::BufRead;

const fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn trim(line: &[u8]) -> &[u8] {
    let is_space = |b: &u8| is_blank(*b) || *b == b'\r' || *b == b'\n';

    let start = line.iter().position(|b| !is_space(b)).unwrap_or(line.len());
    let end = line.iter().rposition(|b| !is_space(b)).map_or(start, |idx| idx + 1);
    &line[start..end]
}

/// Read the logical lines of a header block, joining folded lines.
///
/// <https://www.rfc-editor.org/rfc/rfc5322#section-2.2.3>
pub struct LineReader<R> {
    inner: R,
}

impl<R: BufRead> LineReader<R> {
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Give back the wrapped reader. Once the end of the header block has been
    /// reached, it is positioned on the first byte of the body.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read a physical line, without its line ending.
    fn read_line(&mut self, line: &mut Vec<u8>) -> std::io::Result<usize> {
        let read = self.inner.read_until(b'\n', line)?;

        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        Ok(read)
    }

    /// Consume the blanks at the start of the next line, and tell if there
    /// were any.
    fn skip_blanks(&mut self) -> std::io::Result<bool> {
        let mut skipped = false;
        loop {
            let buffer = self.inner.fill_buf()?;
            let blanks = buffer.iter().take_while(|b| is_blank(**b)).count();
            let exhausted = blanks < buffer.len() || buffer.is_empty();

            self.inner.consume(blanks);
            skipped |= blanks != 0;

            if exhausted {
                return Ok(skipped);
            }
        }
    }

    /// Read a logical line: a first line followed by any number of lines
    /// starting with a space or a tab. Each physical line is trimmed, and they
    /// are joined with a single space.
    ///
    /// Returns `None` on the empty line ending the header block, or at the
    /// end of the stream.
    pub fn read_continued_line(&mut self) -> std::io::Result<Option<String>> {
        let mut first = vec![];
        if self.read_line(&mut first)? == 0 {
            return Ok(None);
        }

        let mut line = trim(&first).to_vec();
        if line.is_empty() {
            return Ok(None);
        }

        let mut continuation = vec![];
        while self.skip_blanks()? {
            continuation.clear();
            self.read_line(&mut continuation)?;
            line.push(b' ');
            line.extend_from_slice(trim(&continuation));
        }

        Ok(Some(match String::from_utf8(line) {
            Ok(line) => line,
            Err(error) => {
                let line = String::from_utf8_lossy(error.as_bytes()).into_owned();
                tracing::debug!(%line, "Invalid utf-8 replaced in header line");
                line
            }
        }))
    }
}
