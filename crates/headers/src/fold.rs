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

//! Folding of long header fields.
//!
//! <https://www.rfc-editor.org/rfc/rfc5322#section-2.2.3>

use crate::{HeaderError, HeaderResult};

/// Lines are folded to stay within this number of characters.
pub const MAX_LINE_LEN: usize = 78;

/// Only a space or a tab may start a continuation line.
const fn is_folding_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

const fn is_line_break(b: u8) -> bool {
    b == b'\r' || b == b'\n'
}

struct Folder<'w, W> {
    out: &'w mut W,
    column: usize,
    /// Something other than the folding whitespace was written on the line.
    line_has_token: bool,
}

impl<W: std::io::Write> Folder<'_, W> {
    /// Write a token, which starts with the whitespace preceding it except
    /// for the first one. The line is folded before it if it does not fit.
    fn token(&mut self, token: &[u8]) -> std::io::Result<()> {
        if token.is_empty() {
            return Ok(());
        }

        if self.line_has_token && self.column + token.len() > MAX_LINE_LEN {
            self.out.write_all(b"\r\n")?;
            self.column = 0;
        }

        self.out.write_all(token)?;
        self.column += token.len();
        self.line_has_token = true;
        Ok(())
    }

    /// Break the line where the value itself does. `next` is the byte
    /// following the line break in the value.
    fn line_break(&mut self, next: u8) -> std::io::Result<()> {
        // a continuation line on which nothing was written yet is reused.
        if self.line_has_token || self.column != 0 {
            self.out.write_all(b"\r\n")?;
        }
        self.line_has_token = false;

        if is_folding_space(next) {
            // that space is written as the start of the next token.
            self.column = 0;
        } else {
            self.out.write_all(b"\t")?;
            self.column = 1;
        }
        Ok(())
    }

    /// Write the token pending at a line break or at the end of the value,
    /// unless it would leave a line holding only whitespace.
    fn last_token(&mut self, token: &[u8]) -> std::io::Result<()> {
        if self.line_has_token || !token.iter().copied().all(is_folding_space) {
            self.token(token)?;
        }
        Ok(())
    }
}

/// Write `key: value` terminated by CRLF, folding the value on whitespace so
/// that lines are no longer than [`MAX_LINE_LEN`] characters. A single word
/// longer than that is written as is.
///
/// Line breaks in `value` are kept, and the following line is indented if it
/// is not already. Line breaks are not allowed inside a quoted string.
pub fn write_folded<W: std::io::Write>(out: &mut W, key: &str, value: &str) -> HeaderResult<()> {
    out.write_all(key.as_bytes())?;
    out.write_all(b": ")?;

    let mut folder = Folder {
        out,
        column: key.len() + 2,
        line_has_token: false,
    };

    if folder.column + value.len() < MAX_LINE_LEN && !value.bytes().any(is_line_break) {
        folder.out.write_all(value.as_bytes())?;
        folder.out.write_all(b"\r\n")?;
        return Ok(());
    }

    let bytes = value.as_bytes();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut token_start = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];

        if in_quotes {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_quotes = false,
                b if is_line_break(b) => {
                    return Err(HeaderError::MalformedQuotedValue {
                        key: key.to_string(),
                        offset: idx,
                    })
                }
                _ => {}
            }
            idx += 1;
            continue;
        }

        match b {
            b'"' => in_quotes = true,
            b if is_line_break(b) => {
                folder.last_token(&bytes[token_start..idx])?;
                while idx < bytes.len() && is_line_break(bytes[idx]) {
                    idx += 1;
                }
                token_start = idx;

                if let Some(next) = bytes.get(idx) {
                    folder.line_break(*next)?;
                }
                // the byte after the line breaks has not been looked at yet.
                continue;
            }
            b if is_folding_space(b) => {
                let pending = &bytes[token_start..idx];
                // leading whitespace of a line stays with the following word.
                if folder.line_has_token || !pending.iter().copied().all(is_folding_space) {
                    folder.token(pending)?;
                    token_start = idx;
                }
            }
            _ => {}
        }
        idx += 1;
    }

    folder.last_token(&bytes[token_start..])?;
    if folder.column != 0 {
        folder.out.write_all(b"\r\n")?;
    }

    Ok(())
}
