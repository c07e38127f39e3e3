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

use crate::{
    address::{parse_address, parse_address_list},
    encoded_word::{self, Encoding},
    fold::write_folded,
    mail::headers::{Header, Kv},
    registry::{self, HeaderType, BCC_HEADER, RETURN_PATH_HEADER},
    HeaderError, HeaderResult, SyntaxError,
};

/// How a header block is rendered.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Render the `Bcc` field, skipped otherwise.
    pub render_bcc: bool,
    /// Render the fields with an empty value, skipped otherwise.
    pub render_blank: bool,
    /// Do not encode non-ascii free text.
    pub no_escape: bool,
    /// Render the `Return-Path` field, skipped otherwise.
    pub render_return_path: bool,
}

/// Value of a field as it must be written, before folding. `column` is where
/// the value starts on the line.
fn prepare(
    header_type: HeaderType,
    value: &str,
    options: Options,
    column: usize,
) -> Result<String, SyntaxError> {
    let value = value.trim();

    match header_type {
        HeaderType::Unstructured | HeaderType::PhraseList => {
            if value.is_ascii() || options.no_escape {
                Ok(value.to_string())
            } else {
                Ok(encoded_word::encode_at(Encoding::Q, value, column))
            }
        }
        HeaderType::Opaque
        | HeaderType::Received
        | HeaderType::ReturnPath
        | HeaderType::Date
        | HeaderType::MessageId
        | HeaderType::MessageIdList => Ok(value.to_string()),
        HeaderType::Mailbox => parse_address(value)
            .map(|address| address.to_string())
            .map_err(|source| SyntaxError::InvalidAddress {
                value: value.to_string(),
                source,
            }),
        HeaderType::MailboxList => parse_address_list(value)
            .map(|addresses| {
                addresses
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .map_err(|source| SyntaxError::InvalidAddressList {
                value: value.to_string(),
                source,
            }),
    }
}

impl Header {
    /// Write the fields in order, each one folded and terminated by CRLF.
    ///
    /// Only the first occurrence of a field which must be unique is written.
    /// Writing stops at the first field which cannot be rendered.
    #[tracing::instrument(level = "trace", skip_all, fields(fields = self.len()), err)]
    pub fn write_to<W: std::io::Write>(&self, out: &mut W, options: Options) -> HeaderResult<()> {
        let mut seen = std::collections::HashSet::new();

        for Kv { key, value } in self {
            if value.is_empty() && !options.render_blank {
                continue;
            }
            if key == BCC_HEADER && !options.render_bcc {
                continue;
            }
            if key == RETURN_PATH_HEADER && !options.render_return_path {
                continue;
            }

            let header_type = match registry::lookup(key) {
                Some(syntax) => {
                    if syntax.unique && !seen.insert(key.as_str()) {
                        tracing::debug!(%key, "Duplicate of a unique header not rendered");
                        continue;
                    }
                    syntax.header_type
                }
                None => HeaderType::Opaque,
            };

            let written = match prepare(header_type, value, options, key.len() + ": ".len()) {
                Ok(value) => write_folded(out, key, &value),
                Err(source) => Err(HeaderError::InvalidValue {
                    key: key.clone(),
                    source,
                }),
            };

            if let Err(error) = written {
                tracing::warn!(%key, %error, "Failed to render header");
                return Err(error);
            }
        }

        Ok(())
    }

    /// Render the fields, see [`Header::write_to`].
    pub fn to_bytes(&self, options: Options) -> HeaderResult<Vec<u8>> {
        let mut out = Vec::with_capacity(
            self.iter()
                .map(|kv| kv.key.len() + kv.value.len() + 4)
                .sum(),
        );
        self.write_to(&mut out, options)?;
        Ok(out)
    }
}
