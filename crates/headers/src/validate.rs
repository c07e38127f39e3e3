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
    date::parse_date,
    name::canonical_key,
    registry::{self, HeaderType},
    SyntaxError,
};

const ATEXT: &str = r"[A-Za-z0-9!#$%&'*+\-/=?^_`{|}~]";

fn message_id_regex() -> &'static regex::Regex {
    static MESSAGE_ID: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();

    MESSAGE_ID.get_or_init(|| {
        regex::Regex::new(&format!(
            r"^\s*<{ATEXT}+(?:\.{ATEXT}+)*@{ATEXT}+(?:\.{ATEXT}+)*>\s*$"
        ))
        .expect("message-id pattern is valid")
    })
}

fn check_message_id(value: &str) -> Result<(), SyntaxError> {
    if message_id_regex().is_match(value) {
        Ok(())
    } else {
        Err(SyntaxError::InvalidMessageId {
            value: value.to_string(),
        })
    }
}

/// Check `value` against the grammar of `header_type`.
///
/// Surrounding whitespace is ignored.
pub fn check_header(header_type: HeaderType, value: &str) -> Result<(), SyntaxError> {
    let value = value.trim();

    match header_type {
        HeaderType::Unstructured | HeaderType::PhraseList => Ok(()),
        HeaderType::Opaque | HeaderType::Received => {
            if value.is_ascii() {
                Ok(())
            } else {
                Err(SyntaxError::NonAscii)
            }
        }
        HeaderType::ReturnPath => {
            if value == "<>" {
                return Ok(());
            }
            match parse_address(value) {
                Ok(address) if address.name.is_empty() => Ok(()),
                Ok(_) => Err(SyntaxError::InvalidReturnPath {
                    value: value.to_string(),
                    reason: "cannot have a display name".to_string(),
                }),
                Err(error) => Err(SyntaxError::InvalidReturnPath {
                    value: value.to_string(),
                    reason: error.to_string(),
                }),
            }
        }
        HeaderType::Date => parse_date(value)
            .map(|_| ())
            .map_err(|source| SyntaxError::InvalidDate {
                value: value.to_string(),
                source,
            }),
        HeaderType::Mailbox => {
            parse_address(value)
                .map(|_| ())
                .map_err(|source| SyntaxError::InvalidAddress {
                    value: value.to_string(),
                    source,
                })
        }
        HeaderType::MailboxList => {
            parse_address_list(value)
                .map(|_| ())
                .map_err(|source| SyntaxError::InvalidAddressList {
                    value: value.to_string(),
                    source,
                })
        }
        HeaderType::MessageId => check_message_id(value),
        HeaderType::MessageIdList => value.split(',').try_for_each(check_message_id),
    }
}

/// Check a field against the rules of the standard fields.
///
/// Non-standard fields are always valid.
pub fn check(name: &str, value: &str) -> Result<(), SyntaxError> {
    registry::lookup(&canonical_key(name))
        .map_or(Ok(()), |syntax| check_header(syntax.header_type, value))
}
