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

use crate::{address::AddressError, mail::headers::Header};

/// Errors raised while reading, modifying or writing a header block.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    /// Error of the underlying stream, in or out.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// A logical line without any colon.
    #[error("malformed header line: {line}")]
    MalformedLine {
        /// The offending (unfolded) line.
        line: String,
    },
    /// Only standard fields can be `set`.
    #[error("{key} is not a standard email header")]
    UnknownHeader {
        /// Canonical name of the field.
        key: String,
    },
    /// The value does not follow the grammar of its field.
    #[error("invalid value for {key}: {source}")]
    InvalidValue {
        /// Canonical name of the field.
        key: String,
        /// What the validator rejected.
        #[source]
        source: SyntaxError,
    },
    /// A quoted string spans a line break, which cannot be folded.
    #[error("{key}: CR or LF found in quoted string at offset {offset}")]
    MalformedQuotedValue {
        /// Canonical name of the field.
        key: String,
        /// Byte offset of the line break in the rendered value.
        offset: usize,
    },
    /// Field looked up by an accessor is absent or empty.
    #[error("header '{key}' not present")]
    NotPresent {
        /// Canonical name of the field.
        key: String,
    },
    ///
    #[error("Mandatory header '{0}' not found")]
    MandatoryHeaderNotFound(String),
}

/// Syntax violations reported by the validator.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    ///
    #[error("cannot contain non-ascii characters")]
    NonAscii,
    ///
    #[error("'{value}' is not a valid return path: {reason}")]
    InvalidReturnPath {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    ///
    #[error("'{value}' is not a valid 5322 email address: {source}")]
    InvalidAddress {
        /// The rejected value.
        value: String,
        /// Diagnostic of the address parser.
        #[source]
        source: AddressError,
    },
    ///
    #[error("'{value}' is not a valid 5322 list of email addresses: {source}")]
    InvalidAddressList {
        /// The rejected value.
        value: String,
        /// Diagnostic of the address parser.
        #[source]
        source: AddressError,
    },
    ///
    #[error("'{value}' is not a valid date: {source}")]
    InvalidDate {
        /// The rejected value.
        value: String,
        /// Diagnostic of the date parser.
        #[source]
        source: time::error::Parse,
    },
    ///
    #[error("'{value}' is not a valid Message-ID")]
    InvalidMessageId {
        /// The rejected value.
        value: String,
    },
}

/// Reading stopped before the end of the header block.
///
/// The fields read up to the failure are kept, so a caller can still
/// inspect what was parsed.
#[derive(Debug, thiserror::Error)]
#[error("failed to read header block after {} field(s): {error}", .header.len())]
pub struct IncompleteHeader {
    /// Fields parsed before the failure.
    pub header: Header,
    /// What stopped the parser.
    #[source]
    pub error: HeaderError,
}

/// Result emitted by header operations.
pub type HeaderResult<T> = Result<T, HeaderError>;
