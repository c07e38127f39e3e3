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

//! A library to read, modify and write the header block of an email,
//! keeping the order of the fields and their duplicates.

/// Mailbox and address list parsing.
pub mod address;
/// Date parsing.
pub mod date;
/// Non-ascii text in header values.
pub mod encoded_word;
/// Errors raised by the library.
pub mod errors;
/// Folding of the fields when writing them.
pub mod fold;
/// Rust representation of an email.
pub mod mail;
/// Header name canonicalization.
pub mod name;
/// Code to read a header block.
pub mod parsing;
/// Syntax of the standard fields.
pub mod registry;
/// Validation of the field values.
pub mod validate;
/// Serialization of a header block.
pub mod writer;

pub use address::{parse_address, parse_address_list, Address, AddressError};
pub use errors::{HeaderError, HeaderResult, IncompleteHeader, SyntaxError};
pub use mail::{
    headers::{Header, HeaderMap, Kv},
    read_message, Message,
};
pub use name::canonical_key;
pub use parsing::{read_header, reader::LineReader};
pub use registry::{HeaderType, Syntax};
pub use validate::{check, check_header};
pub use writer::Options;
