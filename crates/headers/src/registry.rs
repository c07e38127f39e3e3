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

//! Syntax rules of the standard header fields.
//!
//! <https://www.rfc-editor.org/rfc/rfc5322#section-3.6>
//! <https://www.rfc-editor.org/rfc/rfc2045#section-3>

pub const RETURN_PATH_HEADER: &str = "Return-Path";
pub const RECEIVED_HEADER: &str = "Received";
pub const DATE_HEADER: &str = "Date";
pub const FROM_HEADER: &str = "From";
pub const SENDER_HEADER: &str = "Sender";
pub const REPLY_TO_HEADER: &str = "Reply-To";
pub const TO_HEADER: &str = "To";
pub const CC_HEADER: &str = "Cc";
pub const BCC_HEADER: &str = "Bcc";
pub const MESSAGE_ID_HEADER: &str = "Message-Id";
pub const IN_REPLY_TO_HEADER: &str = "In-Reply-To";
pub const REFERENCES_HEADER: &str = "References";
pub const SUBJECT_HEADER: &str = "Subject";
pub const COMMENTS_HEADER: &str = "Comments";
pub const KEYWORDS_HEADER: &str = "Keywords";
pub const RESENT_DATE_HEADER: &str = "Resent-Date";
pub const RESENT_FROM_HEADER: &str = "Resent-From";
pub const RESENT_SENDER_HEADER: &str = "Resent-Sender";
pub const RESENT_TO_HEADER: &str = "Resent-To";
pub const RESENT_CC_HEADER: &str = "Resent-Cc";
pub const RESENT_BCC_HEADER: &str = "Resent-Bcc";
pub const MIME_VERSION_HEADER: &str = "Mime-Version";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const CONTENT_ID_HEADER: &str = "Content-Id";
pub const CONTENT_TRANSFER_ENCODING_HEADER: &str = "Content-Transfer-Encoding";
pub const CONTENT_DESCRIPTION_HEADER: &str = "Content-Description";

/// Grammar a header field value must follow.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum HeaderType {
    /// Free text, encoded when not ascii.
    Unstructured,
    /// A single address.
    Mailbox,
    /// Comma separated addresses.
    MailboxList,
    Date,
    /// Trace field, ascii only.
    Received,
    MessageId,
    /// Comma separated message identifiers.
    MessageIdList,
    /// Comma separated phrases, handled as free text.
    PhraseList,
    /// `<>` or a bare address.
    ReturnPath,
    /// Anything ascii, written as is.
    Opaque,
}

/// Requirements of RFC 5322 for a header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Syntax {
    /// The field must be present in a message.
    pub required: bool,
    /// The field must not appear more than once.
    pub unique: bool,
    #[serde(rename = "type")]
    pub header_type: HeaderType,
}

impl Syntax {
    const fn new(required: bool, unique: bool, header_type: HeaderType) -> Self {
        Self {
            required,
            unique,
            header_type,
        }
    }
}

/// Standard fields, by canonical name.
pub const REGISTRY: &[(&str, Syntax)] = &[
    (RETURN_PATH_HEADER, Syntax::new(false, false, HeaderType::ReturnPath)),
    (RECEIVED_HEADER, Syntax::new(false, false, HeaderType::Received)),
    (DATE_HEADER, Syntax::new(true, true, HeaderType::Date)),
    (FROM_HEADER, Syntax::new(true, true, HeaderType::MailboxList)),
    (SENDER_HEADER, Syntax::new(false, true, HeaderType::Mailbox)),
    (REPLY_TO_HEADER, Syntax::new(false, true, HeaderType::MailboxList)),
    (TO_HEADER, Syntax::new(false, true, HeaderType::MailboxList)),
    (CC_HEADER, Syntax::new(false, true, HeaderType::MailboxList)),
    (BCC_HEADER, Syntax::new(false, true, HeaderType::MailboxList)),
    (MESSAGE_ID_HEADER, Syntax::new(false, true, HeaderType::MessageId)),
    (IN_REPLY_TO_HEADER, Syntax::new(false, true, HeaderType::MessageIdList)),
    (REFERENCES_HEADER, Syntax::new(false, true, HeaderType::MessageIdList)),
    (SUBJECT_HEADER, Syntax::new(false, true, HeaderType::Unstructured)),
    (COMMENTS_HEADER, Syntax::new(false, false, HeaderType::Unstructured)),
    (KEYWORDS_HEADER, Syntax::new(false, false, HeaderType::PhraseList)),
    (RESENT_DATE_HEADER, Syntax::new(false, false, HeaderType::Date)),
    (RESENT_FROM_HEADER, Syntax::new(false, false, HeaderType::MailboxList)),
    (RESENT_SENDER_HEADER, Syntax::new(false, false, HeaderType::Mailbox)),
    (RESENT_TO_HEADER, Syntax::new(false, false, HeaderType::MailboxList)),
    (RESENT_CC_HEADER, Syntax::new(false, false, HeaderType::MailboxList)),
    (RESENT_BCC_HEADER, Syntax::new(false, false, HeaderType::MailboxList)),
    (MIME_VERSION_HEADER, Syntax::new(false, true, HeaderType::Opaque)),
    (CONTENT_TYPE_HEADER, Syntax::new(false, true, HeaderType::Opaque)),
    (CONTENT_ID_HEADER, Syntax::new(false, true, HeaderType::MessageId)),
    (CONTENT_TRANSFER_ENCODING_HEADER, Syntax::new(false, true, HeaderType::Opaque)),
    (CONTENT_DESCRIPTION_HEADER, Syntax::new(false, true, HeaderType::Unstructured)),
];

/// Syntax rule of a standard field. `key` must be canonical.
#[must_use]
pub fn lookup(key: &str) -> Option<&'static Syntax> {
    REGISTRY
        .iter()
        .find_map(|(name, syntax)| (*name == key).then_some(syntax))
}

/// Names of the fields every message must carry.
pub fn required() -> impl Iterator<Item = &'static str> {
    REGISTRY
        .iter()
        .filter_map(|(name, syntax)| syntax.required.then_some(*name))
}
