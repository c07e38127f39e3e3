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

//! Definition of an email data structure.

use crate::{
    parsing::{read_header, reader::LineReader},
    IncompleteHeader,
};

use self::headers::Header;

/// Headers definition of an email.
pub mod headers;

/// A message whose header block has been parsed, the body is left unread.
#[derive(Debug)]
pub struct Message<R> {
    /// Message headers.
    pub header: Header,
    /// Stream positioned on the first byte of the body.
    pub body: R,
}

/// Parse the header block of a message read from `reader`.
pub fn read_message<R: std::io::BufRead>(reader: R) -> Result<Message<R>, IncompleteHeader> {
    let mut reader = LineReader::new(reader);
    let header = read_header(&mut reader)?;

    Ok(Message {
        header,
        body: reader.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::read_message;

    #[rstest::rstest]
    #[case("Foo: bar", "")]
    #[case("Foo: bar\n", "")]
    #[case("Foo: bar\n\n", "")]
    #[case("Foo: bar\n\n\n", "\n")]
    #[case("Foo: bar\n\nbaz\n", "baz\n")]
    #[case("foo:   bar\r\n\r\nbaz\r\n.\r\n", "baz\r\n.\r\n")]
    fn body_is_left_unread(#[case] input: &str, #[case] body: &str) {
        let message = read_message(input.as_bytes()).unwrap();

        pretty_assertions::assert_eq!(message.header.len(), 1);
        pretty_assertions::assert_eq!(message.header.get("Foo"), "bar");
        pretty_assertions::assert_eq!(std::io::read_to_string(message.body).unwrap(), body);
    }

    #[test]
    fn failure() {
        let error = read_message("Foo: bar\r\nbroken\r\n\r\nbody".as_bytes()).unwrap_err();
        pretty_assertions::assert_eq!(error.header.get("foo"), "bar");
    }
}
