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

//! Encoded words of <https://www.rfc-editor.org/rfc/rfc2047>, used to carry
//! non-ascii text in header values.

use base64::Engine;

use crate::fold::MAX_LINE_LEN;

/// An encoded word, delimiters included, cannot be longer than this.
const MAX_ENCODED_WORD_LEN: usize = 75;

const CHARSET: &str = "utf-8";

const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Encoding of the text of an encoded word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Encoding {
    /// Quoted-printable like, readable for mostly-ascii text.
    #[strum(serialize = "q")]
    Q,
    /// Base64.
    #[strum(serialize = "b")]
    B,
}

impl Encoding {
    fn prefix(self) -> String {
        format!("=?{CHARSET}?{self}?")
    }

    /// Number of encoded characters which fit between the delimiters.
    fn max_content_len(self) -> usize {
        MAX_ENCODED_WORD_LEN - self.prefix().len() - "?=".len()
    }
}

/// Encode `text` as UTF-8 encoded words.
///
/// Text too long for a single word is split in several words separated by a
/// space. A character is never split across two words.
#[must_use]
pub fn encode(encoding: Encoding, text: &str) -> String {
    encode_at(encoding, text, 0)
}

/// Same as [`encode`], for text written at `column` of a header line: the
/// first word is shortened to end within [`MAX_LINE_LEN`] columns.
#[must_use]
pub fn encode_at(encoding: Encoding, text: &str, column: usize) -> String {
    let prefix = encoding.prefix();
    let first_max = MAX_LINE_LEN
        .saturating_sub(column + prefix.len() + "?=".len())
        .min(encoding.max_content_len());

    let mut out = String::with_capacity(text.len() * 3 + prefix.len() + 2);
    out.push_str(&prefix);

    match encoding {
        Encoding::Q => q_encode(&mut out, &prefix, text, first_max),
        Encoding::B => b_encode(&mut out, &prefix, text, first_max),
    }

    out.push_str("?=");
    out
}

const fn is_q_literal(b: u8) -> bool {
    b >= b' ' && b <= b'~' && b != b'=' && b != b'?' && b != b'_'
}

fn q_encode(out: &mut String, prefix: &str, text: &str, first_max: usize) {
    let mut max = first_max;
    let mut current = 0;

    for ch in text.chars() {
        let mut buffer = [0; 4];
        let bytes = ch.encode_utf8(&mut buffer).as_bytes();

        let encoded_len = match bytes {
            [b] if is_q_literal(*b) => 1,
            _ => 3 * bytes.len(),
        };

        // a word holds at least one character.
        if current != 0 && current + encoded_len > max {
            out.push_str("?= ");
            out.push_str(prefix);
            max = Encoding::Q.max_content_len();
            current = 0;
        }

        for b in bytes {
            match *b {
                b' ' => out.push('_'),
                b if is_q_literal(b) => out.push(char::from(b)),
                b => {
                    out.push('=');
                    out.push(char::from(UPPER_HEX[usize::from(b >> 4)]));
                    out.push(char::from(UPPER_HEX[usize::from(b & 0x0f)]));
                }
            }
        }
        current += encoded_len;
    }
}

fn b_encode(out: &mut String, prefix: &str, text: &str, first_max: usize) {
    // Number of raw bytes whose base64 form fits in one word.
    let mut max = first_max / 4 * 3;
    let engine = base64::engine::general_purpose::STANDARD;

    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        if idx != start && idx + ch.len_utf8() - start > max {
            engine.encode_string(&text[start..idx], out);
            out.push_str("?= ");
            out.push_str(prefix);
            max = Encoding::B.max_content_len() / 4 * 3;
            start = idx;
        }
    }
    engine.encode_string(&text[start..], out);
}

/// Decode a single encoded word, such as `=?utf-8?q?caf=C3=A9?=`.
///
/// Returns `None` if `word` is not an encoded word, is malformed, or uses a
/// charset other than utf-8, us-ascii or iso-8859-1.
#[must_use]
pub fn decode(word: &str) -> Option<String> {
    let inner = word.strip_prefix("=?")?.strip_suffix("?=")?;
    let mut parts = inner.splitn(3, '?');
    let (charset, encoding, text) = (parts.next()?, parts.next()?, parts.next()?);

    if text.contains('?') {
        return None;
    }

    // rfc2231 language suffix.
    let charset = charset.split_once('*').map_or(charset, |(charset, _)| charset);

    let bytes = match encoding {
        "q" | "Q" => q_decode(text)?,
        "b" | "B" => base64::engine::general_purpose::STANDARD
            .decode(text)
            .ok()?,
        _ => return None,
    };

    match charset.to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => String::from_utf8(bytes).ok(),
        "us-ascii" | "ascii" => bytes
            .is_ascii()
            .then(|| bytes.into_iter().map(char::from).collect()),
        "iso-8859-1" | "latin1" => Some(bytes.into_iter().map(char::from).collect()),
        _ => None,
    }
}

fn q_decode(text: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    let mut bytes = text.bytes();

    while let Some(b) = bytes.next() {
        match b {
            b'_' => out.push(b' '),
            b'=' => {
                let high = char::from(bytes.next()?).to_digit(16)?;
                let low = char::from(bytes.next()?).to_digit(16)?;
                #[allow(clippy::cast_possible_truncation)]
                out.push((high << 4 | low) as u8);
            }
            b => out.push(b),
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("Síneadh Fada", "=?utf-8?q?S=C3=ADneadh_Fada?=")]
    #[case("a=b?c_d", "=?utf-8?q?a=3Db=3Fc=5Fd?=")]
    #[case("¡Hola, señor!", "=?utf-8?q?=C2=A1Hola,_se=C3=B1or!?=")]
    fn q_encoding(#[case] input: &str, #[case] expected: &str) {
        pretty_assertions::assert_eq!(encode(Encoding::Q, input), expected);
    }

    #[test]
    fn b_encoding() {
        pretty_assertions::assert_eq!(encode(Encoding::B, "Gödel"), "=?utf-8?b?R8O2ZGVs?=");
    }

    #[test]
    fn long_text_is_split_in_words() {
        let text = "é".repeat(40);
        let encoded = encode(Encoding::Q, &text);

        let words = encoded.split(' ').collect::<Vec<_>>();
        assert!(words.len() > 1);
        for word in &words {
            assert!(word.len() <= MAX_ENCODED_WORD_LEN, "{word} is too long");
            // every word is valid on its own, so no character was split.
            assert!(decode(word).is_some(), "{word} is not decodable");
        }
        pretty_assertions::assert_eq!(
            words.iter().map(|w| decode(w).unwrap()).collect::<String>(),
            text
        );

        let encoded = encode(Encoding::B, &text);
        for word in encoded.split(' ') {
            assert!(word.len() <= MAX_ENCODED_WORD_LEN, "{word} is too long");
        }
        pretty_assertions::assert_eq!(
            encoded.split(' ').map(|w| decode(w).unwrap()).collect::<String>(),
            text
        );
    }

    #[rstest::rstest]
    #[case(Encoding::Q, 0)]
    #[case(Encoding::Q, 9)]
    #[case(Encoding::B, 9)]
    #[case(Encoding::Q, 40)]
    #[case(Encoding::B, 60)]
    fn first_word_ends_within_the_line(#[case] encoding: Encoding, #[case] column: usize) {
        let text = "é ".repeat(80);
        let encoded = encode_at(encoding, &text, column);
        let words = encoded.split(' ').collect::<Vec<_>>();

        assert!(column + words[0].len() <= MAX_LINE_LEN, "{} is too long", words[0]);
        for word in &words[1..] {
            assert!(word.len() <= MAX_ENCODED_WORD_LEN, "{word} is too long");
        }
        pretty_assertions::assert_eq!(
            words.iter().map(|w| decode(w).unwrap()).collect::<String>(),
            text
        );
    }

    #[test]
    fn no_room_left_on_the_line() {
        let encoded = encode_at(Encoding::Q, "éé", 77);
        pretty_assertions::assert_eq!(encoded, "=?utf-8?q?=C3=A9?= =?utf-8?q?=C3=A9?=");
    }

    #[rstest::rstest]
    #[case("=?utf-8?q?S=C3=ADneadh_Fada?=", Some("Síneadh Fada"))]
    #[case("=?UTF-8?B?R8O2ZGVs?=", Some("Gödel"))]
    #[case("=?iso-8859-1?q?caf=E9?=", Some("café"))]
    #[case("=?us-ascii*en?q?plain?=", Some("plain"))]
    #[case("=?koi8-r?q?abc?=", None)]
    #[case("=?utf-8?x?abc?=", None)]
    #[case("=?utf-8?q?bad=Z1?=", None)]
    #[case("plain", None)]
    fn decoding(#[case] input: &str, #[case] expected: Option<&str>) {
        pretty_assertions::assert_eq!(decode(input).as_deref(), expected);
    }
}
