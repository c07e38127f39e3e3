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

//! Mailbox and address list parsing.
//!
//! <https://www.rfc-editor.org/rfc/rfc5322#section-3.4>

use crate::encoded_word::{self, Encoding};

/// A single mailbox, such as `"Jane Doe" <jane@example.com>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Address {
    /// Display name, empty if there is none.
    pub name: String,
    /// `local-part@domain`, without angle brackets.
    pub address: String,
}

/// The input is not a valid mailbox or address list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason} (at offset {offset})")]
pub struct AddressError {
    /// What went wrong.
    pub reason: String,
    /// Byte offset in the input where parsing stopped.
    pub offset: usize,
}

/// Parse exactly one mailbox.
pub fn parse_address(input: &str) -> Result<Address, AddressError> {
    let mut parser = Parser::new(input);
    let mut addresses = parser.address(true)?;
    parser.skip_cfws()?;

    if !parser.is_empty() {
        return Err(parser.error(format!("expected single address, got {:?}", parser.rest())));
    }

    match addresses.len() {
        0 => Err(parser.error("empty group")),
        1 => Ok(addresses.remove(0)),
        _ => Err(parser.error("group with multiple addresses")),
    }
}

/// Parse a comma separated list of mailboxes. Groups are flattened.
pub fn parse_address_list(input: &str) -> Result<Vec<Address>, AddressError> {
    let mut parser = Parser::new(input);
    let mut list = vec![];

    loop {
        parser.skip_space();
        // obs-addr-list allows empty entries.
        if parser.consume(',') {
            continue;
        }

        list.extend(parser.address(true)?);
        parser.skip_cfws()?;

        if parser.is_empty() {
            break;
        }
        if parser.peek() != Some(',') {
            return Err(parser.error("expected comma"));
        }
        while parser.consume(',') {
            parser.skip_space();
        }
        if parser.is_empty() {
            break;
        }
    }

    Ok(list)
}

const fn is_vchar(c: char) -> bool {
    matches!(c, '!'..='~') || !c.is_ascii()
}

const fn is_wsp(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_atext(c: char, dot: bool) -> bool {
    match c {
        '.' => dot,
        '(' | ')' | '<' | '>' | '[' | ']' | ':' | ';' | '@' | '\\' | ',' | '"' => false,
        c => is_vchar(c),
    }
}

fn is_qtext(c: char) -> bool {
    c != '\\' && c != '"' && is_vchar(c)
}

fn is_dtext(c: char) -> bool {
    c != '[' && c != ']' && c != '\\' && matches!(c, '!'..='~')
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn consume(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn error(&self, reason: impl Into<String>) -> AddressError {
        AddressError {
            reason: reason.into(),
            offset: self.pos,
        }
    }

    fn skip_space(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start_matches(is_wsp).len();
    }

    fn skip_cfws(&mut self) -> Result<(), AddressError> {
        self.skip_space();
        while self.consume('(') {
            self.comment()?;
            self.skip_space();
        }
        Ok(())
    }

    /// Content of a comment, the opening parenthesis being already consumed.
    fn comment(&mut self) -> Result<String, AddressError> {
        let mut depth = 1;
        let mut comment = String::new();
        let mut chars = self.rest().chars();

        while let Some(c) = chars.next() {
            self.pos += c.len_utf8();
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        self.pos += escaped.len_utf8();
                        comment.push(escaped);
                    }
                }
                '(' => {
                    depth += 1;
                    comment.push(c);
                }
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(comment);
                    }
                    comment.push(c);
                }
                c => comment.push(c),
            }
        }

        Err(self.error("misformatted parenthetical comment"))
    }

    /// address = mailbox / group
    fn address(&mut self, handle_group: bool) -> Result<Vec<Address>, AddressError> {
        self.skip_space();
        if self.is_empty() {
            return Err(self.error("no address"));
        }

        // addr-spec is more restrictive than name-addr, try it first.
        if let Some(address) = self.addr_spec_or_rewind() {
            self.skip_space();
            let name = if self.consume('(') {
                self.display_name_comment()?
            } else {
                String::new()
            };
            return Ok(vec![Address { name, address }]);
        }

        let name = if self.peek() == Some('<') {
            String::new()
        } else {
            self.phrase()?
        };
        self.skip_space();

        if handle_group && self.consume(':') {
            return self.group_list();
        }

        if !self.consume('<') {
            return Err(if name.chars().all(|c| is_atext(c, true)) {
                self.error("missing '@' or angle-addr")
            } else {
                self.error("no angle-addr")
            });
        }

        let address = self.addr_spec()?;
        if !self.consume('>') {
            return Err(self.error("unclosed angle-addr"));
        }

        Ok(vec![Address { name, address }])
    }

    fn group_list(&mut self) -> Result<Vec<Address>, AddressError> {
        let mut group = vec![];

        self.skip_space();
        if self.consume(';') {
            self.skip_cfws()?;
            return Ok(group);
        }

        loop {
            self.skip_space();
            group.extend(self.address(false)?);
            self.skip_cfws()?;

            if self.consume(';') {
                self.skip_cfws()?;
                return Ok(group);
            }
            if !self.consume(',') {
                return Err(self.error("expected comma"));
            }
        }
    }

    fn addr_spec_or_rewind(&mut self) -> Option<String> {
        let pos = self.pos;
        self.addr_spec().ok().or_else(|| {
            self.pos = pos;
            None
        })
    }

    /// addr-spec = local-part "@" domain
    fn addr_spec(&mut self) -> Result<String, AddressError> {
        self.skip_space();
        let local_part = match self.peek() {
            None => return Err(self.error("no addr-spec")),
            Some('"') => {
                let local_part = self.quoted_string()?;
                if local_part.is_empty() {
                    return Err(self.error("empty quoted-string in addr-spec"));
                }
                local_part
            }
            Some(_) => self.atom(true, false)?.to_string(),
        };

        if !self.consume('@') {
            return Err(self.error("missing @ in addr-spec"));
        }

        self.skip_space();
        let domain = match self.peek() {
            None => return Err(self.error("no domain in addr-spec")),
            Some('[') => self.domain_literal()?,
            Some(_) => self.atom(true, false)?.to_string(),
        };

        Ok(format!("{local_part}@{domain}"))
    }

    fn atom(&mut self, dot: bool, permissive: bool) -> Result<&'a str, AddressError> {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find_map(|(idx, c)| (!is_atext(c, dot)).then_some(idx))
            .unwrap_or(rest.len());

        if len == 0 {
            return Err(self.error("invalid string"));
        }

        let atom = &rest[..len];
        if !permissive {
            if atom.starts_with('.') {
                return Err(self.error("leading dot in atom"));
            }
            if atom.contains("..") {
                return Err(self.error("double dot in atom"));
            }
            if atom.ends_with('.') {
                return Err(self.error("trailing dot in atom"));
            }
        }

        self.pos += len;
        Ok(atom)
    }

    /// Content of a quoted string, escapes resolved.
    fn quoted_string(&mut self) -> Result<String, AddressError> {
        let start = self.pos;
        if !self.consume('"') {
            return Err(self.error("missing quote"));
        }

        let mut out = String::new();
        let mut escaped = false;

        for c in self.rest().chars() {
            match c {
                c if escaped => {
                    if !is_vchar(c) && !is_wsp(c) {
                        return Err(self.error(format!("bad character in quoted-string: {c:?}")));
                    }
                    out.push(c);
                    escaped = false;
                }
                '"' => {
                    self.pos += 1;
                    return Ok(out);
                }
                '\\' => escaped = true,
                c if is_qtext(c) || is_wsp(c) => out.push(c),
                c => return Err(self.error(format!("bad character in quoted-string: {c:?}"))),
            }
            self.pos += c.len_utf8();
        }

        self.pos = start;
        Err(self.error("unclosed quoted-string"))
    }

    fn domain_literal(&mut self) -> Result<String, AddressError> {
        if !self.consume('[') {
            return Err(self.error("missing \"[\" in domain-literal"));
        }

        let rest = self.rest();
        let Some(end) = rest.find(']') else {
            return Err(self.error("unclosed domain-literal"));
        };

        let dtext = &rest[..end];
        if let Some(c) = dtext.chars().find(|c| !is_dtext(*c)) {
            return Err(self.error(format!("bad character in domain-literal: {c:?}")));
        }

        let ip = dtext.strip_prefix("IPv6:").unwrap_or(dtext);
        if ip.parse::<std::net::IpAddr>().is_err() {
            return Err(self.error(format!("invalid IP address in domain-literal: {dtext:?}")));
        }

        self.pos += end + 1;
        Ok(format!("[{dtext}]"))
    }

    /// A display name given as a trailing comment: `jane@example.com (Jane)`.
    fn display_name_comment(&mut self) -> Result<String, AddressError> {
        let comment = self.comment()?;

        Ok(comment
            .split(is_wsp)
            .filter(|word| !word.is_empty())
            .map(|word| encoded_word::decode(word).unwrap_or_else(|| word.to_string()))
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// phrase = 1*word, word = atom / quoted-string
    ///
    /// Adjacent encoded words are joined without space.
    fn phrase(&mut self) -> Result<String, AddressError> {
        let mut words: Vec<String> = vec![];
        let mut previous_encoded = false;
        let mut first_error = None;

        loop {
            if !words.is_empty() {
                self.skip_cfws()?;
            }
            self.skip_space();
            if self.is_empty() {
                break;
            }

            let (word, encoded) = if self.peek() == Some('"') {
                match self.quoted_string() {
                    Ok(word) => (word, false),
                    Err(error) => {
                        first_error = Some(error);
                        break;
                    }
                }
            } else {
                // obs-phrase, dots are allowed.
                match self.atom(true, true) {
                    Ok(atom) => encoded_word::decode(atom)
                        .map_or_else(|| (atom.to_string(), false), |decoded| (decoded, true)),
                    Err(error) => {
                        first_error = Some(error);
                        break;
                    }
                }
            };

            match words.last_mut() {
                Some(last) if previous_encoded && encoded => last.push_str(&word),
                _ => words.push(word),
            }
            previous_encoded = encoded;
        }

        match first_error {
            Some(error) if words.is_empty() => Err(AddressError {
                reason: format!("missing word in phrase: {}", error.reason),
                offset: error.offset,
            }),
            _ => Ok(words.join(" ")),
        }
    }
}

fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if is_qtext(c) || is_wsp(c) {
            out.push(c);
        } else if is_vchar(c) {
            out.push('\\');
            out.push(c);
        }
    }
    out.push('"');
    out
}

impl std::fmt::Display for Address {
    /// Canonical rendering, always with angle brackets.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (local, domain) = self
            .address
            .rsplit_once('@')
            .unwrap_or((self.address.as_str(), ""));

        // dots are fine as long as they are surrounded by atext.
        let dot_atom = !local.is_empty()
            && !local.starts_with('.')
            && !local.ends_with('.')
            && !local.contains("..")
            && local.chars().all(|c| is_atext(c, true));

        if !self.name.is_empty() {
            let printable = self
                .name
                .chars()
                .all(|c| c.is_ascii() && (is_vchar(c) || is_wsp(c)));

            if printable {
                f.write_str(&quote_string(&self.name))?;
            } else if self
                .name
                .contains(|c: char| "\"#$%&'(),.:;<>@[]^`{|}~".contains(c))
            {
                f.write_str(&encoded_word::encode(Encoding::B, &self.name))?;
            } else {
                f.write_str(&encoded_word::encode(Encoding::Q, &self.name))?;
            }
            f.write_str(" ")?;
        }

        if dot_atom {
            write!(f, "<{local}@{domain}>")
        } else {
            write!(f, "<{}@{domain}>", quote_string(local))
        }
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(name: &str, address: &str) -> Address {
        Address {
            name: name.to_string(),
            address: address.to_string(),
        }
    }

    #[rstest::rstest]
    #[case("jdoe@machine.example", address("", "jdoe@machine.example"))]
    #[case("<jdoe@machine.example>", address("", "jdoe@machine.example"))]
    #[case("John Doe <jdoe@machine.example>", address("John Doe", "jdoe@machine.example"))]
    #[case(r#""Joe Q. Public" <john.q.public@example.com>"#, address("Joe Q. Public", "john.q.public@example.com"))]
    #[case(r#""Giant; \"Big\" Box" <sysservices@example.net>"#, address(r#"Giant; "Big" Box"#, "sysservices@example.net"))]
    #[case("Pete(A nice \\) chap) <pete@silly.test>", address("Pete", "pete@silly.test"))]
    #[case("jdoe@machine.example (John Doe)", address("John Doe", "jdoe@machine.example"))]
    #[case("=?utf-8?q?J=C3=B6rg?= <joerg@example.com>", address("Jörg", "joerg@example.com"))]
    #[case("=?utf-8?q?J=C3=B6?= =?utf-8?q?rg?= <joerg@example.com>", address("Jörg", "joerg@example.com"))]
    #[case(r#""john doe"@example.com"#, address("", "john doe@example.com"))]
    #[case("admin@[192.168.0.1]", address("", "admin@[192.168.0.1]"))]
    #[case("Group: one@example.com;", address("", "one@example.com"))]
    fn parse_single(#[case] input: &str, #[case] expected: Address) {
        pretty_assertions::assert_eq!(parse_address(input).unwrap(), expected);
    }

    #[rstest::rstest]
    #[case("")]
    #[case("John Doe")]
    #[case("john.doe")]
    #[case("<jdoe@machine.example")]
    #[case("jdoe@")]
    #[case("a@b, c@d")]
    #[case("Group: a@b.c, d@e.f;")]
    #[case("Empty:;")]
    #[case("\"unclosed@example.com")]
    #[case("jdoe@machine..example")]
    #[case("admin@[not.an.ip]")]
    #[case("a@b (unclosed")]
    fn parse_single_fails(#[case] input: &str) {
        assert!(parse_address(input).is_err(), "{input:?} should be rejected");
    }

    #[test]
    fn parse_list() {
        pretty_assertions::assert_eq!(
            parse_address_list(
                "Mary Smith <mary@x.test>, jdoe@example.org, Who? <one@y.test>,, \
                 A Group:Ed Jones <c@a.test>,joe@where.test,John <jdoe@one.test>;, Undisclosed recipients:;"
            )
            .unwrap(),
            vec![
                address("Mary Smith", "mary@x.test"),
                address("", "jdoe@example.org"),
                address("Who?", "one@y.test"),
                address("Ed Jones", "c@a.test"),
                address("", "joe@where.test"),
                address("John", "jdoe@one.test"),
            ]
        );
    }

    #[rstest::rstest]
    #[case("")]
    #[case("a@b.c d@e.f")]
    #[case("a@b.c, John Doe")]
    fn parse_list_fails(#[case] input: &str) {
        assert!(parse_address_list(input).is_err(), "{input:?} should be rejected");
    }

    #[rstest::rstest]
    #[case(address("", "bob@example.com"), "<bob@example.com>")]
    #[case(address("Steve", "steve@blighty.com"), r#""Steve" <steve@blighty.com>"#)]
    #[case(address(r#"Giant; "Big" Box"#, "sysservices@example.net"), r#""Giant; \"Big\" Box" <sysservices@example.net>"#)]
    #[case(address("", "john doe@example.com"), r#"<"john doe"@example.com>"#)]
    #[case(address("", ".dot@example.com"), r#"<".dot"@example.com>"#)]
    #[case(address("Jörg", "joerg@example.com"), "=?utf-8?q?J=C3=B6rg?= <joerg@example.com>")]
    #[case(address("Jörg, admin", "joerg@example.com"), "=?utf-8?b?SsO2cmcsIGFkbWlu?= <joerg@example.com>")]
    fn display(#[case] input: Address, #[case] expected: &str) {
        pretty_assertions::assert_eq!(input.to_string(), expected);
    }

    #[test]
    fn display_parses_back() {
        for input in [
            r#""Giant; \"Big\" Box" <sysservices@example.net>"#,
            "Jörg <joerg@example.com>",
            r#""john doe"@example.com"#,
        ] {
            let parsed = parse_address(input).unwrap();
            pretty_assertions::assert_eq!(parse_address(&parsed.to_string()).unwrap(), parsed);
        }
    }
}
