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
    address::{parse_address_list, Address},
    date::parse_date,
    name::canonical_key,
    registry::{self, DATE_HEADER},
    validate::check_header,
    HeaderError, HeaderResult, SyntaxError,
};

/// ASCII whitespace and the Unicode space separators (`Zs`).
const fn is_normalized_space(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t'
            | '\x0b'
            | '\x0c'
            | '\r'
            | '\n'
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
    )
}

/// A single header field.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Kv {
    /// Name of the field, canonical once stored in a [`Header`].
    pub key: String,
    /// Raw value, unfolded.
    pub value: String,
}

impl Kv {
    /// Create a field, canonicalizing its name.
    pub fn new(key: impl AsRef<str>, value: impl Into<String>) -> Self {
        Self {
            key: canonical_key(key.as_ref()),
            value: value.into(),
        }
    }
}

/// Header block of a message.
///
/// We use `Vec` instead of a `HashMap` because the order of the fields and
/// their duplicates must be kept.
/// <https://www.rfc-editor.org/rfc/rfc5322#section-3.6>
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(from = "Vec<Kv>", into = "Vec<Kv>")]
pub struct Header(Vec<Kv>);

impl From<Vec<Kv>> for Header {
    fn from(fields: Vec<Kv>) -> Self {
        fields.into_iter().collect()
    }
}

impl From<Header> for Vec<Kv> {
    fn from(value: Header) -> Self {
        value.0
    }
}

impl FromIterator<Kv> for Header {
    fn from_iter<T: IntoIterator<Item = Kv>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|Kv { key, value }| Kv::new(key, value))
                .collect(),
        )
    }
}

impl std::ops::Deref for Header {
    type Target = [Kv];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Header {
    type Item = &'a Kv;
    type IntoIter = std::slice::Iter<'a, Kv>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Header {
    /// An empty header block.
    #[must_use]
    pub const fn new() -> Self {
        Self(vec![])
    }

    /// Append a field, whatever its name and value.
    pub fn add(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.0.push(Kv::new(key, value));
    }

    /// Set a standard field, replacing the first field with the same name or
    /// appending it if there is none.
    ///
    /// Only the fields of the registry are accepted. A non-empty value is
    /// checked against the grammar of the field.
    #[tracing::instrument(level = "trace", skip(self, value), err)]
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> HeaderResult<()> {
        let key = canonical_key(key);
        let value = value.into();

        let Some(syntax) = registry::lookup(&key) else {
            return Err(HeaderError::UnknownHeader { key });
        };

        if !value.is_empty() {
            if let Err(source) = check_header(syntax.header_type, &value) {
                return Err(HeaderError::InvalidValue { key, source });
            }
        }

        match self.0.iter_mut().find(|kv| kv.key == key) {
            Some(kv) => kv.value = value,
            None => self.0.push(Kv { key, value }),
        }

        Ok(())
    }

    /// First value of a field, or an empty string if absent.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.get_all(key).next().unwrap_or_default()
    }

    /// Every value of a field, in order.
    pub fn get_all<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> + 'a {
        let key = canonical_key(key);
        self.0
            .iter()
            .filter(move |kv| kv.key == key)
            .map(|kv| kv.value.as_str())
    }

    /// Number of occurrences of a field.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        self.get_all(key).count()
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.get_all(key).next().is_some()
    }

    /// Remove every occurrence of a field.
    pub fn remove_all(&mut self, key: &str) {
        let key = canonical_key(key);
        self.0.retain(|kv| kv.key != key);
    }

    /// Collapse every run of whitespace of every value to a single space,
    /// and trim the values.
    pub fn normalize(&mut self) {
        for kv in &mut self.0 {
            kv.value = kv
                .value
                .split(is_normalized_space)
                .filter(|word| !word.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
        }
    }

    /// Copy the fields in a map, grouping the values by name.
    #[must_use]
    pub fn to_map(&self) -> HeaderMap {
        let mut map = HeaderMap::default();
        for Kv { key, value } in &self.0 {
            map.add(key, value.clone());
        }
        map
    }

    /// Parse the first value of a field as an address list.
    pub fn address_list(&self, key: &str) -> HeaderResult<Vec<Address>> {
        let value = self.get(key);
        if value.is_empty() {
            return Err(HeaderError::NotPresent {
                key: canonical_key(key),
            });
        }

        parse_address_list(value).map_err(|source| HeaderError::InvalidValue {
            key: canonical_key(key),
            source: SyntaxError::InvalidAddressList {
                value: value.to_string(),
                source,
            },
        })
    }

    /// Parse the `Date` field.
    pub fn date(&self) -> HeaderResult<time::OffsetDateTime> {
        let value = self.get(DATE_HEADER);
        if value.is_empty() {
            return Err(HeaderError::NotPresent {
                key: DATE_HEADER.to_string(),
            });
        }

        parse_date(value).map_err(|source| HeaderError::InvalidValue {
            key: DATE_HEADER.to_string(),
            source: SyntaxError::InvalidDate {
                value: value.to_string(),
                source,
            },
        })
    }

    /// Fail on the first field required in every message which is missing.
    pub fn check_mandatory(&self) -> HeaderResult<()> {
        match registry::required().find(|name| !self.has(name)) {
            Some(name) => Err(HeaderError::MandatoryHeaderNotFound(name.to_string())),
            None => Ok(()),
        }
    }
}

/// Values of a header block grouped by field name.
///
/// Lookups are case insensitive, the values of a field keep their order.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(from = "std::collections::HashMap<String, Vec<String>>")]
pub struct HeaderMap(std::collections::HashMap<String, Vec<String>>);

impl From<std::collections::HashMap<String, Vec<String>>> for HeaderMap {
    fn from(fields: std::collections::HashMap<String, Vec<String>>) -> Self {
        let mut map = Self::default();
        for (key, values) in fields {
            for value in values {
                map.add(&key, value);
            }
        }
        map
    }
}

impl HeaderMap {
    /// Append a value to a field.
    pub fn add(&mut self, key: &str, value: impl Into<String>) {
        self.0
            .entry(canonical_key(key))
            .or_default()
            .push(value.into());
    }

    /// First value of a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// Every value of a field, in order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.0
            .get(&canonical_key(key))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of distinct fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields and their values, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
