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

/// Parse a `date-time` of <https://www.rfc-editor.org/rfc/rfc5322#section-3.3>,
/// such as `Fri, 21 Nov 1997 09:55:06 -0600`.
///
/// A trailing comment, as in `... +0000 (UTC)`, is ignored.
pub fn parse_date(value: &str) -> Result<time::OffsetDateTime, time::error::Parse> {
    let value = value.trim();
    let value = match value.rfind('(') {
        Some(idx) if value.ends_with(')') => value[..idx].trim_end(),
        _ => value,
    };

    time::OffsetDateTime::parse(value, &time::format_description::well_known::Rfc2822)
}
