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

use std::{collections::HashMap, str::FromStr};
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Logs {
    /// Customize the log level of the different part of the program, by
    /// target (`"ordered_headers": "debug"`).
    ///
    /// See <https://docs.rs/tracing-subscriber/0.3.17/tracing_subscriber/filter/targets/struct.Targets.html>
    #[serde(
        default,
        serialize_with = "Logs::serialize_levels",
        deserialize_with = "Logs::deserialize_levels"
    )]
    pub levels: HashMap<String, LevelFilter>,
    /// Level of the targets not listed in `levels`.
    #[serde(
        default = "Logs::default_level",
        serialize_with = "Logs::serialize_level",
        deserialize_with = "Logs::deserialize_level"
    )]
    pub default_level: LevelFilter,
}

impl Logs {
    const fn default_level() -> LevelFilter {
        LevelFilter::WARN
    }

    /// Filter built from the configured levels.
    #[must_use]
    pub fn targets(&self) -> tracing_subscriber::filter::Targets {
        tracing_subscriber::filter::Targets::new()
            .with_targets(self.levels.clone())
            .with_default(self.default_level)
    }

    fn parse_level<E: serde::de::Error>(level: &str) -> Result<LevelFilter, E> {
        LevelFilter::from_str(level)
            .map_err(|e| E::custom(format!("Failed to parse log level: `{e}`")))
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    fn serialize_level<S: serde::Serializer>(
        value: &LevelFilter,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    fn deserialize_level<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Self::parse_level(&<String as serde::Deserialize>::deserialize(deserializer)?)
    }

    fn serialize_levels<S: serde::Serializer>(
        value: &HashMap<String, LevelFilter>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut x = serializer.serialize_map(Some(value.len()))?;
        for i in value {
            serde::ser::SerializeMap::serialize_entry(&mut x, &i.0, &i.1.to_string())?;
        }
        serde::ser::SerializeMap::end(x)
    }

    fn deserialize_levels<'de, D>(deserializer: D) -> Result<HashMap<String, LevelFilter>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <HashMap<String, String> as serde::Deserialize>::deserialize(deserializer)?
            .into_iter()
            .map(|(target, level)| Self::parse_level(&level).map(|level| (target, level)))
            .collect()
    }
}

impl Default for Logs {
    fn default() -> Self {
        Self {
            levels: HashMap::new(),
            default_level: Self::default_level(),
        }
    }
}
