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

use ordered_headers::{Kv, Options};
use ordered_headers_config::{logs, Config, ConfigResult, Logs};

pub mod cli;

/// Configuration of the header formatter.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FmtConfig {
    /// How the header block is written.
    #[serde(default)]
    pub options: Options,
    /// Collapse the whitespace of every value.
    #[serde(default)]
    pub normalize: bool,
    /// Fields removed from the message.
    #[serde(default)]
    pub remove: Vec<String>,
    /// Standard fields set in the message, replacing the existing ones.
    #[serde(default)]
    pub set: Vec<Kv>,
    /// Reject messages without the mandatory fields.
    #[serde(default)]
    pub check_mandatory: bool,
    /// logging configuration.
    #[serde(default)]
    pub logs: Logs,
    /// Path to the configuration file.
    #[serde(skip)]
    pub path: std::path::PathBuf,
}

impl Config for FmtConfig {
    #[allow(clippy::field_reassign_with_default)]
    fn with_path(path: &impl AsRef<std::path::Path>) -> ConfigResult<Self>
    where
        Self: Config + serde::de::DeserializeOwned + serde::Serialize,
    {
        let mut config = Self::default();
        config.path = path.as_ref().into();

        Ok(config)
    }

    fn logs(&self) -> &logs::Logs {
        &self.logs
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn set_path(&mut self, path: &std::path::Path) {
        self.path = path.into();
    }
}
