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

pub mod error;
pub mod logs;

pub use error::ConfigError;
pub use logs::Logs;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, error::ConfigError>;

/// Getters for base configuration structures.
pub trait Config: serde::Serialize + serde::de::DeserializeOwned + Sized {
    /// Create a default configuration, as if it was read from `path`.
    fn with_path(path: &impl AsRef<std::path::Path>) -> ConfigResult<Self>;

    /// Create a configuration structure from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON file to create the configuration from.
    fn from_json_file(path: &impl AsRef<std::path::Path>) -> ConfigResult<Self> {
        let path_ref = path.as_ref();

        let json = std::fs::read_to_string(path_ref)
            .map_err(|error| error::ConfigError::FileOpen(path_ref.into(), error))?;

        Self::from_json_str(path, json)
    }

    /// Create a configuration structure from a JSON document. Missing fields
    /// take their default value.
    ///
    /// # Arguments
    ///
    /// * `path` - Path the document was read from.
    /// * `json` - The JSON document.
    fn from_json_str(
        path: &impl AsRef<std::path::Path>,
        json: impl AsRef<str>,
    ) -> ConfigResult<Self> {
        let mut cfg = serde_json::Deserializer::from_str(json.as_ref());
        let mut cfg: Self = serde_path_to_error::deserialize(&mut cfg)?;
        cfg.set_path(path.as_ref());
        Ok(cfg)
    }

    /// Log configuration for this specific service.
    fn logs(&self) -> &logs::Logs;

    /// Path on disk of the configuration file.
    fn path(&self) -> &std::path::Path;

    /// Record where the configuration was read from.
    fn set_path(&mut self, path: &std::path::Path);
}
