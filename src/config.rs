//! Run configuration.
//!
//! A conversion run is described by a small TOML document:
//!
//! ```toml
//! data_source = "FlyBase"
//! data_set = "FlyBase Drosophila melanogaster genes"
//! taxon_id = "7227"
//! identifier_namespace = 1
//! ```
//!
//! Every field is optional. When both `data_source` and `data_set` are set,
//! every item stored during the run is attached to that data set (see
//! [`crate::convert::DataSetHook`]).

use crate::error::{LoaderError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Name of the data source every item comes from
    pub data_source: Option<String>,
    /// Title of the data set every item belongs to
    pub data_set: Option<String>,
    /// NCBI taxonomy id of the organism being loaded
    pub taxon_id: Option<String>,
    /// Prefix of generated item identifiers
    pub identifier_namespace: u32,
}

impl LoaderConfig {
    /// Parses and validates a TOML document.
    ///
    /// ```
    /// use gffload::LoaderConfig;
    ///
    /// let config = LoaderConfig::from_toml_str(r#"
    ///     data_source = "FlyBase"
    ///     data_set = "FlyBase genes"
    /// "#)?;
    /// assert_eq!(config.default_data_set(), Some(("FlyBase", "FlyBase genes")));
    /// assert_eq!(config.identifier_namespace, 0);
    /// # Ok::<(), gffload::LoaderError>(())
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: LoaderConfig =
            toml::from_str(s).map_err(|e| LoaderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: LoaderConfig = toml::from_str(&text)
            .map_err(|e| LoaderError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the default data source and data set come as a pair.
    pub fn validate(&self) -> Result<()> {
        match (non_empty(&self.data_source), non_empty(&self.data_set)) {
            (Some(_), None) => Err(LoaderError::Config(
                "data_source is set but data_set is not".to_string(),
            )),
            (None, Some(_)) => Err(LoaderError::Config(
                "data_set is set but data_source is not".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// `(data source name, data set title)` when both are set.
    pub fn default_data_set(&self) -> Option<(&str, &str)> {
        Some((non_empty(&self.data_source)?, non_empty(&self.data_set)?))
    }

    /// Taxon id of the default organism, if set.
    pub fn default_taxon_id(&self) -> Option<&str> {
        non_empty(&self.taxon_id)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
