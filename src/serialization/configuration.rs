// (C) Copyright IBM Corp. 2025.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::FeatureJson;
use crate::errors::{DeserializationError, DeserializationErrorKind, Error, Result};

/// Feature entries of one environment.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct EnvironmentJson {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub features: BTreeMap<String, FeatureJson>,
}

/// Feature flag configuration in a structure intended for data exchange
/// (JSON or YAML encoded).
///
/// Top level `features` are shared by all environments; an entry under
/// `environments.<id>.features` overrides the shared entry field by field.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ConfigurationJson {
    #[serde(default)]
    pub features: BTreeMap<String, FeatureJson>,
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentJson>,
}

impl ConfigurationJson {
    /// Parses a ConfigurationJson from a file. Files ending in `.yaml` or
    /// `.yml` are read as YAML, everything else as JSON.
    pub fn from_file(filepath: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(filepath).map_err(|e| Error::CannotReadFile {
            path: filepath.display().to_string(),
            source: e,
        })?;

        let is_yaml = filepath
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        let parsed = if is_yaml {
            serde_yaml::from_str(&content).map_err(DeserializationErrorKind::from)
        } else {
            serde_json::from_str(&content).map_err(DeserializationErrorKind::from)
        };

        parsed.map_err(|source| {
            Error::DeserializationError(DeserializationError {
                string: format!("configuration from file '{}'", filepath.display()),
                source,
            })
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            Error::DeserializationError(DeserializationError {
                string: "JSON configuration".to_string(),
                source: e.into(),
            })
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            Error::DeserializationError(DeserializationError {
                string: "YAML configuration".to_string(),
                source: e.into(),
            })
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use rstest::*;
    use std::path::PathBuf;

    #[fixture]
    // Provides the path to the YAML example shipped with the crate
    pub(crate) fn example_configuration_yaml_path() -> PathBuf {
        let mut mocked_data = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        mocked_data.push("data/lattice-features.yaml");
        mocked_data
    }

    #[fixture]
    pub(crate) fn example_configuration_json_path() -> PathBuf {
        let mut mocked_data = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        mocked_data.push("data/lattice-features.json");
        mocked_data
    }

    #[fixture]
    pub(crate) fn example_configuration(
        example_configuration_yaml_path: PathBuf,
    ) -> ConfigurationJson {
        ConfigurationJson::from_file(&example_configuration_yaml_path).unwrap()
    }
}
