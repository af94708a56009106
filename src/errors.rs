// (C) Copyright IBM Corp. 2024.
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

use std::sync::PoisonError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot acquire configuration lock")]
    CannotAcquireLock,

    #[error("Feature `{feature_id}` not found.")]
    FeatureNotFound { feature_id: String },

    #[error("Environment '{environment_id}' not found in the configuration")]
    EnvironmentNotFound { environment_id: String },

    #[error("File '{path}' doesn't exist or cannot be read")]
    CannotReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    DeserializationError(#[from] DeserializationError),

    #[error(transparent)]
    ConfigurationError(#[from] ConfigurationError),

    #[error("Value type mismatch")]
    MismatchType,
}

impl<T> From<PoisonError<T>> for Error {
    fn from(_value: PoisonError<T>) -> Self {
        Error::CannotAcquireLock
    }
}

/// An error that can be returned when deserializing data.
#[derive(Debug, Error)]
#[error("Cannot deserialize {string}: {source}")]
pub struct DeserializationError {
    pub string: String,
    pub source: DeserializationErrorKind,
}

/// Additional information for [`DeserializationError`] error
#[derive(Debug, Error)]
pub enum DeserializationErrorKind {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// A problem with the definition of a single feature.
///
/// These errors are found while loading a configuration. They never abort the
/// load: the offending feature is kept as rejected and evaluates disabled for
/// every entity, while the rest of the configuration stays usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Feature '{feature_id}' has no 'enabled' switch")]
    MissingEnabled { feature_id: String },

    #[error("Feature '{feature_id}': 'enabled' must be a boolean, got {value}")]
    InvalidEnabled { feature_id: String, value: String },

    #[error("Feature '{feature_id}': rollout percentage {value} is outside [0, 100]")]
    RolloutPercentageOutOfRange { feature_id: String, value: String },

    #[error("Feature '{feature_id}': rollout percentage must be a number, got {value}")]
    InvalidRolloutPercentage { feature_id: String, value: String },

    #[error("Feature '{feature_id}': allowed users must be a list of strings, got {value}")]
    InvalidAllowedUsers { feature_id: String, value: String },

    #[error("Feature '{feature_id}': dependencies must be a list of strings, got {value}")]
    InvalidDependencies { feature_id: String, value: String },

    #[error("Feature '{feature_id}': value must be a boolean, number or string, got {value}")]
    UnsupportedValue { feature_id: String, value: String },

    #[error("Feature '{feature_id}' is part of a dependency cycle: {}", .path.join(" -> "))]
    DependencyCycle {
        feature_id: String,
        path: Vec<String>,
    },
}

impl ConfigurationError {
    /// The feature this error was reported for.
    pub fn feature_id(&self) -> &str {
        match self {
            Self::MissingEnabled { feature_id }
            | Self::InvalidEnabled { feature_id, .. }
            | Self::RolloutPercentageOutOfRange { feature_id, .. }
            | Self::InvalidRolloutPercentage { feature_id, .. }
            | Self::InvalidAllowedUsers { feature_id, .. }
            | Self::InvalidDependencies { feature_id, .. }
            | Self::UnsupportedValue { feature_id, .. }
            | Self::DependencyCycle { feature_id, .. } => feature_id,
        }
    }
}
