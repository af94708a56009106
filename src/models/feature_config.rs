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

use crate::errors::ConfigurationError;
use crate::serialization::{ConfigValue, FeatureJson};
use crate::Value;

/// Validated activation policy of one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    pub(crate) feature_id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) enabled: bool,
    pub(crate) rollout_percentage: Option<u32>,
    pub(crate) allowed_users: Vec<String>,
    pub(crate) value: Option<Value>,
    pub(crate) dependencies: Vec<String>,
}

impl FeatureConfig {
    /// A feature with only the master switch set. Its name defaults to the id.
    pub fn new(feature_id: impl Into<String>, enabled: bool) -> Self {
        let feature_id = feature_id.into();
        Self {
            name: feature_id.clone(),
            feature_id,
            description: None,
            enabled,
            rollout_percentage: None,
            allowed_users: Vec::new(),
            value: None,
            dependencies: Vec::new(),
        }
    }

    /// Sets the percentage gate. Values above 100 are rejected.
    pub fn with_rollout_percentage(
        mut self,
        rollout_percentage: u32,
    ) -> Result<Self, ConfigurationError> {
        if rollout_percentage > 100 {
            return Err(ConfigurationError::RolloutPercentageOutOfRange {
                feature_id: self.feature_id,
                value: rollout_percentage.to_string(),
            });
        }
        self.rollout_percentage = Some(rollout_percentage);
        Ok(self)
    }

    pub fn with_allowed_users<I, S>(mut self, allowed_users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_users = allowed_users.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn feature_id(&self) -> &str {
        &self.feature_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn rollout_percentage(&self) -> Option<u32> {
        self.rollout_percentage
    }

    pub fn allowed_users(&self) -> &[String] {
        &self.allowed_users
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

impl TryFrom<(String, FeatureJson)> for FeatureConfig {
    type Error = ConfigurationError;

    fn try_from(value: (String, FeatureJson)) -> Result<Self, Self::Error> {
        let (feature_id, json) = value;

        let enabled = match json.enabled {
            None => return Err(ConfigurationError::MissingEnabled { feature_id }),
            Some(enabled) => enabled.as_boolean().ok_or_else(|| {
                ConfigurationError::InvalidEnabled {
                    feature_id: feature_id.clone(),
                    value: enabled.to_string(),
                }
            })?,
        };

        let rollout_percentage = json
            .rollout_percentage
            .filter(|v| !v.is_null())
            .map(|v| parse_rollout_percentage(&feature_id, &v))
            .transpose()?;

        let allowed_users = json
            .allowed_users
            .filter(|v| !v.is_null())
            .map(|v| {
                v.as_string_list()
                    .ok_or_else(|| ConfigurationError::InvalidAllowedUsers {
                        feature_id: feature_id.clone(),
                        value: v.to_string(),
                    })
            })
            .transpose()?
            .unwrap_or_default();

        let dependencies = json
            .dependencies
            .filter(|v| !v.is_null())
            .map(|v| {
                v.as_string_list()
                    .ok_or_else(|| ConfigurationError::InvalidDependencies {
                        feature_id: feature_id.clone(),
                        value: v.to_string(),
                    })
            })
            .transpose()?
            .unwrap_or_default();

        let value = json
            .value
            .filter(|v| !v.is_null())
            .map(|v| parse_value(&feature_id, &v))
            .transpose()?;

        Ok(Self {
            name: json.name.unwrap_or_else(|| feature_id.clone()),
            feature_id,
            description: json.description,
            enabled,
            rollout_percentage,
            allowed_users,
            value,
            dependencies,
        })
    }
}

/// Accepts whole numbers in [0, 100], including `50.0`.
fn parse_rollout_percentage(
    feature_id: &str,
    value: &ConfigValue,
) -> Result<u32, ConfigurationError> {
    match value.as_f64() {
        None => Err(ConfigurationError::InvalidRolloutPercentage {
            feature_id: feature_id.to_string(),
            value: value.to_string(),
        }),
        Some(p) if (0.0..=100.0).contains(&p) && p.fract() == 0.0 => Ok(p as u32),
        Some(_) => Err(ConfigurationError::RolloutPercentageOutOfRange {
            feature_id: feature_id.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_value(feature_id: &str, value: &ConfigValue) -> Result<Value, ConfigurationError> {
    if let Some(b) = value.as_boolean() {
        Ok(Value::Boolean(b))
    } else if let Some(n) = value.as_i64() {
        Ok(Value::Int64(n))
    } else if let Some(n) = value.as_u64() {
        Ok(Value::UInt64(n))
    } else if let Some(n) = value.as_f64() {
        Ok(Value::Float64(n))
    } else if let Some(s) = value.as_string() {
        Ok(Value::String(s))
    } else {
        Err(ConfigurationError::UnsupportedValue {
            feature_id: feature_id.to_string(),
            value: value.to_string(),
        })
    }
}
