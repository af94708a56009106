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

use serde::Deserialize;

use super::ConfigValue;

/// A feature entry as written in the configuration document.
///
/// Every field is optional so an environment can override only some of the
/// fields of a shared entry, see [`FeatureJson::overlay`].
///
/// An entry spelling the same field twice, such as both `rollout_percentage`
/// and `rolloutPercentage`, makes the whole document invalid.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct FeatureJson {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: Option<ConfigValue>,
    #[serde(default, alias = "rolloutPercentage")]
    pub rollout_percentage: Option<ConfigValue>,
    #[serde(default, alias = "allowedUsers")]
    pub allowed_users: Option<ConfigValue>,
    #[serde(default)]
    pub value: Option<ConfigValue>,
    #[serde(default)]
    pub dependencies: Option<ConfigValue>,
}

impl FeatureJson {
    /// Returns `self` with every field present in `other` replaced by `other`'s.
    pub fn overlay(self, other: FeatureJson) -> FeatureJson {
        FeatureJson {
            name: other.name.or(self.name),
            description: other.description.or(self.description),
            enabled: other.enabled.or(self.enabled),
            rollout_percentage: other.rollout_percentage.or(self.rollout_percentage),
            allowed_users: other.allowed_users.or(self.allowed_users),
            value: other.value.or(self.value),
            dependencies: other.dependencies.or(self.dependencies),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overlay_keeps_unset_fields() {
        let base: FeatureJson = serde_json::from_value(json!({
            "name": "Dark mode",
            "enabled": true,
            "rollout_percentage": 10,
            "allowed_users": ["admin@example.com"]
        }))
        .unwrap();
        let environment: FeatureJson = serde_json::from_value(json!({
            "rolloutPercentage": 100
        }))
        .unwrap();

        let merged = base.overlay(environment);
        assert_eq!(merged.name.as_deref(), Some("Dark mode"));
        assert_eq!(merged.enabled.unwrap().as_boolean(), Some(true));
        assert_eq!(merged.rollout_percentage.unwrap().as_u64(), Some(100));
        assert_eq!(
            merged.allowed_users.unwrap().as_string_list(),
            Some(vec!["admin@example.com".to_string()])
        );
    }
}
