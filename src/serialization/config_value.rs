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

use std::fmt::Display;

use serde::Deserialize;

/// A raw value as written in the configuration document.
///
/// Kept untyped until validation so that a badly typed field rejects only the
/// feature it belongs to instead of the whole document.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ConfigValue(pub(crate) serde_json::Value);

impl ConfigValue {
    pub fn as_i64(&self) -> Option<i64> {
        self.0.as_i64()
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.0.as_u64()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }

    pub fn as_boolean(&self) -> Option<bool> {
        self.0.as_bool()
    }

    pub fn as_string(&self) -> Option<String> {
        self.0.as_str().map(|s| s.to_string())
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Returns the items if this is a sequence made only of strings.
    pub fn as_string_list(&self) -> Option<Vec<String>> {
        self.0
            .as_array()?
            .iter()
            .map(|item| item.as_str().map(|s| s.to_string()))
            .collect()
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

impl Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_list() {
        let value = ConfigValue::from(json!(["a@example.com", "b@example.com"]));
        assert_eq!(
            value.as_string_list(),
            Some(vec!["a@example.com".to_string(), "b@example.com".to_string()])
        );

        assert_eq!(ConfigValue::from(json!(["a", 1])).as_string_list(), None);
        assert_eq!(ConfigValue::from(json!("a")).as_string_list(), None);
        assert_eq!(
            ConfigValue::from(json!([])).as_string_list(),
            Some(Vec::new())
        );
    }
}
