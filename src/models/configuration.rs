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

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::Path;

use log::{info, warn};

use super::FeatureConfig;
use crate::entity::Entity;
use crate::errors::{ConfigurationError, Error, Result};
use crate::evaluation::{self, Decision};
use crate::serialization::ConfigurationJson;
use crate::Value;

/// Represents all the configuration data needed to evaluate features for
/// one environment.
///
/// It is immutable once built. Features whose definition is malformed are
/// kept apart as rejected: they evaluate disabled for every entity and their
/// errors are available through [`Configuration::errors`].
#[derive(Debug, Default, Clone)]
pub struct Configuration {
    environment_id: Option<String>,
    features: HashMap<String, FeatureConfig>,
    rejected: BTreeMap<String, ConfigurationError>,
}

impl Configuration {
    /// Constructs the Configuration, by consuming and validating data in exchange format.
    ///
    /// With an `environment_id`, the entries of that environment are laid over
    /// the shared ones. It is an error if the environment does not exist.
    pub fn new(environment_id: Option<&str>, configuration: ConfigurationJson) -> Result<Self> {
        let ConfigurationJson {
            features: mut entries,
            mut environments,
        } = configuration;

        if let Some(environment_id) = environment_id {
            let environment =
                environments
                    .remove(environment_id)
                    .ok_or_else(|| Error::EnvironmentNotFound {
                        environment_id: environment_id.to_string(),
                    })?;
            for (feature_id, overrides) in environment.features {
                let merged = match entries.remove(&feature_id) {
                    Some(shared) => shared.overlay(overrides),
                    None => overrides,
                };
                entries.insert(feature_id, merged);
            }
        }

        let mut features = HashMap::new();
        let mut rejected = BTreeMap::new();
        for (feature_id, entry) in entries {
            match FeatureConfig::try_from((feature_id.clone(), entry)) {
                Ok(feature) => {
                    features.insert(feature_id, feature);
                }
                Err(e) => {
                    rejected.insert(feature_id, e);
                }
            }
        }

        let configuration = Self::build(environment_id.map(str::to_string), features, rejected);
        info!(
            "Loaded {} features for environment {:?} ({} rejected)",
            configuration.features.len(),
            configuration.environment_id,
            configuration.rejected.len()
        );
        Ok(configuration)
    }

    /// Parses and validates a configuration file, see [`ConfigurationJson::from_file`].
    pub fn from_file(filepath: &Path, environment_id: Option<&str>) -> Result<Self> {
        let configuration = ConfigurationJson::from_file(filepath)?;
        Self::new(environment_id, configuration)
    }

    /// Builds a configuration from already validated features. Dependency
    /// cycles are still detected and rejected.
    pub fn from_features(features: impl IntoIterator<Item = FeatureConfig>) -> Self {
        let features = features
            .into_iter()
            .map(|feature| (feature.feature_id.clone(), feature))
            .collect();
        Self::build(None, features, BTreeMap::new())
    }

    fn build(
        environment_id: Option<String>,
        mut features: HashMap<String, FeatureConfig>,
        mut rejected: BTreeMap<String, ConfigurationError>,
    ) -> Self {
        let mut feature_ids: Vec<&String> = features.keys().collect();
        feature_ids.sort();
        let cycles: Vec<(String, Vec<String>)> = feature_ids
            .into_iter()
            .filter_map(|feature_id| {
                find_dependency_cycle(feature_id, &features).map(|path| (feature_id.clone(), path))
            })
            .collect();

        for (feature_id, path) in cycles {
            features.remove(&feature_id);
            rejected.insert(
                feature_id.clone(),
                ConfigurationError::DependencyCycle { feature_id, path },
            );
        }

        for e in rejected.values() {
            warn!("Feature rejected, it will evaluate as disabled: {e}");
        }

        Self {
            environment_id,
            features,
            rejected,
        }
    }

    pub fn environment_id(&self) -> Option<&str> {
        self.environment_id.as_deref()
    }

    /// Returns the feature if it is known and valid.
    pub fn get_feature(&self, feature_id: &str) -> Option<&FeatureConfig> {
        self.features.get(feature_id)
    }

    /// Ids of the valid features. Rejected ones are listed by [`Configuration::errors`].
    pub fn get_feature_ids(&self) -> Vec<&String> {
        self.features.keys().collect()
    }

    pub fn get_rejection(&self, feature_id: &str) -> Option<&ConfigurationError> {
        self.rejected.get(feature_id)
    }

    /// Errors found while loading, sorted by feature id.
    pub fn errors(&self) -> Vec<&ConfigurationError> {
        self.rejected.values().collect()
    }

    /// Applies the decision order to a feature of this configuration.
    /// Dependencies are not considered, see [`Configuration::is_enabled`].
    pub fn evaluate(&self, feature_id: &str, entity: &impl Entity) -> Decision {
        if self.rejected.contains_key(feature_id) {
            return Decision::Rejected;
        }
        evaluation::evaluate(feature_id, self.get_feature(feature_id), entity)
    }

    /// Whether the feature is active for the entity, including its dependencies.
    pub fn is_enabled(&self, feature_id: &str, entity: &impl Entity) -> bool {
        self.evaluate(feature_id, entity).is_enabled()
            && evaluation::dependencies_satisfied(feature_id, self, entity)
    }

    /// The value of the feature if it is active for the entity, else `default`.
    pub fn value_of(&self, feature_id: &str, entity: &impl Entity, default: Value) -> Value {
        if !self.is_enabled(feature_id, entity) {
            return default;
        }
        self.get_feature(feature_id)
            .and_then(|feature| feature.value.clone())
            .unwrap_or(default)
    }
}

/// Returns the shortest dependency path leading from `feature_id` back to
/// itself, both ends included.
fn find_dependency_cycle(
    feature_id: &str,
    features: &HashMap<String, FeatureConfig>,
) -> Option<Vec<String>> {
    let mut parents: HashMap<&str, &str> = HashMap::new();
    let mut queue = VecDeque::from([feature_id]);

    while let Some(current) = queue.pop_front() {
        let Some(feature) = features.get(current) else {
            continue;
        };
        for dependency in feature.dependencies.iter().map(String::as_str) {
            if dependency == feature_id {
                let mut path = vec![feature_id.to_string()];
                let mut node = current;
                while node != feature_id {
                    path.push(node.to_string());
                    match parents.get(node) {
                        Some(&parent) => node = parent,
                        None => break,
                    }
                }
                path.push(feature_id.to_string());
                path.reverse();
                return Some(path);
            }
            if !parents.contains_key(dependency) {
                parents.insert(dependency, current);
                queue.push_back(dependency);
            }
        }
    }
    None
}
