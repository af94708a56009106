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

use std::path::Path;
use std::sync::{Arc, Mutex};

use log::{info, warn};

use super::feature_snapshot::FeatureSnapshot;
use crate::entity::Entity;
use crate::errors::{ConfigurationError, Result};
use crate::evaluation::{self, Decision};
use crate::metering::EvaluationMetrics;
use crate::models::Configuration;
use crate::value::Value;

/// Evaluates features against the configuration currently published.
///
/// The configuration is immutable. A reload builds a new one and swaps the
/// reference, so each evaluation sees either the old or the new configuration
/// in full. The client can be shared between threads.
///
/// The evaluation entry points never fail: anything that goes wrong makes the
/// feature behave as disabled.
#[derive(Debug)]
pub struct FeatureFlagClient {
    configuration: Mutex<Arc<Configuration>>,
    metrics: Option<Arc<EvaluationMetrics>>,
}

impl FeatureFlagClient {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration: Mutex::new(Arc::new(configuration)),
            metrics: None,
        }
    }

    /// Creates a client taking the configuration from a local file.
    ///
    /// # Arguments
    ///
    /// * `filepath` - The file with the configuration, JSON or YAML.
    /// * `environment_id` - Environment whose overrides are applied, if any.
    pub fn from_file(filepath: &Path, environment_id: Option<&str>) -> Result<Self> {
        Ok(Self::new(Configuration::from_file(filepath, environment_id)?))
    }

    /// Counts every evaluation done through this client into `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<EvaluationMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn metrics(&self) -> Option<&EvaluationMetrics> {
        self.metrics.as_deref()
    }

    /// Returns the configuration currently published.
    pub fn configuration(&self) -> Result<Arc<Configuration>> {
        Ok(self.configuration.lock()?.clone())
    }

    /// Publishes a new configuration. Evaluations already running finish
    /// with the previous one.
    pub fn reload(&self, configuration: Configuration) -> Result<()> {
        let configuration = Arc::new(configuration);
        info!(
            "Publishing configuration for environment {:?}",
            configuration.environment_id()
        );
        *self.configuration.lock()? = configuration;
        Ok(())
    }

    /// Reads `filepath` and publishes it. On error the current configuration
    /// stays in place.
    pub fn reload_from_file(&self, filepath: &Path, environment_id: Option<&str>) -> Result<()> {
        let configuration = Configuration::from_file(filepath, environment_id)?;
        self.reload(configuration)
    }

    pub fn get_feature_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .configuration()?
            .get_feature_ids()
            .into_iter()
            .cloned()
            .collect())
    }

    /// Returns a snapshot of the feature. Fails for unknown and rejected features.
    pub fn get_feature(&self, feature_id: &str) -> Result<FeatureSnapshot> {
        FeatureSnapshot::new(self.configuration()?, feature_id, self.metrics.clone())
    }

    /// Errors found while loading the current configuration.
    pub fn errors(&self) -> Result<Vec<ConfigurationError>> {
        Ok(self
            .configuration()?
            .errors()
            .into_iter()
            .cloned()
            .collect())
    }

    /// Whether the feature is active for the entity, dependencies included.
    /// Unknown features are disabled.
    pub fn is_enabled(&self, feature_id: &str, entity: &impl Entity) -> bool {
        self.evaluate(feature_id, entity).1
    }

    /// The feature's value if it is active for the entity, else `default`.
    pub fn value_of(&self, feature_id: &str, entity: &impl Entity, default: Value) -> Value {
        let (configuration, enabled) = self.evaluate(feature_id, entity);
        if !enabled {
            return default;
        }
        configuration
            .and_then(|configuration| {
                configuration
                    .get_feature(feature_id)
                    .and_then(|feature| feature.value().cloned())
            })
            .unwrap_or(default)
    }

    fn evaluate(&self, feature_id: &str, entity: &impl Entity) -> (Option<Arc<Configuration>>, bool) {
        let configuration = match self.configuration() {
            Ok(configuration) => configuration,
            Err(e) => {
                warn!("Evaluating feature '{feature_id}' as disabled: {e}");
                return (None, false);
            }
        };

        let decision = configuration.evaluate(feature_id, entity);
        let enabled = decision.is_enabled()
            && evaluation::dependencies_satisfied(feature_id, &configuration, entity);
        self.record(feature_id, &decision, enabled);
        (Some(configuration), enabled)
    }

    fn record(&self, feature_id: &str, decision: &Decision, enabled: bool) {
        if let Some(metrics) = self.metrics.as_ref() {
            metrics.record_feature_evaluation(feature_id, decision, enabled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::UserIdentity;
    use crate::models::FeatureConfig;
    use crate::serialization::fixtures::*;
    use crate::Feature;
    use rstest::*;
    use std::path::PathBuf;

    #[fixture]
    fn client(example_configuration_yaml_path: PathBuf) -> FeatureFlagClient {
        FeatureFlagClient::from_file(&example_configuration_yaml_path, Some("production")).unwrap()
    }

    #[rstest]
    fn test_feature_ids(client: FeatureFlagClient) {
        let mut ids = client.get_feature_ids().unwrap();
        ids.sort();
        assert_eq!(
            ids,
            vec![
                "ai-insights",
                "beta-export",
                "cash-flow-matrix",
                "dark-mode",
                "portfolio-heatmap",
                "quantum-forecast",
                "realtime-ticker"
            ]
        );
        assert!(client.errors().unwrap().is_empty());
    }

    #[rstest]
    fn test_get_feature_doesnt_exist(client: FeatureFlagClient) {
        let feature = client.get_feature("non-existing");
        assert_eq!(
            feature.unwrap_err().to_string(),
            "Feature `non-existing` not found."
        );
        assert!(!client.is_enabled("non-existing", &UserIdentity::new("user-1")));
    }

    #[rstest]
    fn test_production_decisions(client: FeatureFlagClient) {
        // Production rolls quantum-forecast out to 10%: "anonymous" (bucket 5) is in, user-1 (59) is not
        assert!(client.is_enabled("quantum-forecast", &UserIdentity::anonymous()));
        assert!(!client.is_enabled("quantum-forecast", &UserIdentity::new("user-1")));
        assert!(client.is_enabled(
            "quantum-forecast",
            &UserIdentity::new("user-1").with_email("admin@example.com")
        ));
        assert!(!client.is_enabled("ai-insights", &UserIdentity::from_email("x@example.com")));
        assert_eq!(
            client.value_of("dark-mode", &UserIdentity::new("user-1"), Value::from("light")),
            Value::from("midnight")
        );
        assert_eq!(
            client.value_of("quantum-forecast", &UserIdentity::new("user-1"), Value::from("v1-model")),
            Value::from("v1-model")
        );
    }

    #[rstest]
    fn test_reload_swaps_configuration(client: FeatureFlagClient) {
        let user = UserIdentity::new("user-1");
        let before = client.get_feature("quantum-forecast").unwrap();
        assert!(!client.is_enabled("quantum-forecast", &user));

        client
            .reload(Configuration::from_features([FeatureConfig::new(
                "quantum-forecast",
                true,
            )]))
            .unwrap();

        assert!(client.is_enabled("quantum-forecast", &user));
        assert!(!client.is_enabled("dark-mode", &user));
        // A snapshot taken earlier keeps the configuration it was taken from
        assert!(!before.is_enabled_for(&user).unwrap());
    }

    #[rstest]
    fn test_failed_reload_keeps_configuration(client: FeatureFlagClient) {
        let result = client.reload_from_file(Path::new("does/not/exist.yaml"), None);
        assert!(result.is_err());
        assert!(client.is_enabled("dark-mode", &UserIdentity::new("user-1")));
        assert_eq!(client.configuration().unwrap().environment_id(), Some("production"));
    }

    #[rstest]
    fn test_metrics(client: FeatureFlagClient) {
        let client = client.with_metrics(Arc::new(EvaluationMetrics::new()));
        client.is_enabled("dark-mode", &UserIdentity::new("user-1"));
        client.is_enabled("missing", &UserIdentity::new("user-1"));
        let metrics = client.metrics().unwrap();
        assert_eq!(metrics.get("dark-mode").enabled, 1);
        assert_eq!(metrics.unknown_feature_evaluations(), 1);
        assert!(!metrics.snapshot().contains_key("missing"));
    }
}
