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

use std::sync::Arc;

use crate::entity::Entity;
use crate::errors::{Error, Result};
use crate::metering::EvaluationMetrics;
use crate::models::{Configuration, FeatureConfig};
use crate::value::Value;
use crate::Feature;

/// Provides a snapshot of a [`Feature`].
///
/// The snapshot keeps the configuration it was taken from, so it keeps
/// evaluating the same way after the client is reloaded.
#[derive(Debug, Clone)]
pub struct FeatureSnapshot {
    feature_id: String,
    configuration: Arc<Configuration>,
    pub(crate) metrics: Option<Arc<EvaluationMetrics>>,
}

impl FeatureSnapshot {
    /// Fails if the feature is unknown or was rejected while loading.
    pub(crate) fn new(
        configuration: Arc<Configuration>,
        feature_id: &str,
        metrics: Option<Arc<EvaluationMetrics>>,
    ) -> Result<Self> {
        if let Some(e) = configuration.get_rejection(feature_id) {
            return Err(Error::ConfigurationError(e.clone()));
        }
        if configuration.get_feature(feature_id).is_none() {
            return Err(Error::FeatureNotFound {
                feature_id: feature_id.to_string(),
            });
        }
        Ok(Self {
            feature_id: feature_id.to_string(),
            configuration,
            metrics,
        })
    }

    pub fn feature_id(&self) -> &str {
        &self.feature_id
    }

    /// The validated definition of the feature.
    pub fn config(&self) -> Result<&FeatureConfig> {
        self.configuration
            .get_feature(&self.feature_id)
            .ok_or_else(|| Error::FeatureNotFound {
                feature_id: self.feature_id.clone(),
            })
    }

    fn evaluate_feature_for_entity(&self, entity: &impl Entity) -> bool {
        let decision = self.configuration.evaluate(&self.feature_id, entity);
        let enabled = decision.is_enabled()
            && crate::evaluation::dependencies_satisfied(
                &self.feature_id,
                &self.configuration,
                entity,
            );
        if let Some(metrics) = self.metrics.as_ref() {
            metrics.record_feature_evaluation(&self.feature_id, &decision, enabled);
        }
        enabled
    }
}

impl Feature for FeatureSnapshot {
    fn get_name(&self) -> Result<String> {
        Ok(self.config()?.name().to_string())
    }

    fn is_enabled(&self) -> Result<bool> {
        Ok(self.config()?.enabled())
    }

    fn is_enabled_for(&self, entity: &impl Entity) -> Result<bool> {
        Ok(self.evaluate_feature_for_entity(entity))
    }

    fn get_value(&self, entity: &impl Entity, default: Value) -> Result<Value> {
        if !self.evaluate_feature_for_entity(entity) {
            return Ok(default);
        }
        Ok(self.config()?.value().cloned().unwrap_or(default))
    }
}
