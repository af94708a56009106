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

//! The feature flag decision engine.
//!
//! Evaluation is a pure function of a [`FeatureConfig`] and an [`Entity`]. The
//! checks run in a fixed order:
//!
//! 1. An unknown feature is disabled.
//! 2. A feature whose master switch is off is disabled.
//! 3. An entity whose email is in the allowlist is enabled.
//! 4. With a rollout percentage, the entity is enabled if its bucket is below it.
//! 5. Otherwise the feature is enabled only if it has no allowlist.

pub mod rollout;

use std::collections::HashMap;

use log::{debug, warn};

use crate::entity::Entity;
use crate::models::{Configuration, FeatureConfig};
use crate::Value;

/// Outcome of an evaluation, with the reason it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The feature is not in the configuration.
    UnknownFeature,
    /// The feature definition was rejected while loading.
    Rejected,
    /// The feature is switched off for everyone.
    MasterSwitchOff,
    /// The entity's email is in the allowlist.
    AllowListed,
    /// The entity's bucket is inside the rollout percentage.
    RolledOut { bucket: u32 },
    /// The entity's bucket is outside the rollout percentage.
    NotRolledOut { bucket: u32 },
    /// The allowlist is configured and the entity is not in it.
    NotAllowListed,
    /// No gate configured: the feature is on for everyone.
    Unconditional,
}

impl Decision {
    pub fn is_enabled(&self) -> bool {
        matches!(
            self,
            Decision::AllowListed | Decision::RolledOut { .. } | Decision::Unconditional
        )
    }
}

/// Applies the decision order to one feature.
pub fn evaluate(
    feature_id: &str,
    feature: Option<&FeatureConfig>,
    entity: &impl Entity,
) -> Decision {
    let decision = decide(feature, entity);
    debug!(
        "Feature '{feature_id}' evaluated for entity {:?}: {decision:?}",
        entity.get_id()
    );
    decision
}

fn decide(feature: Option<&FeatureConfig>, entity: &impl Entity) -> Decision {
    let Some(feature) = feature else {
        return Decision::UnknownFeature;
    };

    if !feature.enabled {
        return Decision::MasterSwitchOff;
    }

    if !feature.allowed_users.is_empty() {
        if let Some(email) = entity.get_email() {
            if feature.allowed_users.contains(&email) {
                return Decision::AllowListed;
            }
        }
    }

    if let Some(rollout_percentage) = feature.rollout_percentage {
        let bucket = rollout::bucket(&entity.get_rollout_id());
        return if rollout::is_rolled_out(bucket, rollout_percentage) {
            Decision::RolledOut { bucket }
        } else {
            Decision::NotRolledOut { bucket }
        };
    }

    if feature.allowed_users.is_empty() {
        Decision::Unconditional
    } else {
        Decision::NotAllowListed
    }
}

/// Whether the feature is active for the entity. Dependencies are not
/// considered, see [`dependencies_satisfied`].
pub fn is_enabled(feature_id: &str, feature: Option<&FeatureConfig>, entity: &impl Entity) -> bool {
    evaluate(feature_id, feature, entity).is_enabled()
}

/// Returns the feature's value when it is active for the entity.
///
/// Whether the value is served depends on the decision; which value is
/// served does not. `default` is returned when the feature is inactive or
/// has no value.
pub fn value_of(
    feature_id: &str,
    feature: Option<&FeatureConfig>,
    entity: &impl Entity,
    default: Value,
) -> Value {
    if !is_enabled(feature_id, feature, entity) {
        return default;
    }
    feature
        .and_then(|feature| feature.value.clone())
        .unwrap_or(default)
}

/// Whether every dependency of the feature, transitively, is active for the
/// same entity.
///
/// A feature without dependencies, or unknown to `configuration`, has
/// nothing to satisfy. A feature rejected while loading never satisfies its
/// dependencies. Meeting a feature already on the current path is a cycle: it
/// is reported and counts as not satisfied.
///
/// Each dependency is resolved at most once per call, so features shared by
/// several branches of the graph are not walked again.
pub fn dependencies_satisfied(
    feature_id: &str,
    configuration: &Configuration,
    entity: &impl Entity,
) -> bool {
    let mut path = Vec::new();
    let mut resolved = HashMap::new();
    walk_dependencies(feature_id, configuration, entity, &mut path, &mut resolved)
}

fn walk_dependencies<'a>(
    feature_id: &'a str,
    configuration: &'a Configuration,
    entity: &impl Entity,
    path: &mut Vec<&'a str>,
    resolved: &mut HashMap<&'a str, bool>,
) -> bool {
    if configuration.get_rejection(feature_id).is_some() {
        return false;
    }
    let Some(feature) = configuration.get_feature(feature_id) else {
        return true;
    };

    path.push(feature_id);
    let satisfied = feature.dependencies.iter().all(|dependency| {
        resolve_dependency(dependency, configuration, entity, path, resolved)
    });
    path.pop();
    satisfied
}

fn resolve_dependency<'a>(
    dependency: &'a str,
    configuration: &'a Configuration,
    entity: &impl Entity,
    path: &mut Vec<&'a str>,
    resolved: &mut HashMap<&'a str, bool>,
) -> bool {
    if let Some(&active) = resolved.get(dependency) {
        return active;
    }
    if path.contains(&dependency) {
        warn!(
            "Dependency cycle found while evaluating '{}': {} -> {dependency}",
            path[0],
            path.join(" -> ")
        );
        return false;
    }
    let active = configuration.evaluate(dependency, entity).is_enabled()
        && walk_dependencies(dependency, configuration, entity, path, resolved);
    resolved.insert(dependency, active);
    active
}
