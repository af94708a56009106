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

use std::collections::HashMap;
use std::sync::Mutex;

use log::warn;

use crate::evaluation::Decision;

/// Evaluation counters of one feature.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationCount {
    pub evaluations: u64,
    pub enabled: u64,
    pub rejected: u64,
}

impl EvaluationCount {
    pub fn disabled(&self) -> u64 {
        self.evaluations - self.enabled
    }
}

#[derive(Debug, Default)]
struct Counters {
    features: HashMap<String, EvaluationCount>,
    unknown_feature: u64,
}

/// Optional counters of the evaluations performed through a
/// [`FeatureFlagClient`](crate::FeatureFlagClient).
///
/// Known features are counted one by one. Evaluations of names missing from
/// the configuration only increase a single total.
#[derive(Debug, Default)]
pub struct EvaluationMetrics {
    counts: Mutex<Counters>,
}

impl EvaluationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one evaluation. `enabled` is the final answer given to the
    /// caller, dependencies included.
    pub fn record_feature_evaluation(&self, feature_id: &str, decision: &Decision, enabled: bool) {
        let mut counts = match self.counts.lock() {
            Ok(counts) => counts,
            Err(e) => {
                warn!("Fail to record evaluation of feature '{feature_id}': {e}");
                return;
            }
        };
        if *decision == Decision::UnknownFeature {
            counts.unknown_feature += 1;
            return;
        }
        let count = counts.features.entry(feature_id.to_string()).or_default();
        count.evaluations += 1;
        if enabled {
            count.enabled += 1;
        }
        if *decision == Decision::Rejected {
            count.rejected += 1;
        }
    }

    pub fn get(&self, feature_id: &str) -> EvaluationCount {
        self.counts
            .lock()
            .map(|counts| counts.features.get(feature_id).copied().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Number of evaluations of features missing from the configuration.
    pub fn unknown_feature_evaluations(&self) -> u64 {
        self.counts
            .lock()
            .map(|counts| counts.unknown_feature)
            .unwrap_or_default()
    }

    /// Counters of every known feature evaluated so far.
    pub fn snapshot(&self) -> HashMap<String, EvaluationCount> {
        self.counts
            .lock()
            .map(|counts| counts.features.clone())
            .unwrap_or_default()
    }

    pub fn reset(&self) {
        if let Ok(mut counts) = self.counts.lock() {
            *counts = Counters::default();
        }
    }
}
