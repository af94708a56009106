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

use std::{env, error::Error, path::PathBuf, sync::Arc};

use dotenvy::dotenv;
use lattice_flags::{
    Entity, EvaluationMetrics, Feature, FeatureFlagClient, UserIdentity, Value,
};

fn main() -> std::result::Result<(), Box<dyn Error>> {
    dotenv().ok();
    let environment_id = env::var("LATTICE_ENVIRONMENT").ok();
    let config_file = env::var("LATTICE_FEATURES_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/lattice-features.yaml"));

    let client = FeatureFlagClient::from_file(&config_file, environment_id.as_deref())?
        .with_metrics(Arc::new(EvaluationMetrics::new()));

    for e in client.errors()? {
        println!("Configuration error: {e}");
    }

    let users = [
        UserIdentity::new("user-1").with_email("user1@example.com"),
        UserIdentity::new("user-4").with_role("analyst"),
        UserIdentity::from_email("admin@example.com").with_role("admin"),
        UserIdentity::anonymous(),
    ];

    let mut feature_ids = client.get_feature_ids()?;
    feature_ids.sort();

    println!(
        "Quantum Cash Flow Lattice, environment: {}",
        environment_id.as_deref().unwrap_or("<shared>")
    );
    for user in &users {
        println!(
            "\n{} ({})",
            user.get_id().unwrap_or_else(|| "<no id>".to_string()),
            user.get_email().unwrap_or_else(|| "<no email>".to_string())
        );
        for feature_id in &feature_ids {
            let feature = client.get_feature(feature_id)?;
            let enabled = feature.is_enabled_for(user)?;
            let value = client.value_of(feature_id, user, Value::from("-"));
            println!(
                "  {:<20} {:<8} {value}",
                feature.get_name()?,
                if enabled { "ON" } else { "off" }
            );
        }
    }

    if let Some(metrics) = client.metrics() {
        let mut counts: Vec<_> = metrics.snapshot().into_iter().collect();
        counts.sort_by(|a, b| a.0.cmp(&b.0));
        println!("\nEvaluations:");
        for (feature_id, count) in counts {
            println!(
                "  {feature_id:<20} {} evaluated, {} enabled",
                count.evaluations, count.enabled
            );
        }
        println!("  unknown features: {}", metrics.unknown_feature_evaluations());
    }

    Ok(())
}
