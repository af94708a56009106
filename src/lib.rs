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

//! Feature flag evaluation for the Quantum Cash Flow Lattice dashboard.
//!
//! A feature is active for a user when its master switch is on and either
//! the user's email is in the feature's allowlist or the user falls inside
//! the feature's rollout percentage. Rollout is deterministic: the user id is
//! hashed into one of 100 buckets, so a user keeps the same answer across
//! calls, processes and hosts.
//!
//! ```no_run
//! use lattice_flags::{FeatureFlagClient, UserIdentity, Value};
//! use std::path::Path;
//!
//! # fn main() -> lattice_flags::Result<()> {
//! let client = FeatureFlagClient::from_file(
//!     Path::new("data/lattice-features.yaml"),
//!     Some("production"),
//! )?;
//!
//! let user = UserIdentity::new("user-1").with_email("user1@example.com");
//! if client.is_enabled("quantum-forecast", &user) {
//!     let model = client.value_of("quantum-forecast", &user, Value::from("v1-model"));
//!     println!("Forecasting with {model}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The decision function itself is available in [`evaluation`] and works on a
//! [`FeatureConfig`] without any client:
//!
//! ```
//! use lattice_flags::evaluation::{evaluate, Decision};
//! use lattice_flags::{FeatureConfig, UserIdentity};
//!
//! let feature = FeatureConfig::new("beta-export", true)
//!     .with_rollout_percentage(0)
//!     .unwrap()
//!     .with_allowed_users(["beta@example.com"]);
//!
//! let tester = UserIdentity::from_email("beta@example.com");
//! assert_eq!(evaluate("beta-export", Some(&feature), &tester), Decision::AllowListed);
//! ```

mod client;
mod entity;
mod errors;
pub mod evaluation;
mod feature;
mod metering;
mod models;
pub mod serialization;
mod value;

#[cfg(feature = "test_utils")]
pub mod test_utils;

pub use client::{FeatureFlagClient, FeatureSnapshot};
pub use entity::{Entity, UserIdentity, ANONYMOUS_ID};
pub use errors::{
    ConfigurationError, DeserializationError, DeserializationErrorKind, Error, Result,
};
pub use evaluation::Decision;
pub use feature::Feature;
pub use metering::{EvaluationCount, EvaluationMetrics};
pub use models::{Configuration, FeatureConfig};
pub use value::Value;
