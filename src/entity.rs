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

/// Identifier used for rollout bucketing when an entity has no id.
pub const ANONYMOUS_ID: &str = "anonymous";

/// An object the features are evaluated for, usually the user making a request.
///
/// Only the identity fields matter to the evaluation:
/// * `id` is hashed to place the entity in a rollout bucket.
/// * `email` is matched against the allowlist of a feature.
/// * `role` is informational and never changes a decision.
pub trait Entity {
    fn get_id(&self) -> Option<String>;

    fn get_email(&self) -> Option<String> {
        None
    }

    fn get_role(&self) -> Option<String> {
        None
    }

    /// The identifier hashed for rollout: the id, or [`ANONYMOUS_ID`] when absent.
    fn get_rollout_id(&self) -> String {
        self.get_id().unwrap_or_else(|| ANONYMOUS_ID.to_string())
    }
}

/// Plain [`Entity`] implementation carrying the identity fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// An entity with neither id nor email.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn from_email(email: impl Into<String>) -> Self {
        Self::anonymous().with_email(email)
    }
}

impl Entity for UserIdentity {
    fn get_id(&self) -> Option<String> {
        self.id.clone()
    }

    fn get_email(&self) -> Option<String> {
        self.email.clone()
    }

    fn get_role(&self) -> Option<String> {
        self.role.clone()
    }
}

impl<T: Entity + ?Sized> Entity for &T {
    fn get_id(&self) -> Option<String> {
        (**self).get_id()
    }

    fn get_email(&self) -> Option<String> {
        (**self).get_email()
    }

    fn get_role(&self) -> Option<String> {
        (**self).get_role()
    }
}
