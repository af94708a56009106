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

use crate::entity::Entity;
use crate::errors::Result;
use crate::value::Value;

/// A feature that can be evaluated for an [`Entity`].
pub trait Feature {
    /// Returns the name of the feature.
    fn get_name(&self) -> Result<String>;

    /// Returns the master switch of the feature.
    ///
    /// A feature switched on can still be inactive for a given entity, see
    /// [`Feature::is_enabled_for`].
    fn is_enabled(&self) -> Result<bool>;

    /// Whether the feature is active for the given entity.
    fn is_enabled_for(&self, entity: &impl Entity) -> Result<bool>;

    /// Returns the feature's value if it is active for the entity and has one,
    /// `default` otherwise.
    fn get_value(&self, entity: &impl Entity, default: Value) -> Result<Value>;

    /// Same as [`Feature::get_value`], converted into `T`.
    fn get_value_into<T: TryFrom<Value, Error = crate::Error>>(
        &self,
        entity: &impl Entity,
        default: T,
    ) -> Result<T>
    where
        T: Into<Value>,
    {
        let value = self.get_value(entity, default.into())?;
        value.try_into()
    }
}
