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

//! Helpers shared by the integration tests.

use std::path::PathBuf;

use crate::UserIdentity;

/// Path of a file under the crate's `data/` directory.
pub fn data_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("data");
    path.push(filename);
    path
}

/// `size` users with ids `user-0`, `user-1`, ... and matching emails.
pub fn population(size: usize) -> Vec<UserIdentity> {
    (0..size)
        .map(|i| UserIdentity::new(format!("user-{i}")).with_email(format!("user{i}@example.com")))
        .collect()
}
