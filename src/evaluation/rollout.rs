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

//! Deterministic assignment of identifiers to rollout buckets.

use std::io::Cursor;

use murmur3::murmur3_32;

/// Number of buckets the population is split into.
pub const BUCKETS: u32 = 100;

/// MurmurHash3 (x86, 32 bit, seed 0) of the UTF-8 bytes of `data`.
pub fn hash(data: &str) -> u32 {
    // Reading from an in-memory cursor cannot fail.
    murmur3_32(&mut Cursor::new(data.as_bytes()), 0).unwrap_or_default()
}

/// Bucket in `[0, 100)` of an identifier.
pub fn bucket(identifier: &str) -> u32 {
    hash(identifier) % BUCKETS
}

/// Whether `bucket` is one of the first `rollout_percentage` buckets.
pub fn is_rolled_out(bucket: u32, rollout_percentage: u32) -> bool {
    bucket < rollout_percentage
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_hash_reference_values() {
        assert_eq!(hash(""), 0);
        assert_eq!(hash("hello"), 0x248b_fa47);
    }

    #[rstest]
    #[case("user-1", 59)]
    #[case("user-2", 67)]
    #[case("user-4", 45)]
    #[case("a1", 38)]
    #[case("a2", 29)]
    #[case("bob", 94)]
    #[case("anonymous", 5)]
    fn test_bucket(#[case] identifier: &str, #[case] expected: u32) {
        assert_eq!(bucket(identifier), expected);
        // Same answer on every call
        assert_eq!(bucket(identifier), bucket(identifier));
    }

    #[rstest]
    #[case("user-1")]
    #[case("anonymous")]
    #[case("trader-7")]
    fn test_boundaries(#[case] identifier: &str) {
        assert!(!is_rolled_out(bucket(identifier), 0));
        assert!(is_rolled_out(bucket(identifier), 100));
    }

    #[test]
    fn test_monotonic_in_percentage() {
        // "user-1" lives in bucket 59
        for percentage in 0..=100 {
            assert_eq!(is_rolled_out(bucket("user-1"), percentage), percentage > 59);
        }
    }

    #[test]
    fn test_distribution_is_uniform() {
        let mut counts = [0u32; BUCKETS as usize];
        for i in 0..10_000 {
            counts[bucket(&format!("user-{i}")) as usize] += 1;
        }
        // 100 expected per bucket
        for (bucket, count) in counts.iter().enumerate() {
            assert!(
                (50..=150).contains(count),
                "bucket {bucket} got {count} identifiers"
            );
        }

        let admitted: u32 = counts[..25].iter().sum();
        assert!((2300..=2700).contains(&admitted), "{admitted} admitted at 25%");
    }
}
