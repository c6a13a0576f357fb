// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Compressed 22-character element guids.
//!
//! Follows the IFC convention of packing a 128-bit UUID into 22 characters
//! of a 64-symbol alphabet. The first character only ever encodes the top
//! two bits, so it is always one of `0..=3`.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The 64-symbol alphabet used for compressed guids
const ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Compressed length of an encoded guid
pub const GUID_LEN: usize = 22;

/// A compressed element guid.
///
/// Immutable for the element's lifetime. An empty guid is representable so
/// that malformed imports can be carried and skipped, not rejected at load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Guid(String);

impl Guid {
    /// Generate a fresh guid from a random v4 UUID
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Compress a UUID into the 22-character form
    pub fn from_uuid(uuid: Uuid) -> Self {
        let mut n = uuid.as_u128();
        let mut out = [0u8; GUID_LEN];
        for slot in out.iter_mut().rev() {
            *slot = ALPHABET[(n & 0x3f) as usize];
            n >>= 6;
        }
        // 22 * 6 = 132 bits; the remaining high bits are zero by now
        debug_assert_eq!(n, 0);
        Guid(String::from_utf8_lossy(&out).into_owned())
    }

    /// Wrap an already-encoded guid string. No validation beyond ownership;
    /// imported models may carry arbitrary identifiers.
    pub fn from_string(s: impl Into<String>) -> Self {
        Guid(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the element has no usable identifier
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Guid {
    fn from(s: &str) -> Self {
        Guid(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_length_and_alphabet() {
        let guid = Guid::new();
        assert_eq!(guid.as_str().len(), GUID_LEN);
        assert!(guid
            .as_str()
            .bytes()
            .all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_first_char_encodes_two_bits() {
        // Top 2 bits of 128 land in the first symbol, so it stays below '4'
        for _ in 0..32 {
            let guid = Guid::new();
            let first = guid.as_str().as_bytes()[0];
            assert!((b'0'..=b'3').contains(&first), "first char was {}", first as char);
        }
    }

    #[test]
    fn test_from_uuid_is_deterministic() {
        let uuid = Uuid::from_u128(0x1234_5678_9abc_def0_1234_5678_9abc_def0);
        assert_eq!(Guid::from_uuid(uuid), Guid::from_uuid(uuid));
    }

    #[test]
    fn test_zero_uuid_encodes_to_all_zeros() {
        let guid = Guid::from_uuid(Uuid::from_u128(0));
        assert_eq!(guid.as_str(), "0000000000000000000000");
    }

    #[test]
    fn test_empty_guid() {
        assert!(Guid::default().is_empty());
        assert!(!Guid::new().is_empty());
    }
}
