//! Arbitrary constants to seed hashers.

/// Seed for the hasher behind [crate::HashMap] and [crate::HashSet].
pub const POSITION_HASH: u64 = 0x3fdc77fb4d7f5d2f;
