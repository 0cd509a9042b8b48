// Copyright (c) 2021-2024 RBB S.r.l
// opensource@mintlayer.org
// SPDX-License-Identifier: MIT
// Licensed under the MIT License;
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://github.com/mintlayer/mintlayer-core/blob/master/LICENSE
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Difficulty targets and their compact ("bits") encoding.
//!
//! A compact value packs a 256-bit target into 32 bits: the high byte is the size of the
//! number in bytes, the low 23 bits are the most significant bytes of the number and bit 23
//! is a sign bit inherited from the reference implementation. The encoding is lossy, so all
//! difficulty comparisons in this crate decode both sides before comparing.

use std::fmt::{Debug, Display};

use num::{BigUint, One};
use thiserror::Error;

const SIGN_BIT: u32 = 0x0080_0000;
const MANTISSA_MASK: u32 = 0x007f_ffff;
const TARGET_BITS: u64 = 256;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum CompactDecodingError {
    #[error("Compact target {0} encodes a negative number")]
    Negative(Compact),
    #[error("Compact target {0} does not fit in 256 bits")]
    Overflow(Compact),
}

/// The compact encoding of a difficulty target, as carried in block headers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Compact(pub u32);

/// A full precision difficulty target in `[0, 2^256)`. Smaller is harder.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Target(BigUint);

impl Compact {
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn into_inner(self) -> u32 {
        self.0
    }

    /// Expands the compact value into a full target.
    ///
    /// Negative values (sign bit set with a non-zero mantissa) and values that don't fit
    /// in 256 bits are rejected.
    pub fn to_target(self) -> Result<Target, CompactDecodingError> {
        let size = self.0 >> 24;
        let mantissa = self.0 & MANTISSA_MASK;

        if mantissa != 0 && self.0 & SIGN_BIT != 0 {
            return Err(CompactDecodingError::Negative(self));
        }

        let overflows = mantissa != 0
            && (size > 34 || (mantissa > 0xff && size > 33) || (mantissa > 0xffff && size > 32));
        if overflows {
            return Err(CompactDecodingError::Overflow(self));
        }

        Ok(Target(expand(mantissa, size)))
    }

    /// Whether both compact values decode to the same target.
    ///
    /// Distinct encodings of one number are equal difficulty; undecodable values never are.
    pub fn has_equal_difficulty(self, other: Compact) -> bool {
        match (self.to_target(), other.to_target()) {
            (Ok(lhs), Ok(rhs)) => lhs == rhs,
            _ => false,
        }
    }

    /// Whether this compact value is the difficulty `target` takes once it is put in a header,
    /// i.e. whether it decodes to the same number as `target` after one encoding round-trip.
    pub fn matches_target(self, target: &Target) -> bool {
        self.to_target().is_ok_and(|decoded| decoded == target.normalized())
    }
}

impl From<u32> for Compact {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl From<&Target> for Compact {
    fn from(target: &Target) -> Self {
        let (mantissa, size) = compact_parts(&target.0);
        Compact(mantissa | (size << 24))
    }
}

impl From<Target> for Compact {
    fn from(target: Target) -> Self {
        Compact::from(&target)
    }
}

impl TryFrom<Compact> for Target {
    type Error = CompactDecodingError;

    fn try_from(compact: Compact) -> Result<Self, Self::Error> {
        compact.to_target()
    }
}

impl Debug for Compact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Compact({:#010x})", self.0)
    }
}

impl Display for Compact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl Target {
    /// Wraps `value`, or returns `None` if it needs more than 256 bits.
    pub fn from_biguint(value: BigUint) -> Option<Self> {
        (value.bits() <= TARGET_BITS).then_some(Self(value))
    }

    /// `value` capped at `limit`, which is usually the easiest target of the network.
    pub fn clamped(value: BigUint, limit: &Target) -> Self {
        if value > limit.0 {
            limit.clone()
        } else {
            Self(value)
        }
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn into_biguint(self) -> BigUint {
        self.0
    }

    /// The target as it reads back after being encoded into a header.
    pub fn normalized(&self) -> Target {
        let (mantissa, size) = compact_parts(&self.0);
        Target(expand(mantissa, size))
    }

    /// Expected number of hashes needed to meet this target, `2^256 / (target + 1)`.
    ///
    /// This is the amount a block adds to the cumulative chain work.
    pub fn block_work(&self) -> BigUint {
        (BigUint::one() << TARGET_BITS) / (&self.0 + 1u32)
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

fn expand(mantissa: u32, size: u32) -> BigUint {
    if size <= 3 {
        BigUint::from(mantissa >> (8 * (3 - size)))
    } else {
        BigUint::from(mantissa) << (8 * (size - 3)) as usize
    }
}

/// Normalized mantissa and size of `value`: the mantissa fits in 23 bits and its leading
/// byte is non-zero unless the value is zero.
fn compact_parts(value: &BigUint) -> (u32, u32) {
    let mut size = value.bits().div_ceil(8) as u32;
    let mut mantissa = if size <= 3 {
        low_u32(value) << (8 * (3 - size))
    } else {
        low_u32(&(value >> (8 * (size - 3)) as usize))
    };

    // The sign bit must stay clear, so such mantissas give up their lowest byte.
    if mantissa & SIGN_BIT != 0 {
        mantissa >>= 8;
        size += 1;
    }

    (mantissa, size)
}

fn low_u32(value: &BigUint) -> u32 {
    value.iter_u32_digits().next().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn target(value: u128) -> Target {
        Target(BigUint::from(value))
    }

    #[rstest]
    #[case(0x00000000, 0x0, 0x00000000)]
    #[case(0x00123456, 0x0, 0x00000000)]
    #[case(0x01003456, 0x0, 0x00000000)]
    #[case(0x02000056, 0x0, 0x00000000)]
    #[case(0x03000000, 0x0, 0x00000000)]
    #[case(0x01123456, 0x12, 0x01120000)]
    #[case(0x02008000, 0x80, 0x02008000)]
    #[case(0x02123456, 0x1234, 0x02123400)]
    #[case(0x03123456, 0x123456, 0x03123456)]
    #[case(0x04123456, 0x12345600, 0x04123456)]
    #[case(0x05009234, 0x92340000, 0x05009234)]
    fn small_values(#[case] bits: u32, #[case] value: u128, #[case] reencoded: u32) {
        let decoded = Compact(bits).to_target().unwrap();
        assert_eq!(decoded, target(value));
        assert_eq!(Compact::from(&decoded), Compact(reencoded));
    }

    #[test]
    fn bitcoin_limit() {
        let limit = Compact(0x1d00ffff).to_target().unwrap();
        assert_eq!(limit.as_biguint(), &(BigUint::from(0xffffu32) << 208usize));
        assert_eq!(Compact::from(&limit), Compact(0x1d00ffff));
        assert_eq!(limit.block_work(), BigUint::from(0x1_0001_0001u64));
    }

    #[test]
    fn largest_encodable() {
        let decoded = Compact(0x20123456).to_target().unwrap();
        assert_eq!(decoded.as_biguint(), &(BigUint::from(0x123456u32) << 232usize));
        assert_eq!(Compact::from(&decoded), Compact(0x20123456));

        let regtest_limit = Compact(0x207fffff).to_target().unwrap();
        assert_eq!(Compact::from(&regtest_limit), Compact(0x207fffff));
    }

    #[rstest]
    #[case(0x04923456)]
    #[case(0x01fedcba)]
    #[case(0x1d80ffff)]
    fn negative_values_rejected(#[case] bits: u32) {
        assert_eq!(
            Compact(bits).to_target(),
            Err(CompactDecodingError::Negative(Compact(bits)))
        );
    }

    #[test]
    fn negative_zero_is_zero() {
        assert_eq!(Compact(0x04800000).to_target(), Ok(target(0)));
    }

    #[rstest]
    #[case(0xff123456)]
    #[case(0x23000100)]
    #[case(0x22010000)]
    #[case(0x21010000)]
    fn overflows_rejected(#[case] bits: u32) {
        assert_eq!(
            Compact(bits).to_target(),
            Err(CompactDecodingError::Overflow(Compact(bits)))
        );
    }

    #[test]
    fn equal_difficulty_across_encodings() {
        // Same number, mantissa shifted by one byte
        assert!(Compact(0x02123400).has_equal_difficulty(Compact(0x03001234)));
        assert!(Compact(0x1b123400).has_equal_difficulty(Compact(0x1c001234)));
        assert_eq!(Compact::from(Compact(0x1c001234).to_target().unwrap()), Compact(0x1b123400));
        assert!(!Compact(0x1d00ffff).has_equal_difficulty(Compact(0x1e0000ff)));
        assert!(!Compact(0x1d00ffff).has_equal_difficulty(Compact(0x1d00fffe)));
        assert!(!Compact(0x04923456).has_equal_difficulty(Compact(0x04923456)));
    }

    #[test]
    fn matches_target_through_encoding() {
        let limit = Compact(0x1d00ffff).to_target().unwrap();
        assert!(Compact(0x1d00ffff).matches_target(&limit));

        // Precision below the mantissa is dropped by the header encoding.
        let imprecise = Target(limit.as_biguint() - 1u32);
        assert_eq!(Compact::from(&imprecise), Compact(0x1d00fffe));
        assert!(Compact(0x1d00fffe).matches_target(&imprecise));
        assert!(!Compact(0x1d00ffff).matches_target(&imprecise));
        assert!(!Compact(0x04923456).matches_target(&target(0)));
    }

    #[test]
    fn clamping_and_bounds() {
        let limit = target(1000);
        assert_eq!(Target::clamped(BigUint::from(1001u32), &limit), limit);
        assert_eq!(Target::clamped(BigUint::from(999u32), &limit), target(999));

        assert!(Target::from_biguint(BigUint::one() << 256usize).is_none());
        assert!(Target::from_biguint((BigUint::one() << 256usize) - 1u32).is_some());
    }

    proptest! {
        #[test]
        fn encoding_preserves_order(a in any::<u128>(), b in any::<u128>(), shift in 0usize..128) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo = Target(BigUint::from(lo) << shift);
            let hi = Target(BigUint::from(hi) << shift);

            prop_assert!(lo.normalized() <= hi.normalized());
            prop_assert!(lo.normalized() <= lo);
            prop_assert_eq!(Compact::from(&lo).to_target().unwrap(), lo.normalized());
        }
    }
}
