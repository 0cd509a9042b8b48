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

pub mod random;

use crate::random::Rng;

/// Sample a value different from `orig_val`.
pub fn gen_different_value<T, G>(orig_val: &T, mut gen: G) -> T
where
    T: Eq,
    G: FnMut() -> T,
{
    for _ in 0..1000 {
        let val = gen();

        if val != *orig_val {
            return val;
        }
    }

    panic!("Failed to generate a value");
}

/// Random compact target bits with a mantissa that keeps the sign bit clear.
pub fn random_valid_bits(rng: &mut impl Rng, size_range: std::ops::RangeInclusive<u32>) -> u32 {
    let size = rng.gen_range(size_range);
    let mantissa = rng.gen_range(0x8000..=0x7fffff);
    (size << 24) | mantissa
}

#[macro_export]
macro_rules! assert_matches_return_val {
    ($in:expr, $pattern:pat $(if $guard:expr)?, $out:expr) => {
        {
            let to_match = $in;
            match to_match {
                $pattern $(if $guard)? => $out,
                _ => {
                    panic!(
                        "Assertion failed: expression {:?} doesn't match pattern {}",
                        to_match,
                        stringify!($pattern)
                    )
                }
            }
        }
    };
}

#[macro_export]
macro_rules! assert_matches {
    ($in:expr, $pattern:pat $(if $guard:expr)?) => {
        $crate::assert_matches_return_val!($in, $pattern $(if $guard)?, ())
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{make_seedable_rng, Seed};

    #[test]
    fn valid_bits_keep_sign_bit_clear() {
        let mut rng = make_seedable_rng(Seed::from_u64(7));
        for _ in 0..100 {
            let bits = random_valid_bits(&mut rng, 4..=0x1d);
            assert_eq!(bits & 0x0080_0000, 0);
            assert!((4..=0x1d).contains(&(bits >> 24)));
        }
    }

    #[test]
    fn different_value() {
        let mut rng = make_seedable_rng(Seed::from_u64(1));
        let v = gen_different_value(&5u8, || rng.gen_range(0..10));
        assert_ne!(v, 5);
    }

    #[test]
    fn matches() {
        let v: Result<u32, ()> = Ok(3);
        assert_matches!(v, Ok(3));
        let inner = assert_matches_return_val!(v, Ok(x) if x > 1, x);
        assert_eq!(inner, 3);
    }
}
