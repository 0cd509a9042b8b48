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

#![allow(clippy::non_canonical_clone_impl)]

use std::{
    fmt::{Debug, Display},
    hash::Hash,
    marker::PhantomData,
};

use num::BigUint;

fixed_hash::construct_fixed_hash! {
    pub struct H256(32);
}

impl H256 {
    /// The hash viewed as a number, the way proof of work compares it against a target.
    ///
    /// Bitcoin stores hashes as little-endian 256-bit integers.
    pub fn as_bitcoin_uint256(&self) -> BigUint {
        BigUint::from_bytes_le(self.as_bytes())
    }
}

/// Typed identity of an object, backed by its hash.
#[repr(transparent)]
pub struct Id<T> {
    hash: H256,
    _shadow: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub const fn new(hash: H256) -> Self {
        Self {
            hash,
            _shadow: PhantomData,
        }
    }

    pub const fn to_hash(&self) -> H256 {
        self.hash
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.hash.cmp(&other.hash)
    }
}

impl<T> Hash for Id<T> {
    fn hash<S: std::hash::Hasher>(&self, state: &mut S) {
        self.hash.hash(state)
    }
}

impl<T> Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Id{{{:x}}}", self.hash)
    }
}

impl<T> Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:x}", self.hash)
    }
}

impl<T> From<H256> for Id<T> {
    fn from(hash: H256) -> Self {
        Self::new(hash)
    }
}
