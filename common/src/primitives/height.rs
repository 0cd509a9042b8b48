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

use std::fmt::Display;

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, Default)]
pub struct BlockHeight(u64);

impl BlockHeight {
    pub const fn new(height: u64) -> Self {
        Self(height)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn is_genesis(&self) -> bool {
        self.0 == 0
    }

    pub const fn into_int(self) -> u64 {
        self.0
    }

    pub fn next_height(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Height of the ancestor `distance` blocks below, if it exists.
    pub fn checked_sub(&self, distance: u64) -> Option<Self> {
        self.0.checked_sub(distance).map(Self)
    }

    /// Whether a block at this height starts a new retarget interval.
    pub fn is_interval_boundary(&self, interval: u64) -> bool {
        interval != 0 && self.0 % interval == 0
    }
}

impl From<u64> for BlockHeight {
    fn from(height: u64) -> Self {
        Self(height)
    }
}

impl From<BlockHeight> for u64 {
    fn from(height: BlockHeight) -> Self {
        height.0
    }
}

impl Display for BlockHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
