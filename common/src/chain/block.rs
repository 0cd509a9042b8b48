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

use crate::primitives::{BlockTimestamp, Compact, Id};

pub type BlockId = Id<BlockHeader>;

/// The parts of a block header the difficulty rules look at.
///
/// Header parsing and hashing happen before a header reaches this crate, so the header
/// carries its own identity hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    block_id: BlockId,
    prev_block_id: BlockId,
    timestamp: BlockTimestamp,
    bits: Compact,
}

impl BlockHeader {
    pub fn new(
        block_id: BlockId,
        prev_block_id: BlockId,
        timestamp: BlockTimestamp,
        bits: Compact,
    ) -> Self {
        Self {
            block_id,
            prev_block_id,
            timestamp,
            bits,
        }
    }

    pub fn block_id(&self) -> &BlockId {
        &self.block_id
    }

    pub fn prev_block_id(&self) -> &BlockId {
        &self.prev_block_id
    }

    pub fn timestamp(&self) -> BlockTimestamp {
        self.timestamp
    }

    pub fn bits(&self) -> Compact {
        self.bits
    }
}
