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

use num::BigUint;

use common::{
    chain::{BlockHeader, BlockId},
    primitives::{BlockHeight, BlockTimestamp, Compact},
};

/// A header as it was accepted into the chain store, with its position in the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockIndex {
    block_header: BlockHeader,
    height: BlockHeight,
    /// The total chain work up to and including this block
    chain_work: BigUint,
}

impl BlockIndex {
    pub fn new(block_header: BlockHeader, height: BlockHeight, chain_work: BigUint) -> Self {
        Self {
            block_header,
            height,
            chain_work,
        }
    }

    pub fn block_id(&self) -> &BlockId {
        self.block_header.block_id()
    }

    pub fn prev_block_id(&self) -> &BlockId {
        self.block_header.prev_block_id()
    }

    pub fn block_timestamp(&self) -> BlockTimestamp {
        self.block_header.timestamp()
    }

    pub fn bits(&self) -> Compact {
        self.block_header.bits()
    }

    pub fn block_height(&self) -> BlockHeight {
        self.height
    }

    pub fn chain_work(&self) -> &BigUint {
        &self.chain_work
    }

    pub fn block_header(&self) -> &BlockHeader {
        &self.block_header
    }

    pub fn into_block_header(self) -> BlockHeader {
        self.block_header
    }
}
