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

use chainstate_types::BlockIndex;
use common::primitives::{BlockTimestamp, Compact};

use crate::TestFramework;

/// The block builder that allows construction and processing of a block on top of the tip.
pub struct BlockBuilder<'f> {
    framework: &'f mut TestFramework,
    timestamp: BlockTimestamp,
    bits: Compact,
}

impl<'f> BlockBuilder<'f> {
    /// By default the new block copies the tip's bits and is 600 seconds later.
    pub fn new(framework: &'f mut TestFramework) -> Self {
        let tip = framework.best_block_index();
        let timestamp = tip
            .block_timestamp()
            .add_seconds(600)
            .unwrap_or(tip.block_timestamp());
        let bits = tip.bits();

        Self {
            framework,
            timestamp,
            bits,
        }
    }

    pub fn with_timestamp(mut self, timestamp: BlockTimestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets the timestamp to `spacing` seconds after the tip.
    pub fn with_spacing(mut self, spacing: u32) -> Self {
        let tip_time = self.framework.best_block_index().block_timestamp();
        self.timestamp = tip_time.add_seconds(spacing).unwrap();
        self
    }

    pub fn with_bits(mut self, bits: Compact) -> Self {
        self.bits = bits;
        self
    }

    /// Adds the block to the chain.
    pub fn build(self) -> BlockIndex {
        self.framework.process_block(self.timestamp, self.bits)
    }
}
