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

use chainstate_types::{BlockIndex, BlockIndexHandle};
use common::chain::{BlockHeader, ChainConfig};

use crate::pow::{ConsensusPoWError, PoWRule};

/// Rules that all have to accept a block, checked in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoWRuleSet {
    rules: Vec<PoWRule>,
}

impl PoWRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: PoWRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn add_rule(&mut self, rule: PoWRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[PoWRule] {
        &self.rules
    }

    /// Stops at the first rule that fails. An empty set accepts everything.
    pub fn check<H: BlockIndexHandle>(
        &self,
        chain_config: &ChainConfig,
        prev_block_index: &BlockIndex,
        header: &BlockHeader,
        block_index_handle: &H,
    ) -> Result<(), ConsensusPoWError> {
        self.rules.iter().try_for_each(|rule| {
            rule.check(chain_config, prev_block_index, header, block_index_handle)
        })
    }
}

impl From<PoWRule> for PoWRuleSet {
    fn from(rule: PoWRule) -> Self {
        Self::new().with_rule(rule)
    }
}
