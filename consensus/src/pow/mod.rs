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

mod error;
mod factory;
mod helpers;
mod median_time;
mod rule_set;
mod rules;

use chainstate_types::{BlockIndex, BlockIndexHandle};
use common::{
    chain::{BlockHeader, ChainConfig},
    primitives::{Compact, H256},
};

pub use self::{
    error::{ConsensusPoWError, DifficultyViolation, PoWErrorClass},
    factory::{select_rule, select_rules},
    median_time::calculate_median_time_past,
    rule_set::PoWRuleSet,
    rules::{compute_target, suitable_block, PoWRule},
};

/// Whether the block hash, read as a little endian number, doesn't exceed the target encoded in
/// `block_bits`. Undecodable bits never pass.
pub fn check_proof_of_work(block_hash: H256, block_bits: Compact) -> bool {
    match block_bits.to_target() {
        Ok(target) => &block_hash.as_bitcoin_uint256() <= target.as_biguint(),
        Err(_) => false,
    }
}

/// Checks the difficulty bits of `header`, which extends `prev_block_index`, against the rules
/// selected for it.
pub fn select_and_check<H: BlockIndexHandle>(
    chain_config: &ChainConfig,
    prev_block_index: &BlockIndex,
    header: &BlockHeader,
    block_index_handle: &H,
) -> Result<(), ConsensusPoWError> {
    select_rules(chain_config, prev_block_index, header).check(
        chain_config,
        prev_block_index,
        header,
        block_index_handle,
    )
}

/// Like [`select_and_check`], with the previous block loaded from the store.
pub fn check_pow_consensus<H: BlockIndexHandle>(
    chain_config: &ChainConfig,
    header: &BlockHeader,
    block_index_handle: &H,
) -> Result<(), ConsensusPoWError> {
    let prev_block_id = *header.prev_block_id();
    let prev_block_index = block_index_handle
        .get_block_index(&prev_block_id)
        .map_err(|err| {
            ConsensusPoWError::PrevBlockLoadError(prev_block_id, *header.block_id(), err)
        })?
        .ok_or_else(|| ConsensusPoWError::PrevBlockNotFound(prev_block_id, *header.block_id()))?;

    select_and_check(chain_config, &prev_block_index, header, block_index_handle)
}
