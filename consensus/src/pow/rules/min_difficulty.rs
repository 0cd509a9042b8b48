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

//! Rules that revolve around the minimal difficulty, i.e. the network limit.

use chainstate_types::{BlockIndex, BlockIndexHandle};
use common::chain::{BlockHeader, PoWChainConfig};
use logging::log;

use super::RuleContext;
use crate::pow::{helpers::special_rules, ConsensusPoWError, DifficultyViolation};

/// A block more than two target spacings after its predecessor must be at minimal difficulty.
pub(super) fn check_minimal(
    ctx: &RuleContext,
    pow_config: &PoWChainConfig,
    prev_block_index: &BlockIndex,
    header: &BlockHeader,
) -> Result<(), ConsensusPoWError> {
    let gap = header.timestamp().seconds_since(prev_block_index.block_timestamp());
    if !special_rules::block_production_stalled(pow_config.target_spacing_in_secs(), gap) {
        return Ok(());
    }

    ctx.require_target(pow_config.limit(), |expected, actual| {
        DifficultyViolation::MinimalDifficultyRequired { expected, actual }
    })
}

/// A block arriving on time after a run of minimal difficulty blocks must return to the
/// difficulty of the last block that wasn't one, or that started an interval.
pub(super) fn check_last_non_minimal<H: BlockIndexHandle>(
    ctx: &RuleContext,
    pow_config: &PoWChainConfig,
    prev_block_index: &BlockIndex,
    header: &BlockHeader,
    block_index_handle: &H,
) -> Result<(), ConsensusPoWError> {
    let gap = header.timestamp().seconds_since(prev_block_index.block_timestamp());
    if gap < 0 || special_rules::block_production_stalled(pow_config.target_spacing_in_secs(), gap)
    {
        return Ok(());
    }

    let limit = pow_config.limit();
    let interval = pow_config.interval();
    let is_minimal_run = |block_index: &BlockIndex| {
        let height = block_index.block_height();
        !height.is_genesis()
            && !height.is_interval_boundary(interval)
            && block_index.bits().matches_target(limit)
    };

    let reference = block_index_handle
        .history_iter(prev_block_index.clone())
        .find(|item| item.as_ref().map_or(true, |block_index| !is_minimal_run(block_index)));

    let reference = match reference {
        Some(reference) => reference?,
        None => {
            log::trace!(
                "History ended inside a minimal difficulty run at height {}, accepting",
                ctx.height
            );
            return Ok(());
        }
    };

    ctx.require_difficulty(reference.bits(), |expected, actual| {
        DifficultyViolation::DisallowedTestnetTransition { expected, actual }
    })
}

/// Once the previous block is at minimal difficulty, the next one stays there.
pub(super) fn check_no_change(
    ctx: &RuleContext,
    pow_config: &PoWChainConfig,
    prev_block_index: &BlockIndex,
) -> Result<(), ConsensusPoWError> {
    if !prev_block_index.bits().matches_target(pow_config.limit()) {
        return Ok(());
    }

    ctx.require_difficulty(prev_block_index.bits(), |expected, actual| {
        DifficultyViolation::UnexpectedDifficultyChange { expected, actual }
    })
}
