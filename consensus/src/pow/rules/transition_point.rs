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
use common::chain::PoWChainConfig;
use logging::log;

use super::RuleContext;
use crate::pow::{
    helpers::{calculate_new_target, prev_block_target},
    ConsensusPoWError, DifficultyViolation,
};

/// Classic retarget: scale the previous target by how long the last interval took.
pub(super) fn check<H: BlockIndexHandle>(
    ctx: &RuleContext,
    pow_config: &PoWChainConfig,
    prev_block_index: &BlockIndex,
    block_index_handle: &H,
) -> Result<(), ConsensusPoWError> {
    // Go back by what we want to be 14 days worth of blocks (the last 2015 blocks)
    let depth = pow_config.interval() - 1;
    let interval_start = block_index_handle
        .get_ancestor_at_distance(prev_block_index, depth)?
        .ok_or_else(|| ctx.insufficient_history(depth))?;

    let actual_timespan = prev_block_index
        .block_timestamp()
        .seconds_since(interval_start.block_timestamp());
    let old_target = prev_block_target(prev_block_index)?;
    let new_target = calculate_new_target(pow_config, actual_timespan, &old_target);

    log::debug!(
        "Retarget at height {}: timespan {}s, target {} -> {}",
        ctx.height,
        actual_timespan,
        old_target,
        new_target
    );

    ctx.require_target(&new_target, |expected, actual| {
        DifficultyViolation::UnexpectedDifficulty { expected, actual }
    })
}
