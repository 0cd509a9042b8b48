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

use num::{BigUint, CheckedSub, One, Zero};

use chainstate_types::{BlockIndex, BlockIndexHandle, PropertyQueryError};
use common::{chain::PoWChainConfig, primitives::Target};
use logging::log;

use super::RuleContext;
use crate::pow::{ConsensusPoWError, DifficultyViolation};

/// Number of blocks the work is averaged over.
const DAA_WINDOW: u64 = 144;
/// The first block of the window is picked from this block and its two predecessors.
const REQUIRED_DEPTH: u64 = DAA_WINDOW + 2;
/// Bounds of the window timespan, in target spacings.
const MIN_TIMESPAN_SPACINGS: u64 = 72;
const MAX_TIMESPAN_SPACINGS: u64 = 288;

/// The target is derived from the work done over the last 144 blocks and the time it took.
pub(super) fn check<H: BlockIndexHandle>(
    ctx: &RuleContext,
    pow_config: &PoWChainConfig,
    prev_block_index: &BlockIndex,
    block_index_handle: &H,
) -> Result<(), ConsensusPoWError> {
    let last = suitable_block(block_index_handle, prev_block_index)?
        .ok_or_else(|| ctx.insufficient_history(REQUIRED_DEPTH))?;

    let window_start = block_index_handle
        .get_ancestor_at_distance(prev_block_index, DAA_WINDOW)?
        .ok_or_else(|| ctx.insufficient_history(REQUIRED_DEPTH))?;
    let first = suitable_block(block_index_handle, &window_start)?
        .ok_or_else(|| ctx.insufficient_history(REQUIRED_DEPTH))?;

    let new_target = compute_target(pow_config, &first, &last)?;
    log::debug!(
        "New difficulty adjustment at height {}: window {}..{}, target {}",
        ctx.height,
        first.block_height(),
        last.block_height(),
        new_target
    );

    ctx.require_target(&new_target, |expected, actual| {
        DifficultyViolation::UnexpectedDifficulty { expected, actual }
    })
}

/// The median by timestamp of `block_index` and its two predecessors, which keeps a single
/// block with a skewed timestamp from moving the window bounds.
///
/// `Ok(None)` if one of the predecessors isn't stored.
pub fn suitable_block<H: BlockIndexHandle>(
    block_index_handle: &H,
    block_index: &BlockIndex,
) -> Result<Option<BlockIndex>, PropertyQueryError> {
    let Some(prev) = block_index_handle.get_prev_block_index(block_index)? else {
        return Ok(None);
    };
    let Some(prev_prev) = block_index_handle.get_prev_block_index(&prev)? else {
        return Ok(None);
    };

    let mut blocks = [prev_prev, prev, block_index.clone()];
    if blocks[0].block_timestamp() > blocks[2].block_timestamp() {
        blocks.swap(0, 2);
    }
    if blocks[0].block_timestamp() > blocks[1].block_timestamp() {
        blocks.swap(0, 1);
    }
    if blocks[1].block_timestamp() > blocks[2].block_timestamp() {
        blocks.swap(1, 2);
    }

    let [_, median, _] = blocks;
    Ok(Some(median))
}

/// Target for the work done between `first` and `last`, with the timespan bounded to
/// `[72, 288]` target spacings. The result is capped at the network limit.
pub fn compute_target(
    pow_config: &PoWChainConfig,
    first: &BlockIndex,
    last: &BlockIndex,
) -> Result<Target, ConsensusPoWError> {
    let first_height = first.block_height();
    let last_height = last.block_height();
    if last_height <= first_height {
        return Err(ConsensusPoWError::InvalidDaaWindow {
            first_height,
            last_height,
        });
    }

    let spacing = pow_config.target_spacing_in_secs();
    let actual_timespan = last.block_timestamp().seconds_since(first.block_timestamp());
    let timespan = num::clamp(
        u64::try_from(actual_timespan).unwrap_or(0),
        MIN_TIMESPAN_SPACINGS.saturating_mul(spacing),
        MAX_TIMESPAN_SPACINGS.saturating_mul(spacing),
    );

    let window_work = last.chain_work().checked_sub(first.chain_work()).unwrap_or_default();
    let work = window_work * BigUint::from(spacing) / BigUint::from(timespan);
    if work.is_zero() {
        return Err(ConsensusPoWError::ZeroWorkInDaaWindow {
            first_height,
            last_height,
        });
    }

    // 2^256 / work - 1, which is the target whose block work is `work`
    let quotient = (BigUint::one() << 256u32) / work;
    let target = quotient.checked_sub(&BigUint::one()).unwrap_or_default();

    Ok(Target::clamped(target, pow_config.limit()))
}
