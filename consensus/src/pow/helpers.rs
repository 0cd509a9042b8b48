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

use chainstate_types::BlockIndex;
use common::{
    chain::PoWChainConfig,
    primitives::{BlockHeight, Target},
};

use crate::pow::ConsensusPoWError;

/// Whether the block following `prev_height` starts a new classic retarget interval.
pub fn is_difficulty_transition_point(interval: u64, prev_height: BlockHeight) -> bool {
    prev_height.next_height().is_interval_boundary(interval)
}

/// Returns a calculated new target.
/// See Bitcoin's Protocol rules of [Difficulty change](https://en.bitcoin.it/wiki/Protocol_rules)
/// # Arguments
/// `actual_timespan_of_last_interval` - the difference in seconds between the previous block and
/// the first block of its interval; it can be negative when timestamps go backwards.
/// `old_target` - the decoded bits of the previous block.
pub fn calculate_new_target(
    pow_config: &PoWChainConfig,
    actual_timespan_of_last_interval: i64,
    old_target: &Target,
) -> Target {
    let actual_timespan = num::clamp(
        u64::try_from(actual_timespan_of_last_interval).unwrap_or(0),
        pow_config.min_target_timespan_in_secs(),
        pow_config.max_target_timespan_in_secs(),
    );

    // new target is computed by multiplying the old target by ratio of the actual timespan / target timespan.
    let new_target = old_target.as_biguint() * BigUint::from(actual_timespan)
        / BigUint::from(pow_config.target_timespan_in_secs());

    Target::clamped(new_target, pow_config.limit())
}

pub fn prev_block_target(prev_block_index: &BlockIndex) -> Result<Target, ConsensusPoWError> {
    prev_block_index
        .bits()
        .to_target()
        .map_err(|_| ConsensusPoWError::PreviousBitsDecodingFailed(prev_block_index.bits()))
}

pub mod special_rules {
    /// Checks if it took > 2 target spacings (20 minutes on testnet) to find a block.
    /// A block dated before its predecessor never counts as stalled.
    pub fn block_production_stalled(target_spacing_in_secs: u64, gap_in_secs: i64) -> bool {
        u64::try_from(gap_in_secs)
            .map(|gap| gap > target_spacing_in_secs.saturating_mul(2))
            .unwrap_or(false)
    }
}
