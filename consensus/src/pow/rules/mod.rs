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

//! The difficulty rules a block can be checked against.

mod emergency;
mod min_difficulty;
mod new_daa;
mod transition_point;

use chainstate_types::{BlockIndex, BlockIndexHandle};
use common::{
    chain::{BlockHeader, ChainConfig},
    primitives::{BlockHeight, Compact, Target},
};
use logging::log;

use crate::pow::{ConsensusPoWError, DifficultyViolation};

pub use new_daa::{compute_target, suitable_block};

/// A difficulty rule. Rules hold no state; everything they need comes from the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoWRule {
    /// Classic retarget at the end of every interval.
    DifficultyTransitionPoint,
    /// Difficulty drops by a quarter when blocks are slow, and stays put otherwise.
    EmergencyDifficultyAdjustment,
    /// Per-block retarget over the work of the last 144 blocks.
    NewDifficultyAdjustment,
    /// Testnet: the minimal difficulty is required after a long gap.
    MinimalDifficulty,
    /// Testnet: after minimal difficulty blocks, return to the last real difficulty.
    LastNonMinimalDifficulty,
    /// A chain at minimal difficulty stays there.
    MinimalDifficultyNoChange,
    RegTest,
}

impl PoWRule {
    pub const fn name(&self) -> &'static str {
        match self {
            PoWRule::DifficultyTransitionPoint => "difficulty transition point",
            PoWRule::EmergencyDifficultyAdjustment => "emergency difficulty adjustment",
            PoWRule::NewDifficultyAdjustment => "new difficulty adjustment",
            PoWRule::MinimalDifficulty => "minimal difficulty",
            PoWRule::LastNonMinimalDifficulty => "last non minimal difficulty",
            PoWRule::MinimalDifficultyNoChange => "minimal difficulty no change",
            PoWRule::RegTest => "regtest",
        }
    }

    /// Checks the bits of `header`, which extends `prev_block_index`.
    pub fn check<H: BlockIndexHandle>(
        &self,
        chain_config: &ChainConfig,
        prev_block_index: &BlockIndex,
        header: &BlockHeader,
        block_index_handle: &H,
    ) -> Result<(), ConsensusPoWError> {
        let pow_config = chain_config.pow_chain_config();
        let ctx = RuleContext {
            rule: *self,
            height: prev_block_index.block_height().next_height(),
            bits: header.bits(),
        };

        match self {
            PoWRule::DifficultyTransitionPoint => transition_point::check(
                &ctx,
                pow_config,
                prev_block_index,
                block_index_handle,
            ),
            PoWRule::EmergencyDifficultyAdjustment => {
                emergency::check(&ctx, pow_config, prev_block_index, block_index_handle)
            }
            PoWRule::NewDifficultyAdjustment => {
                new_daa::check(&ctx, pow_config, prev_block_index, block_index_handle)
            }
            PoWRule::MinimalDifficulty => {
                min_difficulty::check_minimal(&ctx, pow_config, prev_block_index, header)
            }
            PoWRule::LastNonMinimalDifficulty => min_difficulty::check_last_non_minimal(
                &ctx,
                pow_config,
                prev_block_index,
                header,
                block_index_handle,
            ),
            PoWRule::MinimalDifficultyNoChange => {
                min_difficulty::check_no_change(&ctx, pow_config, prev_block_index)
            }
            PoWRule::RegTest => Ok(()),
        }
    }
}

impl std::fmt::Display for PoWRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The rule being run and the candidate it judges.
struct RuleContext {
    rule: PoWRule,
    height: BlockHeight,
    bits: Compact,
}

impl RuleContext {
    fn reject(&self, violation: DifficultyViolation) -> ConsensusPoWError {
        log::warn!(
            "Block at height {} rejected by the {} rule: {}",
            self.height,
            self.rule,
            violation
        );
        ConsensusPoWError::violation(self.rule, self.height, violation)
    }

    fn insufficient_history(&self, depth: u64) -> ConsensusPoWError {
        ConsensusPoWError::InsufficientHistory {
            rule: self.rule,
            height: self.height,
            depth,
        }
    }

    fn ensure_decodable(&self) -> Result<(), ConsensusPoWError> {
        match self.bits.to_target() {
            Ok(_) => Ok(()),
            Err(_) => Err(self.reject(DifficultyViolation::InvalidCompactTarget(self.bits))),
        }
    }

    /// The candidate's bits must decode to `target` as it reads back from a header.
    fn require_target(
        &self,
        target: &Target,
        violation: impl FnOnce(Compact, Compact) -> DifficultyViolation,
    ) -> Result<(), ConsensusPoWError> {
        self.ensure_decodable()?;
        if self.bits.matches_target(target) {
            Ok(())
        } else {
            Err(self.reject(violation(Compact::from(target), self.bits)))
        }
    }

    /// The candidate must have the same difficulty as `expected`.
    fn require_difficulty(
        &self,
        expected: Compact,
        violation: impl FnOnce(Compact, Compact) -> DifficultyViolation,
    ) -> Result<(), ConsensusPoWError> {
        self.ensure_decodable()?;
        if self.bits.has_equal_difficulty(expected) {
            Ok(())
        } else {
            Err(self.reject(violation(expected, self.bits)))
        }
    }
}
