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
use common::{chain::PoWChainConfig, primitives::Target};
use logging::log;

use super::RuleContext;
use crate::pow::{
    helpers::prev_block_target, median_time::calculate_median_time_past, ConsensusPoWError,
    DifficultyViolation,
};

/// The median time past is compared with the one this many blocks back.
const MTP_DISTANCE: u64 = 6;
/// Blocks needed below the previous block for both medians to cover 11 blocks.
const REQUIRED_DEPTH: u64 = MTP_DISTANCE + 10;
const EMERGENCY_GAP_SECS: i64 = 12 * 60 * 60;

/// If the last 6 blocks took 12 hours or more, difficulty drops by a quarter. Otherwise it must
/// not change.
pub(super) fn check<H: BlockIndexHandle>(
    ctx: &RuleContext,
    pow_config: &PoWChainConfig,
    prev_block_index: &BlockIndex,
    block_index_handle: &H,
) -> Result<(), ConsensusPoWError> {
    if block_index_handle
        .get_ancestor_at_distance(prev_block_index, REQUIRED_DEPTH)?
        .is_none()
    {
        log::trace!(
            "Not enough history for the {} rule at height {}, accepting",
            ctx.rule,
            ctx.height
        );
        return Ok(());
    }

    let cursor = block_index_handle
        .get_ancestor_at_distance(prev_block_index, MTP_DISTANCE)?
        .ok_or_else(|| ctx.insufficient_history(MTP_DISTANCE))?;

    let mtp_prev = calculate_median_time_past(block_index_handle, prev_block_index)?;
    let mtp_cursor = calculate_median_time_past(block_index_handle, &cursor)?;
    let gap = mtp_prev.seconds_since(mtp_cursor);

    if gap >= EMERGENCY_GAP_SECS {
        let prev_target = prev_block_target(prev_block_index)?.into_biguint();
        let reduced = Target::clamped(&prev_target + (&prev_target >> 2), pow_config.limit());
        log::debug!(
            "Emergency difficulty adjustment at height {}: median time gap {}s, target {}",
            ctx.height,
            gap,
            reduced
        );
        ctx.require_target(&reduced, |expected, actual| {
            DifficultyViolation::UnexpectedReducedDifficulty { expected, actual }
        })
    } else {
        ctx.require_difficulty(prev_block_index.bits(), |expected, actual| {
            DifficultyViolation::UnexpectedDifficultyChange { expected, actual }
        })
    }
}

#[cfg(test)]
mod tests {
    use chainstate_test_framework::TestFramework;
    use common::{
        chain::config::create_mainnet,
        primitives::{BlockHeight, BlockTimestamp, Compact},
    };
    use rstest::rstest;
    use test_utils::{
        assert_matches,
        random::{make_seedable_rng, Rng, Seed},
    };

    use super::*;
    use crate::pow::PoWRule;

    const RULE: PoWRule = PoWRule::EmergencyDifficultyAdjustment;
    const MAX_BITS: Compact = Compact(0x1d00ffff);
    // Half of the mainnet limit
    const HALF_MAX_BITS: Compact = Compact(0x1c7fff80);

    fn ts(secs: u32) -> BlockTimestamp {
        BlockTimestamp::from_int_seconds(secs)
    }

    // With a steady spacing the median time gap over 6 blocks is 6 spacings.
    fn chain(len: usize, spacing: u32, bits: Compact) -> TestFramework {
        let mut tf = TestFramework::new(ts(1_500_000_000), bits);
        tf.create_chain(len, spacing, bits);
        tf
    }

    #[test]
    fn slow_blocks_reduce_difficulty() {
        let config = create_mainnet();
        // 6 * 7800s = 13h
        let mut tf = chain(20, 7_800, HALF_MAX_BITS);
        let prev = tf.best_block_index();

        let reduced = Compact(0x1d009fff);
        let header = tf.candidate_header(ts(1_600_000_000), reduced);
        assert_eq!(RULE.check(&config, &prev, &header, &tf), Ok(()));

        let header = tf.candidate_header(ts(1_600_000_000), HALF_MAX_BITS);
        assert_eq!(
            RULE.check(&config, &prev, &header, &tf),
            Err(ConsensusPoWError::RuleViolation {
                rule: RULE,
                height: BlockHeight::new(21),
                violation: DifficultyViolation::UnexpectedReducedDifficulty {
                    expected: reduced,
                    actual: HALF_MAX_BITS,
                },
            })
        );
    }

    #[test]
    fn reduction_is_capped_at_limit() {
        let config = create_mainnet();
        let mut tf = chain(20, 7_800, MAX_BITS);
        let prev = tf.best_block_index();

        let header = tf.candidate_header(ts(1_600_000_000), MAX_BITS);
        assert_eq!(RULE.check(&config, &prev, &header, &tf), Ok(()));
    }

    #[rstest]
    #[trace]
    #[case(Seed::from_entropy())]
    fn normal_blocks_keep_difficulty(#[case] seed: Seed) {
        let mut rng = make_seedable_rng(seed);
        let config = create_mainnet();
        // At most 6 * 7199s, just under 12h
        let mut tf = chain(20, rng.gen_range(1..7_200), HALF_MAX_BITS);
        let prev = tf.best_block_index();

        let header = tf.candidate_header(ts(1_600_000_000), HALF_MAX_BITS);
        assert_eq!(RULE.check(&config, &prev, &header, &tf), Ok(()));

        let header = tf.candidate_header(ts(1_600_000_000), Compact(0x1d009fff));
        assert_eq!(
            RULE.check(&config, &prev, &header, &tf),
            Err(ConsensusPoWError::RuleViolation {
                rule: RULE,
                height: BlockHeight::new(21),
                violation: DifficultyViolation::UnexpectedDifficultyChange {
                    expected: HALF_MAX_BITS,
                    actual: Compact(0x1d009fff),
                },
            })
        );
    }

    #[test]
    fn unchanged_difficulty_in_another_encoding() {
        let config = create_mainnet();
        let prev_bits = Compact(0x1b123400);
        let mut tf = chain(20, 600, prev_bits);
        let prev = tf.best_block_index();

        let header = tf.candidate_header(ts(1_600_000_000), Compact(0x1c001234));
        assert_eq!(RULE.check(&config, &prev, &header, &tf), Ok(()));

        let header = tf.candidate_header(ts(1_600_000_000), Compact(0x1c001235));
        assert_matches!(
            RULE.check(&config, &prev, &header, &tf),
            Err(ConsensusPoWError::RuleViolation {
                violation: DifficultyViolation::UnexpectedDifficultyChange { .. },
                ..
            })
        );
    }

    #[test]
    fn exactly_twelve_hours_is_an_emergency() {
        let config = create_mainnet();
        let mut tf = chain(20, 7_200, HALF_MAX_BITS);
        let prev = tf.best_block_index();

        let header = tf.candidate_header(ts(1_600_000_000), Compact(0x1d009fff));
        assert_eq!(RULE.check(&config, &prev, &header, &tf), Ok(()));
    }

    #[rstest]
    #[case(15, Ok(()))]
    #[case(16, Err(()))]
    fn short_chain_is_exempt(#[case] len: usize, #[case] expected: Result<(), ()>) {
        let config = create_mainnet();
        let mut tf = chain(len, 600, HALF_MAX_BITS);
        let prev = tf.best_block_index();

        let header = tf.candidate_header(ts(1_600_000_000), Compact(0x1b0404cb));
        assert_eq!(
            RULE.check(&config, &prev, &header, &tf).map_err(|_| ()),
            expected
        );
    }

    #[test]
    fn forgotten_history_is_exempt() {
        let config = create_mainnet();
        let mut tf = chain(30, 600, HALF_MAX_BITS);
        tf.forget_below(15);
        let prev = tf.best_block_index();

        let header = tf.candidate_header(ts(1_600_000_000), Compact(0x1b0404cb));
        assert_eq!(RULE.check(&config, &prev, &header, &tf), Ok(()));
    }

    #[test]
    fn storage_error_is_not_an_exemption() {
        let config = create_mainnet();
        let mut tf = chain(30, 600, HALF_MAX_BITS);
        tf.fail_reads_at(15);
        let prev = tf.best_block_index();

        let header = tf.candidate_header(ts(1_600_000_000), HALF_MAX_BITS);
        assert_matches!(
            RULE.check(&config, &prev, &header, &tf),
            Err(ConsensusPoWError::StorageError(_))
        );
    }

    #[test]
    fn undecodable_previous_bits() {
        let config = create_mainnet();
        let mut tf = chain(20, 7_800, HALF_MAX_BITS);
        tf.make_block_builder().with_spacing(7_800).with_bits(Compact(0x01fedcba)).build();
        let prev = tf.best_block_index();

        let header = tf.candidate_header(ts(1_600_000_000), HALF_MAX_BITS);
        assert_eq!(
            RULE.check(&config, &prev, &header, &tf),
            Err(ConsensusPoWError::PreviousBitsDecodingFailed(Compact(0x01fedcba)))
        );
    }
}
