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
use common::chain::{BlockHeader, ChainConfig};
use logging::log;

use crate::pow::{helpers::is_difficulty_transition_point, PoWRule, PoWRuleSet};

/// The difficulty rule that applies to `header` on top of `prev_block_index`.
///
/// Depends only on the network, the previous block's height and bits, and the header's
/// timestamp.
pub fn select_rule(
    chain_config: &ChainConfig,
    prev_block_index: &BlockIndex,
    header: &BlockHeader,
) -> PoWRule {
    let chain_type = chain_config.chain_type();
    let pow_config = chain_config.pow_chain_config();
    let prev_height = prev_block_index.block_height();
    let min_difficulty_allowed = chain_type.allow_min_difficulty_blocks()
        && header.timestamp() > pow_config.min_difficulty_cutover();

    let rule = if chain_type.skips_difficulty_checks() {
        PoWRule::RegTest
    } else if prev_height >= pow_config.daa_activation_height() {
        if min_difficulty_allowed {
            PoWRule::MinimalDifficulty
        } else {
            PoWRule::NewDifficultyAdjustment
        }
    } else if is_difficulty_transition_point(pow_config.interval(), prev_height) {
        PoWRule::DifficultyTransitionPoint
    } else if min_difficulty_allowed {
        PoWRule::LastNonMinimalDifficulty
    } else if prev_block_index.bits().matches_target(pow_config.limit()) {
        PoWRule::MinimalDifficultyNoChange
    } else {
        PoWRule::EmergencyDifficultyAdjustment
    };

    log::trace!(
        "Selected the {} rule for the block at height {} on {}",
        rule,
        prev_height.next_height(),
        chain_type
    );
    rule
}

/// The rule set a block has to satisfy. It always holds exactly the rule from [`select_rule`].
pub fn select_rules(
    chain_config: &ChainConfig,
    prev_block_index: &BlockIndex,
    header: &BlockHeader,
) -> PoWRuleSet {
    select_rule(chain_config, prev_block_index, header).into()
}

#[cfg(test)]
mod tests {
    use num::BigUint;
    use rstest::rstest;

    use common::{
        chain::config::{create_mainnet, create_regtest, create_testnet},
        primitives::{BlockHeight, BlockTimestamp, Compact, H256},
    };
    use test_utils::random::{make_seedable_rng, Rng, Seed};

    use super::*;

    const MAX_BITS: Compact = Compact(0x1d00ffff);
    const REAL_BITS: Compact = Compact(0x1c0fffff);
    const BEFORE_CUTOVER: u32 = 1_329_264_000;
    const AFTER_CUTOVER: u32 = 1_329_264_001;

    fn prev(height: u64, bits: Compact) -> BlockIndex {
        let header = BlockHeader::new(
            H256::from_low_u64_be(height + 1).into(),
            H256::from_low_u64_be(height).into(),
            BlockTimestamp::from_int_seconds(1_000),
            bits,
        );
        BlockIndex::new(header, BlockHeight::new(height), BigUint::from(height))
    }

    fn header(time: u32, bits: Compact) -> BlockHeader {
        BlockHeader::new(
            H256::repeat_byte(0xab).into(),
            H256::repeat_byte(0xcd).into(),
            BlockTimestamp::from_int_seconds(time),
            bits,
        )
    }

    #[rstest]
    // Regtest ignores everything else
    #[case(create_regtest(), 0, REAL_BITS, AFTER_CUTOVER, PoWRule::RegTest)]
    #[case(create_regtest(), 2015, MAX_BITS, BEFORE_CUTOVER, PoWRule::RegTest)]
    #[case(create_regtest(), 600_000, REAL_BITS, AFTER_CUTOVER, PoWRule::RegTest)]
    // Mainnet before the DAA
    #[case(create_mainnet(), 2015, MAX_BITS, AFTER_CUTOVER, PoWRule::DifficultyTransitionPoint)]
    #[case(create_mainnet(), 503_999, REAL_BITS, AFTER_CUTOVER, PoWRule::DifficultyTransitionPoint)]
    #[case(create_mainnet(), 2016, MAX_BITS, AFTER_CUTOVER, PoWRule::MinimalDifficultyNoChange)]
    #[case(create_mainnet(), 2016, REAL_BITS, AFTER_CUTOVER, PoWRule::EmergencyDifficultyAdjustment)]
    #[case(create_mainnet(), 504_030, REAL_BITS, AFTER_CUTOVER, PoWRule::EmergencyDifficultyAdjustment)]
    // Mainnet from the DAA activation on
    #[case(create_mainnet(), 504_031, REAL_BITS, AFTER_CUTOVER, PoWRule::NewDifficultyAdjustment)]
    #[case(create_mainnet(), 504_031, MAX_BITS, BEFORE_CUTOVER, PoWRule::NewDifficultyAdjustment)]
    #[case(create_mainnet(), 510_047, REAL_BITS, AFTER_CUTOVER, PoWRule::NewDifficultyAdjustment)]
    // Testnet before the DAA
    #[case(create_testnet(), 4031, REAL_BITS, AFTER_CUTOVER, PoWRule::DifficultyTransitionPoint)]
    #[case(create_testnet(), 4032, REAL_BITS, AFTER_CUTOVER, PoWRule::LastNonMinimalDifficulty)]
    #[case(create_testnet(), 4032, MAX_BITS, AFTER_CUTOVER, PoWRule::LastNonMinimalDifficulty)]
    #[case(create_testnet(), 4032, MAX_BITS, BEFORE_CUTOVER, PoWRule::MinimalDifficultyNoChange)]
    #[case(create_testnet(), 4032, REAL_BITS, BEFORE_CUTOVER, PoWRule::EmergencyDifficultyAdjustment)]
    // Testnet from the DAA activation on
    #[case(create_testnet(), 1_188_697, REAL_BITS, AFTER_CUTOVER, PoWRule::MinimalDifficulty)]
    #[case(create_testnet(), 1_188_697, REAL_BITS, BEFORE_CUTOVER, PoWRule::NewDifficultyAdjustment)]
    #[case(create_testnet(), 1_188_696, REAL_BITS, BEFORE_CUTOVER, PoWRule::EmergencyDifficultyAdjustment)]
    fn decision_table(
        #[case] chain_config: ChainConfig,
        #[case] prev_height: u64,
        #[case] prev_bits: Compact,
        #[case] time: u32,
        #[case] expected: PoWRule,
    ) {
        let prev = prev(prev_height, prev_bits);
        let header = header(time, REAL_BITS);
        assert_eq!(select_rule(&chain_config, &prev, &header), expected);
        assert_eq!(
            select_rules(&chain_config, &prev, &header).rules(),
            &[expected]
        );
    }

    #[rstest]
    #[trace]
    #[case(Seed::from_entropy())]
    fn depends_only_on_selection_inputs(#[case] seed: Seed) {
        let mut rng = make_seedable_rng(seed);

        for chain_config in [create_mainnet(), create_testnet(), create_regtest()] {
            for _ in 0..50 {
                let height = rng.gen_range(0..1_300_000);
                let bits = if rng.gen_bool(0.5) { MAX_BITS } else { REAL_BITS };
                let time = rng.gen_range(BEFORE_CUTOVER - 10..BEFORE_CUTOVER + 10);

                let prev_a = prev(height, bits);
                let header_a = header(time, bits);

                // Same selection inputs, everything else different
                let prev_b = BlockIndex::new(
                    BlockHeader::new(
                        H256::from_low_u64_be(rng.gen()).into(),
                        H256::from_low_u64_be(rng.gen()).into(),
                        BlockTimestamp::from_int_seconds(rng.gen()),
                        bits,
                    ),
                    BlockHeight::new(height),
                    BigUint::from(rng.gen::<u64>()),
                );
                let header_b = BlockHeader::new(
                    H256::from_low_u64_be(rng.gen()).into(),
                    H256::from_low_u64_be(rng.gen()).into(),
                    BlockTimestamp::from_int_seconds(time),
                    Compact(rng.gen()),
                );

                let rule = select_rule(&chain_config, &prev_a, &header_a);
                assert_eq!(select_rule(&chain_config, &prev_a, &header_a), rule);
                assert_eq!(select_rule(&chain_config, &prev_b, &header_b), rule);
            }
        }
    }
}
