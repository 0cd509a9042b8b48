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

use std::num::NonZeroU64;

use crate::{
    chain::config::ChainType,
    primitives::{BlockHeight, BlockTimestamp, Compact, Target},
};

/// 15th February 2012, from which testnet allows minimum difficulty blocks.
pub const TESTNET_MIN_DIFFICULTY_CUTOVER: BlockTimestamp =
    BlockTimestamp::from_int_seconds(1_329_264_000);

const DEFAULT_INTERVAL: NonZeroU64 = match NonZeroU64::new(2016) {
    Some(v) => v,
    None => panic!("retarget interval cannot be 0"),
};
const DEFAULT_TARGET_TIMESPAN: NonZeroU64 = match NonZeroU64::new(14 * 24 * 60 * 60) {
    Some(v) => v,
    None => panic!("target timespan cannot be 0"),
};
const DEFAULT_TARGET_SPACING: NonZeroU64 = match NonZeroU64::new(10 * 60) {
    Some(v) => v,
    None => panic!("target spacing cannot be 0"),
};

/// Chain Parameters for Proof of Work.
///
/// See in Bitcoin's [chainparams.cpp](https://github.com/bitcoin/bitcoin/blob/eca694a4e78d54ce4e29b388b3e81b06e55c2293/src/chainparams.cpp)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoWChainConfig {
    /// Number of blocks between two classic retargets
    pub(in crate::chain) interval: NonZeroU64,
    pub(in crate::chain) target_timespan: NonZeroU64,
    pub(in crate::chain) target_spacing: NonZeroU64,
    /// The lowest possible difficulty
    pub(in crate::chain) limit: Target,
    /// Height of the previous block from which the new difficulty adjustment algorithm applies
    pub(in crate::chain) daa_activation_height: BlockHeight,
    /// Blocks with later timestamps may use the testnet minimum difficulty rules
    pub(in crate::chain) min_difficulty_cutover: BlockTimestamp,
}

impl PoWChainConfig {
    pub fn new(chain_type: ChainType) -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            target_timespan: DEFAULT_TARGET_TIMESPAN,
            target_spacing: DEFAULT_TARGET_SPACING,
            limit: limit(chain_type),
            daa_activation_height: daa_activation_height(chain_type),
            min_difficulty_cutover: TESTNET_MIN_DIFFICULTY_CUTOVER,
        }
    }

    /// The difficulty changes every 2016 blocks, or approximately 2 weeks, before the DAA.
    pub fn interval(&self) -> u64 {
        self.interval.get()
    }

    pub fn target_timespan_in_secs(&self) -> u64 {
        self.target_timespan.get()
    }

    /// The average rate of generating a block is set to every 10 minutes
    pub fn target_spacing_in_secs(&self) -> u64 {
        self.target_spacing.get()
    }

    /// A single classic retarget never changes the target by more than a factor of 4.
    /// See Bitcoin's [Target](https://en.bitcoin.it/wiki/Target) article.
    pub const fn max_retarget_factor(&self) -> u64 {
        4
    }

    pub fn min_target_timespan_in_secs(&self) -> u64 {
        self.target_timespan_in_secs() / self.max_retarget_factor()
    }

    pub fn max_target_timespan_in_secs(&self) -> u64 {
        self.target_timespan_in_secs().saturating_mul(self.max_retarget_factor())
    }

    pub fn limit(&self) -> &Target {
        &self.limit
    }

    pub fn daa_activation_height(&self) -> BlockHeight {
        self.daa_activation_height
    }

    pub fn min_difficulty_cutover(&self) -> BlockTimestamp {
        self.min_difficulty_cutover
    }
}

fn limit(chain_type: ChainType) -> Target {
    let bits = match chain_type {
        ChainType::Mainnet | ChainType::Testnet => Compact(0x1d00ffff),
        ChainType::Regtest => Compact(0x207fffff),
    };
    bits.to_target().expect("network limits are valid compact targets")
}

const fn daa_activation_height(chain_type: ChainType) -> BlockHeight {
    match chain_type {
        ChainType::Mainnet => BlockHeight::new(504_031),
        ChainType::Testnet => BlockHeight::new(1_188_697),
        ChainType::Regtest => BlockHeight::new(0),
    }
}
