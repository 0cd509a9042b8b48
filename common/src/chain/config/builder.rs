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
    chain::{config::ChainType, ChainConfig, PoWChainConfig},
    primitives::{BlockHeight, BlockTimestamp, Target},
};

/// Builder for [ChainConfig]
///
/// Starts from the parameters of the given chain type; every setter overrides one of them.
#[derive(Debug, Clone)]
pub struct Builder {
    chain_type: ChainType,
    pow_chain_config: PoWChainConfig,
}

impl Builder {
    pub fn new(chain_type: ChainType) -> Self {
        Self {
            chain_type,
            pow_chain_config: PoWChainConfig::new(chain_type),
        }
    }

    pub fn build(self) -> ChainConfig {
        ChainConfig {
            chain_type: self.chain_type,
            pow_chain_config: self.pow_chain_config,
        }
    }

    pub fn interval(mut self, interval: NonZeroU64) -> Self {
        self.pow_chain_config.interval = interval;
        self
    }

    pub fn target_timespan(mut self, secs: NonZeroU64) -> Self {
        self.pow_chain_config.target_timespan = secs;
        self
    }

    pub fn target_spacing(mut self, secs: NonZeroU64) -> Self {
        self.pow_chain_config.target_spacing = secs;
        self
    }

    pub fn limit(mut self, limit: Target) -> Self {
        self.pow_chain_config.limit = limit;
        self
    }

    pub fn daa_activation_height(mut self, height: BlockHeight) -> Self {
        self.pow_chain_config.daa_activation_height = height;
        self
    }

    pub fn min_difficulty_cutover(mut self, timestamp: BlockTimestamp) -> Self {
        self.pow_chain_config.min_difficulty_cutover = timestamp;
        self
    }
}
