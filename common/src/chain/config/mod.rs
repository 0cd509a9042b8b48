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

mod builder;

pub use builder::Builder;

use crate::chain::PoWChainConfig;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChainType {
    Mainnet,
    Testnet,
    Regtest,
}

impl ChainType {
    pub const fn name(&self) -> &'static str {
        match self {
            ChainType::Mainnet => "mainnet",
            ChainType::Testnet => "testnet",
            ChainType::Regtest => "regtest",
        }
    }

    /// Whether blocks of this chain carry no real proof of work requirement.
    pub const fn skips_difficulty_checks(&self) -> bool {
        match self {
            ChainType::Mainnet | ChainType::Testnet => false,
            ChainType::Regtest => true,
        }
    }

    /// Whether the testnet minimum difficulty exceptions exist on this chain.
    pub const fn allow_min_difficulty_blocks(&self) -> bool {
        match self {
            ChainType::Mainnet | ChainType::Regtest => false,
            ChainType::Testnet => true,
        }
    }
}

impl std::fmt::Display for ChainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ChainType {
    type Err = ChainTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(ChainType::Mainnet),
            "testnet" => Ok(ChainType::Testnet),
            "regtest" => Ok(ChainType::Regtest),
            _ => Err(ChainTypeParseError(s.to_owned())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
#[error("Unknown chain type: {0}")]
pub struct ChainTypeParseError(String);

/// Consensus parameters of one network.
///
/// Built once per network and passed by reference wherever it is needed; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    chain_type: ChainType,
    pow_chain_config: PoWChainConfig,
}

impl ChainConfig {
    pub fn chain_type(&self) -> ChainType {
        self.chain_type
    }

    pub fn pow_chain_config(&self) -> &PoWChainConfig {
        &self.pow_chain_config
    }
}

pub fn create_mainnet() -> ChainConfig {
    Builder::new(ChainType::Mainnet).build()
}

pub fn create_testnet() -> ChainConfig {
    Builder::new(ChainType::Testnet).build()
}

pub fn create_regtest() -> ChainConfig {
    Builder::new(ChainType::Regtest).build()
}
