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

use thiserror::Error;

use chainstate_types::PropertyQueryError;
use common::{
    chain::BlockId,
    primitives::{BlockHeight, Compact},
};

use super::PoWRule;

/// Why a block's difficulty bits were rejected.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DifficultyViolation {
    #[error("Unexpected difficulty: expected {expected}, got {actual}")]
    UnexpectedDifficulty { expected: Compact, actual: Compact },
    #[error("Difficulty must be reduced to {expected} after slow blocks, got {actual}")]
    UnexpectedReducedDifficulty { expected: Compact, actual: Compact },
    #[error("Difficulty must not change from {expected}, got {actual}")]
    UnexpectedDifficultyChange { expected: Compact, actual: Compact },
    #[error("Minimal difficulty {expected} required after a long gap, got {actual}")]
    MinimalDifficultyRequired { expected: Compact, actual: Compact },
    #[error("Testnet block must return to difficulty {expected}, got {actual}")]
    DisallowedTestnetTransition { expected: Compact, actual: Compact },
    #[error("Bits {0} do not encode a valid target")]
    InvalidCompactTarget(Compact),
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ConsensusPoWError {
    #[error("Block at height {height} violates the {rule} rule: {violation}")]
    RuleViolation {
        rule: PoWRule,
        height: BlockHeight,
        violation: DifficultyViolation,
    },
    #[error("The {rule} rule needs {depth} ancestors of the block at height {height}")]
    InsufficientHistory {
        rule: PoWRule,
        height: BlockHeight,
        depth: u64,
    },
    #[error("Block storage error: `{0}`")]
    StorageError(#[from] PropertyQueryError),
    #[error("Bits of a stored block do not encode a valid target: {0}")]
    PreviousBitsDecodingFailed(Compact),
    #[error("Empty difficulty adjustment window from height {first_height} to {last_height}")]
    InvalidDaaWindow {
        first_height: BlockHeight,
        last_height: BlockHeight,
    },
    #[error("No work done from height {first_height} to {last_height}")]
    ZeroWorkInDaaWindow {
        first_height: BlockHeight,
        last_height: BlockHeight,
    },
    #[error("Previous block {0} of block {1} not found in database")]
    PrevBlockNotFound(BlockId, BlockId),
    #[error("Error while loading previous block {0} of block {1} with error {2}")]
    PrevBlockLoadError(BlockId, BlockId, PropertyQueryError),
}

/// How the caller should treat a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoWErrorClass {
    /// The block itself is invalid and can be marked as such.
    BadBlock,
    /// The block can't be judged until more of the chain is known.
    MissingHistory,
    /// Storage or data problems on our side; nothing is known about the block.
    General,
}

impl ConsensusPoWError {
    pub fn error_class(&self) -> PoWErrorClass {
        match self {
            ConsensusPoWError::RuleViolation { .. } => PoWErrorClass::BadBlock,
            ConsensusPoWError::InsufficientHistory { .. }
            | ConsensusPoWError::PrevBlockNotFound(_, _) => PoWErrorClass::MissingHistory,
            ConsensusPoWError::StorageError(_)
            | ConsensusPoWError::PreviousBitsDecodingFailed(_)
            | ConsensusPoWError::InvalidDaaWindow { .. }
            | ConsensusPoWError::ZeroWorkInDaaWindow { .. }
            | ConsensusPoWError::PrevBlockLoadError(_, _, _) => PoWErrorClass::General,
        }
    }

    pub(crate) fn violation(
        rule: PoWRule,
        height: BlockHeight,
        violation: DifficultyViolation,
    ) -> Self {
        ConsensusPoWError::RuleViolation {
            rule,
            height,
            violation,
        }
    }
}
