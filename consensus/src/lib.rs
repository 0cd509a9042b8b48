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

//! Proof of work consensus checks: which difficulty rules apply to a block and whether its
//! difficulty bits obey them.

mod pow;

pub use crate::pow::{
    calculate_median_time_past, check_pow_consensus, check_proof_of_work, compute_target,
    select_and_check, select_rule, select_rules, suitable_block, ConsensusPoWError,
    DifficultyViolation, PoWErrorClass, PoWRule, PoWRuleSet,
};
