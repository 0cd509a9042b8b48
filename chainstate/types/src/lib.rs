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

//! Stored block indexes and the read-only view of the chain the difficulty rules walk.

mod block_index;
mod block_index_handle;
mod block_index_history_iter;
mod error;

pub mod storage_result;

pub use crate::{
    block_index::BlockIndex, block_index_handle::BlockIndexHandle,
    block_index_history_iter::BlockIndexHistoryIterator, error::PropertyQueryError,
};
