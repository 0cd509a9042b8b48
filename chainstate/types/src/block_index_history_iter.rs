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

use crate::{BlockIndex, BlockIndexHandle, PropertyQueryError};

enum IterState {
    Start(BlockIndex),
    After(BlockIndex),
    Done,
}

/// An iterator that yields the starting block and then, on every `next()` call, the previous
/// block index.
///
/// Iteration ends at genesis or where the stored history ends. A storage failure is yielded
/// once, then the iterator is exhausted.
pub struct BlockIndexHistoryIterator<'a, H: ?Sized> {
    state: IterState,
    block_index_handle: &'a H,
}

impl<'a, H: BlockIndexHandle + ?Sized> BlockIndexHistoryIterator<'a, H> {
    #[must_use]
    pub fn new(start: BlockIndex, block_index_handle: &'a H) -> Self {
        Self {
            state: IterState::Start(start),
            block_index_handle,
        }
    }
}

impl<H: BlockIndexHandle + ?Sized> Iterator for BlockIndexHistoryIterator<'_, H> {
    type Item = Result<BlockIndex, PropertyQueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.state, IterState::Done) {
            IterState::Done => None,
            IterState::Start(block_index) => {
                self.state = IterState::After(block_index.clone());
                Some(Ok(block_index))
            }
            IterState::After(block_index) => {
                match self.block_index_handle.get_prev_block_index(&block_index) {
                    Ok(Some(prev)) => {
                        self.state = IterState::After(prev.clone());
                        Some(Ok(prev))
                    }
                    Ok(None) => None,
                    Err(err) => Some(Err(err)),
                }
            }
        }
    }
}
