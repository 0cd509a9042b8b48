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

use common::{chain::BlockId, primitives::BlockHeight};

use crate::{BlockIndex, BlockIndexHistoryIterator, PropertyQueryError};

/// Read access to the stored chain.
///
/// `Ok(None)` means the store doesn't have the block: either it never saw it or it only
/// keeps a recent part of the chain. Failures of the store itself are reported as errors and
/// must never be mistaken for missing history.
pub trait BlockIndexHandle {
    fn get_block_index(&self, block_id: &BlockId)
        -> Result<Option<BlockIndex>, PropertyQueryError>;

    /// The predecessor of `block_index`, or `None` at genesis or where stored history ends.
    fn get_prev_block_index(
        &self,
        block_index: &BlockIndex,
    ) -> Result<Option<BlockIndex>, PropertyQueryError> {
        if block_index.block_height().is_genesis() {
            return Ok(None);
        }

        let prev = match self.get_block_index(block_index.prev_block_id())? {
            Some(prev) => prev,
            None => return Ok(None),
        };

        if prev.block_height().next_height() != block_index.block_height() {
            return Err(PropertyQueryError::InconsistentPrevBlockHeight {
                block_id: *block_index.block_id(),
                height: block_index.block_height(),
                prev_height: prev.block_height(),
            });
        }

        Ok(Some(prev))
    }

    /// The block `distance` steps below `block_index`, `None` if history runs out first.
    fn get_ancestor_at_distance(
        &self,
        block_index: &BlockIndex,
        distance: u64,
    ) -> Result<Option<BlockIndex>, PropertyQueryError> {
        let mut cursor = block_index.clone();
        for _ in 0..distance {
            cursor = match self.get_prev_block_index(&cursor)? {
                Some(prev) => prev,
                None => return Ok(None),
            };
        }
        Ok(Some(cursor))
    }

    fn get_ancestor(
        &self,
        block_index: &BlockIndex,
        ancestor_height: BlockHeight,
    ) -> Result<Option<BlockIndex>, PropertyQueryError> {
        let block_height = block_index.block_height();
        if ancestor_height > block_height {
            return Err(PropertyQueryError::InvalidAncestorHeight {
                block_height,
                ancestor_height,
            });
        }

        let distance = block_height.into_int() - ancestor_height.into_int();
        self.get_ancestor_at_distance(block_index, distance)
    }

    /// Iterates over `start` and then its predecessors.
    fn history_iter(&self, start: BlockIndex) -> BlockIndexHistoryIterator<'_, Self>
    where
        Self: Sized,
    {
        BlockIndexHistoryIterator::new(start, self)
    }
}

impl<T: BlockIndexHandle + ?Sized> BlockIndexHandle for &T {
    fn get_block_index(
        &self,
        block_id: &BlockId,
    ) -> Result<Option<BlockIndex>, PropertyQueryError> {
        (**self).get_block_index(block_id)
    }
}
