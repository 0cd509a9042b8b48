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

use std::collections::{BTreeMap, BTreeSet};

use num::BigUint;

use chainstate_types::{storage_result, BlockIndex, BlockIndexHandle, PropertyQueryError};
use common::{
    chain::{BlockHeader, BlockId},
    primitives::{BlockHeight, BlockTimestamp, Compact, Target, H256},
};

use crate::BlockBuilder;

/// The chain store used in tests.
///
/// Blocks are kept in memory and form a single chain. Reads of selected blocks can be made to
/// fail, and the store can "forget" old blocks to model a node that only keeps recent history.
pub struct TestFramework {
    blocks: BTreeMap<BlockId, BlockIndex>,
    by_height: Vec<BlockId>,
    first_height: BlockHeight,
    forgotten: BTreeSet<BlockId>,
    failing: BTreeSet<BlockId>,
    next_id: u64,
}

impl TestFramework {
    /// A chain that starts with a genesis block.
    pub fn new(genesis_timestamp: BlockTimestamp, genesis_bits: Compact) -> Self {
        Self::starting_at(BlockHeight::zero(), genesis_timestamp, genesis_bits)
    }

    /// A chain whose first stored block is at `height`. Its predecessor is unknown to the store.
    pub fn starting_at(height: BlockHeight, timestamp: BlockTimestamp, bits: Compact) -> Self {
        let mut tf = Self {
            blocks: BTreeMap::new(),
            by_height: Vec::new(),
            first_height: height,
            forgotten: BTreeSet::new(),
            failing: BTreeSet::new(),
            next_id: 1,
        };

        let prev_block_id = H256::zero().into();
        let block_id = tf.new_block_id();
        let header = BlockHeader::new(block_id, prev_block_id, timestamp, bits);
        let chain_work = block_work(bits) * (height.into_int() + 1);
        tf.insert(BlockIndex::new(header, height, chain_work));
        tf
    }

    pub fn make_block_builder(&mut self) -> BlockBuilder {
        BlockBuilder::new(self)
    }

    /// Appends `count` blocks with the given bits, each `spacing` seconds after its predecessor.
    pub fn create_chain(&mut self, count: usize, spacing: u32, bits: Compact) -> BlockIndex {
        for _ in 0..count {
            self.make_block_builder().with_spacing(spacing).with_bits(bits).build();
        }
        self.best_block_index()
    }

    /// Appends a block on top of the current tip.
    pub fn process_block(&mut self, timestamp: BlockTimestamp, bits: Compact) -> BlockIndex {
        let prev = self.best_block_index();
        let header = BlockHeader::new(self.new_block_id(), *prev.block_id(), timestamp, bits);
        let chain_work = prev.chain_work() + block_work(bits);
        let block_index = BlockIndex::new(header, prev.block_height().next_height(), chain_work);
        self.insert(block_index.clone());
        block_index
    }

    /// A header that would extend the current tip, not added to the chain.
    pub fn candidate_header(&mut self, timestamp: BlockTimestamp, bits: Compact) -> BlockHeader {
        let prev_block_id = *self.best_block_index().block_id();
        BlockHeader::new(self.new_block_id(), prev_block_id, timestamp, bits)
    }

    pub fn best_block_index(&self) -> BlockIndex {
        let id = self.by_height.last().unwrap();
        self.blocks[id].clone()
    }

    pub fn best_block_height(&self) -> BlockHeight {
        self.best_block_index().block_height()
    }

    pub fn block_id(&self, height: u64) -> BlockId {
        let pos = height - self.first_height.into_int();
        self.by_height[pos as usize]
    }

    pub fn index_at(&self, height: u64) -> &BlockIndex {
        &self.blocks[&self.block_id(height)]
    }

    /// Makes the store answer "not found" for every block below `height`.
    pub fn forget_below(&mut self, height: u64) {
        let first = self.first_height.into_int();
        for h in first..height.min(self.best_block_height().into_int() + 1) {
            self.forgotten.insert(self.block_id(h));
        }
    }

    /// Makes reads of the block at `height` fail with a storage error.
    pub fn fail_reads_at(&mut self, height: u64) {
        self.failing.insert(self.block_id(height));
    }

    fn insert(&mut self, block_index: BlockIndex) {
        self.by_height.push(*block_index.block_id());
        self.blocks.insert(*block_index.block_id(), block_index);
    }

    fn new_block_id(&mut self) -> BlockId {
        let id = H256::from_low_u64_be(self.next_id);
        self.next_id += 1;
        id.into()
    }
}

impl BlockIndexHandle for TestFramework {
    fn get_block_index(
        &self,
        block_id: &BlockId,
    ) -> Result<Option<BlockIndex>, PropertyQueryError> {
        if self.failing.contains(block_id) {
            return Err(storage_result::Error::ReadFailed(format!("block {block_id}")).into());
        }
        if self.forgotten.contains(block_id) {
            return Ok(None);
        }
        Ok(self.blocks.get(block_id).cloned())
    }
}

/// The work implied by `bits`; undecodable bits count as no work.
pub fn block_work(bits: Compact) -> BigUint {
    Target::try_from(bits).map(|target| target.block_work()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use test_utils::random::{make_seedable_rng, Rng, Seed};

    use super::*;

    const BITS: Compact = Compact(0x1d00ffff);

    #[rstest]
    #[trace]
    #[case(Seed::from_entropy())]
    fn build_chain(#[case] seed: Seed) {
        let mut rng = make_seedable_rng(seed);
        let count = rng.gen_range(1..50);

        let mut tf = TestFramework::new(BlockTimestamp::from_int_seconds(1_000), BITS);
        let tip = tf.create_chain(count, 600, BITS);

        assert_eq!(tip.block_height(), BlockHeight::new(count as u64));
        assert_eq!(
            tip.block_timestamp(),
            BlockTimestamp::from_int_seconds(1_000 + 600 * count as u32)
        );
        assert_eq!(
            tip.chain_work(),
            &(block_work(BITS) * (count as u64 + 1))
        );

        let history = tf.history_iter(tip).collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(history.len(), count + 1);
        assert!(history.last().unwrap().block_height().is_genesis());
    }

    #[test]
    fn starting_above_genesis() {
        let mut tf = TestFramework::starting_at(
            BlockHeight::new(500),
            BlockTimestamp::from_int_seconds(1_000),
            BITS,
        );
        let tip = tf.create_chain(10, 600, BITS);
        assert_eq!(tip.block_height(), BlockHeight::new(510));
        assert_eq!(tf.index_at(505).block_height(), BlockHeight::new(505));
        assert_eq!(tf.get_ancestor_at_distance(&tip, 10).unwrap(), Some(tf.index_at(500).clone()));
        assert_eq!(tf.get_ancestor_at_distance(&tip, 11).unwrap(), None);
    }

    #[test]
    fn forgotten_and_failing_blocks() {
        let mut tf = TestFramework::new(BlockTimestamp::from_int_seconds(1_000), BITS);
        let tip = tf.create_chain(20, 600, BITS);

        tf.forget_below(5);
        assert_eq!(tf.get_ancestor_at_distance(&tip, 15).unwrap(), Some(tf.index_at(5).clone()));
        assert_eq!(tf.get_ancestor_at_distance(&tip, 16).unwrap(), None);

        tf.fail_reads_at(10);
        assert!(matches!(
            tf.get_ancestor_at_distance(&tip, 15),
            Err(PropertyQueryError::StorageError(_))
        ));
    }

    #[test]
    fn candidate_is_not_stored() {
        let mut tf = TestFramework::new(BlockTimestamp::from_int_seconds(1_000), BITS);
        let tip = tf.create_chain(3, 600, BITS);
        let header = tf.candidate_header(BlockTimestamp::from_int_seconds(5_000), Compact(0x1c7fffff));
        assert_eq!(header.prev_block_id(), tip.block_id());
        assert_eq!(tf.get_block_index(header.block_id()).unwrap(), None);
        assert_eq!(tf.best_block_index(), tip);
    }
}
