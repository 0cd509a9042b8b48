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

use itertools::Itertools;

use chainstate_types::{BlockIndex, BlockIndexHandle, PropertyQueryError};
use common::primitives::BlockTimestamp;

const MEDIAN_TIME_SPAN: usize = 11;

/// The median timestamp of `block_index` and up to 10 of its ancestors.
///
/// Near genesis, or where stored history ends, fewer blocks take part.
pub fn calculate_median_time_past<H: BlockIndexHandle>(
    block_index_handle: &H,
    block_index: &BlockIndex,
) -> Result<BlockTimestamp, PropertyQueryError> {
    let time_values = block_index_handle
        .history_iter(block_index.clone())
        .take(MEDIAN_TIME_SPAN)
        .map_ok(|bi| bi.block_timestamp())
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .sorted()
        .collect::<Vec<_>>();

    Ok(time_values[time_values.len() / 2])
}
