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

use std::{fmt::Display, time::Duration};

/// Block time as carried in the header, in seconds since the Unix epoch.
#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, Default)]
pub struct BlockTimestamp {
    timestamp: u32,
}

impl BlockTimestamp {
    pub const fn from_int_seconds(timestamp: u32) -> Self {
        Self { timestamp }
    }

    pub const fn as_int_seconds(&self) -> u32 {
        self.timestamp
    }

    pub fn as_duration_since_epoch(&self) -> Duration {
        Duration::from_secs(self.timestamp as u64)
    }

    /// Signed number of seconds from `earlier` to `self`.
    ///
    /// Header times are not monotonic, so the result may be negative.
    pub fn seconds_since(&self, earlier: BlockTimestamp) -> i64 {
        self.timestamp as i64 - earlier.timestamp as i64
    }

    pub fn add_seconds(&self, secs: u32) -> Option<Self> {
        self.timestamp.checked_add(secs).map(Self::from_int_seconds)
    }
}

impl Display for BlockTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.timestamp.fmt(f)
    }
}
