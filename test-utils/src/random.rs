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

use rand::SeedableRng;
use rand_chacha::ChaChaRng;

pub use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct Seed(pub u64);

impl Seed {
    pub fn from_entropy() -> Self {
        Seed(rand::thread_rng().gen::<u64>())
    }

    pub fn from_u64(v: u64) -> Self {
        Seed(v)
    }
}

/// Makes PRNG that should be used in unit tests to get deterministic values from a seed.
///
/// The seed is printed so a failing case can be rerun with `Seed::from_u64`.
#[must_use]
pub fn make_seedable_rng(seed: Seed) -> impl Rng {
    logging::init_test_logging();
    println!("Using seed '{}' for the PRNG", seed.0);
    ChaChaRng::seed_from_u64(seed.0)
}
