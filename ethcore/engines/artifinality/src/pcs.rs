// Copyright 2015, 2016 Parity Technologies (UK) Ltd.
// This file is part of Parity.

// Parity is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Parity is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Parity.  If not, see <http://www.gnu.org/licenses/>.

//! Premier-Canonical Score: sums how long ago each first-seen header
//! along a segment was first observed, within a shared reference window.

use ethereum_types::U256;

use crate::error::Error;
use crate::store::{Header, HeaderStore, PremierCanonicalRegistry, SegmentWalk};

/// `PCS(commonAncestor, head, latestTime)`.
///
/// Walks `head` back to (excluding) `commonAncestor`. For each header
/// `h` strictly within the `[_, latestTime]` window whose registry entry
/// at `h.number` matches `h.hash`, adds `latestTime - h.time` to the
/// running score. Headers with `h.time > latestTime` lie outside the
/// reference segment's window and are skipped entirely, including from
/// consideration as premier-canonical - this under-weights a proposed
/// segment that outpaces the reference tip in wall-clock time, which is
/// the behavior this implementation preserves rather than "fixes".
pub fn premier_canonical_score<S, R>(
	store: &S,
	registry: &R,
	common_ancestor: &Header,
	head: &Header,
	latest_time: u64,
) -> Result<U256, Error>
where
	S: HeaderStore,
	R: PremierCanonicalRegistry,
{
	let mut score = U256::zero();

	for step in SegmentWalk::new(store, *head, common_ancestor) {
		let header = step?;

		if header.timestamp > latest_time {
			continue;
		}

		if registry.premier_canonical_hash(header.number) == Some(header.hash) {
			score += U256::from(latest_time - header.timestamp);
		}
	}

	Ok(score)
}
