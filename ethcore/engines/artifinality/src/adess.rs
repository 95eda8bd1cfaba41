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

//! ADESS: the anti-double-spend gate. Independent of MESS, but walks
//! the same kind of segment and talks to the same two external stores.

use ethereum_types::U256;
use log::warn;

use crate::error::{Error, Gate, ReorgFinalityError};
use crate::store::{Header, HeaderStore, PremierCanonicalRegistry, SegmentWalk};

/// Grace period, in blocks above the common ancestor, during which
/// premier-canonical counts are suppressed.
pub const OMEGA: u64 = 4;

/// Per-block total-difficulty penalty divisor.
pub const EPS_QUO: u64 = 1000;

/// `adess(commonAncestor, current, proposed)`.
///
/// Returns `Ok(())` if the reorganization is permitted under ADESS, or
/// `Err(Error::ReorgFinality(_))` if it is declined. Structural chain
/// data problems surface as [`Error::Structural`].
pub fn adess<S, R>(
	store: &S,
	registry: &R,
	common_ancestor: &Header,
	current: &Header,
	proposed: &Header,
) -> Result<(), Error>
where
	S: HeaderStore,
	R: PremierCanonicalRegistry,
{
	let grace_number = common_ancestor.number + OMEGA;

	if proposed.number < grace_number {
		// Inactive: the candidate hasn't cleared the grace period yet.
		return Ok(());
	}

	let count_current = count_premier_canonical(store, registry, common_ancestor, current, grace_number)?;
	let count_proposed = count_premier_canonical(store, registry, common_ancestor, proposed, grace_number)?;

	if count_current <= count_proposed {
		// The candidate was at least as publicized as the incumbent;
		// ADESS does not engage.
		return Ok(());
	}

	let ca_td = require_td(store, common_ancestor.hash, common_ancestor.number)?;
	let local_td = require_td(store, current.hash, current.number)?;
	let proposed_td = require_td(store, proposed.hash, proposed.number)?;

	let penalty = discount(store, common_ancestor, proposed)?;

	let local_sub = checked_sub(local_td, ca_td, "local")?;
	let proposed_sub_raw = checked_sub(proposed_td, ca_td, "proposed")?;
	let proposed_sub = proposed_sub_raw.saturating_sub(penalty);

	if local_sub > proposed_sub {
		let err = ReorgFinalityError {
			gate: Gate::Adess,
			common_ancestor: common_ancestor.to_ref(),
			current: current.to_ref(),
			proposed: proposed.to_ref(),
			age: common_ancestor.timestamp,
			raw_span: current.timestamp.saturating_sub(common_ancestor.timestamp),
			clamped_span: proposed.timestamp.saturating_sub(common_ancestor.timestamp),
			got: proposed_sub,
			want: local_sub,
		};
		warn!(target: "engine", "{}", err);
		return Err(Error::ReorgFinality(err));
	}

	Ok(())
}

/// Counts headers at or above `grace_number` that are premier-canonical,
/// walking `head` back to (excluding) `common_ancestor`.
fn count_premier_canonical<S, R>(
	store: &S,
	registry: &R,
	common_ancestor: &Header,
	head: &Header,
	grace_number: u64,
) -> Result<u64, Error>
where
	S: HeaderStore,
	R: PremierCanonicalRegistry,
{
	let mut count = 0u64;
	for step in SegmentWalk::new(store, *head, common_ancestor) {
		let header = step?;
		if header.number >= grace_number && registry.premier_canonical_hash(header.number) == Some(header.hash) {
			count += 1;
		}
	}
	Ok(count)
}

/// Sums `TD(h) / EPS_QUO` for every header on the `proposed` segment.
fn discount<S: HeaderStore>(store: &S, common_ancestor: &Header, proposed: &Header) -> Result<U256, Error> {
	let mut total = U256::zero();
	let eps_quo = U256::from(EPS_QUO);
	for step in SegmentWalk::new(store, *proposed, common_ancestor) {
		let header = step?;
		let td = require_td(store, header.hash, header.number)?;
		total += td / eps_quo;
	}
	Ok(total)
}

fn require_td<S: HeaderStore>(store: &S, hash: ethereum_types::H256, number: u64) -> Result<U256, Error> {
	store.total_difficulty(&hash, number).ok_or_else(|| {
		Error::from(crate::error::StructuralError(format!(
			"missing total difficulty for #{} ({:#x})",
			number, hash,
		)))
	})
}

fn checked_sub(a: U256, b: U256, label: &str) -> Result<U256, Error> {
	a.checked_sub(b).ok_or_else(|| {
		Error::from(crate::error::StructuralError(format!(
			"{} subchain total difficulty underflowed common ancestor's",
			label,
		)))
	})
}
