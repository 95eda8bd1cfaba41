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

//! ECBP-1100 / MESS: the artificial-finality gate built on the
//! antigravity curve.

use ethereum_types::U256;
use log::warn;

use crate::curves::{antigravity_numerator, DENOMINATOR};
use crate::error::{Error, Gate, ReorgFinalityError};
use crate::pcs::premier_canonical_score;
use crate::store::{Header, HeaderStore, PremierCanonicalRegistry};

/// `mess(commonAncestor, current, proposed)`.
///
/// Returns `Ok(())` if the reorganization from `current` to `proposed`
/// is permitted, or `Err(Error::ReorgFinality(_))` if ECBP-1100 declines
/// it. Any missing header or total difficulty along either segment is a
/// [`Error::Structural`] failure, not a rejection.
pub fn mess<S, R>(
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
	let current_pcs = premier_canonical_score(store, registry, common_ancestor, current, current.timestamp)?;
	let proposed_pcs = premier_canonical_score(store, registry, common_ancestor, proposed, current.timestamp)?;

	if proposed_pcs > current_pcs {
		// The candidate segment was demonstrably better publicized; MESS
		// does not apply.
		return Ok(());
	}

	let ca_td = require_td(store, common_ancestor.hash, common_ancestor.number)?;

	let proposed_parent = store.header(&proposed.parent_hash).ok_or_else(|| {
		Error::from(crate::error::StructuralError(format!(
			"missing parent {:#x} of proposed tip #{} ({:#x})",
			proposed.parent_hash, proposed.number, proposed.hash,
		)))
	})?;
	let proposed_parent_td = require_td(store, proposed_parent.hash, proposed_parent.number)?;
	let proposed_td = proposed_parent_td + proposed.difficulty;

	let local_td = require_td(store, current.hash, current.number)?;

	let proposed_sub = checked_sub(proposed_td, ca_td, "proposed")?;
	let local_sub = checked_sub(local_td, ca_td, "local")?;

	let x = saturating_time_delta(current.timestamp, common_ancestor.timestamp);
	let clamped_x = if x > U256::from(crate::curves::XCAP) { U256::from(crate::curves::XCAP) } else { x };
	let n = antigravity_numerator(x);

	let want = n * local_sub;
	let got = proposed_sub * U256::from(DENOMINATOR);

	if got < want {
		let err = ReorgFinalityError {
			gate: Gate::Mess,
			common_ancestor: common_ancestor.to_ref(),
			current: current.to_ref(),
			proposed: proposed.to_ref(),
			age: common_ancestor.timestamp,
			raw_span: x.as_u64(),
			clamped_span: clamped_x.as_u64(),
			got,
			want,
		};
		warn!(target: "engine", "{}", err);
		return Err(Error::ReorgFinality(err));
	}

	Ok(())
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

fn saturating_time_delta(later: u64, earlier: u64) -> U256 {
	U256::from(later.saturating_sub(earlier))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::tests::FakeChain;
	use ethereum_types::H256;

	fn h(seed: u8) -> H256 {
		H256::from_low_u64_be(seed as u64)
	}

	fn header(seed: u8, number: u64, parent: u8, difficulty: u64, timestamp: u64) -> Header {
		Header { hash: h(seed), number, parent_hash: h(parent), difficulty: U256::from(difficulty), timestamp }
	}

	/// Builds a simple fork: `ca -> current` and `ca -> proposed`, with
	/// total difficulties accumulated from `ca_td`.
	fn fork(ca: Header, ca_td: u64, current: Header, proposed: Header) -> FakeChain {
		let mut chain = FakeChain::default();
		chain.push(ca, U256::from(ca_td));
		chain.push(current, U256::from(ca_td) + current.difficulty);
		chain.push(proposed, U256::from(ca_td) + proposed.difficulty);
		chain
	}

	#[test]
	fn equal_length_small_margin_is_permitted() {
		let ca = header(1, 100, 0, 1, 0);
		let current = header(2, 101, 1, 1000, 10);
		let proposed = header(3, 101, 1, 1001, 10);
		let chain = fork(ca, 1_000_000, current, proposed);

		assert!(mess(&chain, &chain, &ca, &current, &proposed).is_ok());
	}

	#[test]
	fn deep_old_reorg_is_rejected() {
		let ca = header(1, 100, 0, 1, 0);
		// local subchain of 1000; proposed subchain of 2000, but the gap is huge.
		let current = header(2, 101, 1, 1000, 100_000);
		let proposed = header(3, 101, 1, 2000, 100_000);
		let chain = fork(ca, 1, current, proposed);

		match mess(&chain, &chain, &ca, &current, &proposed) {
			Err(Error::ReorgFinality(e)) => {
				assert_eq!(e.gate, Gate::Mess);
				assert_eq!(e.got, U256::from(2000u64 * DENOMINATOR));
				assert_eq!(e.want, U256::from(3968u64) * U256::from(1000u64));
			}
			other => panic!("expected MESS rejection, got {:?}", other),
		}
	}

	#[test]
	fn pcs_short_circuit_permits_better_publicized_candidate() {
		let ca = header(1, 100, 0, 1, 0);
		let current = header(2, 101, 1, 1000, 100_000);
		// proposed is older within the reference window, so it is
		// demonstrably better publicized than `current`.
		let proposed = header(3, 101, 1, 2000, 50_000);
		let mut chain = fork(ca, 1, current, proposed);
		chain.mark_premier(101, h(3));

		assert!(mess(&chain, &chain, &ca, &current, &proposed).is_ok());
	}

	#[test]
	fn missing_parent_is_structural_not_a_rejection() {
		let ca = header(1, 100, 0, 1, 0);
		let current = header(2, 101, 1, 1000, 10);
		// proposed's parent is never pushed into the chain.
		let proposed = header(3, 101, 9, 1000, 10);
		let mut chain = FakeChain::default();
		chain.push(ca, U256::from(1u64));
		chain.push(current, U256::from(2u64));
		chain.push(proposed, U256::from(1002u64));

		assert!(matches!(mess(&chain, &chain, &ca, &current, &proposed), Err(Error::Structural(_))));
	}
}
