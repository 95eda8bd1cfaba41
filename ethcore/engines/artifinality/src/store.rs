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

//! External capabilities consumed by the gates: header lookup, the
//! premier-canonical registry, and the chain activation configuration.
//!
//! All three are abstract over the concrete store/database in use -
//! the gate only ever reads through these traits.

use ethereum_types::{H256, U256};

use crate::error::{Error, StructuralError};

/// Block number. Matches the workspace's `BlockNumber` used in
/// `ethcore/src/header.rs`.
pub type BlockNumber = u64;

/// A minimal, immutable view of a block header. The full `Header` type
/// lives in `common-types`; the gate only needs these five fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
	/// This header's hash.
	pub hash: H256,
	/// This header's block number.
	pub number: BlockNumber,
	/// The hash of this header's parent.
	pub parent_hash: H256,
	/// This header's unsigned difficulty.
	pub difficulty: U256,
	/// This header's UNIX-seconds timestamp.
	pub timestamp: u64,
}

/// Read-only access to headers and total difficulty. Implemented by the
/// chain's `BlockChain`/`HeaderChain` in the full node; a fake
/// implementation suffices for tests (see the `tests` module of `pcs`,
/// `mess` and `adess`).
pub trait HeaderStore {
	/// Fetch a header by hash, if known.
	fn header(&self, hash: &H256) -> Option<Header>;

	/// Fetch the total difficulty accumulated through the header
	/// identified by `(hash, number)`, if known.
	fn total_difficulty(&self, hash: &H256, number: BlockNumber) -> Option<U256>;
}

/// Read-only access to the premier-canonical registry: the hash first
/// observed locally at a given key.
///
/// The key function is fixed at block number here; every lookup goes
/// through `premier_canonical_hash(number)`, so swapping the key function
/// later only touches call sites, not this trait's shape.
pub trait PremierCanonicalRegistry {
	/// The hash first observed at `key`, or `None` if nothing has been
	/// recorded there yet.
	fn premier_canonical_hash(&self, key: BlockNumber) -> Option<H256>;
}

/// The one fork-activation query the gates need from chain configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
	/// The ECBP-1100 (MESS) activation point.
	Ecbp1100,
}

/// Whether a given transition has activated by block `number`.
pub trait ChainConfig {
	/// Returns whether `transition` has activated at or before `number`.
	fn is_enabled(&self, transition: Transition, number: BlockNumber) -> bool;
}

impl Header {
	pub(crate) fn to_ref(&self) -> crate::error::HeaderRef {
		crate::error::HeaderRef { number: self.number, hash: self.hash }
	}
}

/// Walks a chain segment backward from `head` to (but not including)
/// `common_ancestor`, yielding each visited header.
///
/// There is no recursion and no cycle detection: headers form a tree
/// rooted at genesis, so termination is guaranteed once the ancestor
/// check fires. A missing parent before the ancestor is reached is a
/// structural error, not a rejection.
pub(crate) struct SegmentWalk<'a, S: HeaderStore> {
	store: &'a S,
	common_ancestor: H256,
	next: Option<Header>,
}

impl<'a, S: HeaderStore> SegmentWalk<'a, S> {
	pub(crate) fn new(store: &'a S, head: Header, common_ancestor: &Header) -> Self {
		let next = if head.hash == common_ancestor.hash { None } else { Some(head) };
		SegmentWalk { store, common_ancestor: common_ancestor.hash, next }
	}
}

impl<'a, S: HeaderStore> Iterator for SegmentWalk<'a, S> {
	type Item = Result<Header, Error>;

	fn next(&mut self) -> Option<Self::Item> {
		let current = self.next.take()?;

		self.next = if current.parent_hash == self.common_ancestor {
			None
		} else {
			match self.store.header(&current.parent_hash) {
				Some(parent) => Some(parent),
				None => {
					let err = StructuralError(format!(
						"missing parent {:#x} of header #{} ({:#x}) before reaching common ancestor",
						current.parent_hash, current.number, current.hash,
					));
					// Stop the walk; surface the error on this step and end iteration.
					return Some(Err(Error::Structural(err)));
				}
			}
		};

		Some(Ok(current))
	}
}
