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

//! Errors raised by the artificial-finality gates.

use std::fmt;

use ethereum_types::{H256, U256};

/// `(number, hash)` pair used to identify a header in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRef {
	/// Block number.
	pub number: u64,
	/// Block hash.
	pub hash: H256,
}

/// Which gate produced a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
	/// ECBP-1100 / MESS.
	Mess,
	/// ADESS.
	Adess,
}

impl fmt::Display for Gate {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Gate::Mess => write!(f, "MESS"),
			Gate::Adess => write!(f, "ADESS"),
		}
	}
}

/// A reorganization was declined for artificial-finality reasons. This is
/// an expected, well-formed outcome - not a validation failure - and is
/// surfaced to the integrator verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorgFinalityError {
	/// Which gate declined the reorg.
	pub gate: Gate,
	/// The deepest header shared by both segments.
	pub common_ancestor: HeaderRef,
	/// The tip of the incumbent segment.
	pub current: HeaderRef,
	/// The tip of the candidate segment.
	pub proposed: HeaderRef,
	/// `commonAncestor.time`.
	pub age: u64,
	/// `current.time - commonAncestor.time`, saturated at zero.
	pub raw_span: u64,
	/// The span after the antigravity curve's `xcap` clamp. Equal to
	/// `raw_span` for ADESS, which has no such clamp.
	pub clamped_span: u64,
	/// The value actually achieved by the candidate segment.
	pub got: U256,
	/// The value the candidate segment needed to reach or exceed.
	pub want: U256,
}

impl fmt::Display for ReorgFinalityError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"errReorgFinality: {} declined reorg at common ancestor #{} ({:#x}, age {}s): \
			current #{} ({:#x}, span {}s) vs. proposed #{} ({:#x}, clamped span {}s); \
			ratio got/want = {}",
			self.gate,
			self.common_ancestor.number,
			self.common_ancestor.hash,
			self.age,
			self.current.number,
			self.current.hash,
			self.raw_span,
			self.proposed.number,
			self.proposed.hash,
			self.clamped_span,
			format_ratio(self.got, self.want),
		)
	}
}

/// Formats `got / want` to exactly six decimal places using integer
/// arithmetic throughout, so the text is reproducible across platforms
/// without going through a lossy `U256 -> f64` cast.
pub fn format_ratio(got: U256, want: U256) -> String {
	if want.is_zero() {
		return "inf".to_owned();
	}
	let scale = U256::from(1_000_000u64);
	let scaled = match got.checked_mul(scale) {
		Some(v) => v,
		None => return "overflow".to_owned(),
	};
	let milli = scaled / want;
	let whole = milli / scale;
	let frac = milli % scale;
	format!("{}.{:06}", whole, frac)
}

/// The segment walk hit a missing parent, missing total difficulty, or a
/// broken ancestor linkage. This is a data-corruption class failure: it
/// is not expected to happen for well-formed chains and is not retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralError(pub String);

impl fmt::Display for StructuralError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "structural error walking chain segment: {}", self.0)
	}
}

/// Errors produced by the artificial-finality gates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// A gate declined to permit the reorganization.
	ReorgFinality(ReorgFinalityError),
	/// The segment walk encountered corrupt or incomplete chain data.
	Structural(StructuralError),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::ReorgFinality(e) => write!(f, "{}", e),
			Error::Structural(e) => write!(f, "{}", e),
		}
	}
}

impl std::error::Error for Error {}

impl From<ReorgFinalityError> for Error {
	fn from(e: ReorgFinalityError) -> Self {
		Error::ReorgFinality(e)
	}
}

impl From<StructuralError> for Error {
	fn from(e: StructuralError) -> Self {
		Error::Structural(e)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ratio_formats_to_six_decimals() {
		// 256 / 3968: a deep, old reorg against a fully-clamped curve.
		let got = U256::from(256u64);
		let want = U256::from(3968u64);
		assert_eq!(format_ratio(got, want), "0.064516");
	}

	#[test]
	fn ratio_handles_exact_one() {
		assert_eq!(format_ratio(U256::from(10u64), U256::from(10u64)), "1.000000");
	}

	#[test]
	fn ratio_handles_zero_want() {
		assert_eq!(format_ratio(U256::from(1u64), U256::zero()), "inf");
	}
}
