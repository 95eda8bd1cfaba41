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

//! The Antigravity Curve: the MESS numerator `N(x)`.
//!
//! `N(x) / DENOMINATOR` is the unitless multiplier by which the
//! incumbent segment's total difficulty is amplified before comparing it
//! against the candidate. The curve grows from 1.0 at `x = 0` up to
//! `31.0` at `x = XCAP` and is flat beyond that.

use ethereum_types::U256;

/// Denominator paired with [`antigravity_numerator`]. Consensus-critical:
/// do not change independently of the curve.
pub const DENOMINATOR: u64 = 128;

/// Clamp point for the time delta, in seconds: `floor(8000 * pi)`.
pub const XCAP: u64 = 25_132;

/// Amplitude parameter of the curve.
pub const AMPLITUDE: u64 = 15;

/// `DENOMINATOR * 2 * AMPLITUDE`.
pub const HEIGHT: u64 = DENOMINATOR * 2 * AMPLITUDE;

/// The normative MESS numerator curve (ECBP-1100's cubic polynomial),
/// evaluated over exact big-integer arithmetic.
///
/// `x` is the time delta in seconds between `current.time` and
/// `commonAncestor.time`. The function is pure, total for all `x >= 0`,
/// monotonically non-decreasing, and saturates at `x = XCAP`.
///
/// The order of operations matters for bit-for-bit reproducibility:
/// `(A - B)` is formed before multiplying by `HEIGHT`, and that product
/// is divided by `XCAP^2` only at the end. Every intermediate step uses
/// `U256` rather than a native integer width, even though this
/// particular curve's `XCAP` clamp keeps every intermediate value well
/// under 2^48 in practice - a generic antigravity curve is not
/// guaranteed to stay inside 64 bits, and this implementation makes no
/// assumption that it does.
pub fn antigravity_numerator(x: U256) -> U256 {
	let xcap = U256::from(XCAP);
	let x = if x > xcap { xcap } else { x };

	let a = U256::from(3u64) * x * x;
	let b = (U256::from(2u64) * x * x * x) / xcap;

	// a >= b for all x in [0, xcap]: 2*x^3/xcap <= 2*x^2 <= a.
	let p = (a - b) * U256::from(HEIGHT) / (xcap * xcap);

	U256::from(DENOMINATOR) + p
}

/// Non-normative reference curve: `N(x) = DENOMINATOR * 1.0001^x`,
/// clamped the same way as [`antigravity_numerator`]. Documented in
/// spec for comparison only; **not** consulted by [`crate::mess`].
pub fn exponential_numerator(x: U256) -> f64 {
	let xcap = XCAP as f64;
	let x = (clamp_to_f64(x)).min(xcap);
	DENOMINATOR as f64 * 1.0001_f64.powf(x)
}

/// Non-normative reference curve: a rescaled sinusoid reaching the same
/// `HEIGHT` as [`antigravity_numerator`] at `x = XCAP`. Documented for
/// comparison only; **not** consulted by [`crate::mess`].
pub fn sinusoidal_numerator(x: U256) -> f64 {
	use std::f64::consts::PI;

	let xcap = XCAP as f64;
	let x = (clamp_to_f64(x)).min(xcap);
	let amplitude = AMPLITUDE as f64;
	DENOMINATOR as f64 + amplitude * DENOMINATOR as f64 * (1.0 - (x / xcap * PI / 2.0).cos())
}

fn clamp_to_f64(x: U256) -> f64 {
	if x > U256::from(XCAP) {
		XCAP as f64
	} else {
		x.as_u64() as f64
	}
}
