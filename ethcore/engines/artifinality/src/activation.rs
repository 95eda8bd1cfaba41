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

//! Runtime enable/disable toggle for the artificial-finality gates, plus
//! an optional no-disable latch. Grounded on the atomic-flag idiom of
//! `ethcore/src/verification/queue/mod.rs` - plain `Ordering::{Acquire,
//! Release}` loads/stores, no CAS loop, since there is no read-modify-
//! write sequence here.

use std::sync::atomic::{AtomicU32, Ordering};

use log::{info, warn};
use parking_lot::RwLock;

use crate::store::{BlockNumber, ChainConfig, Transition};

/// The two-state {Disabled, Enabled} activation flag for a chain
/// instance, plus the optional latch that can suppress a disable.
pub struct ActivationControl {
	enabled: AtomicU32,
	no_disable_latch: RwLock<Option<i32>>,
}

impl Default for ActivationControl {
	fn default() -> Self {
		ActivationControl { enabled: AtomicU32::new(0), no_disable_latch: RwLock::new(None) }
	}
}

impl ActivationControl {
	/// A fresh control, starting disabled with no latch set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the enable/disable flag. If the no-disable latch is engaged
	/// (`set_no_disable_latch(1)`) and this call would disable a
	/// currently-enabled gate, the request is suppressed instead.
	///
	/// Logging - both the ordinary state-change line and the
	/// "preventing disable" line - is entirely suppressed until `config`
	/// reports that the ECBP-1100 transition has activated at `number`.
	pub fn enable<C: ChainConfig>(&self, flag: bool, config: &C, number: BlockNumber) {
		let may_log = config.is_enabled(Transition::Ecbp1100, number);

		if !flag && self.is_enabled() && self.latch_forces_on() {
			if may_log {
				warn!(target: "engine", "preventing disable of ECBP-1100 artificial finality: no-disable latch is engaged");
			}
			return;
		}

		self.enabled.store(flag as u32, Ordering::Release);

		if may_log {
			info!(target: "engine", "ECBP-1100 artificial finality set to {}", flag);
		}
	}

	/// Whether the gates are currently enabled.
	pub fn is_enabled(&self) -> bool {
		self.enabled.load(Ordering::Acquire) == 1
	}

	/// Set (or release) the no-disable latch. `n == 1` forces the gate
	/// on, preventing future disables; any other value releases it.
	pub fn set_no_disable_latch(&self, n: i32) {
		let mut latch = self.no_disable_latch.write();
		*latch = Some(n);
	}

	fn latch_forces_on(&self) -> bool {
		matches!(*self.no_disable_latch.read(), Some(1))
	}
}
