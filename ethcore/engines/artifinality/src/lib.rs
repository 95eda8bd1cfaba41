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

//! Artificial-finality reorganization gate.
//!
//! Given a proposed chain reorganization - a common ancestor, the
//! incumbent tip, and a candidate tip - decides whether the
//! reorganization should proceed despite the candidate having greater
//! cumulative work. Two independent policies are provided:
//!
//! - [`mess`]: ECBP-1100 / MESS, which penalizes deep reorganizations
//!   using a time-dependent antigravity curve ([`curves::antigravity_numerator`]).
//! - [`adess`]: ADESS, which penalizes segments that were historically
//!   less publicized, using the premier-canonical registry and a
//!   per-block total-difficulty discount.
//!
//! Both gates are read-only with respect to the chain: they consult a
//! [`store::HeaderStore`] and a [`store::PremierCanonicalRegistry`]
//! supplied by the integrator and never mutate chain state themselves.
//! Whether either gate is consulted at all for a given reorg is up to
//! the integrator, typically gated by [`activation::ActivationControl`].
//!
//! Block validation, transaction execution, peer-to-peer networking,
//! database encoding, and the state trie are all out of scope - this
//! crate only implements the decision procedure.

pub mod activation;
pub mod adess;
pub mod curves;
pub mod error;
pub mod mess;
pub mod pcs;
pub mod store;

pub use activation::ActivationControl;
pub use adess::adess;
pub use error::{Error, Gate, HeaderRef, ReorgFinalityError, StructuralError};
pub use mess::mess;
pub use pcs::premier_canonical_score;
pub use store::{ChainConfig, Header, HeaderStore, PremierCanonicalRegistry, Transition};
