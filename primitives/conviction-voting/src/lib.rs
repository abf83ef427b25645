// Copyright (C) Parity Technologies (UK) Ltd.
// This file is part of Parity Bridges Common.

// Parity Bridges Common is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Parity Bridges Common is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Parity Bridges Common.  If not, see <http://www.gnu.org/licenses/>.

//! Primitives of the conviction voting lock and delegation aggregation engine.
//!
//! Everything in this crate is a pure function over immutable inputs: conviction and
//! lock period arithmetic, voting power, aggregation of raw delegation edges into
//! per-counterparty summaries and derivation of the lock ledger of a single account.

#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

mod conviction;
mod delegation;
mod ledger;
mod power;

pub use conviction::{level_from_selector, Conviction, ConvictionLevel, ConvictionStep, Delegations};
pub use delegation::{
	aggregate_delegations, DelegateSummary, DelegationDirection, DelegationEdge,
	MULTIPLE_CONVICTIONS_LABEL,
};
pub use ledger::{BalanceLock, ClassLock, LockLedger, PriorLock, VoteLock};
pub use power::{display_voting_power, ratio, voting_power};

/// Identifier of a governance track (a.k.a. voting class).
pub type TrackId = u16;

/// Index of a referendum (a.k.a. poll).
pub type ReferendumIndex = u32;

/// Identifier of a balance lock, as reported by the balances module.
pub type LockIdentifier = [u8; 8];

/// Lock identifier of the multi-track conviction voting module.
pub const CONVICTION_VOTING_ID: LockIdentifier = *b"pyconvot";

/// Lock identifier of the legacy single-track democracy module.
pub const DEMOCRACY_ID: LockIdentifier = *b"democrac";

/// Governance generation of a network.
///
/// Every generation locks voting funds under its own lock identifier. Amounts locked by
/// different generations live in different namespaces and are never summed together.
#[derive(
	Encode,
	Decode,
	Clone,
	Copy,
	Debug,
	Eq,
	PartialEq,
	TypeInfo,
	MaxEncodedLen,
	Serialize,
	Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum GovernanceGeneration {
	/// Legacy single-track democracy.
	Democracy,
	/// Multi-track conviction voting (OpenGov).
	ConvictionVoting,
}

impl GovernanceGeneration {
	/// Lock identifier used by the governance module of this generation.
	pub fn lock_id(&self) -> LockIdentifier {
		match self {
			GovernanceGeneration::Democracy => DEMOCRACY_ID,
			GovernanceGeneration::ConvictionVoting => CONVICTION_VOTING_ID,
		}
	}
}

impl Default for GovernanceGeneration {
	fn default() -> Self {
		GovernanceGeneration::ConvictionVoting
	}
}
