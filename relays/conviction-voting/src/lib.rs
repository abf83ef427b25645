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

//! Client side of the conviction voting: reads lock ledger of an account from the chain and
//! drives the "remove vote" -> "unlock" transactions.

#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod ledger;
mod unlock;

pub mod initialize;

#[cfg(test)]
mod mock;

pub use bp_conviction_voting::{
	aggregate_delegations, Conviction, DelegateSummary, DelegationDirection, DelegationEdge,
	GovernanceGeneration, LockLedger, ReferendumIndex, TrackId,
};
pub use client::{
	Chain, ChainClient, ChainId, GovernanceCall, SignerContext, Subscription, TransactionStatus,
};
pub use config::NetworkParams;
pub use error::{Error, Result};
pub use ledger::{read_delegates, read_ledger, LedgerOf};
pub use unlock::{ItemKey, ItemState, RequestOutcome, UnlockStateMachine};

/// Log target of the crate.
pub const LOG_TARGET: &str = "conviction-voting";
