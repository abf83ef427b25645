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

//! Interface of the chain client, used by the engine.

use crate::{error::Result, ReferendumIndex, TrackId};

use async_trait::async_trait;
use bp_conviction_voting::{BalanceLock, ClassLock, DelegationEdge, PriorLock, VoteLock};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use sp_arithmetic::traits::AtLeast32BitUnsigned;
use std::fmt::{self, Debug};

/// Stream of items, produced by a chain subscription.
pub type Subscription<T> = BoxStream<'static, T>;

/// Chain that has the conviction voting (or legacy democracy) module.
pub trait Chain: Send + Sync + 'static {
	/// Chain name.
	const NAME: &'static str;

	/// Account identifier.
	type AccountId: Clone + Debug + Ord + Send + Sync;
	/// Balance type.
	type Balance: AtLeast32BitUnsigned + Copy + Debug + Send + Sync;
	/// Block number type.
	type BlockNumber: AtLeast32BitUnsigned + Copy + Debug + Send + Sync;
	/// Block and transaction hash type.
	type Hash: Clone + Debug + Send + Sync;
}

/// Identifier of a network (genesis hash, in practice).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub String);

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ChainId {
	fn from(id: &str) -> Self {
		ChainId(id.into())
	}
}

/// Signer and the network it is connected to, supplied by the caller on every request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignerContext<AccountId> {
	/// Account that signs transactions.
	pub signer: AccountId,
	/// Network the signer is currently connected to.
	pub chain_id: ChainId,
}

/// Governance call, submitted by the engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GovernanceCall<AccountId> {
	/// Remove vote on the referendum.
	RemoveVote {
		/// Track of the referendum.
		class: TrackId,
		/// The referendum.
		index: ReferendumIndex,
	},
	/// Release the expired lock on the track.
	Unlock {
		/// The track.
		class: TrackId,
		/// Account whose funds are unlocked.
		target: AccountId,
	},
}

/// Status of the submitted transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TransactionStatus<Hash> {
	/// Transaction is part of the future queue.
	Future,
	/// Transaction is part of the ready queue.
	Ready,
	/// Transaction has been broadcast to the given peers.
	Broadcast(Vec<String>),
	/// Transaction has been included in the block with given hash.
	InBlock(Hash),
	/// The block this transaction was included in has been retracted.
	Retracted(Hash),
	/// Maximum number of finality watchers has been reached.
	FinalityTimeout(Hash),
	/// Transaction has been finalized in the block with given hash.
	Finalized(Hash),
	/// Transaction has been replaced in the pool by another transaction.
	Usurped(Hash),
	/// Transaction has been dropped from the pool because of the limit.
	Dropped,
	/// Transaction is no longer valid in the current state.
	Invalid,
	/// Node or signer has reported an error.
	Error(String),
}

impl<Hash: Debug> TransactionStatus<Hash> {
	/// Final outcome of the transaction, or `None` if we need to wait for more updates.
	///
	/// Inclusion into a block is treated as success.
	pub fn outcome(&self) -> Option<std::result::Result<(), String>> {
		match self {
			TransactionStatus::Future |
			TransactionStatus::Ready |
			TransactionStatus::Broadcast(_) |
			TransactionStatus::Retracted(_) => None,
			TransactionStatus::InBlock(_) | TransactionStatus::Finalized(_) => Some(Ok(())),
			TransactionStatus::FinalityTimeout(block) =>
				Some(Err(format!("Finality timeout at block {:?}", block))),
			TransactionStatus::Usurped(by) =>
				Some(Err(format!("Transaction has been usurped by {:?}", by))),
			TransactionStatus::Dropped => Some(Err("Transaction has been dropped".into())),
			TransactionStatus::Invalid => Some(Err("Transaction is invalid".into())),
			TransactionStatus::Error(message) => Some(Err(message.clone())),
		}
	}
}

/// Chain client.
///
/// Every query either returns a fully resolved value or an error.
#[async_trait]
pub trait ChainClient<C: Chain>: Send + Sync {
	/// Returns the best block number.
	async fn best_block_number(&self) -> Result<C::BlockNumber>;

	/// Returns all active votes of the account.
	async fn voting_locks(&self, who: &C::AccountId)
		-> Result<Vec<VoteLock<C::Balance, C::BlockNumber>>>;

	/// Returns track locks of the account.
	async fn class_locks(&self, who: &C::AccountId) -> Result<Vec<ClassLock<C::Balance>>>;

	/// Returns prior locks of the account, by track.
	async fn prior_locks(
		&self,
		who: &C::AccountId,
	) -> Result<Vec<(TrackId, PriorLock<C::BlockNumber, C::Balance>)>>;

	/// Returns balance locks of the account.
	async fn balance_locks(&self, who: &C::AccountId) -> Result<Vec<BalanceLock<C::Balance>>>;

	/// Returns all delegations where the account is either delegator or delegate.
	async fn delegations(
		&self,
		who: &C::AccountId,
	) -> Result<Vec<DelegationEdge<C::AccountId, C::Balance>>>;

	/// Sign and submit the call, returning subscription to the transaction status updates.
	async fn submit_and_watch(
		&self,
		signer: &C::AccountId,
		call: GovernanceCall<C::AccountId>,
	) -> Result<Subscription<TransactionStatus<C::Hash>>>;
}
