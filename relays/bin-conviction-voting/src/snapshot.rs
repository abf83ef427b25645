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

//! Chain client that serves account state from the JSON snapshot.

use async_trait::async_trait;
use bp_conviction_voting::{BalanceLock, ClassLock, DelegationEdge, PriorLock, VoteLock};
use relay_conviction_voting::{
	Chain, ChainClient, Error, GovernanceCall, Result, Subscription, TrackId, TransactionStatus,
};
use serde::Deserialize;
use std::{path::Path, sync::Arc};

/// Chain, described by the snapshot.
#[derive(Debug)]
pub struct SnapshotChain;

impl Chain for SnapshotChain {
	const NAME: &'static str = "Snapshot";

	type AccountId = String;
	type Balance = u128;
	type BlockNumber = u32;
	type Hash = String;
}

/// Conviction voting state of the single account.
///
/// Queries about any other account are rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Snapshot {
	/// Address of the account.
	pub account: String,
	/// Best block at the moment of the snapshot.
	pub best_block: u32,
	/// Votes of the account.
	#[serde(default)]
	pub votes: Vec<VoteLock<u128, u32>>,
	/// Per-track locks of the account.
	#[serde(default)]
	pub class_locks: Vec<ClassLock<u128>>,
	/// Prior locks of the account, by track.
	#[serde(default)]
	pub prior_locks: Vec<(TrackId, PriorLock<u32, u128>)>,
	/// Balance locks of the account.
	#[serde(default)]
	pub balance_locks: Vec<BalanceLock<u128>>,
	/// Delegations, made or received by the account.
	#[serde(default)]
	pub delegations: Vec<DelegationEdge<String, u128>>,
}

/// Read-only client over the snapshot.
#[derive(Clone, Debug)]
pub struct SnapshotClient {
	snapshot: Arc<Snapshot>,
}

impl SnapshotClient {
	/// Load snapshot from the JSON file.
	pub fn from_file(path: &Path) -> Result<Self> {
		let snapshot = serde_json::from_slice(&std::fs::read(path)?)?;
		Ok(SnapshotClient::new(snapshot))
	}

	/// Create client over the snapshot.
	pub fn new(snapshot: Snapshot) -> Self {
		SnapshotClient { snapshot: Arc::new(snapshot) }
	}

	fn state_of(&self, who: &String) -> Result<&Snapshot> {
		if *who != self.snapshot.account {
			return Err(Error::Client(format!(
				"Snapshot of {} has no state of {}",
				self.snapshot.account, who
			)))
		}

		Ok(&self.snapshot)
	}
}

#[async_trait]
impl ChainClient<SnapshotChain> for SnapshotClient {
	async fn best_block_number(&self) -> Result<u32> {
		Ok(self.snapshot.best_block)
	}

	async fn voting_locks(&self, who: &String) -> Result<Vec<VoteLock<u128, u32>>> {
		Ok(self.state_of(who)?.votes.clone())
	}

	async fn class_locks(&self, who: &String) -> Result<Vec<ClassLock<u128>>> {
		Ok(self.state_of(who)?.class_locks.clone())
	}

	async fn prior_locks(&self, who: &String) -> Result<Vec<(TrackId, PriorLock<u32, u128>)>> {
		Ok(self.state_of(who)?.prior_locks.clone())
	}

	async fn balance_locks(&self, who: &String) -> Result<Vec<BalanceLock<u128>>> {
		Ok(self.state_of(who)?.balance_locks.clone())
	}

	async fn delegations(&self, who: &String) -> Result<Vec<DelegationEdge<String, u128>>> {
		Ok(self.state_of(who)?.delegations.clone())
	}

	async fn submit_and_watch(
		&self,
		_signer: &String,
		call: GovernanceCall<String>,
	) -> Result<Subscription<TransactionStatus<String>>> {
		Err(Error::SubmissionRejected(format!("Snapshot is read-only, can not submit {:?}", call)))
	}
}
