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

#![cfg(test)]

use crate::{
	error::{Error, Result},
	Chain, ChainClient, ChainId, Conviction, GovernanceCall, GovernanceGeneration, NetworkParams,
	ReferendumIndex, SignerContext, Subscription, TrackId, TransactionStatus,
};

use async_trait::async_trait;
use bp_conviction_voting::{BalanceLock, ClassLock, DelegationEdge, PriorLock, VoteLock};
use futures::{
	channel::{mpsc, oneshot},
	StreamExt,
};
use parking_lot::Mutex;
use std::{collections::VecDeque, sync::Arc};

pub const ALICE: &str = "alice";
pub const BOB: &str = "bob";
pub const CHARLIE: &str = "charlie";

pub const TEST_CHAIN_ID: &str = "0x7e57";
pub const TEST_BLOCK_HASH: u64 = 42;

pub type TestStatus = TransactionStatus<u64>;

#[derive(Debug)]
pub struct TestChain;

impl Chain for TestChain {
	const NAME: &'static str = "Test";

	type AccountId = String;
	type Balance = u128;
	type BlockNumber = u32;
	type Hash = u64;
}

/// How the test client reacts on the next submitted transaction.
pub enum TestSubmission {
	/// Signer rejects the transaction.
	Reject(String),
	/// Transaction goes through given statuses.
	Statuses(Vec<TestStatus>),
	/// Transaction statuses are provided by the test.
	Channel(mpsc::UnboundedReceiver<TestStatus>),
}

#[derive(Default)]
struct TestClientData {
	best_block: u32,
	votes: Vec<VoteLock<u128, u32>>,
	class_locks: Vec<ClassLock<u128>>,
	prior_locks: Vec<(TrackId, PriorLock<u32, u128>)>,
	balance_locks: Vec<BalanceLock<u128>>,
	delegations: Vec<DelegationEdge<String, u128>>,
	query_error: Option<String>,
	class_locks_gate: Option<oneshot::Receiver<()>>,
	submissions: VecDeque<TestSubmission>,
	submitted: Vec<(String, GovernanceCall<String>)>,
}

#[derive(Clone, Default)]
pub struct TestClient {
	data: Arc<Mutex<TestClientData>>,
}

impl TestClient {
	pub fn set_votes(&self, votes: Vec<VoteLock<u128, u32>>) {
		self.data.lock().votes = votes;
	}

	pub fn set_class_locks(&self, class_locks: Vec<ClassLock<u128>>) {
		self.data.lock().class_locks = class_locks;
	}

	pub fn set_prior_locks(&self, prior_locks: Vec<(TrackId, PriorLock<u32, u128>)>) {
		self.data.lock().prior_locks = prior_locks;
	}

	pub fn set_balance_locks(&self, balance_locks: Vec<BalanceLock<u128>>) {
		self.data.lock().balance_locks = balance_locks;
	}

	pub fn set_delegations(&self, delegations: Vec<DelegationEdge<String, u128>>) {
		self.data.lock().delegations = delegations;
	}

	pub fn fail_queries(&self, error: &str) {
		self.data.lock().query_error = Some(error.into());
	}

	/// Next `class_locks` query reads the state and then waits until the returned sender is
	/// used or dropped.
	pub fn gate_class_locks(&self) -> oneshot::Sender<()> {
		let (sender, receiver) = oneshot::channel();
		self.data.lock().class_locks_gate = Some(receiver);
		sender
	}

	pub fn push_submission(&self, submission: TestSubmission) {
		self.data.lock().submissions.push_back(submission);
	}

	/// Push submission with statuses, controlled by the test.
	pub fn push_controlled_submission(&self) -> mpsc::UnboundedSender<TestStatus> {
		let (sender, receiver) = mpsc::unbounded();
		self.push_submission(TestSubmission::Channel(receiver));
		sender
	}

	pub fn submitted(&self) -> Vec<(String, GovernanceCall<String>)> {
		self.data.lock().submitted.clone()
	}

	fn query<T>(&self, f: impl FnOnce(&TestClientData) -> T) -> Result<T> {
		let data = self.data.lock();
		match data.query_error {
			Some(ref error) => Err(Error::Client(error.clone())),
			None => Ok(f(&data)),
		}
	}
}

#[async_trait]
impl ChainClient<TestChain> for TestClient {
	async fn best_block_number(&self) -> Result<u32> {
		self.query(|data| data.best_block)
	}

	async fn voting_locks(&self, _who: &String) -> Result<Vec<VoteLock<u128, u32>>> {
		self.query(|data| data.votes.clone())
	}

	async fn class_locks(&self, _who: &String) -> Result<Vec<ClassLock<u128>>> {
		let class_locks = self.query(|data| data.class_locks.clone());
		let gate = self.data.lock().class_locks_gate.take();
		if let Some(gate) = gate {
			let _ = gate.await;
		}
		class_locks
	}

	async fn prior_locks(&self, _who: &String) -> Result<Vec<(TrackId, PriorLock<u32, u128>)>> {
		self.query(|data| data.prior_locks.clone())
	}

	async fn balance_locks(&self, _who: &String) -> Result<Vec<BalanceLock<u128>>> {
		self.query(|data| data.balance_locks.clone())
	}

	async fn delegations(&self, _who: &String) -> Result<Vec<DelegationEdge<String, u128>>> {
		self.query(|data| data.delegations.clone())
	}

	async fn submit_and_watch(
		&self,
		signer: &String,
		call: GovernanceCall<String>,
	) -> Result<Subscription<TestStatus>> {
		let mut data = self.data.lock();
		data.submitted.push((signer.clone(), call.clone()));

		let submission = data.submissions.pop_front().unwrap_or_else(|| {
			TestSubmission::Statuses(vec![
				TransactionStatus::Ready,
				TransactionStatus::Broadcast(vec!["peer".into()]),
				TransactionStatus::InBlock(TEST_BLOCK_HASH),
				TransactionStatus::Finalized(TEST_BLOCK_HASH),
			])
		});

		// the chain state is changed as if the transaction is going to be included
		if !matches!(submission, TestSubmission::Reject(_)) {
			match call {
				GovernanceCall::RemoveVote { index, .. } =>
					data.votes.retain(|vote| vote.ref_index != index),
				GovernanceCall::Unlock { class, .. } =>
					data.class_locks.retain(|lock| lock.track_id != class),
			}
		}

		match submission {
			TestSubmission::Reject(error) => Err(Error::SubmissionRejected(error)),
			TestSubmission::Statuses(statuses) => Ok(futures::stream::iter(statuses).boxed()),
			TestSubmission::Channel(receiver) => Ok(receiver.boxed()),
		}
	}
}

pub fn test_network() -> NetworkParams {
	NetworkParams {
		name: "test".into(),
		chain_id: TEST_CHAIN_ID.into(),
		generation: GovernanceGeneration::ConvictionVoting,
		vote_locking_period: 10,
		token_decimals: 12,
	}
}

pub fn signer_on(chain_id: &str) -> SignerContext<String> {
	SignerContext { signer: ALICE.into(), chain_id: ChainId::from(chain_id) }
}

pub fn test_vote(
	ref_index: ReferendumIndex,
	track_id: TrackId,
	conviction: Conviction,
) -> VoteLock<u128, u32> {
	VoteLock { ref_index, track_id, balance: 100, conviction, is_aye: true, unlocks_at: 100 }
}

pub fn test_delegation(
	track: TrackId,
	from: &str,
	to: &str,
	balance: u128,
	lock_period: u32,
) -> DelegationEdge<String, u128> {
	DelegationEdge {
		track,
		from: from.into(),
		to: to.into(),
		balance,
		lock_period,
		created_at: 0,
	}
}
