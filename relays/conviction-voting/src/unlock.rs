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

//! Vote removal and unlock state machine.
//!
//! Removing a vote and releasing the lock are two separate transactions. Every vote removal
//! (keyed by referendum index) and every unlock (keyed by track) has its own state, so
//! several items may be in progress at the same time:
//!
//! ```text
//! Idle -> Submitting -> Success
//!              |
//!              +------> Failed -> Submitting (retry)
//! ```
//!
//! `Success` is terminal until the ledger is refreshed. Request for an item that is already
//! `Submitting` is a no-op.

use crate::{
	error::{Error, Result},
	ledger::{read_ledger, LedgerOf},
	Chain, ChainClient, GovernanceCall, NetworkParams, ReferendumIndex, SignerContext,
	Subscription, TrackId, TransactionStatus, LOG_TARGET,
};

use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Key of the item, tracked by the state machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ItemKey {
	/// Removal of the vote on the referendum.
	RemoveVote(ReferendumIndex),
	/// Release of the track lock.
	Unlock(TrackId),
}

/// State of the single item.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ItemState {
	/// Nothing is happening.
	Idle,
	/// Transaction has been submitted and we are waiting for its inclusion.
	Submitting,
	/// Transaction has been included.
	Success,
	/// Transaction has failed with given message.
	Failed(String),
}

/// Outcome of the successful request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RequestOutcome {
	/// Transaction has been included.
	Included,
	/// Transaction for the same item is already being submitted. Nothing has been done.
	AlreadyPending,
	/// Transaction for the same item has been included and the ledger has not been refreshed
	/// since. Nothing has been done.
	AlreadyCompleted,
}

#[derive(Debug)]
struct Entry {
	state: ItemState,
	/// Ledger epoch when the item has entered its current state.
	epoch: u64,
}

/// States of all items. Items that are missing from the table are `Idle`.
#[derive(Debug, Default)]
struct ItemTable {
	entries: BTreeMap<ItemKey, Entry>,
	/// Incremented on every stored ledger refresh.
	ledger_epoch: u64,
	/// Sequence number of the last started ledger refresh.
	started_refresh: u64,
	/// Sequence number of the refresh that has produced the stored ledger.
	stored_refresh: u64,
}

impl ItemTable {
	fn state(&self, key: &ItemKey) -> ItemState {
		self.entries.get(key).map(|entry| entry.state.clone()).unwrap_or(ItemState::Idle)
	}

	/// Try to move the item to the `Submitting` state.
	fn begin(&mut self, key: ItemKey) -> std::result::Result<(), RequestOutcome> {
		match self.entries.get(&key) {
			Some(Entry { state: ItemState::Submitting, .. }) =>
				return Err(RequestOutcome::AlreadyPending),
			Some(Entry { state: ItemState::Success, epoch }) if *epoch == self.ledger_epoch =>
				return Err(RequestOutcome::AlreadyCompleted),
			_ => (),
		}

		self.set(key, ItemState::Submitting);
		Ok(())
	}

	fn set(&mut self, key: ItemKey, state: ItemState) {
		self.entries.insert(key, Entry { state, epoch: self.ledger_epoch });
	}

	/// Start new ledger refresh, returning its sequence number.
	fn start_refresh(&mut self) -> u64 {
		self.started_refresh += 1;
		self.started_refresh
	}

	/// Returns true if the ledger, read by the refresh `seq`, must replace the stored one.
	///
	/// Refreshes may complete in any order. Ledger of the refresh that has started before
	/// the stored one is outdated.
	fn complete_refresh(&mut self, seq: u64) -> bool {
		if seq <= self.stored_refresh {
			return false
		}

		self.stored_refresh = seq;
		self.ledger_epoch += 1;
		true
	}
}

/// Vote removal and unlock state machine of the single account.
pub struct UnlockStateMachine<C: Chain, CC> {
	client: CC,
	network: NetworkParams,
	owner: C::AccountId,
	items: Mutex<ItemTable>,
	ledger: Mutex<Option<LedgerOf<C>>>,
}

impl<C: Chain, CC: ChainClient<C>> UnlockStateMachine<C, CC> {
	/// Create state machine for the `owner` account.
	pub fn new(client: CC, network: NetworkParams, owner: C::AccountId) -> Self {
		UnlockStateMachine {
			client,
			network,
			owner,
			items: Mutex::new(ItemTable::default()),
			ledger: Mutex::new(None),
		}
	}

	/// Current state of the item.
	pub fn state(&self, key: &ItemKey) -> ItemState {
		self.items.lock().state(key)
	}

	/// States of all items that have left the `Idle` state at least once.
	pub fn states(&self) -> Vec<(ItemKey, ItemState)> {
		self.items
			.lock()
			.entries
			.iter()
			.map(|(key, entry)| (*key, entry.state.clone()))
			.collect()
	}

	/// Last refreshed ledger of the owner account.
	pub fn ledger(&self) -> Option<LedgerOf<C>> {
		self.ledger.lock().clone()
	}

	/// Re-read the ledger of the owner account from the chain.
	///
	/// The previous ledger is only replaced when the complete new ledger has been read and
	/// no refresh that has started later has been stored already. Returns the stored ledger.
	pub async fn refresh(&self) -> Result<LedgerOf<C>> {
		let seq = self.items.lock().start_refresh();
		let ledger =
			read_ledger::<C, CC>(&self.client, &self.owner, self.network.generation).await?;

		let mut items = self.items.lock();
		let mut stored = self.ledger.lock();
		if !items.complete_refresh(seq) {
			log::debug!(
				target: LOG_TARGET,
				"Ignoring outdated {} ledger of {:?}: refresh #{} is older than stored #{}",
				C::NAME,
				self.owner,
				seq,
				items.stored_refresh,
			);
			return Ok(stored.clone().unwrap_or(ledger))
		}
		*stored = Some(ledger.clone());
		drop(stored);
		drop(items);

		log::debug!(
			target: LOG_TARGET,
			"Refreshed {} ledger of {:?}: {} active votes, {} tracks may be unlocked",
			C::NAME,
			self.owner,
			ledger.active_vote_locks().len(),
			ledger.unlock_candidates().len(),
		);

		Ok(ledger)
	}

	/// Remove owner's vote on the referendum.
	pub async fn request_remove_vote(
		&self,
		signer: &SignerContext<C::AccountId>,
		ref_index: ReferendumIndex,
		track_id: TrackId,
	) -> Result<RequestOutcome> {
		self.ensure_network(signer)?;
		self.process(
			signer,
			ItemKey::RemoveVote(ref_index),
			GovernanceCall::RemoveVote { class: track_id, index: ref_index },
		)
		.await
	}

	/// Release owner's lock on the track.
	///
	/// The track must have no active votes in the last refreshed ledger. Otherwise the
	/// `Error::StaleLedger` is returned and nothing is submitted.
	pub async fn request_unlock(
		&self,
		signer: &SignerContext<C::AccountId>,
		track_id: TrackId,
	) -> Result<RequestOutcome> {
		self.ensure_network(signer)?;

		let has_active_vote = self
			.ledger
			.lock()
			.as_ref()
			.map(|ledger| ledger.has_active_vote_on(track_id))
			.unwrap_or(false);
		if has_active_vote {
			log::error!(
				target: LOG_TARGET,
				"Unlock of {} track {} has been requested while it still has active votes",
				C::NAME,
				track_id,
			);
			return Err(Error::StaleLedger(track_id))
		}

		self.process(
			signer,
			ItemKey::Unlock(track_id),
			GovernanceCall::Unlock { class: track_id, target: self.owner.clone() },
		)
		.await
	}

	fn ensure_network(&self, signer: &SignerContext<C::AccountId>) -> Result<()> {
		if signer.chain_id != self.network.chain_id {
			log::warn!(
				target: LOG_TARGET,
				"Signer {:?} is connected to {} instead of {} ({})",
				signer.signer,
				signer.chain_id,
				self.network.name,
				self.network.chain_id,
			);
			return Err(Error::WrongNetwork {
				expected: self.network.chain_id.clone(),
				actual: signer.chain_id.clone(),
			})
		}

		Ok(())
	}

	async fn process(
		&self,
		signer: &SignerContext<C::AccountId>,
		key: ItemKey,
		call: GovernanceCall<C::AccountId>,
	) -> Result<RequestOutcome> {
		if let Err(outcome) = self.items.lock().begin(key) {
			log::debug!(target: LOG_TARGET, "Ignoring request for {:?}: {:?}", key, outcome);
			return Ok(outcome)
		}

		log::info!(target: LOG_TARGET, "Submitting {:?} to {}", call, C::NAME);
		let result = match self.client.submit_and_watch(&signer.signer, call).await {
			Ok(statuses) => wait_for_inclusion::<C>(statuses).await,
			Err(error) => Err(error),
		};

		match result {
			Ok(block) => {
				log::info!(
					target: LOG_TARGET,
					"{:?} has been included in {} block {:?}",
					key,
					C::NAME,
					block,
				);
				self.items.lock().set(key, ItemState::Success);
				if let Err(error) = self.refresh().await {
					log::warn!(
						target: LOG_TARGET,
						"Failed to refresh {} ledger after {:?}: {}",
						C::NAME,
						key,
						error,
					);
				}
				Ok(RequestOutcome::Included)
			},
			Err(error) => {
				let error = match error {
					error @ Error::SubmissionRejected(_) => error,
					error => Error::SubmissionRejected(error.to_string()),
				};
				log::warn!(target: LOG_TARGET, "{:?} has failed: {}", key, error);
				self.items.lock().set(key, ItemState::Failed(error.to_string()));
				Err(error)
			},
		}
	}
}

/// Wait until the transaction is included into a block or fails.
async fn wait_for_inclusion<C: Chain>(
	mut statuses: Subscription<TransactionStatus<C::Hash>>,
) -> Result<C::Hash> {
	while let Some(status) = statuses.next().await {
		log::trace!(target: LOG_TARGET, "{} transaction status: {:?}", C::NAME, status);
		match (status.outcome(), status) {
			(Some(Ok(())), TransactionStatus::InBlock(block)) |
			(Some(Ok(())), TransactionStatus::Finalized(block)) => return Ok(block),
			(Some(Err(message)), _) => return Err(Error::SubmissionRejected(message)),
			_ => (),
		}
	}

	Err(Error::SubmissionRejected(format!(
		"{} transaction status subscription has finished before inclusion",
		C::NAME
	)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{mock::*, Conviction};
	use assert_matches::assert_matches;
	use bp_conviction_voting::ClassLock;

	type TestMachine = UnlockStateMachine<TestChain, TestClient>;

	fn machine(client: &TestClient) -> TestMachine {
		UnlockStateMachine::new(client.clone(), test_network(), ALICE.into())
	}

	#[async_std::test]
	async fn vote_is_removed_and_ledger_refreshed() {
		let client = TestClient::default();
		client.set_votes(vec![test_vote(7, 5, Conviction::Locked1x)]);
		client.set_class_locks(vec![ClassLock { track_id: 5, amount: 100 }]);
		let machine = machine(&client);

		let ledger = machine.refresh().await.unwrap();
		assert!(ledger.unlock_candidates().is_empty());

		let outcome = machine.request_remove_vote(&signer_on(TEST_CHAIN_ID), 7, 5).await;
		assert_matches!(outcome, Ok(RequestOutcome::Included));
		assert_eq!(machine.state(&ItemKey::RemoveVote(7)), ItemState::Success);
		assert_eq!(
			client.submitted(),
			vec![(ALICE.to_string(), GovernanceCall::RemoveVote { class: 5, index: 7 })],
		);

		let ledger = machine.ledger().unwrap();
		assert!(ledger.active_vote_locks().is_empty());
		assert_eq!(ledger.unlock_candidates(), &[ClassLock { track_id: 5, amount: 100 }]);

		let outcome = machine.request_unlock(&signer_on(TEST_CHAIN_ID), 5).await;
		assert_matches!(outcome, Ok(RequestOutcome::Included));
		assert_eq!(machine.state(&ItemKey::Unlock(5)), ItemState::Success);
		assert!(machine.ledger().unwrap().unlock_candidates().is_empty());
	}

	#[async_std::test]
	async fn wrong_network_is_rejected_before_submission() {
		let client = TestClient::default();
		let machine = machine(&client);

		let outcome = machine.request_remove_vote(&signer_on("0xdead"), 7, 5).await;
		assert_matches!(
			outcome,
			Err(Error::WrongNetwork { expected, actual })
				if expected.0 == TEST_CHAIN_ID && actual.0 == "0xdead"
		);
		let outcome = machine.request_unlock(&signer_on("0xdead"), 5).await;
		assert_matches!(outcome, Err(Error::WrongNetwork { .. }));

		assert!(client.submitted().is_empty());
		assert_eq!(machine.state(&ItemKey::RemoveVote(7)), ItemState::Idle);
		assert!(machine.states().is_empty());
	}

	#[async_std::test]
	async fn repeated_request_while_submitting_is_noop() {
		let client = TestClient::default();
		let statuses = client.push_controlled_submission();
		let machine = machine(&client);
		let signer = signer_on(TEST_CHAIN_ID);

		let first = machine.request_remove_vote(&signer, 7, 0);
		futures::pin_mut!(first);
		assert!(futures::poll!(&mut first).is_pending());
		assert_eq!(machine.state(&ItemKey::RemoveVote(7)), ItemState::Submitting);

		let second = machine.request_remove_vote(&signer, 7, 0).await;
		assert_matches!(second, Ok(RequestOutcome::AlreadyPending));
		assert_eq!(machine.state(&ItemKey::RemoveVote(7)), ItemState::Submitting);
		assert_eq!(client.submitted().len(), 1);

		statuses.unbounded_send(TransactionStatus::InBlock(TEST_BLOCK_HASH)).unwrap();
		assert_matches!(first.await, Ok(RequestOutcome::Included));
		assert_eq!(client.submitted().len(), 1);
	}

	#[async_std::test]
	async fn rejected_submission_fails_and_may_be_retried() {
		let client = TestClient::default();
		client.push_submission(TestSubmission::Reject("Cancelled by user".into()));
		let machine = machine(&client);
		let signer = signer_on(TEST_CHAIN_ID);

		let outcome = machine.request_unlock(&signer, 3).await;
		assert_matches!(
			outcome,
			Err(Error::SubmissionRejected(message)) if message == "Cancelled by user"
		);
		assert_eq!(
			machine.state(&ItemKey::Unlock(3)),
			ItemState::Failed("Cancelled by user".into()),
		);

		let outcome = machine.request_unlock(&signer, 3).await;
		assert_matches!(outcome, Ok(RequestOutcome::Included));
		assert_eq!(machine.state(&ItemKey::Unlock(3)), ItemState::Success);
		assert_eq!(client.submitted().len(), 2);
	}

	#[async_std::test]
	async fn invalid_transaction_fails() {
		let client = TestClient::default();
		client.push_submission(TestSubmission::Statuses(vec![
			TransactionStatus::Ready,
			TransactionStatus::Invalid,
		]));
		let machine = machine(&client);

		let outcome = machine.request_remove_vote(&signer_on(TEST_CHAIN_ID), 1, 0).await;
		assert_matches!(
			outcome,
			Err(Error::SubmissionRejected(message)) if message == "Transaction is invalid"
		);
		assert_eq!(
			machine.state(&ItemKey::RemoveVote(1)),
			ItemState::Failed("Transaction is invalid".into()),
		);
	}

	#[async_std::test]
	async fn finished_subscription_fails() {
		let client = TestClient::default();
		client.push_submission(TestSubmission::Statuses(vec![TransactionStatus::Ready]));
		let machine = machine(&client);

		let outcome = machine.request_remove_vote(&signer_on(TEST_CHAIN_ID), 1, 0).await;
		assert_matches!(outcome, Err(Error::SubmissionRejected(_)));
		assert_matches!(machine.state(&ItemKey::RemoveVote(1)), ItemState::Failed(_));
	}

	#[async_std::test]
	async fn unlock_of_voted_track_is_stale_ledger() {
		let client = TestClient::default();
		client.set_votes(vec![test_vote(7, 5, Conviction::Locked1x)]);
		client.set_class_locks(vec![ClassLock { track_id: 5, amount: 100 }]);
		let machine = machine(&client);
		machine.refresh().await.unwrap();

		let outcome = machine.request_unlock(&signer_on(TEST_CHAIN_ID), 5).await;
		assert_matches!(outcome, Err(Error::StaleLedger(5)));
		assert!(client.submitted().is_empty());
		assert_eq!(machine.state(&ItemKey::Unlock(5)), ItemState::Idle);
	}

	#[async_std::test]
	async fn different_items_are_processed_independently() {
		let client = TestClient::default();
		let first_statuses = client.push_controlled_submission();
		let second_statuses = client.push_controlled_submission();
		let machine = machine(&client);
		let signer = signer_on(TEST_CHAIN_ID);

		let (first, second, _) = futures::join!(
			machine.request_unlock(&signer, 1),
			machine.request_unlock(&signer, 2),
			async {
				assert_eq!(machine.state(&ItemKey::Unlock(1)), ItemState::Submitting);
				assert_eq!(machine.state(&ItemKey::Unlock(2)), ItemState::Submitting);
				first_statuses.unbounded_send(TransactionStatus::Dropped).unwrap();
				second_statuses
					.unbounded_send(TransactionStatus::Finalized(TEST_BLOCK_HASH))
					.unwrap();
			},
		);

		assert_matches!(first, Err(Error::SubmissionRejected(_)));
		assert_matches!(second, Ok(RequestOutcome::Included));
		assert_matches!(machine.state(&ItemKey::Unlock(1)), ItemState::Failed(_));
		assert_eq!(machine.state(&ItemKey::Unlock(2)), ItemState::Success);
	}

	#[async_std::test]
	async fn outdated_refresh_does_not_replace_ledger() {
		let client = TestClient::default();
		client.set_votes(vec![test_vote(7, 5, Conviction::Locked1x)]);
		client.set_class_locks(vec![
			ClassLock { track_id: 5, amount: 100 },
			ClassLock { track_id: 3, amount: 100 },
		]);
		let machine = machine(&client);
		let signer = signer_on(TEST_CHAIN_ID);
		machine.refresh().await.unwrap();

		// refresh after the vote removal reads track locks and stalls
		let gate = client.gate_class_locks();
		let removal = machine.request_remove_vote(&signer, 7, 5);
		futures::pin_mut!(removal);
		assert!(futures::poll!(&mut removal).is_pending());
		assert_eq!(machine.state(&ItemKey::RemoveVote(7)), ItemState::Success);

		// track 3 is unlocked and the ledger is refreshed meanwhile
		assert_matches!(machine.request_unlock(&signer, 3).await, Ok(RequestOutcome::Included));
		let expected = vec![ClassLock { track_id: 5, amount: 100 }];
		assert_eq!(machine.ledger().unwrap().unlock_candidates(), &expected[..]);

		gate.send(()).unwrap();
		assert_matches!(removal.await, Ok(RequestOutcome::Included));
		assert_eq!(machine.ledger().unwrap().unlock_candidates(), &expected[..]);
	}

	#[async_std::test]
	async fn success_is_terminal_until_ledger_is_refreshed() {
		let client = TestClient::default();
		let machine = machine(&client);
		let signer = signer_on(TEST_CHAIN_ID);

		// ledger refresh after the inclusion fails
		client.push_submission(TestSubmission::Statuses(vec![TransactionStatus::InBlock(1)]));
		client.fail_queries("node is syncing");
		assert_matches!(machine.request_unlock(&signer, 4).await, Ok(RequestOutcome::Included));
		assert_matches!(
			machine.request_unlock(&signer, 4).await,
			Ok(RequestOutcome::AlreadyCompleted)
		);
		assert_eq!(client.submitted().len(), 1);
	}

	#[async_std::test]
	async fn item_may_be_requested_again_after_refresh() {
		let client = TestClient::default();
		let machine = machine(&client);
		let signer = signer_on(TEST_CHAIN_ID);

		assert_matches!(machine.request_unlock(&signer, 4).await, Ok(RequestOutcome::Included));
		assert_eq!(machine.state(&ItemKey::Unlock(4)), ItemState::Success);
		assert_matches!(machine.request_unlock(&signer, 4).await, Ok(RequestOutcome::Included));
		assert_eq!(client.submitted().len(), 2);
		assert_eq!(machine.states(), vec![(ItemKey::Unlock(4), ItemState::Success)]);
	}
}
