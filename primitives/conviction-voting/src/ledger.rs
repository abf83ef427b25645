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

//! Lock ledger of a single account: active votes, track locks and the balance that may be
//! unlocked.

use crate::{Conviction, GovernanceGeneration, LockIdentifier, ReferendumIndex, TrackId};

use alloc::{collections::BTreeSet, vec::Vec};
use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_arithmetic::traits::{AtLeast32BitUnsigned, Zero};

/// Active (not yet removed) vote of the account on a referendum.
#[derive(
	Encode,
	Decode,
	Clone,
	Debug,
	Eq,
	PartialEq,
	TypeInfo,
	MaxEncodedLen,
	Serialize,
	Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct VoteLock<Balance, BlockNumber> {
	/// Referendum the vote has been cast on.
	pub ref_index: ReferendumIndex,
	/// Track of the referendum.
	pub track_id: TrackId,
	/// Voted balance.
	pub balance: Balance,
	/// Conviction of the vote.
	pub conviction: Conviction,
	/// Aye or nay.
	pub is_aye: bool,
	/// Block (or timestamp) when the conviction lock of the vote expires.
	pub unlocks_at: BlockNumber,
}

/// Balance that is still locked on a track, independently of any particular vote.
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
pub struct ClassLock<Balance> {
	/// The track.
	pub track_id: TrackId,
	/// Locked amount.
	pub amount: Balance,
}

/// A "prior" lock, i.e. a lock for some now-forgotten reason.
#[derive(
	Encode,
	Decode,
	Default,
	Copy,
	Clone,
	Eq,
	PartialEq,
	Debug,
	TypeInfo,
	MaxEncodedLen,
	Serialize,
	Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct PriorLock<BlockNumber, Balance> {
	/// Block when the lock expires.
	pub unlock_at: BlockNumber,
	/// Locked amount.
	pub amount: Balance,
}

impl<BlockNumber: Ord + Copy + Zero, Balance: Ord + Copy + Zero> PriorLock<BlockNumber, Balance> {
	/// Accumulates an additional lock.
	pub fn accumulate(&mut self, until: BlockNumber, amount: Balance) {
		self.unlock_at = self.unlock_at.max(until);
		self.amount = self.amount.max(amount);
	}

	/// Amount that is still locked.
	pub fn locked(&self) -> Balance {
		self.amount
	}

	/// Forget the lock if it has expired at `now`.
	pub fn rejig(&mut self, now: BlockNumber) {
		if now >= self.unlock_at {
			self.unlock_at = Zero::zero();
			self.amount = Zero::zero();
		}
	}
}

/// Balance lock, as reported by the balances module.
#[derive(Encode, Decode, Clone, Copy, Debug, Eq, PartialEq, TypeInfo, Serialize, Deserialize)]
pub struct BalanceLock<Balance> {
	/// Identifier of the lock.
	#[serde(with = "lock_id")]
	pub id: LockIdentifier,
	/// Locked amount.
	pub amount: Balance,
}

/// Lock ledger of a single account, derived from the chain state.
///
/// The ledger is always built from a complete snapshot of votes, track locks and balance
/// locks. It is never updated in place: refresh means building a new ledger.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockLedger<Balance, BlockNumber> {
	active_vote_locks: Vec<VoteLock<Balance, BlockNumber>>,
	unlock_candidates: Vec<ClassLock<Balance>>,
	prior_locks: Vec<(TrackId, PriorLock<BlockNumber, Balance>)>,
	max_class_lock: Balance,
	total_locked: Balance,
}

impl<Balance, BlockNumber> LockLedger<Balance, BlockNumber>
where
	Balance: AtLeast32BitUnsigned + Copy,
	BlockNumber: Ord + Copy + Zero,
{
	/// Build the ledger from the raw chain state.
	///
	/// Active vote locks are ordered by ascending conviction. Track locks of tracks that still
	/// have an active vote are never offered for unlocking. Only balance locks of the given
	/// governance `generation` contribute to the total locked balance.
	pub fn new(
		raw_votes: Vec<VoteLock<Balance, BlockNumber>>,
		raw_class_locks: Vec<ClassLock<Balance>>,
		balance_locks: &[BalanceLock<Balance>],
		generation: GovernanceGeneration,
	) -> Self {
		let mut active_vote_locks = raw_votes;
		active_vote_locks.sort_by_key(|vote| vote.conviction);

		let voted_tracks =
			active_vote_locks.iter().map(|vote| vote.track_id).collect::<BTreeSet<_>>();
		let max_class_lock = raw_class_locks
			.iter()
			.map(|lock| lock.amount)
			.fold(Balance::zero(), |max, amount| max.max(amount));
		let unlock_candidates = raw_class_locks
			.into_iter()
			.filter(|lock| !voted_tracks.contains(&lock.track_id))
			.collect();

		let lock_id = generation.lock_id();
		let total_locked = balance_locks
			.iter()
			.filter(|lock| lock.id == lock_id)
			.fold(Balance::zero(), |total, lock| total.saturating_add(lock.amount));

		LockLedger {
			active_vote_locks,
			unlock_candidates,
			prior_locks: Vec::new(),
			max_class_lock,
			total_locked,
		}
	}

	/// Attach per-track prior locks to the ledger.
	pub fn with_prior_locks(
		mut self,
		prior_locks: Vec<(TrackId, PriorLock<BlockNumber, Balance>)>,
	) -> Self {
		self.prior_locks = prior_locks;
		self
	}

	/// Active vote locks, ordered by ascending conviction.
	pub fn active_vote_locks(&self) -> &[VoteLock<Balance, BlockNumber>] {
		&self.active_vote_locks
	}

	/// Track locks that may be released.
	pub fn unlock_candidates(&self) -> &[ClassLock<Balance>] {
		&self.unlock_candidates
	}

	/// Total balance locked by the governance module.
	pub fn total_locked(&self) -> Balance {
		self.total_locked
	}

	/// Returns true if there's an active vote on the given track.
	pub fn has_active_vote_on(&self, track_id: TrackId) -> bool {
		self.active_vote_locks.iter().any(|vote| vote.track_id == track_id)
	}

	/// Vote locks that have expired at `now` and may be removed right away.
	pub fn expired_vote_locks(&self, now: BlockNumber) -> Vec<&VoteLock<Balance, BlockNumber>> {
		self.active_vote_locks.iter().filter(|vote| vote.unlocks_at <= now).collect()
	}

	/// Vote locks that are still locked at `now`.
	pub fn pending_vote_locks(&self, now: BlockNumber) -> Vec<&VoteLock<Balance, BlockNumber>> {
		self.active_vote_locks.iter().filter(|vote| vote.unlocks_at > now).collect()
	}

	/// Amount locked by the prior lock of the given track at `now`.
	pub fn prior_locked(&self, track_id: TrackId, now: BlockNumber) -> Balance {
		self.prior_locks
			.iter()
			.filter(|(track, _)| *track == track_id)
			.map(|(_, prior)| {
				let mut prior = *prior;
				prior.rejig(now);
				prior.locked()
			})
			.fold(Balance::zero(), |max, locked| max.max(locked))
	}

	/// The earliest moment after `now` when some lock expires.
	pub fn next_unlock(&self, now: BlockNumber) -> Option<BlockNumber> {
		self.active_vote_locks
			.iter()
			.map(|vote| vote.unlocks_at)
			.chain(self.prior_locks.iter().map(|(_, prior)| prior.unlock_at))
			.filter(|unlock_at| *unlock_at > now)
			.min()
	}

	/// The biggest track lock, which is the amount actually locked on behalf of the module.
	///
	/// Tracks that still have active votes are included.
	pub fn max_class_lock(&self) -> Balance {
		self.max_class_lock
	}
}

mod lock_id {
	use crate::LockIdentifier;

	use alloc::string::String;
	use serde::{de::Error, Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(id: &LockIdentifier, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&String::from_utf8_lossy(id))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(
		deserializer: D,
	) -> Result<LockIdentifier, D::Error> {
		let id = String::deserialize(deserializer)?;
		id.as_bytes()
			.try_into()
			.map_err(|_| D::Error::custom("lock identifier must be exactly 8 bytes long"))
	}
}
