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

//! Aggregation of per-track delegation edges into per-counterparty summaries.

use crate::{voting_power, Conviction, TrackId};

use alloc::{collections::BTreeMap, string::String, vec::Vec};
use codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_arithmetic::traits::AtLeast32BitUnsigned;

/// Label that is displayed instead of the conviction when summary is built from delegations
/// with different balances or lock periods.
pub const MULTIPLE_CONVICTIONS_LABEL: &str = "Multiple";

/// Single (delegator, delegate, track) relationship, as reported by the chain or indexer.
#[derive(Encode, Decode, Clone, Debug, Eq, PartialEq, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationEdge<AccountId, Balance> {
	/// Track that has been delegated.
	pub track: TrackId,
	/// The delegator.
	pub from: AccountId,
	/// The delegate.
	pub to: AccountId,
	/// Delegated balance.
	pub balance: Balance,
	/// Lock period multiplier of the delegation conviction.
	pub lock_period: u32,
	/// Unix timestamp (in milliseconds) of the delegation.
	pub created_at: u64,
}

/// Which side of the delegation edges the viewpoint account is on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DelegationDirection {
	/// Viewpoint account is the delegate: counterparties are the delegators.
	Received,
	/// Viewpoint account is the delegator: counterparties are the delegates.
	Delegated,
}

impl DelegationDirection {
	fn counterparty<'a, AccountId, Balance>(
		&self,
		edge: &'a DelegationEdge<AccountId, Balance>,
	) -> &'a AccountId {
		match self {
			DelegationDirection::Received => &edge.from,
			DelegationDirection::Delegated => &edge.to,
		}
	}
}

/// All delegations between the viewpoint account and a single counterparty.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateSummary<AccountId, Balance> {
	/// Sum of delegated balances.
	pub capital: Balance,
	/// Sum of delegated balances, multiplied by their lock periods.
	pub voting_power: Balance,
	/// Lock period of the last aggregated delegation.
	pub locked_period: u32,
	/// Contributing delegation edges, in the input order.
	pub delegations: Vec<DelegationEdge<AccountId, Balance>>,
	/// True if all contributing delegations share the same balance and lock period.
	pub is_single_delegation: bool,
	/// Whether the summary row is expanded. Never touched by the aggregation.
	pub expand: bool,
}

impl<AccountId, Balance: AtLeast32BitUnsigned + Copy> DelegateSummary<AccountId, Balance> {
	fn new() -> Self {
		DelegateSummary {
			capital: Balance::zero(),
			voting_power: Balance::zero(),
			locked_period: 0,
			delegations: Vec::new(),
			is_single_delegation: false,
			expand: false,
		}
	}

	fn accumulate(&mut self, edge: DelegationEdge<AccountId, Balance>) {
		self.capital = self.capital.saturating_add(edge.balance);
		self.voting_power = self
			.voting_power
			.saturating_add(voting_power(edge.balance, edge.lock_period.max(1)));
		self.locked_period = edge.lock_period;
		self.delegations.push(edge);
	}

	fn seal(&mut self) {
		self.is_single_delegation = match self.delegations.split_first() {
			Some((first, rest)) => rest
				.iter()
				.all(|edge| edge.balance == first.balance && edge.lock_period == first.lock_period),
			None => false,
		};
	}

	/// Tracks, contributing to this summary.
	pub fn tracks(&self) -> Vec<TrackId> {
		self.delegations.iter().map(|edge| edge.track).collect()
	}

	/// Scalar conviction of the summary. It only exists for the single-delegation case.
	pub fn conviction(&self) -> Option<Conviction> {
		if !self.is_single_delegation {
			return None
		}

		Conviction::from_lock_periods(self.locked_period)
	}

	/// Conviction as it is displayed to the user.
	pub fn conviction_label(&self) -> String {
		match self.conviction() {
			Some(conviction) => alloc::format!("{}", conviction),
			None => MULTIPLE_CONVICTIONS_LABEL.into(),
		}
	}
}

/// Aggregate delegation edges of the `viewpoint` account into per-counterparty summaries.
///
/// The result is always rebuilt from scratch: neither the edges nor any previously returned
/// summary is mutated. Edges where the counterparty is the `viewpoint` itself are skipped.
pub fn aggregate_delegations<AccountId, Balance>(
	edges: &[DelegationEdge<AccountId, Balance>],
	viewpoint: &AccountId,
	direction: DelegationDirection,
) -> BTreeMap<AccountId, DelegateSummary<AccountId, Balance>>
where
	AccountId: Clone + Ord,
	Balance: AtLeast32BitUnsigned + Copy,
{
	let mut summaries = BTreeMap::new();
	for edge in edges {
		let counterparty = direction.counterparty(edge);
		if counterparty == viewpoint {
			continue
		}

		summaries
			.entry(counterparty.clone())
			.or_insert_with(DelegateSummary::new)
			.accumulate(edge.clone());
	}

	for summary in summaries.values_mut() {
		summary.seal();
	}

	summaries
}
