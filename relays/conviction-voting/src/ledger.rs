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

//! Reading lock ledger and delegations from the chain.

use crate::{
	error::Result, Chain, ChainClient, DelegateSummary, DelegationDirection, GovernanceGeneration,
	LOG_TARGET,
};

use bp_conviction_voting::{aggregate_delegations, LockLedger};
use std::collections::BTreeMap;

/// Lock ledger of the chain account.
pub type LedgerOf<C> = LockLedger<<C as Chain>::Balance, <C as Chain>::BlockNumber>;

/// Read lock ledger of the account.
///
/// All parts of the ledger are read before it is built, so the caller never sees a ledger
/// that is built from a partial state. If any query fails, the whole read fails.
pub async fn read_ledger<C: Chain, CC: ChainClient<C>>(
	client: &CC,
	who: &C::AccountId,
	generation: GovernanceGeneration,
) -> Result<LedgerOf<C>> {
	let votes = client.voting_locks(who).await?;
	let class_locks = client.class_locks(who).await?;
	let prior_locks = client.prior_locks(who).await?;
	let balance_locks = client.balance_locks(who).await?;

	log::trace!(
		target: LOG_TARGET,
		"Read {} ledger of {:?}: {} votes, {} track locks, {} balance locks",
		C::NAME,
		who,
		votes.len(),
		class_locks.len(),
		balance_locks.len(),
	);

	Ok(LockLedger::new(votes, class_locks, &balance_locks, generation)
		.with_prior_locks(prior_locks))
}

/// Read delegations of the account and aggregate them by counterparty.
pub async fn read_delegates<C: Chain, CC: ChainClient<C>>(
	client: &CC,
	who: &C::AccountId,
	direction: DelegationDirection,
) -> Result<BTreeMap<C::AccountId, DelegateSummary<C::AccountId, C::Balance>>> {
	let edges = client.delegations(who).await?;
	Ok(aggregate_delegations(&edges, who, direction))
}
