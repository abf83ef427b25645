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

//! Command line interface.

use crate::snapshot::{SnapshotChain, SnapshotClient};

use bp_conviction_voting::{display_voting_power, level_from_selector, ratio, ConvictionStep};
use clap::{Parser, ValueEnum};
use relay_conviction_voting::{
	read_delegates, read_ledger, ChainClient, DelegationDirection, NetworkParams, LOG_TARGET,
};
use sp_arithmetic::PerThing;
use std::path::PathBuf;

/// Parse command line arguments into the command.
pub fn parse_args() -> Command {
	Command::parse()
}

/// Inspect conviction voting locks and delegations of an account.
#[derive(Debug, Parser)]
#[command(name = "conviction-voting", version)]
pub enum Command {
	/// Print lock ledger of the account.
	Ledger(LedgerParams),
	/// Print delegations of the account, aggregated by counterparty.
	Delegations(DelegationsParams),
	/// Print conviction level for the selector position.
	Conviction(ConvictionParams),
}

impl Command {
	/// Run the command.
	pub async fn run(self) -> anyhow::Result<()> {
		match self {
			Command::Ledger(params) => params.run().await,
			Command::Delegations(params) => params.run().await,
			Command::Conviction(params) => params.run(),
		}
	}
}

/// Network selection.
#[derive(Debug, Parser)]
pub struct NetworkArgs {
	/// Name of the well-known network.
	#[arg(long, default_value = "polkadot")]
	network: String,
	/// Path to the JSON file with network parameters. Overrides `--network`.
	#[arg(long)]
	network_config: Option<PathBuf>,
}

impl NetworkArgs {
	fn params(&self) -> anyhow::Result<NetworkParams> {
		let params = match self.network_config {
			Some(ref path) => NetworkParams::from_file(path)?,
			None => NetworkParams::by_name(&self.network)?,
		};
		log::debug!(target: LOG_TARGET, "Using network parameters: {:?}", params);
		Ok(params)
	}
}

/// Account state source.
#[derive(Debug, Parser)]
pub struct AccountArgs {
	/// Path to the JSON snapshot of the account state.
	#[arg(long)]
	snapshot: PathBuf,
	/// Account address. It must be the account of the snapshot.
	#[arg(long)]
	address: String,
}

impl AccountArgs {
	fn client(&self) -> anyhow::Result<SnapshotClient> {
		Ok(SnapshotClient::from_file(&self.snapshot)?)
	}
}

/// `ledger` command parameters.
#[derive(Debug, Parser)]
pub struct LedgerParams {
	#[command(flatten)]
	account: AccountArgs,
	#[command(flatten)]
	network: NetworkArgs,
	/// Current block number. Best block of the snapshot is used if not specified.
	#[arg(long)]
	now: Option<u32>,
}

impl LedgerParams {
	async fn run(self) -> anyhow::Result<()> {
		let network = self.network.params()?;
		let client = self.account.client()?;
		let now = match self.now {
			Some(now) => now,
			None => client.best_block_number().await?,
		};
		let ledger =
			read_ledger::<SnapshotChain, _>(&client, &self.account.address, network.generation)
				.await?;

		println!("Account {} on {} at block #{}", self.account.address, network.name, now);
		println!("Total locked: {}", network.format_balance(ledger.total_locked()));

		println!("Votes:");
		for vote in ledger.active_vote_locks() {
			let state = if vote.unlocks_at <= now { "expired" } else { "pending" };
			println!(
				"  #{} track {}: {} {} with {} conviction, unlocks at #{} ({})",
				vote.ref_index,
				vote.track_id,
				if vote.is_aye { "aye" } else { "nay" },
				network.format_balance(vote.balance),
				vote.conviction,
				vote.unlocks_at,
				state,
			);
		}

		println!("Unlockable tracks:");
		for lock in ledger.unlock_candidates() {
			let prior = ledger.prior_locked(lock.track_id, now);
			println!(
				"  track {}: {} (prior lock {})",
				lock.track_id,
				network.format_balance(lock.amount),
				network.format_balance(prior),
			);
		}

		println!(
			"Expired votes: {}, pending votes: {}",
			ledger.expired_vote_locks(now).len(),
			ledger.pending_vote_locks(now).len(),
		);
		match ledger.next_unlock(now) {
			Some(block) => println!("Next unlock at #{}", block),
			None => println!("Nothing to wait for"),
		}

		Ok(())
	}
}

/// Delegation direction argument.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DirectionArg {
	/// Delegations, received by the account.
	Received,
	/// Delegations, made by the account.
	Delegated,
}

impl From<DirectionArg> for DelegationDirection {
	fn from(direction: DirectionArg) -> Self {
		match direction {
			DirectionArg::Received => DelegationDirection::Received,
			DirectionArg::Delegated => DelegationDirection::Delegated,
		}
	}
}

/// `delegations` command parameters.
#[derive(Debug, Parser)]
pub struct DelegationsParams {
	#[command(flatten)]
	account: AccountArgs,
	#[command(flatten)]
	network: NetworkArgs,
	/// Which delegations to print.
	#[arg(long, value_enum, default_value = "received")]
	direction: DirectionArg,
}

impl DelegationsParams {
	async fn run(self) -> anyhow::Result<()> {
		let network = self.network.params()?;
		let client = self.account.client()?;
		let summaries = read_delegates::<SnapshotChain, _>(
			&client,
			&self.account.address,
			self.direction.into(),
		)
		.await?;

		let total_capital =
			summaries.values().fold(0u128, |total, summary| total.saturating_add(summary.capital));
		for (counterparty, summary) in &summaries {
			println!(
				"{}: {} ({} of total) with {} conviction, voting power {}, tracks {:?}",
				counterparty,
				network.format_balance(summary.capital),
				format_percent(ratio(summary.capital, total_capital)),
				summary.conviction_label(),
				network.format_balance(summary.voting_power),
				summary.tracks(),
			);
		}
		if summaries.is_empty() {
			println!("No delegations");
		}

		Ok(())
	}
}

/// `conviction` command parameters.
#[derive(Debug, Parser)]
pub struct ConvictionParams {
	#[command(flatten)]
	network: NetworkArgs,
	/// Position of the conviction selector, from 1 to 7.
	#[arg(long)]
	step: u8,
	/// Balance to vote with, in plancks.
	#[arg(long, default_value_t = 0)]
	balance: u128,
}

impl ConvictionParams {
	fn run(self) -> anyhow::Result<()> {
		let network = self.network.params()?;
		let step = ConvictionStep::new(self.step).ok_or_else(|| {
			anyhow::format_err!(
				"Conviction step must be in range {}..={}, got {}",
				ConvictionStep::MIN.get(),
				ConvictionStep::MAX.get(),
				self.step,
			)
		})?;
		let level = level_from_selector(step);

		println!(
			"Conviction {}: locked for {} periods ({} blocks), voting power {}",
			level.conviction,
			level.lock_period_multiplier,
			level.conviction.lock_duration(network.vote_locking_period),
			network.format_balance(display_voting_power(self.balance, level.conviction)),
		);

		Ok(())
	}
}

fn format_percent<P: PerThing>(value: P) -> String {
	let parts: u128 = value.deconstruct().into();
	let accuracy: u128 = P::ACCURACY.into();
	let hundredths = parts.saturating_mul(10_000) / accuracy;
	format!("{}.{:02}%", hundredths / 100, hundredths % 100)
}
