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

//! Network parameters.

use crate::{
	error::{Error, Result},
	ChainId, GovernanceGeneration,
};

use serde::{Deserialize, Serialize};
use sp_arithmetic::traits::UniqueSaturatedInto;
use std::path::Path;

/// Parameters of the network we are working with.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NetworkParams {
	/// Network name.
	pub name: String,
	/// Identifier of the network. Signer must be connected to the same network.
	pub chain_id: ChainId,
	/// Governance generation, used by the network.
	#[serde(default)]
	pub generation: GovernanceGeneration,
	/// Duration of the single vote locking period, in blocks.
	pub vote_locking_period: u32,
	/// Number of decimals of the native token.
	pub token_decimals: u8,
}

impl NetworkParams {
	/// Polkadot relay chain.
	pub fn polkadot() -> Self {
		NetworkParams {
			name: "polkadot".into(),
			chain_id: "0x91b171bb158e2d3848fa23a9f1c25182fb8e20313b2c1eb49219da7a70ce90c3".into(),
			generation: GovernanceGeneration::ConvictionVoting,
			vote_locking_period: 28 * DAYS,
			token_decimals: 10,
		}
	}

	/// Kusama relay chain.
	pub fn kusama() -> Self {
		NetworkParams {
			name: "kusama".into(),
			chain_id: "0xb0a8d493285c2df73290dfb7e61f870f17b41801197a149ca93654499ea3dafe".into(),
			generation: GovernanceGeneration::ConvictionVoting,
			vote_locking_period: 7 * DAYS,
			token_decimals: 12,
		}
	}

	/// Westend test network.
	pub fn westend() -> Self {
		NetworkParams {
			name: "westend".into(),
			chain_id: "0xe143f23803ac50e8f6f8e62695d1ce9e4e1d68aa36c1cd2cfd15340213f3423e".into(),
			generation: GovernanceGeneration::ConvictionVoting,
			vote_locking_period: 7 * DAYS,
			token_decimals: 12,
		}
	}

	/// Returns parameters of the well-known network.
	pub fn by_name(name: &str) -> Result<Self> {
		match name {
			"polkadot" => Ok(Self::polkadot()),
			"kusama" => Ok(Self::kusama()),
			"westend" => Ok(Self::westend()),
			_ => Err(Error::Config(format!("Unknown network: {}", name))),
		}
	}

	/// Read parameters from the JSON file.
	pub fn from_file(path: &Path) -> Result<Self> {
		let params: NetworkParams = serde_json::from_slice(&std::fs::read(path)?)?;
		params.validate()?;
		Ok(params)
	}

	/// Ensure that parameters are sane.
	pub fn validate(&self) -> Result<()> {
		if self.vote_locking_period == 0 {
			return Err(Error::Config(format!(
				"Vote locking period of {} must be non-zero",
				self.name
			)))
		}
		if self.token_decimals > 38 {
			return Err(Error::Config(format!(
				"Too many token decimals for {}: {}",
				self.name, self.token_decimals
			)))
		}

		Ok(())
	}

	/// Format balance in plancks as a decimal number of tokens. No floating point is involved.
	pub fn format_balance<B: UniqueSaturatedInto<u128>>(&self, balance: B) -> String {
		let balance: u128 = balance.unique_saturated_into();
		let unit = 10u128.pow(self.token_decimals as u32);
		let (integral, fractional) = (balance / unit, balance % unit);
		if fractional == 0 {
			return integral.to_string()
		}

		let fractional = format!("{:0width$}", fractional, width = self.token_decimals as usize);
		format!("{}.{}", integral, fractional.trim_end_matches('0'))
	}
}

/// Number of 6-second blocks in a day.
const DAYS: u32 = 24 * 60 * 10;
