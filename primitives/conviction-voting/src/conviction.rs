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

//! The conviction datatype and the selector that produces it.

use codec::{Decode, Encode, MaxEncodedLen};
use core::fmt;
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_arithmetic::traits::{AtLeast32BitUnsigned, Bounded};

/// A value denoting the strength of conviction of a vote.
#[derive(
	Encode,
	Decode,
	Copy,
	Clone,
	Eq,
	PartialEq,
	Ord,
	PartialOrd,
	Debug,
	TypeInfo,
	MaxEncodedLen,
	Serialize,
	Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Conviction {
	/// 0.1x votes, unlocked.
	None,
	/// 1x votes, locked for an enactment period following a successful vote.
	Locked1x,
	/// 2x votes, locked for 2x enactment periods following a successful vote.
	Locked2x,
	/// 3x votes, locked for 4x...
	Locked3x,
	/// 4x votes, locked for 8x...
	Locked4x,
	/// 5x votes, locked for 16x...
	Locked5x,
	/// 6x votes, locked for 32x...
	Locked6x,
}

impl Default for Conviction {
	fn default() -> Self {
		Conviction::None
	}
}

impl From<Conviction> for u8 {
	fn from(c: Conviction) -> u8 {
		match c {
			Conviction::None => 0,
			Conviction::Locked1x => 1,
			Conviction::Locked2x => 2,
			Conviction::Locked3x => 3,
			Conviction::Locked4x => 4,
			Conviction::Locked5x => 5,
			Conviction::Locked6x => 6,
		}
	}
}

impl TryFrom<u8> for Conviction {
	type Error = &'static str;

	fn try_from(i: u8) -> Result<Conviction, Self::Error> {
		Ok(match i {
			0 => Conviction::None,
			1 => Conviction::Locked1x,
			2 => Conviction::Locked2x,
			3 => Conviction::Locked3x,
			4 => Conviction::Locked4x,
			5 => Conviction::Locked5x,
			6 => Conviction::Locked6x,
			_ => return Err("conviction must be in range 0..=6"),
		})
	}
}

impl Bounded for Conviction {
	fn min_value() -> Self {
		Conviction::None
	}

	fn max_value() -> Self {
		Conviction::Locked6x
	}
}

impl fmt::Display for Conviction {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Conviction::None => f.write_str("0.1x"),
			x => write!(f, "{}x", u8::from(*x)),
		}
	}
}

/// Amount of votes and capital placed in delegation for an account.
#[derive(Encode, Decode, Copy, Clone, Default, Eq, PartialEq, Debug, TypeInfo, MaxEncodedLen)]
pub struct Delegations<Balance> {
	/// The number of votes (this is post-conviction).
	pub votes: Balance,
	/// The amount of raw capital, used for the support.
	pub capital: Balance,
}

impl Conviction {
	/// The amount of time (in number of periods) that our conviction implies a successful voter's
	/// balance should be locked for.
	pub fn lock_periods(self) -> u32 {
		match self {
			Conviction::None => 0,
			Conviction::Locked1x => 1,
			Conviction::Locked2x => 2,
			Conviction::Locked3x => 4,
			Conviction::Locked4x => 8,
			Conviction::Locked5x => 16,
			Conviction::Locked6x => 32,
		}
	}

	/// Conviction that implies given number of lock periods, if any.
	pub fn from_lock_periods(periods: u32) -> Option<Conviction> {
		Some(match periods {
			0 => Conviction::None,
			1 => Conviction::Locked1x,
			2 => Conviction::Locked2x,
			4 => Conviction::Locked3x,
			8 => Conviction::Locked4x,
			16 => Conviction::Locked5x,
			32 => Conviction::Locked6x,
			_ => return None,
		})
	}

	/// Minimal time the balance stays locked after a successful vote, given the duration of a
	/// single vote locking period.
	pub fn lock_duration<N: AtLeast32BitUnsigned + Copy>(self, vote_locking_period: N) -> N {
		vote_locking_period.saturating_mul(N::from(self.lock_periods()))
	}

	/// The votes of a voter of the given `balance` with our conviction.
	pub fn votes<B: AtLeast32BitUnsigned + Copy>(self, capital: B) -> Delegations<B> {
		let votes = match self {
			Conviction::None => capital / B::from(10u8),
			x => capital.saturating_mul(B::from(u8::from(x))),
		};
		Delegations { votes, capital }
	}
}

/// Position of the conviction selector (a discretized slider), in range `1..=7`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct ConvictionStep(u8);

impl ConvictionStep {
	/// First selector step.
	pub const MIN: ConvictionStep = ConvictionStep(1);
	/// Last selector step.
	pub const MAX: ConvictionStep = ConvictionStep(7);

	/// Returns selector step if it is within the valid range.
	pub fn new(step: u8) -> Option<Self> {
		(Self::MIN.0..=Self::MAX.0).contains(&step).then_some(ConvictionStep(step))
	}

	/// Raw selector position.
	pub fn get(&self) -> u8 {
		self.0
	}

	/// Iterate over all valid selector steps, in ascending order.
	pub fn all() -> impl Iterator<Item = ConvictionStep> {
		(Self::MIN.0..=Self::MAX.0).map(ConvictionStep)
	}
}

impl From<Conviction> for ConvictionStep {
	fn from(conviction: Conviction) -> Self {
		ConvictionStep(u8::from(conviction) + 1)
	}
}

/// Conviction, selected by the user, together with its lock period multiplier.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ConvictionLevel {
	/// Selected conviction.
	pub conviction: Conviction,
	/// Lock period multiplier. It is `0` for `Conviction::None`: there's no time lock, the vote
	/// is weighted by 0.1 instead.
	pub lock_period_multiplier: u32,
}

/// Map conviction selector position to the conviction level.
pub fn level_from_selector(step: ConvictionStep) -> ConvictionLevel {
	let conviction = match step.get() {
		1 => Conviction::None,
		2 => Conviction::Locked1x,
		3 => Conviction::Locked2x,
		4 => Conviction::Locked3x,
		5 => Conviction::Locked4x,
		6 => Conviction::Locked5x,
		_ => Conviction::Locked6x,
	};
	ConvictionLevel { conviction, lock_period_multiplier: conviction.lock_periods() }
}
