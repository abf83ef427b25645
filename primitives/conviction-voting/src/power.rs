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

//! Voting power arithmetic. Integers only: balances are in the 10^10..10^18 range and any
//! floating point rounding would be visible.

use crate::Conviction;

use sp_arithmetic::{
	traits::{AtLeast32BitUnsigned, Zero},
	Perbill,
};

/// Voting power of `balance`, locked with given lock period multiplier.
///
/// Zero multiplier (the `Conviction::None` case) leaves the balance as is. The 0.1x weight of
/// such votes is a presentation concern, see [`display_voting_power`].
pub fn voting_power<B: AtLeast32BitUnsigned + Copy>(balance: B, multiplier: u32) -> B {
	if multiplier.is_zero() {
		return balance
	}

	balance.saturating_mul(B::from(multiplier))
}

/// Voting power as it is displayed to the user, i.e. with the 0.1x weight applied to the
/// unlocked votes.
pub fn display_voting_power<B: AtLeast32BitUnsigned + Copy>(
	balance: B,
	conviction: Conviction,
) -> B {
	conviction.votes(balance).votes
}

/// `part / whole` ratio, used to display percentages. Stored balances are never touched.
pub fn ratio<B: AtLeast32BitUnsigned + Copy>(part: B, whole: B) -> Perbill {
	if whole.is_zero() {
		return Perbill::zero()
	}

	let part: u128 = part.unique_saturated_into();
	let whole: u128 = whole.unique_saturated_into();
	Perbill::from_rational(part.min(whole), whole)
}
