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

//! Conviction voting client error type.

use crate::{ChainId, TrackId};

/// Result type used by the conviction voting client.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur only when interacting with the chain or loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Signer is connected to another network. The user has to switch networks.
	#[error("Wrong network: expected {expected}, signer is connected to {actual}")]
	WrongNetwork {
		/// Network we are going to submit transaction to.
		expected: ChainId,
		/// Network the signer is connected to.
		actual: ChainId,
	},
	/// Transaction has been rejected by the signer, the node or the runtime. The message is
	/// passed through as is.
	#[error("{0}")]
	SubmissionRejected(String),
	/// Unlock has been requested for a track that still has an active vote.
	#[error("Track {0} still has an active vote lock")]
	StaleLedger(TrackId),
	/// Chain state query has failed.
	#[error("Failed to read chain state: {0}")]
	Client(String),
	/// Invalid network configuration.
	#[error("Invalid configuration: {0}")]
	Config(String),
	/// Failed to (de)serialize configuration or chain state snapshot.
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}
