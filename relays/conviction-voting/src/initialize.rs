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

//! Logger initialization.

use crate::LOG_TARGET;

use log::LevelFilter;

/// Initialize logger instance.
///
/// Everything is logged at `warn` level, except for the engine itself, which logs at `info`.
/// Both may be overridden with the `RUST_LOG` environment variable.
pub fn initialize_logger(with_timestamp: bool) {
	let mut builder = env_logger::Builder::new();
	builder
		.filter_level(LevelFilter::Warn)
		.filter_module(LOG_TARGET, LevelFilter::Info)
		.parse_env(env_logger::Env::default());

	if !with_timestamp {
		builder.format_timestamp(None);
	}

	if let Err(error) = builder.try_init() {
		log::warn!(target: LOG_TARGET, "Logger is already initialized: {}", error);
	}
}
