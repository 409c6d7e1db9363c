// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Logging initialization.
//!
//! The crate only emits through the `log` facade. These helpers install an
//! `env_logger` backend for binaries and tests that want console output.

use crate::env_config::EnvConfig;

/// Install a console logger at `level`.
///
/// Returns `false` if a logger was already installed.
pub fn init(level: log::LevelFilter) -> bool {
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}

/// Install a console logger honouring `RUST_LOG` when set, falling back to
/// the configured level otherwise.
///
/// An unrecognised `log_level` falls back to `info`.
pub fn init_from_config(config: &EnvConfig) -> bool {
    let default_level = config.level_filter().unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level.to_string()),
    )
    .format_timestamp_millis()
    .try_init()
    .is_ok()
}
