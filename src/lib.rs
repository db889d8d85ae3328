//! C FFI bindings for a retro console emulation core.
//!
//! This crate exposes three handle types to C callers: an emulator that runs
//! one ROM, game data scored by a scenario (rewards, done condition, action
//! space), and a BK2 movie that records input. A small reinforcement-learning
//! environment built on the same types is available to Rust callers in
//! [`env`].
//!
//! The native core is plugged in through [`CoreProvider`]: the embedding
//! binary installs one with [`install_provider`] before any handle is created.
//! Until then every constructor fails with `RETRO_ERROR_NO_PROVIDER`.
//!
//! # Thread Safety
//!
//! Handles are NOT `Send` or `Sync`. All operations on a handle must occur
//! on the thread that created it; a handle passed to another thread is
//! reported as invalid. The core-description registry is process-wide and
//! may be loaded from any thread.
//!
//! # Memory Management
//!
//! - Handles from `retro_emulator_new`, `retro_gamedata_new` and
//!   `retro_movie_new` must be freed with the matching `*_free` function
//! - Freeing a handle twice, or using it after free, fails with
//!   `RETRO_ERROR_INVALID_HANDLE` instead of touching freed memory
//! - Strings returned by functions must be freed with `retro_string_free`
//! - Action sets must be freed with `retro_action_sets_free`
//! - Error messages must be freed with `retro_error_free`
//!
//! # Feature Flags
//!
//! - `logging`: `retro_log_init` installs a stderr subscriber filtered by
//!   `RETRO_LOG`

#![allow(clippy::missing_safety_doc)]

pub mod backend;
pub mod coreinfo;
pub mod emulator;
pub mod env;
mod error;
pub mod framebuffer;
pub mod gamedata;
mod handle;
mod input;
mod lifecycle;
#[cfg(feature = "logging")]
mod logging;
pub mod movie;
mod recording;
mod scenario;
mod screen;
mod state;
#[cfg(test)]
mod testing;
mod util;

// Re-export all public FFI types and functions
pub use backend::{CoreProvider, install_provider};
pub use coreinfo::{retro_emulator_get_core, retro_load_core_info};
pub use error::{CoreError, RetroError, RetroErrorCode, RetroFailure, retro_error_free};
pub use handle::{RetroEmulatorHandle, RetroGameDataHandle, RetroMovieHandle};
pub use input::{retro_emulator_set_button_mask, retro_emulator_set_key, retro_movie_set_key};
pub use lifecycle::{
    retro_emulator_free, retro_emulator_load_rom, retro_emulator_new, retro_gamedata_free, retro_gamedata_new,
    retro_movie_close, retro_movie_free, retro_movie_new,
};
#[cfg(feature = "logging")]
pub use logging::retro_log_init;
pub use recording::{retro_movie_configure, retro_movie_step};
pub use scenario::{
    RetroActionSet, RetroActionSets, RetroLoadOutcome, retro_action_sets_free, retro_emulator_configure_data,
    retro_gamedata_current_reward, retro_gamedata_is_done, retro_gamedata_load, retro_gamedata_load_outcome,
    retro_gamedata_lookup_value, retro_gamedata_reset, retro_gamedata_total_reward, retro_gamedata_update_ram,
    retro_gamedata_valid_actions,
};
pub use screen::{retro_emulator_get_screen, retro_emulator_get_screen_height, retro_emulator_get_screen_width};
pub use state::{
    retro_emulator_get_state, retro_emulator_run, retro_emulator_set_state, retro_emulator_state_size,
    retro_movie_set_state,
};
pub use util::retro_string_free;

use std::os::raw::c_char;

/// Library version string.
///
/// # Returns
///
/// Static string containing the version (e.g., "0.1.0").
/// Do not free this string.
#[unsafe(no_mangle)]
pub extern "C" fn retro_version() -> *const c_char {
    // Include null terminator in the static string
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

/// Feature flags bitmask.
///
/// # Returns
///
/// Bitmask indicating which features are compiled in:
/// - Bit 0 (0x01): `logging` - `retro_log_init` is available
#[unsafe(no_mangle)]
pub extern "C" fn retro_features() -> u32 {
    let mut flags = 0u32;

    #[cfg(feature = "logging")]
    {
        flags |= 1 << 0;
    }

    flags
}
