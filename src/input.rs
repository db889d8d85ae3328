//! Controller input for emulators and movies.

use crate::error::RetroError;
use crate::handle::{RetroEmulatorHandle, RetroMovieHandle};
use crate::util::{set_error, set_ok};
use libc::size_t;

/// Press or release one key of one port.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_emulator_set_key(
    handle: *mut RetroEmulatorHandle,
    port: u32,
    key: u32,
    active: bool,
    error: *mut RetroError,
) {
    let handle = match unsafe { RetroEmulatorHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroEmulatorHandle::KIND)) },
    };

    handle.as_mut().set_key(port, key, active);
    unsafe { set_ok(error) };
}

/// Set every key of one player from a button mask.
///
/// Key `i` is pressed when `mask[i] != 0`. A NULL mask is ignored.
///
/// # Parameters
///
/// - `handle`: Valid emulator handle
/// - `mask`: `num_buttons` bytes, one per key in key order
/// - `num_buttons`: Number of entries in `mask`
/// - `player`: Port to apply the mask to
/// - `error`: Out-parameter for error information
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `mask` must point to at least `num_buttons` bytes, or be NULL
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_emulator_set_button_mask(
    handle: *mut RetroEmulatorHandle,
    mask: *const u8,
    num_buttons: size_t,
    player: u32,
    error: *mut RetroError,
) {
    let handle = match unsafe { RetroEmulatorHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroEmulatorHandle::KIND)) },
    };

    if !mask.is_null() {
        let mask = unsafe { std::slice::from_raw_parts(mask, num_buttons) };
        handle.as_mut().set_button_mask(mask, player);
    }
    unsafe { set_ok(error) };
}

/// Record one key of player 0 for the next movie frame.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_movie_set_key(
    handle: *mut RetroMovieHandle,
    key: u32,
    active: bool,
    error: *mut RetroError,
) {
    let handle = match unsafe { RetroMovieHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroMovieHandle::KIND)) },
    };

    handle.as_mut().set_key(key, active);
    unsafe { set_ok(error) };
}
