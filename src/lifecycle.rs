//! Lifecycle management functions (new, free, close).

use crate::emulator::RetroEmulator;
use crate::error::RetroError;
use crate::gamedata::RetroGameData;
use crate::handle::{RetroEmulatorHandle, RetroGameDataHandle, RetroMovieHandle};
use crate::movie::RetroMovie;
use crate::util::{cstr_to_path, set_error, set_error_null, set_ok};
use std::os::raw::c_char;

/// Create an empty emulator.
///
/// A ROM must be loaded with `retro_emulator_load_rom()` before running it.
///
/// # Returns
///
/// Handle on success, NULL if no core provider is installed.
///
/// # Ownership
///
/// Caller owns the returned handle. Must call `retro_emulator_free()` to free.
///
/// # Safety
///
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_emulator_new(error: *mut RetroError) -> *mut RetroEmulatorHandle {
    match RetroEmulator::new() {
        Ok(emulator) => {
            unsafe { set_ok(error) };
            RetroEmulatorHandle::into_raw(emulator)
        }
        Err(e) => unsafe { set_error_null(error, e.into()) },
    }
}

/// Free an emulator handle.
///
/// After this call, the handle is invalid and must not be used.
/// Freeing NULL or an already freed handle does nothing.
///
/// # Safety
///
/// - `handle` must not be in use by another call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_emulator_free(handle: *mut RetroEmulatorHandle) {
    if !unsafe { RetroEmulatorHandle::free(handle) } && !handle.is_null() {
        tracing::warn!("retro_emulator_free on a handle that is not live");
    }
}

/// Load a ROM into the emulator.
///
/// The core is chosen by the ROM's file extension from the descriptions
/// registered with `retro_load_core_info()`.
///
/// # Parameters
///
/// - `handle`: Valid emulator handle
/// - `rom_path`: Filesystem path to the ROM (UTF-8 encoded, null-terminated)
/// - `error`: Out-parameter for error information
///
/// # Returns
///
/// true on success; false on a bad path, unknown extension, or core rejection.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `rom_path` must be a valid null-terminated UTF-8 string or NULL
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_emulator_load_rom(
    handle: *mut RetroEmulatorHandle,
    rom_path: *const c_char,
    error: *mut RetroError,
) -> bool {
    let handle = match unsafe { RetroEmulatorHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroEmulatorHandle::KIND)) },
    };

    let path = match unsafe { cstr_to_path(rom_path, "rom_path") } {
        Ok(p) => p,
        Err(e) => return unsafe { set_error(error, e) },
    };

    match handle.as_mut().load_rom(&path) {
        Ok(()) => {
            unsafe { set_ok(error) };
            true
        }
        Err(e) => unsafe { set_error(error, e.into()) },
    }
}

/// Create a game-data object together with its scenario.
///
/// # Ownership
///
/// Caller owns the returned handle. Must call `retro_gamedata_free()` to free.
///
/// # Safety
///
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_gamedata_new(error: *mut RetroError) -> *mut RetroGameDataHandle {
    match RetroGameData::new() {
        Ok(data) => {
            unsafe { set_ok(error) };
            RetroGameDataHandle::into_raw(data)
        }
        Err(e) => unsafe { set_error_null(error, e.into()) },
    }
}

/// Free a game-data handle (scenario first, then data).
///
/// Freeing NULL or an already freed handle does nothing.
///
/// # Safety
///
/// - `handle` must not be in use by another call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_gamedata_free(handle: *mut RetroGameDataHandle) {
    if !unsafe { RetroGameDataHandle::free(handle) } && !handle.is_null() {
        tracing::warn!("retro_gamedata_free on a handle that is not live");
    }
}

/// Open a BK2 movie for recording one player.
///
/// # Parameters
///
/// - `name`: Movie file path (UTF-8 encoded, null-terminated)
/// - `error`: Out-parameter for error information
///
/// # Ownership
///
/// Caller owns the returned handle. Must call `retro_movie_free()` to free.
///
/// # Safety
///
/// - `name` must be a valid null-terminated UTF-8 string or NULL
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_movie_new(
    name: *const c_char,
    error: *mut RetroError,
) -> *mut RetroMovieHandle {
    let path = match unsafe { cstr_to_path(name, "name") } {
        Ok(p) => p,
        Err(e) => return unsafe { set_error_null(error, e) },
    };

    match RetroMovie::open(&path) {
        Ok(movie) => {
            unsafe { set_ok(error) };
            RetroMovieHandle::into_raw(movie)
        }
        Err(e) => unsafe { set_error_null(error, e.into()) },
    }
}

/// Close the underlying movie container.
///
/// The handle stays valid until `retro_movie_free()`. Closing twice is a
/// no-op; stepping a closed movie returns false.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_movie_close(handle: *mut RetroMovieHandle, error: *mut RetroError) {
    let handle = match unsafe { RetroMovieHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroMovieHandle::KIND)) },
    };

    handle.as_mut().close();
    unsafe { set_ok(error) };
}

/// Free a movie handle, closing it first if needed.
///
/// Freeing NULL or an already freed handle does nothing.
///
/// # Safety
///
/// - `handle` must not be in use by another call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_movie_free(handle: *mut RetroMovieHandle) {
    if !unsafe { RetroMovieHandle::free(handle) } && !handle.is_null() {
        tracing::warn!("retro_movie_free on a handle that is not live");
    }
}
