//! Movie recording functions (step, configure).

use crate::error::RetroError;
use crate::handle::{RetroEmulatorHandle, RetroMovieHandle};
use crate::util::{cstr_to_str, set_error, set_ok};
use std::os::raw::c_char;

/// Advance the movie by one frame.
///
/// # Returns
///
/// true while input remains. Once it returns false it keeps returning false,
/// as does a closed movie.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_movie_step(handle: *mut RetroMovieHandle, error: *mut RetroError) -> bool {
    let handle = match unsafe { RetroMovieHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroMovieHandle::KIND)) },
    };

    unsafe { set_ok(error) };
    handle.as_mut().step()
}

/// Bind a movie to a game and to the keymap of the emulator's active core.
///
/// # Parameters
///
/// - `handle`: Valid movie handle
/// - `emulator`: Emulator with a ROM loaded
/// - `name`: Game name recorded in the movie (UTF-8, null-terminated)
/// - `error`: Out-parameter for error information
///
/// # Returns
///
/// true on success; false if the emulator has no active core.
///
/// # Safety
///
/// - `handle` and `emulator` must be valid handles
/// - `name` must be a valid null-terminated UTF-8 string or NULL
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_movie_configure(
    handle: *mut RetroMovieHandle,
    emulator: *mut RetroEmulatorHandle,
    name: *const c_char,
    error: *mut RetroError,
) -> bool {
    let handle = match unsafe { RetroMovieHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroMovieHandle::KIND)) },
    };
    let emulator = match unsafe { RetroEmulatorHandle::from_ptr_mut(emulator) } {
        Some(e) => e,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroEmulatorHandle::KIND)) },
    };

    let name = match unsafe { cstr_to_str(name, "name") } {
        Ok(s) => s,
        Err(e) => return unsafe { set_error(error, e) },
    };

    match handle.as_mut().configure(emulator.as_ref(), name) {
        Ok(()) => {
            unsafe { set_ok(error) };
            true
        }
        Err(e) => unsafe { set_error(error, e.into()) },
    }
}
