//! Emulation stepping and serialized state.

use crate::error::{RetroError, RetroFailure};
use crate::handle::{RetroEmulatorHandle, RetroMovieHandle};
use crate::util::{bytes_from_raw, bytes_from_raw_mut, set_error, set_ok};
use libc::size_t;

/// Run the emulator for one frame.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_emulator_run(handle: *mut RetroEmulatorHandle, error: *mut RetroError) {
    let handle = match unsafe { RetroEmulatorHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroEmulatorHandle::KIND)) },
    };

    handle.as_mut().run();
    unsafe { set_ok(error) };
}

/// Restore a serialized emulator state.
///
/// The format is owned by the core; typically a buffer previously filled by
/// `retro_emulator_get_state()` or a decompressed save state.
///
/// # Returns
///
/// true if the core accepted the state.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `state_data` must point to at least `state_size` bytes
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_emulator_set_state(
    handle: *mut RetroEmulatorHandle,
    state_data: *const u8,
    state_size: size_t,
    error: *mut RetroError,
) -> bool {
    let handle = match unsafe { RetroEmulatorHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroEmulatorHandle::KIND)) },
    };

    let state = match unsafe { bytes_from_raw(state_data, state_size, "state_data") } {
        Ok(s) => s,
        Err(e) => return unsafe { set_error(error, e) },
    };

    match handle.as_mut().set_state(state) {
        Ok(()) => {
            unsafe { set_ok(error) };
            true
        }
        Err(e) => unsafe { set_error(error, e.into()) },
    }
}

/// Size in bytes of the emulator's current serialized state.
///
/// # Returns
///
/// Size on success, 0 on error.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_emulator_state_size(
    handle: *mut RetroEmulatorHandle,
    error: *mut RetroError,
) -> size_t {
    let handle = match unsafe { RetroEmulatorHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroEmulatorHandle::KIND)) },
    };

    match handle.as_ref().state() {
        Ok(state) => {
            unsafe { set_ok(error) };
            state.len()
        }
        Err(e) => unsafe { set_error(error, e.into()) },
    }
}

/// Serialize the emulator state into a caller buffer.
///
/// # Parameters
///
/// - `out`: Output buffer
/// - `out_len`: Length of `out`; must equal `retro_emulator_state_size()`
///
/// # Returns
///
/// true on success.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `out` must point to at least `out_len` writable bytes
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_emulator_get_state(
    handle: *mut RetroEmulatorHandle,
    out: *mut u8,
    out_len: size_t,
    error: *mut RetroError,
) -> bool {
    let handle = match unsafe { RetroEmulatorHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroEmulatorHandle::KIND)) },
    };

    let out = match unsafe { bytes_from_raw_mut(out, out_len, "out") } {
        Ok(b) => b,
        Err(e) => return unsafe { set_error(error, e) },
    };

    let state = match handle.as_ref().state() {
        Ok(s) => s,
        Err(e) => return unsafe { set_error(error, e.into()) },
    };

    if state.len() != out.len() {
        let e = RetroFailure::BufferSize {
            expected: state.len(),
            actual: out.len(),
        };
        return unsafe { set_error(error, e.into()) };
    }

    out.copy_from_slice(&state);
    unsafe { set_ok(error) };
    true
}

/// Store a raw state buffer in the movie (its starting state).
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `data` must point to at least `size` bytes
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_movie_set_state(
    handle: *mut RetroMovieHandle,
    data: *const u8,
    size: size_t,
    error: *mut RetroError,
) {
    let handle = match unsafe { RetroMovieHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroMovieHandle::KIND)) },
    };

    let state = match unsafe { bytes_from_raw(data, size, "data") } {
        Ok(s) => s,
        Err(e) => return unsafe { set_error(error, e) },
    };

    handle.as_mut().set_state(state);
    unsafe { set_ok(error) };
}
