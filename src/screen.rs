//! Framebuffer queries.

use crate::error::{RetroError, RetroFailure};
use crate::handle::RetroEmulatorHandle;
use crate::util::{bytes_from_raw_mut, set_error, set_ok};
use libc::size_t;

/// Width of the current framebuffer in pixels.
///
/// # Returns
///
/// Width, or 0 on error or before a ROM is loaded.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_emulator_get_screen_width(
    handle: *mut RetroEmulatorHandle,
    error: *mut RetroError,
) -> i32 {
    let handle = match unsafe { RetroEmulatorHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroEmulatorHandle::KIND)) },
    };

    unsafe { set_ok(error) };
    handle.as_ref().screen_width() as i32
}

/// Height of the current framebuffer in pixels.
///
/// # Returns
///
/// Height, or 0 on error or before a ROM is loaded.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_emulator_get_screen_height(
    handle: *mut RetroEmulatorHandle,
    error: *mut RetroError,
) -> i32 {
    let handle = match unsafe { RetroEmulatorHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroEmulatorHandle::KIND)) },
    };

    unsafe { set_ok(error) };
    handle.as_ref().screen_height() as i32
}

/// Copy the current frame into a caller buffer as packed RGB888.
///
/// 16-bit framebuffers are read as RGB565, 32-bit ones as XRGB8888.
///
/// # Parameters
///
/// - `handle`: Valid emulator handle
/// - `width`, `height`: Region to copy, anchored top-left; must fit the frame
/// - `out_rgb`: Output buffer, stride `width * 3`
/// - `out_len`: Length of `out_rgb`; must equal `width * height * 3`
/// - `error`: Out-parameter for error information
///
/// # Returns
///
/// true on success. On failure the buffer is left untouched.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `out_rgb` must point to at least `out_len` writable bytes
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_emulator_get_screen(
    handle: *mut RetroEmulatorHandle,
    width: i32,
    height: i32,
    out_rgb: *mut u8,
    out_len: size_t,
    error: *mut RetroError,
) -> bool {
    let handle = match unsafe { RetroEmulatorHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroEmulatorHandle::KIND)) },
    };

    let (Ok(width), Ok(height)) = (usize::try_from(width), usize::try_from(height)) else {
        return unsafe {
            set_error(
                error,
                RetroFailure::FrameBounds {
                    width: width.max(0) as usize,
                    height: height.max(0) as usize,
                    max_width: handle.as_ref().screen_width(),
                    max_height: handle.as_ref().screen_height(),
                }
                .into(),
            )
        };
    };

    let out = match unsafe { bytes_from_raw_mut(out_rgb, out_len, "out_rgb") } {
        Ok(b) => b,
        Err(e) => return unsafe { set_error(error, e) },
    };

    match handle.as_ref().screen_into(width, height, out) {
        Ok(()) => {
            unsafe { set_ok(error) };
            true
        }
        Err(e) => unsafe { set_error(error, e.into()) },
    }
}
