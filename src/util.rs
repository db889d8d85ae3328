//! Utility functions for FFI operations.

use crate::error::RetroError;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::PathBuf;

/// Convert a C string to a PathBuf.
///
/// Returns an error if the pointer is null or contains invalid UTF-8.
///
/// # Safety
///
/// The caller must ensure `ptr` is either null or points to a valid
/// null-terminated C string.
pub unsafe fn cstr_to_path(ptr: *const c_char, param_name: &str) -> Result<PathBuf, RetroError> {
    unsafe { cstr_to_str(ptr, param_name) }.map(PathBuf::from)
}

/// Borrow a C string as `&str`.
///
/// # Safety
///
/// The caller must ensure `ptr` is either null or points to a valid
/// null-terminated C string that outlives the returned reference.
pub unsafe fn cstr_to_str<'a>(ptr: *const c_char, param_name: &str) -> Result<&'a str, RetroError> {
    if ptr.is_null() {
        return Err(RetroError::null_pointer(param_name));
    }

    let cstr = unsafe { CStr::from_ptr(ptr) };
    cstr.to_str()
        .map_err(|_| RetroError::invalid_utf8(param_name))
}

/// Borrow a caller buffer as a byte slice.
///
/// A null pointer is only accepted together with a zero length.
///
/// # Safety
///
/// `ptr` must point to at least `len` readable bytes, or be null.
pub unsafe fn bytes_from_raw<'a>(
    ptr: *const u8,
    len: usize,
    param_name: &str,
) -> Result<&'a [u8], RetroError> {
    if ptr.is_null() {
        if len == 0 {
            return Ok(&[]);
        }
        return Err(RetroError::null_pointer(param_name));
    }
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) })
}

/// Borrow a caller buffer as a mutable byte slice.
///
/// # Safety
///
/// `ptr` must point to at least `len` writable bytes, or be null.
pub unsafe fn bytes_from_raw_mut<'a>(
    ptr: *mut u8,
    len: usize,
    param_name: &str,
) -> Result<&'a mut [u8], RetroError> {
    if ptr.is_null() {
        return Err(RetroError::null_pointer(param_name));
    }
    Ok(unsafe { std::slice::from_raw_parts_mut(ptr, len) })
}

/// Convert a Rust string to a C string, returning an owned pointer.
///
/// The caller is responsible for freeing the returned pointer with `retro_string_free`.
/// Returns null if the string contains internal null bytes.
pub fn string_to_cstr(s: String) -> *mut c_char {
    CString::new(s)
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

/// Set an error in the out-parameter and return a default value.
///
/// # Safety
///
/// The caller must ensure `error` is either null or a valid pointer.
pub unsafe fn set_error<T: Default>(error: *mut RetroError, err: RetroError) -> T {
    if let Some(e) = unsafe { error.as_mut() } {
        *e = err;
    }
    T::default()
}

/// Set an error in the out-parameter and return null.
///
/// # Safety
///
/// The caller must ensure `error` is either null or a valid pointer.
pub unsafe fn set_error_null<T>(error: *mut RetroError, err: RetroError) -> *mut T {
    if let Some(e) = unsafe { error.as_mut() } {
        *e = err;
    }
    std::ptr::null_mut()
}

/// Set success in the out-parameter error.
///
/// # Safety
///
/// The caller must ensure `error` is either null or a valid pointer.
pub unsafe fn set_ok(error: *mut RetroError) {
    if let Some(e) = unsafe { error.as_mut() } {
        *e = RetroError::ok();
    }
}

/// Free a string returned by this library.
///
/// # Safety
///
/// `str` must be a pointer returned by a `retro_*` function, or NULL.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_string_free(str: *mut c_char) {
    if !str.is_null() {
        unsafe {
            drop(CString::from_raw(str));
        }
    }
}
