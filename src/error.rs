//! Error handling for the FFI layer.
//!
//! Two layers of errors live here: `CoreError`, reported by an installed core
//! provider, and `RetroFailure`, returned by the safe owning types. Both are
//! flattened into the C-compatible `RetroError` at the boundary.

use std::ffi::CString;
use std::os::raw::c_char;
use thiserror::Error;

/// Error codes for FFI functions.
///
/// These codes are stable and can be matched in C code.
/// Codes 1-99 describe core and binding failures.
/// Codes 100+ are FFI-specific errors.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetroErrorCode {
    /// No error
    Ok = 0,

    // Core failures (1-19)
    /// The core provider reported a failure
    Core = 1,
    /// No registered core handles the ROM's extension
    UnknownCore = 2,
    /// The emulator has no active core (no ROM loaded)
    NoCore = 3,
    /// Framebuffer depth has no RGB888 conversion
    UnsupportedPixelFormat = 4,
    /// Caller buffer does not have the required length
    BufferSize = 5,
    /// Requested frame size exceeds the current framebuffer
    FrameBounds = 6,
    /// Game data definition failed to load
    DataLoad = 7,
    /// Scenario definition failed to load
    ScenarioLoad = 8,
    /// Named variable is not defined by the game data
    UnknownVariable = 9,

    // Provider errors (20-29)
    /// No core provider installed in this process
    NoProvider = 20,
    /// A core provider is already installed
    ProviderInstalled = 21,

    // FFI-specific errors (100+)
    /// Null pointer passed
    NullPointer = 100,
    /// Invalid UTF-8 string
    InvalidUtf8 = 101,
    /// JSON parse error
    JsonParse = 102,
    /// Invalid, freed or foreign handle
    InvalidHandle = 103,
    /// Unknown error
    Unknown = 255,
}

/// Failure reported by a core provider.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("core rejected {what}: {reason}")]
    Rejected { what: &'static str, reason: String },
    #[error("unsupported by this core: {0}")]
    Unsupported(String),
}

impl CoreError {
    pub fn rejected(what: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            what,
            reason: reason.into(),
        }
    }
}

/// Failure returned by the safe binding types.
#[derive(Error, Debug)]
pub enum RetroFailure {
    #[error("no core provider installed")]
    NoProvider,
    #[error("a core provider is already installed")]
    ProviderInstalled,
    #[error("no registered core handles ROM `{0}`")]
    UnknownCore(String),
    #[error("emulator has no active core")]
    NoCore,
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("unsupported framebuffer depth: {0} bits")]
    UnsupportedPixelFormat(u32),
    #[error("buffer length {actual} does not match required {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("requested {width}x{height} exceeds framebuffer {max_width}x{max_height}")]
    FrameBounds {
        width: usize,
        height: usize,
        max_width: usize,
        max_height: usize,
    },
    #[error("game data failed to load: {0}")]
    DataLoad(CoreError),
    #[error("scenario failed to load: {0}")]
    ScenarioLoad(CoreError),
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),
    #[error("core info JSON error: {0}")]
    CoreInfo(#[from] serde_json::Error),
}

impl RetroFailure {
    pub fn code(&self) -> RetroErrorCode {
        match self {
            Self::NoProvider => RetroErrorCode::NoProvider,
            Self::ProviderInstalled => RetroErrorCode::ProviderInstalled,
            Self::UnknownCore(_) => RetroErrorCode::UnknownCore,
            Self::NoCore => RetroErrorCode::NoCore,
            Self::Core(_) => RetroErrorCode::Core,
            Self::UnsupportedPixelFormat(_) => RetroErrorCode::UnsupportedPixelFormat,
            Self::BufferSize { .. } => RetroErrorCode::BufferSize,
            Self::FrameBounds { .. } => RetroErrorCode::FrameBounds,
            Self::DataLoad(_) => RetroErrorCode::DataLoad,
            Self::ScenarioLoad(_) => RetroErrorCode::ScenarioLoad,
            Self::UnknownVariable(_) => RetroErrorCode::UnknownVariable,
            Self::CoreInfo(_) => RetroErrorCode::JsonParse,
        }
    }
}

/// Error structure returned via out-parameter.
///
/// # Memory Ownership
///
/// The `message` field is owned by the FFI layer when non-null.
/// Call `retro_error_free()` to release the message memory.
#[repr(C)]
pub struct RetroError {
    /// Error code
    pub code: RetroErrorCode,
    /// Error message (NULL if code == Ok)
    pub message: *mut c_char,
}

impl RetroError {
    /// Create a success result (no error).
    pub fn ok() -> Self {
        Self {
            code: RetroErrorCode::Ok,
            message: std::ptr::null_mut(),
        }
    }

    fn with_message(code: RetroErrorCode, msg: String) -> Self {
        Self {
            code,
            message: CString::new(msg)
                .map(CString::into_raw)
                .unwrap_or(std::ptr::null_mut()),
        }
    }

    /// Create an error from a binding failure.
    pub fn from_failure(e: RetroFailure) -> Self {
        Self::with_message(e.code(), e.to_string())
    }

    /// Create a null pointer error.
    pub fn null_pointer(param: &str) -> Self {
        Self::with_message(
            RetroErrorCode::NullPointer,
            format!("null pointer passed for parameter: {param}"),
        )
    }

    /// Create an invalid UTF-8 error.
    pub fn invalid_utf8(context: &str) -> Self {
        Self::with_message(
            RetroErrorCode::InvalidUtf8,
            format!("invalid UTF-8 in {context}"),
        )
    }

    /// Create an invalid handle error.
    pub fn invalid_handle(kind: &str) -> Self {
        Self::with_message(
            RetroErrorCode::InvalidHandle,
            format!("invalid, freed or null {kind} handle"),
        )
    }
}

impl From<RetroFailure> for RetroError {
    fn from(e: RetroFailure) -> Self {
        Self::from_failure(e)
    }
}

/// Free error message memory.
///
/// Safe to call with NULL error or NULL message.
///
/// # Safety
///
/// The error pointer must be valid or NULL.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_error_free(error: *mut RetroError) {
    if error.is_null() {
        return;
    }
    unsafe {
        let err = &mut *error;
        if !err.message.is_null() {
            drop(CString::from_raw(err.message));
            err.message = std::ptr::null_mut();
        }
    }
}
