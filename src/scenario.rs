//! Game data and scenario functions (load, rewards, action space).

use crate::error::RetroError;
use crate::gamedata::ValidActions;
use crate::handle::{RetroEmulatorHandle, RetroGameDataHandle};
use crate::util::{cstr_to_path, cstr_to_str, set_error, set_error_null, set_ok};
use libc::size_t;
use std::os::raw::c_char;

/// Independent outcomes of loading game data and scenario.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RetroLoadOutcome {
    /// Whether the data definition loaded
    pub data_ok: bool,
    /// Whether the scenario definition loaded
    pub scenario_ok: bool,
}

/// One button group and its permitted values.
#[repr(C)]
pub struct RetroActionSet {
    /// Button-group key
    pub key: i32,
    /// Permitted values, ascending
    pub values: *mut i32,
    /// Number of entries in `values`
    pub num_values: size_t,
}

/// The whole action space, released as one unit.
///
/// # Memory Ownership
///
/// Owned by the FFI layer. Release with `retro_action_sets_free()`; do not
/// modify `entries` or `len`.
#[repr(C)]
pub struct RetroActionSets {
    /// Action sets, ascending by key
    pub entries: *mut RetroActionSet,
    /// Number of entries
    pub len: size_t,
}

impl RetroActionSets {
    fn from_valid_actions(actions: ValidActions) -> Box<Self> {
        let entries: Box<[RetroActionSet]> = actions
            .into_iter()
            .map(|set| {
                let values: Box<[i32]> = set.values.into_iter().collect();
                let num_values = values.len();
                RetroActionSet {
                    key: set.key,
                    values: Box::into_raw(values) as *mut i32,
                    num_values,
                }
            })
            .collect();
        let len = entries.len();
        Box::new(Self {
            entries: Box::into_raw(entries) as *mut RetroActionSet,
            len,
        })
    }
}

impl Drop for RetroActionSets {
    fn drop(&mut self) {
        let entries = unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(self.entries, self.len)) };
        for entry in entries.iter() {
            unsafe {
                drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    entry.values,
                    entry.num_values,
                )));
            }
        }
    }
}

/// Load game data and scenario definitions.
///
/// Both loads are attempted even if the first fails.
///
/// # Returns
///
/// true only if both loaded. `error` names the first failure (data before
/// scenario); use `retro_gamedata_load_outcome()` to see both.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `data_path`, `scenario_path` must be valid null-terminated UTF-8 strings or NULL
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_gamedata_load(
    handle: *mut RetroGameDataHandle,
    data_path: *const c_char,
    scenario_path: *const c_char,
    error: *mut RetroError,
) -> bool {
    let handle = match unsafe { RetroGameDataHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroGameDataHandle::KIND)) },
    };

    let data_path = match unsafe { cstr_to_path(data_path, "data_path") } {
        Ok(p) => p,
        Err(e) => return unsafe { set_error(error, e) },
    };
    let scenario_path = match unsafe { cstr_to_path(scenario_path, "scenario_path") } {
        Ok(p) => p,
        Err(e) => return unsafe { set_error(error, e) },
    };

    match handle.as_mut().load(&data_path, &scenario_path).into_result() {
        Ok(()) => {
            unsafe { set_ok(error) };
            true
        }
        Err(e) => unsafe { set_error(error, e.into()) },
    }
}

/// Load game data and scenario definitions, reporting each outcome.
///
/// # Returns
///
/// Per-definition success flags. `error` is set as for `retro_gamedata_load()`.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `data_path`, `scenario_path` must be valid null-terminated UTF-8 strings or NULL
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_gamedata_load_outcome(
    handle: *mut RetroGameDataHandle,
    data_path: *const c_char,
    scenario_path: *const c_char,
    error: *mut RetroError,
) -> RetroLoadOutcome {
    let handle = match unsafe { RetroGameDataHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroGameDataHandle::KIND)) },
    };

    let data_path = match unsafe { cstr_to_path(data_path, "data_path") } {
        Ok(p) => p,
        Err(e) => return unsafe { set_error(error, e) },
    };
    let scenario_path = match unsafe { cstr_to_path(scenario_path, "scenario_path") } {
        Ok(p) => p,
        Err(e) => return unsafe { set_error(error, e) },
    };

    let outcome = handle.as_mut().load(&data_path, &scenario_path);
    let flags = RetroLoadOutcome {
        data_ok: outcome.data.is_ok(),
        scenario_ok: outcome.scenario.is_ok(),
    };
    match outcome.into_result() {
        Ok(()) => unsafe { set_ok(error) },
        Err(e) => unsafe { set_error::<()>(error, e.into()) },
    }
    flags
}

/// Restart the scenario and reload its scripts.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_gamedata_reset(handle: *mut RetroGameDataHandle, error: *mut RetroError) {
    let handle = match unsafe { RetroGameDataHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroGameDataHandle::KIND)) },
    };

    handle.as_mut().reset();
    unsafe { set_ok(error) };
}

/// Snapshot emulator RAM and evaluate the scenario for one tick.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_gamedata_update_ram(handle: *mut RetroGameDataHandle, error: *mut RetroError) {
    let handle = match unsafe { RetroGameDataHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroGameDataHandle::KIND)) },
    };

    handle.as_mut().update_ram();
    unsafe { set_ok(error) };
}

/// Reward of the last tick for agent 0.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_gamedata_current_reward(
    handle: *mut RetroGameDataHandle,
    error: *mut RetroError,
) -> f32 {
    let handle = match unsafe { RetroGameDataHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroGameDataHandle::KIND)) },
    };

    unsafe { set_ok(error) };
    handle.as_ref().current_reward()
}

/// Reward accumulated since the last reset for agent 0.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_gamedata_total_reward(
    handle: *mut RetroGameDataHandle,
    error: *mut RetroError,
) -> f32 {
    let handle = match unsafe { RetroGameDataHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroGameDataHandle::KIND)) },
    };

    unsafe { set_ok(error) };
    handle.as_ref().total_reward()
}

/// Whether the episode has ended.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_gamedata_is_done(handle: *mut RetroGameDataHandle, error: *mut RetroError) -> bool {
    let handle = match unsafe { RetroGameDataHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroGameDataHandle::KIND)) },
    };

    unsafe { set_ok(error) };
    handle.as_ref().is_done()
}

/// Enumerate the scenario's valid actions.
///
/// # Returns
///
/// Action sets ascending by key, or NULL on error.
///
/// # Ownership
///
/// Caller owns the result. Must call `retro_action_sets_free()` exactly once.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_gamedata_valid_actions(
    handle: *mut RetroGameDataHandle,
    error: *mut RetroError,
) -> *mut RetroActionSets {
    let handle = match unsafe { RetroGameDataHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => {
            return unsafe { set_error_null(error, RetroError::invalid_handle(RetroGameDataHandle::KIND)) };
        }
    };

    let actions = handle.as_ref().valid_actions();
    unsafe { set_ok(error) };
    Box::into_raw(RetroActionSets::from_valid_actions(actions))
}

/// Free action sets returned by `retro_gamedata_valid_actions()`.
///
/// Safe to call with NULL.
///
/// # Safety
///
/// `actions` must come from `retro_gamedata_valid_actions()` and not have
/// been freed already.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_action_sets_free(actions: *mut RetroActionSets) {
    if !actions.is_null() {
        unsafe { drop(Box::from_raw(actions)) };
    }
}

/// Read a named RAM variable from the last snapshot.
///
/// # Parameters
///
/// - `name`: Variable name defined by the game data
/// - `out_value`: Out-parameter for the value (must not be NULL)
///
/// # Returns
///
/// true if the variable exists.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `name` must be a valid null-terminated UTF-8 string or NULL
/// - `out_value` must be a valid pointer
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_gamedata_lookup_value(
    handle: *mut RetroGameDataHandle,
    name: *const c_char,
    out_value: *mut i64,
    error: *mut RetroError,
) -> bool {
    let handle = match unsafe { RetroGameDataHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroGameDataHandle::KIND)) },
    };

    let name = match unsafe { cstr_to_str(name, "name") } {
        Ok(s) => s,
        Err(e) => return unsafe { set_error(error, e) },
    };

    if out_value.is_null() {
        return unsafe { set_error(error, RetroError::null_pointer("out_value")) };
    }

    match handle.as_ref().lookup_value(name) {
        Ok(value) => {
            unsafe { *out_value = value };
            unsafe { set_ok(error) };
            true
        }
        Err(e) => unsafe { set_error(error, e.into()) },
    }
}

/// Attach game data to an emulator so its RAM snapshots read that emulator.
///
/// # Returns
///
/// true on success; false if the core does not accept this game data.
///
/// # Safety
///
/// - `handle` and `data` must be valid handles
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_emulator_configure_data(
    handle: *mut RetroEmulatorHandle,
    data: *mut RetroGameDataHandle,
    error: *mut RetroError,
) -> bool {
    let handle = match unsafe { RetroEmulatorHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroEmulatorHandle::KIND)) },
    };
    let data = match unsafe { RetroGameDataHandle::from_ptr_mut(data) } {
        Some(d) => d,
        None => return unsafe { set_error(error, RetroError::invalid_handle(RetroGameDataHandle::KIND)) },
    };

    match handle.as_mut().configure_data(data.as_mut()) {
        Ok(()) => {
            unsafe { set_ok(error) };
            true
        }
        Err(e) => unsafe { set_error(error, e.into()) },
    }
}
