//! Process-wide registry of core descriptions.
//!
//! Core descriptions arrive as JSON keyed by core name:
//!
//! ```json
//! {"Genesis": {"lib": "genesis_plus_gx", "ext": ["md"],
//!              "buttons": ["B", "A", "MODE", "START", "UP", "DOWN",
//!                          "LEFT", "RIGHT", "C", "Y", "X", "Z"]}}
//! ```
//!
//! Loads accumulate: a later description of the same core replaces the
//! earlier one, other cores are kept.

use std::collections::{BTreeMap, HashMap};
use std::os::raw::c_char;
use std::path::Path;
use std::sync::{LazyLock, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{RetroError, RetroFailure};
use crate::handle::RetroEmulatorHandle;
use crate::util::{cstr_to_str, set_error, set_error_null, set_ok, string_to_cstr};

/// Description of one pluggable console core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreInfo {
    /// Core identifier, taken from the JSON key.
    #[serde(skip)]
    pub name: String,
    /// Native library implementing the core.
    pub lib: String,
    /// ROM file extensions handled by this core (without the dot).
    #[serde(default)]
    pub ext: Vec<String>,
    /// Button names in controller key order.
    #[serde(default)]
    pub buttons: Vec<String>,
    /// Keyboard bindings matching `buttons`.
    #[serde(default)]
    pub keybinds: Vec<String>,
    /// Base address of work RAM in the core's memory map.
    #[serde(default)]
    pub rambase: Option<u64>,
}

#[derive(Default)]
struct Registry {
    cores: HashMap<String, CoreInfo>,
    by_ext: HashMap<String, String>,
}

static REGISTRY: LazyLock<RwLock<Registry>> = LazyLock::new(|| RwLock::new(Registry::default()));

/// Parse and register core descriptions. Returns the names of the cores loaded.
pub fn load_core_info(json: &str) -> Result<Vec<String>, RetroFailure> {
    let parsed: BTreeMap<String, CoreInfo> = serde_json::from_str(json)?;

    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    let mut names = Vec::with_capacity(parsed.len());
    for (name, mut info) in parsed {
        info.name = name.clone();
        for ext in &info.ext {
            registry
                .by_ext
                .insert(ext.trim_start_matches('.').to_ascii_lowercase(), name.clone());
        }
        tracing::debug!(core = %name, lib = %info.lib, "core info registered");
        registry.cores.insert(name.clone(), info);
        names.push(name);
    }
    Ok(names)
}

/// Description of the core that handles the given ROM, by extension.
pub fn core_for_rom(path: &Path) -> Option<CoreInfo> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    let name = registry.by_ext.get(&ext)?;
    registry.cores.get(name).cloned()
}

/// Description of a core by name.
pub fn core_info(name: &str) -> Option<CoreInfo> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .cores
        .get(name)
        .cloned()
}

/// Button names of a core, in key order.
pub fn button_list(name: &str) -> Option<Vec<String>> {
    core_info(name).map(|info| info.buttons)
}

/// Load core description metadata.
///
/// Process-wide: not tied to any handle. May be called repeatedly with
/// different descriptions.
///
/// # Parameters
///
/// - `json`: Core description JSON (UTF-8, null-terminated)
/// - `error`: Out-parameter for error information
///
/// # Returns
///
/// true on success, false if the JSON is invalid.
///
/// # Safety
///
/// - `json` must be a valid null-terminated UTF-8 string or NULL
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_load_core_info(json: *const c_char, error: *mut RetroError) -> bool {
    let json = match unsafe { cstr_to_str(json, "json") } {
        Ok(s) => s,
        Err(e) => return unsafe { set_error(error, e) },
    };

    match load_core_info(json) {
        Ok(_) => {
            unsafe { set_ok(error) };
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "core info rejected");
            unsafe { set_error(error, e.into()) }
        }
    }
}

/// Name of the emulator's active core.
///
/// # Returns
///
/// Core name on success, NULL if no ROM has been loaded.
///
/// # Ownership
///
/// Caller owns the returned string. Must call `retro_string_free()` to free.
///
/// # Safety
///
/// - `handle` must be a valid handle
/// - `error` must be a valid pointer or NULL
#[unsafe(no_mangle)]
pub unsafe extern "C" fn retro_emulator_get_core(
    handle: *mut RetroEmulatorHandle,
    error: *mut RetroError,
) -> *mut c_char {
    let handle = match unsafe { RetroEmulatorHandle::from_ptr_mut(handle) } {
        Some(h) => h,
        None => {
            return unsafe { set_error_null(error, RetroError::invalid_handle(RetroEmulatorHandle::KIND)) };
        }
    };

    match handle.as_ref().core_name() {
        Some(name) => {
            unsafe { set_ok(error) };
            string_to_cstr(name.to_string())
        }
        None => unsafe { set_error_null(error, RetroFailure::NoCore.into()) },
    }
}
