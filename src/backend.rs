//! Core provider seam (the backend behind every handle).
//!
//! The emulation core itself (CPU/PPU emulation, scenario scripting, the BK2
//! movie container) is not part of this crate. It is plugged in through a
//! `CoreProvider`, installed once per process, which hands out the four
//! cooperating objects the bindings forward to.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::OnceLock;

use crate::coreinfo::CoreInfo;
use crate::error::{CoreError, RetroFailure};

/// Borrowed view of the emulator's current framebuffer.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    /// Bits per pixel as reported by the core (16 or 32 are convertible).
    pub depth: u32,
    pub width: usize,
    pub height: usize,
    /// Bytes per row, including any padding.
    pub pitch: usize,
    pub data: &'a [u8],
}

/// An emulated console.
pub trait Emulator {
    /// Load a ROM with the core resolved from its extension.
    fn load_rom(&mut self, path: &Path, core: &CoreInfo) -> Result<(), CoreError>;

    /// Advance one frame.
    fn run(&mut self);

    fn serialize(&self) -> Result<Vec<u8>, CoreError>;

    fn unserialize(&mut self, state: &[u8]) -> Result<(), CoreError>;

    fn image_width(&self) -> usize;

    fn image_height(&self) -> usize;

    /// Current framebuffer, or `None` when nothing has been rendered.
    fn image(&self) -> Option<FrameView<'_>>;

    fn set_key(&mut self, port: u32, key: u32, active: bool);

    /// Expose the emulator's memory to a game-data object from the same provider.
    fn configure_data(&mut self, data: &mut dyn GameData) -> Result<(), CoreError>;
}

/// Named RAM variables of one game.
pub trait GameData: Any {
    fn load(&mut self, path: &Path) -> Result<(), CoreError>;

    /// Snapshot the emulator RAM this object was configured against.
    fn update_ram(&mut self);

    fn lookup_value(&self, name: &str) -> Option<i64>;

    /// Lets an emulator from the same provider reach its concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Scripted reward and termination logic over a `GameData`.
///
/// A scenario never holds on to its game data: every operation that reads
/// it borrows it for the duration of the call.
pub trait Scenario {
    fn load(&mut self, path: &Path, data: &dyn GameData) -> Result<(), CoreError>;

    fn restart(&mut self);

    fn reload_scripts(&mut self, data: &dyn GameData);

    fn update(&mut self, data: &dyn GameData);

    fn current_reward(&self, agent: u32) -> f32;

    fn total_reward(&self, agent: u32) -> f32;

    fn is_done(&self) -> bool;

    /// Button-group key to the set of values that group may take.
    fn valid_actions(&self) -> BTreeMap<i32, BTreeSet<i32>>;
}

/// A recorded input stream (BK2).
pub trait Movie {
    /// Advance one frame. Returns false once no input remains.
    fn step(&mut self) -> bool;

    fn set_game_name(&mut self, name: &str);

    fn load_keymap(&mut self, core: &str, buttons: &[String]);

    fn set_key(&mut self, key: u32, active: bool, player: u32);

    fn set_state(&mut self, state: &[u8]);

    fn close(&mut self);
}

/// Parameters for opening a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovieOptions {
    pub record: bool,
    pub players: u32,
}

/// Factory for the native objects behind every handle.
pub trait CoreProvider: Send + Sync {
    fn name(&self) -> &str;

    fn new_emulator(&self) -> Box<dyn Emulator>;

    fn new_game_data(&self) -> Box<dyn GameData>;

    fn new_scenario(&self) -> Box<dyn Scenario>;

    fn open_movie(&self, path: &Path, options: MovieOptions) -> Result<Box<dyn Movie>, CoreError>;
}

static PROVIDER: OnceLock<Box<dyn CoreProvider>> = OnceLock::new();

/// Install the process-wide core provider.
///
/// Only the first call succeeds; handles created afterwards all draw from it.
pub fn install_provider<P: CoreProvider + 'static>(provider: P) -> Result<(), RetroFailure> {
    let name = provider.name().to_string();
    PROVIDER
        .set(Box::new(provider))
        .map_err(|_| RetroFailure::ProviderInstalled)?;
    tracing::debug!(provider = %name, "core provider installed");
    Ok(())
}

/// The installed provider.
pub fn provider() -> Result<&'static dyn CoreProvider, RetroFailure> {
    PROVIDER
        .get()
        .map(|p| p.as_ref())
        .ok_or(RetroFailure::NoProvider)
}
