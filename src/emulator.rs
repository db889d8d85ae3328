//! Owning wrapper around a provider emulator.

use std::path::Path;

use crate::backend::{self, Emulator};
use crate::coreinfo;
use crate::error::RetroFailure;
use crate::gamedata::RetroGameData;
use crate::framebuffer;

/// One emulated console and the core it was loaded with.
pub struct RetroEmulator {
    core: Box<dyn Emulator>,
    core_name: Option<String>,
}

impl RetroEmulator {
    /// Create an empty emulator from the installed provider.
    pub fn new() -> Result<Self, RetroFailure> {
        Ok(Self::with_core(backend::provider()?.new_emulator()))
    }

    pub fn with_core(core: Box<dyn Emulator>) -> Self {
        Self {
            core,
            core_name: None,
        }
    }

    /// Load a ROM, resolving its core from the file extension.
    pub fn load_rom(&mut self, path: impl AsRef<Path>) -> Result<(), RetroFailure> {
        let path = path.as_ref();
        let info = coreinfo::core_for_rom(path)
            .ok_or_else(|| RetroFailure::UnknownCore(path.display().to_string()))?;

        // A failed load may leave the provider without the previous ROM.
        self.core_name = None;
        self.core.load_rom(path, &info)?;
        tracing::debug!(rom = %path.display(), core = %info.name, "ROM loaded");
        self.core_name = Some(info.name);
        Ok(())
    }

    pub fn run(&mut self) {
        self.core.run();
    }

    /// Restore a serialized state.
    pub fn set_state(&mut self, state: &[u8]) -> Result<(), RetroFailure> {
        self.core.unserialize(state).map_err(Into::into)
    }

    /// Serialize the current state.
    pub fn state(&self) -> Result<Vec<u8>, RetroFailure> {
        self.core.serialize().map_err(Into::into)
    }

    pub fn screen_width(&self) -> usize {
        self.core.image_width()
    }

    pub fn screen_height(&self) -> usize {
        self.core.image_height()
    }

    /// Convert the top-left `width` x `height` of the framebuffer into `out` (RGB888).
    pub fn screen_into(&self, width: usize, height: usize, out: &mut [u8]) -> Result<(), RetroFailure> {
        let frame = self.core.image().ok_or(RetroFailure::NoCore)?;
        framebuffer::copy_to_rgb888(&frame, width, height, out)
    }

    /// The full current frame as RGB888, with its width and height.
    pub fn screen(&self) -> Result<(Vec<u8>, usize, usize), RetroFailure> {
        let (width, height) = (self.screen_width(), self.screen_height());
        let len = framebuffer::rgb888_len(width, height).ok_or(RetroFailure::BufferSize {
            expected: usize::MAX,
            actual: 0,
        })?;
        let mut buffer = vec![0u8; len];
        self.screen_into(width, height, &mut buffer)?;
        Ok((buffer, width, height))
    }

    pub fn set_key(&mut self, port: u32, key: u32, active: bool) {
        self.core.set_key(port, key, active);
    }

    /// Set key `i` of `player` to `mask[i] != 0` for every entry of `mask`.
    pub fn set_button_mask(&mut self, mask: &[u8], player: u32) {
        for (key, &pressed) in mask.iter().enumerate() {
            self.core.set_key(player, key as u32, pressed != 0);
        }
    }

    /// Attach game data so it can read this emulator's memory.
    pub fn configure_data(&mut self, data: &mut RetroGameData) -> Result<(), RetroFailure> {
        self.core.configure_data(data.data_mut())?;
        Ok(())
    }

    /// Name of the core resolved by the last successful `load_rom`.
    pub fn core_name(&self) -> Option<&str> {
        self.core_name.as_deref()
    }
}
