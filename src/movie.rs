//! Owning wrapper around a provider BK2 movie.

use std::path::Path;

use crate::backend::{self, Movie, MovieOptions};
use crate::coreinfo;
use crate::emulator::RetroEmulator;
use crate::error::RetroFailure;

/// Movies are always opened for recording a single player.
pub const MOVIE_OPTIONS: MovieOptions = MovieOptions {
    record: true,
    players: 1,
};

/// Player whose keys `set_key` records.
pub const MOVIE_PLAYER: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MovieState {
    Open,
    /// Input ran out; `step` keeps returning false.
    Exhausted,
    Closed,
}

/// A BK2 input recording.
///
/// Closing is idempotent and also happens on drop.
pub struct RetroMovie {
    inner: Box<dyn Movie>,
    state: MovieState,
}

impl RetroMovie {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RetroFailure> {
        let path = path.as_ref();
        let inner = backend::provider()?.open_movie(path, MOVIE_OPTIONS)?;
        tracing::debug!(movie = %path.display(), "movie opened");
        Ok(Self::with_movie(inner))
    }

    pub fn with_movie(inner: Box<dyn Movie>) -> Self {
        Self {
            inner,
            state: MovieState::Open,
        }
    }

    /// Advance one frame. Returns whether input remains.
    ///
    /// Once this returns false it keeps returning false without touching the
    /// underlying movie.
    pub fn step(&mut self) -> bool {
        if self.state != MovieState::Open {
            return false;
        }
        let more = self.inner.step();
        if !more {
            self.state = MovieState::Exhausted;
        }
        more
    }

    /// Bind the movie to a game and to the keymap of the emulator's core.
    pub fn configure(&mut self, emulator: &RetroEmulator, game_name: &str) -> Result<(), RetroFailure> {
        if self.is_closed() {
            tracing::warn!(game = %game_name, "configure on a closed movie ignored");
            return Ok(());
        }
        let core = emulator.core_name().ok_or(RetroFailure::NoCore)?;
        let buttons = coreinfo::button_list(core).ok_or_else(|| RetroFailure::UnknownCore(core.to_string()))?;
        self.inner.set_game_name(game_name);
        self.inner.load_keymap(core, &buttons);
        Ok(())
    }

    pub fn set_key(&mut self, key: u32, active: bool) {
        if !self.is_closed() {
            self.inner.set_key(key, active, MOVIE_PLAYER);
        }
    }

    pub fn set_state(&mut self, state: &[u8]) {
        if !self.is_closed() {
            self.inner.set_state(state);
        }
    }

    pub fn close(&mut self) {
        if self.is_closed() {
            return;
        }
        self.inner.close();
        self.state = MovieState::Closed;
        tracing::debug!("movie closed");
    }

    pub fn is_closed(&self) -> bool {
        self.state == MovieState::Closed
    }
}

impl Drop for RetroMovie {
    fn drop(&mut self) {
        self.close();
    }
}
