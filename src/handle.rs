//! Opaque handle wrappers for emulator, game-data and movie instances.
//!
//! Each handle is a boxed owner exposed to C as an opaque pointer. Live
//! handles are tracked per thread, so a pointer that was never handed out,
//! was already freed, or belongs to another handle kind is rejected instead
//! of being dereferenced.
//!
//! # Thread Safety
//!
//! Handles are NOT thread-safe. All operations on a handle must occur from
//! the thread that created it; other threads see it as invalid.

use std::cell::RefCell;
use std::collections::HashSet;

use crate::emulator::RetroEmulator;
use crate::gamedata::RetroGameData;
use crate::movie::RetroMovie;

thread_local! {
    static LIVE: RefCell<HashSet<(&'static str, usize)>> = RefCell::new(HashSet::new());
}

fn register(kind: &'static str, addr: usize) {
    LIVE.with(|live| live.borrow_mut().insert((kind, addr)));
}

fn is_live(kind: &'static str, addr: usize) -> bool {
    LIVE.with(|live| live.borrow().contains(&(kind, addr)))
}

fn unregister(kind: &'static str, addr: usize) -> bool {
    LIVE.with(|live| live.borrow_mut().remove(&(kind, addr)))
}

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident => $inner:ty, $kind:literal) => {
        $(#[$meta])*
        pub struct $name {
            inner: $inner,
        }

        impl $name {
            /// Handle kind, used in error messages.
            pub const KIND: &'static str = $kind;

            /// Box `inner` and hand ownership to the caller as a raw pointer.
            pub fn into_raw(inner: $inner) -> *mut Self {
                let ptr = Box::into_raw(Box::new(Self { inner }));
                register($kind, ptr as usize);
                ptr
            }

            /// Get a reference to the inner value.
            pub fn as_ref(&self) -> &$inner {
                &self.inner
            }

            /// Get a mutable reference to the inner value.
            pub fn as_mut(&mut self) -> &mut $inner {
                &mut self.inner
            }

            /// Convert a raw pointer to a mutable reference.
            ///
            /// Returns `None` for null, freed or foreign pointers.
            ///
            /// # Safety
            ///
            /// No other reference to the same handle may be alive.
            pub unsafe fn from_ptr_mut<'a>(ptr: *mut Self) -> Option<&'a mut Self> {
                if ptr.is_null() || !is_live($kind, ptr as usize) {
                    return None;
                }
                unsafe { ptr.as_mut() }
            }

            /// Take back ownership and drop the handle.
            ///
            /// Returns false (and does nothing) for null, freed or foreign pointers.
            ///
            /// # Safety
            ///
            /// No reference to the handle may outlive this call.
            pub unsafe fn free(ptr: *mut Self) -> bool {
                if ptr.is_null() || !unregister($kind, ptr as usize) {
                    return false;
                }
                unsafe { drop(Box::from_raw(ptr)) };
                true
            }
        }
    };
}

opaque_handle!(
    /// Opaque handle owning one emulator.
    ///
    /// Must be freed with `retro_emulator_free()`.
    RetroEmulatorHandle => RetroEmulator, "emulator"
);

opaque_handle!(
    /// Opaque handle owning one game-data object and its scenario.
    ///
    /// Must be freed with `retro_gamedata_free()`.
    RetroGameDataHandle => RetroGameData, "gamedata"
);

opaque_handle!(
    /// Opaque handle owning one BK2 movie.
    ///
    /// Must be freed with `retro_movie_free()`.
    RetroMovieHandle => RetroMovie, "movie"
);
