//! soundgrid - Linked-Grid Audio Editing Core
//!
//! An in-memory, mutable representation of multichannel audio as a
//! two-dimensional linked grid, plus the in-place editing operations an
//! audio editor needs: reverse, clip, splice, downmix, additive mixing,
//! and deep duplication.
//!
//! # Architecture
//!
//! Samples are nodes in an arena ([`grid::arena`]), each holding two
//! directed relations: *next-in-time* (same channel, next instant) and
//! *next-channel* (same instant, next channel). The grid owns the arena
//! and a single head reference; everything else is reached by following
//! relations, exactly like the classic linked-list rendering of the
//! structure — but with stable integer ids instead of pointers, so
//! relinking during reverse and splice needs no unsafe code.
//!
//! Decoding/encoding of audio files, playback, and band-limited sample
//! rate conversion are a host application's job; this crate is only the
//! editing core.

pub mod error;
pub mod grid;

pub use error::{GridError, Result};
pub use grid::SampleGrid;
