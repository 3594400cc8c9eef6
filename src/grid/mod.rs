//! Sample Grid
//!
//! The core grid type: multichannel audio as a matrix of linked sample
//! nodes, `num_samples` time-columns wide and `num_channels` rows deep.
//! The grid holds a single head reference to node (t=0, c=0); every other
//! node is reached through the next-in-time and next-channel relations.
//!
//! Construction and append live here; traversal is in [`iter`], the
//! structural edits in [`edit`], and the mixing operations in [`mix`].
//!
//! # Example
//! ```
//! use soundgrid::SampleGrid;
//!
//! let mut grid = SampleGrid::new(4.0, 1).unwrap();
//! for s in [0.2, 0.9, -0.3, 0.5] {
//!     grid.push_sample(s).unwrap();
//! }
//! assert_eq!(grid.num_samples(), 4);
//! assert!((grid.duration() - 1.0).abs() < 1e-6);
//! ```

pub(crate) mod arena;
mod edit;
mod iter;
mod mix;

pub use iter::{ChannelSamples, Columns};

use crate::error::{GridError, Result};
use arena::{NodeArena, NodeId};
use log::debug;

// ============================================================================
// Constants
// ============================================================================

/// Lower edge of the nominal sample range
pub const SAMPLE_MIN: f32 = -1.0;

/// Upper edge of the nominal sample range
pub const SAMPLE_MAX: f32 = 1.0;

// ============================================================================
// Sample Grid
// ============================================================================

/// Multichannel audio as a two-dimensional linked grid
///
/// Editing operations mutate the grid in place by relinking columns rather
/// than copying sample data. All operations are synchronous; exclusive
/// access is enforced by `&mut self` on every mutator.
#[derive(Debug)]
pub struct SampleGrid {
    arena: NodeArena,
    head: Option<NodeId>,
    sample_rate: f32,
    num_channels: usize,
    num_samples: usize,
}

impl SampleGrid {
    /// Create an empty grid with the given rate and channel layout
    ///
    /// # Errors
    /// Returns an error when `sample_rate` is not finite and positive, or
    /// when `num_channels` is zero.
    pub fn new(sample_rate: f32, num_channels: usize) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(GridError::InvalidSampleRate { rate: sample_rate });
        }
        if num_channels == 0 {
            return Err(GridError::NoChannels);
        }
        Ok(Self {
            arena: NodeArena::new(),
            head: None,
            sample_rate,
            num_channels,
            num_samples: 0,
        })
    }

    /// Build a grid from per-column frames
    ///
    /// Convenience constructor; every frame must have `num_channels`
    /// values.
    pub fn from_frames(
        sample_rate: f32,
        num_channels: usize,
        frames: &[Vec<f32>],
    ) -> Result<Self> {
        let mut grid = Self::new(sample_rate, num_channels)?;
        for frame in frames {
            grid.push_frame(frame)?;
        }
        Ok(grid)
    }

    // ------------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------------

    /// Number of channels
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Number of time-columns
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Check if the grid holds no columns
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Duration in seconds (`num_samples / sample_rate`)
    #[inline]
    pub fn duration(&self) -> f32 {
        self.num_samples as f32 / self.sample_rate
    }

    /// Number of live nodes in the backing arena
    ///
    /// Diagnostic accessor: after clip or make_mono this equals
    /// `num_samples * num_channels`, confirming detached sub-graphs were
    /// actually released and not retained.
    pub fn live_nodes(&self) -> usize {
        self.arena.live_nodes()
    }

    // ------------------------------------------------------------------------
    // Append
    // ------------------------------------------------------------------------

    /// Append one sample to a single-channel grid
    ///
    /// # Errors
    /// Returns [`GridError::NotSingleChannel`] when the grid has more than
    /// one channel; use [`push_frame`](Self::push_frame) instead.
    pub fn push_sample(&mut self, sample: f32) -> Result<()> {
        if self.num_channels != 1 {
            return Err(GridError::NotSingleChannel {
                channels: self.num_channels,
            });
        }
        self.push_frame(&[sample])
    }

    /// Append one time-column from a frame of channel values
    ///
    /// The frame's values become one new column, inter-linked via
    /// next-channel and attached after the current tail for every channel
    /// row in parallel. Tail location is a linear scan from the head.
    ///
    /// # Errors
    /// Returns [`GridError::FrameLengthMismatch`] when `frame.len()` is not
    /// the grid's channel count.
    pub fn push_frame(&mut self, frame: &[f32]) -> Result<()> {
        if frame.len() != self.num_channels {
            return Err(GridError::FrameLengthMismatch {
                expected: self.num_channels,
                got: frame.len(),
            });
        }
        let column = self.arena.alloc_column(frame);
        match self.tail_column() {
            Some(tail) => self.link_columns(tail, column),
            None => self.head = Some(column),
        }
        self.num_samples += 1;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Internal structure helpers
    // ------------------------------------------------------------------------

    pub(crate) fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub(crate) fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    pub(crate) fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub(crate) fn set_head(&mut self, head: Option<NodeId>) {
        self.head = head;
    }

    pub(crate) fn set_sample_rate_raw(&mut self, rate: f32) {
        self.sample_rate = rate;
    }

    pub(crate) fn set_num_channels_raw(&mut self, channels: usize) {
        self.num_channels = channels;
    }

    pub(crate) fn set_num_samples_raw(&mut self, samples: usize) {
        self.num_samples = samples;
    }

    /// Channel-0 node of the last column, or `None` when empty
    pub(crate) fn tail_column(&self) -> Option<NodeId> {
        let mut tail = self.head?;
        while let Some(next) = self.arena.next_time(tail) {
            tail = next;
        }
        Some(tail)
    }

    /// Point every row of column `from` at the matching row of column `to`
    ///
    /// Both arguments are channel-0 nodes; the rows are walked in
    /// next-channel lockstep so columns never skew.
    pub(crate) fn link_columns(&mut self, from: NodeId, to: NodeId) {
        let mut f = Some(from);
        let mut t = Some(to);
        while let (Some(fi), Some(ti)) = (f, t) {
            self.arena.set_next_time(fi, Some(ti));
            f = self.arena.next_channel(fi);
            t = self.arena.next_channel(ti);
        }
    }

    /// Set every row of a column's next-in-time to absent
    pub(crate) fn detach_column_tail(&mut self, column: NodeId) {
        let mut row = Some(column);
        while let Some(id) = row {
            self.arena.set_next_time(id, None);
            row = self.arena.next_channel(id);
        }
    }

    /// Collect one column's channel values into `out`
    pub(crate) fn read_column(&self, column: NodeId, out: &mut Vec<f32>) {
        out.clear();
        let mut row = Some(column);
        while let Some(id) = row {
            out.push(self.arena.value(id));
            row = self.arena.next_channel(id);
        }
    }
}

// ============================================================================
// Deep duplication
// ============================================================================

impl Clone for SampleGrid {
    /// Deep clone: an entirely disjoint node set with the same topology,
    /// values and metadata, rebuilt into a compact arena.
    fn clone(&self) -> Self {
        let mut dup = Self {
            arena: NodeArena::new(),
            head: None,
            sample_rate: self.sample_rate,
            num_channels: self.num_channels,
            num_samples: self.num_samples,
        };

        let mut frame = Vec::with_capacity(self.num_channels);
        let mut prev: Option<NodeId> = None;
        let mut col = self.head;
        while let Some(src) = col {
            self.read_column(src, &mut frame);
            let column = dup.arena.alloc_column(&frame);
            match prev {
                Some(p) => dup.link_columns(p, column),
                None => dup.head = Some(column),
            }
            prev = Some(column);
            col = self.arena.next_time(src);
        }

        debug!(
            "[GRID] Cloned {} columns x {} channels",
            dup.num_samples, dup.num_channels
        );
        dup
    }
}

// ============================================================================
// Tests
// ============================================================================
