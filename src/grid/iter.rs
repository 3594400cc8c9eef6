//! Grid traversal
//!
//! Both iterators borrow the grid, so the borrow checker rejects any
//! attempt to edit the structure while a traversal is alive. Exhaustion
//! follows the std `Iterator` contract: `next()` returns `None` past the
//! last element.
//!
//! Both yield exactly `num_samples` elements, including the final column:
//! the cursor is advanced after yielding, never probed for a successor
//! first, so the last column cannot be silently dropped.

use super::arena::NodeId;
use super::SampleGrid;
use crate::error::{GridError, Result};

/// Iterator over time-columns, yielding one channel-vector per column
pub struct Columns<'a> {
    grid: &'a SampleGrid,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for Columns<'a> {
    type Item = Vec<f32>;

    fn next(&mut self) -> Option<Self::Item> {
        let column = self.cursor?;
        let mut frame = Vec::with_capacity(self.grid.num_channels());
        let mut row = Some(column);
        while let Some(id) = row {
            frame.push(self.grid.arena().value(id));
            row = self.grid.arena().next_channel(id);
        }
        self.cursor = self.grid.arena().next_time(column);
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.cursor {
            Some(_) => (1, Some(self.grid.num_samples())),
            None => (0, Some(0)),
        }
    }
}

/// Iterator over one channel's scalar samples in time order
pub struct ChannelSamples<'a> {
    grid: &'a SampleGrid,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for ChannelSamples<'a> {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor?;
        let sample = self.grid.arena().value(node);
        self.cursor = self.grid.arena().next_time(node);
        Some(sample)
    }
}

impl SampleGrid {
    /// Iterate the grid's columns in time order
    ///
    /// Yields exactly [`num_samples`](Self::num_samples) frames, each of
    /// length [`num_channels`](Self::num_channels). Restart by calling
    /// again.
    pub fn columns(&self) -> Columns<'_> {
        Columns {
            grid: self,
            cursor: self.head(),
        }
    }

    /// Iterate one channel's samples in time order
    ///
    /// The first node of the channel is located by following next-channel
    /// `channel` times from the head.
    ///
    /// # Errors
    /// Returns [`GridError::ChannelOutOfRange`] when `channel` is not a
    /// valid channel index.
    pub fn channel_samples(&self, channel: usize) -> Result<ChannelSamples<'_>> {
        if channel >= self.num_channels() {
            return Err(GridError::ChannelOutOfRange {
                channel,
                channels: self.num_channels(),
            });
        }
        let mut start = self.head();
        for _ in 0..channel {
            start = start.and_then(|id| self.arena().next_channel(id));
        }
        Ok(ChannelSamples {
            grid: self,
            cursor: start,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo_grid() -> SampleGrid {
        SampleGrid::from_frames(
            4.0,
            2,
            &[vec![0.1, -0.1], vec![0.2, -0.2], vec![0.3, -0.3]],
        )
        .unwrap()
    }

    #[test]
    fn columns_yields_every_column_including_last() {
        // Probing for a successor before yielding would drop the final
        // column; the count must always come out at num_samples.
        let grid = stereo_grid();
        let frames: Vec<Vec<f32>> = grid.columns().collect();
        assert_eq!(frames.len(), grid.num_samples());
        assert_eq!(frames[2], vec![0.3, -0.3]);
    }

    #[test]
    fn test_columns_time_order() {
        let grid = stereo_grid();
        let frames: Vec<Vec<f32>> = grid.columns().collect();
        assert_eq!(
            frames,
            vec![vec![0.1, -0.1], vec![0.2, -0.2], vec![0.3, -0.3]]
        );
    }

    #[test]
    fn test_columns_exhaustion_returns_none() {
        let grid = stereo_grid();
        let mut it = grid.columns();
        for _ in 0..3 {
            assert!(it.next().is_some());
        }
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_columns_restartable() {
        let grid = stereo_grid();
        let first: Vec<Vec<f32>> = grid.columns().collect();
        let second: Vec<Vec<f32>> = grid.columns().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_columns_empty_grid() {
        let grid = SampleGrid::new(4.0, 2).unwrap();
        assert_eq!(grid.columns().count(), 0);
    }

    #[test]
    fn test_channel_samples_each_channel() {
        let grid = stereo_grid();
        let left: Vec<f32> = grid.channel_samples(0).unwrap().collect();
        let right: Vec<f32> = grid.channel_samples(1).unwrap().collect();
        assert_eq!(left, vec![0.1, 0.2, 0.3]);
        assert_eq!(right, vec![-0.1, -0.2, -0.3]);
    }

    #[test]
    fn test_channel_samples_yields_num_samples() {
        let grid = stereo_grid();
        assert_eq!(grid.channel_samples(1).unwrap().count(), grid.num_samples());
    }

    #[test]
    fn test_channel_samples_out_of_range() {
        let grid = stereo_grid();
        assert!(matches!(
            grid.channel_samples(2),
            Err(GridError::ChannelOutOfRange {
                channel: 2,
                channels: 2
            })
        ));
    }

    #[test]
    fn test_channel_samples_empty_grid() {
        let grid = SampleGrid::new(4.0, 2).unwrap();
        assert_eq!(grid.channel_samples(1).unwrap().count(), 0);
    }
}
