//! Structural editing
//!
//! Reverse, clip and splice work by relinking columns, never by copying
//! sample data between nodes; only change_sample_rate rebuilds columns,
//! because resampling changes how many there are. Every operation here is
//! a deliberate no-op on an empty grid.

use super::arena::NodeId;
use super::SampleGrid;
use crate::error::{GridError, Result};
use log::debug;

/// Reject negative, NaN or infinite time arguments
fn validate_time(what: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(GridError::InvalidTime { what, value });
    }
    Ok(())
}

impl SampleGrid {
    // ------------------------------------------------------------------------
    // reverse
    // ------------------------------------------------------------------------

    /// Reverse the time order of all columns in place
    ///
    /// Walks a lagging/leading column pair from head to tail, redirecting
    /// each column's next-in-time links back to the previous column. A
    /// column is relinked as a unit across all channel rows, so columns
    /// never skew. The former head column becomes the new terminal column.
    pub fn reverse(&mut self) {
        let Some(head) = self.head() else {
            return;
        };
        let mut current = self.arena().next_time(head);

        // The old head is the new tail: null its next-in-time on every row
        self.detach_column_tail(head);

        let mut prev = head;
        while let Some(cur) = current {
            let next = self.arena().next_time(cur);
            self.link_columns(cur, prev);
            prev = cur;
            if next.is_none() {
                self.set_head(Some(cur));
            }
            current = next;
        }
        debug!("[GRID] Reversed {} columns", self.num_samples());
    }

    // ------------------------------------------------------------------------
    // change_speed
    // ------------------------------------------------------------------------

    /// Multiply the sample rate by `percent_change` without touching data
    ///
    /// A metadata-only playback-speed change: reported duration shifts,
    /// pitch shifts with it. Not a time-stretch.
    ///
    /// # Errors
    /// Returns an error when the resulting rate would not be finite and
    /// positive.
    pub fn change_speed(&mut self, percent_change: f32) -> Result<()> {
        let new_rate = self.sample_rate() * percent_change;
        if !new_rate.is_finite() || new_rate <= 0.0 {
            return Err(GridError::InvalidSampleRate { rate: new_rate });
        }
        self.set_sample_rate_raw(new_rate);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // change_sample_rate
    // ------------------------------------------------------------------------

    /// Resample the grid to a new rate, preserving duration
    ///
    /// Rebuilds the columns at `round(num_samples * new_rate / old_rate)`
    /// instants (at least 1 for a non-empty grid), linearly interpolating
    /// between neighboring source columns per channel. This is a plain
    /// linear resample, not a band-limited converter; it exists so
    /// [`splice_in`](Self::splice_in) can reconcile mismatched rates.
    /// On an empty grid only the rate field changes.
    ///
    /// # Errors
    /// Returns an error when `new_rate` is not finite and positive.
    pub fn change_sample_rate(&mut self, new_rate: f32) -> Result<()> {
        if !new_rate.is_finite() || new_rate <= 0.0 {
            return Err(GridError::InvalidSampleRate { rate: new_rate });
        }
        let old_rate = self.sample_rate();
        if self.is_empty() || new_rate == old_rate {
            self.set_sample_rate_raw(new_rate);
            return Ok(());
        }

        let frames: Vec<Vec<f32>> = self.columns().collect();
        let old_len = frames.len();
        let new_len = ((old_len as f64) * f64::from(new_rate) / f64::from(old_rate))
            .round()
            .max(1.0) as usize;
        let step = f64::from(old_rate) / f64::from(new_rate);
        let channels = self.num_channels();

        self.arena_mut().clear();
        self.set_head(None);

        let mut frame = vec![0.0_f32; channels];
        let mut prev: Option<NodeId> = None;
        for i in 0..new_len {
            let pos = i as f64 * step;
            let lo = (pos.floor() as usize).min(old_len - 1);
            let hi = (lo + 1).min(old_len - 1);
            let frac = (pos - lo as f64) as f32;
            for (ch, slot) in frame.iter_mut().enumerate() {
                let a = frames[lo][ch];
                let b = frames[hi][ch];
                *slot = a + (b - a) * frac;
            }
            let column = self.arena_mut().alloc_column(&frame);
            match prev {
                Some(p) => self.link_columns(p, column),
                None => self.set_head(Some(column)),
            }
            prev = Some(column);
        }

        self.set_num_samples_raw(new_len);
        self.set_sample_rate_raw(new_rate);
        debug!(
            "[GRID] Resampled {} -> {} columns ({} Hz -> {} Hz)",
            old_len, new_len, old_rate, new_rate
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // clip
    // ------------------------------------------------------------------------

    /// Clip the grid to a sub-range in place
    ///
    /// The new head is the first column whose start time `index / rate`
    /// reaches `start_time`; scanning on from there, the tail is cut at the
    /// first column whose end time `(index + 1) / rate` reaches `duration`.
    /// If no column meets the tail condition the grid runs to its natural
    /// end. Detached prefix and suffix nodes are released back to the
    /// arena. No-op on an empty grid.
    ///
    /// # Errors
    /// Returns an error for negative or non-finite arguments.
    pub fn clip(&mut self, start_time: f32, duration: f32) -> Result<()> {
        validate_time("start time", start_time)?;
        validate_time("duration", duration)?;
        let Some(head) = self.head() else {
            return Ok(());
        };
        let rate = self.sample_rate();
        let before = self.num_samples();

        // Drop columns before the start time
        let mut col = Some(head);
        let mut index = 0_usize;
        let mut new_head = None;
        while let Some(c) = col {
            if index as f32 / rate >= start_time {
                new_head = Some(c);
                break;
            }
            col = self.arena().next_time(c);
            self.arena_mut().release_column(c);
            index += 1;
        }
        let Some(new_head) = new_head else {
            // Start time past the last column: nothing retained
            self.set_head(None);
            self.set_num_samples_raw(0);
            debug!("[GRID] Clip past end, dropped all {} columns", before);
            return Ok(());
        };
        self.set_head(Some(new_head));

        // Truncate once a column's end time reaches the duration
        let mut col = Some(new_head);
        let mut retained = 0_usize;
        while let Some(c) = col {
            let next = self.arena().next_time(c);
            retained += 1;
            if retained as f32 / rate >= duration {
                self.detach_column_tail(c);
                if let Some(suffix) = next {
                    self.arena_mut().release_run(suffix);
                }
                break;
            }
            col = next;
        }

        self.set_num_samples_raw(retained);
        debug!(
            "[GRID] Clipped at {}s for {}s: {} -> {} columns",
            start_time, duration, before, retained
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // splice_in
    // ------------------------------------------------------------------------

    /// Splice another grid's columns in after `start_splice_time`
    ///
    /// The cut column is the first whose start time reaches
    /// `start_splice_time` (clamped to the tail when the time lies past the
    /// end). Its successor run is saved, the cut column is detached on
    /// every row, `other`'s columns are appended at the cut, and the saved
    /// remainder is re-attached after the last appended column with the
    /// rows matched in next-channel lockstep. Nothing is replaced; the
    /// final sample count is the sum of both counts. No-op when this grid
    /// is empty.
    ///
    /// When the rates differ, `other` is resampled in place to this grid's
    /// rate first — hence the `&mut`; a resample failure propagates.
    ///
    /// # Errors
    /// Returns an error for a negative or non-finite splice time, or when
    /// the channel counts differ.
    pub fn splice_in(&mut self, start_splice_time: f32, other: &mut SampleGrid) -> Result<()> {
        validate_time("splice time", start_splice_time)?;
        let Some(head) = self.head() else {
            return Ok(());
        };
        if self.num_channels() != other.num_channels() {
            return Err(GridError::ChannelCountMismatch {
                this: self.num_channels(),
                other: other.num_channels(),
            });
        }
        if other.sample_rate() != self.sample_rate() {
            other.change_sample_rate(self.sample_rate())?;
        }
        let original = self.num_samples();
        let rate = self.sample_rate();

        // Cut at the first column whose start time reaches the splice time
        let mut cut = head;
        let mut index = 0_usize;
        while (index as f32 / rate) < start_splice_time {
            match self.arena().next_time(cut) {
                Some(next) => {
                    cut = next;
                    index += 1;
                }
                None => break,
            }
        }

        let remainder = self.arena().next_time(cut);
        self.detach_column_tail(cut);

        let mut cursor = cut;
        for frame in other.columns() {
            let column = self.arena_mut().alloc_column(&frame);
            self.link_columns(cursor, column);
            cursor = column;
        }

        if let Some(rem) = remainder {
            self.link_columns(cursor, rem);
        }

        self.set_num_samples_raw(original + other.num_samples());
        debug!(
            "[GRID] Spliced {} columns in at {}s ({} total)",
            other.num_samples(),
            start_splice_time,
            self.num_samples()
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // add_echo
    // ------------------------------------------------------------------------

    /// Mix a delayed, attenuated copy of the signal back into itself
    ///
    /// Every column at time `t >= delay` gains `percent` times the original
    /// (pre-echo) value from `delay` seconds earlier, per channel row,
    /// clamped to the nominal range. The grid's length never changes; a
    /// delay of zero columns, or longer than the grid, is a no-op.
    ///
    /// # Errors
    /// Returns an error for a negative or non-finite delay, or a `percent`
    /// outside `[0, 1]`.
    pub fn add_echo(&mut self, delay: f32, percent: f32) -> Result<()> {
        validate_time("echo delay", delay)?;
        if !percent.is_finite() || !(0.0..=1.0).contains(&percent) {
            return Err(GridError::InvalidEchoPercent { percent });
        }
        if self.is_empty() {
            return Ok(());
        }
        let offset = (delay * self.sample_rate()).round() as usize;
        if offset == 0 || offset >= self.num_samples() {
            return Ok(());
        }

        // Snapshot first: echoes feed on the dry signal, not on each other
        let frames: Vec<Vec<f32>> = self.columns().collect();

        let mut col = self.head();
        let mut t = 0_usize;
        while let Some(c) = col {
            if t >= offset {
                let source = &frames[t - offset];
                let mut row = Some(c);
                for &dry in source.iter() {
                    let Some(r) = row else { break };
                    let wet = (self.arena().value(r) + percent * dry)
                        .clamp(super::SAMPLE_MIN, super::SAMPLE_MAX);
                    self.arena_mut().set_value(r, wet);
                    row = self.arena().next_channel(r);
                }
            }
            col = self.arena().next_time(c);
            t += 1;
        }
        debug!(
            "[GRID] Echo: {}s delay ({} columns) at {}",
            delay, offset, percent
        );
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
