//! Mixing: downmix-to-mono and additive combine
//!
//! Both share the two-pass clip-or-rescale policy. Pass 1 sums values and
//! either clamps immediately (`allow_clipping`) or tracks whether anything
//! left the nominal range together with the running extrema, seeded at the
//! range edges. Pass 2, only when needed, divides positive values by the
//! tracked maximum and negative values by the negated minimum; exact zeros
//! stay untouched, so the whole signal comes back into range without hard
//! clipping individual samples.
//!
//! The pass-2 row span differs between the two operations on purpose:
//! make_mono rescans the single surviving channel, combine rescans this
//! grid's full channel span. The asymmetry is deliberate; do not unify the
//! two spans without auditing every caller of both operations.

use super::{SampleGrid, SAMPLE_MAX, SAMPLE_MIN};
use log::{debug, trace};

/// Running extrema for the rescale pass, seeded at the nominal range edges
struct RangeTracker {
    out_of_range: bool,
    max: f32,
    min: f32,
}

impl RangeTracker {
    fn new() -> Self {
        Self {
            out_of_range: false,
            max: SAMPLE_MAX,
            min: SAMPLE_MIN,
        }
    }

    fn observe(&mut self, value: f32) {
        if value > SAMPLE_MAX || value < SAMPLE_MIN {
            self.out_of_range = true;
        }
        if value > self.max {
            self.max = value;
        }
        if value < self.min {
            self.min = value;
        }
    }
}

impl SampleGrid {
    // ------------------------------------------------------------------------
    // make_mono
    // ------------------------------------------------------------------------

    /// Downmix all channels into channel 0 by summation
    ///
    /// Per column, every row's value is summed into the channel-0 node and
    /// the remaining row nodes are unlinked and released. With
    /// `allow_clipping` the sum is clamped to the nominal range
    /// immediately; otherwise, if any column's sum left the range, a second
    /// pass rescales the whole signal by the tracked extrema. The channel
    /// count becomes 1. No-op when already mono or empty.
    pub fn make_mono(&mut self, allow_clipping: bool) {
        if self.num_channels() == 1 || self.is_empty() {
            return;
        }
        let channels = self.num_channels();
        let mut tracker = RangeTracker::new();

        let mut col = self.head();
        while let Some(c) = col {
            let mut sum = self.arena().value(c);
            let rest = self.arena().next_channel(c);
            let mut row = rest;
            while let Some(r) = row {
                sum += self.arena().value(r);
                row = self.arena().next_channel(r);
            }
            if allow_clipping {
                sum = sum.clamp(SAMPLE_MIN, SAMPLE_MAX);
            } else {
                tracker.observe(sum);
            }
            self.arena_mut().set_value(c, sum);

            // Discard the other channel rows of this column
            self.arena_mut().set_next_channel(c, None);
            if let Some(rest) = rest {
                self.arena_mut().release_column(rest);
            }
            col = self.arena().next_time(c);
        }

        if !allow_clipping && tracker.out_of_range {
            trace!(
                "[GRID] Mono rescale: max {} min {}",
                tracker.max,
                tracker.min
            );
            self.rescale_rows(tracker.max, tracker.min, 1);
        }
        self.set_num_channels_raw(1);
        debug!(
            "[GRID] Downmixed {} channels to mono ({} columns)",
            channels,
            self.num_samples()
        );
    }

    // ------------------------------------------------------------------------
    // combine
    // ------------------------------------------------------------------------

    /// Add another grid's values into this one, column by column
    ///
    /// Walks both grids in lockstep and stops when either runs out, so the
    /// merge covers `min(self, other)` columns. Per aligned column, other's
    /// values are added into this grid's rows for
    /// `min(self channels, frame length)` rows. The clip-or-rescale policy
    /// matches [`make_mono`](Self::make_mono), except that the rescale pass
    /// covers this grid's own channel span. No-op when this grid is empty.
    pub fn combine(&mut self, other: &SampleGrid, allow_clipping: bool) {
        if self.is_empty() {
            return;
        }
        let mut tracker = RangeTracker::new();
        let mut merged = 0_usize;

        let mut col = self.head();
        let mut frames = other.columns();
        while let Some(c) = col {
            let Some(frame) = frames.next() else { break };
            let mut row = Some(c);
            for &add in frame.iter() {
                let Some(r) = row else { break };
                let mut sum = self.arena().value(r) + add;
                if allow_clipping {
                    sum = sum.clamp(SAMPLE_MIN, SAMPLE_MAX);
                } else {
                    tracker.observe(sum);
                }
                self.arena_mut().set_value(r, sum);
                row = self.arena().next_channel(r);
            }
            merged += 1;
            col = self.arena().next_time(c);
        }

        if !allow_clipping && tracker.out_of_range {
            trace!(
                "[GRID] Combine rescale: max {} min {}",
                tracker.max,
                tracker.min
            );
            self.rescale_rows(tracker.max, tracker.min, self.num_channels());
        }
        debug!(
            "[GRID] Combined {} columns from a {}-column grid",
            merged,
            other.num_samples()
        );
    }

    // ------------------------------------------------------------------------
    // Shared rescale pass
    // ------------------------------------------------------------------------

    /// Divide out-of-range signals back into the nominal range
    ///
    /// Walks every column, covering the first `rows` channel rows of each:
    /// values above zero are divided by `max`, values below zero by `-min`,
    /// exact zeros are left alone.
    fn rescale_rows(&mut self, max: f32, min: f32, rows: usize) {
        let mut col = self.head();
        while let Some(c) = col {
            let mut row = Some(c);
            for _ in 0..rows {
                let Some(r) = row else { break };
                let value = self.arena().value(r);
                if value > 0.0 {
                    self.arena_mut().set_value(r, value / max);
                } else if value < 0.0 {
                    self.arena_mut().set_value(r, value / -min);
                }
                row = self.arena().next_channel(r);
            }
            col = self.arena().next_time(c);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
