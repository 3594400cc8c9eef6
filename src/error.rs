//! Error handling for soundgrid
//!
//! Every fallible grid operation returns [`Result`]; structural edits on an
//! empty grid are deliberate no-ops rather than errors.

use thiserror::Error;

/// Result type alias for soundgrid operations
pub type Result<T> = std::result::Result<T, GridError>;

/// Main error type for grid operations
#[derive(Error, Debug)]
pub enum GridError {
    /// Scalar append called on a grid with more than one channel
    #[error("Grid is not single channel ({channels} channels); use push_frame")]
    NotSingleChannel { channels: usize },

    /// Frame append with the wrong number of channel values
    #[error("Frame has {got} values but the grid has {expected} channels")]
    FrameLengthMismatch { expected: usize, got: usize },

    /// Two grids with incompatible channel layouts in splice/combine
    #[error("Channel count mismatch: this grid has {this}, other has {other}")]
    ChannelCountMismatch { this: usize, other: usize },

    /// Channel index past the last channel
    #[error("Channel index {channel} out of range (grid has {channels} channels)")]
    ChannelOutOfRange { channel: usize, channels: usize },

    /// Zero, negative, NaN or infinite sample rate
    #[error("Invalid sample rate: {rate} Hz (must be finite and positive)")]
    InvalidSampleRate { rate: f32 },

    /// Grid constructed with zero channels
    #[error("Grid must have at least one channel")]
    NoChannels,

    /// Negative, NaN or infinite time or duration argument
    #[error("Invalid {what}: {value} (must be finite and non-negative)")]
    InvalidTime { what: &'static str, value: f32 },

    /// Echo amount outside [0, 1]
    #[error("Echo percent {percent} out of range [0, 1]")]
    InvalidEchoPercent { percent: f32 },
}
