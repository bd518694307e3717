//! Errors for stream configuration.
//!
//! Contract violations on the processing path (wrong frame sizes, mismatched
//! buffers) panic instead; only configuration is recoverable.

use thiserror::Error;

/// Result alias for fallible band-split operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The rate is not one of 8, 16, 32 or 48 kHz.
    #[error("unsupported sample rate: {0} Hz")]
    BadSampleRate(usize),

    #[error("bad number of channels: {0}")]
    BadNumberChannels(usize),
}
