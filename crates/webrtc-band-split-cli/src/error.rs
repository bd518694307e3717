use thiserror::Error;

pub type Result<T, E = CliError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("wav: {0}")]
    Wav(#[from] hound::Error),

    /// Only 16-bit integer PCM is accepted.
    #[error("unsupported WAV format: {bits_per_sample}-bit {sample_format:?}")]
    UnsupportedFormat {
        bits_per_sample: u16,
        sample_format: hound::SampleFormat,
    },

    #[error(transparent)]
    Config(#[from] webrtc_band_split::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
