use thiserror::Error;

pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';

/// Error type for chunk conversion operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The provided output buffer was too small.
    ///
    /// `required` is the number of bytes necessary to hold the worst-case
    /// expansion of the input for the target format.
    #[error("output buffer is too small; required {required} bytes")]
    OutputBufferTooSmall { required: usize },
}

impl Error {
    #[must_use]
    pub fn required_size(&self) -> usize {
        match self {
            Error::OutputBufferTooSmall { required } => *required,
        }
    }
}

/// Result type alias for chunk conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
