use std::fmt::{Display, Formatter};

/// Error type for loading audio, resolving views and rendering envelopes.
#[derive(Debug)]
pub enum WaveformError {
    Io(std::io::Error),
    Decode(String),
    InvalidRange(String),
    UnsupportedFormat(String),
    Render(String),
    Serialize(serde_json::Error),
}

impl Display for WaveformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Decode(err) => write!(f, "decode error: {}", err),
            Self::InvalidRange(err) => write!(f, "invalid range: {}", err),
            Self::UnsupportedFormat(err) => write!(f, "unsupported format: {}", err),
            Self::Render(err) => write!(f, "render error: {}", err),
            Self::Serialize(err) => write!(f, "serialize error: {}", err),
        }
    }
}

impl std::error::Error for WaveformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WaveformError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for WaveformError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<symphonia::core::errors::Error> for WaveformError {
    fn from(value: symphonia::core::errors::Error) -> Self {
        match value {
            symphonia::core::errors::Error::IoError(err) => Self::Io(err),
            other => Self::Decode(other.to_string()),
        }
    }
}
