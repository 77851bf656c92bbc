use log::error;
use snafu::Snafu;

pub use crate::errors::Error::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Runtime error: Are you sure your code runs inside #[progress_ring::runtime]?
    RuntimeError,
    /// Configuration error: {source}.
    ConfigError { source: ConfigError },
    /// Render error: {source}.
    RenderError { source: RenderError },
    /// Unknown error: {info}.
    Unknown { info: String },
}

impl From<ConfigError> for Error {
    fn from(value: ConfigError) -> Self {
        Self::ConfigError { source: value }
    }
}

impl From<RenderError> for Error {
    fn from(value: RenderError) -> Self {
        error!("Render failure: {}", value);
        Self::RenderError { source: value }
    }
}

impl From<std::fmt::Error> for Error {
    fn from(value: std::fmt::Error) -> Self {
        Self::Unknown {
            info: value.to_string(),
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Duration must be a finite number of seconds greater than zero (found: {value})
    InvalidDuration { value: f64 },
    /// Frame rate must be greater than zero
    InvalidFrameRate,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RenderError {
    /// Renderer '{renderer}' failed - {info}
    RendererFailure { renderer: String, info: String },
}
