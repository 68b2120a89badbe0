//! Error type shared by the audio core, the translator and the I/O helpers

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while translating or playing Morse code
#[derive(Error, Debug)]
pub enum Error {
    /// The audio subsystem could not be initialized or the stream could not be opened
    #[error("failed to initialize audio: {0}")]
    AudioInit(String),

    /// A frequency or duration that is not strictly positive
    #[error("{0}")]
    InvalidConfig(String),

    #[error("'{}' cannot be opened: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read standard input: {0}")]
    Stdin(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
