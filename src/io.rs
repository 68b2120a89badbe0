//! Reading words and writing Morse output

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

fn parse_words(data: &str) -> Vec<String> {
    data.split_whitespace().map(str::to_string).collect()
}

/// Read every whitespace-separated word from `reader`
pub fn read_words<R: Read>(mut reader: R) -> std::io::Result<Vec<String>> {
    let mut data = String::new();
    reader.read_to_string(&mut data)?;
    Ok(parse_words(&data))
}

/// Read the words of the file at `path`
///
/// Fails with [`Error::Io`] if the file does not exist, cannot be read or
/// is not valid UTF-8.
pub fn read_words_from_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let words = parse_words(&data);
    log::debug!("Read {} words from {}", words.len(), path.display());
    Ok(words)
}

/// Read words from standard input until EOF
pub fn read_words_from_stdin() -> Result<Vec<String>> {
    read_words(std::io::stdin().lock()).map_err(Error::Stdin)
}

/// Write `data` to `path`, replacing any existing contents
pub fn write_to_file(data: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, data).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
