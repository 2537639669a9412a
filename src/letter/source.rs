use crate::error::LetterError;
use rust_embed::RustEmbed;
use std::fs;
use std::io;

#[derive(RustEmbed)]
#[folder = "resources/"]
struct Asset;

pub const EMBEDDED_LETTER: &str = "letter.txt";

/// Where the letter text comes from.
pub trait ContentSource {
    fn fetch_text(&self, location: &str) -> Result<String, LetterError>;
}

/// Letters bundled into the binary under `resources/`.
pub struct EmbeddedSource;

impl ContentSource for EmbeddedSource {
    fn fetch_text(&self, location: &str) -> Result<String, LetterError> {
        let file = Asset::get(location).ok_or_else(|| {
            LetterError::load(
                location,
                io::Error::new(io::ErrorKind::NotFound, "no such embedded letter"),
            )
        })?;
        let text = std::str::from_utf8(file.data.as_ref())
            .map_err(|e| LetterError::load(location, io::Error::new(io::ErrorKind::InvalidData, e)))?;
        Ok(text.to_string())
    }
}

/// Letters read from the local filesystem.
pub struct FileSource;

impl ContentSource for FileSource {
    fn fetch_text(&self, location: &str) -> Result<String, LetterError> {
        fs::read_to_string(location).map_err(|e| LetterError::load(location, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_letter_is_bundled() {
        let text = EmbeddedSource.fetch_text(EMBEDDED_LETTER).unwrap();
        assert!(text.contains("I choose you."));
    }

    #[test]
    fn missing_embedded_letter_is_a_load_failure() {
        let err = EmbeddedSource.fetch_text("nope.txt").unwrap_err();
        assert!(matches!(err, LetterError::ContentLoad { .. }));
    }

    #[test]
    fn file_source_reads_and_reports_failures() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Dear you.\n\nLove, me.").unwrap();
        let path = file.path().to_string_lossy().into_owned();
        assert_eq!(FileSource.fetch_text(&path).unwrap(), "Dear you.\n\nLove, me.");

        let err = FileSource.fetch_text("/definitely/not/here.txt").unwrap_err();
        assert_eq!(err.unavailable_message(), "Could not load the letter.");
    }
}
