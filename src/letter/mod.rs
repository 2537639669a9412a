pub mod segmenter;
pub mod source;
pub mod timing;

pub use source::{ContentSource, EmbeddedSource, FileSource};
pub use timing::SpeedFactor;

use crate::error::LetterError;
use crate::models::SegmenterKind;

/// A loaded letter: its paragraphs for the full-text view and the flattened
/// sentence sequence the playback walks through. Never empty.
#[derive(Debug, Clone)]
pub struct Letter {
    paragraphs: Vec<String>,
    sentences: Vec<String>,
}

impl Letter {
    pub fn parse(text: &str, kind: SegmenterKind) -> Result<Self, LetterError> {
        let paragraphs = segmenter::paragraphs(text);
        let sentences = segmenter::sentences_of(&paragraphs, kind);
        if sentences.is_empty() {
            return Err(LetterError::EmptyContent);
        }
        Ok(Self {
            paragraphs,
            sentences,
        })
    }

    pub fn load(
        source: &dyn ContentSource,
        location: &str,
        kind: SegmenterKind,
    ) -> Result<Self, LetterError> {
        let text = source.fetch_text(location)?;
        let letter = Self::parse(&text, kind)?;
        tracing::info!(
            location,
            paragraphs = letter.paragraphs.len(),
            sentences = letter.sentences.len(),
            "letter loaded"
        );
        Ok(letter)
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }
}
