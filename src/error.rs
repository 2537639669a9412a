use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LetterError {
    #[error("could not load the letter from `{location}`")]
    ContentLoad {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error("no content found")]
    EmptyContent,
}

impl LetterError {
    pub fn load(location: impl Into<String>, source: io::Error) -> Self {
        Self::ContentLoad {
            location: location.into(),
            source,
        }
    }

    /// Text shown in place of the letter when start-up cannot continue.
    pub fn unavailable_message(&self) -> &'static str {
        match self {
            Self::ContentLoad { .. } => "Could not load the letter.",
            Self::EmptyContent => "No content found.",
        }
    }
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference file io failed")]
    Io(#[from] io::Error),

    #[error("preference file could not be encoded")]
    Encode(#[from] serde_json::Error),
}
