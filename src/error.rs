use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubtransError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("'{0}' is not a file.")]
    FileNotFound(String),

    #[error("'{0}' is not in the list of supported languages.")]
    UnsupportedLanguage(String),

    #[error("'{0}' is not the path of srt file or folder.")]
    InvalidPath(String),

    #[error("You can not keep both source & destination language without a destination language.")]
    MissingDestinationLanguage,
}

impl SubtransError {
    /// Errors caused by user input, reported before any file is touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_)
                | Self::UnsupportedLanguage(_)
                | Self::InvalidPath(_)
                | Self::MissingDestinationLanguage
        )
    }
}

pub type Result<T> = std::result::Result<T, SubtransError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_classified() {
        assert!(SubtransError::UnsupportedLanguage("xx".into()).is_validation());
        assert!(SubtransError::InvalidPath("a.txt".into()).is_validation());
        assert!(SubtransError::MissingDestinationLanguage.is_validation());
        assert!(!SubtransError::Translation("boom".into()).is_validation());
        assert!(!SubtransError::Media("ffmpeg".into()).is_validation());
    }

    #[test]
    fn test_unsupported_language_message() {
        let err = SubtransError::UnsupportedLanguage("xx".into());
        assert_eq!(err.to_string(), "'xx' is not in the list of supported languages.");
    }
}
