use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Which stage of a request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Resolution,
    Transcript,
    Summarization,
}

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Could not extract video ID from URL.")]
    NoVideoId,

    #[error("Transcripts are disabled for this video.")]
    TranscriptsDisabled,

    #[error("No available transcripts found for this video.")]
    NoTranscriptFound,

    #[error("Video is unavailable: {0}")]
    VideoUnavailable(String),

    #[error("Error while extracting transcript: {0}")]
    Caption(String),

    #[error("Error during summarization: {0}")]
    Summarize(String),
}

impl Error {
    pub fn caption(msg: impl Into<String>) -> Self {
        Self::Caption(msg.into())
    }

    pub fn summarize(msg: impl Into<String>) -> Self {
        Self::Summarize(msg.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::NoVideoId => ErrorCategory::Resolution,
            Error::TranscriptsDisabled
            | Error::NoTranscriptFound
            | Error::VideoUnavailable(_)
            | Error::Caption(_) => ErrorCategory::Transcript,
            Error::Summarize(_) => ErrorCategory::Summarization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(Error::NoVideoId.category(), ErrorCategory::Resolution);
        assert_eq!(Error::TranscriptsDisabled.category(), ErrorCategory::Transcript);
        assert_eq!(Error::NoTranscriptFound.category(), ErrorCategory::Transcript);
        assert_eq!(Error::caption("boom").category(), ErrorCategory::Transcript);
        assert_eq!(Error::summarize("boom").category(), ErrorCategory::Summarization);
    }

    #[test]
    fn test_messages_carry_context() {
        assert_eq!(
            Error::caption("HTTP 500").to_string(),
            "Error while extracting transcript: HTTP 500"
        );
        assert_eq!(
            Error::summarize("quota exceeded").to_string(),
            "Error during summarization: quota exceeded"
        );
        assert_eq!(
            Error::VideoUnavailable("Video unavailable".to_string()).to_string(),
            "Video is unavailable: Video unavailable"
        );
    }
}
