//! Error types for the component library.
//!
//! Almost nothing in a view layer is fatal: missing data degrades to placeholders and out-of-range
//! requests are clamped. The few helpers that can reject input return [`Error`].

/// Result type alias for fallible helpers.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A video URL could not be interpreted.
    #[error("Invalid video URL '{url}': {reason}")]
    InvalidVideoUrl { url: String, reason: String },

    /// The system clipboard rejected a read or write.
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl Error {
    pub fn invalid_video_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidVideoUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_video_url_message_names_the_url() {
        let e = Error::invalid_video_url("https://x", "no file id");
        assert_eq!(e.to_string(), "Invalid video URL 'https://x': no file id");
    }
}
