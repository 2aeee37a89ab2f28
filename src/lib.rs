pub mod app;
pub mod config;
pub mod error;
pub mod form;
pub mod output;
pub mod summarize;
pub mod transcript;
pub mod youtube;

use url::Url;

pub use error::{Error, ErrorCategory, Result};

/// A single captioned segment
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Transcript as retrieved for one video
#[derive(Debug, Clone)]
pub struct Transcript {
    pub video_id: String,
    /// Language code of the track actually used
    pub language: String,
    /// Display name of the track actually used
    pub track_name: String,
    /// True when the requested language was missing and another track was used
    pub fallback: bool,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Segment texts joined by single spaces, in track order
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Inclusive window of caption start offsets, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    /// Returns `None` unless `0 <= start <= end`
    pub fn new(start: f64, end: f64) -> Option<Self> {
        (start >= 0.0 && start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn contains(&self, offset: f64) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// Parse a timestamp given as plain seconds (`90`, `12.5`) or `[HH:]MM:SS`
pub fn parse_timestamp(input: &str) -> Option<f64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() > 3 {
        return None;
    }
    let mut seconds = 0.0;
    for part in &parts {
        let value: f64 = part.parse().ok()?;
        if value < 0.0 || !value.is_finite() {
            return None;
        }
        seconds = seconds * 60.0 + value;
    }
    Some(seconds)
}

/// Caption languages offered by the form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
    It,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::It,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::It => "it",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
            Language::Fr => "French",
            Language::De => "German",
            Language::It => "Italian",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.into_iter().find(|l| l.code().eq_ignore_ascii_case(code))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Extract the video ID from a `youtu.be/ID` or `youtube.com/watch?v=ID` URL
pub fn extract_video_id(input: &str) -> Option<String> {
    let url = Url::parse(input.trim()).ok()?;

    let id = match url.host_str()? {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "www.youtube.com" => url
            .query_pairs()
            .find_map(|(key, value)| (key == "v" && !value.is_empty()).then(|| value.into_owned())),
        _ => None,
    };

    id.filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_watch_url_without_www() {
        assert_eq!(
            extract_video_id("https://youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?list=PL1&v=dQw4w9WgXcQ&t=120"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(extract_video_id("https://youtu.be/abc123"), Some("abc123".to_string()));
    }

    #[test]
    fn test_short_url_takes_first_segment_only() {
        assert_eq!(
            extract_video_id("https://youtu.be/abc123/extra?t=5"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_unknown_host() {
        assert_eq!(extract_video_id("https://example.com/video"), None);
        assert_eq!(extract_video_id("https://example.com/watch?v=abc123"), None);
    }

    #[test]
    fn test_canonical_host_without_v() {
        assert_eq!(extract_video_id("https://www.youtube.com/watch"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/embed/abc123"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v="), None);
    }

    #[test]
    fn test_blank_v_is_skipped() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=&v=abc123"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_short_url_without_id() {
        assert_eq!(extract_video_id("https://youtu.be/"), None);
        assert_eq!(extract_video_id("https://youtu.be"), None);
    }

    #[test]
    fn test_not_a_url() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(
            extract_video_id("  https://youtu.be/abc123  "),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_time_range() {
        let range = TimeRange::new(0.0, 5.0).unwrap();
        assert!(range.contains(0.0));
        assert!(range.contains(5.0));
        assert!(!range.contains(5.01));
        assert!(TimeRange::new(6.0, 5.0).is_none());
        assert!(TimeRange::new(-1.0, 5.0).is_none());
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("90"), Some(90.0));
        assert_eq!(parse_timestamp("12.5"), Some(12.5));
        assert_eq!(parse_timestamp("1:30"), Some(90.0));
        assert_eq!(parse_timestamp("1:00:05"), Some(3605.0));
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("1:2:3:4"), None);
        assert_eq!(parse_timestamp("abc"), None);
        assert_eq!(parse_timestamp("-5"), None);
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("FR"), Some(Language::Fr));
        assert_eq!(Language::from_code("pt"), None);
        assert_eq!(Language::default().code(), "en");
        assert_eq!(Language::It.to_string(), "it");
    }

    #[test]
    fn test_transcript_text() {
        let t = Transcript {
            video_id: "abc".to_string(),
            language: "en".to_string(),
            track_name: "English".to_string(),
            fallback: false,
            segments: vec![
                Segment { text: "Hi".to_string(), start: 0.0, duration: 1.0 },
                Segment { text: "there".to_string(), start: 5.0, duration: 1.0 },
            ],
        };
        assert_eq!(t.text(), "Hi there");
    }
}
