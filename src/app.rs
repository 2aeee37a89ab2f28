use log::info;

use crate::summarize::Summarizer;
use crate::transcript::{self, CaptionService};
use crate::{Error, Result, TimeRange, Transcript};

/// One submission of the form
#[derive(Debug, Clone)]
pub struct Request {
    pub url: String,
    pub language: String,
    pub range: Option<TimeRange>,
    pub summarize: bool,
}

/// Transcript stage result, available before any summary is requested
#[derive(Debug, Clone)]
pub struct Retrieved {
    pub transcript: Transcript,
    pub text: String,
}

/// Resolve the URL and retrieve the transcript text
pub async fn retrieve<C>(captions: &C, request: &Request) -> Result<Retrieved>
where
    C: CaptionService + Sync + ?Sized,
{
    let transcript = transcript::extract(captions, &request.url, &request.language, request.range).await?;
    let text = transcript.text();
    info!(
        "Transcript for {}: lang={} fallback={} segments={} chars={}",
        transcript.video_id,
        transcript.language,
        transcript.fallback,
        transcript.segments.len(),
        text.chars().count()
    );
    Ok(Retrieved { transcript, text })
}

/// Summarize retrieved text.
///
/// `summarizer` is `None` when no credential is configured, which fails in the
/// summarization stage without touching the transcript.
pub async fn summarize<S>(summarizer: Option<&S>, retrieved: &Retrieved) -> Result<String>
where
    S: Summarizer + Sync + ?Sized,
{
    let summarizer = summarizer
        .ok_or_else(|| Error::summarize(format!("{} environment variable not set", crate::config::API_KEY_VAR)))?;
    summarizer.summarize(&retrieved.text).await
}
