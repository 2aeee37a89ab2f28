use async_trait::async_trait;
use log::{debug, info};

use crate::{Error, Result, Segment, TimeRange, Transcript, extract_video_id};

/// One caption track advertised for a video
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInfo {
    pub language_code: String,
    pub name: String,
    pub auto_generated: bool,
    /// Where the caption service fetches this track's entries from
    pub base_url: String,
}

/// Source of caption tracks for a video
#[async_trait]
pub trait CaptionService {
    /// List the tracks available for `video_id`, in the order the service reports them
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<TrackInfo>>;

    /// Fetch the entries of one track, in playback order
    async fn fetch_track(&self, track: &TrackInfo) -> Result<Vec<Segment>>;
}

/// Pick the track matching `lang` exactly, else the first listed
pub fn select_track<'a>(tracks: &'a [TrackInfo], lang: &str) -> Option<&'a TrackInfo> {
    tracks
        .iter()
        .find(|t| t.language_code == lang)
        .or_else(|| tracks.first())
}

/// Keep whole segments whose start offset lies inside `range`
pub fn filter_range(segments: Vec<Segment>, range: Option<TimeRange>) -> Vec<Segment> {
    match range {
        Some(range) => segments.into_iter().filter(|s| range.contains(s.start)).collect(),
        None => segments,
    }
}

/// Retrieve the transcript for `video_id`, falling back to any available language
pub async fn fetch<S>(service: &S, video_id: &str, lang: &str, range: Option<TimeRange>) -> Result<Transcript>
where
    S: CaptionService + Sync + ?Sized,
{
    let tracks = service.list_tracks(video_id).await?;
    debug!("Video {video_id} lists {} caption track(s)", tracks.len());

    let track = select_track(&tracks, lang).ok_or(Error::NoTranscriptFound)?;
    let fallback = track.language_code != lang;
    if fallback {
        info!(
            "No '{lang}' transcript for {video_id}, falling back to '{}'",
            track.language_code
        );
    }

    let segments = service.fetch_track(track).await?;
    let segments = filter_range(segments, range);
    debug!("Kept {} segment(s) for {video_id}", segments.len());

    Ok(Transcript {
        video_id: video_id.to_string(),
        language: track.language_code.clone(),
        track_name: track.name.clone(),
        fallback,
        segments,
    })
}

/// Retrieve the transcript text for `video_id`
pub async fn retrieve<S>(service: &S, video_id: &str, lang: &str, range: Option<TimeRange>) -> Result<String>
where
    S: CaptionService + Sync + ?Sized,
{
    Ok(fetch(service, video_id, lang, range).await?.text())
}

/// Resolve `url` to a video ID and retrieve its transcript
pub async fn extract<S>(service: &S, url: &str, lang: &str, range: Option<TimeRange>) -> Result<Transcript>
where
    S: CaptionService + Sync + ?Sized,
{
    let video_id = extract_video_id(url).ok_or(Error::NoVideoId)?;
    fetch(service, &video_id, lang, range).await
}
