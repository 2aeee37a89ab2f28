use async_trait::async_trait;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::transcript::{CaptionService, TrackInfo};
use crate::{Error, Result, Segment};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const WATCH_URL: &str = "https://www.youtube.com/watch";
const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    name: Option<TrackName>,
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackName {
    #[serde(rename = "simpleText")]
    simple_text: Option<String>,
    runs: Option<Vec<TextRun>>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TrackName {
    fn text(&self) -> String {
        if let Some(ref s) = self.simple_text {
            return s.clone();
        }
        self.runs
            .iter()
            .flatten()
            .map(|r| r.text.as_str())
            .collect()
    }
}

/// Caption service backed by YouTube's InnerTube player API
pub struct YouTubeCaptions {
    client: reqwest::Client,
}

impl YouTubeCaptions {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(request_error)?;

        if !resp.status().is_success() {
            return Err(Error::caption(format!("caption request returned {}", resp.status())));
        }

        resp.text().await.map_err(request_error)
    }

    async fn player_response(&self, video_id: &str) -> Result<InnerTubePlayerResponse> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("{WATCH_URL}?v={video_id}");
        debug!("Fetching watch page: {watch_url}");
        let page_html = self.get_text(&watch_url).await?;

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!("{PLAYER_URL}?key={api_key}&prettyPrint=false");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": "en",
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id
        });

        let resp = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        if !resp.status().is_success() {
            return Err(Error::caption(format!("InnerTube player returned {}", resp.status())));
        }

        resp.json()
            .await
            .map_err(|e| Error::caption(format!("invalid player response: {}", e.without_url())))
    }
}

/// Request URLs carry the API key, so they are kept out of error messages
fn request_error(e: reqwest::Error) -> Error {
    Error::caption(e.without_url().to_string())
}

#[async_trait]
impl CaptionService for YouTubeCaptions {
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<TrackInfo>> {
        let resp = self.player_response(video_id).await?;
        tracks_from_player(resp)
    }

    async fn fetch_track(&self, track: &TrackInfo) -> Result<Vec<Segment>> {
        debug!("Fetching caption track: lang={}", track.language_code);
        let caption_xml = self.get_text(&track.base_url).await?;
        parse_caption_xml(&caption_xml)
    }
}

fn tracks_from_player(resp: InnerTubePlayerResponse) -> Result<Vec<TrackInfo>> {
    let Some(renderer) = resp.captions.and_then(|c| c.player_captions_tracklist_renderer) else {
        // No captions at all: either the video is not playable or its owner turned them off
        if let Some(status) = resp.playability_status {
            if status.status.as_deref().is_some_and(|s| s != "OK") {
                let reason = status
                    .reason
                    .or(status.status)
                    .unwrap_or_default();
                return Err(Error::VideoUnavailable(reason));
            }
        }
        return Err(Error::TranscriptsDisabled);
    };

    let tracks: Vec<TrackInfo> = renderer
        .caption_tracks
        .unwrap_or_default()
        .into_iter()
        .map(|t| TrackInfo {
            name: t.name.as_ref().map(TrackName::text).unwrap_or_else(|| t.language_code.clone()),
            auto_generated: t.kind.as_deref() == Some("asr"),
            // srv3 is a different XML schema; the plain timed-text format is what we parse
            base_url: t.base_url.replace("&fmt=srv3", ""),
            language_code: t.language_code,
        })
        .collect();

    // Manually created tracks win over generated ones, both for an exact match and for fallback
    let (manual, generated): (Vec<_>, Vec<_>) = tracks.into_iter().partition(|t| !t.auto_generated);
    Ok(manual.into_iter().chain(generated).collect())
}

fn extract_api_key(html: &str) -> Result<String> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).map_err(|e| Error::caption(e.to_string()))?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    // Fallback: try the newer pattern
    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#).map_err(|e| Error::caption(e.to_string()))?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    Err(Error::caption("could not extract InnerTube API key from watch page"))
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                current_start = None;
                current_dur = None;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value);
                    match attr.key.as_ref() {
                        b"start" => current_start = value.parse::<f64>().ok(),
                        b"dur" => current_dur = value.parse::<f64>().ok(),
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(start) = current_start.take() {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).trim().to_string();
                    if !text.is_empty() {
                        segments.push(Segment {
                            text,
                            start,
                            duration: current_dur.take().unwrap_or(0.0),
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::caption(format!("error parsing caption XML: {e}"))),
            _ => {}
        }
    }

    Ok(segments)
}
