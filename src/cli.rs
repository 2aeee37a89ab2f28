use clap::Parser;
use std::path::PathBuf;

use ytsum::Language;

fn parse_seconds(s: &str) -> Result<f64, String> {
    ytsum::parse_timestamp(s).ok_or_else(|| format!("invalid timestamp '{s}' (use seconds or [HH:]MM:SS)"))
}

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "Summarize a YouTube video from its caption transcript",
    version
)]
pub struct Cli {
    /// YouTube video URL (opens the interactive form if omitted)
    pub url: Option<String>,

    /// Preferred caption language
    #[arg(short, long, value_enum)]
    pub lang: Option<Language>,

    /// Only keep captions starting at or after this time (seconds or [HH:]MM:SS)
    #[arg(long, value_parser = parse_seconds, requires = "end")]
    pub start: Option<f64>,

    /// Only keep captions starting at or before this time (seconds or [HH:]MM:SS)
    #[arg(long, value_parser = parse_seconds, requires = "start")]
    pub end: Option<f64>,

    /// Gemini model used for summarization
    #[arg(short, long)]
    pub model: Option<String>,

    /// Where to write the summary
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only fetch the transcript, skip summarization
    #[arg(long)]
    pub no_summary: bool,

    /// Show video and transcript details
    #[arg(short, long)]
    pub verbose: bool,
}
