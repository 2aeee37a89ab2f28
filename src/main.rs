use std::io::{self, Write};
use std::path::{Path, PathBuf};

use eyre::{Result, bail};
use log::{debug, info, warn};

mod cli;

use cli::Cli;
use ytsum::app::{self, Request};
use ytsum::summarize::{DEFAULT_MODEL, GeminiClient};
use ytsum::youtube::YouTubeCaptions;
use ytsum::{Language, TimeRange, form, output};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

fn build_after_help() -> String {
    let key_line = if std::env::var_os(ytsum::config::API_KEY_VAR).is_some() {
        format!("  \x1b[32m✅\x1b[0m {}", ytsum::config::API_KEY_VAR)
    } else {
        format!(
            "  \x1b[31m❌\x1b[0m {}     (not set, needed for summarization)",
            ytsum::config::API_KEY_VAR
        )
    };

    format!(
        "\nENVIRONMENT:\n{key_line}\n\nConfig is read from: {}\nLogs are written to: {}",
        ytsum::config::config_path().display(),
        log_dir().join("ytsum.log").display()
    )
}

/// Everything a submission needs besides the URL and language
struct Session {
    captions: YouTubeCaptions,
    gemini: Option<GeminiClient>,
    range: Option<TimeRange>,
    summarize: bool,
    summary_path: PathBuf,
    verbose: bool,
}

impl Session {
    async fn submit(&self, url: &str, lang: Language) -> Result<()> {
        let request = Request {
            url: url.to_string(),
            language: lang.code().to_string(),
            range: self.range,
            summarize: self.summarize,
        };

        let retrieved = app::retrieve(&self.captions, &request).await?;

        if self.verbose {
            let t = &retrieved.transcript;
            eprintln!(
                "Video: {}\nLanguage: {} [{}]{}\nSegments: {}",
                t.video_id,
                t.language,
                t.track_name,
                if t.fallback { " (fallback)" } else { "" },
                t.segments.len(),
            );
        }

        // Preview goes out before the summary request
        form::show_transcript(&mut io::stdout().lock(), &retrieved)?;
        if !request.summarize {
            return Ok(());
        }

        let summary = app::summarize(self.gemini.as_ref(), &retrieved).await?;

        let mut stdout = io::stdout().lock();
        form::show_summary(&mut stdout, &summary)?;
        output::write_summary(&self.summary_path, &summary)?;
        writeln!(stdout, "\nSummary saved to: {}", self.summary_path.display())?;
        Ok(())
    }
}

async fn run_form(session: &Session, default_lang: Language) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "\nYouTube Video Summarizer")?;
        let Some(url) = form::prompt_url(&mut input, &mut stdout)? else {
            break;
        };
        let lang = form::prompt_language(&mut input, &mut stdout, default_lang)?;
        drop(stdout);

        if let Err(e) = session.submit(&url, lang).await {
            warn!("Request for {url} failed: {e}");
            eprintln!("Error: {e}");
        }
    }

    debug!("Form closed");
    Ok(())
}

fn summary_path(cli: Option<&Path>, config: Option<&Path>) -> PathBuf {
    cli.or(config)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(output::SUMMARY_FILE_NAME))
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;
    ytsum::config::load_dotenv();

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = ytsum::config::Config::load().unwrap_or_else(|e| {
        warn!("Ignoring config file: {e}");
        ytsum::config::Config::default()
    });

    // CLI flags take priority over config
    let lang = cli.lang.or_else(|| config.language()).unwrap_or_default();
    let model = cli
        .model
        .clone()
        .or_else(|| config.default_model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let range = match (cli.start, cli.end) {
        (Some(start), Some(end)) => match TimeRange::new(start, end) {
            Some(range) => Some(range),
            None => bail!("--start ({start}) must not be after --end ({end})"),
        },
        _ => None,
    };

    let client = reqwest::Client::new();
    let gemini = ytsum::config::gemini_config(&model).map(|c| GeminiClient::new(client.clone(), c));
    match gemini {
        Some(ref g) => debug!("Summarization model: {}", g.model()),
        None => debug!("{} not set, summarization unavailable", ytsum::config::API_KEY_VAR),
    }

    let session = Session {
        captions: YouTubeCaptions::new(client),
        gemini,
        range,
        summarize: !cli.no_summary,
        summary_path: summary_path(cli.output.as_deref(), config.output.as_deref()),
        verbose: cli.verbose,
    };

    match cli.url {
        Some(ref url) => session.submit(url, lang).await,
        None => run_form(&session, lang).await,
    }
}
