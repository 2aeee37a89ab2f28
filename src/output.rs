use std::path::Path;

use eyre::{Result, WrapErr};
use log::debug;

pub const SUMMARY_FILE_NAME: &str = "youtube_video_summary.txt";
pub const PREVIEW_CHARS: usize = 500;

/// First `max_chars` characters of `text`
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Write the summary as plain UTF-8 text
pub fn write_summary(path: &Path, summary: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, summary).wrap_err_with(|| format!("failed to write summary to {}", path.display()))?;
    debug!("Summary written: {}", path.display());
    Ok(())
}
