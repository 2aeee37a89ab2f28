use std::io::{self, BufRead, Write};

use crate::Language;
use crate::app::Retrieved;
use crate::output::{PREVIEW_CHARS, preview};

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Ask for a video URL; `None` on EOF or a blank answer
pub fn prompt_url<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<String>> {
    write!(out, "Enter YouTube Video URL: ")?;
    out.flush()?;
    Ok(read_line(input)?.filter(|url| !url.is_empty()))
}

/// Ask for one of the offered languages, by number or code. Blank or EOF picks `default`.
pub fn prompt_language<R: BufRead, W: Write>(input: &mut R, out: &mut W, default: Language) -> io::Result<Language> {
    writeln!(out, "Select Language:")?;
    for (i, lang) in Language::ALL.iter().enumerate() {
        writeln!(out, "  {}) {} ({})", i + 1, lang.code(), lang.name())?;
    }

    loop {
        write!(out, "Language [{default}]: ")?;
        out.flush()?;

        let Some(answer) = read_line(input)? else {
            return Ok(default);
        };
        if answer.is_empty() {
            return Ok(default);
        }
        if let Some(lang) = parse_choice(&answer) {
            return Ok(lang);
        }
        writeln!(out, "Unknown language '{answer}'")?;
    }
}

fn parse_choice(answer: &str) -> Option<Language> {
    if let Ok(n) = answer.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| Language::ALL.get(i).copied());
    }
    Language::from_code(answer)
}

/// Print the transcript preview, noting when a fallback track was used
pub fn show_transcript<W: Write>(out: &mut W, retrieved: &Retrieved) -> io::Result<()> {
    let transcript = &retrieved.transcript;
    if transcript.fallback {
        writeln!(
            out,
            "Requested language unavailable, using the {} transcript ({}).",
            transcript.track_name, transcript.language
        )?;
    }
    writeln!(out, "Transcript Extracted (First {PREVIEW_CHARS} characters):")?;
    writeln!(out, "{}", preview(&retrieved.text, PREVIEW_CHARS))?;
    Ok(())
}

pub fn show_summary<W: Write>(out: &mut W, summary: &str) -> io::Result<()> {
    writeln!(out, "\nSummary:\n{summary}")
}
