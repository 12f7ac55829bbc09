use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::error::CleanError;
use crate::model::{CleanedDocument, RawDocument};

/// Pipeline stage, used as the file-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Raw,
    Cleaned,
}

impl Stage {
    fn suffix(self) -> &'static str {
        match self {
            Stage::Raw => "_ultimate",
            Stage::Cleaned => "_cleaned",
        }
    }
}

/// `<dir>/<user_id><suffix>.<ext>`
pub fn output_path(dir: &Path, user_id: &str, stage: Stage, ext: &str) -> PathBuf {
    dir.join(format!("{}{}.{}", user_id, stage.suffix(), ext))
}

pub fn read_document(path: &Path) -> Result<RawDocument> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = parse_document(&json).with_context(|| format!("Cannot clean {}", path.display()))?;
    info!("Loaded {} raw blocks for profile {}", doc.blocks.len(), doc.profile.user_id);
    Ok(doc)
}

/// Parse an extractor document, rejecting anything the cleaner cannot name
/// its output after.
pub fn parse_document(json: &str) -> crate::error::Result<RawDocument> {
    let doc: RawDocument =
        serde_json::from_str(json).map_err(|e| CleanError::MalformedInput(e.to_string()))?;

    let id = doc.profile.user_id.trim();
    if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
        return Err(CleanError::MalformedInput(format!(
            "profile.user_id {:?} is not usable as a file name",
            doc.profile.user_id
        )));
    }
    Ok(doc)
}

/// Write `<user_id>_cleaned.json` and `<user_id>_cleaned.txt` into `dir`.
/// Both are rendered before either is written; if the text file cannot be
/// written the JSON is removed again, so a failed run leaves no half pair.
pub fn write_cleaned(dir: &Path, doc: &CleanedDocument) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let user_id = &doc.profile.user_id;
    let json_path = output_path(dir, user_id, Stage::Cleaned, "json");
    let txt_path = output_path(dir, user_id, Stage::Cleaned, "txt");

    let json = serde_json::to_string_pretty(doc)?;
    let text = render_cleaned(doc);

    fs::write(&json_path, json).with_context(|| format!("Failed to write {}", json_path.display()))?;
    if let Err(e) = fs::write(&txt_path, text) {
        let _ = fs::remove_file(&json_path);
        return Err(e).with_context(|| format!("Failed to write {}", txt_path.display()));
    }
    info!("Saved: {}", json_path.display());
    info!("Saved: {}", txt_path.display());

    Ok((json_path, txt_path))
}

/// Write the raw-stage `<user_id>_ultimate.txt` into `dir`.
pub fn write_raw_text(dir: &Path, doc: &RawDocument) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = output_path(dir, &doc.profile.user_id, Stage::Raw, "txt");
    fs::write(&path, render_raw(doc)).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved: {}", path.display());
    Ok(path)
}

fn rule() -> String {
    "=".repeat(100)
}

pub fn render_cleaned(doc: &CleanedDocument) -> String {
    let p = &doc.profile;
    let mut out = String::new();
    let _ = writeln!(out, "QUORA PROFILE: {}", p.user_id);
    let _ = writeln!(out, "{}\n", rule());
    let _ = writeln!(out, "URL: {}", p.url);
    let _ = writeln!(out, "Claimed answers: {}", p.claimed());
    let _ = writeln!(out, "Unique answers extracted: {}", doc.answers.len());
    let _ = writeln!(out, "\n{}\n", rule());

    for (i, a) in doc.answers.iter().enumerate() {
        let _ = writeln!(out, "\n{}", rule());
        let _ = writeln!(out, "ANSWER #{}", i + 1);
        let _ = writeln!(out, "{}", rule());
        let _ = writeln!(out, "\nQUESTION:\n{}", a.question);
        let _ = writeln!(out, "\nANSWER:\n{}", a.answer);
    }
    out
}

/// Raw-stage text: one entry per block, laid out like the cleaned file but
/// with the block text as extracted.
pub fn render_raw(doc: &RawDocument) -> String {
    let p = &doc.profile;
    let mut out = String::new();
    let _ = writeln!(out, "QUORA PROFILE: {}", p.user_id);
    let _ = writeln!(out, "{}\n", rule());
    let _ = writeln!(out, "URL: {}", p.url);
    let _ = writeln!(out, "Claimed answers: {}", p.claimed());
    let _ = writeln!(out, "Extracted answers: {}", doc.blocks.len());
    let _ = writeln!(out, "Extraction rate: {}/{}", doc.blocks.len(), p.claimed());
    let _ = writeln!(out, "\n{}\n", rule());

    for (i, b) in doc.blocks.iter().enumerate() {
        let _ = writeln!(out, "\n{}", rule());
        let _ = writeln!(out, "ANSWER #{}", i + 1);
        let _ = writeln!(out, "{}", rule());
        let _ = writeln!(out, "\nQUESTION:\n{}", b.text);
        let _ = writeln!(out, "\nANSWER:\n{}", b.answer.as_deref().unwrap_or(""));
    }
    out
}

// ── Tests ──
