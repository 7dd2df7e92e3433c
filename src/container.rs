//! GP file handler — reads Guitar Pro 7/8 (.gp) archives.
//!
//! A .gp file is a ZIP archive containing:
//!   - Content/score.gpif  — the GPIF XML score
//!   - (optional) other files — preferences, layout, audio assets

use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::error::{Result, TabError};

/// Where Guitar Pro stores the score inside the archive.
const SCORE_PATH: &str = "Content/score.gpif";

/// Extract the GPIF XML string from .gp bytes.
pub fn extract_gpif(data: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let score_path = find_score(&mut archive)?;
    log::debug!("Reading '{score_path}' from GP archive");

    let mut score_file = archive.by_name(&score_path)?;
    let mut bytes = Vec::new();
    score_file.read_to_end(&mut bytes)?;

    Ok(String::from_utf8(bytes).map_err(|e| e.utf8_error())?)
}

/// `Content/score.gpif`, or failing that the first `.gpif` entry anywhere
/// in the archive.
fn find_score(archive: &mut ZipArchive<Cursor<&[u8]>>) -> Result<String> {
    let names: Vec<String> = archive.file_names().map(String::from).collect();

    if names.iter().any(|n| n == SCORE_PATH) {
        return Ok(SCORE_PATH.to_string());
    }

    let fallback = names
        .iter()
        .find(|n| n.to_ascii_lowercase().ends_with(".gpif"))
        .cloned();
    fallback.ok_or(TabError::MissingScore { entries: names })
}
