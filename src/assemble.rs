//! Track assembler — runs the whole pipeline over a document and emits one
//! [`OutputUnit`] per playable track.

use roxmltree::Document;

use crate::error::Result;
use crate::index::ReferenceIndex;
use crate::legacy::LegacySong;
use crate::model::{OutputUnit, Track};
use crate::normalize::{normalize_legacy, normalize_walked};
use crate::notation;
use crate::options::PipelineOptions;
use crate::walker;

/// Parse a GPIF XML string and assemble its tracks.
///
/// Fails only when the XML itself cannot be parsed.
pub fn assemble_gpif(xml: &str, options: &PipelineOptions) -> Result<Vec<OutputUnit>> {
    // Some exporters emit a DOCTYPE declaration
    let parsing = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = Document::parse_with_options(xml, parsing)?;
    Ok(assemble_document(&doc, options))
}

/// Assemble the tracks of an already parsed GPIF document.
///
/// `track_index` of each unit is the track's 1-based position in the
/// document, so skipped tracks leave gaps in the numbering.
pub fn assemble_document(doc: &Document, options: &PipelineOptions) -> Vec<OutputUnit> {
    let index = ReferenceIndex::build(doc);

    walker::walk(doc, &index)
        .iter()
        .enumerate()
        .filter_map(|(i, walked)| normalize_walked(walked, i + 1, options))
        .map(|track| emit(&track))
        .collect()
}

/// Assemble the tracks of a legacy song.
pub fn assemble_legacy(song: &LegacySong, options: &PipelineOptions) -> Vec<OutputUnit> {
    song.tracks
        .iter()
        .enumerate()
        .filter_map(|(i, track)| normalize_legacy(track, i + 1, options))
        .map(|track| emit(&track))
        .collect()
}

fn emit(track: &Track) -> OutputUnit {
    let notation_text = notation::serialize(track);
    log::info!(
        "Track {} '{}': {} measures, {} beats",
        track.index,
        track.name,
        track.measures.len(),
        track.beat_count()
    );

    OutputUnit {
        track_index: track.index,
        track_name: track.name.clone(),
        notation_text,
        output_path: None,
    }
}
