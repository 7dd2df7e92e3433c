//! tablib — Guitar Pro score reference resolver and VexTab notation writer.
//!
//! Accepts Guitar Pro 7/8 documents (`.gp` archives or raw `.gpif` XML) and
//! legacy songs decoded elsewhere (as JSON), and renders every playable
//! track as VexTab tablature text.
//!
//! # Example
//! ```no_run
//! use tablib::{convert_file, PipelineOptions};
//!
//! let units = convert_file("path/to/song.gp", &PipelineOptions::default()).unwrap();
//! for unit in &units {
//!     println!("Track {} ({}):\n{}", unit.track_index, unit.track_name, unit.notation_text);
//! }
//! ```

pub mod assemble;
pub mod container;
pub mod error;
pub mod index;
pub mod legacy;
pub mod model;
pub mod normalize;
pub mod notation;
pub mod options;
pub mod output;
pub mod walker;

use std::path::Path;

pub use assemble::{assemble_document, assemble_gpif, assemble_legacy};
pub use container::extract_gpif;
pub use error::{Result, TabError};
pub use index::{NoteDescriptor, ReferenceIndex};
pub use legacy::LegacySong;
pub use model::*;
pub use notation::serialize;
pub use options::{PipelineOptions, SilentMeasurePolicy};
pub use output::{sidecar_path, tracks_to_json, write_sidecars};

/// Convert a score file from a file path.
/// Detects the format from the file extension:
/// - `.gp` → Guitar Pro 7/8 archive
/// - `.gpif`, `.gpx` or `.xml` → raw GPIF XML
/// - `.json` → legacy song from an external decoder
pub fn convert_file<P: AsRef<Path>>(path: P, options: &PipelineOptions) -> Result<Vec<OutputUnit>> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    log::info!("Converting {}", path.display());
    convert_bytes(&data, extension.as_deref(), options)
}

/// Convert a score from raw bytes with an optional format hint.
/// If `extension` is None or unknown, the format is sniffed from the content.
pub fn convert_bytes(
    data: &[u8],
    extension: Option<&str>,
    options: &PipelineOptions,
) -> Result<Vec<OutputUnit>> {
    match extension {
        Some("gp") => assemble_gpif(&extract_gpif(data)?, options),
        Some("gpif") | Some("gpx") | Some("xml") => {
            assemble_gpif(std::str::from_utf8(data)?, options)
        }
        Some("json") => convert_legacy_json(std::str::from_utf8(data)?, options),
        _ => {
            // Auto-detect: XML, then JSON, then a .gp archive
            if let Ok(text) = std::str::from_utf8(data) {
                let head = text.trim_start_matches('\u{feff}').trim_start();
                if head.starts_with('<') {
                    return assemble_gpif(text, options);
                }
                if head.starts_with('{') {
                    return convert_legacy_json(text, options);
                }
            }
            assemble_gpif(&extract_gpif(data)?, options)
        }
    }
}

fn convert_legacy_json(json: &str, options: &PipelineOptions) -> Result<Vec<OutputUnit>> {
    let song = LegacySong::from_json(json)?;
    Ok(assemble_legacy(&song, options))
}
