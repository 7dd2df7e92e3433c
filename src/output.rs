//! Persisting output units: `.vextab` sidecar files next to the source
//! score, and a JSON summary of the emitted tracks.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::model::OutputUnit;

#[derive(Serialize)]
struct TrackSummary<'a> {
    tracks: &'a [OutputUnit],
}

/// `<source>_track_<n>.vextab`, next to the source file.
pub fn sidecar_path<P: AsRef<Path>>(source: P, track_index: usize) -> PathBuf {
    let mut name = source.as_ref().as_os_str().to_owned();
    name.push(format!("_track_{track_index}.vextab"));
    PathBuf::from(name)
}

/// Write each unit's notation verbatim to its sidecar path and record the
/// path in `output_path`. Parent directories are created as needed.
pub fn write_sidecars<P: AsRef<Path>>(units: &mut [OutputUnit], source: P) -> Result<()> {
    for unit in units.iter_mut() {
        let path = sidecar_path(&source, unit.track_index);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &unit.notation_text)?;
        log::info!("Wrote track {} to {}", unit.track_index, path.display());
        unit.output_path = Some(path.display().to_string());
    }
    Ok(())
}

/// `{"tracks": [...]}` as pretty-printed JSON.
pub fn tracks_to_json(units: &[OutputUnit]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&TrackSummary { tracks: units })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unit(track_index: usize) -> OutputUnit {
        OutputUnit {
            track_index,
            track_name: format!("Track {track_index}"),
            notation_text: "tabstave notation=true\nnotes 0/1\n".to_string(),
            output_path: None,
        }
    }

    #[test]
    fn sidecar_path_appends_track_suffix() {
        assert_eq!(
            sidecar_path("uploads/song.gp", 3),
            PathBuf::from("uploads/song.gp_track_3.vextab")
        );
    }

    #[test]
    fn write_sidecars_creates_files_and_records_paths() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("nested").join("riff.gp");
        let mut units = vec![unit(1), unit(4)];

        write_sidecars(&mut units, &source).unwrap();

        for unit in &units {
            let path = unit.output_path.as_ref().unwrap();
            assert!(path.ends_with(&format!("riff.gp_track_{}.vextab", unit.track_index)));
            assert_eq!(fs::read_to_string(path).unwrap(), unit.notation_text);
        }
    }

    #[test]
    fn json_summary_lists_tracks() {
        let json = tracks_to_json(&[unit(2)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tracks"][0]["track_index"], 2);
        assert_eq!(value["tracks"][0]["track_name"], "Track 2");
        assert!(value["tracks"][0]["output_path"].is_null());
    }
}
