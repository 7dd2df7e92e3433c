//! Legacy song model — the shape an external Guitar Pro 3/4/5 decoder
//! hands over.
//!
//! Binary `.gp3`/`.gp4`/`.gp5` files are decoded elsewhere; this crate only
//! receives the resulting object tree, either built directly or as JSON.
//! Every field has a default so partially populated input still converts.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{DEFAULT_DURATION_TICKS, DEFAULT_VELOCITY};

/// A decoded legacy song.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacySong {
    pub title: Option<String>,
    /// Tempo in BPM
    pub tempo: Option<f64>,
    pub tracks: Vec<LegacyTrack>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyTrack {
    /// Empty when the decoder found no name
    pub name: String,
    #[serde(alias = "isPercussionTrack")]
    pub is_percussion: bool,
    pub measures: Vec<LegacyMeasure>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyMeasure {
    pub voices: Vec<LegacyVoice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyVoice {
    pub beats: Vec<LegacyBeat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyBeat {
    /// Beat length in ticks; notes without their own duration inherit it
    #[serde(alias = "duration")]
    pub duration_ticks: i32,
    pub notes: Vec<LegacyNote>,
}

impl Default for LegacyBeat {
    fn default() -> Self {
        Self {
            duration_ticks: DEFAULT_DURATION_TICKS,
            notes: Vec::new(),
        }
    }
}

/// One note with its articulation flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyNote {
    #[serde(alias = "value")]
    pub fret: i32,
    pub string: i32,
    pub velocity: i32,
    /// Overrides the beat's duration when present
    #[serde(alias = "duration")]
    pub duration_ticks: Option<i32>,
    #[serde(alias = "hammer", alias = "hammerOn")]
    pub hammer_on: bool,
    #[serde(alias = "pullOff")]
    pub pull_off: bool,
    pub slide: bool,
    pub bend: bool,
    pub muted: bool,
    pub vibrato: bool,
}

impl Default for LegacyNote {
    fn default() -> Self {
        Self {
            fret: 0,
            string: 1,
            velocity: DEFAULT_VELOCITY,
            duration_ticks: None,
            hammer_on: false,
            pull_off: false,
            slide: false,
            bend: false,
            muted: false,
            vibrato: false,
        }
    }
}

impl LegacySong {
    /// Decode a song from JSON produced by an external decoder.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl LegacyNote {
    pub fn new(fret: i32, string: i32) -> Self {
        Self {
            fret,
            string,
            ..Self::default()
        }
    }
}

impl LegacyBeat {
    pub fn with_notes(notes: Vec<LegacyNote>) -> Self {
        Self {
            notes,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_defaults_fill_missing_fields() {
        let song = LegacySong::from_json(
            r#"{"tracks":[{"measures":[{"voices":[{"beats":[{"notes":[{"fret":3}]}]}]}]}]}"#,
        )
        .unwrap();
        let note = &song.tracks[0].measures[0].voices[0].beats[0].notes[0];
        assert_eq!(note.fret, 3);
        assert_eq!(note.string, 1);
        assert_eq!(note.velocity, 80);
        assert_eq!(note.duration_ticks, None);
        assert!(!note.hammer_on && !note.muted);
        assert_eq!(song.tracks[0].measures[0].voices[0].beats[0].duration_ticks, 480);
    }

    #[test]
    fn json_accepts_decoder_field_names() {
        let song = LegacySong::from_json(
            r#"{"tracks":[{"name":"Drums","isPercussionTrack":true,"measures":[
                {"voices":[{"beats":[{"duration":240,"notes":[
                    {"value":5,"string":2,"hammerOn":true,"pullOff":true,"duration":960}
                ]}]}]}
            ]}]}"#,
        )
        .unwrap();
        let track = &song.tracks[0];
        assert!(track.is_percussion);
        let beat = &track.measures[0].voices[0].beats[0];
        assert_eq!(beat.duration_ticks, 240);
        let note = &beat.notes[0];
        assert_eq!((note.fret, note.string), (5, 2));
        assert!(note.hammer_on && note.pull_off);
        assert_eq!(note.duration_ticks, Some(960));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(LegacySong::from_json("{\"tracks\": 5}").is_err());
    }
}
