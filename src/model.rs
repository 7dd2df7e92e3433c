//! Canonical musical model shared by both ingestion paths.
//!
//! Whatever the source (a GPIF document or a legacy song handed over by an
//! external decoder), tracks end up in these structures before notation is
//! produced, so the serializer never needs to know where a note came from.
//!
//! [`Duration`] and [`NoteEvent::duration`] are not used by the notation
//! writer, whose output carries no durations. They are there for downstream
//! consumers that want a VexTab duration symbol per note.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Ticks per quarter note used throughout the model.
pub const TICKS_PER_QUARTER: i32 = 480;
/// Velocity assigned when the source carries none.
pub const DEFAULT_VELOCITY: i32 = 80;
/// Duration assigned when the source carries none (one quarter note).
pub const DEFAULT_DURATION_TICKS: i32 = TICKS_PER_QUARTER;

/// A playable track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// 1-based position in the source track list
    pub index: usize,
    /// Display name (e.g., "Lead Guitar")
    pub name: String,
    /// Drum tracks have no tablature and are never rendered
    pub is_percussion: bool,
    /// Ordered list of measures
    pub measures: Vec<Measure>,
}

/// A single measure (bar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    /// 1-based position of the bar in the source, counted before any
    /// silent measures were dropped
    pub index: usize,
    /// Beats in play order
    pub beats: Vec<Beat>,
}

/// One rhythmic position. No notes means a rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beat {
    /// 1-based position within the measure
    pub index: usize,
    /// Notes sounding together on this beat, in source order
    pub notes: Vec<NoteEvent>,
}

/// A fretted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// String number (1 = highest string)
    pub string: i32,
    /// Fret number (0 = open string)
    pub fret: i32,
    /// MIDI velocity (0–127)
    pub velocity: i32,
    /// Length in ticks at [`TICKS_PER_QUARTER`]
    pub duration_ticks: i32,
    /// Articulations; iteration order is the fixed notation order
    pub modifiers: BTreeSet<Modifier>,
}

/// Articulation flag on a note.
///
/// Variant order is the order suffix characters are written in, so a
/// `BTreeSet<Modifier>` always iterates `h p s b x v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    HammerOn,
    PullOff,
    Slide,
    Bend,
    Mute,
    Vibrato,
}

impl Modifier {
    /// Suffix character used in tablature notation.
    pub fn symbol(self) -> char {
        match self {
            Modifier::HammerOn => 'h',
            Modifier::PullOff => 'p',
            Modifier::Slide => 's',
            Modifier::Bend => 'b',
            Modifier::Mute => 'x',
            Modifier::Vibrato => 'v',
        }
    }
}

/// Note value, as far as tablature notation cares about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Duration {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl Duration {
    /// Longest first.
    const ALL: [Duration; 6] = [
        Duration::Whole,
        Duration::Half,
        Duration::Quarter,
        Duration::Eighth,
        Duration::Sixteenth,
        Duration::ThirtySecond,
    ];

    pub fn ticks(self) -> i32 {
        match self {
            Duration::Whole => TICKS_PER_QUARTER * 4,
            Duration::Half => TICKS_PER_QUARTER * 2,
            Duration::Quarter => TICKS_PER_QUARTER,
            Duration::Eighth => TICKS_PER_QUARTER / 2,
            Duration::Sixteenth => TICKS_PER_QUARTER / 4,
            Duration::ThirtySecond => TICKS_PER_QUARTER / 8,
        }
    }

    /// Map a tick count to the longest duration that fits in it.
    /// Anything shorter than a 32nd falls back to a quarter.
    pub fn from_ticks(ticks: i32) -> Duration {
        Self::ALL
            .into_iter()
            .find(|d| ticks >= d.ticks())
            .unwrap_or(Duration::Quarter)
    }

    /// VexTab duration symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Duration::Whole => "w",
            Duration::Half => "h",
            Duration::Quarter => "q",
            Duration::Eighth => "8",
            Duration::Sixteenth => "16",
            Duration::ThirtySecond => "32",
        }
    }
}

/// Rendered notation for one track, ready to be handed to a renderer
/// or written next to the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputUnit {
    /// 1-based position in the original track list
    pub track_index: usize,
    pub track_name: String,
    /// VexTab text, newline-terminated
    pub notation_text: String,
    /// Where `notation_text` was persisted, if it was
    pub output_path: Option<String>,
}

impl Track {
    /// Total number of beats across all measures.
    pub fn beat_count(&self) -> usize {
        self.measures.iter().map(|m| m.beats.len()).sum()
    }
}

impl Measure {
    /// True when no beat in the measure sounds a note.
    pub fn is_silent(&self) -> bool {
        self.beats.iter().all(Beat::is_rest)
    }
}

impl Beat {
    pub fn is_rest(&self) -> bool {
        self.notes.is_empty()
    }
}

impl NoteEvent {
    /// A note with default velocity and duration and no articulations.
    pub fn new(fret: i32, string: i32) -> Self {
        Self {
            string,
            fret,
            velocity: DEFAULT_VELOCITY,
            duration_ticks: DEFAULT_DURATION_TICKS,
            modifiers: BTreeSet::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_ticks(self.duration_ticks)
    }
}
