//! Structure walker — expands the Track → Staff → Bar → VoiceRef chain of
//! a GPIF document into ordered beat slots, resolving every reference
//! through a [`ReferenceIndex`].
//!
//! A dangling reference is never an error. A missing beat becomes a rest
//! slot, a missing voice or note is skipped, and a missing container
//! element simply contributes nothing.

use roxmltree::{Document, Node};

use crate::index::{child, children, parse_i32, text, NoteDescriptor, ReferenceIndex};

/// MIDI channel 10 (0-based 9) is reserved for percussion.
const PERCUSSION_CHANNEL: i32 = 9;

/// One resolved beat. No notes means a rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeatSlot {
    pub notes: Vec<NoteDescriptor>,
}

impl BeatSlot {
    pub fn rest() -> Self {
        Self::default()
    }

    pub fn is_rest(&self) -> bool {
        self.notes.is_empty()
    }
}

/// A track with every bar expanded into beat slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedTrack {
    /// Track name from `<Name>`, or "Track N"
    pub name: String,
    /// Drum kit or channel-10 track
    pub is_percussion: bool,
    /// One entry per bar across all staves, in source order. A bar with no
    /// slots had no voices at all.
    pub bars: Vec<Vec<BeatSlot>>,
}

impl WalkedTrack {
    /// All slots of the track in play order, ignoring bar boundaries.
    pub fn slots(&self) -> impl Iterator<Item = &BeatSlot> {
        self.bars.iter().flatten()
    }
}

/// Walk every track of the document in source order.
///
/// Tracks are taken from the root's `<Tracks>` wrapper, or directly from
/// the root when there is none.
pub fn walk(doc: &Document, index: &ReferenceIndex) -> Vec<WalkedTrack> {
    let root = doc.root_element();
    let tracks: Vec<Node> = match child(&root, "Tracks") {
        Some(wrapper) => children(&wrapper, "Track").collect(),
        None => children(&root, "Track").collect(),
    };

    tracks
        .iter()
        .enumerate()
        .map(|(i, track)| walk_track(track, i + 1, index))
        .collect()
}

/// Walk a single `<Track>` element. `position` is its 1-based place in the
/// document, used for the fallback name.
pub fn walk_track(node: &Node, position: usize, index: &ReferenceIndex) -> WalkedTrack {
    let name = child(node, "Name")
        .and_then(|n| text(&n))
        .map(String::from)
        .unwrap_or_else(|| format!("Track {position}"));

    let mut walked = WalkedTrack {
        is_percussion: is_percussion(node),
        name,
        bars: Vec::new(),
    };

    let Some(staves) = child(node, "Staves") else {
        log::debug!("Track '{}' has no Staves element", walked.name);
        return walked;
    };

    for staff in children(&staves, "Staff") {
        let Some(bars) = child(&staff, "Bars") else {
            log::debug!("Staff in track '{}' has no Bars element", walked.name);
            continue;
        };
        for bar in children(&bars, "Bar") {
            walked.bars.push(walk_bar(&bar, index));
        }
    }

    walked
}

/// Expand one `<Bar>` into slots. Voices are concatenated in VoiceRef
/// order, not interleaved by time position.
fn walk_bar(node: &Node, index: &ReferenceIndex) -> Vec<BeatSlot> {
    let Some(voices) = child(node, "Voices") else {
        return Vec::new();
    };

    let mut slots = Vec::new();
    for voice_ref in children(&voices, "VoiceRef") {
        let Some(voice_id) = voice_ref.attribute("ref") else {
            continue;
        };
        slots.extend(walk_voice(index, voice_id));
    }
    slots
}

/// Resolve one voice into slots. An unknown voice yields nothing.
pub fn walk_voice(index: &ReferenceIndex, voice_id: &str) -> Vec<BeatSlot> {
    let Some(beat_ids) = index.voice(voice_id) else {
        log::debug!("Voice '{voice_id}' not found, skipping");
        return Vec::new();
    };

    beat_ids.iter().map(|id| resolve_beat(index, id)).collect()
}

/// Resolve one beat ID. Unknown beats and beats whose notes all fail to
/// resolve are rests.
fn resolve_beat(index: &ReferenceIndex, beat_id: &str) -> BeatSlot {
    let Some(note_ids) = index.beat(beat_id) else {
        log::debug!("Beat '{beat_id}' not found, emitting rest");
        return BeatSlot::rest();
    };

    let notes = note_ids
        .iter()
        .filter_map(|id| {
            let note = index.note(id);
            if note.is_none() {
                log::debug!("Note '{id}' in beat '{beat_id}' not found, dropping");
            }
            note
        })
        .collect();

    BeatSlot { notes }
}

/// `<InstrumentSet><Type>drumKit</Type>` or a primary MIDI channel of 9.
fn is_percussion(track: &Node) -> bool {
    let drum_kit = child(track, "InstrumentSet")
        .and_then(|set| child(&set, "Type"))
        .and_then(|t| text(&t))
        .is_some_and(|t| t.eq_ignore_ascii_case("drumKit"));

    let drum_channel = child(track, "MidiConnection")
        .and_then(|conn| child(&conn, "PrimaryChannel"))
        .and_then(|ch| parse_i32(&ch))
        == Some(PERCUSSION_CHANNEL);

    drum_kit || drum_channel
}
