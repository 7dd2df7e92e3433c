//! Event normalizer — turns either ingestion path into the canonical
//! [`Track`] model.
//!
//! Both adapters apply the same track-level filter: percussion tracks, and
//! tracks left without measures once the silent-measure policy has run,
//! come back as `None`.

use std::collections::BTreeSet;

use crate::legacy::{LegacyNote, LegacyTrack};
use crate::model::{Beat, Measure, Modifier, NoteEvent, Track};
use crate::options::{PipelineOptions, SilentMeasurePolicy};
use crate::walker::{BeatSlot, WalkedTrack};

/// Normalize a walked GPIF track. `position` is the 1-based index of the
/// track in the source document.
///
/// GPIF notes reaching this stage carry only fret and string, so velocity
/// and duration take their defaults and no modifiers are set.
pub fn normalize_walked(
    walked: &WalkedTrack,
    position: usize,
    options: &PipelineOptions,
) -> Option<Track> {
    let measures = walked
        .bars
        .iter()
        .enumerate()
        .map(|(i, slots)| Measure {
            index: i + 1,
            beats: number_beats(slots.iter().map(slot_notes)),
        });

    finish_track(
        position,
        walked.name.clone(),
        walked.is_percussion,
        measures,
        options,
    )
}

/// Normalize a legacy track. Beats of all voices in a measure are
/// concatenated in voice order; velocity, duration and articulation flags
/// are copied as-is.
pub fn normalize_legacy(
    track: &LegacyTrack,
    position: usize,
    options: &PipelineOptions,
) -> Option<Track> {
    let name = if track.name.trim().is_empty() {
        format!("Track {position}")
    } else {
        track.name.clone()
    };

    let measures = track.measures.iter().enumerate().map(|(i, measure)| {
        let beats = measure.voices.iter().flat_map(|v| &v.beats).map(|beat| {
            beat.notes
                .iter()
                .map(|note| legacy_note(note, beat.duration_ticks))
                .collect::<Vec<_>>()
        });
        Measure {
            index: i + 1,
            beats: number_beats(beats),
        }
    });

    finish_track(position, name, track.is_percussion, measures, options)
}

fn slot_notes(slot: &BeatSlot) -> Vec<NoteEvent> {
    slot.notes
        .iter()
        .map(|d| NoteEvent::new(d.fret, d.string))
        .collect()
}

fn legacy_note(note: &LegacyNote, beat_duration: i32) -> NoteEvent {
    let flags = [
        (note.hammer_on, Modifier::HammerOn),
        (note.pull_off, Modifier::PullOff),
        (note.slide, Modifier::Slide),
        (note.bend, Modifier::Bend),
        (note.muted, Modifier::Mute),
        (note.vibrato, Modifier::Vibrato),
    ];
    let modifiers: BTreeSet<Modifier> = flags
        .into_iter()
        .filter_map(|(set, modifier)| set.then_some(modifier))
        .collect();

    NoteEvent {
        string: note.string,
        fret: note.fret,
        velocity: note.velocity,
        duration_ticks: note.duration_ticks.unwrap_or(beat_duration),
        modifiers,
    }
}

fn number_beats(notes: impl Iterator<Item = Vec<NoteEvent>>) -> Vec<Beat> {
    notes
        .enumerate()
        .map(|(i, notes)| Beat { index: i + 1, notes })
        .collect()
}

/// Apply the silent-measure policy and the track-level exclusions.
fn finish_track(
    index: usize,
    name: String,
    is_percussion: bool,
    measures: impl Iterator<Item = Measure>,
    options: &PipelineOptions,
) -> Option<Track> {
    if is_percussion {
        log::debug!("Skipping percussion track {index} '{name}'");
        return None;
    }

    let measures: Vec<Measure> = match options.silent_measures {
        SilentMeasurePolicy::Drop => measures.filter(|m| !m.is_silent()).collect(),
        SilentMeasurePolicy::KeepAsRest => measures.collect(),
    };

    if measures.is_empty() {
        log::debug!("Skipping track {index} '{name}': no measures");
        return None;
    }

    Some(Track {
        index,
        name,
        is_percussion,
        measures,
    })
}
