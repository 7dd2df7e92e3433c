//! VexTab notation writer.
//!
//! Output grammar, one token per beat:
//!
//! ```text
//! ##                 rest
//! 5/3                fret 5 on string 3
//! 5/3(hv)            with hammer-on and vibrato (order: h p s b x v)
//! (5/2.7/3.9/4)      chord, never with modifiers
//! ```
//!
//! Beats of a measure are joined by spaces, measures by `" | "`, four
//! measures per `notes` line, each line preceded by a stave declaration.

use crate::model::{Beat, Measure, Track};

/// Token for a beat or a measure with nothing to play.
pub const REST: &str = "##";
/// Header line opening each group of measures.
pub const STAVE_DECLARATION: &str = "tabstave notation=true";
/// Measures per `notes` line.
pub const MEASURES_PER_LINE: usize = 4;

/// Keywords that must always start a line.
const LINE_KEYWORDS: [&str; 2] = ["tabstave", "notes"];

/// Render a whole track. The result ends with a newline.
pub fn serialize(track: &Track) -> String {
    let measures: Vec<String> = track.measures.iter().map(measure_text).collect();

    let mut text = String::new();
    for group in measures.chunks(MEASURES_PER_LINE) {
        text.push_str(STAVE_DECLARATION);
        text.push('\n');
        text.push_str("notes ");
        text.push_str(&group.join(" | "));
        text.push('\n');
    }

    normalize_lines(&text)
}

/// Beat tokens of one measure joined by spaces.
pub fn measure_text(measure: &Measure) -> String {
    if measure.beats.is_empty() {
        return REST.to_string();
    }
    measure
        .beats
        .iter()
        .map(beat_token)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn beat_token(beat: &Beat) -> String {
    match beat.notes.as_slice() {
        [] => REST.to_string(),
        [note] => {
            let mut token = format!("{}/{}", note.fret, note.string);
            if !note.modifiers.is_empty() {
                token.push('(');
                token.extend(note.modifiers.iter().map(|m| m.symbol()));
                token.push(')');
            }
            token
        }
        notes => {
            let pairs: Vec<String> = notes
                .iter()
                .map(|n| format!("{}/{}", n.fret, n.string))
                .collect();
            format!("({})", pairs.join("."))
        }
    }
}

/// Put every `notes`/`tabstave` keyword at the start of its own line,
/// trim each line and drop blank ones. VexTab rejects a keyword that does
/// not open a line.
pub fn normalize_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    for line in text.lines().flat_map(split_at_keywords) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn split_at_keywords(line: &str) -> Vec<&str> {
    let mut cuts: Vec<usize> = LINE_KEYWORDS
        .iter()
        .flat_map(|kw| line.match_indices(kw).map(|(pos, _)| pos))
        .filter(|&pos| pos > 0)
        .collect();
    cuts.push(0);
    cuts.push(line.len());
    cuts.sort_unstable();
    cuts.dedup();

    cuts.windows(2).map(|w| &line[w[0]..w[1]]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Modifier, NoteEvent};
    use pretty_assertions::assert_eq;

    fn beat(notes: Vec<NoteEvent>) -> Beat {
        Beat { index: 1, notes }
    }

    fn track_of(measures: usize) -> Track {
        Track {
            index: 1,
            name: "Guitar".to_string(),
            is_percussion: false,
            measures: (1..=measures)
                .map(|i| Measure {
                    index: i,
                    beats: vec![beat(vec![NoteEvent::new(i as i32, 1)])],
                })
                .collect(),
        }
    }

    #[test]
    fn rest_token() {
        assert_eq!(beat_token(&beat(vec![])), "##");
    }

    #[test]
    fn single_note_without_modifiers_has_no_parentheses() {
        assert_eq!(beat_token(&beat(vec![NoteEvent::new(12, 6)])), "12/6");
    }

    #[test]
    fn modifiers_follow_fixed_order() {
        let note = NoteEvent::new(5, 3)
            .with_modifier(Modifier::Vibrato)
            .with_modifier(Modifier::Mute)
            .with_modifier(Modifier::Slide)
            .with_modifier(Modifier::PullOff)
            .with_modifier(Modifier::Bend)
            .with_modifier(Modifier::HammerOn);
        assert_eq!(beat_token(&beat(vec![note])), "5/3(hpsbxv)");

        let note = NoteEvent::new(5, 3)
            .with_modifier(Modifier::Vibrato)
            .with_modifier(Modifier::Slide);
        assert_eq!(beat_token(&beat(vec![note])), "5/3(sv)");
    }

    #[test]
    fn chord_keeps_order_and_drops_modifiers() {
        let chord = vec![
            NoteEvent::new(5, 2).with_modifier(Modifier::Bend),
            NoteEvent::new(7, 3),
            NoteEvent::new(9, 4).with_modifier(Modifier::Vibrato),
        ];
        assert_eq!(beat_token(&beat(chord)), "(5/2.7/3.9/4)");
    }

    #[test]
    fn measure_tokens_joined_by_space() {
        let measure = Measure {
            index: 1,
            beats: vec![beat(vec![NoteEvent::new(3, 2)]), beat(vec![])],
        };
        assert_eq!(measure_text(&measure), "3/2 ##");
    }

    #[test]
    fn empty_measure_is_rest() {
        assert_eq!(measure_text(&Measure { index: 1, beats: vec![] }), "##");
    }

    #[test]
    fn line_count_is_measures_over_four_rounded_up() {
        for m in 1..=13 {
            let text = serialize(&track_of(m));
            let notes_lines: Vec<&str> = text.lines().filter(|l| l.starts_with("notes")).collect();
            let staves = text.lines().filter(|l| *l == STAVE_DECLARATION).count();

            assert_eq!(notes_lines.len(), (m + 3) / 4, "M = {m}");
            assert_eq!(staves, notes_lines.len(), "M = {m}");

            let last = notes_lines.last().unwrap().split(" | ").count();
            let expected = if m % 4 == 0 { 4 } else { m % 4 };
            assert_eq!(last, expected, "M = {m}");
        }
    }

    #[test]
    fn layout_of_six_measures() {
        assert_eq!(
            serialize(&track_of(6)),
            "tabstave notation=true\n\
             notes 1/1 | 2/1 | 3/1 | 4/1\n\
             tabstave notation=true\n\
             notes 5/1 | 6/1\n"
        );
    }

    #[test]
    fn serialize_is_idempotent() {
        let track = track_of(9);
        assert_eq!(serialize(&track), serialize(&track));
    }

    #[test]
    fn normalize_splits_glued_keywords() {
        let glued = "  tabstave notation=truenotes 1/2 | 3/4notes ##\n\n\nnotes 5/5   ";
        assert_eq!(
            normalize_lines(glued),
            "tabstave notation=true\nnotes 1/2 | 3/4\nnotes ##\nnotes 5/5\n"
        );
    }

    #[test]
    fn normalize_leaves_clean_text_alone() {
        let clean = "tabstave notation=true\nnotes 0/1\n";
        assert_eq!(normalize_lines(clean), clean);
    }
}
