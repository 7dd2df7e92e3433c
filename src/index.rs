//! Reference index — ID lookup tables for the Note, Beat and Voice
//! elements of a GPIF document.
//!
//! GPIF describes a score as a graph: bars point at voices, voices at
//! beats, beats at notes, all by string ID. The index is built in one pass
//! over the whole document and never mutated afterwards; resolution happens
//! separately in [`crate::walker`].

use std::collections::{HashMap, HashSet};

use roxmltree::{Document, Node};

/// Fret and string of a note, as stored in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteDescriptor {
    pub fret: i32,
    pub string: i32,
}

impl Default for NoteDescriptor {
    fn default() -> Self {
        Self { fret: 0, string: 1 }
    }
}

/// Immutable lookup tables for one document.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    notes: HashMap<String, NoteDescriptor>,
    beats: HashMap<String, Vec<String>>,
    voices: HashMap<String, Vec<String>>,
}

impl ReferenceIndex {
    /// Index every `Note`, `Beat` and `Voice` element in the document,
    /// wherever it sits in the tree.
    ///
    /// Never fails: elements without an `id` are skipped and missing
    /// properties fall back to defaults.
    pub fn build(doc: &Document) -> Self {
        let mut index = Self::default();

        for node in doc.descendants().filter(|n| n.is_element()) {
            let Some(id) = node.attribute("id") else {
                continue;
            };
            match node.tag_name().name() {
                "Note" => index.insert_note(id, parse_note(&node)),
                "Beat" => index.insert_beat(id, parse_beat_notes(&node)),
                "Voice" => index.insert_voice(id, parse_voice_beats(&node)),
                _ => {}
            }
        }

        log::debug!(
            "Indexed {} notes, {} beats, {} voices",
            index.notes.len(),
            index.beats.len(),
            index.voices.len()
        );
        index
    }

    pub fn insert_note(&mut self, id: impl Into<String>, note: NoteDescriptor) {
        let id = id.into();
        if self.notes.insert(id.clone(), note).is_some() {
            log::warn!("Duplicate Note id '{id}', keeping the last one");
        }
    }

    pub fn insert_beat(&mut self, id: impl Into<String>, note_ids: Vec<String>) {
        let id = id.into();
        if self.beats.insert(id.clone(), note_ids).is_some() {
            log::warn!("Duplicate Beat id '{id}', keeping the last one");
        }
    }

    pub fn insert_voice(&mut self, id: impl Into<String>, beat_ids: Vec<String>) {
        let id = id.into();
        if self.voices.insert(id.clone(), beat_ids).is_some() {
            log::warn!("Duplicate Voice id '{id}', keeping the last one");
        }
    }

    pub fn note(&self, id: &str) -> Option<NoteDescriptor> {
        self.notes.get(id).copied()
    }

    /// Note IDs of a beat. An empty slice is a rest.
    pub fn beat(&self, id: &str) -> Option<&[String]> {
        self.beats.get(id).map(Vec::as_slice)
    }

    /// Beat IDs of a voice, in document order.
    pub fn voice(&self, id: &str) -> Option<&[String]> {
        self.voices.get(id).map(Vec::as_slice)
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    pub fn beat_count(&self) -> usize {
        self.beats.len()
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }
}

// ─── Note ────────────────────────────────────────────────────────────

/// Read `<Properties><Property name="Fret"><Fret>n</Fret></Property>…`.
fn parse_note(node: &Node) -> NoteDescriptor {
    let mut note = NoteDescriptor::default();

    let Some(props) = child(node, "Properties") else {
        return note;
    };
    for prop in children(&props, "Property") {
        match prop.attribute("name") {
            Some("Fret") => {
                if let Some(fret) = child(&prop, "Fret").and_then(|n| parse_i32(&n)) {
                    note.fret = fret;
                }
            }
            Some("String") => {
                if let Some(string) = child(&prop, "String").and_then(|n| parse_i32(&n)) {
                    note.string = string;
                }
            }
            _ => {}
        }
    }

    note
}

// ─── Beat ────────────────────────────────────────────────────────────

/// Collect the note IDs of a beat from all three encodings documents use:
/// an inline `<Notes>0 1 2</Notes>` list, `<NoteRef ref=".."/>` elements,
/// and `<Note id="..">` children. First-seen order, no duplicates.
fn parse_beat_notes(node: &Node) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    let mut push = |id: &str| {
        if seen.insert(id.to_string()) {
            ids.push(id.to_string());
        }
    };

    if let Some(notes) = child(node, "Notes") {
        id_list(&notes).for_each(&mut push);
    }

    for note_ref in node
        .descendants()
        .skip(1)
        .filter(|n| n.is_element() && n.tag_name().name() == "NoteRef")
    {
        if let Some(id) = note_ref.attribute("ref") {
            push(id);
        }
    }

    for note in children(node, "Note") {
        if let Some(id) = note.attribute("id") {
            push(id);
        }
    }

    ids
}

// ─── Voice ───────────────────────────────────────────────────────────

/// Beat IDs of a voice in document order, duplicates kept.
fn parse_voice_beats(node: &Node) -> Vec<String> {
    let Some(beats) = child(node, "Beats") else {
        return Vec::new();
    };

    let mut ids: Vec<String> = id_list(&beats).map(String::from).collect();
    ids.extend(
        children(&beats, "BeatRef")
            .filter_map(|r| r.attribute("ref"))
            .map(String::from),
    );
    ids
}

// ─── Helpers ─────────────────────────────────────────────────────────

/// First element child with the given tag name.
pub(crate) fn child<'a, 'input>(node: &Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

/// All element children with the given tag name, in document order.
pub(crate) fn children<'a, 'input: 'a>(
    node: &Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Trimmed text content of an element, if any.
pub(crate) fn text<'a>(node: &Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|t| !t.is_empty())
}

/// Whitespace-separated IDs in an element's own text.
fn id_list<'a>(node: &Node<'a, '_>) -> impl Iterator<Item = &'a str> {
    node.text().unwrap_or("").split_whitespace()
}

pub(crate) fn parse_i32(node: &Node) -> Option<i32> {
    node.text()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index_of(xml: &str) -> ReferenceIndex {
        let doc = Document::parse(xml).unwrap();
        ReferenceIndex::build(&doc)
    }

    #[test]
    fn note_reads_fret_and_string_properties() {
        let index = index_of(
            r#"<GPIF><Notes>
                <Note id="n1"><Properties>
                    <Property name="String"><String>2</String></Property>
                    <Property name="Fret"><Fret>7</Fret></Property>
                </Properties></Note>
            </Notes></GPIF>"#,
        );
        assert_eq!(index.note("n1"), Some(NoteDescriptor { fret: 7, string: 2 }));
    }

    #[test]
    fn note_without_properties_gets_defaults() {
        let index = index_of(
            r#"<GPIF>
                <Note id="bare"/>
                <Note id="partial"><Properties>
                    <Property name="Fret"><Fret>12</Fret></Property>
                </Properties></Note>
                <Note id="junk"><Properties>
                    <Property name="Fret"><Fret>twelve</Fret></Property>
                </Properties></Note>
            </GPIF>"#,
        );
        assert_eq!(index.note("bare"), Some(NoteDescriptor { fret: 0, string: 1 }));
        assert_eq!(index.note("partial"), Some(NoteDescriptor { fret: 12, string: 1 }));
        assert_eq!(index.note("junk"), Some(NoteDescriptor { fret: 0, string: 1 }));
    }

    #[test]
    fn note_without_id_is_not_indexed() {
        let index = index_of(r#"<GPIF><Note/><Note id="a"/></GPIF>"#);
        assert_eq!(index.note_count(), 1);
    }

    #[test]
    fn beat_merges_all_three_encodings() {
        let index = index_of(
            r#"<GPIF><Beats>
                <Beat id="b1">
                    <Notes>3 1</Notes>
                    <NoteRefs><NoteRef ref="4"/><NoteRef ref="3"/></NoteRefs>
                    <Note id="9"/>
                    <Note id="1"/>
                </Beat>
            </Beats></GPIF>"#,
        );
        let ids: Vec<&str> = index.beat("b1").unwrap().iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["3", "1", "4", "9"]);
    }

    #[test]
    fn beat_without_notes_is_a_rest() {
        let index = index_of(r#"<GPIF><Beat id="r"><Rhythm ref="0"/></Beat></GPIF>"#);
        assert_eq!(index.beat("r"), Some(&[][..]));
    }

    #[test]
    fn nested_notes_are_indexed_as_notes_too() {
        let index = index_of(
            r#"<GPIF><Beat id="b"><Note id="n"><Properties>
                <Property name="Fret"><Fret>2</Fret></Property>
            </Properties></Note></Beat></GPIF>"#,
        );
        assert_eq!(index.note("n").map(|n| n.fret), Some(2));
        assert_eq!(index.beat("b").map(<[String]>::len), Some(1));
    }

    #[test]
    fn voice_keeps_beat_order_and_dangling_refs() {
        let index = index_of(
            r#"<GPIF>
                <Voice id="v1"><Beats>
                    <BeatRef ref="b2"/><BeatRef ref="b1"/><BeatRef ref="missing"/><BeatRef ref="b2"/>
                </Beats></Voice>
                <Beat id="b1"/><Beat id="b2"/>
            </GPIF>"#,
        );
        let ids: Vec<&str> = index.voice("v1").unwrap().iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["b2", "b1", "missing", "b2"]);
    }

    #[test]
    fn voice_accepts_inline_beat_list() {
        let index = index_of(r#"<GPIF><Voice id="v"><Beats>0 1 2</Beats></Voice></GPIF>"#);
        assert_eq!(index.voice("v").map(<[String]>::len), Some(3));
    }

    #[test]
    fn voice_ref_is_not_a_voice() {
        let index = index_of(r#"<GPIF><Voices><VoiceRef ref="v1"/></Voices></GPIF>"#);
        assert_eq!(index.voice_count(), 0);
    }

    #[test]
    fn duplicate_id_keeps_last() {
        let index = index_of(
            r#"<GPIF>
                <Note id="n"><Properties><Property name="Fret"><Fret>1</Fret></Property></Properties></Note>
                <Note id="n"><Properties><Property name="Fret"><Fret>2</Fret></Property></Properties></Note>
            </GPIF>"#,
        );
        assert_eq!(index.note("n").map(|n| n.fret), Some(2));
    }

    #[test]
    fn index_can_be_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReferenceIndex>();
    }

    #[test]
    fn lookup_miss_is_none() {
        let index = ReferenceIndex::default();
        assert_eq!(index.note("x"), None);
        assert_eq!(index.beat("x"), None);
        assert_eq!(index.voice("x"), None);
    }
}
