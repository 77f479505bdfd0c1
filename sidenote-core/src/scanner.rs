//! Marker scanning for a single text run.
//!
//! Marker syntax is `[[mode:key|display text]]`:
//! - `mode` is one of `term`, `ref`, `link`
//! - `key` matches `[a-z0-9_-]+`
//! - `display text` is one or more characters other than `]`
//!
//! There is no escaping. The first `]]` after the `|` closes the marker, and a
//! lone `]` inside the display text means the opener does not form a marker
//! at all; the text is then left as-is. A `|` after the first one is ordinary
//! display text.
//!
//! The scanner is a linear state machine over bytes. All delimiters are
//! ASCII, so every slice boundary it produces is a char boundary.

use crate::model::{Mode, TextRange};

/// A raw marker occurrence inside one text run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub mode: Mode,
    pub key: String,
    pub display_text: String,
    /// Byte range of the whole `[[...]]` token
    pub range: TextRange,
}

/// One piece of a scanned text run, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Marker(Marker),
}

#[derive(Debug, Clone, Copy)]
enum State {
    ReadingMode { start: usize },
    ReadingKey { mode: Mode, start: usize },
    ReadingDisplay { mode: Mode, key: TextRange, start: usize },
}

const OPENER: &str = "[[";

fn is_key_byte(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_')
}

/// Cheap pre-check: text without `[[` can never contain a marker
pub fn may_contain_marker(text: &str) -> bool {
    text.contains(OPENER)
}

/// Split `text` into literal spans and markers.
///
/// Literal spans are never empty, and concatenating every span with the raw
/// marker tokens reproduces `text` exactly.
pub fn scan(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    let mut literal_start = 0;

    while let Some(found) = text[cursor..].find(OPENER) {
        let open = cursor + found;
        match read_marker(text, open) {
            Ok(marker) => {
                if open > literal_start {
                    segments.push(Segment::Text(&text[literal_start..open]));
                }
                cursor = marker.range.end_offset;
                literal_start = cursor;
                segments.push(Segment::Marker(marker));
            }
            Err(resume) => cursor = resume,
        }
    }

    if literal_start < text.len() {
        segments.push(Segment::Text(&text[literal_start..]));
    }
    segments
}

/// Markers only, in document order
pub fn find_markers(text: &str) -> Vec<Marker> {
    scan(text)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Marker(marker) => Some(marker),
            Segment::Text(_) => None,
        })
        .collect()
}

/// Try to read one marker whose `[[` starts at `open`.
///
/// On failure returns the offset to resume searching from. Every opener
/// between `open` and that offset is guaranteed to fail the same way, so the
/// overall scan stays linear.
fn read_marker(text: &str, open: usize) -> Result<Marker, usize> {
    let bytes = text.as_bytes();
    let mut pos = open + OPENER.len();
    let mut state = State::ReadingMode { start: pos };

    loop {
        let Some(&b) = bytes.get(pos) else {
            return Err(bytes.len());
        };

        state = match state {
            State::ReadingMode { start } => match b {
                b'a'..=b'z' => {
                    pos += 1;
                    continue;
                }
                b':' => match Mode::from_marker(&text[start..pos]) {
                    Some(mode) => State::ReadingKey {
                        mode,
                        start: pos + 1,
                    },
                    None => return Err(resume_after(bytes, open, pos)),
                },
                _ => return Err(resume_after(bytes, open, pos)),
            },
            State::ReadingKey { mode, start } => match b {
                b if is_key_byte(b) => {
                    pos += 1;
                    continue;
                }
                b'|' if pos > start => State::ReadingDisplay {
                    mode,
                    key: TextRange::new(start, pos),
                    start: pos + 1,
                },
                _ => return Err(resume_after(bytes, open, pos)),
            },
            State::ReadingDisplay { mode, key, start } => {
                if b != b']' {
                    pos += 1;
                    continue;
                }
                if pos > start && bytes.get(pos + 1) == Some(&b']') {
                    return Ok(Marker {
                        mode,
                        key: text[key.start_offset..key.end_offset].to_string(),
                        display_text: text[start..pos].to_string(),
                        range: TextRange::new(open, pos + 2),
                    });
                }
                return Err(resume_after(bytes, open, pos));
            }
        };
        pos += 1;
    }
}

/// Resume offset after a failed read that stopped at `pos`. If the byte at
/// `pos` is a `[` preceded by another `[`, a new opener may start one byte
/// earlier (`[[[term:...`).
fn resume_after(bytes: &[u8], open: usize, pos: usize) -> usize {
    let resume = if bytes.get(pos) == Some(&b'[') {
        pos - 1
    } else {
        pos
    };
    resume.max(open + 1)
}
