use std::fmt;
use roxmltree::{Document, Node, ParsingOptions};

use crate::errors::CaptionError;
use crate::html_entities;

// @module: Timed-text XML to SRT conversion

// @const: Start offset attribute (ms)
const START_ATTR: &str = "t";

// @const: Duration attribute (ms)
const DURATION_ATTR: &str = "d";

// @const: Seconds in a day, clock wraps past this
const SECONDS_PER_DAY: u64 = 86_400;

// @struct: Caption cue read from the XML body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionEntry {
    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms, may be lowered by overlap correction
    pub end_ms: u64,

    // @field: Normalized caption text
    pub text: String,
}

impl CaptionEntry {
    /// Creates an entry ending `duration_ms` after it starts
    pub fn new(start_ms: u64, duration_ms: u64, text: String) -> Self {
        CaptionEntry {
            start_ms,
            end_ms: start_ms.saturating_add(duration_ms),
            text,
        }
    }
}

// @struct: Numbered SRT block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleBlock {
    // @field: 1-based sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl fmt::Display for SubtitleBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", format_timestamp(self.start_ms), format_timestamp(self.end_ms))?;
        writeln!(f, "{}", self.text)
    }
}

/// Convert a timed-text XML caption track to SubRip text.
///
/// Fails without producing any output if the document is malformed, has no
/// `<body>`, or a non-empty caption node has no readable start offset.
pub fn convert(xml: &str) -> Result<String, CaptionError> {
    let mut entries = parse_captions(xml)?;
    correct_overlaps(&mut entries);
    Ok(render_srt(&to_blocks(entries)))
}

/// Parse the body's caption nodes into entries, in document order.
///
/// Nodes whose text is empty after trimming are skipped before their
/// attributes are read.
pub fn parse_captions(xml: &str) -> Result<Vec<CaptionEntry>, CaptionError> {
    // Internal DTD entity declarations are allowed
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(xml, options)
        .map_err(|e| CaptionError::Parse(e.to_string()))?;

    let body = document
        .root_element()
        .children()
        .find(|node| node.is_element() && node.tag_name().name() == "body")
        .ok_or(CaptionError::MissingBody)?;

    let mut entries = Vec::new();
    for (node_index, node) in body.children().filter(Node::is_element).enumerate() {
        let raw = collect_text(node);
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let start_ms = read_start(node, node_index)?;
        let duration_ms = node
            .attribute(DURATION_ATTR)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(0);

        entries.push(CaptionEntry::new(start_ms, duration_ms, normalize_text(trimmed)));
    }

    Ok(entries)
}

// @returns: All descendant text, depth-first
fn collect_text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn read_start(node: Node, node_index: usize) -> Result<u64, CaptionError> {
    let value = node.attribute(START_ATTR).ok_or(CaptionError::MissingAttribute {
        attribute: START_ATTR,
        node_index,
    })?;

    value.trim().parse::<u64>().map_err(|_| CaptionError::InvalidAttribute {
        attribute: START_ATTR,
        value: value.to_string(),
        node_index,
    })
}

/// Normalize caption text for a single SRT line.
///
/// Newlines become spaces and double spaces are collapsed in one pass (so
/// four spaces become two), then HTML character references are decoded,
/// semicolon-less legacy forms included.
pub fn normalize_text(raw: &str) -> String {
    let flattened = raw.replace('\n', " ").replace("  ", " ");
    html_entities::unescape(&flattened).into_owned()
}

/// Clamp each entry's end to the next entry's start.
///
/// One forward pass over adjacent pairs. Ends are only ever shortened and
/// entries are never reordered, so a cue that also overlaps the one after
/// its neighbour is left as is.
pub fn correct_overlaps(entries: &mut [CaptionEntry]) {
    for i in 1..entries.len() {
        let next_start = entries[i].start_ms;
        let current = &mut entries[i - 1];
        if current.end_ms > next_start {
            current.end_ms = next_start;
        }
    }
}

/// Number entries from 1 in their current order
pub fn to_blocks(entries: Vec<CaptionEntry>) -> Vec<SubtitleBlock> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| SubtitleBlock {
            seq_num: i + 1,
            start_ms: entry.start_ms,
            end_ms: entry.end_ms,
            text: entry.text,
        })
        .collect()
}

/// Join blocks with a blank line and drop trailing whitespace
pub fn render_srt(blocks: &[SubtitleBlock]) -> String {
    let rendered: Vec<String> = blocks.iter().map(|block| block.to_string()).collect();
    rendered.join("\n").trim_end().to_string()
}

/// Format milliseconds as an SRT timestamp (HH:MM:SS,mmm).
///
/// The clock part is read as time of day, so values of 24h or more wrap.
pub fn format_timestamp(ms: u64) -> String {
    let seconds = (ms / 1_000) % SECONDS_PER_DAY;
    let millis = ms % 1_000;

    format!(
        "{:02}:{:02}:{:02},{:03}",
        seconds / 3_600,
        (seconds % 3_600) / 60,
        seconds % 60,
        millis
    )
}
