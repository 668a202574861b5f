//! Document chunking for embedding.
//!
//! Splits redacted document text into chunks suitable for embedding:
//!
//! - Markdown is parsed with ast-grep over tree-sitter-md and split at ATX
//!   and setext headings and thematic breaks, with the heading hierarchy
//!   kept as a `section_path` breadcrumb. Code blocks are never split on.
//! - Every other format is split at double blank lines.
//! - Sections longer than [`ChunkOptions::max_chars`] are sub-chunked with
//!   [`ChunkOptions::overlap_chars`] of overlap, breaking at a paragraph, then
//!   a line, then an exact character position.
//! - Whitespace-only chunks are skipped.
//!
//! The `content` field stores raw text only. The pipeline builds the
//! embedding input (`"{title}: {content}"`).

use ast_grep_core::matcher::KindMatcher;
use pmo_config::IngestConfig;
use pmo_core::enums::DocumentFormat;

use crate::parser::{MarkdownLang, parse_markdown};

/// Size limits for chunking, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkOptions {
    pub max_chars: usize,
    pub overlap_chars: usize,
}

impl ChunkOptions {
    /// Build options, forcing `max_chars >= 1` and `overlap_chars < max_chars`.
    #[must_use]
    pub fn new(max_chars: usize, overlap_chars: usize) -> Self {
        let max_chars = max_chars.max(1);
        Self {
            max_chars,
            overlap_chars: overlap_chars.min(max_chars - 1),
        }
    }
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self::new(2048, 200)
    }
}

impl From<&IngestConfig> for ChunkOptions {
    fn from(config: &IngestConfig) -> Self {
        Self::new(config.max_chunk_chars, config.overlap_chars)
    }
}

/// A single chunk of a document, ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Nearest heading text, or `None` for the preamble and non-markdown text.
    pub title: Option<String>,

    /// Full breadcrumb path through the heading hierarchy.
    ///
    /// Example: `["Cutover", "Payroll", "Parallel run"]`.
    pub section_path: Vec<String>,

    pub content: String,

    /// Zero-based index of this chunk within the document.
    pub chunk_index: u32,

    pub source_file: String,

    /// Byte offset of `content` in the chunked text.
    pub byte_offset: usize,

    /// Character length of `content`.
    pub char_len: usize,
}

/// Chunk a document into embedding-ready pieces.
///
/// The format is detected from `source_file`; only markdown gets heading
/// structure.
///
/// # Examples
///
/// ```
/// use pmo_ingest::chunker::{ChunkOptions, chunk_document};
///
/// let md = "# Status\n\nOn track.\n\n## Risks\n\nData migration slip.\n";
/// let chunks = chunk_document(md, "weekly.md", &ChunkOptions::default());
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[0].title.as_deref(), Some("Status"));
/// assert_eq!(chunks[1].section_path, vec!["Status", "Risks"]);
/// ```
#[must_use]
pub fn chunk_document(content: &str, source_file: &str, options: &ChunkOptions) -> Vec<TextChunk> {
    let sections = match DocumentFormat::from_file_name(source_file) {
        Some(DocumentFormat::Markdown) => split_markdown(content),
        _ => split_by_double_blanks(content),
    };

    let mut chunks = Vec::new();
    let mut chunk_index = 0u32;

    for section in &sections {
        let trimmed = section.body.trim();
        if trimmed.is_empty() {
            continue;
        }
        let leading = section.body.len() - section.body.trim_start().len();

        for sub in split_to_max_size(trimmed, section.byte_offset + leading, options) {
            if sub.text.trim().is_empty() {
                continue;
            }
            chunks.push(TextChunk {
                title: section.title.clone(),
                section_path: section.path.clone(),
                char_len: sub.text.chars().count(),
                content: sub.text,
                chunk_index,
                source_file: source_file.to_string(),
                byte_offset: sub.byte_offset,
            });
            chunk_index += 1;
        }
    }

    chunks
}

// ── Internal types ───────────────────────────────────────────

struct Section<'a> {
    title: Option<String>,
    path: Vec<String>,
    body: &'a str,
    byte_offset: usize,
}

struct SubChunk {
    text: String,
    byte_offset: usize,
}

/// `line_offsets[i]` is the byte offset of line `i`; a sentinel equal to
/// `content.len()` is always last.
fn build_line_offsets(content: &str) -> Vec<usize> {
    let mut offsets = vec![0usize];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            offsets.push(i + 1);
        }
    }
    if offsets.last().copied() != Some(content.len()) {
        offsets.push(content.len());
    }
    offsets
}

fn slice<'a>(content: &'a str, start: usize, end: usize) -> &'a str {
    content.get(start..end).unwrap_or_default()
}

// ── Markdown (ast-grep) ──────────────────────────────────────

/// A heading or thematic break found in the markdown tree.
struct MdMarker {
    /// Byte offset of the line the marker starts on.
    line_start: usize,
    /// Byte offset of the first line after the marker.
    body_start: usize,
    /// `None` for a thematic break.
    heading: Option<(usize, String)>,
}

/// Split markdown at headings and thematic breaks found by ast-grep's
/// `KindMatcher` over the tree-sitter-md block grammar. Code blocks parse as
/// their own nodes, so a `#` line inside a fence is never a heading.
fn split_markdown(content: &str) -> Vec<Section<'_>> {
    let tree = parse_markdown(content);
    let root = tree.root();
    let line_offsets = build_line_offsets(content);

    let mut markers: Vec<MdMarker> = Vec::new();
    for kind in ["atx_heading", "setext_heading", "thematic_break"] {
        for node in root.find_all(KindMatcher::new(kind, MarkdownLang)) {
            let raw = node.text();
            let range = node.range();
            let visible_end = range.start + raw.trim_end().len();
            let heading = (kind != "thematic_break").then(|| {
                let level = node
                    .children()
                    .find_map(|child| heading_level(child.kind().as_ref()))
                    .unwrap_or(1);
                (level, heading_title(&raw, kind == "setext_heading"))
            });
            markers.push(MdMarker {
                line_start: line_start_of(&line_offsets, range.start),
                body_start: next_line_after(&line_offsets, visible_end, content.len()),
                heading,
            });
        }
    }
    markers.sort_by_key(|m| m.line_start);

    let mut sections = Vec::new();
    let mut heading_stack: Vec<(usize, String)> = Vec::new();
    let mut title: Option<String> = None;
    let mut body_start = 0usize;

    for marker in markers {
        if marker.line_start < body_start {
            continue;
        }
        sections.push(Section {
            title: title.clone(),
            path: section_path(&heading_stack),
            body: slice(content, body_start, marker.line_start),
            byte_offset: body_start,
        });
        if let Some((level, text)) = marker.heading {
            while heading_stack.last().is_some_and(|(l, _)| *l >= level) {
                heading_stack.pop();
            }
            heading_stack.push((level, text.clone()));
            title = Some(text);
        }
        body_start = marker.body_start;
    }

    sections.push(Section {
        title,
        path: section_path(&heading_stack),
        body: slice(content, body_start, content.len()),
        byte_offset: body_start,
    });

    sections
}

/// Heading level from a marker child (`atx_h2_marker`, `setext_h1_underline`, ...).
fn heading_level(kind: &str) -> Option<usize> {
    let digit = kind
        .strip_prefix("atx_h")
        .and_then(|rest| rest.strip_suffix("_marker"))
        .or_else(|| {
            kind.strip_prefix("setext_h")
                .and_then(|rest| rest.strip_suffix("_underline"))
        })?;
    digit.parse().ok().filter(|level| (1..=6).contains(level))
}

/// Title text of a heading node. ATX headings drop their `#` runs; setext
/// headings drop the underline and join wrapped title lines.
fn heading_title(raw: &str, setext: bool) -> String {
    if setext {
        let lines: Vec<&str> = raw.trim_end().lines().collect();
        let text_lines = lines.len().saturating_sub(1);
        return lines[..text_lines]
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join(" ");
    }
    raw.lines()
        .next()
        .unwrap_or_default()
        .trim()
        .trim_start_matches('#')
        .trim_end_matches('#')
        .trim()
        .to_string()
}

fn line_start_of(line_offsets: &[usize], byte: usize) -> usize {
    let idx = line_offsets.partition_point(|&offset| offset <= byte);
    line_offsets[idx.saturating_sub(1)]
}

fn next_line_after(line_offsets: &[usize], byte: usize, len: usize) -> usize {
    let idx = line_offsets.partition_point(|&offset| offset <= byte);
    line_offsets.get(idx).copied().unwrap_or(len)
}

fn section_path(heading_stack: &[(usize, String)]) -> Vec<String> {
    heading_stack
        .iter()
        .map(|(_, title)| title.clone())
        .collect()
}

// ── Plain text ───────────────────────────────────────────────

/// Split content at runs of two or more blank lines.
fn split_by_double_blanks(content: &str) -> Vec<Section<'_>> {
    let line_offsets = build_line_offsets(content);
    let mut sections = Vec::new();
    let mut start = 0usize;
    let mut blank_run = 0u32;

    for (idx, line) in content.lines().enumerate() {
        if !line.trim().is_empty() {
            blank_run = 0;
            continue;
        }
        blank_run += 1;
        if blank_run < 2 {
            continue;
        }

        let line_start = line_offsets.get(idx).copied().unwrap_or(content.len());
        let body = slice(content, start, line_start);
        if !body.trim().is_empty() {
            sections.push(Section {
                title: None,
                path: Vec::new(),
                body,
                byte_offset: start,
            });
        }
        start = line_offsets
            .get(idx + 1)
            .copied()
            .unwrap_or(content.len());
    }

    sections.push(Section {
        title: None,
        path: Vec::new(),
        body: slice(content, start, content.len()),
        byte_offset: start,
    });

    sections
}

// ── Sub-chunking with overlap ────────────────────────────────

/// Split text into sub-chunks of at most `max_chars` characters, repeating
/// `overlap_chars` characters between neighbours.
///
/// Split points are the last paragraph break (`\n\n`) in the overlap zone,
/// then the last line break, then the exact limit.
fn split_to_max_size(text: &str, base_byte_offset: usize, options: &ChunkOptions) -> Vec<SubChunk> {
    let max = options.max_chars;
    let overlap = options.overlap_chars;

    // `char_starts[i]` is the byte offset of char `i`; the last entry is `text.len()`.
    let char_starts: Vec<usize> = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .collect();
    let total_chars = char_starts.len() - 1;

    let sub_chunk = |from: usize, to: usize| SubChunk {
        text: text[char_starts[from]..char_starts[to]].to_string(),
        byte_offset: base_byte_offset + char_starts[from],
    };

    if total_chars <= max {
        return vec![sub_chunk(0, total_chars)];
    }

    let mut sub_chunks = Vec::new();
    let mut start = 0usize;

    loop {
        if total_chars - start <= max {
            sub_chunks.push(sub_chunk(start, total_chars));
            break;
        }

        let zone_start = start + (max - overlap);
        let zone_end = start + max;
        let split_at = last_break(text, &char_starts, zone_start, zone_end).unwrap_or(zone_end);
        sub_chunks.push(sub_chunk(start, split_at));

        let next = split_at.saturating_sub(overlap);
        start = if next > start { next } else { split_at };
    }

    sub_chunks
}

/// Char index just after the last paragraph break in chars `from..to`, or
/// after the last line break when the zone has no paragraph break.
fn last_break(text: &str, char_starts: &[usize], from: usize, to: usize) -> Option<usize> {
    let zone_offset = char_starts[from];
    let zone = &text[zone_offset..char_starts[to]];
    let cut = zone
        .rfind("\n\n")
        .map(|i| i + 2)
        .or_else(|| zone.rfind('\n').map(|i| i + 1))?;
    char_starts.binary_search(&(zone_offset + cut)).ok()
}
