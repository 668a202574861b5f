//! Text extraction from uploaded artifacts.
//!
//! Detects the format from the file extension, decodes UTF-8, and turns the
//! bytes into plain text ready for redaction. HTML is reduced to its visible
//! text; JSON is re-serialized pretty-printed so every field sits on its own
//! line for chunking.

use ast_grep_core::Node;
use pmo_core::enums::DocumentFormat;

use crate::error::IngestError;
use crate::parser::parse_html;

/// Plain text pulled out of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub format: DocumentFormat,
    pub text: String,
}

/// Extract plain text from `bytes`.
///
/// # Errors
///
/// - [`IngestError::TooLarge`] when `bytes` exceeds `max_file_bytes`
/// - [`IngestError::UnsupportedType`] for unknown extensions
/// - [`IngestError::InvalidUtf8`] when the content is not UTF-8
/// - [`IngestError::Malformed`] for JSON that does not parse
/// - [`IngestError::EmptyDocument`] when nothing but whitespace remains
pub fn extract_text(
    file_name: &str,
    bytes: &[u8],
    max_file_bytes: u64,
) -> Result<ExtractedText, IngestError> {
    let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
    if size > max_file_bytes {
        return Err(IngestError::TooLarge {
            size,
            limit: max_file_bytes,
        });
    }

    let format =
        DocumentFormat::from_file_name(file_name).ok_or_else(|| IngestError::UnsupportedType {
            file_name: file_name.to_string(),
        })?;

    let raw = std::str::from_utf8(bytes).map_err(|source| IngestError::InvalidUtf8 {
        file_name: file_name.to_string(),
        source,
    })?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let normalized = raw.replace("\r\n", "\n");

    let text = match format {
        DocumentFormat::Text | DocumentFormat::Markdown | DocumentFormat::Csv => normalized,
        DocumentFormat::Json => pretty_json(file_name, &normalized)?,
        DocumentFormat::Html => html_to_text(&normalized),
    };

    if text.trim().is_empty() {
        return Err(IngestError::EmptyDocument {
            file_name: file_name.to_string(),
        });
    }

    tracing::debug!(file_name, %format, chars = text.chars().count(), "extracted text");
    Ok(ExtractedText { format, text })
}

fn pretty_json(file_name: &str, raw: &str) -> Result<String, IngestError> {
    if raw.trim().is_empty() {
        return Ok(String::new());
    }
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| IngestError::Malformed {
            file_name: file_name.to_string(),
            reason: e.to_string(),
        })?;
    serde_json::to_string_pretty(&value).map_err(|e| IngestError::Malformed {
        file_name: file_name.to_string(),
        reason: e.to_string(),
    })
}

/// Reduce an HTML document to its visible text.
///
/// Walks the ast-grep HTML tree: scripts, styles and comments are dropped,
/// block elements become line breaks, and text and entity nodes are joined
/// with a space wherever the source had whitespace between them. Whitespace
/// inside each line is collapsed and runs of blank lines are limited to one.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let tree = parse_html(html);
    let mut visible = VisibleText {
        source: html,
        out: String::new(),
        last_end: None,
    };
    visible.visit(&tree.root());
    tidy_lines(&visible.out)
}

struct VisibleText<'s> {
    source: &'s str,
    out: String,
    /// Source byte offset where the last pushed text ended.
    last_end: Option<usize>,
}

impl VisibleText<'_> {
    fn visit<D: ast_grep_core::Doc>(&mut self, node: &Node<D>) {
        match node.kind().as_ref() {
            "script_element" | "style_element" | "comment" | "doctype" | "start_tag"
            | "end_tag" | "self_closing_tag" | "erroneous_end_tag" => {}
            "text" => self.push_inline(node.range(), &node.text()),
            "entity" => {
                let raw = node.text();
                let name = raw.trim_start_matches('&').trim_end_matches(';');
                let decoded = decode_entity(name).unwrap_or_else(|| raw.to_string());
                self.push_inline(node.range(), &decoded);
            }
            "element" => {
                let block = element_tag(node).is_some_and(|tag| is_block_tag(&tag));
                if block {
                    self.out.push('\n');
                }
                for child in node.children() {
                    self.visit(&child);
                }
                if block {
                    self.out.push('\n');
                }
            }
            _ => {
                for child in node.children() {
                    self.visit(&child);
                }
            }
        }
    }

    fn push_inline(&mut self, range: std::ops::Range<usize>, text: &str) {
        let spaced = self.last_end.is_some_and(|end| {
            self.source
                .get(end..range.start)
                .is_some_and(|gap| gap.chars().any(char::is_whitespace))
        });
        if spaced {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.last_end = Some(range.end);
    }
}

/// Lowercased tag name from an element's start or self-closing tag.
fn element_tag<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<String> {
    node.children()
        .find(|c| matches!(c.kind().as_ref(), "start_tag" | "self_closing_tag"))?
        .children()
        .find(|c| c.kind().as_ref() == "tag_name")
        .map(|name| name.text().to_ascii_lowercase())
}

fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div"
            | "br"
            | "hr"
            | "li"
            | "ul"
            | "ol"
            | "tr"
            | "table"
            | "thead"
            | "tbody"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "blockquote"
            | "pre"
    )
}

fn tidy_lines(text: &str) -> String {
    let mut out = String::new();
    let mut blank_pending = false;
    for line in text.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            blank_pending = !out.is_empty();
            continue;
        }
        if blank_pending {
            out.push_str("\n\n");
        } else if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&line);
        blank_pending = false;
    }
    out
}

fn decode_entity(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    let decoded = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        _ => return None,
    };
    Some(decoded.to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const LIMIT: u64 = 1024 * 1024;

    #[rstest]
    #[case("notes.txt", DocumentFormat::Text)]
    #[case("app.log", DocumentFormat::Text)]
    #[case("README.md", DocumentFormat::Markdown)]
    #[case("plan.markdown", DocumentFormat::Markdown)]
    #[case("raid.csv", DocumentFormat::Csv)]
    fn plain_formats_pass_through(#[case] file_name: &str, #[case] format: DocumentFormat) {
        let out = extract_text(file_name, b"line one\r\nline two\n", LIMIT).unwrap();
        assert_eq!(out.format, format);
        assert_eq!(out.text, "line one\nline two\n");
    }

    #[test]
    fn bom_is_stripped() {
        let out = extract_text("a.txt", "\u{feff}hello".as_bytes(), LIMIT).unwrap();
        assert_eq!(out.text, "hello");
    }

    #[test]
    fn json_is_pretty_printed() {
        let out = extract_text("tracker.json", br#"{"open":3,"owner":"Ana"}"#, LIMIT).unwrap();
        assert_eq!(out.format, DocumentFormat::Json);
        assert_eq!(out.text, "{\n  \"open\": 3,\n  \"owner\": \"Ana\"\n}");
    }

    #[test]
    fn malformed_json_rejected() {
        let err = extract_text("tracker.json", b"{\"owner\":", LIMIT).unwrap_err();
        assert!(matches!(err, IngestError::Malformed { .. }));
    }

    #[test]
    fn html_reduced_to_visible_text() {
        let html = "<html><head><style>p{color:red}</style>\
            <script>var ssn='123-45-6789';</script></head>\
            <body><h1>Status</h1><!-- draft --><p>Go-live &amp; cutover</p>\
            <p>Owner: Ana &lt;PM&gt; &#8212; week&nbsp;12</p></body></html>";
        let out = extract_text("status.html", html.as_bytes(), LIMIT).unwrap();
        assert_eq!(out.format, DocumentFormat::Html);
        assert_eq!(
            out.text,
            "Status\n\nGo-live & cutover\n\nOwner: Ana <PM> \u{2014} week 12"
        );
        assert!(!out.text.contains("123-45-6789"));
    }

    #[test]
    fn unknown_entities_are_kept() {
        assert_eq!(html_to_text("<p>a &bogus; b &#x41;</p>"), "a &bogus; b A");
    }

    #[test]
    fn angle_brackets_in_attributes_stay_inside_the_tag() {
        let html = r#"<p title="budget > plan">Budget <a href="/r?a=1&b=2" data-x="<b>">link</a></p>"#;
        assert_eq!(html_to_text(html), "Budget link");
    }

    #[test]
    fn inline_tags_join_without_extra_space() {
        assert_eq!(html_to_text("<p><b>Owner</b>: Ana <i>Lopez</i></p>"), "Owner: Ana Lopez");
    }

    #[test]
    fn unclosed_tags_keep_their_text() {
        assert_eq!(html_to_text("<p>Open <b>bold"), "Open bold");
    }

    #[test]
    fn blank_line_runs_collapse() {
        assert_eq!(tidy_lines("\n a  b \n\n\n\nc\n"), "a b\n\nc");
    }

    #[rstest]
    #[case("deck.pptx")]
    #[case("scan.pdf")]
    #[case("noextension")]
    fn unsupported_types_rejected(#[case] file_name: &str) {
        let err = extract_text(file_name, b"data", LIMIT).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedType { .. }));
    }

    #[test]
    fn invalid_utf8_rejected() {
        let err = extract_text("a.txt", &[0x66, 0x6f, 0xff, 0xfe], LIMIT).unwrap_err();
        assert!(matches!(err, IngestError::InvalidUtf8 { .. }));
    }

    #[rstest]
    #[case("empty.txt", "")]
    #[case("blank.md", "  \n\n\t ")]
    #[case("tags.html", "<div><br/></div>")]
    fn empty_documents_rejected(#[case] file_name: &str, #[case] content: &str) {
        let err = extract_text(file_name, content.as_bytes(), LIMIT).unwrap_err();
        assert!(matches!(err, IngestError::EmptyDocument { .. }));
    }

    #[test]
    fn oversized_files_rejected_before_decoding() {
        let err = extract_text("big.pdf", &[0u8; 11], 10).unwrap_err();
        assert!(matches!(err, IngestError::TooLarge { size: 11, limit: 10 }));
    }
}
