//! ast-grep trees for the structured formats the ingester reads.
//!
//! Markdown uses the tree-sitter-md block grammar through [`MarkdownLang`];
//! HTML uses ast-grep's bundled HTML grammar.

use std::borrow::Cow;

use ast_grep_core::language::Language;
use ast_grep_core::matcher::{Pattern, PatternBuilder, PatternError};
use ast_grep_core::tree_sitter::{LanguageExt, StrDoc, TSLanguage};
use ast_grep_language::SupportLang;

/// Markdown block grammar (headings, thematic breaks, code blocks).
#[derive(Clone, Copy, Debug)]
pub struct MarkdownLang;

impl Language for MarkdownLang {
    fn pre_process_pattern<'q>(&self, query: &'q str) -> Cow<'q, str> {
        Cow::Borrowed(query)
    }

    fn kind_to_id(&self, kind: &str) -> u16 {
        self.get_ts_language().id_for_node_kind(kind, true)
    }

    fn field_to_id(&self, field: &str) -> Option<u16> {
        self.get_ts_language()
            .field_id_for_name(field)
            .map(std::num::NonZero::get)
    }

    fn build_pattern(&self, builder: &PatternBuilder) -> Result<Pattern, PatternError> {
        builder.build(|src| StrDoc::try_new(src, *self))
    }
}

impl LanguageExt for MarkdownLang {
    fn get_ts_language(&self) -> TSLanguage {
        tree_sitter_md::LANGUAGE.into()
    }
}

pub type MarkdownTree = ast_grep_core::AstGrep<StrDoc<MarkdownLang>>;
pub type HtmlTree = ast_grep_core::AstGrep<StrDoc<SupportLang>>;

#[must_use]
pub fn parse_markdown(source: &str) -> MarkdownTree {
    MarkdownLang.ast_grep(source)
}

#[must_use]
pub fn parse_html(source: &str) -> HtmlTree {
    SupportLang::Html.ast_grep(source)
}
