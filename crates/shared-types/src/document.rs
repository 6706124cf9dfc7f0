//! Extracted document inputs
//!
//! These types are produced once per uploaded document by the extraction
//! collaborator (Word/PDF parsing lives outside this workspace) and are
//! consumed read-only by the review engine.

use serde::{Deserialize, Serialize};

/// Extracted text of one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentContent {
    /// Full raw text as extracted
    pub text: String,
    /// Non-empty trimmed paragraphs, in document order
    pub paragraphs: Vec<String>,
    /// Character count of the raw text
    pub word_count: usize,
    /// Precise word-processing layout data, when the extractor could read it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_info: Option<FormatInfo>,
}

impl DocumentContent {
    /// Build content from raw text, deriving paragraphs the same way the
    /// extraction collaborator does (split on newlines, drop blanks, trim).
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let paragraphs: Vec<String> = text
            .split('\n')
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string())
            .collect();
        let word_count = text.chars().count();
        Self {
            text,
            paragraphs,
            word_count,
            format_info: None,
        }
    }

    pub fn with_format_info(mut self, format_info: FormatInfo) -> Self {
        self.format_info = Some(format_info);
        self
    }
}

/// Structural features of one document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentStructure {
    /// Detected document title
    pub title: String,
    /// The first physical lines of the title block, in order
    #[serde(default)]
    pub title_lines: Vec<String>,
    /// Numbered sections detected by the extractor
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// One numbered section of the document body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub content: String,
    pub level: u8,
}

/// Word-processing layout data for the whole document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    pub paragraphs: Vec<ParagraphFormat>,
}

/// Layout attributes of one paragraph
///
/// Lengths are in twips (1 twip = 1/20 pt = 1/1440 inch), matching the
/// units Word stores in its XML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParagraphFormat {
    pub text: String,
    pub index: usize,
    /// First-line indent in twips; 0 when unset
    #[serde(default)]
    pub first_line_indent: u32,
    /// Line spacing value in twips (exact) or 240ths of a line (auto)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_rule: Option<LineRule>,
}

/// How the `line` value of a paragraph is to be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRule {
    Auto,
    Exact,
    AtLeast,
}
