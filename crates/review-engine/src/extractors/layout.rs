//! Twip-based layout conformance checks
//!
//! Word stores indentation and line spacing in twips (1 twip = 1/20 pt).
//! The document standard asks for a two-character first-line indent
//! (~420 twip / 21 pt) and either a fixed 28 pt line height or 1.5-line
//! spacing.

use shared_types::{LineRule, ParagraphFormat};

/// Valid first-line indent window: 18-24 pt
const INDENT_MIN_TWIPS: u32 = 360;
const INDENT_MAX_TWIPS: u32 = 480;

/// Fixed line-height window: 26-30 pt
const EXACT_SPACING_MIN_TWIPS: u32 = 520;
const EXACT_SPACING_MAX_TWIPS: u32 = 600;

/// 1.5-line window in 240ths of a line
const AUTO_SPACING_MIN: u32 = 340;
const AUTO_SPACING_MAX: u32 = 380;

pub fn twips_to_points(twips: u32) -> f64 {
    twips as f64 / 20.0
}

pub fn twips_to_cm(twips: u32) -> f64 {
    twips as f64 / 567.0
}

/// First-line indent within the 18-24 pt standard
pub fn has_valid_indent(para: &ParagraphFormat) -> bool {
    (INDENT_MIN_TWIPS..=INDENT_MAX_TWIPS).contains(&para.first_line_indent)
}

/// Indented, but short of the standard
pub fn has_partial_indent(para: &ParagraphFormat) -> bool {
    para.first_line_indent > 0 && para.first_line_indent < INDENT_MIN_TWIPS
}

/// Line spacing is either fixed 26-30 pt or ~1.5 lines
pub fn has_valid_line_spacing(para: &ParagraphFormat) -> bool {
    let Some(line) = para.line else {
        return false;
    };

    match para.line_rule {
        Some(LineRule::Exact) => {
            (EXACT_SPACING_MIN_TWIPS..=EXACT_SPACING_MAX_TWIPS).contains(&line)
        }
        Some(LineRule::Auto) => (AUTO_SPACING_MIN..=AUTO_SPACING_MAX).contains(&line),
        _ => false,
    }
}

/// Human-readable indent, e.g. "21.0pt (0.74cm)"
pub fn format_indent(twips: u32) -> String {
    format!("{:.1}pt ({:.2}cm)", twips_to_points(twips), twips_to_cm(twips))
}

/// Human-readable line spacing, e.g. "固定值28.0磅" or "1.5倍行距"
pub fn format_line_spacing(para: &ParagraphFormat) -> String {
    let Some(line) = para.line else {
        return "未设置".to_string();
    };

    match para.line_rule {
        Some(LineRule::Exact) => format!("固定值{:.1}磅", twips_to_points(line)),
        Some(LineRule::Auto) => format!("{:.1}倍行距", line as f64 / 240.0),
        Some(LineRule::AtLeast) => format!("最小值{:.1}磅", twips_to_points(line)),
        None => format!("{} twip", line),
    }
}
