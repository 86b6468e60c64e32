use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::ScriptType;

/// How much of the input is inspected, in characters.
pub const SNIFF_CHARS: usize = 5120;

static ASS_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ScriptType[ \t]*:[ \t]*v4\.00\+").expect("valid regex"));
static SSA_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ScriptType[ \t]*:[ \t]*v4\.00").expect("valid regex"));
static SRT_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{2}:\d{2}:\d{2},\d{3} *--> *\d{2}:\d{2}:\d{2},\d{3}").expect("valid regex")
});

pub fn detect_format(text: &str) -> ScriptType {
    let head = match text.char_indices().nth(SNIFF_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    };

    // the SSA marker is a prefix of the ASS one
    if ASS_MARKER.is_match(head) {
        ScriptType::Ass
    } else if SSA_MARKER.is_match(head) {
        ScriptType::Ssa
    } else if SRT_RANGE.is_match(head) {
        ScriptType::Srt
    } else {
        ScriptType::Unknown
    }
}
