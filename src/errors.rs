use thiserror::Error;

use crate::model::ScriptType;

/// Failures raised while turning text into a [`crate::model::Script`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input held nothing but whitespace.
    #[error("input has no content to parse")]
    Empty,

    /// An SRT line broke the index / time-range / text grammar.
    #[error("SRT line {line}: expected {expected}, found {found:?}")]
    Srt {
        line: usize,
        expected: &'static str,
        found: String,
    },
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("unknown subtitle format")]
    UnknownFormat,

    #[error("cannot parse {script_type:?} input")]
    Parse {
        script_type: ScriptType,
        #[source]
        source: ParseError,
    },
}
