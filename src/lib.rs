//! Parse, clean and regenerate SSA/ASS subtitle scripts, and lift SRT files
//! into ASS.

pub mod cleaner;
pub mod cli;
pub mod config;
pub mod errors;
pub mod formats;
pub mod line;
pub mod model;
pub mod pipeline;

pub use errors::{ParseError, ScriptError};
pub use line::{Event, Line, Named, Raw, ScriptLine, Style};
pub use model::{Script, ScriptType, Section, SectionKind};
