pub mod ass;
pub mod detect;
pub mod srt;
pub mod time;

use crate::{
    errors::{ParseError, ScriptError},
    model::{Script, ScriptType},
};

/// Parses `input` as the given dialect.
pub fn parse_any(input: &str, ty: ScriptType) -> Result<Script, ScriptError> {
    let parsed = match ty {
        ScriptType::Ass | ScriptType::Ssa => ass::parse_ssa(input),
        ScriptType::Srt => srt::parse_srt(input),
        ScriptType::Unknown => return Err(ScriptError::UnknownFormat),
    };
    parsed.map_err(|source: ParseError| ScriptError::Parse {
        script_type: ty,
        source,
    })
}

/// Renders `script` in the given dialect.
pub fn render_any(script: &Script, ty: ScriptType) -> Result<String, ScriptError> {
    match ty {
        ScriptType::Ass => Ok(ass::generate_ass(script)),
        ScriptType::Ssa => Ok(ass::generate_ssa(script)),
        ScriptType::Srt => Ok(srt::generate_srt(script)),
        ScriptType::Unknown => Err(ScriptError::UnknownFormat),
    }
}
