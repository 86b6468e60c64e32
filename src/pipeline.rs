use anyhow::{Context, Result, anyhow};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    cleaner::{self, CleanOptions, CleanReport},
    cli::Args,
    config::Config,
    errors::ScriptError,
    formats::{self, detect::detect_format},
    model::{Script, ScriptType},
};

const BOM: char = '\u{feff}';

/// Result of one detect, parse, clean, render cycle.
#[derive(Debug)]
pub struct Cleaned {
    pub source: ScriptType,
    pub target: ScriptType,
    pub script: Script,
    pub report: CleanReport,
    pub text: String,
}

pub fn run_clean(args: &Args, cfg: &Config) -> Result<()> {
    let input = args
        .input
        .as_deref()
        .ok_or_else(|| anyhow!("input file not set"))?;

    let span = tracing::info_span!("clean", input = %input.display());
    let _g = span.enter();

    let raw = read_input(input)?;
    tracing::info!(bytes = raw.len(), "read input");

    let opts = cfg.cleaning.options(args.strip_comments, args.strip_info);
    let cleaned = clean_text(&raw, args.to.map(ScriptType::from), &opts)
        .with_context(|| format!("failed processing \"{}\"", input.display()))?;

    log_script_summary(&cleaned.script, cfg);

    if args.stdout {
        print!("{}", cleaned.text);
        tracing::info!(mode = "stdout", "wrote output");
        return Ok(());
    }

    let out_path = match &args.output {
        Some(p) => p.clone(),
        None => derive_output_path(input, cleaned.source, cleaned.target),
    };
    write_output(&out_path, &cleaned.text, cfg.output.byte_order_mark)?;
    tracing::info!(path = %out_path.display(), target = ?cleaned.target, "wrote output file");

    Ok(())
}

/// Detects, parses, cleans and re-renders a whole script held in memory.
/// `target` defaults to the input's dialect, or ASS for SRT input.
pub fn clean_text(
    raw: &str,
    target: Option<ScriptType>,
    opts: &CleanOptions,
) -> Result<Cleaned> {
    let raw = raw.strip_prefix(BOM).unwrap_or(raw);

    let source = detect_format(raw);
    tracing::info!(?source, "input format detected");
    if source == ScriptType::Unknown {
        return Err(ScriptError::UnknownFormat.into());
    }

    let mut script = formats::parse_any(raw, source)?;
    let report = cleaner::clean(&mut script, opts);

    let target = target.unwrap_or(match source {
        ScriptType::Srt => ScriptType::Ass,
        other => other,
    });
    let text = formats::render_any(&script, target)?;

    Ok(Cleaned {
        source,
        target,
        script,
        report,
        text,
    })
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("can't read file \"{}\"", path.display()))
}

/// `<stem>.clean.<ext>` beside the input. The extension follows the output
/// dialect when it differs from the input's.
pub fn derive_output_path(input: &Path, source: ScriptType, target: ScriptType) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = if source == target {
        input
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
    } else {
        target.extension().map(str::to_string)
    };

    let name = [Some(stem), Some("clean".to_string()), ext]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".");
    input.with_file_name(name)
}

fn write_output(path: &Path, text: &str, bom: bool) -> Result<()> {
    let mut data = String::with_capacity(text.len() + BOM.len_utf8());
    if bom {
        data.push(BOM);
    }
    data.push_str(text);
    fs::write(path, data).with_context(|| format!("can't write file \"{}\"", path.display()))
}

fn log_script_summary(script: &Script, cfg: &Config) {
    tracing::info!(
        header = script.header.len(),
        styles = script.styles.len(),
        events = script.events.len(),
        duration_ms = script.duration_ms(),
        "script summary"
    );

    if tracing::enabled!(tracing::Level::DEBUG) {
        let events = script.events.items();
        let n = cfg.logging.debug_line_samples.min(events.len());
        for (i, e) in events.iter().take(n).enumerate() {
            tracing::debug!(
                idx = i,
                start_ms = e.start_ms,
                end_ms = e.end_ms,
                style = e.style.as_str(),
                chars = e.text.chars().count(),
                "event sample"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_keeps_extension() {
        assert_eq!(
            derive_output_path(Path::new("dir/movie.en.ass"), ScriptType::Ass, ScriptType::Ass),
            PathBuf::from("dir/movie.en.clean.ass")
        );
    }

    #[test]
    fn output_name_follows_new_dialect() {
        assert_eq!(
            derive_output_path(Path::new("movie.srt"), ScriptType::Srt, ScriptType::Ass),
            PathBuf::from("movie.clean.ass")
        );
    }

    #[test]
    fn output_name_without_extension() {
        assert_eq!(
            derive_output_path(Path::new("subs"), ScriptType::Ssa, ScriptType::Ssa),
            PathBuf::from("subs.clean")
        );
    }

    #[test]
    fn bom_is_ignored_on_input() {
        let cleaned = clean_text(
            "\u{feff}[Script Info]\nScriptType: v4.00+\nTitle: x\n",
            None,
            &CleanOptions::default(),
        )
        .unwrap();
        assert_eq!(cleaned.source, ScriptType::Ass);
        assert!(cleaned.text.starts_with("[Script Info]\n"));
    }

    #[test]
    fn unknown_input_is_rejected() {
        let err = clean_text("hello there", None, &CleanOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScriptError>(),
            Some(ScriptError::UnknownFormat)
        ));
    }

    #[test]
    fn srt_defaults_to_ass() {
        let cleaned = clean_text(
            "1\n00:00:01,000 --> 00:00:02,500\nHello\nWorld\n",
            None,
            &CleanOptions::default(),
        )
        .unwrap();
        assert_eq!(cleaned.target, ScriptType::Ass);
        assert!(cleaned.text.contains("Dialogue: 0,0:00:01.00,0:00:02.50,Default,,0,0,0,,Hello\\NWorld\n"));
        assert!(cleaned.text.contains("; Script generated by subclean\nWrapStyle: 0\n"));
    }
}
