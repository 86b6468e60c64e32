use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::model::ScriptType;

#[derive(Debug, Parser)]
#[command(name = "subclean", version)]
#[command(
    about = "Strip fonts, graphics and other useless information from SSA/ASS files. SRT input is converted to ASS."
)]
pub struct Args {
    /// Input subtitle file
    #[arg(required_unless_present = "print_default_config")]
    pub input: Option<PathBuf>,

    /// Output subtitle file (defaults to <name>.clean.<ext> next to the input)
    pub output: Option<PathBuf>,

    /// Strip comments
    #[arg(short = 'c', long)]
    pub strip_comments: bool,

    /// Strip useless lines from the info section
    #[arg(short = 'i', long)]
    pub strip_info: bool,

    /// Output format (defaults to the input's SSA/ASS dialect, ASS for SRT input)
    #[arg(long, value_enum)]
    pub to: Option<Format>,

    /// Write to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Path to config TOML (defaults to ./subclean.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    pub print_default_config: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Format {
    Ass,
    Ssa,
    Srt,
}

impl From<Format> for ScriptType {
    fn from(f: Format) -> Self {
        match f {
            Format::Ass => ScriptType::Ass,
            Format::Ssa => ScriptType::Ssa,
            Format::Srt => ScriptType::Srt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positionals_and_flags() {
        let args = Args::try_parse_from(["subclean", "-c", "-i", "in.ass", "out.ass"]).unwrap();
        assert_eq!(args.input, Some(PathBuf::from("in.ass")));
        assert_eq!(args.output, Some(PathBuf::from("out.ass")));
        assert!(args.strip_comments);
        assert!(args.strip_info);
        assert_eq!(args.to, None);
    }

    #[test]
    fn input_is_required() {
        assert!(Args::try_parse_from(["subclean"]).is_err());
        assert!(Args::try_parse_from(["subclean", "--print-default-config"]).is_ok());
    }

    #[test]
    fn target_format_maps_to_script_type() {
        let args = Args::try_parse_from(["subclean", "--to", "ssa", "in.srt"]).unwrap();
        assert_eq!(args.to.map(ScriptType::from), Some(ScriptType::Ssa));
    }
}
