use std::mem;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    errors::ParseError,
    formats::time::parse_time,
    line::{Event, Named, ScriptLine, Style},
    model::{Script, ScriptType},
};

static TIME_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}:\d{2}:\d{2},\d{3}) *--> *(\d{2}:\d{2}:\d{2},\d{3})$").expect("valid regex")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Empty,
    NumberSeen,
    InText,
}

/// Parses SRT cues. Any line outside the index / time range / text shape
/// aborts the parse.
pub fn parse_srt(input: &str) -> Result<Script, ParseError> {
    let mut script = Script::new();
    let mut state = State::Empty;
    let mut text: Vec<String> = Vec::new();
    let (mut start_ms, mut end_ms) = (0, 0);

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();

        match state {
            State::Empty => {
                if line.is_empty() {
                    continue;
                }
                if line.parse::<i32>().is_err() {
                    return Err(unexpected(idx, "cue number", line));
                }
                state = State::NumberSeen;
            }
            State::NumberSeen => {
                let Some(caps) = TIME_RANGE.captures(line) else {
                    return Err(unexpected(idx, "time range", line));
                };
                start_ms = parse_time(&caps[1], ScriptType::Srt);
                end_ms = parse_time(&caps[2], ScriptType::Srt);
                state = State::InText;
            }
            State::InText => {
                if line.is_empty() {
                    close_cue(&mut script, &mut text, start_ms, end_ms);
                    state = State::Empty;
                } else {
                    text.push(line.to_string());
                }
            }
        }
    }
    close_cue(&mut script, &mut text, start_ms, end_ms);

    // SRT has no styling, so give SSA/ASS output something to stand on
    script.header.push(
        Named::new("WrapStyle", "0").with_before(vec![format!(
            "; Script generated by {}",
            env!("CARGO_PKG_NAME")
        )]),
    );
    script
        .header
        .push(Named::new("ScaledBorderAndShadow", "yes"));
    script.header.push(Named::new("Collisions", "Normal"));
    script.styles.push(Style::default());

    tracing::debug!(cues = script.events.len(), "parsed srt script");
    Ok(script)
}

fn close_cue(script: &mut Script, text: &mut Vec<String>, start_ms: u64, end_ms: u64) {
    if text.is_empty() {
        return;
    }
    script.events.push(Event {
        start_ms,
        end_ms,
        text: mem::take(text).join(r"\N"),
        ..Event::default()
    });
}

fn unexpected(idx: usize, expected: &'static str, found: &str) -> ParseError {
    ParseError::Srt {
        line: idx + 1,
        expected,
        found: found.to_string(),
    }
}

/// Numbered cues; stored layers play no part in the numbering.
pub fn generate_srt(script: &Script) -> String {
    let mut out = String::new();

    for (i, event) in script.events.items().iter().enumerate() {
        out.push_str(&(i + 1).to_string());
        out.push('\n');
        out.push_str(&event.render(ScriptType::Srt));
        out.push_str("\n\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn joins_cue_lines_with_hard_break() {
        let script = parse_srt("1\n00:00:01,000 --> 00:00:02,500\nHello\nWorld\n\n").unwrap();
        let events = script.events.items();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start_ms, 1_000);
        assert_eq!(events[0].end_ms, 2_500);
        assert_eq!(events[0].text, r"Hello\NWorld");
        assert_eq!(events[0].style, "Default");
    }

    #[test]
    fn last_cue_closes_at_end_of_input() {
        let script = parse_srt(
            "1\r\n00:00:01,000 --> 00:00:02,000\r\nOne\r\n\r\n2\r\n00:00:03,000-->00:00:04,000\r\nTwo",
        )
        .unwrap();
        let texts: Vec<&str> = script.events.items().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["One", "Two"]);
        assert_eq!(script.events.items()[1].start_ms, 3_000);
    }

    #[test]
    fn cue_without_text_is_skipped() {
        let script = parse_srt("1\n00:00:01,000 --> 00:00:02,000\n\n2\n00:00:03,000 --> 00:00:04,000\nx\n").unwrap();
        assert_eq!(script.events.len(), 1);
        assert_eq!(script.events.items()[0].start_ms, 3_000);
    }

    #[test]
    fn injects_header_and_default_style() {
        let script = parse_srt("").unwrap();
        let names: Vec<&str> = script.header.items().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["WrapStyle", "ScaledBorderAndShadow", "Collisions"]);
        assert_eq!(script.styles.items(), [Style::default()]);
        assert!(script.events.items().is_empty());
    }

    #[test]
    fn non_numeric_index_fails() {
        let err = parse_srt("\nabc\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::Srt {
                line: 2,
                expected: "cue number",
                found: "abc".to_string(),
            }
        );
    }

    #[test]
    fn index_beyond_i32_fails() {
        assert!(parse_srt("2147483647\n00:00:01,000 --> 00:00:02,000\nok\n").is_ok());
        assert!(matches!(
            parse_srt("2147483648\n00:00:01,000 --> 00:00:02,000\nok\n"),
            Err(ParseError::Srt { line: 1, expected: "cue number", .. })
        ));
    }

    #[test]
    fn missing_time_range_fails() {
        assert!(matches!(
            parse_srt("1\n\n"),
            Err(ParseError::Srt { line: 2, expected: "time range", .. })
        ));
        assert!(matches!(
            parse_srt("1\n0:00:01.00 --> 0:00:02.00\n"),
            Err(ParseError::Srt { line: 2, .. })
        ));
    }

    #[test]
    fn generates_numbered_cues() {
        let mut script = parse_srt(
            "7\n00:00:01,000 --> 00:00:02,500\nHello\nWorld\n\n9\n01:00:00,001 --> 01:00:00,002\nBye\n",
        )
        .unwrap();
        script.events.iter_mut().for_each(|e| e.layer = 5);
        assert_eq!(
            generate_srt(&script),
            "1\n00:00:01,000 --> 00:00:02,500\nHello\nWorld\n\n2\n01:00:00,001 --> 01:00:00,002\nBye\n\n"
        );
    }
}
