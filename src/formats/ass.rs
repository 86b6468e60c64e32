use std::mem;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    errors::ParseError,
    formats::time::parse_time,
    line::{Event, Line, Named, Raw, Style, alignment_from_ssa, clamp_alignment},
    model::{Script, ScriptType, SectionKind},
};

static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([^\]]+)\]$").expect("valid regex"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Outside,
    In(SectionKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Consume,
    /// Leave the line in place and feed it again in the new state.
    Reprocess,
}

struct SsaParser {
    state: State,
    ty: ScriptType,
    at_begin: bool,
    pending: Vec<String>,
    script: Script,
}

/// Parses SSA or ASS text. Lines the parser does not understand are kept as
/// comments of the next entry or as trailing text of their section.
pub fn parse_ssa(input: &str) -> Result<Script, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = SsaParser::new();
    let mut lines = input.lines().map(str::trim).peekable();

    while let Some(&line) = lines.peek() {
        if (parser.at_begin || !line.is_empty()) && parser.feed(line) == Step::Reprocess {
            continue;
        }
        lines.next();
    }

    Ok(parser.finish())
}

pub fn generate_ass(script: &Script) -> String {
    generate_substation(script, ScriptType::Ass)
}

pub fn generate_ssa(script: &Script) -> String {
    generate_substation(script, ScriptType::Ssa)
}

fn generate_substation(script: &Script, ty: ScriptType) -> String {
    let mut out = String::new();

    if !script.before().is_empty() {
        out.push_str(&script.before().join("\n"));
        out.push('\n');
    }

    out.push_str(&script.header.render(ty));
    out.push('\n');
    out.push_str(&script.styles.render(ty));
    out.push('\n');
    out.push_str(&script.events.render(ty));

    for section in [&script.fonts, &script.graphics] {
        if !section.is_empty() {
            out.push('\n');
            out.push_str(&section.render(ty));
        }
    }

    if !script.after().is_empty() {
        out.push('\n');
        out.push_str(&script.after().join("\n"));
        out.push('\n');
    }

    out
}

impl SsaParser {
    fn new() -> Self {
        Self {
            state: State::Outside,
            ty: ScriptType::Ssa,
            at_begin: true,
            pending: Vec::new(),
            script: Script::new(),
        }
    }

    fn feed(&mut self, line: &str) -> Step {
        let kind = match self.state {
            State::Outside => {
                self.outside(line);
                return Step::Consume;
            }
            State::In(kind) => kind,
        };

        if kind == SectionKind::Header && line.starts_with(';') {
            self.pending.push(line.to_string());
            return Step::Consume;
        }

        if SECTION_HEADER.is_match(line) {
            self.close_section(kind);
            self.state = State::Outside;
            return Step::Reprocess;
        }

        match kind {
            SectionKind::Header => self.header_line(line),
            SectionKind::Styles => self.styles_line(line),
            SectionKind::Events => self.events_line(line),
            SectionKind::Fonts | SectionKind::Graphics => {
                self.script.push(kind, Line::Raw(Raw::new(line)));
            }
        }
        Step::Consume
    }

    fn outside(&mut self, line: &str) {
        if let Some(caps) = SECTION_HEADER.captures(line) {
            let name = caps[1].trim();
            if let Some(kind) = SectionKind::lookup(name) {
                self.state = State::In(kind);
                if let Some(ty) = ScriptType::from_marker(name) {
                    self.ty = ty;
                }
                if self.at_begin {
                    self.at_begin = false;
                    let leading = mem::take(&mut self.pending);
                    self.script.append_before(leading);
                }
                tracing::trace!(?kind, "entered section");
                return;
            }
            if !self.at_begin {
                tracing::debug!(section = name, "dropping unknown section");
            }
        }

        // only the run ahead of the first section is kept
        if self.at_begin {
            self.pending.push(line.to_string());
        }
    }

    fn close_section(&mut self, kind: SectionKind) {
        let trailing = mem::take(&mut self.pending);
        match kind {
            SectionKind::Header => self.script.header.append_after(trailing),
            SectionKind::Styles => self.script.styles.append_after(trailing),
            SectionKind::Events => self.script.events.append_after(trailing),
            SectionKind::Fonts => self.script.fonts.append_after(trailing),
            SectionKind::Graphics => self.script.graphics.append_after(trailing),
        }
    }

    fn header_line(&mut self, line: &str) {
        let Some((name, value)) = split_named(line) else {
            self.pending.push(line.to_string());
            return;
        };

        if name.eq_ignore_ascii_case("ScriptType") {
            // regenerated on output, so not kept as a line
            if let Some(ty) = ScriptType::from_marker(value) {
                self.ty = ty;
            }
            return;
        }

        let named = Named::new(name, value).with_before(mem::take(&mut self.pending));
        self.script.push(SectionKind::Header, Line::Named(named));
    }

    fn styles_line(&mut self, line: &str) {
        match split_named(line) {
            Some((name, value)) if name.eq_ignore_ascii_case("Style") => {
                let style = parse_style(value, self.ty, mem::take(&mut self.pending));
                self.script.push(SectionKind::Styles, Line::Style(style));
            }
            Some((name, _)) if name.eq_ignore_ascii_case("Format") => {}
            _ => self.pending.push(line.to_string()),
        }
    }

    fn events_line(&mut self, line: &str) {
        match split_named(line) {
            Some((name, value)) if name.eq_ignore_ascii_case("Dialogue") => {
                let event = parse_event(value, self.ty, mem::take(&mut self.pending));
                self.script.push(SectionKind::Events, Line::Event(event));
            }
            Some((name, _)) if name.eq_ignore_ascii_case("Format") => {}
            _ => self.pending.push(line.to_string()),
        }
    }

    fn finish(mut self) -> Script {
        if !self.pending.is_empty() {
            let trailing = mem::take(&mut self.pending);
            self.script.append_after(trailing);
        }
        tracing::debug!(
            script_type = ?self.ty,
            header = self.script.header.len(),
            styles = self.script.styles.len(),
            events = self.script.events.len(),
            fonts = self.script.fonts.len(),
            graphics = self.script.graphics.len(),
            "parsed substation script"
        );
        self.script
    }
}

fn split_named(line: &str) -> Option<(&str, &str)> {
    line.split_once(':')
        .map(|(name, value)| (name.trim(), value.trim()))
}

/// Positional `Style:` fields. Missing trailing fields keep their defaults.
pub fn parse_style(value: &str, ty: ScriptType, before: Vec<String>) -> Style {
    let mut style = Style {
        before,
        ..Style::default()
    };
    let mut fields = value.split(',').map(str::trim);
    fill_style(&mut style, &mut fields, ty);
    style
}

fn fill_style<'a>(
    s: &mut Style,
    fields: &mut impl Iterator<Item = &'a str>,
    ty: ScriptType,
) -> Option<()> {
    s.style_name = fields.next()?.to_string();
    s.font_name = fields.next()?.to_string();
    s.font_size = read_f64(fields.next()?);
    s.primary_colour = read_colour(fields.next()?);
    s.secondary_colour = read_colour(fields.next()?);
    s.outline_colour = read_colour(fields.next()?);
    s.back_colour = read_colour(fields.next()?);
    s.bold = read_flag(fields.next()?);
    s.italic = read_flag(fields.next()?);

    if ty == ScriptType::Ass {
        s.underline = read_flag(fields.next()?);
        s.strike_out = read_flag(fields.next()?);
        s.scale_x = read_f64(fields.next()?);
        s.scale_y = read_f64(fields.next()?);
        s.spacing = read_f64(fields.next()?);
        s.angle = read_f64(fields.next()?);
    }

    s.border_style = read_u16(fields.next()?);
    s.outline = read_f64(fields.next()?);
    s.shadow = read_f64(fields.next()?);

    let alignment = read_u16(fields.next()?);
    s.alignment = if ty == ScriptType::Ass {
        clamp_alignment(alignment)
    } else {
        alignment_from_ssa(alignment)
    };

    s.margin_l = read_u16(fields.next()?);
    s.margin_r = read_u16(fields.next()?);
    s.margin_v = read_u16(fields.next()?);

    if ty != ScriptType::Ass {
        // AlphaLevel
        fields.next()?;
    }

    s.encoding = read_u16(fields.next()?);
    Some(())
}

/// Positional `Dialogue:` fields. The text swallows every remaining comma.
pub fn parse_event(value: &str, ty: ScriptType, before: Vec<String>) -> Event {
    let mut event = Event {
        before,
        ..Event::default()
    };
    let mut fields = value.split(',');
    fill_event(&mut event, &mut fields, ty);
    event
}

fn fill_event<'a>(
    e: &mut Event,
    fields: &mut impl Iterator<Item = &'a str>,
    ty: ScriptType,
) -> Option<()> {
    // SSA writes `Marked=0` here
    let layer: String = fields.next()?.chars().filter(char::is_ascii_digit).collect();
    e.layer = layer.parse().unwrap_or(0);
    e.start_ms = parse_time(fields.next()?, ty);
    e.end_ms = parse_time(fields.next()?, ty);
    e.style = fields.next()?.trim().to_string();
    e.actor = fields.next()?.trim().to_string();
    e.margin_l = read_u16(fields.next()?.trim());
    e.margin_r = read_u16(fields.next()?.trim());
    e.margin_v = read_u16(fields.next()?.trim());
    e.effect = fields.next()?.trim().to_string();

    let text: Vec<&str> = fields.collect();
    if !text.is_empty() {
        e.text = text.join(",");
    }
    Some(())
}

fn read_f64(s: &str) -> f64 {
    s.parse().unwrap_or(0.0)
}

fn read_u16(s: &str) -> u16 {
    s.parse().unwrap_or(0)
}

fn read_flag(s: &str) -> bool {
    s.parse::<i32>().is_ok_and(|v| v != 0)
}

/// `&HAABBGGRR` hex or a plain decimal, which SSA writes signed.
fn read_colour(s: &str) -> u32 {
    match s.strip_prefix("&H").or_else(|| s.strip_prefix("&h")) {
        Some(hex) => u32::from_str_radix(hex.trim_end_matches('&'), 16).unwrap_or(0),
        None => s
            .parse::<i32>()
            .map(|v| v as u32)
            .or_else(|_| s.parse::<u32>())
            .unwrap_or(0),
    }
}
