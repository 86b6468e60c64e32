use once_cell::sync::Lazy;
use regex::Regex;

use crate::{formats::time::format_time, model::ScriptType};

pub const DEFAULT_STYLE: &str = "Default";
pub const DEFAULT_FONT: &str = "Arial";

/// SSA alignment codes (1-3 bottom, 5-7 top, 9-11 middle) to numpad codes.
pub const ALIGNMENT_SSA_TO_ASS: [u16; 12] = [0, 1, 2, 3, 0, 7, 8, 9, 0, 4, 5, 6];
/// Numpad alignment codes back to SSA codes.
pub const ALIGNMENT_ASS_TO_SSA: [u16; 10] = [0, 1, 2, 3, 9, 10, 11, 5, 6, 7];

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\\n").expect("valid regex"));

/// Something that occupies lines in a script and knows how to print itself.
pub trait ScriptLine {
    /// Text for this item in the given dialect, without a trailing newline.
    fn render(&self, ty: ScriptType) -> String;

    /// Drops comment lines attached above the item.
    fn clear_before(&mut self) {}
}

/// Any line of a script, as produced by the parsers.
#[derive(Clone, Debug, PartialEq)]
pub enum Line {
    Raw(Raw),
    Named(Named),
    Style(Style),
    Event(Event),
}

impl ScriptLine for Line {
    fn render(&self, ty: ScriptType) -> String {
        match self {
            Line::Raw(l) => l.render(ty),
            Line::Named(l) => l.render(ty),
            Line::Style(l) => l.render(ty),
            Line::Event(l) => l.render(ty),
        }
    }

    fn clear_before(&mut self) {
        match self {
            Line::Raw(l) => l.clear_before(),
            Line::Named(l) => l.clear_before(),
            Line::Style(l) => l.clear_before(),
            Line::Event(l) => l.clear_before(),
        }
    }
}

/// Opaque line kept verbatim (embedded font/graphic payload).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Raw(pub String);

impl Raw {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl ScriptLine for Raw {
    fn render(&self, _ty: ScriptType) -> String {
        self.0.clone()
    }
}

/// A `Name: value` line from the script info section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Named {
    pub name: String,
    pub text: String,
    pub before: Vec<String>,
}

impl Named {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            before: Vec::new(),
        }
    }

    pub fn with_before(mut self, before: Vec<String>) -> Self {
        self.before = before;
        self
    }
}

impl ScriptLine for Named {
    fn render(&self, ty: ScriptType) -> String {
        if !ty.is_substation() {
            return String::new();
        }
        named_line(&self.before, &self.name, &self.text)
    }

    fn clear_before(&mut self) {
        self.before.clear();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub before: Vec<String>,
    pub style_name: String,
    pub font_name: String,
    pub font_size: f64,
    pub primary_colour: u32,
    pub secondary_colour: u32,
    pub outline_colour: u32,
    pub back_colour: u32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike_out: bool,
    pub scale_x: f64,
    pub scale_y: f64,
    pub spacing: f64,
    pub angle: f64,
    pub border_style: u16,
    pub outline: f64,
    pub shadow: f64,
    /// Numpad code, always 1-9 once parsed.
    pub alignment: u16,
    pub margin_l: u16,
    pub margin_r: u16,
    pub margin_v: u16,
    pub encoding: u16,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            before: Vec::new(),
            style_name: DEFAULT_STYLE.to_string(),
            font_name: DEFAULT_FONT.to_string(),
            font_size: 20.0,
            primary_colour: 0xFF_FFFF,
            secondary_colour: 0xFF,
            outline_colour: 0,
            back_colour: 0,
            bold: false,
            italic: false,
            underline: false,
            strike_out: false,
            scale_x: 100.0,
            scale_y: 100.0,
            spacing: 0.0,
            angle: 0.0,
            border_style: 1,
            outline: 2.0,
            shadow: 2.0,
            alignment: 2,
            margin_l: 10,
            margin_r: 10,
            margin_v: 10,
            encoding: 1,
        }
    }
}

impl ScriptLine for Style {
    fn render(&self, ty: ScriptType) -> String {
        if !ty.is_substation() {
            return String::new();
        }
        let ass = ty == ScriptType::Ass;

        let mut fields: Vec<String> = Vec::with_capacity(23);
        fields.push(self.style_name.clone());
        fields.push(self.font_name.clone());
        fields.push(self.font_size.to_string());
        for colour in [
            self.primary_colour,
            self.secondary_colour,
            self.outline_colour,
            self.back_colour,
        ] {
            fields.push(format_colour(colour, ty));
        }
        fields.push(format_flag(self.bold));
        fields.push(format_flag(self.italic));
        if ass {
            fields.push(format_flag(self.underline));
            fields.push(format_flag(self.strike_out));
            fields.push(self.scale_x.to_string());
            fields.push(self.scale_y.to_string());
            fields.push(self.spacing.to_string());
            fields.push(self.angle.to_string());
        }
        fields.push(self.border_style.to_string());
        fields.push(self.outline.to_string());
        fields.push(self.shadow.to_string());
        let alignment = if ass {
            self.alignment
        } else {
            alignment_to_ssa(self.alignment)
        };
        fields.push(alignment.to_string());
        fields.push(self.margin_l.to_string());
        fields.push(self.margin_r.to_string());
        fields.push(self.margin_v.to_string());
        if !ass {
            // AlphaLevel, unused by every renderer
            fields.push("0".to_string());
        }
        fields.push(self.encoding.to_string());

        named_line(&self.before, "Style", &fields.join(","))
    }

    fn clear_before(&mut self) {
        self.before.clear();
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub before: Vec<String>,
    pub layer: u32,
    pub start_ms: u64,
    pub end_ms: u64,
    pub style: String,
    pub actor: String,
    pub margin_l: u16,
    pub margin_r: u16,
    pub margin_v: u16,
    pub effect: String,
    pub text: String,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            before: Vec::new(),
            layer: 0,
            start_ms: 0,
            end_ms: 0,
            style: DEFAULT_STYLE.to_string(),
            actor: String::new(),
            margin_l: 0,
            margin_r: 0,
            margin_v: 0,
            effect: String::new(),
            text: String::new(),
        }
    }
}

impl Event {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

impl ScriptLine for Event {
    fn render(&self, ty: ScriptType) -> String {
        match ty {
            ScriptType::Ass | ScriptType::Ssa => {
                let layer = if ty == ScriptType::Ssa {
                    format!("Marked={}", self.layer)
                } else {
                    self.layer.to_string()
                };
                let fields = [
                    layer,
                    format_time(self.start_ms, ty),
                    format_time(self.end_ms, ty),
                    self.style.clone(),
                    self.actor.clone(),
                    self.margin_l.to_string(),
                    self.margin_r.to_string(),
                    self.margin_v.to_string(),
                    self.effect.clone(),
                    self.text.clone(),
                ];
                named_line(&self.before, "Dialogue", &fields.join(","))
            }
            ScriptType::Srt => format!(
                "{} --> {}\n{}",
                format_time(self.start_ms, ty),
                format_time(self.end_ms, ty),
                LINE_BREAK.replace_all(&self.text, "\n")
            ),
            ScriptType::Unknown => String::new(),
        }
    }

    fn clear_before(&mut self) {
        self.before.clear();
    }
}

/// Maps an SSA alignment code to numpad layout; anything outside 1-9 becomes 2.
pub fn alignment_from_ssa(code: u16) -> u16 {
    let mapped = ALIGNMENT_SSA_TO_ASS
        .get(usize::from(code))
        .copied()
        .filter(|_| code > 0)
        .unwrap_or(code);
    clamp_alignment(mapped)
}

pub fn clamp_alignment(code: u16) -> u16 {
    if (1..=9).contains(&code) { code } else { 2 }
}

pub fn alignment_to_ssa(code: u16) -> u16 {
    if code == 0 {
        return code;
    }
    ALIGNMENT_ASS_TO_SSA
        .get(usize::from(code))
        .copied()
        .unwrap_or(code)
}

fn format_colour(colour: u32, ty: ScriptType) -> String {
    if ty == ScriptType::Ass {
        format!("&H{colour:08X}")
    } else {
        // SSA stores BGR colours as signed decimal
        (colour as i32).to_string()
    }
}

fn format_flag(on: bool) -> String {
    let flag = if on { "-1" } else { "0" };
    flag.to_string()
}

fn named_line(before: &[String], name: &str, value: &str) -> String {
    let mut out = String::new();
    for line in before {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&format!("{name}: {value}"));
    out
}
