use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::line::{Event, Line, Named, Raw, ScriptLine, Style};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ScriptType {
    #[default]
    Unknown,
    Ass,
    Ssa,
    Srt,
}

impl ScriptType {
    /// True for the bracket-sectioned SubStation dialects.
    pub fn is_substation(self) -> bool {
        matches!(self, ScriptType::Ass | ScriptType::Ssa)
    }

    pub fn extension(self) -> Option<&'static str> {
        match self {
            ScriptType::Ass => Some("ass"),
            ScriptType::Ssa => Some("ssa"),
            ScriptType::Srt => Some("srt"),
            ScriptType::Unknown => None,
        }
    }

    /// Value written after `ScriptType:` in the script info section.
    pub fn version(self) -> Option<&'static str> {
        match self {
            ScriptType::Ass => Some("v4.00+"),
            ScriptType::Ssa => Some("v4.00"),
            _ => None,
        }
    }

    /// Looks up a version string or versioned section name, ignoring case.
    pub fn from_marker(marker: &str) -> Option<Self> {
        TYPE_TABLE.get(marker.trim().to_lowercase().as_str()).copied()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SectionKind {
    Header,
    Styles,
    Events,
    Fonts,
    Graphics,
}

impl SectionKind {
    pub fn title(self, ty: ScriptType) -> &'static str {
        match self {
            SectionKind::Header => "Script Info",
            SectionKind::Styles if ty == ScriptType::Ass => "V4+ Styles",
            SectionKind::Styles => "V4 Styles",
            SectionKind::Events => "Events",
            SectionKind::Fonts => "Fonts",
            SectionKind::Graphics => "Graphics",
        }
    }

    /// Finds the section for a bracketed name, ignoring case.
    pub fn lookup(name: &str) -> Option<Self> {
        SECTION_TABLE.get(name.trim().to_lowercase().as_str()).copied()
    }

    fn format_line(self, ty: ScriptType) -> Option<&'static str> {
        match (self, ty) {
            (SectionKind::Styles, ScriptType::Ass) => Some(
                "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding",
            ),
            (SectionKind::Styles, _) => Some(
                "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, TertiaryColour, BackColour, Bold, Italic, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, AlphaLevel, Encoding",
            ),
            (SectionKind::Events, ScriptType::Ass) => Some(
                "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text",
            ),
            (SectionKind::Events, _) => Some(
                "Format: Marked, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text",
            ),
            _ => None,
        }
    }
}

static SECTION_TABLE: Lazy<HashMap<&'static str, SectionKind>> = Lazy::new(|| {
    HashMap::from([
        ("script info", SectionKind::Header),
        ("v4 styles", SectionKind::Styles),
        ("v4+ styles", SectionKind::Styles),
        ("events", SectionKind::Events),
        ("fonts", SectionKind::Fonts),
        ("graphics", SectionKind::Graphics),
    ])
});

static TYPE_TABLE: Lazy<HashMap<&'static str, ScriptType>> = Lazy::new(|| {
    HashMap::from([
        ("v4.00", ScriptType::Ssa),
        ("v4 styles", ScriptType::Ssa),
        ("v4.00+", ScriptType::Ass),
        ("v4+ styles", ScriptType::Ass),
    ])
});

/// One bracketed section: its items in file order plus whatever unrecognized
/// lines trailed them.
#[derive(Clone, Debug, PartialEq)]
pub struct Section<T> {
    kind: SectionKind,
    items: Vec<T>,
    after: Vec<String>,
}

impl<T> Section<T> {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            after: Vec::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn after(&self) -> &[String] {
        &self.after
    }

    pub fn append_after(&mut self, lines: impl IntoIterator<Item = String>) {
        self.after.extend(lines);
    }

    pub fn clear_after(&mut self) {
        self.after.clear();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.after.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.after.is_empty()
    }
}

impl<T: ScriptLine> Section<T> {
    pub fn clear_before(&mut self) {
        for item in &mut self.items {
            item.clear_before();
        }
    }

    /// Renders `[Title]`, the column line where the dialect has one, every
    /// item and the trailing block. Each line ends with `\n`.
    pub fn render(&self, ty: ScriptType) -> String {
        if !ty.is_substation() {
            return String::new();
        }

        let mut out = format!("[{}]\n", self.kind.title(ty));
        if let Some(format) = self.kind.format_line(ty) {
            out.push_str(format);
            out.push('\n');
        }
        for item in &self.items {
            out.push_str(&item.render(ty));
            out.push('\n');
        }
        if self.kind == SectionKind::Header {
            if let Some(version) = ty.version() {
                out.push_str(&format!("ScriptType: {version}\n"));
            }
        }
        if !self.after.is_empty() {
            out.push_str(&self.after.join("\n"));
            out.push('\n');
        }
        out
    }
}

/// A whole subtitle script.
#[derive(Clone, Debug, PartialEq)]
pub struct Script {
    pub header: Section<Named>,
    pub styles: Section<Style>,
    pub events: Section<Event>,
    pub fonts: Section<Raw>,
    pub graphics: Section<Raw>,
    before: Vec<String>,
    after: Vec<String>,
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl Script {
    pub fn new() -> Self {
        Self {
            header: Section::new(SectionKind::Header),
            styles: Section::new(SectionKind::Styles),
            events: Section::new(SectionKind::Events),
            fonts: Section::new(SectionKind::Fonts),
            graphics: Section::new(SectionKind::Graphics),
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Lines found ahead of the first section.
    pub fn before(&self) -> &[String] {
        &self.before
    }

    /// Lines found after the last section.
    pub fn after(&self) -> &[String] {
        &self.after
    }

    pub fn append_before(&mut self, lines: impl IntoIterator<Item = String>) {
        self.before.extend(lines);
    }

    pub fn append_after(&mut self, lines: impl IntoIterator<Item = String>) {
        self.after.extend(lines);
    }

    pub fn clear_before(&mut self) {
        self.before.clear();
    }

    pub fn clear_after(&mut self) {
        self.after.clear();
    }

    pub fn clear(&mut self) {
        self.header.clear();
        self.styles.clear();
        self.events.clear();
        self.fonts.clear();
        self.graphics.clear();
        self.before.clear();
        self.after.clear();
    }

    /// Appends a parsed line to the section of `kind`. Lines of a variant the
    /// section cannot hold are dropped.
    pub fn push(&mut self, kind: SectionKind, line: Line) {
        match (kind, line) {
            (SectionKind::Header, Line::Named(named)) => self.header.push(named),
            (SectionKind::Styles, Line::Style(style)) => self.styles.push(style),
            (SectionKind::Events, Line::Event(event)) => self.events.push(event),
            (SectionKind::Fonts, Line::Raw(raw)) => self.fonts.push(raw),
            (SectionKind::Graphics, Line::Raw(raw)) => self.graphics.push(raw),
            (kind, line) => {
                tracing::warn!(?kind, ?line, "line does not fit section; dropped");
            }
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.events
            .items()
            .iter()
            .map(|e| e.end_ms)
            .max()
            .unwrap_or(0)
    }
}
