use crate::model::Script;

/// Header keys renderers actually need.
pub const DEFAULT_KEEP_INFO: [&str; 5] = [
    "WrapStyle",
    "PlayResX",
    "PlayResY",
    "ScaledBorderAndShadow",
    "YCbCr Matrix",
];

#[derive(Clone, Debug, Default)]
pub struct CleanOptions {
    pub strip_comments: bool,
    pub strip_info: bool,
    /// Header names kept by `strip_info`, compared ignoring case.
    pub keep_info: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub fonts_removed: usize,
    pub graphics_removed: usize,
    pub info_removed: usize,
}

/// Strips embedded fonts and graphics, and whatever else `opts` asks for.
pub fn clean(script: &mut Script, opts: &CleanOptions) -> CleanReport {
    let mut report = CleanReport {
        fonts_removed: script.fonts.len(),
        graphics_removed: script.graphics.len(),
        ..CleanReport::default()
    };
    script.fonts.clear();
    script.graphics.clear();

    if opts.strip_comments {
        strip_comments(script);
    }

    if opts.strip_info {
        let before = script.header.len();
        script.header.retain(|named| {
            opts.keep_info
                .iter()
                .any(|keep| keep.eq_ignore_ascii_case(&named.name))
        });
        report.info_removed = before - script.header.len();
    }

    tracing::info!(
        fonts = report.fonts_removed,
        graphics = report.graphics_removed,
        info = report.info_removed,
        strip_comments = opts.strip_comments,
        "cleaned script"
    );
    report
}

fn strip_comments(script: &mut Script) {
    script.clear_before();
    script.clear_after();

    script.header.clear_before();
    script.header.clear_after();
    script.styles.clear_before();
    script.styles.clear_after();
    script.events.clear_before();
    script.events.clear_after();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{formats::ass::parse_ssa, line::Named};

    fn keep_default() -> Vec<String> {
        DEFAULT_KEEP_INFO.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn strip_info_keeps_allow_list() {
        let mut script = parse_ssa(
            "[Script Info]\nPlayResX: 1920\nTitle: demo\nWrapStyle: 0\nycbcr matrix: TV.709\n",
        )
        .unwrap();
        let opts = CleanOptions {
            strip_info: true,
            keep_info: keep_default(),
            ..CleanOptions::default()
        };

        let report = clean(&mut script, &opts);
        let names: Vec<&str> = script.header.items().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["PlayResX", "WrapStyle", "ycbcr matrix"]);
        assert_eq!(report.info_removed, 1);
    }

    #[test]
    fn fonts_and_graphics_always_go() {
        let mut script =
            parse_ssa("[Script Info]\nTitle: x\n[Fonts]\nfontname: a.ttf\nAAAA\n[Graphics]\nfilename: b.png\n")
                .unwrap();
        let report = clean(&mut script, &CleanOptions::default());
        assert!(script.fonts.is_empty());
        assert!(script.graphics.is_empty());
        assert_eq!(report.fonts_removed, 2);
        assert_eq!(report.graphics_removed, 1);
        assert_eq!(script.header.len(), 1);
    }

    #[test]
    fn strip_comments_clears_every_block() {
        let input = "lead\n[Script Info]\n; c\nTitle: x\njunk\n[V4+ Styles]\n!note\nStyle: A\n[Events]\nComment: 0,0:00:00.00,0:00:01.00,A,,0,0,0,,c\nDialogue: 0,0:00:00.00,0:00:01.00,A,,0,0,0,,x\ntail\n";
        let mut script = parse_ssa(input).unwrap();
        assert_eq!(script.before(), ["lead"]);

        clean(
            &mut script,
            &CleanOptions {
                strip_comments: true,
                ..CleanOptions::default()
            },
        );

        assert!(script.before().is_empty());
        assert!(script.after().is_empty());
        assert!(script.header.after().is_empty());
        assert_eq!(script.header.items(), [Named::new("Title", "x")]);
        assert!(script.styles.items()[0].before.is_empty());
        assert!(script.events.items()[0].before.is_empty());
    }

    #[test]
    fn without_flags_comments_stay() {
        let mut script = parse_ssa("[Script Info]\n; c\nTitle: x\n").unwrap();
        clean(&mut script, &CleanOptions::default());
        assert_eq!(script.header.items()[0].before, ["; c"]);
    }
}
