use crate::model::ScriptType;

/// Reads as much of a timestamp as is present. Components may only be missing
/// from the end; anything unreadable counts as zero, and so does a timestamp
/// too large for `u64` milliseconds.
pub fn parse_time(s: &str, ty: ScriptType) -> u64 {
    let sub_sep = if ty.is_substation() { '.' } else { ',' };

    let mut parts = s.split(':');
    let hour = read_component(parts.next());
    let min = read_component(parts.next());

    let (sec, sub) = match parts.next() {
        Some(rest) => {
            let mut rest = rest.split(sub_sep);
            (read_component(rest.next()), read_component(rest.next()))
        }
        None => (0, 0),
    };
    let scale = if ty.is_substation() { 10 } else { 1 };

    to_millis(hour, min, sec, sub, scale).unwrap_or(0)
}

fn to_millis(hour: u64, min: u64, sec: u64, sub: u64, scale: u64) -> Option<u64> {
    hour.checked_mul(60)?
        .checked_add(min)?
        .checked_mul(60)?
        .checked_add(sec)?
        .checked_mul(1000)?
        .checked_add(sub.checked_mul(scale)?)
}

fn read_component(part: Option<&str>) -> u64 {
    part.and_then(|p| p.trim().parse().ok()).unwrap_or(0)
}

/// `H:MM:SS.CC` for SSA/ASS, `HH:MM:SS,mmm` for SRT.
pub fn format_time(ms: u64, ty: ScriptType) -> String {
    let hour = ms / 3_600_000;
    let min = ms % 3_600_000 / 60_000;
    let sec = ms % 60_000 / 1000;
    let milli = ms % 1000;

    if ty.is_substation() {
        let centis = milli / 10;
        format!("{hour}:{min:02}:{sec:02}.{centis:02}")
    } else {
        format!("{hour:02}:{min:02}:{sec:02},{milli:03}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ass_centiseconds() {
        assert_eq!(parse_time("0:00:01.23", ScriptType::Ass), 1_230);
        assert_eq!(parse_time("1:02:03.04", ScriptType::Ssa), 3_723_040);
    }

    #[test]
    fn parses_srt_milliseconds() {
        assert_eq!(parse_time("01:23:45,678", ScriptType::Srt), 5_025_678);
    }

    #[test]
    fn missing_components_underfill() {
        assert_eq!(parse_time("1", ScriptType::Ass), 3_600_000);
        assert_eq!(parse_time("0:01", ScriptType::Ass), 60_000);
        assert_eq!(parse_time("0:00:05", ScriptType::Srt), 5_000);
        assert_eq!(parse_time("", ScriptType::Ass), 0);
        assert_eq!(parse_time("x:y:z", ScriptType::Ass), 0);
    }

    #[test]
    fn overflowing_timestamp_reads_as_zero() {
        assert_eq!(parse_time("0:00:00.18446744073709551615", ScriptType::Ass), 0);
        assert_eq!(parse_time("99999999999999999:00:00.00", ScriptType::Ass), 0);
        assert_eq!(parse_time("5124095576030431:00:00,000", ScriptType::Srt), 0);
    }

    #[test]
    fn formats_per_dialect() {
        assert_eq!(format_time(5_025_678, ScriptType::Ass), "1:23:45.67");
        assert_eq!(format_time(5_025_678, ScriptType::Srt), "01:23:45,678");
        assert_eq!(format_time(36_000_000, ScriptType::Ass), "10:00:00.00");
    }

    #[test]
    fn round_trips_at_each_granularity() {
        for t in [0, 9, 10, 999, 1_000, 59_999, 3_599_990, 86_399_999] {
            assert_eq!(
                parse_time(&format_time(t, ScriptType::Ass), ScriptType::Ass),
                t - t % 10
            );
            assert_eq!(parse_time(&format_time(t, ScriptType::Srt), ScriptType::Srt), t);
        }
    }
}
