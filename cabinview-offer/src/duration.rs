use std::sync::LazyLock;

use regex::Regex;

static ISO_DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?$").expect("valid duration pattern"));

/// `PT9H15M` -> `9h 15m`, `PT45M` -> `45m`, `PT11H` -> `11h`.
///
/// Anything outside the `PT[nH][nM]` form comes back unchanged.
pub fn format_duration(duration: &str) -> String {
    let Some(caps) = ISO_DURATION.captures(duration) else {
        return duration.to_string();
    };

    let hours = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
    let minutes = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());

    match (hours, minutes) {
        (Some(h), Some(m)) => format!("{}h {}m", h, m),
        (Some(h), None) => format!("{}h", h),
        (None, Some(m)) => format!("{}m", m),
        (None, None) => duration.to_string(),
    }
}

/// `2025-06-01T21:50:00` -> `21:50`. No timezone conversion: provider
/// timestamps are already local to their airport.
pub fn format_time(datetime: &str) -> String {
    match datetime.split_once('T') {
        Some((_, time)) if !time.is_empty() => time.get(..5).unwrap_or(time).to_string(),
        _ => datetime.to_string(),
    }
}

/// Stops between the first departure and the last arrival.
pub fn stop_count(segment_count: usize) -> usize {
    segment_count.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration("PT9H15M"), "9h 15m");
        assert_eq!(format_duration("PT45M"), "45m");
        assert_eq!(format_duration("PT11H"), "11h");
        assert_eq!(format_duration("PT07H05M"), "7h 5m");
    }

    #[test]
    fn test_format_duration_hours_and_minutes_grid() {
        for h in [0u32, 1, 9, 23, 48] {
            for m in [0u32, 5, 30, 59] {
                assert_eq!(format_duration(&format!("PT{}H{}M", h, m)), format!("{}h {}m", h, m));
            }
        }
    }

    #[test]
    fn test_format_duration_unparseable_is_verbatim() {
        assert_eq!(format_duration(""), "");
        assert_eq!(format_duration("PT"), "PT");
        assert_eq!(format_duration("P1DT2H"), "P1DT2H");
        assert_eq!(format_duration("9h 15m"), "9h 15m");
        assert_eq!(format_duration("PT1H30M15S"), "PT1H30M15S");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time("2025-06-01T21:50:00"), "21:50");
        assert_eq!(format_time("2025-06-01T07:05"), "07:05");
        assert_eq!(format_time("2025-06-01T7"), "7");
        assert_eq!(format_time("2025-06-01"), "2025-06-01");
        assert_eq!(format_time("2025-06-01T"), "2025-06-01T");
    }

    #[test]
    fn test_stop_count() {
        assert_eq!(stop_count(0), 0);
        assert_eq!(stop_count(1), 0);
        for n in 2..6 {
            assert_eq!(stop_count(n), n - 1);
        }
    }
}
