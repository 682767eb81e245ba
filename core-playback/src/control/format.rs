//! Clock formatting for the time labels.

/// Format whole seconds as `H:MM:SS` from one hour up, `MM:SS` below.
///
/// Fractions are truncated. Negative and non-finite inputs render as zero.
///
/// ```rust
/// use core_playback::control::format_clock;
///
/// assert_eq!(format_clock(65.9), "01:05");
/// assert_eq!(format_clock(3725.0), "1:02:05");
/// ```
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_an_hour() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(9.99), "00:09");
        assert_eq!(format_clock(600.0), "10:00");
        assert_eq!(format_clock(3599.0), "59:59");
    }

    #[test]
    fn test_hours() {
        assert_eq!(format_clock(3600.0), "1:00:00");
        assert_eq!(format_clock(36_061.0), "10:01:01");
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(format_clock(-5.0), "00:00");
        assert_eq!(format_clock(f64::NAN), "00:00");
        assert_eq!(format_clock(f64::INFINITY), "00:00");
    }
}
