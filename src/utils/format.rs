//! Display formatters
//!
//! Human-readable rendering of byte counts and elapsed recording time.

/// Unit ladder for byte formatting, base 1024.
const SIZE_UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Format a byte count with the largest base-1024 unit that keeps the
/// scaled value at or above 1, with two decimal digits.
///
/// Returns exactly `"0 B"` for zero. Inputs below 1 B render in bytes;
/// inputs past the YB range stay clamped to YB rather than indexing out
/// of the unit table.
pub fn bytes_to_size(bytes: f64) -> String {
    if bytes == 0.0 {
        return "0 B".to_string();
    }

    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", value, SIZE_UNITS[unit])
}

/// Format an elapsed second count as a clock string.
///
/// `HH:MM:SS` once a full hour has elapsed, `MM:SS` before that. Every
/// component is zero-padded to two digits; components floor rather than
/// round.
pub fn format_elapsed_time(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bytes() {
        assert_eq!(bytes_to_size(0.0), "0 B");
    }

    #[test]
    fn exact_powers_of_1024() {
        assert_eq!(bytes_to_size(1.0), "1.00 B");
        assert_eq!(bytes_to_size(1024.0), "1.00 KB");
        assert_eq!(bytes_to_size(1_048_576.0), "1.00 MB");
        assert_eq!(bytes_to_size(1024f64.powi(3)), "1.00 GB");
        assert_eq!(bytes_to_size(1024f64.powi(8)), "1.00 YB");
    }

    #[test]
    fn two_decimal_digits() {
        assert_eq!(bytes_to_size(1536.0), "1.50 KB");
        assert_eq!(bytes_to_size(123.0), "123.00 B");
        assert_eq!(bytes_to_size(2_621_440.0), "2.50 MB");
    }

    #[test]
    fn clamps_above_unit_table() {
        // 1024^9 would index past YB; stays clamped to the last unit.
        assert_eq!(bytes_to_size(1024f64.powi(9)), "1024.00 YB");
    }

    #[test]
    fn fractional_bytes_stay_in_bytes() {
        assert_eq!(bytes_to_size(0.5), "0.50 B");
    }

    #[test]
    fn elapsed_under_an_hour() {
        assert_eq!(format_elapsed_time(0), "00:00");
        assert_eq!(format_elapsed_time(5), "00:05");
        assert_eq!(format_elapsed_time(65), "01:05");
        assert_eq!(format_elapsed_time(3599), "59:59");
    }

    #[test]
    fn elapsed_with_hours() {
        assert_eq!(format_elapsed_time(3600), "01:00:00");
        assert_eq!(format_elapsed_time(3725), "01:02:05");
        assert_eq!(format_elapsed_time(36_615), "10:10:15");
    }
}
