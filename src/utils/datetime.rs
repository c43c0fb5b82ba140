use chrono::NaiveTime;

/// Formats a time of day following the configured culture's conventions:
/// 12-hour clock for English cultures, 24-hour clock everywhere else.
pub fn format_time_of_day(t: NaiveTime, culture: &str) -> String {
    if culture.to_ascii_lowercase().starts_with("en") {
        t.format("%I:%M %p").to_string()
    } else {
        t.format("%H:%M").to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_follows_culture() {
        let t = NaiveTime::from_hms_opt(20, 30, 0).unwrap();
        assert_eq!(format_time_of_day(t, "en-US"), "08:30 PM");
        assert_eq!(format_time_of_day(t, "ru-RU"), "20:30");
        assert_eq!(format_time_of_day(t, "de"), "20:30");
    }
}
