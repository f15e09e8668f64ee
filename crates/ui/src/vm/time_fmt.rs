use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[must_use]
pub fn format_optional_datetime(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), format_datetime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_core::time::fixed_now;

    #[test]
    fn formats_minutes_in_utc() {
        assert_eq!(format_datetime(fixed_now()), "2023-11-14 22:13 UTC");
        assert_eq!(format_optional_datetime(None), "-");
    }
}
