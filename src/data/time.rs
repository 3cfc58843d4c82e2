//! CF time coordinate decoding.
//!
//! Time coordinates follow the CF `"<unit> since <reference>"` convention,
//! e.g. `hours since 1950-01-01 00:00:00`. Only the standard calendar is
//! supported.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Unit of a CF time offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// Seconds.
    Seconds,
    /// Minutes.
    Minutes,
    /// Hours.
    Hours,
    /// Days.
    Days,
}

impl TimeUnit {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(Self::Seconds),
            "min" | "mins" | "minute" | "minutes" => Some(Self::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(Self::Hours),
            "d" | "day" | "days" => Some(Self::Days),
            _ => None,
        }
    }

    fn seconds(self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3600.0,
            Self::Days => 86400.0,
        }
    }
}

/// Parsed CF time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfTimeUnits {
    /// Offset unit.
    pub unit: TimeUnit,
    /// Reference epoch.
    pub reference: NaiveDateTime,
}

impl CfTimeUnits {
    /// Parse a `units` attribute such as `"seconds since 1970-01-01"`.
    pub fn parse(units: &str) -> Option<Self> {
        let (unit, reference) = units.trim().split_once(" since ")?;
        let unit = TimeUnit::parse(unit.trim())?;
        let reference = parse_reference(reference.trim())?;
        Some(Self { unit, reference })
    }

    /// Convert an offset into a date and time.
    pub fn to_datetime(&self, value: f64) -> Option<NaiveDateTime> {
        if !value.is_finite() {
            return None;
        }
        let millis = (value * self.unit.seconds() * 1000.0).round();
        // i64::MAX as f64 rounds up to 2^63, so both ends are exclusive
        if millis >= i64::MAX as f64 || millis <= i64::MIN as f64 {
            return None;
        }
        let offset = TimeDelta::try_milliseconds(millis as i64)?;
        self.reference.checked_add_signed(offset)
    }
}

fn parse_reference(s: &str) -> Option<NaiveDateTime> {
    let s = s
        .trim_end_matches(" UTC")
        .trim_end_matches('Z')
        .trim();

    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Render a time coordinate value for display.
///
/// Decodable values are shown as `YYYY-MM-DD HH:MM:SS`, anything else as
/// the raw number.
pub fn format_time_value(value: f64, units: Option<&str>) -> String {
    units
        .and_then(CfTimeUnits::parse)
        .and_then(|u| u.to_datetime(value))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| format!("{}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hours_since() {
        let units = CfTimeUnits::parse("hours since 1950-01-01").unwrap();
        assert_eq!(units.unit, TimeUnit::Hours);
        assert_eq!(
            units.reference,
            NaiveDate::from_ymd_opt(1950, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_format_seconds_since() {
        let text = format_time_value(86400.0 + 6.0 * 3600.0, Some("seconds since 1970-01-01 00:00:00"));
        assert_eq!(text, "1970-01-02 06:00:00");
    }

    #[test]
    fn test_format_iso_reference() {
        let text = format_time_value(1.5, Some("days since 2025-09-01T00:00:00Z"));
        assert_eq!(text, "2025-09-02 12:00:00");
    }

    #[test]
    fn test_undecodable_units() {
        assert_eq!(format_time_value(12.0, Some("fortnights since 2000-01-01")), "12");
        assert_eq!(format_time_value(3.5, None), "3.5");
        assert_eq!(format_time_value(f64::NAN, Some("days since 2000-01-01")), "NaN");
    }

    #[test]
    fn test_offsets_beyond_duration_range() {
        let units = Some("seconds since 1970-01-01");
        for value in [
            -9_223_372_036_854_775.808,
            9_223_372_036_854_775.807,
            1e300,
            -1e300,
        ] {
            assert_eq!(format_time_value(value, units), format!("{}", value));
        }

        // Representable offset that overflows the calendar
        let units = CfTimeUnits::parse("days since 2000-01-01").unwrap();
        assert_eq!(units.to_datetime(1e9), None);
    }
}
