use crate::ApiError;
use chrono::{
    DateTime,
    NaiveDate,
    NaiveDateTime,
    Utc,
};
use chrono_tz::Tz;
use serde::Serialize;

/// Reports are dated in US Mountain time, daylight saving included.
pub const REPORT_TIME_ZONE: Tz = chrono_tz::America::Denver;

/// The management server's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerTime {
    utc: DateTime<Utc>,
}

impl ServerTime {
    pub fn new(utc: DateTime<Utc>) -> Self {
        Self { utc }
    }

    /// Parses the `ServerDateTimeUTC` value, e.g. `2024-10-08T17:02:11.383Z`.
    pub fn parse(value: &str) -> Result<Self, ApiError> {
        let value = value.trim();
        if let Ok(utc) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self::new(utc.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.fZ")
            .map(|naive| Self::new(naive.and_utc()))
            .map_err(|source| ApiError::InvalidServerTime {
                value: value.to_string(),
                source,
            })
    }

    pub fn utc(&self) -> DateTime<Utc> {
        self.utc
    }

    pub fn local(&self) -> DateTime<Tz> {
        self.utc.with_timezone(&REPORT_TIME_ZONE)
    }

    /// The Mountain-time calendar date the resource report is requested for.
    pub fn report_date(&self) -> NaiveDate {
        self.local().date_naive()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn summer_time_is_six_hours_behind() {
        let time = ServerTime::parse("2024-07-04T18:30:00.000Z").unwrap();
        assert_eq!(time.local().format("%Y-%m-%d %H:%M:%S").to_string(), "2024-07-04 12:30:00");
        assert_eq!(time.report_date(), NaiveDate::from_ymd_opt(2024, 7, 4).unwrap());
    }

    #[test]
    fn winter_evening_falls_on_the_previous_day() {
        let time = ServerTime::parse("2024-01-15T03:00:00.1234567Z").unwrap();
        assert_eq!(time.local().format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-14 20:00:00");
        assert_eq!(time.report_date(), NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
    }

    #[test]
    fn accepts_timestamps_without_fraction() {
        let time = ServerTime::parse("2024-10-08T17:02:11Z").unwrap();
        assert_eq!(time.utc().format("%H:%M:%S").to_string(), "17:02:11");
    }

    #[test]
    fn rejects_garbage() {
        let err = ServerTime::parse("yesterday").unwrap_err();
        assert!(matches!(err, ApiError::InvalidServerTime { .. }));
    }
}
