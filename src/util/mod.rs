use chrono::{Duration, Local, NaiveDateTime};

pub mod geo;
pub mod logging;

pub struct DateTimeUtils {}

impl DateTimeUtils {
    /// `start` moved forward by a number of hours, to the nearest second.
    pub fn after_hours(start: NaiveDateTime, hours: f64) -> NaiveDateTime {
        start + Duration::seconds((hours * 3600.0).round() as i64)
    }

    pub fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
        (to - from).num_seconds() as f64 / 3600.0
    }

    pub fn clock(datetime: NaiveDateTime) -> String {
        datetime.format("%H:%M").to_string()
    }

    pub fn date(datetime: NaiveDateTime) -> String {
        datetime.format("%Y-%m-%d").to_string()
    }

    pub fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|date| date.and_hms_opt(hour, min, 0))
            .unwrap()
    }

    #[test]
    fn offsets_are_rounded_to_the_second() {
        let later = DateTimeUtils::after_hours(at(22, 0), 2.5);

        assert_eq!(DateTimeUtils::clock(later), "00:30");
        assert_eq!(DateTimeUtils::date(later), "2026-10-17");
        assert_eq!(DateTimeUtils::hours_between(at(22, 0), later), 2.5);
    }
}
