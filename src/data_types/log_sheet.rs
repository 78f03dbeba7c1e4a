use std::fmt;

use serde_derive::{Deserialize, Serialize};

use super::route::StopType;

/// Duty status codes of a driver's daily log.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DutyStatus {
    #[serde(rename = "D")]
    Driving,
    #[serde(rename = "SB")]
    SleeperBerth,
    #[serde(rename = "ON")]
    OnDuty,
    #[serde(rename = "OFF")]
    OffDuty,
}

impl DutyStatus {
    pub fn code(&self) -> &'static str {
        match self {
            DutyStatus::Driving => "D",
            DutyStatus::SleeperBerth => "SB",
            DutyStatus::OnDuty => "ON",
            DutyStatus::OffDuty => "OFF",
        }
    }
}

impl From<StopType> for DutyStatus {
    fn from(value: StopType) -> Self {
        match value {
            StopType::Driving => DutyStatus::Driving,
            StopType::Break => DutyStatus::SleeperBerth,
            StopType::Pickup | StopType::Dropoff => DutyStatus::OnDuty,
            StopType::Rest | StopType::Restart => DutyStatus::OffDuty,
        }
    }
}

impl fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Activity {
    pub status: DutyStatus,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`, or `24:00` when the activity runs into the next day
    pub end_time: String,
    pub duration: f64,
    pub location: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogSheet {
    /// `YYYY-MM-DD`
    pub date: String,
    pub activities: Vec<Activity>,
    pub total_hours: f64,
}

impl LogSheet {
    pub fn new(date: String, activities: Vec<Activity>) -> Self {
        let total_hours = activities.iter().map(|activity| activity.duration).sum();

        Self {
            date,
            activities,
            total_hours,
        }
    }

    pub fn hours_in(&self, status: DutyStatus) -> f64 {
        self.activities
            .iter()
            .filter(|activity| activity.status == status)
            .map(|activity| activity.duration)
            .sum()
    }
}

impl fmt::Display for LogSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Log Sheet - {}", self.date)?;
        writeln!(
            f,
            "{:<6} {:<10} {:<8} {:>14}  {}",
            "Status", "Start Time", "End Time", "Duration (hrs)", "Location"
        )?;

        for activity in &self.activities {
            writeln!(
                f,
                "{:<6} {:<10} {:<8} {:>14.2}  {}",
                activity.status, activity.start_time, activity.end_time, activity.duration, activity.location
            )?;
        }

        write!(f, "{:>26} {:>14.2}", "Total Hours:", self.total_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(status: DutyStatus, duration: f64) -> Activity {
        Activity {
            status,
            start_time: "08:00".to_string(),
            end_time: "09:00".to_string(),
            duration,
            location: "Chicago, IL".to_string(),
        }
    }

    #[test]
    fn totals_are_summed_from_activities() {
        let sheet = LogSheet::new(
            "2026-10-16".to_string(),
            vec![
                activity(DutyStatus::OnDuty, 1.0),
                activity(DutyStatus::Driving, 8.0),
                activity(DutyStatus::SleeperBerth, 0.5),
                activity(DutyStatus::Driving, 2.25),
            ],
        );

        assert_eq!(sheet.total_hours, 11.75);
        assert_eq!(sheet.hours_in(DutyStatus::Driving), 10.25);
    }

    #[test]
    fn status_codes_on_the_wire() {
        assert_eq!(serde_json::to_string(&DutyStatus::SleeperBerth).unwrap(), r#""SB""#);
        assert_eq!(serde_json::from_str::<DutyStatus>(r#""OFF""#).unwrap(), DutyStatus::OffDuty);
        assert_eq!(DutyStatus::from(StopType::Dropoff), DutyStatus::OnDuty);
    }

    #[test]
    fn renders_durations_with_two_decimals() {
        let sheet = LogSheet::new("2026-10-16".to_string(), vec![activity(DutyStatus::Driving, 1.0 / 3.0)]);
        let rendered = sheet.to_string();

        assert!(rendered.starts_with("Log Sheet - 2026-10-16"));
        assert!(rendered.contains("0.33  Chicago, IL"));
        assert!(rendered.ends_with("0.33"));
    }
}
