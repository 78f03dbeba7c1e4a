use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    data_types::{
        location::{Location, RouteInput},
        log_sheet::{Activity, DutyStatus, LogSheet},
        route::{Stop, StopType},
    },
    logvbln,
    util::DateTimeUtils,
};

/// The three places of a trip, used to describe where each activity happens.
#[derive(Debug, Clone)]
pub struct TripLocations {
    pub current: Location,
    pub pickup: Location,
    pub dropoff: Location,
}

impl From<&RouteInput> for TripLocations {
    fn from(input: &RouteInput) -> Self {
        Self {
            current: input.current_location.clone(),
            pickup: input.pickup_location.clone(),
            dropoff: input.dropoff_location.clone(),
        }
    }
}

struct DayBuilder {
    sheets: Vec<LogSheet>,
    date: Option<NaiveDate>,
    activities: Vec<Activity>,
}

impl DayBuilder {
    fn add(&mut self, date: NaiveDate, activity: Activity) {
        self.date.get_or_insert(date);
        self.activities.push(activity);
    }

    fn close(&mut self) {
        if let Some(date) = self.date.take() {
            let activities = std::mem::take(&mut self.activities);
            self.sheets.push(LogSheet::new(date.format("%Y-%m-%d").to_string(), activities));
        }
    }
}

#[derive(Default)]
pub struct LogSheetGenerator {}

impl LogSheetGenerator {
    const CC: &str = "LogSheets";

    pub fn new() -> Self {
        Self {}
    }

    /// "City, State" out of a formatted address; the first two comma separated parts.
    pub fn format_address(address: Option<&str>) -> String {
        let Some(address) = address.filter(|address| !address.trim().is_empty()) else {
            return "En Route".to_string();
        };

        let parts: Vec<&str> = address.split(", ").collect();
        if parts.len() >= 2 {
            return format!("{}, {}", parts[0], parts[1]);
        }

        address.to_string()
    }

    pub fn location_description(stop_type: StopType, locations: &TripLocations) -> String {
        let short = |location: &Location| LogSheetGenerator::format_address(location.address.as_deref());

        match stop_type {
            StopType::Pickup => short(&locations.pickup),
            StopType::Dropoff => short(&locations.dropoff),
            StopType::Driving => format!("En Route: {} → {}", short(&locations.current), short(&locations.dropoff)),
            StopType::Break => format!("Rest Stop near {}", short(&locations.current)),
            StopType::Rest | StopType::Restart => format!("Off Duty near {}", short(&locations.current)),
        }
    }

    /// One sheet per calendar day. Activities crossing midnight are split, the first part ending at `24:00`.
    pub fn generate_daily_logs(
        &self,
        stops: &[Stop],
        start: NaiveDateTime,
        locations: &TripLocations,
    ) -> Vec<LogSheet> {
        let mut days = DayBuilder {
            sheets: Vec::new(),
            date: None,
            activities: Vec::new(),
        };

        for stop in stops {
            let status = DutyStatus::from(stop.r#type);
            let location = LogSheetGenerator::location_description(stop.r#type, locations);
            let activity = |from: NaiveDateTime, end_time: String, duration: f64| Activity {
                status,
                start_time: DateTimeUtils::clock(from),
                end_time,
                duration,
                location: location.clone(),
            };

            let mut from = DateTimeUtils::after_hours(start, stop.start_time);
            let to = DateTimeUtils::after_hours(start, stop.end_time);

            while from.date() < to.date() {
                let Some(midnight) = from
                    .date()
                    .succ_opt()
                    .and_then(|next_day| next_day.and_hms_opt(0, 0, 0))
                else {
                    break;
                };

                days.add(
                    from.date(),
                    activity(from, "24:00".to_string(), DateTimeUtils::hours_between(from, midnight)),
                );
                days.close();

                from = midnight;
            }

            if to > from {
                days.add(
                    from.date(),
                    activity(from, DateTimeUtils::clock(to), DateTimeUtils::hours_between(from, to)),
                );
            }
        }

        days.close();

        logvbln!("Generated {} log sheet(s) for {} stop(s)", days.sheets.len(), stops.len());

        days.sheets
    }
}
