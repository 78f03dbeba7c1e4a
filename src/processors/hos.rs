use crate::{
    data_types::route::{Stop, StopType},
    logvbln,
};

// Slack for float accumulation when comparing hours.
const EPSILON: f64 = 1e-9;

/// Builds a property-carrying driver's duty schedule under the Hours-of-Service rules.
pub struct HosCalculator {
    current_cycle_hours: f64,
    remaining_cycle_hours: f64,
}

struct Schedule {
    stops: Vec<Stop>,
    clock: f64,
    driven: f64,
    since_break: f64,
    shift_driving: f64,
    shift_start: f64,
    cycle_left: f64,
}

impl Schedule {
    fn push(&mut self, r#type: StopType, duration: f64) {
        self.stops.push(Stop::new(r#type, self.clock, duration));
        self.clock += duration;
    }

    fn start_shift(&mut self) {
        self.since_break = 0.;
        self.shift_driving = 0.;
        self.shift_start = self.clock;
    }
}

impl HosCalculator {
    const CC: &str = "HOS";

    pub const MAX_DRIVING_HOURS: f64 = 11.0;
    pub const MAX_DUTY_HOURS: f64 = 14.0;
    pub const MAX_CYCLE_HOURS: f64 = 70.0;
    pub const REQUIRED_BREAK_AFTER: f64 = 8.0;
    pub const MINIMUM_BREAK_DURATION: f64 = 0.5; // hours
    pub const OFF_DUTY_RESET: f64 = 10.0;
    pub const CYCLE_RESTART: f64 = 34.0;
    pub const PICKUP_DURATION: f64 = 1.0;
    pub const DROPOFF_DURATION: f64 = 1.0;

    pub fn new(current_cycle_hours: f64) -> Self {
        let current_cycle_hours = current_cycle_hours.clamp(0., HosCalculator::MAX_CYCLE_HOURS);

        Self {
            current_cycle_hours,
            remaining_cycle_hours: HosCalculator::MAX_CYCLE_HOURS - current_cycle_hours,
        }
    }

    pub fn current_cycle_hours(&self) -> f64 {
        self.current_cycle_hours
    }

    /// Cycle hours available when the trip starts.
    pub fn remaining_cycle_hours(&self) -> f64 {
        self.remaining_cycle_hours
    }

    /// The whole drive fits in the cycle hours left at departure, no restart needed.
    pub fn is_compliant(&self, total_drive_time: f64) -> bool {
        total_drive_time <= self.remaining_cycle_hours + EPSILON
    }

    /// Pickup, the driving segments interleaved with the stops the rules force, then dropoff.
    /// The schedule is contiguous: each stop starts where the previous one ended.
    pub fn calculate_breaks(&self, total_drive_time: f64) -> Vec<Stop> {
        let total_drive_time = if total_drive_time.is_finite() {
            total_drive_time.max(0.)
        } else {
            0.
        };

        let mut schedule = Schedule {
            stops: Vec::new(),
            clock: 0.,
            driven: 0.,
            since_break: 0.,
            shift_driving: 0.,
            shift_start: 0.,
            cycle_left: self.remaining_cycle_hours,
        };

        schedule.push(StopType::Pickup, HosCalculator::PICKUP_DURATION);

        while total_drive_time - schedule.driven > EPSILON {
            if schedule.cycle_left <= EPSILON {
                logvbln!("Cycle exhausted at {:.2}h, restarting", schedule.clock);
                schedule.push(StopType::Restart, HosCalculator::CYCLE_RESTART);
                schedule.cycle_left = HosCalculator::MAX_CYCLE_HOURS;
                schedule.start_shift();
                continue;
            }

            let shift_drive_left = HosCalculator::MAX_DRIVING_HOURS - schedule.shift_driving;
            let window_left = HosCalculator::MAX_DUTY_HOURS - (schedule.clock - schedule.shift_start);

            if shift_drive_left <= EPSILON || window_left <= EPSILON {
                logvbln!("Shift limit reached at {:.2}h, resting", schedule.clock);
                schedule.push(StopType::Rest, HosCalculator::OFF_DUTY_RESET);
                schedule.start_shift();
                continue;
            }

            let until_break = HosCalculator::REQUIRED_BREAK_AFTER - schedule.since_break;
            if until_break <= EPSILON {
                schedule.push(StopType::Break, HosCalculator::MINIMUM_BREAK_DURATION);
                schedule.since_break = 0.;
                continue;
            }

            let segment = until_break
                .min(shift_drive_left)
                .min(window_left)
                .min(total_drive_time - schedule.driven)
                .min(schedule.cycle_left);

            schedule.push(StopType::Driving, segment);
            schedule.driven += segment;
            schedule.since_break += segment;
            schedule.shift_driving += segment;
            schedule.cycle_left -= segment;
        }

        schedule.push(StopType::Dropoff, HosCalculator::DROPOFF_DURATION);

        schedule.stops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(stops: &[Stop]) -> Vec<StopType> {
        stops.iter().map(|stop| stop.r#type).collect()
    }

    fn driving_hours(stops: &[Stop]) -> f64 {
        stops
            .iter()
            .filter(|stop| stop.r#type == StopType::Driving)
            .map(|stop| stop.duration)
            .sum()
    }

    fn assert_contiguous(stops: &[Stop]) {
        assert_eq!(stops[0].start_time, 0.);
        for pair in stops.windows(2) {
            assert!((pair[0].end_time - pair[1].start_time).abs() < 1e-9, "{:?}", pair);
        }
        assert!(stops.iter().all(|stop| stop.duration > 0.));
    }

    #[test]
    fn short_trip_needs_no_break() {
        let stops = HosCalculator::new(0.).calculate_breaks(3.);

        assert_eq!(types(&stops), vec![StopType::Pickup, StopType::Driving, StopType::Dropoff]);
        assert_eq!(stops[1].start_time, 1.);
        assert_eq!(stops[1].end_time, 4.);
        assert_eq!(stops[2].end_time, 5.);
    }

    #[test]
    fn zero_drive_is_pickup_and_dropoff() {
        let stops = HosCalculator::new(10.).calculate_breaks(0.);

        assert_eq!(types(&stops), vec![StopType::Pickup, StopType::Dropoff]);
    }

    #[test]
    fn break_after_eight_hours_and_rest_after_eleven() {
        let stops = HosCalculator::new(0.).calculate_breaks(20.);

        assert_eq!(
            types(&stops),
            vec![
                StopType::Pickup,
                StopType::Driving,
                StopType::Break,
                StopType::Driving,
                StopType::Rest,
                StopType::Driving,
                StopType::Break,
                StopType::Driving,
                StopType::Dropoff,
            ]
        );
        assert_eq!(stops[1].duration, 8.);
        assert_eq!(stops[3].duration, 3.);
        assert_eq!(stops[5].duration, 8.);
        assert!((stops[7].duration - 1.).abs() < 1e-9);
        assert!((stops[8].end_time - 33.).abs() < 1e-9);
        assert_contiguous(&stops);
    }

    #[test]
    fn duty_window_caps_driving() {
        // Pickup and break count toward the 14 hour window.
        let stops = HosCalculator::new(0.).calculate_breaks(11.);
        let shift_end = stops
            .iter()
            .filter(|stop| stop.r#type == StopType::Driving)
            .map(|stop| stop.end_time)
            .fold(0., f64::max);

        assert!(shift_end <= HosCalculator::MAX_DUTY_HOURS + 1e-9);
        assert!((driving_hours(&stops) - 11.).abs() < 1e-9);
    }

    #[test]
    fn exhausted_cycle_forces_restart() {
        let calculator = HosCalculator::new(68.);
        let stops = calculator.calculate_breaks(5.);

        assert_eq!(calculator.remaining_cycle_hours(), 2.);
        assert!(!calculator.is_compliant(5.));
        assert!(types(&stops).contains(&StopType::Restart));
        assert!((driving_hours(&stops) - 5.).abs() < 1e-9);
        assert_contiguous(&stops);
    }

    #[test]
    fn no_driving_segment_breaks_the_rules() {
        for drive in [0.5, 7.9, 8., 13.3, 27.75, 55., 90.] {
            let stops = HosCalculator::new(12.5).calculate_breaks(drive);

            assert!((driving_hours(&stops) - drive).abs() < 1e-6, "drive {}", drive);
            assert_contiguous(&stops);

            let mut since_break = 0.;
            let mut shift_driving = 0.;
            for stop in &stops {
                match stop.r#type {
                    StopType::Driving => {
                        since_break += stop.duration;
                        shift_driving += stop.duration;
                    }
                    StopType::Break => since_break = 0.,
                    StopType::Rest | StopType::Restart => {
                        since_break = 0.;
                        shift_driving = 0.;
                    }
                    _ => {}
                }

                assert!(since_break <= HosCalculator::REQUIRED_BREAK_AFTER + 1e-9);
                assert!(shift_driving <= HosCalculator::MAX_DRIVING_HOURS + 1e-9);
            }
        }
    }

    #[test]
    fn compliance_uses_hours_available_at_departure() {
        let calculator = HosCalculator::new(60.);

        assert!(calculator.is_compliant(10.));
        assert!(!calculator.is_compliant(10.5));
        assert_eq!(calculator.current_cycle_hours(), 60.);
    }
}
