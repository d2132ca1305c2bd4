//! Probabilistic shift planning for one calendar day.
//!
//! Every entry point takes the random source as a parameter so callers can
//! fix the sequence of draws and get reproducible plans.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use rand::Rng;

/// Chance of working at all, by day of week.
pub const EARLY_WEEK_SHIFT_PROBABILITY: f64 = 0.10; // Mon, Tue
pub const MID_WEEK_SHIFT_PROBABILITY: f64 = 0.75; // Wed, Thu
pub const WEEKEND_SHIFT_PROBABILITY: f64 = 0.90; // Fri, Sat, Sun

/// Chance that a working day is a split (double) day.
pub const DOUBLE_SHIFT_PROBABILITY: f64 = 0.25;

pub const MIN_SHIFT_HOURS: u32 = 3;
pub const MAX_SINGLE_SHIFT_HOURS: u32 = 8;
/// First shift of a double is shorter so the second plus a break still fits.
pub const MAX_FIRST_SHIFT_HOURS: u32 = 6;
pub const MAX_DAILY_HOURS: u32 = 12;

/// Start windows: morning, afternoon, evening. Half-open hour ranges.
const START_WINDOWS: [(u32, u32); 3] = [(8, 12), (12, 16), (16, 20)];

/// Start minutes are quarter-hour aligned.
const START_MINUTES: [u32; 4] = [0, 15, 30, 45];

/// Break between the two shifts of a double, in hours. Drawn with
/// fractional precision; only first-shift starts are quarter-hour aligned.
const MIN_BREAK_HOURS: f64 = 1.0;
const MAX_BREAK_HOURS: f64 = 3.0;

const CREDIT_TIP_RANGE: std::ops::RangeInclusive<u32> = 50..=200;
const CASH_TIP_RANGE: std::ops::RangeInclusive<u32> = 0..=100;
const TIPOUT_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

const SECS_PER_HOUR: u32 = 3600;

/// Latest second of the local day a shift may end on: 23:59:00.
const DAY_END_SECS: u32 = 23 * SECS_PER_HOUR + 59 * 60;

/// One shift slot on a local calendar day, before conversion to UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedShift {
    pub start: NaiveTime,
    pub hours: u32,
    pub credit_tips: u32,
    pub cash_tips: u32,
    pub tipout: u32,
}

impl PlannedShift {
    /// Start of the shift, seconds from local midnight.
    pub fn start_secs(&self) -> u32 {
        use chrono::Timelike;
        self.start.num_seconds_from_midnight()
    }

    /// End of the shift, seconds from local midnight.
    pub fn end_secs(&self) -> u32 {
        self.start_secs() + self.hours * SECS_PER_HOUR
    }
}

/// Probability that any shift is worked on the given day of week.
pub fn shift_probability(day: Weekday) -> f64 {
    match day {
        Weekday::Mon | Weekday::Tue => EARLY_WEEK_SHIFT_PROBABILITY,
        Weekday::Wed | Weekday::Thu => MID_WEEK_SHIFT_PROBABILITY,
        Weekday::Fri | Weekday::Sat | Weekday::Sun => WEEKEND_SHIFT_PROBABILITY,
    }
}

/// Plan the shifts for one local calendar day: zero (the probability draw
/// said no work), one, or two non-overlapping slots.
pub fn plan_day<R: Rng>(date: NaiveDate, rng: &mut R) -> Vec<PlannedShift> {
    let p = shift_probability(date.weekday());
    if rng.gen_range(0.0..1.0) > p {
        return Vec::new();
    }

    if rng.gen_range(0.0..1.0) < DOUBLE_SHIFT_PROBABILITY {
        plan_double(rng)
    } else {
        vec![plan_single(rng)]
    }
}

/// Uniformly pick a start window, an hour within it, and an aligned minute.
fn draw_start<R: Rng>(rng: &mut R) -> (u32, u32) {
    let (lo, hi) = START_WINDOWS[rng.gen_range(0..START_WINDOWS.len())];
    let hour = rng.gen_range(lo..hi);
    let minute = START_MINUTES[rng.gen_range(0..START_MINUTES.len())];
    (hour, minute)
}

/// Clamp a duration so the shift ends on its own calendar day.
fn clamp_to_day(start_hour: u32, hours: u32) -> u32 {
    if start_hour + hours > 23 {
        (23 - start_hour).max(MIN_SHIFT_HOURS)
    } else {
        hours
    }
}

fn draw_tips<R: Rng>(start_secs: u32, hours: u32, rng: &mut R) -> PlannedShift {
    PlannedShift {
        start: time_from_secs(start_secs),
        hours,
        credit_tips: rng.gen_range(CREDIT_TIP_RANGE),
        cash_tips: rng.gen_range(CASH_TIP_RANGE),
        tipout: rng.gen_range(TIPOUT_RANGE),
    }
}

fn time_from_secs(secs: u32) -> NaiveTime {
    // Planner arithmetic keeps starts strictly inside the day.
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
        .expect("shift start stays within the day")
}

fn plan_single<R: Rng>(rng: &mut R) -> PlannedShift {
    let (hour, minute) = draw_start(rng);
    let hours = clamp_to_day(hour, rng.gen_range(MIN_SHIFT_HOURS..=MAX_SINGLE_SHIFT_HOURS));
    draw_tips(hour * SECS_PER_HOUR + minute * 60, hours, rng)
}

fn plan_double<R: Rng>(rng: &mut R) -> Vec<PlannedShift> {
    let (hour, minute) = draw_start(rng);
    let first_hours = clamp_to_day(hour, rng.gen_range(MIN_SHIFT_HOURS..=MAX_FIRST_SHIFT_HOURS));
    let first_start_secs = hour * SECS_PER_HOUR + minute * 60;
    let first = draw_tips(first_start_secs, first_hours, rng);

    let break_secs =
        (rng.gen_range(MIN_BREAK_HOURS..MAX_BREAK_HOURS) * SECS_PER_HOUR as f64).round() as u32;
    let second_start_secs = first.end_secs() + break_secs;

    // An evening first shift can run late enough that no minimum-length
    // second shift ends before 23:59; the day stays a single.
    let max_fit_hours = DAY_END_SECS.saturating_sub(second_start_secs) / SECS_PER_HOUR;
    if max_fit_hours < MIN_SHIFT_HOURS {
        return vec![first];
    }

    let max_second_hours = MAX_SINGLE_SHIFT_HOURS.min(MAX_DAILY_HOURS - first_hours);
    let second_hours = rng
        .gen_range(MIN_SHIFT_HOURS..=max_second_hours)
        .min(max_fit_hours);
    let second = draw_tips(second_start_secs, second_hours, rng);
    vec![first, second]
}
