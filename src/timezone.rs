//! Local-day / UTC conversion for the configured demo timezone.
//!
//! Gap analysis must compare calendar days as the demo user experiences
//! them, not UTC days: a shift worked at 11pm Pacific lands on the next UTC
//! day, and comparing raw timestamps produces off-by-one gaps. Everything
//! date-shaped in the seeding core goes through this module.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};
use chrono_tz::Tz;
use tracing::{info, warn};

/// Source of "now". Injectable so tests can pin the current local day.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

const PACIFIC_STANDARD_UTC_OFFSET_HOURS: i64 = -8;
const PACIFIC_DAYLIGHT_UTC_OFFSET_HOURS: i64 = -7;

/// The timezone the converter operates in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneRule {
    /// A zone from the bundled IANA database.
    Named(Tz),
    /// Hand-built Pacific rule: UTC-8, observing daylight saving (UTC-7)
    /// between the second Sunday of March and the first Sunday of November,
    /// transitioning at 02:00 local. Last resort when the IANA database is
    /// unavailable.
    FixedPacific,
}

/// Resolve the configured timezone identifier, falling back in order:
/// the configured id, `America/Los_Angeles` by IANA name, the `US/Pacific`
/// alias, and finally the built-in Pacific rule. Never fails.
pub fn resolve_zone(configured: Option<&str>) -> ZoneRule {
    if let Some(id) = configured.map(str::trim).filter(|s| !s.is_empty()) {
        match id.parse::<Tz>() {
            Ok(tz) => {
                info!("Using configured timezone: {}", id);
                return ZoneRule::Named(tz);
            }
            Err(_) => {
                warn!(
                    "Configured timezone '{}' not found, falling back to Pacific timezone",
                    id
                );
            }
        }
    }
    pacific_zone()
}

fn pacific_zone() -> ZoneRule {
    if let Ok(tz) = "America/Los_Angeles".parse::<Tz>() {
        info!("Using IANA Pacific timezone: America/Los_Angeles");
        return ZoneRule::Named(tz);
    }
    if let Ok(tz) = "US/Pacific".parse::<Tz>() {
        info!("Using Pacific timezone alias: US/Pacific");
        return ZoneRule::Named(tz);
    }
    warn!("No Pacific timezone in the IANA database, using built-in Pacific rule");
    ZoneRule::FixedPacific
}

impl ZoneRule {
    pub fn name(&self) -> &'static str {
        match self {
            ZoneRule::Named(tz) => tz.name(),
            ZoneRule::FixedPacific => "Pacific Time (built-in)",
        }
    }

    /// Project a UTC instant onto this zone's wall clock.
    pub fn to_local(&self, utc: DateTime<Utc>) -> NaiveDateTime {
        match self {
            ZoneRule::Named(tz) => tz.from_utc_datetime(&utc.naive_utc()).naive_local(),
            ZoneRule::FixedPacific => {
                let naive = utc.naive_utc();
                let offset = if pacific_in_dst_utc(naive) {
                    PACIFIC_DAYLIGHT_UTC_OFFSET_HOURS
                } else {
                    PACIFIC_STANDARD_UTC_OFFSET_HOURS
                };
                naive + Duration::hours(offset)
            }
        }
    }

    /// Convert a wall-clock moment in this zone to UTC.
    ///
    /// Ambiguous local times (fall-back hour) take the earlier offset;
    /// nonexistent local times (spring-forward gap) advance one hour to the
    /// first valid wall-clock moment. Seeded shifts live in 08:00-23:59
    /// local, so neither case is reachable from the generator, but the
    /// conversion stays total.
    pub fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        match self {
            ZoneRule::Named(tz) => match tz.from_local_datetime(&local) {
                LocalResult::Single(dt) => dt.with_timezone(&Utc),
                LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
                LocalResult::None => {
                    let shifted = local + Duration::hours(1);
                    match tz.from_local_datetime(&shifted) {
                        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                            dt.with_timezone(&Utc)
                        }
                        LocalResult::None => Utc.from_utc_datetime(&shifted),
                    }
                }
            },
            ZoneRule::FixedPacific => {
                let offset = if pacific_in_dst_local(local) {
                    PACIFIC_DAYLIGHT_UTC_OFFSET_HOURS
                } else {
                    PACIFIC_STANDARD_UTC_OFFSET_HOURS
                };
                Utc.from_utc_datetime(&(local - Duration::hours(offset)))
            }
        }
    }
}

/// Local transition bounds for the built-in Pacific rule: second Sunday of
/// March 02:00 through first Sunday of November 02:00.
fn pacific_dst_bounds_local(year: i32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = NaiveDate::from_weekday_of_month_opt(year, 3, Weekday::Sun, 2)?.and_hms_opt(2, 0, 0)?;
    let end = NaiveDate::from_weekday_of_month_opt(year, 11, Weekday::Sun, 1)?.and_hms_opt(2, 0, 0)?;
    Some((start, end))
}

fn pacific_in_dst_local(local: NaiveDateTime) -> bool {
    match pacific_dst_bounds_local(local.year()) {
        Some((start, end)) => local >= start && local < end,
        None => false,
    }
}

fn pacific_in_dst_utc(utc: NaiveDateTime) -> bool {
    match pacific_dst_bounds_local(utc.year()) {
        Some((start, end)) => {
            let start_utc = start - Duration::hours(PACIFIC_STANDARD_UTC_OFFSET_HOURS);
            let end_utc = end - Duration::hours(PACIFIC_DAYLIGHT_UTC_OFFSET_HOURS);
            utc >= start_utc && utc < end_utc
        }
        None => false,
    }
}

/// Timezone-aware date service: projects UTC instants to local calendar
/// days and composes local wall-clock moments back into UTC instants.
pub struct LocalTimeConverter {
    zone: ZoneRule,
    clock: Box<dyn Clock>,
}

impl LocalTimeConverter {
    /// Resolve the configured timezone and read the system clock.
    pub fn new(configured: Option<&str>) -> Self {
        Self::with_clock(resolve_zone(configured), Box::new(SystemClock))
    }

    pub fn with_clock(zone: ZoneRule, clock: Box<dyn Clock>) -> Self {
        Self { zone, clock }
    }

    pub fn zone(&self) -> &ZoneRule {
        &self.zone
    }

    /// The local calendar day a UTC instant falls on.
    pub fn local_date(&self, utc: DateTime<Utc>) -> NaiveDate {
        self.zone.to_local(utc).date()
    }

    /// Today, as the configured timezone sees it.
    pub fn current_local_date(&self) -> NaiveDate {
        self.local_date(self.clock.now_utc())
    }

    /// Compose a local date and time-of-day into a UTC instant.
    pub fn to_utc(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        self.zone.to_utc(date.and_time(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now_utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn la() -> ZoneRule {
        ZoneRule::Named(chrono_tz::America::Los_Angeles)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn configured_zone_is_used_when_known() {
        assert_eq!(resolve_zone(Some("UTC")).name(), "UTC");
        assert_eq!(resolve_zone(Some("Asia/Tokyo")).name(), "Asia/Tokyo");
    }

    #[test]
    fn unknown_zone_falls_back_to_pacific() {
        assert_eq!(resolve_zone(Some("Invalid/TimeZone")).name(), "America/Los_Angeles");
    }

    #[test]
    fn missing_or_blank_zone_falls_back_to_pacific() {
        assert_eq!(resolve_zone(None).name(), "America/Los_Angeles");
        assert_eq!(resolve_zone(Some("")).name(), "America/Los_Angeles");
        assert_eq!(resolve_zone(Some("   ")).name(), "America/Los_Angeles");
    }

    #[test]
    fn local_date_shifts_across_utc_midnight() {
        let converter = LocalTimeConverter::with_clock(la(), Box::new(SystemClock));
        // 07:59 UTC is 23:59 the previous day in PST (-8)
        let before = Utc.with_ymd_and_hms(2024, 1, 15, 7, 59, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 1, 15, 8, 1, 0).unwrap();
        assert_eq!(converter.local_date(before), date(2024, 1, 14));
        assert_eq!(converter.local_date(after), date(2024, 1, 15));
    }

    #[test]
    fn current_local_date_uses_injected_clock() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 15, 5, 0, 0).unwrap());
        let converter = LocalTimeConverter::with_clock(la(), Box::new(clock));
        // 05:00 UTC is still Jan 14 in Los Angeles
        assert_eq!(converter.current_local_date(), date(2024, 1, 14));
    }

    #[test]
    fn to_utc_applies_standard_and_daylight_offsets() {
        let converter = LocalTimeConverter::with_clock(la(), Box::new(SystemClock));
        // January: PST, UTC-8
        assert_eq!(
            converter.to_utc(date(2024, 1, 15), time(9, 0)),
            Utc.with_ymd_and_hms(2024, 1, 15, 17, 0, 0).unwrap()
        );
        // July: PDT, UTC-7
        assert_eq!(
            converter.to_utc(date(2024, 7, 15), time(9, 0)),
            Utc.with_ymd_and_hms(2024, 7, 15, 16, 0, 0).unwrap()
        );
    }

    #[test]
    fn spring_forward_gap_advances_one_hour() {
        // 2024-03-10 02:30 does not exist in Los Angeles
        let converter = LocalTimeConverter::with_clock(la(), Box::new(SystemClock));
        let utc = converter.to_utc(date(2024, 3, 10), time(2, 30));
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 3, 10, 10, 30, 0).unwrap());
        assert_eq!(converter.local_date(utc), date(2024, 3, 10));
    }

    #[test]
    fn fall_back_ambiguity_takes_earlier_offset() {
        // 2024-11-03 01:30 occurs twice in Los Angeles; earlier is PDT (-7)
        let converter = LocalTimeConverter::with_clock(la(), Box::new(SystemClock));
        let utc = converter.to_utc(date(2024, 11, 3), time(1, 30));
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 11, 3, 8, 30, 0).unwrap());
    }

    #[test]
    fn builtin_pacific_rule_bounds_for_2024() {
        // Second Sunday of March is the 10th, first Sunday of November the 3rd
        let (start, end) = pacific_dst_bounds_local(2024).unwrap();
        assert_eq!(start.date(), date(2024, 3, 10));
        assert_eq!(end.date(), date(2024, 11, 3));
    }

    #[test]
    fn builtin_pacific_matches_iana_for_representative_days() {
        let iana = LocalTimeConverter::with_clock(la(), Box::new(SystemClock));
        let fixed = LocalTimeConverter::with_clock(ZoneRule::FixedPacific, Box::new(SystemClock));
        for (y, m, d) in [
            (2024, 1, 15),
            (2024, 3, 9),
            (2024, 3, 11),
            (2024, 7, 4),
            (2024, 11, 2),
            (2024, 11, 4),
            (2024, 12, 31),
        ] {
            let day = date(y, m, d);
            assert_eq!(
                iana.to_utc(day, time(12, 0)),
                fixed.to_utc(day, time(12, 0)),
                "offset disagreement on {day}"
            );
        }
    }

    #[test]
    fn builtin_pacific_round_trips_near_midnight() {
        let fixed = LocalTimeConverter::with_clock(ZoneRule::FixedPacific, Box::new(SystemClock));
        let utc = fixed.to_utc(date(2024, 6, 21), time(23, 45));
        assert_eq!(fixed.local_date(utc), date(2024, 6, 21));
    }
}
