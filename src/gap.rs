//! History gap analysis: decide what, if anything, needs seeding.
//!
//! All day arithmetic happens in local-day space. Stored UTC instants are
//! projected through the timezone converter before any comparison.

use chrono::{Duration, NaiveDate};

use crate::model::Shift;
use crate::timezone::LocalTimeConverter;

/// Longest trailing window considered plausible to backfill. Gaps beyond
/// this trigger full regeneration instead of patching.
pub const HISTORY_HORIZON_DAYS: i64 = 60;

/// What the generator must produce, as decided by gap analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedingDirective {
    /// Today (or a later day) already has data; write nothing.
    NoOp,
    /// No usable history: seed the full horizon window.
    FullSeed(Vec<NaiveDate>),
    /// Patch the days between the last known shift and today.
    FillGap(Vec<NaiveDate>),
    /// History too stale to patch: delete everything, then seed the full
    /// horizon window.
    RegenerateAll(Vec<NaiveDate>),
}

impl SeedingDirective {
    pub fn dates(&self) -> &[NaiveDate] {
        match self {
            SeedingDirective::NoOp => &[],
            SeedingDirective::FullSeed(dates)
            | SeedingDirective::FillGap(dates)
            | SeedingDirective::RegenerateAll(dates) => dates,
        }
    }
}

/// The full horizon window: `HISTORY_HORIZON_DAYS` dates ending at `today`.
pub fn full_window(today: NaiveDate) -> Vec<NaiveDate> {
    date_range(today - Duration::days(HISTORY_HORIZON_DAYS - 1), today)
}

/// Inclusive day range.
fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut day = start;
    while day <= end {
        dates.push(day);
        day += Duration::days(1);
    }
    dates
}

/// Decide the seeding directive for a user's full shift history as of
/// `today` (a local calendar day).
pub fn analyze(
    history: &[Shift],
    today: NaiveDate,
    converter: &LocalTimeConverter,
) -> SeedingDirective {
    let most_recent = history
        .iter()
        .map(|shift| converter.local_date(shift.date))
        .max();

    let Some(most_recent) = most_recent else {
        return SeedingDirective::FullSeed(full_window(today));
    };

    let gap = (today - most_recent).num_days();
    if gap > HISTORY_HORIZON_DAYS {
        SeedingDirective::RegenerateAll(full_window(today))
    } else if gap <= 0 {
        SeedingDirective::NoOp
    } else {
        SeedingDirective::FillGap(date_range(most_recent + Duration::days(1), today))
    }
}
