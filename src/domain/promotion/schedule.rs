//! Active-window evaluation.
//!
//! A promotion is live when, in its client's timezone, today is one of its
//! days and the current instant lies strictly between today's `start_at` and
//! `end_at`. An unknown timezone or a malformed time-of-day makes the
//! promotion inactive.

use super::Promotion;
use crate::domain::client::Client;
use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc,
    Weekday,
};
use chrono_tz::Tz;

impl Promotion {
    /// Whether the promotion is live at `now` for the owning `client`.
    pub fn is_active(&self, now: DateTime<Utc>, client: &Client) -> bool {
        is_active_in(self, now, &client.timezone)
    }
}

/// Evaluates the active window of `promotion` at `now` in `timezone`.
pub fn is_active_in(promotion: &Promotion, now: DateTime<Utc>, timezone: &str) -> bool {
    let Some(tz) = resolve_timezone(timezone) else {
        return false;
    };

    let local = now.with_timezone(&tz);
    let today = weekday_name(local.weekday());
    if !promotion.days.iter().any(|day| day == today) {
        return false;
    }

    let date = local.date_naive();
    let (Some(start), Some(end)) = (
        local_boundary(&promotion.start_at, date, &tz),
        local_boundary(&promotion.end_at, date, &tz),
    ) else {
        return false;
    };

    start < now && now < end
}

/// Keeps the promotions that are live at `now` for `client`.
pub fn filter_active(promotions: Vec<Promotion>, client: &Client, now: DateTime<Utc>) -> Vec<Promotion> {
    promotions
        .into_iter()
        .filter(|p| p.is_active(now, client))
        .collect()
}

/// Lower-case English weekday name, as stored in a promotion's days.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

// An empty identifier means UTC.
pub(crate) fn resolve_timezone(name: &str) -> Option<Tz> {
    if name.is_empty() {
        return Some(Tz::UTC);
    }
    name.parse::<Tz>().ok()
}

/// Turns "HH:MM" into an instant on `date` in `tz`.
///
/// Components must be integers but are not range-checked: they are added to
/// local midnight, so "24:00" lands on the next day's midnight. An ambiguous
/// local time takes the earlier instant; one skipped by a clock-forward jump
/// moves forward by the size of the jump (02:30 becomes 03:30).
fn local_boundary(time_of_day: &str, date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    let mut parts = time_of_day.split(':');
    let (Some(hours), Some(minutes), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;

    let offset = TimeDelta::try_hours(hours)?.checked_add(&TimeDelta::try_minutes(minutes)?)?;
    let naive = date.and_hms_opt(0, 0, 0)?.checked_add_signed(offset)?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => skipped_local_time(naive, tz),
    }
}

// Reads a wall-clock time that falls in a gap with the offset in force
// before the gap.
fn skipped_local_time(naive: NaiveDateTime, tz: &Tz) -> Option<DateTime<Utc>> {
    let before = naive.checked_sub_signed(TimeDelta::try_days(1)?)?;
    let offset = tz.offset_from_utc_datetime(&before).fix();
    let utc = naive.checked_sub_signed(TimeDelta::try_seconds(offset.local_minus_utc().into())?)?;
    Some(Utc.from_utc_datetime(&utc))
}
