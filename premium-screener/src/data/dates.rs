//! Date arithmetic shared by the screening engines.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Whole days from `as_of` until `expiration`. Negative once expired.
pub fn days_to_expiration(expiration: NaiveDate, as_of: NaiveDate) -> i64 {
    (expiration - as_of).num_days()
}

/// Weekly expiration used when no target date is given.
///
/// Returns `as_of` itself on a Friday, otherwise the following Friday.
pub fn next_friday(as_of: NaiveDate) -> NaiveDate {
    let today = as_of.weekday().num_days_from_monday() as i64;
    let friday = Weekday::Fri.num_days_from_monday() as i64;
    let ahead = (friday - today).rem_euclid(7);
    as_of + Duration::days(ahead)
}
