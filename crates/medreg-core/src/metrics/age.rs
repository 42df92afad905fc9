//! Whole-years age derivation.

use chrono::{Datelike, NaiveDate};

/// Completed years between `birthday` and `on`.
///
/// The year difference is decremented while the birthday's (month, day) has
/// not been reached yet. A Feb 29 birthday therefore counts as not reached
/// until March 1 in non-leap years.
pub fn age_in_years(birthday: NaiveDate, on: NaiveDate) -> i32 {
    let mut years = on.year() - birthday.year();
    if (on.month(), on.day()) < (birthday.month(), birthday.day()) {
        years -= 1;
    }
    years
}
