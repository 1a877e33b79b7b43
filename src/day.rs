use std::fmt;

use time::{util::is_leap_year, Date, Month};

/// First key of every month, January through December.
pub const MONTH_STARTS: [u16; 12] = [1, 32, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar position of a date with February 29th taken out, so that a key
/// names the same month and day in every year. Always within `1..=365`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayOfYear(u16);

impl DayOfYear {
    pub const LAST: u16 = 365;

    pub fn new(day: u16) -> Option<Self> {
        (1..=Self::LAST).contains(&day).then_some(Self(day))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for DayOfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub fn is_leap_day(date: Date) -> bool {
    date.month() == Month::February && date.day() == 29
}

/// Returns `None` for February 29th, which never takes part in a comparison.
///
/// In a leap year the ordinal of every date after February is one higher
/// than the same date in a common year, even once the leap day itself has
/// been dropped, so those ordinals are shifted back by one.
pub fn normalize_day_of_year(date: Date) -> Option<DayOfYear> {
    if is_leap_day(date) {
        return None;
    }

    let mut ordinal = date.ordinal();
    if is_leap_year(date.year()) && date.month() as u8 > Month::February as u8 {
        ordinal -= 1;
    }

    Some(DayOfYear(ordinal))
}

/// Name of the month starting at `day`, or an empty label for any other key.
pub fn month_label(day: u16) -> &'static str {
    MONTH_STARTS
        .iter()
        .position(|&start| start == day)
        .map_or("", |month| MONTH_NAMES[month])
}
