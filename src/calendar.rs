//! Week and year arithmetic between a birth date and "today".
//!
//! Every function takes "today" as an argument instead of reading the clock,
//! so a single computation pass always sees one consistent date.
use time::{Date, Month};

const DAYS_IN_WEEK: i32 = 7;

/// Julian-day offset from a Monday-based weekday index to that week's
/// Thursday
const THURSDAY_OFFSET: i32 = 3;

/// Returns the ISO-8601 week number of `date`, in the range `1..=53`.
///
/// Weeks start on Monday, and week 1 is the week containing the first
/// Thursday of the year, so dates in early January can belong to the last
/// week of the previous year and dates in late December to week 1 of the
/// next one.
pub fn week_number(date: Date) -> u8 {
    let day_nr = i32::from(date.weekday().number_days_from_monday());
    let anchor = date.to_julian_day() - day_nr + THURSDAY_OFFSET;
    // Only the outermost weeks of the representable calendar can push the
    // anchor Thursday (or its year's first Thursday) out of range.
    let Some(first) = Date::from_julian_day(anchor)
        .ok()
        .and_then(|thursday| first_thursday(thursday.year()))
    else {
        return date.iso_week();
    };
    let weeks = (anchor - first.to_julian_day()) / DAYS_IN_WEEK;
    u8::try_from(weeks + 1).unwrap_or_else(|_| date.iso_week())
}

/// Returns the first Thursday of `year`, or `None` if it falls outside the
/// range supported by [`Date`]
fn first_thursday(year: i32) -> Option<Date> {
    let jan1 = Date::from_calendar_date(year, Month::January, 1).ok()?;
    let weekday = jan1.weekday().number_days_from_sunday();
    if weekday == 4 {
        Some(jan1)
    } else {
        let day = 1 + (4 + 7 - weekday) % 7;
        Date::from_calendar_date(year, Month::January, day).ok()
    }
}

/// Number of calendar years between `birth` and `today`.
///
/// This is a plain subtraction of year numbers; it does not check whether
/// the birthday has already come around this year.
pub fn elapsed_years(birth: Date, today: Date) -> i32 {
    today.year() - birth.year()
}

/// Difference between the ISO week numbers of `today` and `birth`.
///
/// The result is not normalized across year boundaries and may be negative.
pub fn elapsed_weeks(birth: Date, today: Date) -> i32 {
    i32::from(week_number(today)) - i32::from(week_number(birth))
}

/// How far into the timeline "today" is, as used to decide which grid cells
/// are checked
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Elapsed {
    pub years: i32,
    pub weeks: i32,
}

impl Elapsed {
    /// Years and weeks from `birth` to `today`
    pub fn between(birth: Date, today: Date) -> Elapsed {
        Elapsed {
            years: elapsed_years(birth, today),
            weeks: elapsed_weeks(birth, today),
        }
    }

    /// Returns `true` if the week `week` of year `year` of the timeline is at
    /// or before "today"
    pub fn covers(&self, year: u32, week: u32) -> bool {
        let (year, week) = (i64::from(year), i64::from(week));
        let (years, weeks) = (i64::from(self.years), i64::from(self.weeks));
        year < years || (year == years && week <= weeks)
    }

    /// Returns `true` if the week `week` of year `year` is the one containing
    /// "today"
    pub fn is_at(&self, year: u32, week: u32) -> bool {
        i64::from(year) == i64::from(self.years) && i64::from(week) == i64::from(self.weeks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_week_number_year_boundaries() {
        assert_eq!(week_number(date!(2021 - 01 - 01)), 53);
        assert_eq!(week_number(date!(2021 - 01 - 03)), 53);
        assert_eq!(week_number(date!(2021 - 01 - 04)), 1);
        assert_eq!(week_number(date!(2020 - 12 - 31)), 53);
        assert_eq!(week_number(date!(2019 - 12 - 30)), 1);
        assert_eq!(week_number(date!(2019 - 12 - 29)), 52);
        assert_eq!(week_number(date!(2022 - 01 - 02)), 52);
        assert_eq!(week_number(date!(2024 - 12 - 31)), 1);
        assert_eq!(week_number(date!(2026 - 01 - 01)), 1);
        assert_eq!(week_number(date!(2027 - 01 - 03)), 53);
    }

    #[test]
    fn test_week_number_mid_year() {
        assert_eq!(week_number(date!(2024 - 03 - 01)), 9);
        assert_eq!(week_number(date!(2000 - 01 - 15)), 2);
        assert_eq!(week_number(date!(2023 - 11 - 16)), 46);
    }

    #[test]
    fn test_week_number_matches_iso_week() {
        let mut date = date!(1900 - 01 - 01);
        let end = date!(2100 - 12 - 31);
        while date <= end {
            let week = week_number(date);
            assert!((1..=53).contains(&week), "week {week} out of range for {date}");
            assert_eq!(week, date.iso_week(), "mismatch for {date}");
            let Some(next) = date.next_day() else {
                break;
            };
            date = next;
        }
    }

    #[test]
    fn test_week_number_calendar_limits() {
        assert_eq!(week_number(Date::MIN), Date::MIN.iso_week());
        assert_eq!(week_number(Date::MAX), Date::MAX.iso_week());
    }

    #[test]
    fn test_elapsed_years_is_calendar_subtraction() {
        // The birthday hasn't happened yet in 2024, but the year still counts.
        assert_eq!(elapsed_years(date!(2000 - 12 - 31), date!(2024 - 01 - 01)), 24);
        assert_eq!(elapsed_years(date!(2000 - 01 - 15), date!(2024 - 03 - 01)), 24);
        assert_eq!(elapsed_years(date!(2000 - 01 - 15), date!(2000 - 01 - 15)), 0);
    }

    #[test]
    fn test_elapsed_years_crosses_new_year() {
        let birth = date!(1990 - 06 - 10);
        let before = elapsed_years(birth, date!(2023 - 12 - 31));
        let after = elapsed_years(birth, date!(2024 - 01 - 01));
        assert_eq!(after, before + 1);
    }

    #[test]
    fn test_elapsed_years_future_birth() {
        assert_eq!(elapsed_years(date!(2030 - 01 - 01), date!(2024 - 03 - 01)), -6);
    }

    #[test]
    fn test_elapsed_weeks() {
        assert_eq!(elapsed_weeks(date!(2000 - 01 - 15), date!(2024 - 03 - 01)), 7);
        // Birth week later in the year than today's week
        assert_eq!(elapsed_weeks(date!(2000 - 10 - 01), date!(2024 - 03 - 01)), -30);
        // Today in the last ISO week of the previous year
        assert_eq!(elapsed_weeks(date!(2000 - 01 - 15), date!(2021 - 01 - 01)), 51);
    }

    #[test]
    fn test_elapsed_between() {
        let elapsed = Elapsed::between(date!(2000 - 01 - 15), date!(2024 - 03 - 01));
        assert_eq!(elapsed, Elapsed { years: 24, weeks: 7 });
        assert!(elapsed.covers(23, 52));
        assert!(elapsed.covers(24, 7));
        assert!(!elapsed.covers(24, 8));
        assert!(!elapsed.covers(25, 1));
        assert!(elapsed.is_at(24, 7));
        assert!(!elapsed.is_at(24, 6));
    }

    #[test]
    fn test_elapsed_negative_covers_nothing() {
        let elapsed = Elapsed { years: -6, weeks: 3 };
        assert!(!elapsed.covers(0, 1));
        assert!(!elapsed.is_at(0, 3));
    }
}
