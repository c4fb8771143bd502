//! Parsing of user-entered birth dates and life expectancies.
//!
//! The strict parsers report what went wrong; the lenient resolvers never
//! fail and instead fall back to a value that yields an empty or
//! zero-length timeline.
use crate::grid::MAX_LIFE_EXPECTANCY;
use std::num::ParseIntError;
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date};

pub static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid birth date {value:?}; expected YYYY-MM-DD")]
    BirthDate {
        value: String,
        source: time::error::Parse,
    },
    #[error("invalid life expectancy {value:?}")]
    LifeExpectancy {
        value: String,
        source: ParseIntError,
    },
}

pub fn parse_birth_date(value: &str) -> Result<Date, InputError> {
    Date::parse(value.trim(), &YMD_FMT).map_err(|source| InputError::BirthDate {
        value: value.to_owned(),
        source,
    })
}

pub fn parse_life_expectancy(value: &str) -> Result<u32, InputError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|source| InputError::LifeExpectancy {
            value: value.to_owned(),
            source,
        })
}

/// Resolves an optional birth date, using `today` when it is missing or
/// cannot be parsed
pub fn birth_date_or(value: Option<&str>, today: Date) -> Date {
    match value.map(parse_birth_date) {
        Some(Ok(date)) => date,
        Some(Err(e)) => {
            log::warn!("{e}; using today's date instead");
            today
        }
        None => today,
    }
}

/// Resolves a life expectancy, using 0 when it cannot be parsed and
/// [`MAX_LIFE_EXPECTANCY`] when it is larger than that
pub fn life_expectancy_or_zero(value: &str) -> u32 {
    match parse_life_expectancy(value) {
        Ok(years) if years > MAX_LIFE_EXPECTANCY => {
            log::warn!(
                "Life expectancy {years} is more than {MAX_LIFE_EXPECTANCY}; \
                 using {MAX_LIFE_EXPECTANCY} instead"
            );
            MAX_LIFE_EXPECTANCY
        }
        Ok(years) => years,
        Err(e) => {
            log::warn!("{e}; using 0 instead");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use time::macros::date;

    #[test]
    fn test_parse_birth_date() {
        assert_eq!(
            parse_birth_date("2000-01-15").ok(),
            Some(date!(2000 - 01 - 15))
        );
        assert_eq!(
            parse_birth_date(" 1984-02-29\n").ok(),
            Some(date!(1984 - 02 - 29))
        );
    }

    #[test]
    fn test_parse_birth_date_errors() {
        for bad in ["", "yesterday", "2000-13-01", "2001-02-29", "2000/01/15"] {
            let e = parse_birth_date(bad).expect_err("should not parse");
            assert!(matches!(e, InputError::BirthDate { ref value, .. } if value == bad));
            assert!(e.source().is_some());
        }
    }

    #[test]
    fn test_parse_life_expectancy() {
        assert_eq!(parse_life_expectancy("88").ok(), Some(88));
        assert_eq!(parse_life_expectancy(" 0 ").ok(), Some(0));
        assert!(parse_life_expectancy("-5").is_err());
        assert!(parse_life_expectancy("eighty").is_err());
        assert!(parse_life_expectancy("").is_err());
    }

    #[test]
    fn test_birth_date_fallback() {
        let today = date!(2024 - 03 - 01);
        assert_eq!(birth_date_or(None, today), today);
        assert_eq!(birth_date_or(Some("not a date"), today), today);
        assert_eq!(
            birth_date_or(Some("2000-01-15"), today),
            date!(2000 - 01 - 15)
        );
    }

    #[test]
    fn test_life_expectancy_fallback() {
        assert_eq!(life_expectancy_or_zero("77"), 77);
        assert_eq!(life_expectancy_or_zero("lots"), 0);
        assert_eq!(life_expectancy_or_zero("12.5"), 0);
    }

    #[test]
    fn test_life_expectancy_clamped() {
        assert_eq!(life_expectancy_or_zero("200"), MAX_LIFE_EXPECTANCY);
        assert_eq!(life_expectancy_or_zero("201"), MAX_LIFE_EXPECTANCY);
        assert_eq!(life_expectancy_or_zero("1000000000"), MAX_LIFE_EXPECTANCY);
        assert_eq!(life_expectancy_or_zero("4294967295"), MAX_LIFE_EXPECTANCY);
        assert_eq!(life_expectancy_or_zero("4294967296"), 0);
    }

    #[test]
    fn test_error_messages() {
        let e = parse_life_expectancy("abc").expect_err("should not parse");
        assert_eq!(e.to_string(), "invalid life expectancy \"abc\"");
        let e = parse_birth_date("abc").expect_err("should not parse");
        assert_eq!(
            e.to_string(),
            "invalid birth date \"abc\"; expected YYYY-MM-DD"
        );
    }
}
