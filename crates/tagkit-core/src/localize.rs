//! Localized long-date formatting.
//!
//! `localize("en-US", "2012", "5", "1")` renders `"Friday, June 1, 2012"`.
//! Months are zero-based and a missing day means the first of the month.

use chrono::{Locale, NaiveDate};
use thiserror::Error;

/// Locale used when no language tag is given.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Localization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocalizeError {
    #[error("Invalid language tag: {0:?}")]
    InvalidLocale(String),
    #[error("Missing date field: {0}")]
    MissingField(&'static str),
    #[error("Invalid {field} value: {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[error("Date out of range: year {year}, month {month}, day {day}")]
    OutOfRange { year: i32, month: u32, day: u32 },
}

/// Result type for localization.
pub type LocalizeResult<T> = Result<T, LocalizeError>;

/// Name tables and long-date pattern for one supported locale.
struct LocaleFormat {
    tag: &'static str,
    locale: Locale,
    pattern: &'static str,
}

// First entry per language is its fallback for unsupported regions.
const LOCALES: &[LocaleFormat] = &[
    LocaleFormat { tag: "en-US", locale: Locale::en_US, pattern: "%A, %B %-d, %Y" },
    LocaleFormat { tag: "en-GB", locale: Locale::en_GB, pattern: "%A, %-d %B %Y" },
    LocaleFormat { tag: "sr-RS", locale: Locale::sr_RS, pattern: "%A, %-d. %B %Y." },
    LocaleFormat { tag: "de-DE", locale: Locale::de_DE, pattern: "%A, %-d. %B %Y" },
    LocaleFormat { tag: "fr-FR", locale: Locale::fr_FR, pattern: "%A %-d %B %Y" },
    LocaleFormat { tag: "es-ES", locale: Locale::es_ES, pattern: "%A, %-d de %B de %Y" },
];

/// Format a date as localized long text (weekday, day, month name, year).
///
/// Every argument is the raw attribute string, `None` when absent. Only `day`
/// and `lang` are optional.
pub fn localize(
    lang: Option<&str>,
    year: Option<&str>,
    month: Option<&str>,
    day: Option<&str>,
) -> LocalizeResult<String> {
    let format = resolve_locale(lang)?;

    let year: i32 = parse_field("year", year)?;
    let month: u32 = parse_field("month", month)?;
    let day: u32 = match day {
        Some(day) => parse_field("day", Some(day))?,
        None => 1,
    };

    // Zero-based month, no roll-over into the next month or year.
    let date = month
        .checked_add(1)
        .and_then(|m| NaiveDate::from_ymd_opt(year, m, day))
        .ok_or(LocalizeError::OutOfRange { year, month, day })?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or(LocalizeError::OutOfRange { year, month, day })?;

    Ok(midnight
        .and_utc()
        .format_localized(format.pattern, format.locale)
        .to_string())
}

fn parse_field<T: std::str::FromStr>(field: &'static str, value: Option<&str>) -> LocalizeResult<T> {
    let value = value.ok_or(LocalizeError::MissingField(field))?;
    value.trim().parse().map_err(|_| LocalizeError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn resolve_locale(lang: Option<&str>) -> LocalizeResult<&'static LocaleFormat> {
    let tag = lang.unwrap_or(DEFAULT_LOCALE);
    if !is_well_formed_tag(tag) {
        return Err(LocalizeError::InvalidLocale(tag.to_string()));
    }

    if let Some(format) = LOCALES.iter().find(|f| f.tag.eq_ignore_ascii_case(tag)) {
        return Ok(format);
    }

    let primary = tag.split('-').next().unwrap_or(tag);
    if let Some(format) = LOCALES
        .iter()
        .find(|f| f.tag.split('-').next().is_some_and(|p| p.eq_ignore_ascii_case(primary)))
    {
        log::debug!("Locale {} not supported, using {}", tag, format.tag);
        return Ok(format);
    }

    log::warn!("Locale {} not supported, using {}", tag, DEFAULT_LOCALE);
    Ok(&LOCALES[0])
}

/// Loose BCP 47 shape check: `alpha{2,8}` followed by `-alnum{1,8}` subtags.
fn is_well_formed_tag(tag: &str) -> bool {
    let mut subtags = tag.split('-');
    let primary_ok = subtags
        .next()
        .is_some_and(|p| (2..=8).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphabetic()));
    primary_ok && subtags.all(|s| (1..=8).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphanumeric()))
}
