//! Date and season mapping for the reserved date placeholders.
//!
//! Directory services store the password-change time as a count of
//! 100-nanosecond ticks since 1601-01-01. The reserved placeholders
//! (`{YYYY}`, `{SeasonGerman}`, ...) render the calendar date of that value.
//! Dates are taken in UTC.

use chrono::{DateTime, Datelike, NaiveDate};

use crate::data;
use crate::error::{MaskError, MaskResult};

/// Ticks between 1601-01-01 and the Unix epoch
pub const EPOCH_OFFSET_TICKS: i64 = 116_444_736_000_000_000;

const TICKS_PER_SECOND: i64 = 10_000_000;
const NANOS_PER_TICK: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Dec-Feb winter, Mar-May spring, Jun-Aug summer, Sep-Nov autumn.
    /// `month` is 1-based.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Season::Spring => 0,
            Season::Summer => 1,
            Season::Autumn => 2,
            Season::Winter => 3,
        }
    }

    pub fn localized(self, locale: SeasonLocale) -> &'static str {
        let table = match locale {
            SeasonLocale::German => &data::GERMAN_SEASONS,
            SeasonLocale::American => &data::AMERICAN_SEASONS,
            SeasonLocale::British => &data::BRITISH_SEASONS,
        };
        table[self.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonLocale {
    German,
    American,
    British,
}

/// One of the reserved date placeholder keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `yyyy`: full year
    Year,
    /// `yy`: two-digit year
    ShortYear,
    /// `mm`: zero-padded month number
    PaddedMonth,
    /// `m`: plain month number
    Month,
    MonthGerman,
    MonthEnglish,
    Season(SeasonLocale),
}

impl DateFormat {
    /// Look up a keyword, ignoring case. Returns `None` for anything that is
    /// not a reserved date placeholder.
    pub fn from_name(name: &str) -> Option<Self> {
        let format = match name.to_lowercase().as_str() {
            "yyyy" => DateFormat::Year,
            "yy" => DateFormat::ShortYear,
            "mm" => DateFormat::PaddedMonth,
            "m" => DateFormat::Month,
            "monthgerman" => DateFormat::MonthGerman,
            "monthenglish" => DateFormat::MonthEnglish,
            "seasongerman" => DateFormat::Season(SeasonLocale::German),
            "seasonamerican" => DateFormat::Season(SeasonLocale::American),
            "seasonbritish" => DateFormat::Season(SeasonLocale::British),
            _ => return None,
        };
        Some(format)
    }

    /// Like [`DateFormat::from_name`] but fails with `UnsupportedFormat`.
    pub fn parse(name: &str) -> MaskResult<Self> {
        Self::from_name(name).ok_or_else(|| MaskError::UnsupportedFormat(name.to_string()))
    }

    pub fn format(self, date: NaiveDate) -> String {
        let month_index = date.month0() as usize;
        match self {
            DateFormat::Year => date.year().to_string(),
            DateFormat::ShortYear => format!("{:02}", date.year().rem_euclid(100)),
            DateFormat::PaddedMonth => format!("{:02}", date.month()),
            DateFormat::Month => date.month().to_string(),
            DateFormat::MonthGerman => data::GERMAN_MONTHS[month_index].to_string(),
            DateFormat::MonthEnglish => data::ENGLISH_MONTHS[month_index].to_string(),
            DateFormat::Season(locale) => Season::from_month(date.month())
                .localized(locale)
                .to_string(),
        }
    }
}

/// Returns true when `name` is one of the reserved date placeholders.
pub fn is_date_placeholder(name: &str) -> bool {
    DateFormat::from_name(name).is_some()
}

/// Convert a raw tick count into a calendar date.
pub fn parse_timestamp(raw: &str) -> MaskResult<NaiveDate> {
    let invalid = || MaskError::InvalidTimestamp(raw.to_string());
    let ticks: i64 = raw.trim().parse().map_err(|_| invalid())?;

    let since_epoch = ticks.checked_sub(EPOCH_OFFSET_TICKS).ok_or_else(invalid)?;
    let seconds = since_epoch.div_euclid(TICKS_PER_SECOND);
    let nanos = since_epoch.rem_euclid(TICKS_PER_SECOND) * NANOS_PER_TICK;
    let nanos = u32::try_from(nanos).map_err(|_| invalid())?;

    DateTime::from_timestamp(seconds, nanos)
        .map(|time| time.date_naive())
        .ok_or_else(invalid)
}

/// Render a raw timestamp with the named format keyword.
pub fn format_timestamp(raw: &str, format: &str) -> MaskResult<String> {
    let format = DateFormat::parse(format)?;
    Ok(format.format(parse_timestamp(raw)?))
}

/// Render a raw timestamp as `YYYY-MM-DD`, or an empty string when the value
/// is missing or unparsable.
pub fn display_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
