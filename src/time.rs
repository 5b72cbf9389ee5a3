//! # Observation timestamps
//!
//! [`Timestamp`] is the parsed form of the `date` column of an occurrence record. It keeps the
//! **wall-clock fields** exactly as written in the source together with the **optional UTC
//! offset**, so that folding a timestamp onto another year never shifts its calendar day.
//!
//! Accepted forms (ISO-8601)
//! -----------------
//! Date part:
//! * `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `YYYYMMDD`
//! * week dates `YYYY-Www`, `YYYYWww`, `YYYY-Www-D`, `YYYYWwwD`
//! * ordinal dates `YYYY-DDD`, `YYYYDDD`
//!
//! Missing components default to the first month, the first day and midnight.
//!
//! A time part may follow a complete date after **any single separator character**
//! (`T`, space, ...): `HH`, `HHMM`, `HH:MM`, `HHMMSS`, `HH:MM:SS`, the seconds optionally
//! followed by a fraction introduced by `.` or `,` (kept to the microsecond). `24:00` is
//! midnight of the next day. The time may end with `Z` or an offset `±HH`, `±HHMM`, `±HH:MM`.
//!
//! Ordering
//! -----------------
//! Two offset-aware timestamps compare as instants, two naive timestamps compare by their
//! wall-clock fields. A naive and an aware timestamp are **not comparable**
//! ([`Timestamp::compare`] returns `None`).
//!
//! Calendar fields
//! -----------------
//! [`Timestamp::year`] and [`Timestamp::day_of_year`] read the wall-clock fields, never the
//! UTC-converted ones.
use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::{Datelike, Days, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::constants::DayOfYear;

#[derive(Error, Debug, PartialEq)]
#[error("not an ISO-8601 date: {0:?}")]
pub struct InvalidTimestamp(pub String);

/// Wall-clock date and time with an optional fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    local: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl Timestamp {
    pub fn new(local: NaiveDateTime, offset: Option<FixedOffset>) -> Self {
        Timestamp { local, offset }
    }

    pub fn local(&self) -> NaiveDateTime {
        self.local
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    pub fn year(&self) -> i32 {
        self.local.year()
    }

    /// Ordinal day (1..=366) of the wall-clock date.
    pub fn day_of_year(&self) -> DayOfYear {
        self.local.ordinal()
    }

    fn utc_instant(&self) -> Option<NaiveDateTime> {
        self.offset
            .map(|offset| self.local - Duration::seconds(i64::from(offset.local_minus_utc())))
    }

    /// Chronological comparison.
    ///
    /// Return
    /// ----------
    /// * `Some(ordering)` when both timestamps are aware (instants) or both are naive (wall clock),
    /// * `None` when one is aware and the other naive.
    pub fn compare(&self, other: &Timestamp) -> Option<Ordering> {
        match (self.utc_instant(), other.utc_instant()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            (None, None) => Some(self.local.cmp(&other.local)),
            _ => None,
        }
    }

    /// Same month, day, time of day and offset in another year.
    ///
    /// Returns `None` when the date does not exist in `year` (Feb 29 into a common year).
    pub fn with_year(&self, year: i32) -> Option<Timestamp> {
        let date = NaiveDate::from_ymd_opt(year, self.local.month(), self.local.day())?;
        Some(Timestamp {
            local: date.and_time(self.local.time()),
            offset: self.offset,
        })
    }
}

/// `n` ASCII digits at `pos` as a number.
fn digits(b: &[u8], pos: usize, n: usize) -> Option<u32> {
    b.get(pos..pos + n)?.iter().try_fold(0u32, |acc, &c| {
        c.is_ascii_digit().then(|| acc * 10 + u32::from(c - b'0'))
    })
}

/// `YYYY`, `YYYY-MM`, `YYYY-MM-DD` or `YYYYMMDD`, as raw fields and bytes consumed.
fn calendar_fields(b: &[u8]) -> Option<((i32, u32, u32), usize)> {
    let year = digits(b, 0, 4)? as i32;
    if b.len() == 4 {
        return Some(((year, 1, 1), 4));
    }

    let dashed = b[4] == b'-';
    let mut pos = 4 + usize::from(dashed);
    let month = digits(b, pos, 2)?;
    pos += 2;
    if pos == b.len() {
        // YYYYMM is not a date.
        return dashed.then_some(((year, month, 1), pos));
    }
    if dashed {
        if b[pos] != b'-' {
            return None;
        }
        pos += 1;
    }
    let day = digits(b, pos, 2)?;
    Some(((year, month, day), pos + 2))
}

/// Monday of ISO week 1 plus `week` weeks and `weekday` days (both 1-based).
fn week_date(year: i32, week: u32, weekday: u32) -> Option<NaiveDate> {
    if !(1..=53).contains(&week) || !(1..=7).contains(&weekday) {
        return None;
    }
    let jan4 = NaiveDate::from_ymd_opt(year, 1, 4)?;
    let week1 = jan4.checked_sub_days(Days::new(u64::from(
        jan4.weekday().num_days_from_monday(),
    )))?;
    week1.checked_add_days(Days::new(u64::from((week - 1) * 7 + weekday - 1)))
}

/// Week dates (`YYYY-Www[-D]`) and ordinal dates (`YYYY-DDD`).
fn week_or_ordinal_date(b: &[u8]) -> Option<(NaiveDate, usize)> {
    let year = digits(b, 0, 4)? as i32;
    let dashed = b.get(4) == Some(&b'-');
    let mut pos = 4 + usize::from(dashed);

    if b.get(pos) == Some(&b'W') {
        let week = digits(b, pos + 1, 2)?;
        pos += 3;
        let mut weekday = 1;
        if pos < b.len() {
            if (b[pos] == b'-') != dashed {
                return None;
            }
            pos += usize::from(dashed);
            weekday = digits(b, pos, 1)?;
            pos += 1;
        }
        Some((week_date(year, week, weekday)?, pos))
    } else {
        let ordinal = digits(b, pos, 3)?;
        Some((NaiveDate::from_yo_opt(year, ordinal)?, pos + 3))
    }
}

/// Date part of `b` and the number of bytes it spans.
///
/// A calendar date with out-of-range fields is rejected outright, only a shape that is not
/// a calendar date falls through to week and ordinal dates.
fn parse_date(b: &[u8]) -> Option<(NaiveDate, usize)> {
    match calendar_fields(b) {
        Some(((year, month, day), pos)) => Some((NaiveDate::from_ymd_opt(year, month, day)?, pos)),
        None => week_or_ordinal_date(b),
    }
}

/// `Z`, `±HH`, `±HHMM` or `±HH:MM`.
fn parse_offset(b: &[u8]) -> Option<FixedOffset> {
    if b == b"Z" || b == b"z" {
        return FixedOffset::east_opt(0);
    }
    let sign = match b.first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let hours = digits(b, 1, 2)?;
    let minutes = match b.len() {
        3 => 0,
        5 => digits(b, 3, 2)?,
        6 if b[3] == b':' => digits(b, 4, 2)?,
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60) as i32)
}

/// Time of day as written: hour, minute, second, microsecond and offset.
#[derive(Debug, Default, PartialEq)]
struct TimeFields {
    hms_micro: [u32; 4],
    offset: Option<FixedOffset>,
}

impl TimeFields {
    fn on(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        let [hour, minute, second, micro] = self.hms_micro;
        if hour == 24 {
            if minute != 0 || second != 0 || micro != 0 {
                return None;
            }
            return Some(date.succ_opt()?.and_time(NaiveTime::MIN));
        }
        date.and_hms_micro_opt(hour, minute, second, micro)
    }
}

fn parse_time(b: &[u8]) -> Option<TimeFields> {
    if b.len() < 2 {
        return None;
    }
    let mut fields = TimeFields::default();
    let mut colons = false;
    let mut pos = 0;

    // Components in order: hour, minute, second, fraction, then room for a trailing offset.
    for comp in 0..5 {
        let Some(&c) = b.get(pos) else {
            break;
        };
        if matches!(c, b'+' | b'-' | b'Z' | b'z') {
            fields.offset = Some(parse_offset(&b[pos..])?);
            return Some(fields);
        }
        match comp {
            1 if c == b':' => {
                colons = true;
                pos += 1;
            }
            2 if colons => {
                if c != b':' {
                    return None;
                }
                pos += 1;
            }
            _ => {}
        }
        match comp {
            0..=2 => {
                fields.hms_micro[comp] = digits(b, pos, 2)?;
                pos += 2;
            }
            3 if matches!(c, b'.' | b',') => {
                let len = b[pos + 1..].iter().take_while(|d| d.is_ascii_digit()).count();
                let kept = len.min(6);
                if kept == 0 {
                    return None;
                }
                fields.hms_micro[3] = digits(b, pos + 1, kept)? * 10u32.pow((6 - kept) as u32);
                pos += 1 + len;
            }
            _ => {}
        }
    }

    (pos == b.len()).then_some(fields)
}

impl FromStr for Timestamp {
    type Err = InvalidTimestamp;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidTimestamp(value.to_string());
        let b = value.trim().as_bytes();

        let (date, end) = parse_date(b).ok_or_else(invalid)?;
        if end == b.len() {
            return Ok(Timestamp {
                local: date.and_time(NaiveTime::MIN),
                offset: None,
            });
        }

        // Any single character separates the date from the time.
        let time = parse_time(&b[end + 1..]).ok_or_else(invalid)?;
        let local = time.on(date).ok_or_else(invalid)?;
        Ok(Timestamp {
            local,
            offset: time.offset,
        })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.local.format("%Y-%m-%dT%H:%M:%S%.f"))?;
        if let Some(offset) = self.offset {
            write!(f, "{offset}")?;
        }
        Ok(())
    }
}

/// Frame title for a day of the synthetic year, e.g. `"March 05"`.
pub fn day_label(year: i32, day: DayOfYear) -> String {
    NaiveDate::from_yo_opt(year, day)
        .map(|date| date.format("%B %d").to_string())
        .unwrap_or_else(|| format!("Day {day}"))
}
