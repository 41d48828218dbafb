//! MS-DOS packed date/time fields.
//!
//! The date half holds the day of month in bits 0-4, the month in bits 5-8
//! and the years since 1980 in bits 9-15. The time half holds seconds/2 in
//! bits 0-4, minutes in bits 5-10 and hours in bits 11-15. The resolution is
//! therefore two seconds, and only the years 1980 through 2107 fit.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

use crate::error::EntryError;

/// First year representable in a packed date
pub const DOS_EPOCH_YEAR: i32 = 1980;
/// Last year representable in a packed date
pub const DOS_MAX_YEAR: i32 = DOS_EPOCH_YEAR + 0x7f;

/// Converts an MS-DOS date and time into a UTC timestamp.
///
/// Never fails. Fields outside their calendar range carry into the next
/// larger unit, so month 0 is December of the previous year and day 0 is the
/// last day of the previous month.
pub fn dos_to_datetime(date: u16, time: u16) -> DateTime<Utc> {
    let year = i32::from(date >> 9) + DOS_EPOCH_YEAR;
    let month = i32::from((date >> 5) & 0xf);
    let day = i64::from(date & 0x1f);

    let hour = i64::from(time >> 11);
    let minute = i64::from((time >> 5) & 0x3f);
    let second = i64::from(time & 0x1f) * 2;

    // Months are zero based here so that month 0 borrows from the year.
    let months = year * 12 + month - 1;
    let first = NaiveDate::from_ymd_opt(months.div_euclid(12), months.rem_euclid(12) as u32 + 1, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::default());

    let naive = first
        + Duration::days(day - 1)
        + Duration::hours(hour)
        + Duration::minutes(minute)
        + Duration::seconds(second);
    Utc.from_utc_datetime(&naive)
}

/// Converts a timestamp into an MS-DOS `(date, time)` pair.
///
/// The timestamp is moved to UTC first. Odd seconds round down and
/// sub-second precision is dropped. Years outside 1980-2107 are not rejected:
/// the year offset wraps modulo the 16 bit field, exactly as other writers of
/// the format do. Use [`try_datetime_to_dos`] to refuse them instead.
pub fn datetime_to_dos<Tz: TimeZone>(t: &DateTime<Tz>) -> (u16, u16) {
    let t = t.with_timezone(&Utc);
    let date = t.day() as i32 + ((t.month() as i32) << 5) + ((t.year() - DOS_EPOCH_YEAR) << 9);
    let time = t.second() / 2 + (t.minute() << 5) + (t.hour() << 11);
    (date as u16, time as u16)
}

/// Like [`datetime_to_dos`], but fails for years the packed date cannot hold
pub fn try_datetime_to_dos<Tz: TimeZone>(t: &DateTime<Tz>) -> Result<(u16, u16), EntryError> {
    let year = t.with_timezone(&Utc).year();
    if !is_representable(year) {
        return Err(EntryError::DateTimeRange { year });
    }
    Ok(datetime_to_dos(t))
}

/// Whether a year fits in the packed date field
pub fn is_representable(year: i32) -> bool {
    (DOS_EPOCH_YEAR..=DOS_MAX_YEAR).contains(&year)
}

/// Converts a `SystemTime` to UTC, or `None` if chrono cannot represent it
pub fn system_time_to_datetime(t: SystemTime) -> Option<DateTime<Utc>> {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => DateTime::from_timestamp(i64::try_from(d.as_secs()).ok()?, d.subsec_nanos()),
        Err(e) => {
            let d = e.duration();
            let secs = i64::try_from(d.as_secs()).ok()?;
            match d.subsec_nanos() {
                0 => DateTime::from_timestamp(-secs, 0),
                n => DateTime::from_timestamp(-secs - 1, 1_000_000_000 - n),
            }
        }
    }
}

/// Converts a `SystemTime` to UTC. Times chrono cannot represent saturate to
/// its first or last instant, both of which lie outside the packed range.
pub fn saturating_datetime(t: SystemTime) -> DateTime<Utc> {
    system_time_to_datetime(t).unwrap_or_else(|| {
        log::warn!("timestamp {:?} is out of range, clamping", t);
        if t < UNIX_EPOCH {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        }
    })
}
