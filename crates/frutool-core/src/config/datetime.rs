use thiserror::Error;
use time::macros::{datetime, format_description};
use time::{Duration, PrimitiveDateTime};

use crate::area::layout::MAX_MFG_DATE_TIME;

/// Minute zero of the board manufacture date/time.
pub const MFG_EPOCH: PrimitiveDateTime = datetime!(1996-01-01 00:00);

const STAMP_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateTimeError {
    #[error("the date {value:?} must follow the format \"YYYY-MM-DD HH:MM\"")]
    IncorrectFormat { value: String },
    #[error("the date/time {value:?} must be at least 1996-01-01 00:00")]
    TooLow { value: String },
    #[error("the date/time {value:?} must be at most 2027-11-24 20:15")]
    TooHigh { value: String },
    #[error("0x{minutes:x} minutes does not fit in 24 bits")]
    OutOfRange { minutes: u32 },
}

/// Convert `"YYYY-MM-DD HH:MM"` to minutes since 1996-01-01 00:00.
///
/// # Examples
/// ```
/// use frutool_core::config::datetime::parse_mfg_date_time;
///
/// assert_eq!(parse_mfg_date_time("1996-01-01 00:00").unwrap(), 0);
/// assert_eq!(parse_mfg_date_time("1996-01-02 01:01").unwrap(), 1501);
/// assert_eq!(parse_mfg_date_time("2027-11-24 20:15").unwrap(), 0xFF_FF_FF);
/// assert!(parse_mfg_date_time("2027-11-24 20:16").is_err());
/// ```
pub fn parse_mfg_date_time(value: &str) -> Result<u32, DateTimeError> {
    let date = PrimitiveDateTime::parse(value, STAMP_FORMAT).map_err(|_| {
        DateTimeError::IncorrectFormat {
            value: value.to_string(),
        }
    })?;
    if date < MFG_EPOCH {
        return Err(DateTimeError::TooLow {
            value: value.to_string(),
        });
    }

    let minutes = (date - MFG_EPOCH).whole_minutes();
    u32::try_from(minutes)
        .ok()
        .filter(|minutes| *minutes <= MAX_MFG_DATE_TIME)
        .ok_or(DateTimeError::TooHigh {
            value: value.to_string(),
        })
}

/// Render minutes since 1996-01-01 00:00 as `"YYYY-MM-DD HH:MM"`.
pub fn format_mfg_date_time(minutes: u32) -> Result<String, DateTimeError> {
    if minutes > MAX_MFG_DATE_TIME {
        return Err(DateTimeError::OutOfRange { minutes });
    }
    let date = MFG_EPOCH + Duration::minutes(i64::from(minutes));
    Ok(format!(
        "{:04}-{:02}-{:02} {:02}:{:02}",
        date.year(),
        u8::from(date.month()),
        date.day(),
        date.hour(),
        date.minute()
    ))
}
