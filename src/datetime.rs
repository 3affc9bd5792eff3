use std::time::SystemTime;

use time::{PrimitiveDateTime, UtcOffset};

/// Local calendar fields of a cabinet file's last-modified stamp, exactly as
/// the engine reports them. The fields carry no timezone; they name an
/// instant in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosDateTime {
    /// Calendar year (e.g. 1997).
    pub year: u16,
    /// Month of the year, 1-12.
    pub month: u8,
    /// Day of the month, 1-31.
    pub day: u8,
    /// Hour, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
    /// Second, 0-59.
    pub second: u8,
}

pub(crate) fn datetime_from_fields(fields: DosDateTime) -> Option<PrimitiveDateTime> {
    let month = time::Month::try_from(fields.month).ok()?;
    let date =
        time::Date::from_calendar_date(i32::from(fields.year), month, fields.day).ok()?;
    let time = time::Time::from_hms(fields.hour, fields.minute, fields.second).ok()?;
    Some(PrimitiveDateTime::new(date, time))
}

/// The stamp is local calendar time with no zone attached, so restoration
/// attaches the current local offset rather than converting from UTC. Falls
/// back to UTC when the platform refuses to disclose the local offset.
pub(crate) fn to_system_time(datetime: PrimitiveDateTime) -> SystemTime {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    SystemTime::from(datetime.assume_offset(offset))
}
