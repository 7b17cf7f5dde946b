use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Inclusive `from`/`to` date range sent as `YYYY-MM-DD` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: Date,
    pub to: Date,
}

impl DateWindow {
    /// Window spanning `days_back` before and `days_ahead` after `today`.
    pub fn around(today: Date, days_back: i64, days_ahead: i64) -> Self {
        Self {
            from: today.saturating_sub(Duration::days(days_back)),
            to: today.saturating_add(Duration::days(days_ahead)),
        }
    }

    pub fn since(from: Date, today: Date) -> Self {
        Self { from, to: today }
    }

    pub fn from_param(&self) -> String {
        format_date(self.from)
    }

    pub fn to_param(&self) -> String {
        format_date(self.to)
    }
}

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Unix seconds as a UTC date-time; `None` when out of range.
pub fn unix_to_datetime(seconds: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(seconds).ok()
}

pub fn format_datetime(value: OffsetDateTime) -> String {
    value
        .format(DATE_TIME_FORMAT)
        .unwrap_or_else(|_| value.to_string())
}
