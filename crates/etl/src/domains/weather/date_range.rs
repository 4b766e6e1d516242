use mining_etl_core::FRESHNESS_WINDOW_DAYS;
use std::fmt;
use time::{macros::format_description, Date, Duration, OffsetDateTime, UtcOffset};

use crate::Error;

/// Inclusive calendar-date interval with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, Error> {
        if start > end {
            return Err(Error::InvalidRange(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Builds a range from `YYYY-MM-DD` strings.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, Error> {
        let (Some(start), Some(end)) = (start, end) else {
            return Err(Error::InvalidRange(String::from(
                "start date and end date must be provided",
            )));
        };
        DateRange::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

pub fn parse_date(value: &str) -> Result<Date, Error> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        Error::InvalidRange(format!(
            "'{}' is not a date in the format YYYY-MM-DD: {}",
            value, e
        ))
    })
}

/// First day served by the forecast endpoint: `today` minus the freshness window.
pub fn freshness_boundary(today: Date) -> Date {
    today
        .checked_sub(Duration::days(FRESHNESS_WINDOW_DAYS))
        .unwrap_or(Date::MIN)
}

/// Calendar date at the site for the instant `now`.
pub fn site_today(now: OffsetDateTime, offset: UtcOffset) -> Date {
    now.to_offset(offset).date()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherEndpoint {
    Archive,
    Forecast,
}

impl fmt::Display for WeatherEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherEndpoint::Archive => write!(f, "archive"),
            WeatherEndpoint::Forecast => write!(f, "forecast"),
        }
    }
}

/// Which upstream weather endpoint(s) serve a requested range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherPlan {
    Archive(DateRange),
    Forecast(DateRange),
    /// Archive covers `[start, boundary)`, forecast covers `[boundary, end]`.
    Split {
        archive: DateRange,
        forecast: DateRange,
    },
}

impl WeatherPlan {
    pub fn route(range: DateRange, boundary: Date) -> Self {
        if range.end < boundary {
            return WeatherPlan::Archive(range);
        }
        if range.start >= boundary {
            return WeatherPlan::Forecast(range);
        }
        // start < boundary <= end, so the day before the boundary is still >= start
        let last_archive_day = boundary.previous_day().unwrap_or(boundary);
        WeatherPlan::Split {
            archive: DateRange {
                start: range.start,
                end: last_archive_day,
            },
            forecast: DateRange {
                start: boundary,
                end: range.end,
            },
        }
    }

    /// Requests in the order their results are concatenated.
    pub fn requests(&self) -> Vec<(WeatherEndpoint, DateRange)> {
        match *self {
            WeatherPlan::Archive(range) => vec![(WeatherEndpoint::Archive, range)],
            WeatherPlan::Forecast(range) => vec![(WeatherEndpoint::Forecast, range)],
            WeatherPlan::Split { archive, forecast } => vec![
                (WeatherEndpoint::Archive, archive),
                (WeatherEndpoint::Forecast, forecast),
            ],
        }
    }
}

impl fmt::Display for WeatherPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .requests()
            .iter()
            .map(|(endpoint, range)| format!("{} {}", endpoint, range))
            .collect();
        write!(f, "{}", parts.join(" + "))
    }
}
