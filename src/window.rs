use chrono::naive::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{error::PagecountError, month::MonthPartition};

/// Requested retrieval window at day granularity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TimeWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse a pair of `YYYYMMDD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, PagecountError> {
        Ok(Self::new(parse_day(start)?, parse_day(end)?))
    }

    pub fn start_instant(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    pub fn end_instant(&self) -> NaiveDateTime {
        self.end.and_time(NaiveTime::MIN)
    }

    /// Strict on both sides: a timestamp equal to either boundary is outside.
    pub fn contains(&self, time: NaiveDateTime) -> bool {
        time > self.start_instant() && time < self.end_instant()
    }

    pub fn validate(&self, epoch_floor: NaiveDate, today: NaiveDate) -> Result<(), PagecountError> {
        log::info!("start - {} end - {}", self.start, self.end);

        if self.start < epoch_floor {
            log::error!("Start before epoch floor: start - {} floor - {}", self.start, epoch_floor);
            return Err(PagecountError::Validation(format!(
                "time range must start on or after {}",
                epoch_floor
            )));
        }

        if self.end > today {
            log::error!("End after today: end - {} today - {}", self.end, today);
            return Err(PagecountError::Validation(format!(
                "time range must end on or before {}",
                today
            )));
        }

        if self.end < self.start {
            log::error!("End before start: start - {} end - {}", self.start, self.end);
            return Err(PagecountError::Validation(format!(
                "end {} is before start {}",
                self.end, self.start
            )));
        }

        Ok(())
    }

    pub fn months(&self) -> Vec<MonthPartition> {
        MonthPartition::spanning(self.start, self.end)
    }
}

fn parse_day(s: &str) -> Result<NaiveDate, PagecountError> {
    NaiveDate::parse_from_str(s, "%Y%m%d")
        .map_err(|err| PagecountError::Validation(format!("{:?} is not a YYYYMMDD date: {}", s, err)))
}
