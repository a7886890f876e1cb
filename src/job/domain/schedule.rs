//! Scheduled period of a job request.

use super::JobDomainError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Date, local start time and length of a job.
///
/// Date and start time are naive values understood in the job's local
/// timezone. The derived instants are always normalised to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobSchedule {
    date: NaiveDate,
    start_time: NaiveTime,
    duration_hours: u16,
}

impl JobSchedule {
    /// Creates a validated schedule.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidDuration`] when `duration_hours` is
    /// zero.
    pub const fn new(
        date: NaiveDate,
        start_time: NaiveTime,
        duration_hours: u16,
    ) -> Result<Self, JobDomainError> {
        if duration_hours == 0 {
            return Err(JobDomainError::InvalidDuration);
        }
        Ok(Self {
            date,
            start_time,
            duration_hours,
        })
    }

    /// Returns the scheduled date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the local start time.
    #[must_use]
    pub const fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    /// Returns the length of the job in hours.
    #[must_use]
    pub const fn duration_hours(&self) -> u16 {
        self.duration_hours
    }

    /// Returns the start instant, interpreting date and time in `tz`.
    ///
    /// Ambiguous local times (clocks going back) resolve to the earliest
    /// instant.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NonexistentLocalTime`] when the local time
    /// falls in a gap of `tz` (clocks going forward).
    pub fn start_datetime<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateTime<Utc>, JobDomainError> {
        let local = NaiveDateTime::new(self.date, self.start_time);
        tz.from_local_datetime(&local)
            .earliest()
            .map(|start| start.with_timezone(&Utc))
            .ok_or(JobDomainError::NonexistentLocalTime {
                date: self.date,
                time: self.start_time,
            })
    }

    /// Returns the end instant: start plus the duration, normalised to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NonexistentLocalTime`] when the start time
    /// does not exist in `tz`.
    pub fn end_datetime<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateTime<Utc>, JobDomainError> {
        let start = self.start_datetime(tz)?;
        Ok(start + TimeDelta::hours(i64::from(self.duration_hours)))
    }
}
