//! In-memory freelancer directory.

use async_trait::async_trait;
use chrono::{Datelike, NaiveTime, Timelike, Weekday};
use std::sync::{Arc, RwLock};

use crate::job::domain::{FreelancerId, JobRequest, PhoneType, ServiceKind};
use crate::lifecycle::ports::{
    FreelancerDirectory, FreelancerDirectoryError, FreelancerDirectoryResult,
};

/// Part of the day a shift starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftBand {
    /// 06:00 to 12:00.
    Mornings,
    /// 12:00 to 17:00.
    Afternoons,
    /// 17:00 to 22:00.
    Evenings,
    /// 22:00 to 06:00.
    Night,
}

impl ShiftBand {
    /// Returns the band a shift starting at `start` falls in.
    #[must_use]
    pub fn containing(start: NaiveTime) -> Self {
        match start.hour() {
            6..=11 => Self::Mornings,
            12..=16 => Self::Afternoons,
            17..=21 => Self::Evenings,
            _ => Self::Night,
        }
    }
}

/// What the directory knows about one freelancer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreelancerProfile {
    id: FreelancerId,
    service: ServiceKind,
    published: bool,
    years_experience: u16,
    phone: Option<PhoneType>,
    districts: Vec<String>,
    days: Vec<Weekday>,
    bands: Vec<ShiftBand>,
}

impl FreelancerProfile {
    /// Creates a published profile with no experience and no phone, free to
    /// work anywhere at any time.
    #[must_use]
    pub const fn new(id: FreelancerId, service: ServiceKind) -> Self {
        Self {
            id,
            service,
            published: true,
            years_experience: 0,
            phone: None,
            districts: Vec::new(),
            days: Vec::new(),
            bands: Vec::new(),
        }
    }

    /// Hides the profile from matching.
    #[must_use]
    pub const fn unpublished(mut self) -> Self {
        self.published = false;
        self
    }

    /// Sets the freelancer's years of experience.
    #[must_use]
    pub const fn with_years_experience(mut self, years: u16) -> Self {
        self.years_experience = years;
        self
    }

    /// Sets the freelancer's phone.
    #[must_use]
    pub const fn with_phone(mut self, phone: PhoneType) -> Self {
        self.phone = Some(phone);
        self
    }

    /// Restricts the freelancer to job requests in the given postcode
    /// districts, e.g. `SW1A`.
    #[must_use]
    pub fn with_districts(mut self, districts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.districts = districts
            .into_iter()
            .map(|district| district.into().trim().to_ascii_uppercase())
            .collect();
        self
    }

    /// Restricts the freelancer to shifts on the given weekdays.
    #[must_use]
    pub fn with_days_available(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.days = days.into_iter().collect();
        self
    }

    /// Restricts the freelancer to shifts starting in the given bands.
    #[must_use]
    pub fn with_hours_available(mut self, bands: impl IntoIterator<Item = ShiftBand>) -> Self {
        self.bands = bands.into_iter().collect();
        self
    }

    /// Returns whether the freelancer works on the job request's day and
    /// start time. An empty restriction accepts everything.
    #[must_use]
    pub fn is_available_for(&self, job_request: &JobRequest) -> bool {
        let schedule = job_request.schedule();
        let band = ShiftBand::containing(schedule.start_time());
        (self.days.is_empty() || self.days.contains(&schedule.date().weekday()))
            && (self.bands.is_empty() || self.bands.contains(&band))
    }

    /// Returns the freelancer.
    #[must_use]
    pub const fn id(&self) -> FreelancerId {
        self.id
    }

    /// Returns whether the freelancer is eligible for `job_request`.
    #[must_use]
    pub fn matches(&self, job_request: &JobRequest) -> bool {
        let district = job_request.location().postcode_district();
        self.published
            && self.service == job_request.service().service_kind()
            && job_request
                .years_experience()
                .is_met_by(self.years_experience)
            && job_request.phone_requirement().is_satisfied_by(self.phone)
            && (self.districts.is_empty() || self.districts.iter().any(|served| served == district))
            && self.is_available_for(job_request)
    }
}

/// Thread-safe in-memory freelancer directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFreelancerDirectory {
    profiles: Arc<RwLock<Vec<FreelancerProfile>>>,
}

impl InMemoryFreelancerDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding `profiles`.
    #[must_use]
    pub fn with_profiles(profiles: impl IntoIterator<Item = FreelancerProfile>) -> Self {
        Self {
            profiles: Arc::new(RwLock::new(profiles.into_iter().collect())),
        }
    }

    /// Adds or replaces a profile.
    ///
    /// # Errors
    ///
    /// Returns [`FreelancerDirectoryError::Unavailable`] when the directory
    /// lock is poisoned.
    pub fn register(&self, profile: FreelancerProfile) -> FreelancerDirectoryResult<()> {
        let mut profiles = self.profiles.write().map_err(|err| {
            FreelancerDirectoryError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        profiles.retain(|existing| existing.id != profile.id);
        profiles.push(profile);
        Ok(())
    }
}

#[async_trait]
impl FreelancerDirectory for InMemoryFreelancerDirectory {
    async fn find_matching(
        &self,
        job_request: &JobRequest,
    ) -> FreelancerDirectoryResult<Vec<FreelancerId>> {
        let profiles = self.profiles.read().map_err(|err| {
            FreelancerDirectoryError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        let mut matching: Vec<FreelancerId> = profiles
            .iter()
            .filter(|profile| profile.matches(job_request))
            .map(FreelancerProfile::id)
            .collect();
        matching.sort_unstable();
        Ok(matching)
    }
}
