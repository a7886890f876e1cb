//! Staffing requirements attached to a job request.

use super::{JobDomainError, ParsePhoneRequirementError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of freelancers a job request asks for; also its booking capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FreelancerCount(u8);

impl FreelancerCount {
    /// Smallest permitted count.
    pub const MIN: u8 = 1;
    /// Largest permitted count.
    pub const MAX: u8 = 9;

    /// Creates a validated count.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidFreelancerCount`] when the value is
    /// outside 1..=9.
    pub const fn new(value: u8) -> Result<Self, JobDomainError> {
        if value < Self::MIN || value > Self::MAX {
            return Err(JobDomainError::InvalidFreelancerCount(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying count.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the count as a collection length for capacity checks.
    #[must_use]
    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<u8> for FreelancerCount {
    type Error = JobDomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FreelancerCount> for u8 {
    fn from(value: FreelancerCount) -> Self {
        value.0
    }
}

impl fmt::Display for FreelancerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimum years of experience a freelancer must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum YearsExperience {
    /// Any experience level.
    NoPreference,
    /// At least one year.
    #[default]
    OneYear,
    /// At least three years.
    ThreeYears,
    /// At least five years.
    FiveYears,
}

impl YearsExperience {
    /// Returns the numeric number of years.
    #[must_use]
    pub const fn years(self) -> u16 {
        match self {
            Self::NoPreference => 0,
            Self::OneYear => 1,
            Self::ThreeYears => 3,
            Self::FiveYears => 5,
        }
    }

    /// Returns whether `years` of experience satisfies this minimum.
    #[must_use]
    pub const fn is_met_by(self, years: u16) -> bool {
        years >= self.years()
    }
}

impl TryFrom<u16> for YearsExperience {
    type Error = JobDomainError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NoPreference),
            1 => Ok(Self::OneYear),
            3 => Ok(Self::ThreeYears),
            5 => Ok(Self::FiveYears),
            _ => Err(JobDomainError::InvalidYearsExperience(value)),
        }
    }
}

impl From<YearsExperience> for u16 {
    fn from(value: YearsExperience) -> Self {
        value.years()
    }
}

/// Kind of smartphone a job needs the freelancer to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneRequirement {
    /// No smartphone needed.
    #[default]
    NotRequired,
    /// Any smartphone.
    AnySmartphone,
    /// An Android phone.
    Android,
    /// An iPhone.
    #[serde(rename = "iphone")]
    IPhone,
    /// A Windows phone.
    Windows,
}

impl PhoneRequirement {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotRequired => "not_required",
            Self::AnySmartphone => "any_smartphone",
            Self::Android => "android",
            Self::IPhone => "iphone",
            Self::Windows => "windows",
        }
    }

    /// Returns whether a freelancer carrying `phone` meets this requirement.
    #[must_use]
    pub const fn is_satisfied_by(self, phone: Option<PhoneType>) -> bool {
        match (self, phone) {
            (Self::NotRequired, _) => true,
            (_, None | Some(PhoneType::NonSmartphone)) => false,
            (Self::AnySmartphone, Some(_)) => true,
            (Self::Android, Some(phone)) => matches!(phone, PhoneType::Android),
            (Self::IPhone, Some(phone)) => matches!(phone, PhoneType::IPhone),
            (Self::Windows, Some(phone)) => matches!(phone, PhoneType::Windows),
        }
    }
}

/// Kind of phone a freelancer carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneType {
    /// Android smartphone.
    Android,
    /// iPhone.
    #[serde(rename = "iphone")]
    IPhone,
    /// Windows smartphone.
    Windows,
    /// Some other smartphone.
    OtherSmartphone,
    /// A phone without smartphone capabilities.
    NonSmartphone,
}

impl TryFrom<&str> for PhoneRequirement {
    type Error = ParsePhoneRequirementError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "not_required" => Ok(Self::NotRequired),
            "any_smartphone" => Ok(Self::AnySmartphone),
            "android" => Ok(Self::Android),
            "iphone" => Ok(Self::IPhone),
            "windows" => Ok(Self::Windows),
            _ => Err(ParsePhoneRequirementError(value.to_owned())),
        }
    }
}
