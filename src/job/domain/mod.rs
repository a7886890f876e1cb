//! Domain model for job requests.
//!
//! Covers the job request aggregate, its status machine and the value types
//! it is built from. Persistence and time sources stay outside this boundary.

mod error;
mod ids;
mod job_request;
mod location;
mod pay;
mod requirements;
mod schedule;
mod service;
mod status;

pub use error::{
    JobDomainError, ParseJobStatusError, ParseJobTriggerError, ParsePhoneRequirementError,
};
pub use ids::{ClientId, FreelancerId, JobRequestId};
pub use job_request::{JobRequest, NewJobRequest, PersistedJobRequestData};
pub use location::JobLocation;
pub use pay::{CurrencyCode, PayRate};
pub use requirements::{FreelancerCount, PhoneRequirement, PhoneType, YearsExperience};
pub use schedule::JobSchedule;
pub use service::{BarRole, ServiceDetails, ServiceKind};
pub use status::{JobStatus, JobTrigger, StatusChange};
