//! Diesel row models for job request persistence.

use super::schema::job_requests;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for job request records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = job_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobRequestRow {
    /// Job request identifier.
    pub id: i64,
    /// Requesting client.
    pub client_id: i64,
    /// Service JSON payload.
    pub service: Value,
    /// Scheduled local date.
    pub schedule_date: NaiveDate,
    /// Scheduled local start time.
    pub start_time: NaiveTime,
    /// Duration in hours.
    pub duration_hours: i16,
    /// Derived end instant.
    pub end_datetime: DateTime<Utc>,
    /// Requested number of freelancers.
    pub number_of_freelancers: i16,
    /// Decimal pay per hour.
    pub pay_per_hour: String,
    /// Pay currency.
    pub currency: String,
    /// Tips flag.
    pub tips_included: bool,
    /// Minimum years of experience.
    pub years_experience: i16,
    /// Smartphone requirement.
    pub phone_requirement: String,
    /// First address line.
    pub address_line1: String,
    /// Second address line.
    pub address_line2: Option<String>,
    /// Postcode.
    pub postcode: String,
    /// Free-text comments.
    pub comments: String,
    /// Lifecycle status.
    pub status: String,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and full-update model for job request records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = job_requests, treat_none_as_null = true)]
pub struct NewJobRequestRow {
    /// Job request identifier.
    pub id: i64,
    /// Requesting client.
    pub client_id: i64,
    /// Service JSON payload.
    pub service: Value,
    /// Scheduled local date.
    pub schedule_date: NaiveDate,
    /// Scheduled local start time.
    pub start_time: NaiveTime,
    /// Duration in hours.
    pub duration_hours: i16,
    /// Derived end instant.
    pub end_datetime: DateTime<Utc>,
    /// Requested number of freelancers.
    pub number_of_freelancers: i16,
    /// Decimal pay per hour.
    pub pay_per_hour: String,
    /// Pay currency.
    pub currency: String,
    /// Tips flag.
    pub tips_included: bool,
    /// Minimum years of experience.
    pub years_experience: i16,
    /// Smartphone requirement.
    pub phone_requirement: String,
    /// First address line.
    pub address_line1: String,
    /// Second address line.
    pub address_line2: Option<String>,
    /// Postcode.
    pub postcode: String,
    /// Free-text comments.
    pub comments: String,
    /// Lifecycle status.
    pub status: String,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
